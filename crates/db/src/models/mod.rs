//! Entity model structs and creation DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the stored record
//! - A `Deserialize` create DTO carrying everything except the id
//!
//! Field names are camelCase on the wire and in the relational schema
//! (`categoryId`, `iconSource`) so every backend persists the same shape.

pub mod category;
pub mod link;

pub use category::{Category, NewCategory};
pub use link::{LinkItem, NewLink};

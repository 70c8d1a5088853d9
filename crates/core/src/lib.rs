//! Domain helpers shared by the storage and API layers.
//!
//! This crate has zero internal dependencies: the entity model lives in
//! `linkhub-db`, while the rules that do not need storage (icon sources,
//! field limits, search matching) live here.

pub mod error;
pub mod icon;
pub mod search;
pub mod types;
pub mod validation;

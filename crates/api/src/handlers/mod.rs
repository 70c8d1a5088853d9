pub mod admin;
pub mod categories;
pub mod directory;
pub mod health;
pub mod links;

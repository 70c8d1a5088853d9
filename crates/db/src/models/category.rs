//! Category model.

use linkhub_core::types::EntityId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A named group of links. Deleting a category deletes its links.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, Validate)]
pub struct Category {
    pub id: EntityId,
    #[validate(length(min = 2, max = 50, message = "Category name must be 2 to 50 characters."))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters."))]
    pub description: Option<String>,
    /// Symbolic icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// DTO for creating a category. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 2, max = 50, message = "Category name must be 2 to 50 characters."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters."))]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl NewCategory {
    /// Shorthand for a category with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a store-assigned id.
    pub fn into_category(self, id: EntityId) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            icon: self.icon,
        }
    }
}

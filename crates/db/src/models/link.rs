//! Link model.

use linkhub_core::icon::IconSource;
use linkhub_core::types::EntityId;
use linkhub_core::validation::validate_icon;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A bookmarked URL belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_link_icon"))]
pub struct LinkItem {
    pub id: EntityId,
    #[validate(length(min = 2, max = 100, message = "Title must be 2 to 100 characters."))]
    pub title: String,
    #[validate(url(message = "Please enter a valid URL."))]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters."))]
    pub description: Option<String>,
    #[sqlx(rename = "categoryId")]
    #[validate(length(min = 1, message = "Please select a category."))]
    pub category_id: EntityId,
    /// Interpreted according to `icon_source`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    #[sqlx(rename = "iconSource", try_from = "String")]
    pub icon_source: IconSource,
}

/// DTO for creating a link. The store assigns the id.
///
/// `icon_source` may be omitted; see [`IconSource::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_new_link_icon"))]
pub struct NewLink {
    #[validate(length(min = 2, max = 100, message = "Title must be 2 to 100 characters."))]
    pub title: String,
    #[validate(url(message = "Please enter a valid URL."))]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Description cannot exceed 200 characters."))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Please select a category."))]
    pub category_id: EntityId,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_source: Option<IconSource>,
}

impl NewLink {
    /// Shorthand for a link without description or icon.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        category_id: impl Into<EntityId>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            category_id: category_id.into(),
            ..Self::default()
        }
    }

    /// The icon source this link will be stored with.
    pub fn effective_icon_source(&self) -> IconSource {
        IconSource::resolve(self.icon_source, self.icon.as_deref())
    }

    /// Attach a store-assigned id, resolving the icon source.
    pub fn into_link(self, id: EntityId) -> LinkItem {
        let icon_source = self.effective_icon_source();
        LinkItem {
            id,
            title: self.title,
            url: self.url,
            description: self.description,
            category_id: self.category_id,
            icon: self.icon,
            icon_source,
        }
    }
}

fn validate_link_icon(link: &LinkItem) -> Result<(), ValidationError> {
    validate_icon(link.icon_source, link.icon.as_deref())
}

fn validate_new_link_icon(link: &NewLink) -> Result<(), ValidationError> {
    validate_icon(link.effective_icon_source(), link.icon.as_deref())
}

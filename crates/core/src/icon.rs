//! Link icon sources.
//!
//! A link's `icon` string is interpreted according to its [`IconSource`]:
//! a symbolic icon name, an external image URL, an inline base64 image, or
//! nothing at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Symbolic icon library identifier.
pub const SOURCE_LUCIDE: &str = "lucide";

/// External image URL identifier.
pub const SOURCE_URL: &str = "url";

/// Inline `data:` URI identifier.
pub const SOURCE_DATA: &str = "data";

/// No icon identifier.
pub const SOURCE_NONE: &str = "none";

/// How a link's `icon` string should be interpreted.
///
/// Defaults to [`IconSource::None`] when a persisted or submitted link omits
/// the field entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconSource {
    Lucide,
    Url,
    /// Uploaded images are stored inline; the admin form calls this `upload`.
    #[serde(alias = "upload")]
    Data,
    #[default]
    None,
}

impl IconSource {
    /// Pick the effective source for a new link.
    ///
    /// An explicit source always wins. Otherwise a non-empty `icon` means a
    /// symbolic icon name and an absent or empty one means no icon.
    pub fn resolve(explicit: Option<IconSource>, icon: Option<&str>) -> Self {
        match explicit {
            Some(source) => source,
            None if icon.is_some_and(|i| !i.is_empty()) => Self::Lucide,
            None => Self::None,
        }
    }

    /// Parse from the persisted string value.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            SOURCE_LUCIDE => Ok(Self::Lucide),
            SOURCE_URL => Ok(Self::Url),
            SOURCE_DATA | "upload" => Ok(Self::Data),
            SOURCE_NONE => Ok(Self::None),
            other => Err(CoreError::Validation(format!(
                "Unknown icon source '{other}'. Must be one of: lucide, url, data, none"
            ))),
        }
    }

    /// Persisted string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lucide => SOURCE_LUCIDE,
            Self::Url => SOURCE_URL,
            Self::Data => SOURCE_DATA,
            Self::None => SOURCE_NONE,
        }
    }
}

impl fmt::Display for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for IconSource {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

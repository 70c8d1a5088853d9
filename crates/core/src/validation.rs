//! Validation helpers for category and link payloads.
//!
//! The store never enforces these rules; they belong to the admin-facing
//! layer that accepts user input before calling into storage.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use validator::{ValidateUrl, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::icon::IconSource;

/// Key under which `validator` files struct-level (schema) errors.
const SCHEMA_FIELD: &str = "__all__";

/// Largest decoded payload accepted for an inline (`data:`) icon (1 MiB).
pub const MAX_ICON_UPLOAD_BYTES: usize = 1024 * 1024;

fn data_uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^data:image/[A-Za-z0-9.+-]+;base64,([A-Za-z0-9+/]*={0,2})$")
            .expect("data URI pattern is valid")
    })
}

// ---------------------------------------------------------------------------
// Icon rules
// ---------------------------------------------------------------------------

/// Check that `icon` is consistent with `source`.
///
/// - `url` requires a present, syntactically valid URL.
/// - `data` requires a base64 `data:image/*` URI of at most
///   [`MAX_ICON_UPLOAD_BYTES`] decoded bytes.
/// - `lucide` and `none` accept anything (an empty symbolic name is allowed).
pub fn validate_icon(source: IconSource, icon: Option<&str>) -> Result<(), ValidationError> {
    let icon = icon.filter(|i| !i.is_empty());
    match source {
        IconSource::Url => match icon {
            None => Err(error(
                "icon_url_required",
                "Icon URL is required when the icon source is 'url'.",
            )),
            Some(url) if !url.validate_url() => {
                Err(error("icon_url_invalid", "Please enter a valid icon URL."))
            }
            Some(_) => Ok(()),
        },
        IconSource::Data => {
            let payload = icon.ok_or_else(|| {
                error(
                    "icon_data_required",
                    "Image data is required when the icon source is 'data'.",
                )
            })?;
            let size = data_uri_payload_len(payload).ok_or_else(|| {
                error(
                    "icon_data_invalid",
                    "Invalid file type. Please upload a base64 encoded image.",
                )
            })?;
            if size > MAX_ICON_UPLOAD_BYTES {
                return Err(error(
                    "icon_data_too_large",
                    "File size must be less than 1MB.",
                ));
            }
            Ok(())
        }
        IconSource::Lucide | IconSource::None => Ok(()),
    }
}

/// Decoded byte length of a base64 `data:image/*` URI, or `None` if the
/// string is not one.
pub fn data_uri_payload_len(uri: &str) -> Option<usize> {
    let captures = data_uri_regex().captures(uri)?;
    let encoded = captures.get(1)?.as_str();
    if encoded.len() % 4 != 0 {
        return None;
    }
    let padding = encoded.bytes().rev().take_while(|&b| b == b'=').count();
    Some(encoded.len() / 4 * 3 - padding)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// ---------------------------------------------------------------------------
// Error conversion
// ---------------------------------------------------------------------------

/// Flatten `validator` errors into a single [`CoreError::Validation`].
///
/// Output is `field: message` pairs joined by `; `, sorted so the text is
/// stable. Struct-level errors carry no field prefix.
pub fn into_core_error(errors: &ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                if field == SCHEMA_FIELD {
                    message
                } else {
                    format!("{field}: {message}")
                }
            })
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

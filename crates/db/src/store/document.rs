//! Document-store (MongoDB) backend.
//!
//! Configuration and id mapping are in place, but no driver is linked, so
//! every data operation fails with [`StoreError::Unimplemented`]. Ids that
//! could never name a document (anything but 24 hex characters) resolve to
//! not-found without reaching that point.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::{LinkStore, StoreError, StoreResult};
use crate::config::{DataSourceType, MongoConfig};
use crate::models::{Category, LinkItem, NewCategory, NewLink};

const BACKEND: &str = "mongodb";

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// The public form of a document id: 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdHex(String);

impl ObjectIdHex {
    pub const LEN: usize = 24;

    /// Parse `id`, accepting either case. Returns `None` for anything that
    /// is not exactly 24 hex digits.
    pub fn parse(id: &str) -> Option<Self> {
        (id.len() == Self::LEN && id.bytes().all(|b| b.is_ascii_hexdigit()))
            .then(|| Self(id.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectIdHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace a document's `_id` with a public `id` string.
///
/// `_id` may be a plain string or extended JSON (`{"$oid": "..."}`). A
/// document without one gets an empty `id`. Non-objects pass through.
pub fn map_document_id(document: Value) -> Value {
    let Value::Object(mut fields) = document else {
        return document;
    };
    let id = match fields.remove("_id") {
        Some(Value::String(s)) => s,
        Some(Value::Object(oid)) => oid
            .get("$oid")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    fields.insert("id".into(), Value::String(id));
    Value::Object(fields)
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// [`LinkStore`] placeholder for a MongoDB deployment.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    uri: String,
    database: String,
}

impl DocumentStore {
    /// Check the configuration and build the store.
    ///
    /// Fails if either variable is missing or the URI is not a
    /// `mongodb://` / `mongodb+srv://` URI.
    pub fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let (Some(uri), Some(database)) = (&config.uri, &config.database) else {
            let missing: Vec<&str> = [("MONGODB_URI", &config.uri), ("MONGODB_DB_NAME", &config.database)]
                .into_iter()
                .filter(|(_, v)| v.is_none())
                .map(|(name, _)| name)
                .collect();
            return Err(StoreError::Configuration(format!(
                "MongoDB configuration is incomplete (missing: {})",
                missing.join(", ")
            )));
        };

        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(StoreError::Configuration(
                "MONGODB_URI must start with mongodb:// or mongodb+srv://".into(),
            ));
        }

        tracing::warn!(
            database = %database,
            "MongoDB backend selected; data operations are not implemented"
        );
        Ok(Self {
            uri: uri.clone(),
            database: database.clone(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn unimplemented<T>(&self, operation: &'static str) -> StoreResult<T> {
        tracing::warn!(database = %self.database, operation, "MongoDB operation not implemented");
        Err(StoreError::Unimplemented {
            backend: BACKEND,
            operation,
        })
    }
}

#[async_trait]
impl LinkStore for DocumentStore {
    fn kind(&self) -> DataSourceType {
        DataSourceType::Mongodb
    }

    async fn get_categories(&self) -> StoreResult<Vec<Category>> {
        self.unimplemented("get_categories")
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        if ObjectIdHex::parse(id).is_none() {
            return Ok(None);
        }
        self.unimplemented("get_category")
    }

    async fn add_category(&self, _input: NewCategory) -> StoreResult<Category> {
        self.unimplemented("add_category")
    }

    async fn update_category(&self, category: Category) -> StoreResult<Option<Category>> {
        if ObjectIdHex::parse(&category.id).is_none() {
            return Ok(None);
        }
        self.unimplemented("update_category")
    }

    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        if ObjectIdHex::parse(id).is_none() {
            return Ok(false);
        }
        self.unimplemented("delete_category")
    }

    async fn get_links(&self) -> StoreResult<Vec<LinkItem>> {
        self.unimplemented("get_links")
    }

    async fn get_links_by_category_id(&self, _category_id: &str) -> StoreResult<Vec<LinkItem>> {
        self.unimplemented("get_links_by_category_id")
    }

    async fn get_link(&self, id: &str) -> StoreResult<Option<LinkItem>> {
        if ObjectIdHex::parse(id).is_none() {
            return Ok(None);
        }
        self.unimplemented("get_link")
    }

    async fn add_link(&self, _input: NewLink) -> StoreResult<LinkItem> {
        self.unimplemented("add_link")
    }

    async fn update_link(&self, link: LinkItem) -> StoreResult<Option<LinkItem>> {
        if ObjectIdHex::parse(&link.id).is_none() {
            return Ok(None);
        }
        self.unimplemented("update_link")
    }

    async fn delete_link(&self, id: &str) -> StoreResult<bool> {
        if ObjectIdHex::parse(id).is_none() {
            return Ok(false);
        }
        self.unimplemented("delete_link")
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(StoreError::NotConnected(format!(
            "no MongoDB driver available for {}",
            redact(&self.uri)
        )))
    }

    async fn close(&self) {
        tracing::info!(database = %self.database, "MongoDB store closed");
    }
}

/// Strip credentials from a connection URI for logging.
fn redact(uri: &str) -> String {
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &uri[..scheme_end + 3], &uri[at..])
        }
        _ => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    const VALID_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

    fn config(uri: &str) -> MongoConfig {
        MongoConfig {
            uri: Some(uri.into()),
            database: Some("linkhub".into()),
        }
    }

    #[test]
    fn object_id_requires_24_hex_digits() {
        assert!(ObjectIdHex::parse(VALID_ID).is_some());
        assert_eq!(
            ObjectIdHex::parse("65A1F0C2E4B0A1B2C3D4E5F6").unwrap().as_str(),
            VALID_ID
        );
        assert!(ObjectIdHex::parse("1").is_none());
        assert!(ObjectIdHex::parse("zza1f0c2e4b0a1b2c3d4e5f6").is_none());
    }

    #[test]
    fn map_document_id_renames_underscore_id() {
        let doc = json!({ "_id": { "$oid": VALID_ID }, "name": "Work" });
        assert_eq!(map_document_id(doc), json!({ "id": VALID_ID, "name": "Work" }));

        let doc = json!({ "_id": VALID_ID, "title": "GitHub" });
        assert_eq!(map_document_id(doc), json!({ "id": VALID_ID, "title": "GitHub" }));
    }

    #[test]
    fn map_document_id_without_id_yields_empty_string() {
        assert_eq!(map_document_id(json!({ "name": "x" })), json!({ "id": "", "name": "x" }));
        assert_eq!(map_document_id(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn connect_rejects_missing_settings() {
        let err = DocumentStore::connect(&MongoConfig::default()).unwrap_err();
        assert_matches!(err, StoreError::Configuration(msg)
            if msg.contains("MONGODB_URI") && msg.contains("MONGODB_DB_NAME"));
    }

    #[test]
    fn connect_rejects_foreign_scheme() {
        assert_matches!(
            DocumentStore::connect(&config("postgres://localhost")),
            Err(StoreError::Configuration(_))
        );
        assert!(DocumentStore::connect(&config("mongodb+srv://cluster.example.net")).is_ok());
    }

    #[tokio::test]
    async fn data_operations_fail_loudly() {
        let store = DocumentStore::connect(&config("mongodb://localhost:27017")).unwrap();
        assert_matches!(
            store.get_categories().await,
            Err(StoreError::Unimplemented { backend: "mongodb", operation: "get_categories" })
        );
        assert_matches!(
            store.add_link(NewLink::new("GitHub", "https://github.com", VALID_ID)).await,
            Err(StoreError::Unimplemented { .. })
        );
        assert_matches!(store.delete_link(VALID_ID).await, Err(StoreError::Unimplemented { .. }));
    }

    #[tokio::test]
    async fn malformed_ids_are_not_found() {
        let store = DocumentStore::connect(&config("mongodb://localhost:27017")).unwrap();
        assert_eq!(store.get_category("1").await.unwrap(), None);
        assert!(!store.delete_category("1").await.unwrap());
        assert_eq!(store.get_link("abc").await.unwrap(), None);
    }

    #[test]
    fn redact_hides_credentials() {
        assert_eq!(redact("mongodb://user:pw@host:27017"), "mongodb://***@host:27017");
        assert_eq!(redact("mongodb://host"), "mongodb://host");
    }
}

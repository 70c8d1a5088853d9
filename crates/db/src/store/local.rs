//! Local persistent store.
//!
//! Categories and links live as two JSON arrays in an origin-scoped
//! key-value store that is only reachable from a UI execution context.
//! Every read goes back to the key-value store, so several handles sharing
//! one backing store (several open windows) see each other's writes.
//!
//! In a server execution context there is no such store. [`LocalStore::server_fallback`]
//! serves a fresh copy of the default dataset on every read and turns writes
//! into logged no-ops, so server-side rendering still has something to show.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use linkhub_core::icon::IconSource;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{LinkStore, StoreResult};
use crate::config::DataSourceType;
use crate::models::{Category, LinkItem, NewCategory, NewLink};

/// Key holding the category array.
pub const CATEGORIES_KEY: &str = "linkhub_categories";

/// Key holding the link array.
pub const LINKS_KEY: &str = "linkhub_links";

// ---------------------------------------------------------------------------
// Key-value backing stores
// ---------------------------------------------------------------------------

/// Synchronous string key-value storage scoped to one origin.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` if the key has never been written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Durable key-value store keeping one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Use `dir` as the storage root, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // Write-then-rename so a crash never leaves a truncated array behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

/// Key-value store that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default dataset
// ---------------------------------------------------------------------------

fn category(id: &str, name: &str, description: &str, icon: &str) -> Category {
    Category {
        id: id.into(),
        name: name.into(),
        description: Some(description.into()),
        icon: Some(icon.into()),
    }
}

fn link(id: &str, title: &str, url: &str, description: &str, category_id: &str, icon: &str) -> LinkItem {
    LinkItem {
        id: id.into(),
        title: title.into(),
        url: url.into(),
        description: Some(description.into()),
        category_id: category_id.into(),
        icon: Some(icon.into()),
        icon_source: IconSource::Lucide,
    }
}

/// The categories a fresh store starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        category("1", "General", "Useful general links", "Globe"),
        category("2", "Work", "Work-related tools and resources", "Briefcase"),
        category("3", "Development", "Coding and development links", "Code"),
        category("4", "Learning", "Educational resources", "BookOpen"),
    ]
}

/// The links a fresh store starts with.
pub fn default_links() -> Vec<LinkItem> {
    vec![
        link("1", "Google", "https://google.com", "Search engine", "1", "Zap"),
        link(
            "2",
            "Next.js Docs",
            "https://nextjs.org/docs",
            "The React Framework for Production",
            "3",
            "FileText",
        ),
        link(
            "3",
            "Tailwind CSS",
            "https://tailwindcss.com",
            "A utility-first CSS framework",
            "3",
            "Palette",
        ),
        link("4", "GitHub", "https://github.com", "Code hosting platform", "2", "Github"),
        link(
            "5",
            "MDN Web Docs",
            "https://developer.mozilla.org",
            "Resources for developers, by developers",
            "4",
            "BookOpen",
        ),
    ]
}

/// Millisecond timestamp id. Two adds in the same millisecond collide.
fn timestamp_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

// ---------------------------------------------------------------------------
// LocalStore
// ---------------------------------------------------------------------------

enum Backing {
    Persistent(Arc<dyn KeyValueStore>),
    ServerFallback,
}

/// [`LinkStore`] over a [`KeyValueStore`], or over the default dataset when
/// no key-value store is reachable.
pub struct LocalStore {
    backing: Backing,
    /// Serializes read-modify-write cycles within this handle.
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Open a store in a UI execution context.
    ///
    /// Seeds either key with the default dataset if it has never been written.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> StoreResult<Self> {
        if kv.get(CATEGORIES_KEY)?.is_none() {
            kv.set(CATEGORIES_KEY, &serde_json::to_string(&default_categories())?)?;
            tracing::info!("Seeded local store with default categories");
        }
        if kv.get(LINKS_KEY)?.is_none() {
            kv.set(LINKS_KEY, &serde_json::to_string(&default_links())?)?;
            tracing::info!("Seeded local store with default links");
        }
        Ok(Self {
            backing: Backing::Persistent(kv),
            write_lock: Mutex::new(()),
        })
    }

    /// A store for a server execution context: defaults in, nothing out.
    pub fn server_fallback() -> Self {
        tracing::warn!(
            "Local store created in a server context; reads return the default \
             dataset and writes are discarded"
        );
        Self {
            backing: Backing::ServerFallback,
            write_lock: Mutex::new(()),
        }
    }

    /// Whether this handle persists anything.
    pub fn is_persistent(&self) -> bool {
        matches!(self.backing, Backing::Persistent(_))
    }

    fn read<T: DeserializeOwned>(&self, key: &str, defaults: fn() -> Vec<T>) -> Vec<T> {
        let kv = match &self.backing {
            Backing::Persistent(kv) => kv,
            Backing::ServerFallback => return defaults(),
        };
        match kv.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::error!(key, error = %e, "Stored data is malformed, using defaults");
                defaults()
            }),
            Ok(None) => defaults(),
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read local store, using defaults");
                defaults()
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        match &self.backing {
            Backing::Persistent(kv) => {
                kv.set(key, &serde_json::to_string(items)?)?;
                Ok(())
            }
            Backing::ServerFallback => {
                tracing::warn!(key, "Write skipped: local store has no backing storage on the server");
                Ok(())
            }
        }
    }

    fn categories(&self) -> Vec<Category> {
        self.read(CATEGORIES_KEY, default_categories)
    }

    fn links(&self) -> Vec<LinkItem> {
        self.read(LINKS_KEY, default_links)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LinkStore for LocalStore {
    fn kind(&self) -> DataSourceType {
        DataSourceType::Local
    }

    fn persists_writes(&self) -> bool {
        self.is_persistent()
    }

    async fn get_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories())
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        Ok(self.categories().into_iter().find(|c| c.id == id))
    }

    async fn add_category(&self, input: NewCategory) -> StoreResult<Category> {
        let _guard = self.lock();
        let mut categories = self.categories();
        let category = input.into_category(timestamp_id());
        categories.push(category.clone());
        self.write(CATEGORIES_KEY, &categories)?;
        tracing::debug!(id = %category.id, "Category added");
        Ok(category)
    }

    async fn update_category(&self, category: Category) -> StoreResult<Option<Category>> {
        let _guard = self.lock();
        let mut categories = self.categories();
        let Some(slot) = categories.iter_mut().find(|c| c.id == category.id) else {
            return Ok(None);
        };
        *slot = category.clone();
        self.write(CATEGORIES_KEY, &categories)?;
        Ok(Some(category))
    }

    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock();
        let mut categories = self.categories();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Ok(false);
        }

        let mut links = self.links();
        let links_before = links.len();
        links.retain(|l| l.category_id != id);

        self.write(CATEGORIES_KEY, &categories)?;
        self.write(LINKS_KEY, &links)?;
        tracing::debug!(
            id,
            links_removed = links_before - links.len(),
            "Category deleted with its links"
        );
        Ok(true)
    }

    async fn get_links(&self) -> StoreResult<Vec<LinkItem>> {
        Ok(self.links())
    }

    async fn get_links_by_category_id(&self, category_id: &str) -> StoreResult<Vec<LinkItem>> {
        Ok(self
            .links()
            .into_iter()
            .filter(|l| l.category_id == category_id)
            .collect())
    }

    async fn get_link(&self, id: &str) -> StoreResult<Option<LinkItem>> {
        Ok(self.links().into_iter().find(|l| l.id == id))
    }

    async fn add_link(&self, input: NewLink) -> StoreResult<LinkItem> {
        let _guard = self.lock();
        let mut links = self.links();
        let link = input.into_link(timestamp_id());
        links.push(link.clone());
        self.write(LINKS_KEY, &links)?;
        tracing::debug!(id = %link.id, category_id = %link.category_id, "Link added");
        Ok(link)
    }

    async fn update_link(&self, link: LinkItem) -> StoreResult<Option<LinkItem>> {
        let _guard = self.lock();
        let mut links = self.links();
        let Some(slot) = links.iter_mut().find(|l| l.id == link.id) else {
            return Ok(None);
        };
        *slot = link.clone();
        self.write(LINKS_KEY, &links)?;
        Ok(Some(link))
    }

    async fn delete_link(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock();
        let mut links = self.links();
        let before = links.len();
        links.retain(|l| l.id != id);
        if links.len() == before {
            return Ok(false);
        }
        self.write(LINKS_KEY, &links)?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

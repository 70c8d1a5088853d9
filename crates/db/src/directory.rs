//! Public read model: every category with its links, plus search filtering.

use futures::future::try_join_all;
use linkhub_core::search::{any_field_matches, normalize_term};
use serde::Serialize;

use crate::models::{Category, LinkItem};
use crate::store::{LinkStore, StoreResult};

/// A category and the links shown under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorySection {
    #[serde(flatten)]
    pub category: Category,
    pub links: Vec<LinkItem>,
}

impl DirectorySection {
    fn category_matches(&self, needle: &str) -> bool {
        any_field_matches(
            [Some(self.category.name.as_str()), self.category.description.as_deref()],
            needle,
        )
    }
}

fn link_matches(link: &LinkItem, needle: &str) -> bool {
    any_field_matches(
        [
            Some(link.title.as_str()),
            link.description.as_deref(),
            Some(link.url.as_str()),
        ],
        needle,
    )
}

/// All categories in store order, each with its links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Directory {
    sections: Vec<DirectorySection>,
}

impl Directory {
    /// Fetch categories, then every category's links concurrently.
    pub async fn load(store: &dyn LinkStore) -> StoreResult<Self> {
        let categories = store.get_categories().await?;
        let links = try_join_all(
            categories
                .iter()
                .map(|c| store.get_links_by_category_id(&c.id)),
        )
        .await?;

        let sections = categories
            .into_iter()
            .zip(links)
            .map(|(category, links)| DirectorySection { category, links })
            .collect();
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[DirectorySection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total links across all sections.
    pub fn link_count(&self) -> usize {
        self.sections.iter().map(|s| s.links.len()).sum()
    }

    /// Narrow the directory to `term`.
    ///
    /// A blank term keeps everything. A category whose name or description
    /// matches keeps all of its links; otherwise it is kept only with the
    /// links whose title, description, or URL match.
    pub fn filter(&self, term: &str) -> Directory {
        let Some(needle) = normalize_term(term) else {
            return self.clone();
        };

        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                if section.category_matches(&needle) {
                    return Some(section.clone());
                }
                let links: Vec<LinkItem> = section
                    .links
                    .iter()
                    .filter(|l| link_matches(l, &needle))
                    .cloned()
                    .collect();
                (!links.is_empty()).then(|| DirectorySection {
                    category: section.category.clone(),
                    links,
                })
            })
            .collect();
        Directory { sections }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{LocalStore, MemoryKeyValueStore};

    async fn seeded() -> Directory {
        let store = LocalStore::open(Arc::new(MemoryKeyValueStore::new())).unwrap();
        Directory::load(&store).await.unwrap()
    }

    fn titles(section: &DirectorySection) -> Vec<&str> {
        section.links.iter().map(|l| l.title.as_str()).collect()
    }

    #[tokio::test]
    async fn load_groups_links_by_category() {
        let directory = seeded().await;
        assert_eq!(directory.sections().len(), 4);
        assert_eq!(directory.link_count(), 5);

        let development = &directory.sections()[2];
        assert_eq!(development.category.name, "Development");
        assert_eq!(titles(development), ["Next.js Docs", "Tailwind CSS"]);
    }

    #[tokio::test]
    async fn blank_term_keeps_everything() {
        let directory = seeded().await;
        assert_eq!(directory.filter("  "), directory);
    }

    #[tokio::test]
    async fn category_match_keeps_all_links() {
        let filtered = seeded().await.filter("coding");
        assert_eq!(filtered.sections().len(), 1);
        assert_eq!(titles(&filtered.sections()[0]), ["Next.js Docs", "Tailwind CSS"]);
    }

    #[tokio::test]
    async fn link_match_keeps_only_matching_links() {
        let filtered = seeded().await.filter("TAILWIND");
        assert_eq!(filtered.sections().len(), 1);
        assert_eq!(filtered.sections()[0].category.name, "Development");
        assert_eq!(titles(&filtered.sections()[0]), ["Tailwind CSS"]);
    }

    #[tokio::test]
    async fn url_and_description_are_searched() {
        let filtered = seeded().await.filter("mozilla");
        assert_eq!(titles(&filtered.sections()[0]), ["MDN Web Docs"]);

        let filtered = seeded().await.filter("hosting");
        assert_eq!(titles(&filtered.sections()[0]), ["GitHub"]);
    }

    #[tokio::test]
    async fn no_match_yields_empty_directory() {
        assert!(seeded().await.filter("zzz-nothing").is_empty());
    }

    #[tokio::test]
    async fn sections_serialize_flat() {
        let directory = seeded().await;
        let json = serde_json::to_value(&directory).unwrap();
        assert_eq!(json[0]["name"], "General");
        assert_eq!(json[0]["links"][0]["title"], "Google");
    }
}

//! Contract checks shared by the backend integration tests.

use linkhub_core::icon::IconSource;
use linkhub_db::models::{NewCategory, NewLink};
use linkhub_db::LinkStore;

/// Add a category, file a link under it, delete the category, and check
/// the link went with it.
pub async fn assert_cascade_scenario(store: &dyn LinkStore) {
    let category = store.add_category(NewCategory::named("News")).await.unwrap();
    assert!(!category.id.is_empty());
    assert_eq!(category.name, "News");

    let link = store
        .add_link(NewLink::new("BBC", "https://bbc.com", category.id.clone()))
        .await
        .unwrap();
    assert_eq!(link.icon_source, IconSource::None);
    assert_eq!(link.category_id, category.id);

    assert!(store.delete_category(&category.id).await.unwrap());
    assert!(store
        .get_links_by_category_id(&category.id)
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .get_links()
        .await
        .unwrap()
        .iter()
        .all(|l| l.id != link.id));
}

/// What was added can be read back unchanged.
pub async fn assert_round_trip(store: &dyn LinkStore) {
    let mut input = NewCategory::named("Reading");
    input.description = Some("Long-form articles".into());
    input.icon = Some("Book".into());
    let category = store.add_category(input).await.unwrap();
    assert_eq!(
        store.get_category(&category.id).await.unwrap(),
        Some(category.clone())
    );

    let mut input = NewLink::new("Rust Book", "https://doc.rust-lang.org/book/", category.id.clone());
    input.icon = Some("https://www.rust-lang.org/favicon.ico".into());
    input.icon_source = Some(IconSource::Url);
    let link = store.add_link(input).await.unwrap();
    assert_eq!(store.get_link(&link.id).await.unwrap(), Some(link.clone()));
    assert_eq!(
        store.get_links_by_category_id(&category.id).await.unwrap(),
        vec![link]
    );
}

/// Unknown ids are not-found, never errors.
pub async fn assert_not_found_contract(store: &dyn LinkStore) {
    assert_eq!(store.get_category("nonexistent").await.unwrap(), None);
    assert_eq!(store.get_link("nonexistent").await.unwrap(), None);
    assert!(!store.delete_link("nonexistent").await.unwrap());
    assert!(!store.delete_category("nonexistent").await.unwrap());
    assert!(store
        .get_links_by_category_id("nonexistent")
        .await
        .unwrap()
        .is_empty());

    let ghost = NewCategory::named("Ghost").into_category("nonexistent".into());
    assert_eq!(store.update_category(ghost).await.unwrap(), None);
    let ghost = NewLink::new("Ghost", "https://example.com", "1").into_link("nonexistent".into());
    assert_eq!(store.update_link(ghost).await.unwrap(), None);
}

/// Updates replace every field and are visible to the next read.
pub async fn assert_updates_are_visible(store: &dyn LinkStore) {
    let category = store.add_category(NewCategory::named("Tools")).await.unwrap();
    let mut renamed = category.clone();
    renamed.name = "Dev Tools".into();
    renamed.description = Some("Things I use daily".into());
    assert_eq!(
        store.update_category(renamed.clone()).await.unwrap(),
        Some(renamed.clone())
    );
    assert_eq!(store.get_category(&category.id).await.unwrap(), Some(renamed));

    let link = store
        .add_link(NewLink::new("crates.io", "https://crates.io", category.id.clone()))
        .await
        .unwrap();
    let mut edited = link.clone();
    edited.title = "crates.io registry".into();
    edited.icon = Some("Package".into());
    edited.icon_source = IconSource::Lucide;
    assert_eq!(store.update_link(edited.clone()).await.unwrap(), Some(edited.clone()));
    assert_eq!(store.get_link(&link.id).await.unwrap(), Some(edited));

    assert!(store.delete_link(&link.id).await.unwrap());
    assert_eq!(store.get_link(&link.id).await.unwrap(), None);
}

//! Golden tests for loading persisted catalog documents.
//!
//! Fixtures under `tests/fixtures/catalog/` are documents as older and
//! current releases wrote them.

use notecraft::catalog::{CatalogStore, MemoryBackend};
use serde_json::Value;

const V1_LEGACY: &[u8] = include_bytes!("fixtures/catalog/v1_legacy.json");
const V2_CURRENT: &[u8] = include_bytes!("fixtures/catalog/v2_current.json");

fn persisted(backend: &MemoryBackend) -> Value {
    serde_json::from_slice(&backend.document().expect("document persisted")).unwrap()
}

#[tokio::test]
async fn test_v1_document_is_upgraded_and_persisted() {
    let backend = MemoryBackend::with_document(V1_LEGACY);
    let store = CatalogStore::custom(backend.clone());

    let snapshot = store.load().await.unwrap();
    assert_eq!(snapshot.images.len(), 2);
    assert!(snapshot.images[0].in_folder("f-science"));
    assert!(snapshot.images[1].is_uncategorized());
    assert_eq!(snapshot.images[1].file_size_bytes, None);

    // Science plus one folder per genre.
    assert_eq!(snapshot.folders.len(), 6);
    assert_eq!(snapshot.folders[0].name, "Science");

    let document = persisted(&backend);
    for image in document["images"].as_array().unwrap() {
        assert!(image.get("folder_id").is_none());
        assert!(image["folder_ids"].is_array());
    }
    assert_eq!(document["images"][0]["folder_ids"][0], "f-science");
    assert_eq!(document["images"][1]["folder_ids"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_v1_upgrade_happens_once() {
    let backend = MemoryBackend::with_document(V1_LEGACY);
    let store = CatalogStore::custom(backend.clone());

    store.load().await.unwrap();
    let after_first = backend.document();
    let snapshot = store.load().await.unwrap();

    assert_eq!(backend.document(), after_first);
    assert_eq!(snapshot.folders.len(), 6);
}

#[tokio::test]
async fn test_current_document_is_left_untouched() {
    let backend = MemoryBackend::with_document(V2_CURRENT);
    let store = CatalogStore::custom(backend.clone());

    let snapshot = store.load().await.unwrap();
    assert_eq!(backend.document().as_deref(), Some(V2_CURRENT));

    let image = &snapshot.images[0];
    assert_eq!(image.genre_id.as_deref(), Some("bookkeeping"));
    assert!(image.in_folder("genre-bookkeeping") && image.in_folder("f-review"));

    // A renamed genre folder keeps the user's name.
    let genre = snapshot
        .folders
        .iter()
        .find(|f| f.id == "genre-bookkeeping")
        .unwrap();
    assert_eq!(genre.name, "Accounting");
}

#[tokio::test]
async fn test_unknown_fields_survive_a_write() {
    let backend = MemoryBackend::with_document(V2_CURRENT);
    let store = CatalogStore::custom(backend.clone());

    let mut txn = store.begin_write().await.unwrap();
    txn.folders.retain(|f| f.id != "f-review");
    txn.commit().await.unwrap();

    let document = persisted(&backend);
    assert_eq!(document["images"][0]["starred"], true);
    assert_eq!(document["folders"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_corrupt_document_is_storage_error() {
    let store = CatalogStore::custom(MemoryBackend::with_document(&b"{\"images\": [1, 2"[..]));
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, notecraft::Error::StorageUnavailable { .. }));
}

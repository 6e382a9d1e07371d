//! Store contract tests against a disk-backed store
//!
//! Exercises the documented CRUD and search semantics end to end, with the
//! commit log on real files.

use oxp::kinds::{AssessmentPlan, Catalog, Profile};
use oxp::{DocumentStore, SchemaSet, StoreError};
use tempfile::TempDir;

fn disk_store(dir: &TempDir) -> DocumentStore {
    DocumentStore::open(dir.path().join("store"), SchemaSet::with_defaults()).unwrap()
}

#[test]
fn add_then_get_returns_payload() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    store.add::<Catalog>("cat-1", b"{\"catalog\":{}}".to_vec()).unwrap();
    assert_eq!(
        store.get::<Catalog>("cat-1").unwrap(),
        b"{\"catalog\":{}}".to_vec()
    );
}

#[test]
fn absent_id_is_not_found_and_mutates_nothing() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    assert!(matches!(
        store.get::<Catalog>("ghost"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.replace::<Catalog>("ghost", b"x".to_vec()),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete::<Catalog>("ghost"),
        Err(StoreError::NotFound(_))
    ));
    assert!(store.list_ids::<Catalog>().unwrap().is_empty());
}

#[test]
fn duplicate_add_fails_and_preserves_first() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    store.add::<Catalog>("cat-1", b"p1".to_vec()).unwrap();
    let err = store.add::<Catalog>("cat-1", b"p2".to_vec()).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(ref id) if id.as_str() == "cat-1"));
    assert_eq!(store.get::<Catalog>("cat-1").unwrap(), b"p1".to_vec());
}

#[test]
fn replace_swaps_payload() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    store.add::<Catalog>("cat-1", b"p1".to_vec()).unwrap();
    store.replace::<Catalog>("cat-1", b"p2".to_vec()).unwrap();
    assert_eq!(store.get::<Catalog>("cat-1").unwrap(), b"p2".to_vec());
}

#[test]
fn delete_frees_the_id_for_reuse() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    store.add::<Catalog>("cat-1", b"p1".to_vec()).unwrap();
    store.delete::<Catalog>("cat-1").unwrap();
    assert!(matches!(
        store.get::<Catalog>("cat-1"),
        Err(StoreError::NotFound(_))
    ));

    store.add::<Catalog>("cat-1", b"p2".to_vec()).unwrap();
    assert_eq!(store.get::<Catalog>("cat-1").unwrap(), b"p2".to_vec());
}

#[test]
fn list_ids_reflects_deletions_exactly_once_each() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    for name in ["a", "b", "c"] {
        store.add::<AssessmentPlan>(name, vec![]).unwrap();
    }
    store.delete::<AssessmentPlan>("b").unwrap();

    let ids: Vec<_> = store
        .list_ids::<AssessmentPlan>()
        .unwrap()
        .iter()
        .map(|i| i.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn find_by_secondary_returns_exactly_the_matches() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    store
        .add_with_secondary::<Profile>("p1", b"one".to_vec(), "ocp4")
        .unwrap();
    store
        .add_with_secondary::<Profile>("p2", b"two".to_vec(), "ocp4")
        .unwrap();
    store
        .add_with_secondary::<Profile>("p3", b"three".to_vec(), "rhel9")
        .unwrap();

    let mut hits = store.find_by_secondary::<Profile>("ocp4").unwrap();
    hits.sort();
    assert_eq!(hits, vec![b"one".to_vec(), b"two".to_vec()]);
}

#[test]
fn error_messages_name_the_offending_id() {
    let dir = TempDir::new().unwrap();
    let store = disk_store(&dir);

    let err = store.get::<Catalog>("cat-42").unwrap_err();
    assert!(err.to_string().contains("cat-42"));

    store.add::<Catalog>("cat-42", vec![]).unwrap();
    let err = store.add::<Catalog>("cat-42", vec![]).unwrap_err();
    assert!(err.to_string().contains("cat-42"));
}

#[test]
fn second_store_in_same_directory_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    let _first = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
    let second = DocumentStore::open(&path, SchemaSet::with_defaults());
    assert!(matches!(second, Err(StoreError::Unavailable(_))));
}

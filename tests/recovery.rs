//! Recovery tests: reopening a store must observe the committed history

use oxp::kinds::{Catalog, Profile};
use oxp::{DocumentStore, SchemaSet, StoreError, LOG_FILE_NAME};
use tempfile::TempDir;

#[test]
fn reopen_observes_all_mutations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    {
        let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
        store.add::<Catalog>("cat-1", b"v1".to_vec()).unwrap();
        store.add::<Catalog>("cat-2", b"v1".to_vec()).unwrap();
        store.replace::<Catalog>("cat-1", b"v2".to_vec()).unwrap();
        store.delete::<Catalog>("cat-2").unwrap();
        store
            .add_with_secondary::<Profile>("p1", b"prof".to_vec(), "ocp4")
            .unwrap();
    }

    let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
    assert_eq!(store.get::<Catalog>("cat-1").unwrap(), b"v2".to_vec());
    assert!(matches!(
        store.get::<Catalog>("cat-2"),
        Err(StoreError::NotFound(_))
    ));

    // The secondary index is rebuilt from the log, not persisted separately.
    assert_eq!(
        store.find_by_secondary::<Profile>("ocp4").unwrap(),
        vec![b"prof".to_vec()]
    );
}

#[test]
fn reopen_of_empty_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    drop(DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap());

    let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
    assert!(store.list_ids::<Catalog>().unwrap().is_empty());
}

#[test]
fn torn_tail_drops_only_the_last_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    {
        let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
        store.add::<Catalog>("cat-1", b"v1".to_vec()).unwrap();
        store.add::<Catalog>("cat-2", b"v2".to_vec()).unwrap();
    }

    // Crash mid-append: the final record loses its tail bytes.
    let log_path = path.join(LOG_FILE_NAME);
    let len = std::fs::metadata(&log_path).unwrap().len();
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(&log_path)
        .unwrap();
    file.set_len(len - 2).unwrap();
    drop(file);

    let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
    assert_eq!(store.get::<Catalog>("cat-1").unwrap(), b"v1".to_vec());
    assert!(matches!(
        store.get::<Catalog>("cat-2"),
        Err(StoreError::NotFound(_))
    ));

    // The store keeps working after truncating the tail.
    store.add::<Catalog>("cat-2", b"v2'".to_vec()).unwrap();
    drop(store);

    let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
    assert_eq!(store.get::<Catalog>("cat-2").unwrap(), b"v2'".to_vec());
}

#[test]
fn mid_log_corruption_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store");

    {
        let store = DocumentStore::open(&path, SchemaSet::with_defaults()).unwrap();
        store.add::<Catalog>("cat-1", b"v1".to_vec()).unwrap();
        store.add::<Catalog>("cat-2", b"v2".to_vec()).unwrap();
    }

    let log_path = path.join(LOG_FILE_NAME);
    let mut bytes = std::fs::read(&log_path).unwrap();
    bytes[8] ^= 0x01;
    std::fs::write(&log_path, &bytes).unwrap();

    let result = DocumentStore::open(&path, SchemaSet::with_defaults());
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

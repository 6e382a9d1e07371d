//! Document store engine
//!
//! `DocumentStore` orchestrates the commit log, the collection registry, and
//! the per-collection tables. It is the one backing-store handle of the
//! process: constructed explicitly at startup, cloned cheaply (all state is
//! behind an `Arc`), dropped at shutdown.
//!
//! ## Commit discipline
//!
//! Every mutation runs inside its collection's write lock: existence check,
//! commit-log append + fsync, then the in-memory apply. The check and the
//! mutation are therefore atomic per collection, the log order matches the
//! visibility order, and no call returns success before its record is on
//! disk. A failed append leaves the table untouched; the fault is terminal
//! for the request, not for the store.
//!
//! Reads take the collection's read lock and never observe a half-applied
//! mutation.

use crate::log::{CommitLog, LogRecord};
use crate::registry::CollectionRegistry;
use crate::table::Table;
use oxp_core::{
    DocKind, DocumentId, DocumentKind, DocumentRecord, Fault, IndexedKind, Payload, SchemaSet,
    StoreError, StoreResult,
};
use parking_lot::Mutex;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Commit-log file name inside the data directory
pub const LOG_FILE_NAME: &str = "exchange.log";
/// Lock file name inside the data directory
pub const LOCK_FILE_NAME: &str = "exchange.lock";

struct StoreInner {
    registry: CollectionRegistry,
    /// None in ephemeral mode; behind a Mutex so appends are serialized
    /// even when two collections mutate at once.
    log: Option<Mutex<CommitLog>>,
    /// Exclusive data-directory lock, held for the store's lifetime.
    _dir_lock: Option<File>,
}

/// The process-wide document store handle
///
/// Cheap to clone; all clones share the same backing state. There is no
/// compaction: the commit log grows with every mutation and is replayed in
/// full on open.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

impl DocumentStore {
    /// Open a disk-backed store in `dir`, replaying the existing commit log
    ///
    /// Creates the directory if needed and takes an exclusive lock on it so
    /// two processes cannot share one backing file. Fails with
    /// [`Fault::Locked`] if another store holds the directory, and with
    /// [`Fault::Corruption`] if the log cannot be trusted.
    pub fn open(dir: impl AsRef<Path>, schemas: SchemaSet) -> StoreResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(Fault::Io)?;

        let lock_file = File::create(dir.join(LOCK_FILE_NAME)).map_err(Fault::Io)?;
        fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
            StoreError::Unavailable(Fault::Locked(format!(
                "{} is in use by another process",
                dir.display()
            )))
        })?;

        let (log, records) = CommitLog::open(dir.join(LOG_FILE_NAME))?;
        let registry = CollectionRegistry::new(schemas);

        let replayed = records.len();
        for record in records {
            let handle = registry.collection(record.kind());
            let mut table = handle.write();
            apply(&mut table, record)?;
        }
        info!(
            path = %dir.display(),
            records = replayed,
            collections = registry.provisioned(),
            "document store opened"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                registry,
                log: Some(Mutex::new(log)),
                _dir_lock: Some(lock_file),
            }),
        })
    }

    /// Open a memory-only store with the default schemas
    ///
    /// No files are created and nothing survives drop. Same semantics as a
    /// disk-backed store otherwise; intended for tests and tooling.
    pub fn ephemeral() -> Self {
        Self::ephemeral_with(SchemaSet::with_defaults())
    }

    /// Open a memory-only store over an explicit schema set
    pub fn ephemeral_with(schemas: SchemaSet) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                registry: CollectionRegistry::new(schemas),
                log: None,
                _dir_lock: None,
            }),
        }
    }

    /// Provision a collection ahead of first use
    ///
    /// Idempotent and never fails; collections are otherwise provisioned
    /// lazily by the first operation that touches them.
    pub fn ensure_collection(&self, kind: DocKind) {
        self.inner.registry.ensure_collection(kind);
    }

    /// Create a new document
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the id is present, in
    /// which case nothing is mutated. On success echoes the id back so
    /// callers can chain it.
    pub fn add<K: DocumentKind>(
        &self,
        id: impl Into<DocumentId>,
        payload: Payload,
    ) -> StoreResult<DocumentId> {
        self.insert_record(K::KIND, id.into(), payload, None)
    }

    /// Create a new document in an indexed collection, with its secondary
    /// attribute value
    ///
    /// The secondary value is fixed here for the record's lifetime; replace
    /// never changes it.
    pub fn add_with_secondary<K: IndexedKind>(
        &self,
        id: impl Into<DocumentId>,
        payload: Payload,
        secondary: impl Into<String>,
    ) -> StoreResult<DocumentId> {
        self.insert_record(K::KIND, id.into(), payload, Some(secondary.into()))
    }

    fn insert_record(
        &self,
        kind: DocKind,
        id: DocumentId,
        payload: Payload,
        secondary: Option<String>,
    ) -> StoreResult<DocumentId> {
        let handle = self.inner.registry.collection(kind);
        let mut table = handle.write();
        if table.contains(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let record = LogRecord::Insert {
            kind,
            id: id.clone(),
            payload,
            secondary,
        };
        self.commit(&record)?;
        apply(&mut table, record)?;
        debug!(collection = %kind, id = %id, "added document");
        Ok(id)
    }

    /// Overwrite an existing document's payload in place
    ///
    /// Fails with [`StoreError::NotFound`] if the id is absent, in which
    /// case nothing is mutated. The secondary value, if any, is left
    /// untouched: the indexed attribute is creation-time metadata by
    /// policy.
    pub fn replace<K: DocumentKind>(
        &self,
        id: impl Into<DocumentId>,
        payload: Payload,
    ) -> StoreResult<DocumentId> {
        let id = id.into();
        let handle = self.inner.registry.collection(K::KIND);
        let mut table = handle.write();
        if !table.contains(&id) {
            return Err(StoreError::NotFound(id));
        }
        let record = LogRecord::Replace {
            kind: K::KIND,
            id: id.clone(),
            payload,
        };
        self.commit(&record)?;
        apply(&mut table, record)?;
        debug!(collection = %K::KIND, id = %id, "replaced document");
        Ok(id)
    }

    /// Remove a document entirely
    ///
    /// Fails with [`StoreError::NotFound`] if the id is absent. Deletion is
    /// physical and immediate; the id becomes reusable.
    pub fn delete<K: DocumentKind>(&self, id: impl Into<DocumentId>) -> StoreResult<DocumentId> {
        let id = id.into();
        let handle = self.inner.registry.collection(K::KIND);
        let mut table = handle.write();
        if !table.contains(&id) {
            return Err(StoreError::NotFound(id));
        }
        let record = LogRecord::Remove {
            kind: K::KIND,
            id: id.clone(),
        };
        self.commit(&record)?;
        apply(&mut table, record)?;
        debug!(collection = %K::KIND, id = %id, "deleted document");
        Ok(id)
    }

    /// Payload for an id
    ///
    /// Pure read; fails with [`StoreError::NotFound`] if the id is absent.
    pub fn get<K: DocumentKind>(&self, id: impl Into<DocumentId>) -> StoreResult<Payload> {
        let id = id.into();
        let handle = self.inner.registry.collection(K::KIND);
        let table = handle.read();
        match table.get(&id) {
            Some(record) => Ok(record.payload.clone()),
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Every id currently stored in a collection, in key order
    ///
    /// An empty collection yields an empty vec, not an error.
    pub fn list_ids<K: DocumentKind>(&self) -> StoreResult<Vec<DocumentId>> {
        let handle = self.inner.registry.collection(K::KIND);
        let ids = handle.read().ids();
        Ok(ids)
    }

    /// Payloads of every record whose secondary value equals `value`
    ///
    /// Only callable for indexed kinds; the bound makes misuse a compile
    /// error. No match yields an empty vec.
    pub fn find_by_secondary<K: IndexedKind>(&self, value: &str) -> StoreResult<Vec<Payload>> {
        let handle = self.inner.registry.collection(K::KIND);
        let table = handle.read();
        table.find_by_secondary(value).ok_or_else(|| {
            // Unreachable through the typed surface: IndexedKind implies the
            // schema declares a column.
            StoreError::Unavailable(Fault::Corruption(format!(
                "collection {} provisioned without its secondary index",
                K::KIND
            )))
        })
    }

    fn commit(&self, record: &LogRecord) -> StoreResult<()> {
        if let Some(log) = &self.inner.log {
            log.lock().append(record)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("collections", &self.inner.registry.provisioned())
            .field("persistent", &self.inner.log.is_some())
            .finish()
    }
}

/// Apply one log record to its table
///
/// Shared by the live mutation path (where the preconditions were just
/// checked under the write lock) and replay. The log holds only successful
/// serialized mutations, so a record that violates a table invariant during
/// replay means the log cannot be trusted.
fn apply(table: &mut Table, record: LogRecord) -> StoreResult<()> {
    match record {
        LogRecord::Insert {
            kind,
            id,
            payload,
            secondary,
        } => {
            if table.contains(&id) {
                return Err(
                    Fault::Corruption(format!("duplicate insert of {id} in {kind}")).into(),
                );
            }
            let record = match secondary {
                Some(value) => DocumentRecord::with_secondary(payload, value),
                None => DocumentRecord::new(payload),
            };
            table.insert(id, record);
            Ok(())
        }
        LogRecord::Replace { kind, id, payload } => {
            if table.replace_payload(&id, payload) {
                Ok(())
            } else {
                Err(Fault::Corruption(format!("replace of missing {id} in {kind}")).into())
            }
        }
        LogRecord::Remove { kind, id } => match table.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Fault::Corruption(format!("remove of missing {id} in {kind}")).into()),
        },
    }
}

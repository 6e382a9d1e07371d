//! Collection registry
//!
//! Maps each document kind to its provisioned table, creating the table
//! lazily on first use. Provisioning is idempotent and concurrent-safe:
//! second and later calls for the same kind return the existing table, and
//! two racing first calls resolve to a single table.

use crate::table::Table;
use oxp_core::{DocKind, SchemaSet};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to one collection's table
pub type TableHandle = Arc<RwLock<Table>>;

/// Lazily provisioned map from document kind to collection table
#[derive(Debug)]
pub struct CollectionRegistry {
    schemas: SchemaSet,
    tables: RwLock<HashMap<DocKind, TableHandle>>,
}

impl CollectionRegistry {
    /// Create an empty registry over a schema set
    pub fn new(schemas: SchemaSet) -> Self {
        Self {
            schemas,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// The schema set this registry provisions from
    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Table for a kind, provisioning it on first use
    ///
    /// Fast path is a read lock; a miss upgrades to the write lock and
    /// re-checks, so a racing provisioner's table wins and no table is ever
    /// replaced once handed out.
    pub fn collection(&self, kind: DocKind) -> TableHandle {
        if let Some(table) = self.tables.read().get(&kind) {
            return Arc::clone(table);
        }

        let mut tables = self.tables.write();
        Arc::clone(tables.entry(kind).or_insert_with(|| {
            debug!(collection = %kind, "provisioning collection");
            Arc::new(RwLock::new(Table::new(self.schemas.schema(kind).clone())))
        }))
    }

    /// Ensure a kind's table exists
    ///
    /// Idempotent; never fails. Present for callers that want provisioning
    /// at startup rather than on first operation.
    pub fn ensure_collection(&self, kind: DocKind) {
        let _ = self.collection(kind);
    }

    /// Number of collections provisioned so far
    pub fn provisioned(&self) -> usize {
        self.tables.read().len()
    }
}

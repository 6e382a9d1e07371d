//! In-memory collection tables
//!
//! One `Table` per provisioned collection: an ordered map from id to record,
//! plus an optional secondary index kept in step with the rows. Both are
//! mutated under the same write lock (owned by the store), so readers never
//! observe a row whose index entry is missing or stale.

use oxp_core::{CollectionSchema, DocumentId, DocumentRecord, Payload};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Secondary index: value → ids
///
/// Non-unique equality index over the collection's secondary column.
/// Entries whose id set becomes empty are removed so the map never
/// accumulates dead values.
#[derive(Debug, Default)]
pub struct SecondaryIndex {
    by_value: HashMap<String, BTreeSet<DocumentId>>,
}

impl SecondaryIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            by_value: HashMap::new(),
        }
    }

    /// Add an id under a value
    pub fn insert(&mut self, value: &str, id: DocumentId) {
        self.by_value.entry(value.to_string()).or_default().insert(id);
    }

    /// Remove an id from under a value
    pub fn remove(&mut self, value: &str, id: &DocumentId) {
        if let Some(ids) = self.by_value.get_mut(value) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_value.remove(value);
            }
        }
    }

    /// Ids stored under a value, if any
    pub fn get(&self, value: &str) -> Option<&BTreeSet<DocumentId>> {
        self.by_value.get(value)
    }

    /// Number of distinct values in the index
    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    /// Whether the index holds no values
    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}

/// One logical collection: rows plus the optional secondary index
#[derive(Debug)]
pub struct Table {
    schema: CollectionSchema,
    rows: BTreeMap<DocumentId, DocumentRecord>,
    secondary: Option<SecondaryIndex>,
}

impl Table {
    /// Create an empty table for a schema
    ///
    /// The secondary index is allocated iff the schema declares a column.
    pub fn new(schema: CollectionSchema) -> Self {
        let secondary = schema.secondary_column().map(|_| SecondaryIndex::new());
        Self {
            schema,
            rows: BTreeMap::new(),
            secondary,
        }
    }

    /// The schema this table was provisioned with
    pub fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// Whether an id is present
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.rows.contains_key(id)
    }

    /// Insert a new record; caller has already checked the id is absent
    pub fn insert(&mut self, id: DocumentId, record: DocumentRecord) {
        debug_assert!(!self.rows.contains_key(&id));
        if let (Some(index), Some(value)) = (self.secondary.as_mut(), record.secondary.as_deref()) {
            index.insert(value, id.clone());
        }
        self.rows.insert(id, record);
    }

    /// Overwrite the payload of an existing record
    ///
    /// The secondary value (and so the index) is deliberately untouched:
    /// the indexed attribute is fixed at creation time.
    pub fn replace_payload(&mut self, id: &DocumentId, payload: Payload) -> bool {
        match self.rows.get_mut(id) {
            Some(record) => {
                record.payload = payload;
                true
            }
            None => false,
        }
    }

    /// Remove a record, unhooking its index entry
    pub fn remove(&mut self, id: &DocumentId) -> Option<DocumentRecord> {
        let record = self.rows.remove(id)?;
        if let (Some(index), Some(value)) = (self.secondary.as_mut(), record.secondary.as_deref()) {
            index.remove(value, id);
        }
        Some(record)
    }

    /// Record for an id, if present
    pub fn get(&self, id: &DocumentId) -> Option<&DocumentRecord> {
        self.rows.get(id)
    }

    /// Every id in the table, in key order
    pub fn ids(&self) -> Vec<DocumentId> {
        self.rows.keys().cloned().collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Payloads of every record whose secondary value equals `value`
    ///
    /// Returns `None` when the table has no secondary index; the store's
    /// typed surface makes that unreachable for callers.
    pub fn find_by_secondary(&self, value: &str) -> Option<Vec<Payload>> {
        let index = self.secondary.as_ref()?;
        let payloads = match index.get(value) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.rows.get(id).map(|r| r.payload.clone()))
                .collect(),
            None => Vec::new(),
        };
        Some(payloads)
    }
}

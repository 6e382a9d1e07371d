//! Collection schemas
//!
//! A `CollectionSchema` is the static description of one logical collection:
//! its kind and, for indexed collections, the name of the secondary column.
//! Schemas are fixed for the process lifetime; the only configurable piece is
//! the profile secondary column name, supplied by configuration at startup.
//! Collection and column names are never derived from request input.

use crate::types::DocKind;

/// Default name for the profile secondary index column
pub const DEFAULT_PROFILE_COLUMN: &str = "profile-mnemonic";

/// Static description of one logical collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    kind: DocKind,
    secondary_column: Option<String>,
}

impl CollectionSchema {
    /// Schema for an unindexed collection
    pub fn plain(kind: DocKind) -> Self {
        Self {
            kind,
            secondary_column: None,
        }
    }

    /// Schema for a collection with a secondary index column
    pub fn indexed(kind: DocKind, column: impl Into<String>) -> Self {
        Self {
            kind,
            secondary_column: Some(column.into()),
        }
    }

    /// The document kind this collection stores
    pub fn kind(&self) -> DocKind {
        self.kind
    }

    /// Collection name (stable, compile-time)
    pub fn name(&self) -> &'static str {
        self.kind.collection_name()
    }

    /// Secondary column name, present iff the collection is indexed
    pub fn secondary_column(&self) -> Option<&str> {
        self.secondary_column.as_deref()
    }
}

/// The full, fixed set of collection schemas, one per document kind
///
/// Built once at startup. `SchemaSet::with_defaults()` uses
/// [`DEFAULT_PROFILE_COLUMN`]; `SchemaSet::new` takes the configured column
/// name for the profile index.
#[derive(Debug, Clone)]
pub struct SchemaSet {
    schemas: Vec<CollectionSchema>,
}

impl SchemaSet {
    /// Build the schema set with a configured profile column name
    pub fn new(profile_column: impl Into<String>) -> Self {
        let profile_column = profile_column.into();
        let schemas = DocKind::ALL
            .iter()
            .map(|&kind| {
                if kind.has_secondary_index() {
                    CollectionSchema::indexed(kind, profile_column.clone())
                } else {
                    CollectionSchema::plain(kind)
                }
            })
            .collect();
        Self { schemas }
    }

    /// Build the schema set with the default profile column name
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PROFILE_COLUMN)
    }

    /// Look up the schema for a kind
    pub fn schema(&self, kind: DocKind) -> &CollectionSchema {
        // DocKind::ALL covers every variant, so the lookup cannot miss.
        self.schemas
            .iter()
            .find(|s| s.kind() == kind)
            .unwrap_or_else(|| unreachable!("schema set covers all kinds"))
    }

    /// Iterate over all schemas in collection order
    pub fn iter(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.schemas.iter()
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

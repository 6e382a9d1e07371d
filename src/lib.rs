//! oxp - Embedded document store for the OSCAL exchange service
//!
//! The store persists OSCAL documents (catalogs, profiles, component
//! definitions, system security plans, assessment plans, assessment results,
//! plans of action and milestones) keyed by caller-assigned ids, with an
//! equality-searchable mnemonic index on profiles.
//!
//! # Quick Start
//!
//! ```ignore
//! use oxp::{kinds, Config, DocumentStore, SchemaSet};
//!
//! // Open a disk-backed store (or `DocumentStore::ephemeral()` for tests)
//! let store = DocumentStore::open("oxp-data", SchemaSet::with_defaults())?;
//!
//! let id = store.add::<kinds::Catalog>(catalog_uuid, catalog_json)?;
//! let payload = store.get::<kinds::Catalog>(id)?;
//! ```
//!
//! # Architecture
//!
//! Collections are provisioned lazily, one per document kind; every mutation
//! is committed to the append-only log before it becomes visible; outcomes
//! resolve to the three-way taxonomy in [`StoreError`]. The transport
//! adapter, OSCAL parsing, and authentication live outside this crate.

pub use oxp_api::{Config, SearchFacade, CONFIG_FILE_NAME};
pub use oxp_core::{
    kinds, CollectionSchema, DocKind, DocumentId, DocumentKind, DocumentRecord, Fault, IndexedKind,
    Payload, SchemaSet, StoreError, StoreResult, DEFAULT_PROFILE_COLUMN,
};
pub use oxp_storage::{DocumentStore, LOCK_FILE_NAME, LOG_FILE_NAME};

//! Core types for the OSCAL exchange document store
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentId / Payload / DocumentRecord: the stored unit
//! - DocKind: discriminator for the seven document kinds
//! - DocumentKind / IndexedKind: compile-time kind markers
//! - CollectionSchema / SchemaSet: static collection descriptions
//! - StoreError / Fault: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kind;
pub mod schema;
pub mod types;

pub use error::{Fault, StoreError, StoreResult};
pub use kind::{kinds, DocumentKind, IndexedKind};
pub use schema::{CollectionSchema, SchemaSet, DEFAULT_PROFILE_COLUMN};
pub use types::{DocKind, DocumentId, DocumentRecord, Payload};

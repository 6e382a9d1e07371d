//! Search facade
//!
//! Read-only projection over the store's secondary-index primitive. Every
//! facade call desugars to exactly one store call; there is no caching,
//! filtering, or ranking here. The facade exists because profile search is
//! the one store capability consumed outside plain CRUD: the validation
//! workflow uses it to find the profiles tagged for a component.

use oxp_core::{kinds, Payload, StoreResult};
use oxp_storage::DocumentStore;
use tracing::debug;

/// Read-only search surface over the document store
#[derive(Debug, Clone)]
pub struct SearchFacade {
    store: DocumentStore,
}

impl SearchFacade {
    /// Wrap a store handle
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All profile payloads whose mnemonic equals `mnemonic`
    ///
    /// Order is unspecified; no match yields an empty vec.
    pub fn profiles_with_mnemonic(&self, mnemonic: &str) -> StoreResult<Vec<Payload>> {
        let hits = self.store.find_by_secondary::<kinds::Profile>(mnemonic)?;
        debug!(mnemonic, hits = hits.len(), "profile search");
        Ok(hits)
    }
}

//! Typed document-kind markers
//!
//! Zero-sized marker types, one per document kind, tie store operations to a
//! kind at compile time. The `IndexedKind` subtrait marks the kinds whose
//! collections carry a secondary index; operations that touch the index
//! (`add_with_secondary`, `find_by_secondary`) are bounded on it, so calling
//! them for an unindexed kind is a type error rather than a runtime fault.

use crate::types::DocKind;

/// A document kind known at compile time
///
/// Implemented only by the marker types in [`kinds`]. `KIND` is the runtime
/// discriminator used for registry lookup and the commit-log format.
pub trait DocumentKind {
    /// Runtime discriminator for this kind
    const KIND: DocKind;
}

/// A document kind whose collection carries a secondary index
///
/// Only [`kinds::Profile`] implements this; its index column holds the
/// profile mnemonic.
pub trait IndexedKind: DocumentKind {}

/// Marker types for the seven document kinds
pub mod kinds {
    use super::{DocKind, DocumentKind, IndexedKind};

    /// Marker for OSCAL catalogs
    #[derive(Debug, Clone, Copy)]
    pub struct Catalog;

    /// Marker for OSCAL profiles
    #[derive(Debug, Clone, Copy)]
    pub struct Profile;

    /// Marker for OSCAL component definitions
    #[derive(Debug, Clone, Copy)]
    pub struct ComponentDefinition;

    /// Marker for OSCAL system security plans
    #[derive(Debug, Clone, Copy)]
    pub struct SystemSecurityPlan;

    /// Marker for OSCAL assessment plans
    #[derive(Debug, Clone, Copy)]
    pub struct AssessmentPlan;

    /// Marker for OSCAL assessment results
    #[derive(Debug, Clone, Copy)]
    pub struct AssessmentResults;

    /// Marker for OSCAL plans of action and milestones
    #[derive(Debug, Clone, Copy)]
    pub struct PlanOfActionAndMilestones;

    impl DocumentKind for Catalog {
        const KIND: DocKind = DocKind::Catalog;
    }

    impl DocumentKind for Profile {
        const KIND: DocKind = DocKind::Profile;
    }

    impl DocumentKind for ComponentDefinition {
        const KIND: DocKind = DocKind::ComponentDefinition;
    }

    impl DocumentKind for SystemSecurityPlan {
        const KIND: DocKind = DocKind::SystemSecurityPlan;
    }

    impl DocumentKind for AssessmentPlan {
        const KIND: DocKind = DocKind::AssessmentPlan;
    }

    impl DocumentKind for AssessmentResults {
        const KIND: DocKind = DocKind::AssessmentResults;
    }

    impl DocumentKind for PlanOfActionAndMilestones {
        const KIND: DocKind = DocKind::PlanOfActionAndMilestones;
    }

    impl IndexedKind for Profile {}
}

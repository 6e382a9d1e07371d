//! Core types for the document store
//!
//! This module defines the foundational types:
//! - DocumentId: caller-assigned identifier, unique within a collection
//! - Payload: opaque serialized document bytes
//! - DocKind: discriminator for the seven OSCAL document kinds
//! - DocumentRecord: one stored unit (payload + optional secondary value)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque serialized document content. The store never inspects it.
pub type Payload = Vec<u8>;

/// Caller-assigned identifier for a stored document
///
/// Ids are opaque strings, unique within their collection. The store never
/// generates ids; the transport adapter derives them from the document's own
/// identifier before calling in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a DocumentId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document kind discriminator
///
/// One variant per logical collection. The discriminant values are part of
/// the on-disk commit-log format and MUST NOT change:
/// - Catalog = 0x01
/// - Profile = 0x02
/// - ComponentDefinition = 0x03
/// - SystemSecurityPlan = 0x04
/// - AssessmentPlan = 0x05
/// - AssessmentResults = 0x06
/// - PlanOfActionAndMilestones = 0x07
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum DocKind {
    /// OSCAL catalog
    Catalog = 0x01,
    /// OSCAL profile (carries the mnemonic secondary index)
    Profile = 0x02,
    /// OSCAL component definition
    ComponentDefinition = 0x03,
    /// OSCAL system security plan
    SystemSecurityPlan = 0x04,
    /// OSCAL assessment plan
    AssessmentPlan = 0x05,
    /// OSCAL assessment results
    AssessmentResults = 0x06,
    /// OSCAL plan of action and milestones
    PlanOfActionAndMilestones = 0x07,
}

impl DocKind {
    /// All document kinds, in collection order
    pub const ALL: [DocKind; 7] = [
        DocKind::Catalog,
        DocKind::Profile,
        DocKind::ComponentDefinition,
        DocKind::SystemSecurityPlan,
        DocKind::AssessmentPlan,
        DocKind::AssessmentResults,
        DocKind::PlanOfActionAndMilestones,
    ];

    /// Stable collection name, used for logging and the persisted layout
    pub fn collection_name(&self) -> &'static str {
        match self {
            DocKind::Catalog => "catalogs",
            DocKind::Profile => "profiles",
            DocKind::ComponentDefinition => "component-definitions",
            DocKind::SystemSecurityPlan => "system-security-plans",
            DocKind::AssessmentPlan => "assessment-plans",
            DocKind::AssessmentResults => "assessment-results",
            DocKind::PlanOfActionAndMilestones => "plans-of-action-and-milestones",
        }
    }

    /// Whether this kind's collection carries a secondary index column
    pub fn has_secondary_index(&self) -> bool {
        matches!(self, DocKind::Profile)
    }

    /// Convert to byte representation
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }

    /// Try to create from byte
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(DocKind::Catalog),
            0x02 => Some(DocKind::Profile),
            0x03 => Some(DocKind::ComponentDefinition),
            0x04 => Some(DocKind::SystemSecurityPlan),
            0x05 => Some(DocKind::AssessmentPlan),
            0x06 => Some(DocKind::AssessmentResults),
            0x07 => Some(DocKind::PlanOfActionAndMilestones),
            _ => None,
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection_name())
    }
}

/// One stored unit within a collection
///
/// The payload is the full serialized document; the secondary value, when
/// present, is the indexed attribute extracted by the caller at creation
/// time. It is set once at creation and never changed by `replace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque serialized document content
    pub payload: Payload,
    /// Indexed attribute value, present only in collections with a
    /// secondary index
    pub secondary: Option<String>,
}

impl DocumentRecord {
    /// Create a record without a secondary value
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            secondary: None,
        }
    }

    /// Create a record with a secondary value
    pub fn with_secondary(payload: Payload, secondary: impl Into<String>) -> Self {
        Self {
            payload,
            secondary: Some(secondary.into()),
        }
    }
}

//! Classification report contracts.
//!
//! One `Diagnostics` variant per `Status`; each variant carries its own
//! named fields, so consumers never depend on positional order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::address::{RegistryAddress, RegistryId, Suburb, TargetAddress, TargetFeatureId};

/// Closed set of outcomes. Ordering is the report's key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Perfect,
    ExistsButWrongData,
    ExistsButNoLinzRef,
    MultipleExistButNoLinzRef,
    MultipleExist,
    ExistsButLocationWrong,
    TotallyMissing,
    NeedsDelete,
    NeedsDeleteNonTrivial,
    NeedsDeleteOnBuilding,
    Corrupt,
    LinzRefChanged,
    CouldBeStacked,
    ReplacedByBuilding,
}

impl Status {
    pub const ALL: [Status; 14] = [
        Status::Perfect,
        Status::ExistsButWrongData,
        Status::ExistsButNoLinzRef,
        Status::MultipleExistButNoLinzRef,
        Status::MultipleExist,
        Status::ExistsButLocationWrong,
        Status::TotallyMissing,
        Status::NeedsDelete,
        Status::NeedsDeleteNonTrivial,
        Status::NeedsDeleteOnBuilding,
        Status::Corrupt,
        Status::LinzRefChanged,
        Status::CouldBeStacked,
        Status::ReplacedByBuilding,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Perfect => "PERFECT",
            Status::ExistsButWrongData => "EXISTS_BUT_WRONG_DATA",
            Status::ExistsButNoLinzRef => "EXISTS_BUT_NO_LINZ_REF",
            Status::MultipleExistButNoLinzRef => "MULTIPLE_EXIST_BUT_NO_LINZ_REF",
            Status::MultipleExist => "MULTIPLE_EXIST",
            Status::ExistsButLocationWrong => "EXISTS_BUT_LOCATION_WRONG",
            Status::TotallyMissing => "TOTALLY_MISSING",
            Status::NeedsDelete => "NEEDS_DELETE",
            Status::NeedsDeleteNonTrivial => "NEEDS_DELETE_NON_TRIVIAL",
            Status::NeedsDeleteOnBuilding => "NEEDS_DELETE_ON_BUILDING",
            Status::Corrupt => "CORRUPT",
            Status::LinzRefChanged => "LINZ_REF_CHANGED",
            Status::CouldBeStacked => "COULD_BE_STACKED",
            Status::ReplacedByBuilding => "REPLACED_BY_BUILDING",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate confidence tier. Declared weakest first so `Ord` ranks
/// `Certain` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Normal,
    HighButMultiple,
    Certain,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Normal => write!(f, "Normal"),
            Confidence::HighButMultiple => write!(f, "HighButMultiple"),
            Confidence::Certain => write!(f, "Certain"),
        }
    }
}

/// One disagreeing field between a registry record and its target feature.
/// `expected` is the registry value, `actual` what the map currently shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum AttributeIssue {
    Housenumber {
        expected: String,
        actual: Option<String>,
    },
    HousenumberAlt {
        expected: Option<String>,
        actual: Option<String>,
    },
    Street {
        expected: String,
        actual: Option<String>,
    },
    StreetAlt {
        expected: String,
        actual: Option<String>,
    },
    Suburb {
        expected: Suburb,
        actual: Option<Suburb>,
    },
    Town {
        expected: String,
        actual: Option<String>,
    },
    Water {
        expected: bool,
    },
    FlatCount {
        expected: Option<u32>,
        actual: Option<u32>,
    },
    Level {
        expected: Option<String>,
        actual: Option<String>,
    },
    AltRefs {
        expected: Vec<RegistryId>,
        actual: Vec<RegistryId>,
    },
    /// Feature carries both a suburb and a hamlet tag.
    DoubleSuburb,
}

impl AttributeIssue {
    pub fn field_name(&self) -> &'static str {
        match self {
            AttributeIssue::Housenumber { .. } => "housenumber",
            AttributeIssue::HousenumberAlt { .. } => "housenumber_alt",
            AttributeIssue::Street { .. } => "street",
            AttributeIssue::StreetAlt { .. } => "street_alt",
            AttributeIssue::Suburb { .. } => "suburb",
            AttributeIssue::Town { .. } => "town",
            AttributeIssue::Water { .. } => "water",
            AttributeIssue::FlatCount { .. } => "flat_count",
            AttributeIssue::Level { .. } => "level",
            AttributeIssue::AltRefs { .. } => "alt_refs",
            AttributeIssue::DoubleSuburb => "double_suburb",
        }
    }
}

/// Status-specific payload for a report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Diagnostics {
    Perfect {
        target_id: Option<TargetFeatureId>,
    },
    ExistsButWrongData {
        suburb: Suburb,
        target_id: TargetFeatureId,
        issues: Vec<AttributeIssue>,
        /// Someone other than the importer touched the feature.
        needs_review: bool,
    },
    ExistsButNoLinzRef {
        suburb: Suburb,
        confidence: Confidence,
        target: TargetAddress,
    },
    MultipleExistButNoLinzRef {
        suburb: Suburb,
        preferred: TargetAddress,
        candidates: Vec<TargetFeatureId>,
    },
    MultipleExist {
        suburb: Suburb,
        targets: Vec<TargetAddress>,
    },
    ExistsButLocationWrong {
        suburb: Suburb,
        target_id: TargetFeatureId,
        distance_m: f64,
        lat: f64,
        lng: f64,
    },
    TotallyMissing {
        suburb: Suburb,
        registry: RegistryAddress,
    },
    NeedsDelete {
        suburb: Option<Suburb>,
        target: TargetAddress,
    },
    NeedsDeleteNonTrivial {
        suburb: Option<Suburb>,
        target: TargetAddress,
    },
    NeedsDeleteOnBuilding {
        suburb: Option<Suburb>,
        target: TargetAddress,
    },
    Corrupt {
        suburb: Suburb,
        target: TargetAddress,
    },
    LinzRefChanged {
        suburb: Suburb,
        new_id: RegistryId,
        target: TargetAddress,
        registry: RegistryAddress,
    },
    CouldBeStacked {
        suburb: Suburb,
        stack_id: RegistryId,
        /// `"{mapped}+{unmapped}"` member counts.
        summary: String,
        target_id: TargetFeatureId,
    },
    ReplacedByBuilding {
        suburb: Suburb,
        target_id: TargetFeatureId,
        building: TargetAddress,
    },
}

impl Diagnostics {
    pub fn status(&self) -> Status {
        match self {
            Diagnostics::Perfect { .. } => Status::Perfect,
            Diagnostics::ExistsButWrongData { .. } => Status::ExistsButWrongData,
            Diagnostics::ExistsButNoLinzRef { .. } => Status::ExistsButNoLinzRef,
            Diagnostics::MultipleExistButNoLinzRef { .. } => Status::MultipleExistButNoLinzRef,
            Diagnostics::MultipleExist { .. } => Status::MultipleExist,
            Diagnostics::ExistsButLocationWrong { .. } => Status::ExistsButLocationWrong,
            Diagnostics::TotallyMissing { .. } => Status::TotallyMissing,
            Diagnostics::NeedsDelete { .. } => Status::NeedsDelete,
            Diagnostics::NeedsDeleteNonTrivial { .. } => Status::NeedsDeleteNonTrivial,
            Diagnostics::NeedsDeleteOnBuilding { .. } => Status::NeedsDeleteOnBuilding,
            Diagnostics::Corrupt { .. } => Status::Corrupt,
            Diagnostics::LinzRefChanged { .. } => Status::LinzRefChanged,
            Diagnostics::CouldBeStacked { .. } => Status::CouldBeStacked,
            Diagnostics::ReplacedByBuilding { .. } => Status::ReplacedByBuilding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: RegistryId,
    pub diagnostics: Diagnostics,
}

/// Engine output: every status with its ordered entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConflationReport {
    pub entries: BTreeMap<Status, Vec<ReportEntry>>,
}

impl ConflationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: RegistryId, diagnostics: Diagnostics) {
        self.entries
            .entry(diagnostics.status())
            .or_default()
            .push(ReportEntry { id, diagnostics });
    }

    pub fn count(&self, status: Status) -> usize {
        self.entries.get(&status).map_or(0, Vec::len)
    }

    pub fn get(&self, status: Status) -> &[ReportEntry] {
        self.entries.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Classifier status of a registry ID. Advisory `CouldBeStacked`
    /// entries are skipped.
    pub fn status_of(&self, id: &str) -> Option<Status> {
        self.entries
            .iter()
            .filter(|(status, _)| **status != Status::CouldBeStacked)
            .find(|(_, entries)| entries.iter().any(|entry| entry.id == id))
            .map(|(status, _)| *status)
    }

    pub fn entry_for(&self, status: Status, id: &str) -> Option<&Diagnostics> {
        self.get(status)
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.diagnostics)
    }

    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

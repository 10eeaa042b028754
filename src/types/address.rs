//! Address records from both sides of the conflation.
//!
//! `RegistryAddress` is the authoritative record; `TargetAddress` is an
//! address-tagged feature from the crowd-sourced map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque key into the registry map. Stack records use a `stack(...)` or
/// `stack[...]` key produced by the stack codec.
pub type RegistryId = String;

/// Whether a suburb/locality is urban or rural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuburbKind {
    #[serde(rename = "U")]
    Urban,
    #[serde(rename = "R")]
    Rural,
}

/// A suburb tag: its kind plus the locality name, e.g. `["U", "Te Aro"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Suburb(pub SuburbKind, pub String);

impl Suburb {
    pub fn urban(name: &str) -> Self {
        Self(SuburbKind::Urban, name.to_string())
    }

    pub fn rural(name: &str) -> Self {
        Self(SuburbKind::Rural, name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for Suburb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            SuburbKind::Urban => write!(f, "U:{}", self.1),
            SuburbKind::Rural => write!(f, "R:{}", self.1),
        }
    }
}

/// A registry record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryAddress {
    pub lat: f64,
    pub lng: f64,
    /// Full house number, e.g. `12`, `12A`, `3/12`.
    pub housenumber: String,
    /// Numeric root used for grouping flats (`12` for all of the above).
    pub housenumber_msb: String,
    pub street: String,
    pub suburb: Suburb,
    pub town: String,
    #[serde(default)]
    pub water: bool,
    /// Present only on stack records.
    #[serde(default)]
    pub flat_count: Option<u32>,
    #[serde(default)]
    pub level: Option<String>,
    /// Alternate house number, set by manual overrides or alternate merges.
    #[serde(default)]
    pub housenumber_alt: Option<String>,
    /// Manual stacking override: `Some(true)` requests a stack,
    /// `Some(false)` keeps the flat separate.
    #[serde(default)]
    pub stack_request: Option<bool>,
    /// Cadastral parcel this address sits on.
    #[serde(default)]
    pub parcel_id: Option<String>,
}

impl RegistryAddress {
    /// A flat is any record whose number differs from its parent number.
    pub fn is_flat(&self) -> bool {
        self.housenumber != self.housenumber_msb
    }

    pub fn is_stack(&self) -> bool {
        self.flat_count.is_some()
    }
}

/// Geometry type of a map feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    Point,
    Line,
    Area,
}

impl FeatureKind {
    fn prefix(self) -> char {
        match self {
            FeatureKind::Point => 'n',
            FeatureKind::Line => 'w',
            FeatureKind::Area => 'r',
        }
    }
}

/// Map feature identifier, written `n123` / `w123` / `r123`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetFeatureId {
    pub kind: FeatureKind,
    pub number: i64,
}

impl TargetFeatureId {
    pub fn new(kind: FeatureKind, number: i64) -> Self {
        Self { kind, number }
    }

    /// Buildings are mapped as lines (closed ways) or areas.
    pub fn is_building_like(&self) -> bool {
        self.kind != FeatureKind::Point
    }
}

impl fmt::Display for TargetFeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

impl FromStr for TargetFeatureId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('n') => FeatureKind::Point,
            Some('w') => FeatureKind::Line,
            Some('r') => FeatureKind::Area,
            _ => return Err(format!("Invalid feature id: {s:?}")),
        };
        let number = chars
            .as_str()
            .parse::<i64>()
            .map_err(|e| format!("Invalid feature id {s:?}: {e}"))?;
        Ok(Self { kind, number })
    }
}

impl TryFrom<String> for TargetFeatureId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetFeatureId> for String {
    fn from(value: TargetFeatureId) -> Self {
        value.to_string()
    }
}

/// Verification state of a target feature (`check_date`-style tagging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckedState {
    #[default]
    #[serde(rename = "no")]
    Unchecked,
    /// Surveyed recently; the engine leaves these alone.
    Recent,
    Expired,
}

/// An address-tagged feature from the map dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAddress {
    pub id: TargetFeatureId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub housenumber: Option<String>,
    #[serde(default)]
    pub housenumber_alt: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub street_alt: Option<String>,
    #[serde(default)]
    pub suburb: Option<Suburb>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub water: bool,
    /// Carries identifying tags beyond the address (name, shop, amenity...).
    #[serde(default)]
    pub is_non_trivial: bool,
    #[serde(default)]
    pub checked: CheckedState,
    #[serde(default)]
    pub flat_count: Option<u32>,
    #[serde(default)]
    pub stack_request: Option<bool>,
    #[serde(default)]
    pub level: Option<String>,
    /// Last edited by someone other than the import account.
    #[serde(default)]
    pub edited_by_other: bool,
    /// Registry IDs merged onto this feature as alternate addresses.
    #[serde(default)]
    pub alt_refs: Vec<RegistryId>,
    /// Carries both a suburb and a hamlet tag.
    #[serde(default)]
    pub double_suburb: bool,
}

impl TargetAddress {
    pub fn is_point(&self) -> bool {
        self.id.kind == FeatureKind::Point
    }

    /// A plain address point: nothing but address tags on a node.
    pub fn is_simple_point(&self) -> bool {
        self.is_point() && !self.is_non_trivial
    }

    /// True when the feature already carries some alternate-address tagging.
    pub fn has_alternate_tags(&self) -> bool {
        self.housenumber_alt.is_some() || !self.alt_refs.is_empty()
    }
}

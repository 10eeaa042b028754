use std::sync::Once;

use crate::services::conflate::core::spatial::EARTH_RADIUS_M;
use crate::types::address::{
    CheckedState, FeatureKind, RegistryAddress, Suburb, TargetAddress, TargetFeatureId,
};

static INIT: Once = Once::new();

pub const BASE_LAT: f64 = -41.2865;
pub const BASE_LNG: f64 = 174.7762;

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Latitude `metres` north of `lat`.
pub fn north_of(lat: f64, metres: f64) -> f64 {
    lat + metres / (EARTH_RADIUS_M * std::f64::consts::PI / 180.0)
}

/// Root address on Main Street, Town.
pub fn root(housenumber: &str) -> RegistryAddress {
    RegistryAddress {
        lat: BASE_LAT,
        lng: BASE_LNG,
        housenumber: housenumber.to_string(),
        housenumber_msb: housenumber.to_string(),
        street: "Main Street".to_string(),
        suburb: Suburb::urban("Town"),
        town: "City".to_string(),
        water: false,
        flat_count: None,
        level: None,
        housenumber_alt: None,
        stack_request: None,
        parcel_id: None,
    }
}

/// Flat under `parent`, at the same point as its root.
pub fn flat(housenumber: &str, parent: &str) -> RegistryAddress {
    RegistryAddress {
        housenumber_msb: parent.to_string(),
        ..root(housenumber)
    }
}

pub fn point_id(number: i64) -> TargetFeatureId {
    TargetFeatureId::new(FeatureKind::Point, number)
}

pub fn way_id(number: i64) -> TargetFeatureId {
    TargetFeatureId::new(FeatureKind::Line, number)
}

/// Bare import-style address point.
pub fn linked_point(number: i64, housenumber: &str, street: &str) -> TargetAddress {
    TargetAddress {
        id: point_id(number),
        lat: BASE_LAT,
        lng: BASE_LNG,
        housenumber: Some(housenumber.to_string()),
        housenumber_alt: None,
        street: Some(street.to_string()),
        street_alt: None,
        suburb: Some(Suburb::urban("Town")),
        town: None,
        water: false,
        is_non_trivial: false,
        checked: CheckedState::Unchecked,
        flat_count: None,
        stack_request: None,
        level: None,
        edited_by_other: false,
        alt_refs: Vec::new(),
        double_suburb: false,
    }
}

/// Feature that mirrors a registry record exactly.
pub fn mirror(record: &RegistryAddress, id: TargetFeatureId) -> TargetAddress {
    TargetAddress {
        id,
        lat: record.lat,
        lng: record.lng,
        housenumber: Some(record.housenumber.clone()),
        housenumber_alt: record.housenumber_alt.clone(),
        street: Some(record.street.clone()),
        suburb: Some(record.suburb.clone()),
        water: record.water,
        flat_count: record.flat_count,
        level: record.level.clone(),
        ..linked_point(id.number, &record.housenumber, &record.street)
    }
}

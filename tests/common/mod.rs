#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub const LAT: f64 = -41.2865;
pub const LNG: f64 = 174.7762;

/// Degrees of latitude per metre on the mean sphere.
pub fn metres_north(metres: f64) -> f64 {
    LAT + metres / (6_371_008.8 * std::f64::consts::PI / 180.0)
}

pub fn registry_record(housenumber: &str, parent: &str, street: &str) -> Value {
    json!({
        "lat": LAT,
        "lng": LNG,
        "housenumber": housenumber,
        "housenumber_msb": parent,
        "street": street,
        "suburb": ["U", "Town"],
        "town": "City"
    })
}

pub fn target_feature(id: &str, lat: f64, housenumber: &str, street: &str) -> Value {
    json!({
        "id": id,
        "lat": lat,
        "lng": LNG,
        "housenumber": housenumber,
        "street": street,
        "suburb": ["U", "Town"]
    })
}

//! Spherical distance, coordinate keys and region polygons.

use geo::{Contains, Distance, Haversine, LineString, Point, Polygon};
use std::collections::BTreeMap;

/// Mean Earth radius in metres, as used by `geo`'s haversine.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in metres.
pub fn distance_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    Haversine::distance(Point::new(lng1, lat1), Point::new(lng2, lat2))
}

/// Distance rounded to the centimetre. All threshold comparisons use this so
/// a point placed exactly on a threshold does not flip on float noise.
pub fn rounded_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    (distance_between(lat1, lng1, lat2, lng2) * 100.0).round() / 100.0
}

/// Key for coordinates that are effectively the same point.
pub fn coord_key(lat: f64, lng: f64, precision_deg: f64) -> String {
    let lat_step = (lat / precision_deg).round() as i64;
    let lng_step = (lng / precision_deg).round() as i64;
    format!("{lat_step}|{lng_step}")
}

/// Polygon from `[lng, lat]` vertices. The ring may be open or closed.
pub fn polygon_from_vertices(vertices: &[[f64; 2]]) -> Polygon<f64> {
    let ring: LineString<f64> = vertices.iter().map(|&[lng, lat]| (lng, lat)).collect();
    Polygon::new(ring, Vec::new())
}

/// Exterior `[lng, lat]` vertices, closing vertex excluded.
pub fn polygon_vertices(polygon: &Polygon<f64>) -> Vec<[f64; 2]> {
    let mut vertices: Vec<[f64; 2]> = polygon
        .exterior()
        .coords()
        .map(|coord| [coord.x, coord.y])
        .collect();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

/// Interior containment; points on the boundary are outside.
pub fn polygon_contains(polygon: &Polygon<f64>, lat: f64, lng: f64) -> bool {
    polygon.contains(&Point::new(lng, lat))
}

/// Number of registry records sharing each rounded coordinate.
#[derive(Debug, Clone, Default)]
pub struct OverlapIndex {
    counts: BTreeMap<String, usize>,
    precision_deg: f64,
}

impl OverlapIndex {
    pub fn build<I>(points: I, precision_deg: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (lat, lng) in points {
            *counts.entry(coord_key(lat, lng, precision_deg)).or_default() += 1;
        }
        Self {
            counts,
            precision_deg,
        }
    }

    pub fn count(&self, lat: f64, lng: f64) -> usize {
        self.counts
            .get(&coord_key(lat, lng, self.precision_deg))
            .copied()
            .unwrap_or(0)
    }

    /// True when another record sits at the same rounded point.
    pub fn is_overlapping(&self, lat: f64, lng: f64) -> bool {
        self.count(lat, lng) > 1
    }
}

#[cfg(test)]
#[path = "tests/spatial_tests.rs"]
mod tests;

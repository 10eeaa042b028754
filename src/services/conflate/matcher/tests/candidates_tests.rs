use super::*;
use crate::test_utils::{linked_point, north_of, root, way_id};
use crate::types::address::Suburb;

fn feature_at(number: i64, metres_north: f64, suburb: &str) -> TargetAddress {
    let mut feature = linked_point(number, "12", "Main Street");
    feature.lat = north_of(feature.lat, metres_north);
    feature.suburb = Some(Suburb::urban(suburb));
    feature
}

#[test]
fn test_no_address_match_returns_empty() {
    let features = vec![linked_point(1, "14", "Main Street")];
    let pool = CandidatePool::new(&features);
    assert!(pool.find(&root("12"), 200.0).is_empty());
}

#[test]
fn test_features_without_address_are_not_indexed() {
    let mut feature = linked_point(1, "12", "Main Street");
    feature.street = None;
    let features = vec![feature];
    let pool = CandidatePool::new(&features);
    assert!(pool.is_empty());
}

#[test]
fn test_unique_suburb_match_is_certain_even_when_farther() {
    let features = vec![feature_at(1, 150.0, "Town"), feature_at(2, 5.0, "Elsewhere")];
    let pool = CandidatePool::new(&features);

    let found = pool.find(&root("12"), 200.0);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].confidence, Confidence::Certain);
    assert_eq!(found[0].target.id.number, 1);
    assert_eq!(found[0].distance_m, 150.0);
}

#[test]
fn test_unique_suburb_match_ignores_radius() {
    let features = vec![feature_at(1, 900.0, "Town")];
    let pool = CandidatePool::new(&features);
    let found = pool.find(&root("12"), 200.0);
    assert_eq!(found[0].confidence, Confidence::Certain);
}

#[test]
fn test_other_suburb_matches_are_normal_and_sorted() {
    let features = vec![
        feature_at(1, 120.0, "Elsewhere"),
        feature_at(2, 30.0, "Elsewhere"),
        feature_at(3, 250.0, "Elsewhere"),
    ];
    let pool = CandidatePool::new(&features);

    let found = pool.find(&root("12"), 200.0);

    let ids: Vec<i64> = found.iter().map(|c| c.target.id.number).collect();
    assert_eq!(ids, vec![2, 1]);
    assert!(found.iter().all(|c| c.confidence == Confidence::Normal));
}

#[test]
fn test_several_suburb_matches_are_high_but_multiple_first() {
    let features = vec![
        feature_at(1, 5.0, "Elsewhere"),
        feature_at(2, 80.0, "Town"),
        feature_at(3, 40.0, "Town"),
    ];
    let pool = CandidatePool::new(&features);

    let found = pool.find(&root("12"), 200.0);

    let ranked: Vec<(i64, Confidence)> = found
        .iter()
        .map(|c| (c.target.id.number, c.confidence))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (3, Confidence::HighButMultiple),
            (2, Confidence::HighButMultiple),
            (1, Confidence::Normal),
        ]
    );
}

#[test]
fn test_equal_distance_breaks_tie_by_feature_id() {
    let features = vec![feature_at(9, 10.0, "Elsewhere"), feature_at(4, 10.0, "Elsewhere")];
    let pool = CandidatePool::new(&features);
    let found = pool.find(&root("12"), 200.0);
    assert_eq!(found[0].target.id.number, 4);
}

#[test]
fn test_building_pool_skips_points() {
    let mut building = linked_point(2, "12", "Main Street");
    building.id = way_id(2);
    let features = vec![linked_point(1, "12", "Main Street"), building];

    let pool = CandidatePool::buildings(&features);

    assert_eq!(pool.len(), 1);
    let found = pool.find(&root("12"), 200.0);
    assert_eq!(found[0].target.id, way_id(2));
}

#[test]
fn test_preferred_picks_building_or_non_trivial() {
    let plain = Candidate {
        target: linked_point(1, "12", "Main Street"),
        confidence: Confidence::Normal,
        distance_m: 1.0,
    };
    let mut shop = plain.clone();
    shop.target.id = crate::test_utils::point_id(2);
    shop.target.is_non_trivial = true;

    let candidates = vec![plain.clone(), shop];
    assert_eq!(preferred(&candidates).unwrap().target.id.number, 2);
    assert_eq!(preferred(&[plain]).unwrap().target.id.number, 1);
    assert!(preferred(&[]).is_none());
}

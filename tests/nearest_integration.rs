use geomark_rs::distance::{haversine_between, law_of_cosines_between};
use geomark_rs::{find_nearest, find_nearest_checked, Coordinate, GeoMarking, GeomarkError, Meters};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use test_utils::shared::{assert_within, city_markings, random_coordinate};

#[test]
fn nearest_to_a_point_just_off_the_origin() {
    let candidates = vec![
        Coordinate::new_unchecked(0.0, 0.0),
        Coordinate::new_unchecked(1.0, 1.0),
        Coordinate::new_unchecked(-1.0, -1.0),
    ];
    let reference = Coordinate::new_unchecked(0.1, 0.1);

    let result = find_nearest(&candidates, &reference, haversine_between);
    assert_eq!(result.nearest, Some(&candidates[0]));
    assert_within(result.distance.value(), 15_700.0, 100.0, "distance to origin");
}

#[test]
fn markings_are_carried_through_unchanged() {
    let markings = city_markings(Uuid::new_v4());
    let oakland = Coordinate::new_unchecked(37.8044, -122.2712);

    let result = find_nearest_checked(&markings, &oakland, haversine_between).unwrap();
    let nearest = result.nearest.expect("a marking should be selected");
    assert!(std::ptr::eq(nearest, &markings[0]));
    assert_eq!(nearest.name, "San Francisco");
    assert!(result.distance < Meters(20_000.0));
}

#[test]
fn tie_goes_to_the_first_candidate() {
    let tenant = Uuid::new_v4();
    let markings = vec![
        GeoMarking::new(tenant, "north", Coordinate::new_unchecked(1.0, 0.0)),
        GeoMarking::new(tenant, "south", Coordinate::new_unchecked(-1.0, 0.0)),
    ];
    let equator = Coordinate::new_unchecked(0.0, 0.0);

    let result = find_nearest(&markings, &equator, haversine_between);
    assert_eq!(result.nearest.map(|m| m.name.as_str()), Some("north"));

    let result = find_nearest(&markings, &equator, law_of_cosines_between);
    assert_eq!(result.nearest.map(|m| m.name.as_str()), Some("north"));
}

#[test]
fn empty_candidates() {
    let markings: Vec<GeoMarking> = Vec::new();
    let result = find_nearest(&markings, &Coordinate::new_unchecked(10.0, 10.0), haversine_between);
    assert!(result.nearest.is_none());
    assert!(result.distance.value().is_infinite());
}

#[test]
fn selection_matches_brute_force_minimum() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let candidates: Vec<Coordinate> = (0..25).map(|_| random_coordinate(&mut rng)).collect();
        let reference = random_coordinate(&mut rng);

        let result = find_nearest(&candidates, &reference, haversine_between);
        let minimum = candidates
            .iter()
            .map(|c| haversine_between(&reference, c).value())
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.distance.value(), minimum);

        let first_at_minimum = candidates
            .iter()
            .position(|c| haversine_between(&reference, c).value() == minimum);
        assert_eq!(
            result.nearest.map(|n| n as *const Coordinate),
            first_at_minimum.map(|i| &candidates[i] as *const Coordinate)
        );
    }
}

#[test]
fn checked_selection_rejects_bad_reference() {
    let markings = city_markings(Uuid::new_v4());
    let result = find_nearest_checked(&markings, &Coordinate::new_unchecked(0.0, 181.0), haversine_between);
    assert!(matches!(result, Err(GeomarkError::InvalidCoordinate { .. })));
}

use chrono::Local;
use geomark_rs::attendance::EmployeeRef;
use geomark_rs::{
    plan_mark_in, plan_mark_out, Coordinate, DistanceModel, GeomarkError, MarkPolicy, MarkStatus,
    Meters,
};
use uuid::Uuid;

use test_utils::initialize_logger_once;
use test_utils::shared::city_markings;

fn employee() -> EmployeeRef {
    EmployeeRef {
        tenant_id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
    }
}

#[test]
fn a_full_day_in_and_out() {
    initialize_logger_once();
    let who = employee();
    let markings = city_markings(who.tenant_id);
    let at_the_office = Coordinate::new(34.0525, -118.2440).unwrap();
    let policy = MarkPolicy::default();

    let morning = plan_mark_in(&who, None, &markings, &at_the_office, &policy, Local::now().naive_local())
        .expect("mark-in near a registered location should be allowed");
    assert_eq!(morning.place.map(|m| m.name.as_str()), Some("Los Angeles"));
    let last = Some(morning.draft.status);

    assert!(matches!(
        plan_mark_in(&who, last, &markings, &at_the_office, &policy, Local::now().naive_local()),
        Err(GeomarkError::AlreadyMarkedIn)
    ));

    let evening = plan_mark_out(&who, last, &markings, &at_the_office, &policy, Local::now().naive_local())
        .expect("mark-out after mark-in should be allowed");
    assert_eq!(evening.draft.status, MarkStatus::Out);
    assert_eq!(evening.draft.geo_marking_id, morning.draft.geo_marking_id);

    assert!(matches!(
        plan_mark_out(
            &who,
            Some(evening.draft.status),
            &markings,
            &at_the_office,
            &policy,
            Local::now().naive_local()
        ),
        Err(GeomarkError::NotMarkedIn)
    ));
}

#[test]
fn drafts_serialize_for_the_backend() {
    let who = employee();
    let markings = city_markings(who.tenant_id);
    let here = Coordinate::new(47.6065, -122.3325).unwrap();

    let plan = plan_mark_in(
        &who,
        Some(MarkStatus::Out),
        &markings,
        &here,
        &MarkPolicy::default(),
        Local::now().naive_local(),
    )
    .unwrap();

    let json = serde_json::to_value(&plan.draft).unwrap();
    assert_eq!(json["status"], "IN");
    assert_eq!(json["geo_marking_id"], serde_json::json!(markings[2].id));
    assert!(json["distance_from_marking"].as_f64().unwrap() < 100.0);
}

#[test]
fn policy_from_configuration() {
    let policy: MarkPolicy =
        serde_json::from_str(r#"{"model": "law_of_cosines", "max_distance": 500.0}"#).unwrap();
    assert_eq!(policy.model, DistanceModel::LawOfCosines);
    assert!(policy.enforce_radius);
    assert_eq!(policy.max_distance, Some(Meters(500.0)));

    let who = employee();
    let markings = city_markings(who.tenant_id);
    // About 1.1 km from the Seattle marking: inside its radius, outside the fixed limit.
    let here = Coordinate::new(47.6162, -122.3321).unwrap();

    assert!(plan_mark_in(&who, None, &markings, &here, &MarkPolicy::default(), Local::now().naive_local()).is_ok());
    assert!(matches!(
        plan_mark_in(&who, None, &markings, &here, &policy, Local::now().naive_local()),
        Err(GeomarkError::OutOfRange { .. })
    ));
}

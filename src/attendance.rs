// src/attendance.rs

//! Mark-in / mark-out decisions.
//!
//! These functions decide whether an employee may mark attendance and build the record
//! to store, given the employee's last status for the day and the tenant's registered
//! markings. Fetching that state and persisting the draft is left to the caller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::distance::DistanceModel;
use crate::error::GeomarkError;
use crate::geomarking::GeoMarking;
use crate::nearest::find_nearest_checked;
use crate::types::{Coordinate, Meters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkStatus {
    In,
    Out,
}

/// Identifies the employee on whose behalf a mark is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
}

/// An attendance record ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDraft {
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub geo_marking_id: Option<Uuid>,
    pub distance_from_marking: Meters,
    pub status: MarkStatus,
}

/// A successful marking decision: the record plus the marking it was matched to.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPlan<'a> {
    pub draft: AttendanceDraft,
    pub place: Option<&'a GeoMarking>,
}

/// How far from the nearest marking an employee may be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkPolicy {
    /// Model used to measure the distance to each marking.
    #[serde(default)]
    pub model: DistanceModel,
    /// Require the employee to be inside the nearest marking's own radius.
    #[serde(default = "default_enforce_radius")]
    pub enforce_radius: bool,
    /// A fixed limit that takes precedence over the marking radius.
    #[serde(default)]
    pub max_distance: Option<Meters>,
}

fn default_enforce_radius() -> bool {
    true
}

impl Default for MarkPolicy {
    fn default() -> Self {
        MarkPolicy {
            model: DistanceModel::Haversine,
            enforce_radius: default_enforce_radius(),
            max_distance: None,
        }
    }
}

impl MarkPolicy {
    /// Accepts any distance; only the nearest marking is recorded.
    pub fn unrestricted() -> Self {
        MarkPolicy {
            enforce_radius: false,
            ..MarkPolicy::default()
        }
    }

    /// The permitted distance to `marking`, or `None` when unrestricted.
    pub fn allowed_for(&self, marking: &GeoMarking) -> Option<Meters> {
        match self.max_distance {
            Some(limit) => Some(limit),
            None if self.enforce_radius => Some(marking.radius_meters),
            None => None,
        }
    }

    fn check<'a>(
        &self,
        marking: &'a GeoMarking,
        distance: Meters,
    ) -> Result<(&'a GeoMarking, Meters), GeomarkError> {
        match self.allowed_for(marking) {
            Some(allowed) if !(distance <= allowed) => Err(GeomarkError::OutOfRange {
                place: marking.name.clone(),
                distance,
                allowed,
            }),
            _ => Ok((marking, distance)),
        }
    }
}

// Nearest active marking under the policy's model, then the policy's distance check.
fn locate<'a>(
    markings: &'a [GeoMarking],
    reference: &Coordinate,
    policy: &MarkPolicy,
) -> Result<Option<(&'a GeoMarking, Meters)>, GeomarkError> {
    let model = policy.model;
    let found = find_nearest_checked(
        markings.iter().filter(|m| m.active),
        reference,
        |a: &Coordinate, b: &Coordinate| model.meters(a, b),
    )?
    .found();

    match found {
        Some((marking, distance)) => {
            log::debug!(
                "Nearest marking '{}' ({}) at {:.1}",
                marking.name,
                marking.id,
                distance
            );
            policy.check(marking, distance).map(Some)
        }
        None => Ok(None),
    }
}

fn draft(
    employee: &EmployeeRef,
    reference: &Coordinate,
    place: Option<(&GeoMarking, Meters)>,
    status: MarkStatus,
    now: NaiveDateTime,
) -> AttendanceDraft {
    AttendanceDraft {
        tenant_id: employee.tenant_id,
        employee_id: employee.employee_id,
        timestamp: now,
        latitude: reference.lat,
        longitude: reference.lon,
        geo_marking_id: place.map(|(m, _)| m.id),
        distance_from_marking: place.map(|(_, d)| d).unwrap_or(Meters(0.0)),
        status,
    }
}

/// Decides a mark-in.
///
/// Fails with `AlreadyMarkedIn` if the last mark today was `In`. When the tenant has no
/// active markings the mark is still accepted, with no marking and a zero distance.
pub fn plan_mark_in<'a>(
    employee: &EmployeeRef,
    last_status: Option<MarkStatus>,
    markings: &'a [GeoMarking],
    reference: &Coordinate,
    policy: &MarkPolicy,
    now: NaiveDateTime,
) -> Result<MarkPlan<'a>, GeomarkError> {
    if last_status == Some(MarkStatus::In) {
        log::info!("Employee {} is already marked in", employee.employee_id);
        return Err(GeomarkError::AlreadyMarkedIn);
    }

    let place = locate(markings, reference, policy)?;
    if place.is_none() {
        log::info!(
            "Tenant {} has no active markings; marking in without a place",
            employee.tenant_id
        );
    }

    Ok(MarkPlan {
        draft: draft(employee, reference, place, MarkStatus::In, now),
        place: place.map(|(m, _)| m),
    })
}

/// Decides a mark-out.
///
/// Fails with `NotMarkedIn` unless the last mark today was `In`, and with
/// `NoRegisteredLocations` if the tenant has no active markings.
pub fn plan_mark_out<'a>(
    employee: &EmployeeRef,
    last_status: Option<MarkStatus>,
    markings: &'a [GeoMarking],
    reference: &Coordinate,
    policy: &MarkPolicy,
    now: NaiveDateTime,
) -> Result<MarkPlan<'a>, GeomarkError> {
    if last_status != Some(MarkStatus::In) {
        log::info!("Employee {} is not marked in", employee.employee_id);
        return Err(GeomarkError::NotMarkedIn);
    }

    let (marking, distance) =
        locate(markings, reference, policy)?.ok_or(GeomarkError::NoRegisteredLocations)?;

    Ok(MarkPlan {
        draft: draft(
            employee,
            reference,
            Some((marking, distance)),
            MarkStatus::Out,
            now,
        ),
        place: Some(marking),
    })
}

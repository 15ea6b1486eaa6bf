// src/employee.rs

use chrono::NaiveDateTime;
use reqwest::Method;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::attendance::MarkStatus;
use crate::client::AttendanceClient;
use crate::distance::haversine_between;
use crate::error::GeomarkError;
use crate::geomarking::GeoMarking;
use crate::nearest::find_nearest_checked;
use crate::types::{Coordinate, Kilometers, Meters};

// The backend reports "no record" as an empty object rather than null.
fn empty_object_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// An attendance record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub tenant_id: Uuid,
    pub employee_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub geo_marking_id: Option<Uuid>,
    /// The backend measures this with the law-of-cosines model, in kilometers.
    pub distance_from_marking: Kilometers,
    pub status: MarkStatus,
}

/// Response to a successful mark-in or mark-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkResponse {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    /// Name of the marking the attendance was matched to.
    #[serde(default)]
    pub place: Option<String>,
}

/// The signed-in employee together with today's attendance state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeState {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    /// Last mark made today.
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub state: Option<AttendanceRecord>,
    /// Marking matched by the last mark.
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub state_near: Option<GeoMarking>,
    /// First mark-in made today.
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub today_in: Option<AttendanceRecord>,
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub today_in_near: Option<GeoMarking>,
    /// Remaining employee fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EmployeeState {
    pub fn last_status(&self) -> Option<MarkStatus> {
        self.state.as_ref().map(|record| record.status)
    }

    pub fn is_marked_in(&self) -> bool {
        self.last_status() == Some(MarkStatus::In)
    }
}

impl AttendanceClient {
    /// Fetches the current employee and today's attendance state.
    pub async fn me(&self) -> Result<EmployeeState, GeomarkError> {
        self._request(Method::GET, "employee/me", None::<&Value>)
            .await
    }

    /// Marks the employee in at `at`.
    ///
    /// # Errors
    /// The coordinate is validated and the device requirement checked before anything is
    /// sent. A backend refusal (for example a second mark-in) surfaces as
    /// `GeomarkError::Rejected`.
    pub async fn mark_in(&self, at: &Coordinate) -> Result<MarkResponse, GeomarkError> {
        self.ensure_mobile()?;
        at.validate()?;
        log::info!("Marking in at ({}, {})", at.lat, at.lon);
        self._request(Method::POST, "employee/markin", Some(at))
            .await
    }

    /// Marks the employee out at `at`. See [`mark_in`](Self::mark_in).
    pub async fn mark_out(&self, at: &Coordinate) -> Result<MarkResponse, GeomarkError> {
        self.ensure_mobile()?;
        at.validate()?;
        log::info!("Marking out at ({}, {})", at.lat, at.lon);
        self._request(Method::POST, "employee/markout", Some(at))
            .await
    }

    /// Lists the markings registered for the employee's tenant.
    ///
    /// A backend that returns no body yields an empty list.
    pub async fn registered_locations(&self) -> Result<Vec<GeoMarking>, GeomarkError> {
        let markings: Option<Vec<GeoMarking>> = self
            ._request(Method::GET, "employee/nears", None::<&Value>)
            .await?;
        Ok(markings.unwrap_or_default())
    }

    /// Fetches the registered markings and returns the active one nearest to `at`.
    ///
    /// Returns `Ok(None)` if there are no active markings.
    pub async fn nearest_registered(
        &self,
        at: &Coordinate,
    ) -> Result<Option<(GeoMarking, Meters)>, GeomarkError> {
        at.validate()?;
        let markings = self.registered_locations().await?;
        let nearest = find_nearest_checked(
            markings.iter().filter(|m| m.active),
            at,
            haversine_between,
        )?;
        Ok(nearest
            .found()
            .map(|(marking, distance)| (marking.clone(), distance)))
    }
}

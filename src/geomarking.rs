// src/geomarking.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::distance::haversine_between;
use crate::types::{Coordinate, Located, Meters};

/// Radius assigned to a marking when the backend does not send one.
pub const DEFAULT_RADIUS: Meters = Meters(2000.0);

fn default_radius() -> Meters {
    DEFAULT_RADIUS
}

fn default_active() -> bool {
    true
}

/// A registered location where employees of a tenant may mark attendance.
///
/// Field names follow the backend's JSON records. `created_at` is the backend's local
/// timestamp and carries no timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMarking {
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius_meters: Meters,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl GeoMarking {
    /// Creates an active marking with the default radius and a fresh id.
    pub fn new(tenant_id: Uuid, name: impl Into<String>, at: Coordinate) -> Self {
        GeoMarking {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.into(),
            latitude: at.lat,
            longitude: at.lon,
            radius_meters: DEFAULT_RADIUS,
            active: true,
            created_at: None,
        }
    }

    pub fn with_radius(mut self, radius: Meters) -> Self {
        self.radius_meters = radius;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Haversine distance from this marking to `point`.
    pub fn distance_to(&self, point: &Coordinate) -> Meters {
        haversine_between(&self.coordinate(), point)
    }

    /// Returns `true` if `point` lies within this marking's radius (boundary inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.distance_to(point) <= self.radius_meters
    }
}

impl Located for GeoMarking {
    fn coordinate(&self) -> Coordinate {
        Coordinate::new_unchecked(self.latitude, self.longitude)
    }
}

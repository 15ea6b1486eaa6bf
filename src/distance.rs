// src/distance.rs

//! Great-circle distance between two latitude/longitude points.
//!
//! Two spherical models are provided and each returns its own unit type, so a
//! kilometer result can never be compared against a meter threshold by accident.
//! [`haversine`] is the standard model; [`law_of_cosines`] is kept for callers
//! that need to reproduce distances recorded by older systems.

use serde::{Deserialize, Serialize};

use crate::types::{Coordinate, Kilometers, Meters};

/// Earth radius used by the law-of-cosines model.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Earth radius used by the haversine model.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Distance by the spherical law of cosines, in kilometers.
///
/// The `acos` argument is clamped to `[-1, 1]` so that rounding at coincident or
/// antipodal points cannot produce NaN.
pub fn law_of_cosines(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Kilometers {
    // acos is ill-conditioned near 1, so coincident points would come out a few cm apart.
    if lat1 == lat2 && lon1 == lon2 {
        return Kilometers(0.0);
    }

    let p1 = lat1.to_radians();
    let p2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let cos_angle = p1.sin() * p2.sin() + p1.cos() * p2.cos() * delta_lambda.cos();
    Kilometers(cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM)
}

/// Distance by the haversine formula, in meters.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Meters {
    let p1 = lat1.to_radians();
    let p2 = lat2.to_radians();
    let delta_phi = p2 - p1;
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + p1.cos() * p2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // a can round just past 1 at antipodal points, which would make sqrt(1 - a) NaN.
    let a = a.clamp(0.0, 1.0);
    Meters(2.0 * a.sqrt().atan2((1.0 - a).sqrt()) * EARTH_RADIUS_M)
}

/// [`haversine`] over two coordinates. Usable directly as a selector distance function.
pub fn haversine_between(a: &Coordinate, b: &Coordinate) -> Meters {
    haversine(a.lat, a.lon, b.lat, b.lon)
}

/// [`law_of_cosines`] over two coordinates. Usable directly as a selector distance function.
pub fn law_of_cosines_between(a: &Coordinate, b: &Coordinate) -> Kilometers {
    law_of_cosines(a.lat, a.lon, b.lat, b.lon)
}

/// Selects one of the distance models at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceModel {
    #[default]
    Haversine,
    LawOfCosines,
}

impl DistanceModel {
    /// Distance between `a` and `b` under this model, normalized to meters.
    pub fn meters(self, a: &Coordinate, b: &Coordinate) -> Meters {
        match self {
            DistanceModel::Haversine => haversine_between(a, b),
            DistanceModel::LawOfCosines => law_of_cosines_between(a, b).into(),
        }
    }
}

// src/types/coordinate.rs

use serde::{Deserialize, Serialize};

use crate::error::GeomarkError;

/// A latitude/longitude pair in degrees.
///
/// Serialized as `{"lat": .., "lon": ..}`, the payload shape the attendance backend
/// accepts for mark-in and mark-out.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Creates a validated `Coordinate`.
    ///
    /// # Errors
    /// Returns `GeomarkError::InvalidCoordinate` if either value is not finite, latitude is
    /// outside -90..=90, or longitude is outside -180..=180.
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeomarkError> {
        let coordinate = Coordinate { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Creates a `Coordinate` without range checks.
    ///
    /// Distance results for out-of-range or non-finite values are meaningless.
    pub const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// Checks that the coordinate is finite and within the valid degree ranges.
    pub fn validate(&self) -> Result<(), GeomarkError> {
        let reason = if !self.lat.is_finite() || !self.lon.is_finite() {
            "latitude and longitude must be finite"
        } else if !(-90.0..=90.0).contains(&self.lat) {
            "latitude must be between -90 and 90 degrees"
        } else if !(-180.0..=180.0).contains(&self.lon) {
            "longitude must be between -180 and 180 degrees"
        } else {
            return Ok(());
        };

        Err(GeomarkError::InvalidCoordinate {
            latitude: self.lat,
            longitude: self.lon,
            reason: reason.to_string(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Coordinate::new_unchecked(lat, lon)
    }
}

/// Anything that sits at a point on the map.
///
/// The selector only ever reads the coordinate; the rest of the value is carried
/// through untouched.
pub trait Located {
    fn coordinate(&self) -> Coordinate;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl Located for (f64, f64) {
    fn coordinate(&self) -> Coordinate {
        Coordinate::new_unchecked(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_values() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = Coordinate::new(90.5, 10.0).unwrap_err();
        match err {
            GeomarkError::InvalidCoordinate {
                latitude, reason, ..
            } => {
                assert_eq!(latitude, 90.5);
                assert!(reason.contains("latitude"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(matches!(
            Coordinate::new(10.0, -180.01),
            Err(GeomarkError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(!Coordinate::new_unchecked(f64::NEG_INFINITY, 0.0).is_valid());
    }

    #[test]
    fn uses_lat_lon_field_names() {
        let c: Coordinate = serde_json::from_str(r#"{"lat": 12.97, "lon": 77.59}"#).unwrap();
        assert_eq!(c, Coordinate::new_unchecked(12.97, 77.59));
        assert_eq!(
            serde_json::to_value(c).unwrap(),
            serde_json::json!({"lat": 12.97, "lon": 77.59})
        );
    }

    #[test]
    fn tuples_are_located() {
        let pair = (1.0, -1.0);
        assert_eq!(pair.coordinate(), Coordinate::new_unchecked(1.0, -1.0));
        assert_eq!(Coordinate::from(pair), pair.coordinate());
    }
}

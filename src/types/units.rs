// src/types/units.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A distance value tagged with its unit.
///
/// The nearest-location selector is generic over this trait so the "nothing found"
/// result can carry positive infinity in the same unit as the distance function.
pub trait Distance: Copy + PartialOrd + fmt::Debug {
    /// Positive infinity in this unit.
    const INFINITY: Self;
    /// Zero in this unit.
    const ZERO: Self;

    /// The raw magnitude.
    fn value(self) -> f64;
}

/// Distance in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Distance in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilometers(pub f64);

impl Meters {
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_kilometers(self) -> Kilometers {
        Kilometers::from(self)
    }
}

impl Kilometers {
    pub const fn new(value: f64) -> Self {
        Kilometers(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_meters(self) -> Meters {
        Meters::from(self)
    }
}

impl From<Kilometers> for Meters {
    fn from(km: Kilometers) -> Self {
        Meters(km.0 * 1000.0)
    }
}

impl From<Meters> for Kilometers {
    fn from(m: Meters) -> Self {
        Kilometers(m.0 / 1000.0)
    }
}

impl Distance for Meters {
    const INFINITY: Self = Meters(f64::INFINITY);
    const ZERO: Self = Meters(0.0);

    fn value(self) -> f64 {
        self.0
    }
}

impl Distance for Kilometers {
    const INFINITY: Self = Kilometers(f64::INFINITY);
    const ZERO: Self = Kilometers(0.0);

    fn value(self) -> f64 {
        self.0
    }
}

// Unitless, for callers bringing their own distance function.
impl Distance for f64 {
    const INFINITY: Self = f64::INFINITY;
    const ZERO: Self = 0.0;

    fn value(self) -> f64 {
        self
    }
}

fn fmt_with_unit(value: f64, unit: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match f.precision() {
        Some(precision) => write!(f, "{:.*} {}", precision, value, unit),
        None => write!(f, "{} {}", value, unit),
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_unit(self.0, "m", f)
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_with_unit(self.0, "km", f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_units() {
        assert_eq!(Meters::from(Kilometers(1.5)), Meters(1500.0));
        assert_eq!(Kilometers::from(Meters(250.0)), Kilometers(0.25));
        assert_eq!(Kilometers(2.0).to_meters().to_kilometers(), Kilometers(2.0));
    }

    #[test]
    fn display_carries_the_unit() {
        assert_eq!(Meters(12.0).to_string(), "12 m");
        assert_eq!(format!("{:.2}", Kilometers(15.7234)), "15.72 km");
        assert_eq!(format!("{:.1}", Meters(2000.0)), "2000.0 m");
    }

    #[test]
    fn infinity_orders_above_everything() {
        assert!(Meters(1.0e12) < <Meters as Distance>::INFINITY);
        assert!(<Kilometers as Distance>::ZERO < Kilometers(0.001));
        assert_eq!(<f64 as Distance>::INFINITY.value(), f64::INFINITY);
    }

    #[test]
    fn serializes_as_a_bare_number() {
        assert_eq!(serde_json::to_string(&Meters(2000.0)).unwrap(), "2000.0");
        let km: Kilometers = serde_json::from_str("15.7").unwrap();
        assert_eq!(km, Kilometers(15.7));
    }
}

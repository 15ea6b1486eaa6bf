// src/types/mod.rs

pub mod coordinate;
pub mod units;

pub use coordinate::{Coordinate, Located};
pub use units::{Distance, Kilometers, Meters};

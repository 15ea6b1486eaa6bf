pub mod attendance;
pub mod client;
pub mod config;
pub mod device;
pub mod distance;
pub mod employee;
pub mod error;
pub mod geomarking;
pub mod nearest;
pub mod types;

pub use attendance::{plan_mark_in, plan_mark_out, AttendanceDraft, MarkPolicy, MarkStatus};
pub use client::AttendanceClient;
pub use config::ClientConfig;
pub use device::DeviceKind;
pub use distance::{haversine, law_of_cosines, DistanceModel};
pub use error::GeomarkError;
pub use geomarking::GeoMarking;
pub use nearest::{find_nearest, find_nearest_checked, NearestResult};

// Core value types
pub use types::{Coordinate, Distance, Kilometers, Located, Meters};

// src/error.rs
use reqwest::header::InvalidHeaderValue;
use serde_json::Value;
use thiserror::Error;

use crate::types::Meters;

#[derive(Error, Debug)]
pub enum GeomarkError {
    #[error("HTTP request failed: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("URL parsing failed: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid coordinate (lat {latitude}, lon {longitude}): {reason}")]
    InvalidCoordinate {
        latitude: f64,
        longitude: f64,
        reason: String,
    },

    #[error("No registered locations are available")]
    NoRegisteredLocations,

    #[error("Already marked in")]
    AlreadyMarkedIn,

    #[error("Not marked in")]
    NotMarkedIn,

    #[error("Too far from '{place}': {distance:.1} away, {allowed:.1} allowed")]
    OutOfRange {
        place: String,
        distance: Meters,
        allowed: Meters,
    },

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unauthorized (HTTP {status}): {detail}")]
    Unauthorized { status: u16, detail: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error (HTTP {status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },
}

impl GeomarkError {
    /// Creates a `GeomarkError` from an HTTP status code and the backend's JSON error body.
    ///
    /// The backend reports failures as `{"detail": ...}`, where `detail` is usually a string
    /// but is a list of field errors for payload validation failures.
    pub(crate) fn from_response(status_code: u16, response_body: Value) -> Self {
        let detail = match response_body.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => match &response_body {
                Value::String(s) if !s.is_empty() => s.clone(),
                Value::Null => "Unknown error".to_string(),
                other => other.to_string(),
            },
        };

        match status_code {
            400 => GeomarkError::Rejected(detail),
            401 | 403 => GeomarkError::Unauthorized {
                status: status_code,
                detail,
            },
            404 => GeomarkError::NotFound(detail),
            s if s >= 500 => GeomarkError::Server { status: s, detail },
            s => GeomarkError::Api { status: s, detail },
        }
    }
}

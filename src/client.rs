// src/client.rs

use crate::config::ClientConfig;
use crate::device::DeviceKind;
use crate::error::GeomarkError;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Async client for the employee endpoints of the attendance backend.
///
/// `AttendanceClient` holds the backend's base URL, the configured device kind, and an
/// underlying `reqwest::Client` whose default headers carry the user agent and any
/// session cookie supplied in [`ClientConfig`]. Establishing that session is outside
/// this crate.
///
/// Endpoint methods live in [`employee`](crate::employee).
///
/// ```rust,no_run
/// use geomark_rs::{AttendanceClient, ClientConfig, Coordinate};
/// # use geomark_rs::GeomarkError;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), GeomarkError> {
/// let config = ClientConfig::new("http://localhost:8000")
///     .with_user_agent("Mozilla/5.0 (Linux; Android 14) Mobile")
///     .with_cookie("act_employee=...; rft_employee=...");
/// let client = AttendanceClient::new(config)?;
///
/// let here = Coordinate::new(12.9716, 77.5946)?;
/// let marked = client.mark_in(&here).await?;
/// println!("Marked in at {:?}", marked.place);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AttendanceClient {
    pub(crate) base_url: Url,
    pub(crate) config: ClientConfig,
    pub(crate) http_client: Client,
}

impl AttendanceClient {
    /// Creates a new `AttendanceClient`.
    ///
    /// A missing scheme on `config.api_url` defaults to `http://`, and the base path is
    /// given a trailing slash so endpoint paths resolve beneath it.
    ///
    /// # Errors
    /// Returns a `GeomarkError` if the URL is invalid or cannot be a base, a header value
    /// is invalid, or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, GeomarkError> {
        let base_url = normalize_base_url(&config.api_url)?;

        let mut default_headers = HeaderMap::new();
        if let Some(user_agent) = &config.user_agent {
            default_headers.insert(
                USER_AGENT,
                HeaderValue::from_str(user_agent).map_err(GeomarkError::InvalidHeaderValue)?,
            );
        }
        if let Some(cookie) = &config.cookie {
            let mut value = HeaderValue::from_str(cookie).map_err(GeomarkError::InvalidHeaderValue)?;
            value.set_sensitive(true);
            default_headers.insert(COOKIE, value);
        }

        let http_client = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout())
            .build()?;

        log::debug!(
            "Created attendance client for {} (device: {})",
            base_url,
            config.device
        );

        Ok(AttendanceClient {
            base_url,
            config,
            http_client,
        })
    }

    /// Creates a client from `GEOMARK_*` environment variables. See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, GeomarkError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn device(&self) -> DeviceKind {
        self.config.device
    }

    pub(crate) fn ensure_mobile(&self) -> Result<(), GeomarkError> {
        if self.config.require_mobile && !self.config.device.is_mobile() {
            log::warn!(
                "Refusing attendance request from a {} device",
                self.config.device
            );
            return Err(GeomarkError::InvalidDevice(format!(
                "attendance can only be marked from a mobile device, not {}",
                self.config.device
            )));
        }
        Ok(())
    }

    /// Resolves an endpoint such as `"employee/markin"` to `<base>/api/employee/markin`.
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url, GeomarkError> {
        let api_path = format!("api/{}", endpoint.trim_start_matches('/'));
        self.base_url.join(&api_path).map_err(|e| {
            GeomarkError::InvalidUrl(format!(
                "Failed to join base URL '{}' with API path '{}': {}",
                self.base_url, api_path, e
            ))
        })
    }

    pub(crate) async fn _request<T: Serialize + Send + Sync, R: DeserializeOwned + Send + 'static>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&T>,
    ) -> Result<R, GeomarkError> {
        let full_url = self.endpoint_url(endpoint)?;

        log::debug!("Preparing request: Method={}, URL={}", method, full_url);

        let mut request_builder = self.http_client.request(method.clone(), full_url.clone());

        if let Some(body_data) = body {
            let body_str = serde_json::to_string(body_data)?;
            log::debug!("Request body: {}", body_str);
            request_builder = request_builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body_str);
        } else {
            log::debug!("Request body: None");
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let body_bytes = response.bytes().await?;

        if status.is_success() {
            log::debug!(
                "Request successful. Response body: {}",
                String::from_utf8_lossy(&body_bytes)
            );
            // FastAPI answers `null` for handlers that return nothing; treat empty bodies the same.
            if body_bytes.is_empty() {
                return Ok(serde_json::from_value(Value::Null)?);
            }
            Ok(serde_json::from_slice(&body_bytes)?)
        } else {
            let error_body = serde_json::from_slice::<Value>(&body_bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body_bytes).into_owned())
            });
            log::warn!(
                "Request to {} {} failed with status {}: {}",
                method,
                full_url,
                status,
                error_body
            );
            Err(GeomarkError::from_response(status.as_u16(), error_body))
        }
    }
}

fn normalize_base_url(api_url: &str) -> Result<Url, GeomarkError> {
    let mut url_string = api_url.trim().to_string();
    if !url_string.starts_with("http://") && !url_string.starts_with("https://") {
        url_string = format!("http://{}", url_string);
    }

    let mut url = Url::parse(&url_string)?;
    if url.cannot_be_a_base() {
        return Err(GeomarkError::InvalidUrl(format!(
            "'{}' cannot be used as a base URL",
            api_url
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_missing_scheme_and_trailing_slash() {
        let client = AttendanceClient::new(ClientConfig::new("localhost:8000")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(
            client.endpoint_url("employee/markin").unwrap().as_str(),
            "http://localhost:8000/api/employee/markin"
        );
    }

    #[test]
    fn keeps_a_path_prefix() {
        let client =
            AttendanceClient::new(ClientConfig::new("https://example.com/attendance")).unwrap();
        assert_eq!(
            client.endpoint_url("/employee/nears").unwrap().as_str(),
            "https://example.com/attendance/api/employee/nears"
        );
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(AttendanceClient::new(ClientConfig::new("http://")).is_err());
        assert!(AttendanceClient::new(ClientConfig::new("http://exa mple.com")).is_err());
    }

    #[test]
    fn rejects_invalid_header_values() {
        let config = ClientConfig::new("http://localhost:8000").with_cookie("bad\ncookie");
        assert!(matches!(
            AttendanceClient::new(config),
            Err(GeomarkError::InvalidHeaderValue(_))
        ));
    }

    #[test]
    fn mobile_requirement() {
        let desktop = ClientConfig::new("http://localhost:8000")
            .with_device(DeviceKind::Desktop)
            .require_mobile(true);
        let client = AttendanceClient::new(desktop).unwrap();
        assert!(matches!(
            client.ensure_mobile(),
            Err(GeomarkError::InvalidDevice(_))
        ));

        let mobile = client.config().clone().with_device(DeviceKind::Mobile);
        assert!(AttendanceClient::new(mobile).unwrap().ensure_mobile().is_ok());

        let unchecked = ClientConfig::new("http://localhost:8000").with_device(DeviceKind::Desktop);
        assert!(AttendanceClient::new(unchecked).unwrap().ensure_mobile().is_ok());
    }
}

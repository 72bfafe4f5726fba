use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::DEVICE_TIMEOUT;

/// A device request can fail at the transport (connection refused, timeout,
/// unreachable network), at the HTTP status, or while decoding the body.
/// The `Display` message of each variant is what callers relay to clients.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("request to device failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("device returned status {0}")]
    Status(StatusCode),

    #[error("device returned a non-JSON body: {0}")]
    Body(reqwest::Error),
}

/// HTTP client for the depth sensor.
///
/// Each call makes exactly one outbound GET with a bounded timeout; there
/// are no retries and no state kept between calls.
#[derive(Clone)]
pub struct DeviceClient {
    http_client: reqwest::Client,
    depth_url: String,
}

impl DeviceClient {
    pub fn new(device_ip: &str) -> Self {
        Self::with_timeout(device_ip, DEVICE_TIMEOUT)
    }

    /// Like [`DeviceClient::new`] with an explicit request timeout. Tests
    /// use this to avoid waiting out the production timeout.
    pub fn with_timeout(device_ip: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap();

        Self {
            http_client,
            depth_url: format!("http://{}/depth", device_ip),
        }
    }

    /// Fetch the current depth reading from the device as raw JSON.
    ///
    /// Any non-2xx status is an error; upstream statuses are never passed
    /// through to our own response.
    pub async fn fetch_depth(&self) -> Result<Value, DeviceError> {
        tracing::debug!("Querying device at {}", self.depth_url);

        let response = self.http_client.get(&self.depth_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status(status));
        }

        response.json().await.map_err(DeviceError::Body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn spawn_device(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr.to_string()
    }

    #[tokio::test]
    async fn fetch_depth_returns_device_json() {
        let device = Router::new().route("/depth", get(|| async { Json(json!({"depth": 12.5})) }));
        let addr = spawn_device(device).await;

        let client = DeviceClient::with_timeout(&addr, Duration::from_secs(1));
        let value = client.fetch_depth().await.unwrap();

        assert_eq!(value, json!({"depth": 12.5}));
    }

    #[tokio::test]
    async fn fetch_depth_rejects_non_success_status() {
        // No /depth route, so the device answers 404
        let addr = spawn_device(Router::new()).await;

        let client = DeviceClient::with_timeout(&addr, Duration::from_secs(1));
        let err = client.fetch_depth().await.unwrap_err();

        assert!(matches!(err, DeviceError::Status(StatusCode::NOT_FOUND)));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn fetch_depth_rejects_non_json_body() {
        let device = Router::new().route("/depth", get(|| async { "plain text, not json" }));
        let addr = spawn_device(device).await;

        let client = DeviceClient::with_timeout(&addr, Duration::from_secs(1));
        let err = client.fetch_depth().await.unwrap_err();

        assert!(matches!(err, DeviceError::Body(_)));
    }
}

// Repository trait for dataset access plus the upstream failure contract
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// One dataset as served by LaTiS: parallel parameter names, rows of values
/// and per-parameter metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDataset {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorCode {
    ProxyTimeout,
    GatewayTimeout,
    RequestFailed,
    Latis,
}

impl FetchErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorCode::ProxyTimeout => "Proxy Timeout",
            FetchErrorCode::GatewayTimeout => "Gateway Timeout",
            FetchErrorCode::RequestFailed => "Request Failed",
            FetchErrorCode::Latis => "LaTiS error",
        }
    }
}

impl fmt::Display for FetchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FetchErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

const RETRY_HINT: &str = "If the server is busy, please try again.";

/// A failed dataset request, classified once and then carried verbatim.
/// `status` is -1 when the request never got a response.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct UpstreamFetchError {
    pub message: String,
    pub code: FetchErrorCode,
    pub status: i32,
}

impl UpstreamFetchError {
    /// Classify an HTTP failure from its status code and response body.
    pub fn from_status(status: u16, body: Option<String>) -> Self {
        let (code, message) = match status {
            502 => (
                FetchErrorCode::ProxyTimeout,
                format!("Error 502: Proxy Timeout. {}", RETRY_HINT),
            ),
            504 => (
                FetchErrorCode::GatewayTimeout,
                format!("Error 504: Gateway Timeout. {}", RETRY_HINT),
            ),
            _ => (
                FetchErrorCode::Latis,
                body.filter(|b| !b.is_empty())
                    .unwrap_or_else(|| "Error: unknown".to_string()),
            ),
        };
        Self {
            message,
            code,
            status: i32::from(status),
        }
    }

    /// The request could not be sent or was cut off before a response.
    pub fn request_failed() -> Self {
        Self {
            message: "Error: unable to send HTTP request".to_string(),
            code: FetchErrorCode::RequestFailed,
            status: -1,
        }
    }

    /// A response arrived but did not hold a usable dataset.
    pub fn malformed(status: u16, detail: impl fmt::Display) -> Self {
        Self {
            message: format!("Malformed LaTiS response: {}", detail),
            code: FetchErrorCode::Latis,
            status: i32::from(status),
        }
    }
}

#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Fetch the dataset behind a LaTiS access URL (relative to the LaTiS base).
    async fn fetch_dataset(&self, access_url: &str) -> Result<RawDataset, UpstreamFetchError>;
}

//! HTTP access to the statistics backend.

pub mod types;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AnemoiError;
use crate::query::QueryParams;

pub const DEFAULT_BASE_URL: &str = "https://anemoi-backend.onrender.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Events,
    Winners,
    Circuits,
    Constructors,
    Drivers,
    Session,
    Standings,
    Telemetry,
    DriverComparison,
    TrackDominance,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Events => "events",
            Endpoint::Winners => "winners",
            Endpoint::Circuits => "circuits",
            Endpoint::Constructors => "constructors",
            Endpoint::Drivers => "drivers",
            Endpoint::Session => "session",
            Endpoint::Standings => "standings",
            Endpoint::Telemetry => "telemetry",
            Endpoint::DriverComparison => "driver-comparison",
            Endpoint::TrackDominance => "track-dominance",
        }
    }

    /// Query parameter that is sent as a trailing path segment instead.
    pub fn path_parameter(&self) -> Option<&'static str> {
        match self {
            Endpoint::Events | Endpoint::Winners => Some("year"),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint, params: QueryParams) -> Self {
        Self { endpoint, params }
    }

    pub fn url(&self, base: &Url) -> Result<Url, AnemoiError> {
        let mut params = self.params.clone();
        let path = match self.endpoint.path_parameter() {
            Some(parameter) => {
                let value =
                    params
                        .take(parameter)
                        .ok_or_else(|| AnemoiError::MissingPathParameter {
                            endpoint: self.endpoint.to_string(),
                            parameter: parameter.to_string(),
                        })?;
                format!("{}/{}", self.endpoint.path(), value)
            }
            None => self.endpoint.path().to_string(),
        };

        let mut url = base
            .join(&path)
            .map_err(|e| AnemoiError::InvalidBaseUrl {
                url: base.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.pairs());
        }
        Ok(url)
    }
}

/// Parses a backend base URL, making sure relative endpoint paths are joined below it.
pub fn parse_base_url(base_url: &str) -> Result<Url, AnemoiError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    let url = Url::parse(&normalized).map_err(|e| AnemoiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(AnemoiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    Ok(url)
}

/// Every endpoint may answer `{"error": ...}` with a 200 status.
pub fn check_backend_error(value: Value) -> Result<Value, AnemoiError> {
    match value.get("error") {
        None | Some(Value::Null) => Ok(value),
        Some(Value::String(message)) => Err(AnemoiError::Backend {
            message: message.clone(),
        }),
        Some(other) => Err(AnemoiError::Backend {
            message: other.to_string(),
        }),
    }
}

pub fn decode_payload<T: DeserializeOwned>(value: Value) -> Result<T, AnemoiError> {
    let value = check_backend_error(value)?;
    serde_json::from_value(value).map_err(|e| AnemoiError::Decode { source: e })
}

/// Read-only access to the statistics backend.
#[async_trait]
pub trait StatsClient: Send + Sync {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, AnemoiError>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnemoiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnemoiError::Network { source: e })?;

        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl StatsClient for ReqwestClient {
    async fn fetch(&self, request: &ApiRequest) -> Result<Value, AnemoiError> {
        let url = request.url(&self.base_url)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            AnemoiError::Network { source: e }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("HTTP {} from {}", status, url);
            return Err(AnemoiError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AnemoiError::Network { source: e })
    }
}

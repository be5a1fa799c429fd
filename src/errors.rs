// Error types for anemoi

use snafu::Snafu;
use std::io;

use crate::query::ValidationError;

#[derive(Debug, Snafu)]
pub enum AnemoiError {
    // Query construction errors
    #[snafu(display("Invalid query: {source}"))]
    InvalidQuery { source: ValidationError },
    #[snafu(display("Invalid backend URL {url}: {reason}"))]
    InvalidBaseUrl { url: String, reason: String },
    #[snafu(display("Missing path parameter `{parameter}` for endpoint {endpoint}"))]
    MissingPathParameter {
        endpoint: String,
        parameter: String,
    },

    // Errors talking to the statistics backend
    #[snafu(display("Request failed: {source}"))]
    Network { source: reqwest::Error },
    #[snafu(display("HTTP {status} from {url}"))]
    HttpStatus { status: u16, url: String },
    #[snafu(display("{message}"))]
    Backend { message: String },
    #[snafu(display("{hint} ({message})"))]
    QueryFailed { hint: String, message: String },
    #[snafu(display("Unexpected response from backend: {source}"))]
    Decode { source: serde_json::Error },
    #[snafu(display("No response from backend after {timeout_s}s"))]
    RequestTimeout { timeout_s: u64 },
    #[snafu(display("Could not decode image: {source}"))]
    ImageDecode { source: base64::DecodeError },
    #[snafu(display("Could not start the request runtime"))]
    Runtime { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error accessing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // User input errors
    #[snafu(display("Unknown view: {name}"))]
    UnknownView { name: String },
    #[snafu(display("Invalid filter `{input}`, expected name=value"))]
    InvalidFilterArgument { input: String },
    #[snafu(display("Error writing image file"))]
    ImageWriteError { source: io::Error },

    // Desktop client errors
    #[snafu(display("Could not start the desktop client: {message}"))]
    Gui { message: String },
}

impl From<ValidationError> for AnemoiError {
    fn from(value: ValidationError) -> Self {
        AnemoiError::InvalidQuery { source: value }
    }
}

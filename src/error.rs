use std::path::PathBuf;

use thiserror::Error;

// Main application error type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture Error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Client Error: {0}")]
    Client(#[from] ClientError),
    #[error("Configuration Error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Precondition Error: {0}")]
    Precondition(String),
    #[error("Shell Error: {0}")]
    Shell(String),
}

// Raised by the capture source, before the pipeline ever sees an artifact.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Capture aborted by user")]
    Aborted,
    #[error("Captured photo {path} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Raised by the classification and enrichment clients. Transport problems,
// non-success statuses, and unusable response bodies are distinct kinds so
// the shell can say something meaningful about each.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request could not be built: {0}")]
    Precondition(String),
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Service returned status {0}")]
    Service(u16),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing setting: {0}")]
    Missing(&'static str),
    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

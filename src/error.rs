//! Classified errors for the whole command.
//!
//! Every failure is terminal: errors propagate with `?` to the process
//! boundary, which prints the message plus the usage banner and exits 1.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    // Command-line grammar
    #[error("Unsupported extra argument '{0}'")]
    ExtraArgument(String),
    #[error("Missing positional argument {0}")]
    MissingPositional(String),
    #[error("Missing value for argument {0}")]
    MissingValue(String),
    #[error("Argument {0} rejects value")]
    RejectsValue(String),
    #[error("Invalid value '{value}' for argument {option}")]
    InvalidValue { option: String, value: String },

    // Volume resolution
    #[error("Volume {0} not found")]
    VolumeNotFound(String),
    #[error("Too many volumes matched name {0}")]
    AmbiguousName(String),
    #[error("Search error: {status} / {reason}")]
    Search { status: u16, reason: String },

    // Dispatch
    #[error("Unknown command")]
    UnknownCommand,

    // Session establishment
    #[error("{0} is not set")]
    MissingEnv(&'static str),
    #[error("Authentication failed: {status} / {reason}")]
    AuthFailed { status: u16, reason: String },
    #[error("Authentication reply carried no token")]
    TokenMissing,
    #[error("No {interface} block-storage endpoint in region {region}")]
    EndpointNotFound { interface: String, region: String },

    // Transport
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Reason phrase for a status code, for operator-facing messages.
pub(crate) fn http_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

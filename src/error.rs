//! Error types for egov-grid
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! The grid clamps most malformed inputs; only caller misuse ends up here.

use snafu::Snafu;

/// Main error type for the crate
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Page size of zero
    #[snafu(display("Invalid page size: {page_size} (must be at least 1)"))]
    InvalidPageSize { page_size: usize },

    /// Operation that only makes sense in the other pagination mode
    #[snafu(display("{operation} requires {expected} pagination"))]
    ModeMismatch {
        expected: &'static str,
        operation: &'static str,
    },

    /// Column key not present in the schema
    #[snafu(display("Unknown column: {key}"))]
    UnknownColumn { key: String },

    /// Remote page fetch failed
    #[snafu(display("Fetch failed: {message}"))]
    Fetch { message: String },

    /// IO error (config and fixture files)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

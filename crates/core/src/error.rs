//! Error types for Peloton operations.
//!
//! This module defines the main error type [`PelotonError`] which represents
//! every failure that can occur while validating a request, fetching a page,
//! extracting data from it, or writing the resulting record.
//!
//! # Example
//!
//! ```rust
//! use peloton_core::{PelotonError, Result, Year};
//!
//! fn season(raw: &str) -> Result<Year> {
//!     raw.parse::<Year>()
//! }
//!
//! assert!(matches!(season("1899"), Err(PelotonError::InvalidYear(_))));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scraping operations.
///
/// The variants fall into the usage, transport and extraction classes the
/// CLI maps onto distinct exit statuses.
#[derive(Error, Debug)]
pub enum PelotonError {
    /// The race slug is not part of the known catalogue.
    #[error("Unknown race: {0}")]
    UnknownRace(String),

    /// The year is not an integer in 1900..=3000.
    #[error("Invalid year: {0} (expected an integer between 1900 and 3000)")]
    InvalidYear(String),

    /// The stage identifier is empty or cannot be placed in a URL path.
    #[error("Invalid stage: {0:?}")]
    InvalidStage(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The HTTP client could not be constructed (e.g. no usable TLS backend).
    #[error("HTTP client unavailable: {0}")]
    ClientUnavailable(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, including invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A required element or attribute is absent and strict extraction is on.
    ///
    /// In strict mode this aborts processing of the whole page.
    #[error("Missing {field} in {context}")]
    MissingField { field: &'static str, context: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors.
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PelotonError {
    /// Returns true for failures that happened on the wire.
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            PelotonError::HttpError(_) => true,
            PelotonError::HttpStatus { .. } | PelotonError::Timeout { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias for PelotonError.
///
/// This is a convenience alias for `std::result::Result<T, PelotonError>`.
pub type Result<T> = std::result::Result<T, PelotonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PelotonError::UnknownRace("tour-de-moon".to_string());
        assert!(err.to_string().contains("tour-de-moon"));
    }

    #[test]
    fn test_http_status_error() {
        let err = PelotonError::HttpStatus { status: 404, url: "https://example.com/race".to_string() };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("https://example.com/race"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_missing_field_error() {
        let err = PelotonError::MissingField { field: "flag", context: "rider row 3".to_string() };
        assert_eq!(err.to_string(), "Missing flag in rider row 3");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_timeout_error() {
        let err = PelotonError::Timeout { timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert!(err.is_transport());
    }
}

//! Error types for the wellspring crate.
//!
//! Only programming-level failures (invalid configuration, broken
//! collaborator plumbing) surface as errors. Data-quality failures —
//! unreachable pages, malformed markup, empty search responses — degrade
//! to empty collections at the site where they occur and are logged, never
//! propagated.

/// Errors that can occur during source acquisition.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// Invalid acquisition configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An HTTP request to a search provider or page failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Failed to parse a provider response or page markup.
    #[error("parse error: {0}")]
    Parse(String),

    /// The external text-generation collaborator failed.
    #[error("generation error: {0}")]
    Generation(String),
}

/// Convenience type alias for wellspring results.
pub type Result<T> = std::result::Result<T, AcquireError>;

//! Error types for the passphrase search tool

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Mask error: {0}")]
    Mask(#[from] MaskError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Verifier error: {0}")]
    Verifier(#[from] VerifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Mask parsing errors, detected before any verification work starts
#[derive(Error, Debug)]
pub enum MaskError {
    #[error("incomplete charset: trailing '?' at end of mask")]
    IncompleteCharset,

    #[error("unsupported charset: ?{0}")]
    UnknownCharset(char),

    #[error("optional marker '?-' must be followed by a literal or charset")]
    DanglingOptional,

    #[error("charset ?{0} expands to nothing")]
    EmptyCharset(char),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("mask must not be empty")]
    EmptyMask,

    #[error("worker count must be greater than 0")]
    NoWorkers,

    #[error("increment mask must not be empty when set")]
    EmptyIncrementMask,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Failures of the external verifier command. These are hard failures
/// that abort the whole search; a timed-out or unlaunchable verifier is
/// never treated as "wrong passphrase".
#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("failed to launch verifier {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("verifier timed out after {secs}s testing candidate {candidate:?}")]
    Timeout { candidate: String, secs: u64 },

    #[error("verifier I/O failure testing candidate {candidate:?}: {source}")]
    Io {
        candidate: String,
        source: std::io::Error,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SearchError>;

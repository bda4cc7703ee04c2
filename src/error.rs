/// Unified error types for the cinebase record store client
use thiserror::Error;

/// Main error type for record store operations
///
/// The transport layer never recovers from a failure locally; every outcome
/// that is not a success is surfaced as one of these variants. The relation
/// resolver recovers per-item failures only under its lenient fan-in policy.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request address could not be constructed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The store answered with a non-success status outside the dedicated classes
    #[error("Request failed with status code: {0}")]
    RequestFailed(u16),

    /// The response body did not match the expected envelope shape
    #[error("Failed to decode response: {0}")]
    DecodingError(String),

    /// The bearer credential was rejected
    #[error("Unauthorized: the record store rejected the credential")]
    Unauthorized,

    /// The store answered with a 5xx status
    #[error("Record store unavailable")]
    ServerUnavailable,

    /// The request never reached the store
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// A lookup that expects at least one row matched none
    #[error("Not found: {0}")]
    EntityNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any other transport fault
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

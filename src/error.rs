//! Error types shared by the projection and versioning services.
//!
//! Storage-specific failures are converted into these database-agnostic
//! variants by the storage layer. The core never retries internally; every
//! failure surfaces to the immediate caller.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The record does not exist, or is not reachable through the requesting
    /// advisor's clients. The two cases are deliberately indistinguishable.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input to a service entry point (unparseable dates, unknown
    /// enum tokens, negative amounts). No partial computation is performed.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Division by zero or an invalid decimal operation. Never coerced to
    /// zero or infinity.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Failure in the storage backend. A failed version commit leaves no
    /// partial state behind.
    #[error("storage error: {0}")]
    Storage(String),
}

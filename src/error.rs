//! Error types for the element registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building elements or writing instructions
///
/// The default registry configuration never produces `DegenerateVector` or
/// `InvalidConfiguration`; those are opt-in through [`crate::RegistryConfig`]
/// and the `try_*` vector methods.
#[derive(Error, Debug)]
pub enum Error {
    /// A vector operation had no finite result (zero-length normalize, etc.)
    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    /// Element options could not be interpreted
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No element is stored under the given id
    #[error("Unknown element id {0}")]
    UnknownElement(i64),

    /// Element payload failed to serialize or deserialize
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An instruction line had a recognized verb but a broken body
    #[error("Malformed instruction: {0}")]
    MalformedInstruction(String),
}

//! Error types for dialogue extraction and attribution.

use thiserror::Error;

/// Errors that can occur while building or analyzing a document.
///
/// Note that an unresolvable speaker is *not* an error: it is represented
/// by an absent entry in the [`Play`](crate::Play) and counted as a
/// diagnostic miss.
#[derive(Debug, Error)]
pub enum PlayError {
    /// A replica span must contain at least one token.
    #[error("cannot construct an empty replica")]
    EmptyReplica,

    /// The external annotation pipeline failed to produce a document.
    #[error("annotation failed: {message}")]
    Annotation { message: String },
}

/// Result type for fallible operations in this crate.
pub type PlayResult<T> = Result<T, PlayError>;

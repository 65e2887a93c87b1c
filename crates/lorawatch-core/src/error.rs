//! Error types for lorawatch-core.

use crate::transport::TransportError;

/// Failure of a whole aggregation run.
///
/// Only the root project-list request can fail a run; every deeper failure
/// degrades the result instead (a dropped branch or an unenriched device).
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// The root request failed at the transport level.
    #[error("Unable to get project data from the server: {0}")]
    Root(TransportError),

    /// The platform rejected the root request or returned no project records.
    #[error("Project request yielded no records")]
    Rejected,

    /// The root response body was not valid JSON.
    #[error("Unparseable project response: {0}")]
    RootParse(serde_json::Error),
}

/// User-facing outcome of a failed read.
///
/// Callers receive an opaque human-readable message; failure causes are not
/// programmatically distinguishable beyond these two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The platform could not be read at all.
    #[error("Unable to read sensors data. Check server log and verify connection configuration.")]
    Unavailable,

    /// An unexpected internal failure.
    #[error("Server error. Check server log.")]
    Internal,
}

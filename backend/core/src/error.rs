use thiserror::Error;

/// Top-level error type for the Scribe message core.
///
/// Callers can tell bad syntax apart from access denial and from a missing
/// record, so each gets its own variant rather than a shared validation kind.
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

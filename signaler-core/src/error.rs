use thiserror::Error;

/// A client sent something that is not a valid signaling envelope.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown client method {0:?}")]
    UnknownMethod(String),
}

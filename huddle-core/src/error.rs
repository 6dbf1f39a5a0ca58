use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The envelope did not match any known event shape.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),
}

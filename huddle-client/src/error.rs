use thiserror::Error;

/// Failures reported by the media engine backing a peer transport.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("transport closed")]
    Closed,
    #[error("transport backend: {0}")]
    Backend(String),
}

/// Failures acquiring local capture devices.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The user refused the capture permission prompt.
    #[error("capture permission denied")]
    PermissionDenied,
    /// The user cancelled the picker or no device exists.
    #[error("no capture source available")]
    NoSourceAvailable,
    #[error("device backend: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error("relay unreachable: {0}")]
    Unreachable(String),
}

/// Session-level failures. Nothing here is fatal to the process; every
/// variant is scoped to one operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not in a room")]
    NotInRoom,
    #[error("already joined a room")]
    AlreadyJoined,
    #[error("session closed")]
    Closed,
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Signaling(#[from] SignalingError),
}

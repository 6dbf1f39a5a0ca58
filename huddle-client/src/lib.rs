mod error;
pub mod engine;
pub mod link;
pub mod media;
pub mod session;

pub use error::{EngineError, MediaError, SessionError, SignalingError};
pub use session::{
    CallSession, RemoteParticipant, SessionEvent, SessionHandle, SignalingTransport,
};

mod error;
pub mod model;

pub use error::ProtocolError;
pub use model::{
    ClientEvent, IceServerConfig, Participant, ParticipantId, ParticipantInfo, RoomId, ServerEvent,
    SessionId,
};

mod ice;
mod participant;
mod room;
mod wire;

pub use ice::IceServerConfig;
pub use participant::{Participant, ParticipantId, SessionId};
pub use room::RoomId;
pub use wire::{ClientEvent, ParticipantInfo, ServerEvent};

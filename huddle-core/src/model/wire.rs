use crate::error::ProtocolError;
use crate::model::ice::IceServerConfig;
use crate::model::participant::{ParticipantId, SessionId};
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

/// Roster entry handed to a joining client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: ParticipantId,
    pub name: String,
    pub relay_session_id: SessionId,
}

/// Everything a client may send to the relay. Closed set: anything that
/// does not parse into one of these variants is a malformed envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
        participant_id: ParticipantId,
        user_name: String,
    },
    Offer {
        to: SessionId,
        sdp: String,
    },
    Answer {
        to: SessionId,
        sdp: String,
    },
    IceCandidate {
        to: SessionId,
        candidate: String,
    },
    ChatMessage {
        room_id: RoomId,
        message: String,
        user_name: String,
    },
    ToggleAudio {
        room_id: RoomId,
        participant_id: ParticipantId,
        enabled: bool,
    },
    ToggleVideo {
        room_id: RoomId,
        participant_id: ParticipantId,
        enabled: bool,
    },
    Reaction {
        room_id: RoomId,
        participant_id: ParticipantId,
        user_name: String,
        emoji: String,
    },
    ScreenShareStarted {
        room_id: RoomId,
        participant_id: ParticipantId,
    },
    ScreenShareStopped {
        room_id: RoomId,
        participant_id: ParticipantId,
    },
    LeaveRoom {
        room_id: RoomId,
        participant_id: ParticipantId,
    },
}

/// Everything the relay may deliver to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    Welcome {
        session_id: SessionId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    ExistingParticipants(Vec<ParticipantInfo>),
    ParticipantJoined {
        participant_id: ParticipantId,
        user_name: String,
        relay_session_id: SessionId,
    },
    ParticipantLeft {
        participant_id: ParticipantId,
    },
    Offer {
        from: SessionId,
        sdp: String,
    },
    Answer {
        from: SessionId,
        sdp: String,
    },
    IceCandidate {
        from: SessionId,
        candidate: String,
    },
    ChatMessage {
        room_id: RoomId,
        message: String,
        user_name: String,
        /// Milliseconds since the Unix epoch, stamped by the relay.
        timestamp: u64,
    },
    AudioToggled {
        participant_id: ParticipantId,
        enabled: bool,
    },
    VideoToggled {
        participant_id: ParticipantId,
        enabled: bool,
    },
    Reaction {
        participant_id: ParticipantId,
        user_name: String,
        emoji: String,
    },
    ScreenShareStarted {
        participant_id: ParticipantId,
    },
    ScreenShareStopped {
        participant_id: ParticipantId,
    },
}

impl ClientEvent {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ServerEvent {
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

use crate::link::NegotiationState;
use huddle_core::{ParticipantId, SessionId};

/// Everything the UI layer needs to render one remote participant.
/// Published as a complete snapshot on every change; observers never see
/// a structure mutated mid-iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteParticipant {
    pub participant_id: ParticipantId,
    pub session_id: SessionId,
    pub display_name: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_sharing: bool,
    pub link_state: NegotiationState,
}

impl RemoteParticipant {
    /// A fresh entry assumes live audio/video until a toggle notification
    /// says otherwise.
    pub(crate) fn new(
        participant_id: ParticipantId,
        session_id: SessionId,
        display_name: String,
    ) -> Self {
        Self {
            participant_id,
            session_id,
            display_name,
            audio_enabled: true,
            video_enabled: true,
            screen_sharing: false,
            link_state: NegotiationState::New,
        }
    }
}

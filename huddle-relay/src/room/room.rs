use huddle_core::{Participant, ParticipantId, SessionId};
use std::collections::HashMap;

/// Membership of a single room, keyed by the stable participant id.
#[derive(Debug, Default)]
pub struct Room {
    participants: HashMap<ParticipantId, Participant>,
}

impl Room {
    /// Registers a participant. A second join with the same participant id
    /// (a reconnect with a fresh relay session) replaces the stale entry,
    /// which is returned.
    pub fn insert(&mut self, participant: Participant) -> Option<Participant> {
        self.participants
            .insert(participant.participant_id, participant)
    }

    pub fn remove(&mut self, participant_id: &ParticipantId) -> Option<Participant> {
        self.participants.remove(participant_id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn contains(&self, participant_id: &ParticipantId) -> bool {
        self.participants.contains_key(participant_id)
    }

    /// Snapshot of the current membership.
    pub fn members(&self) -> Vec<Participant> {
        self.participants.values().cloned().collect()
    }

    pub fn members_except(&self, participant_id: &ParticipantId) -> Vec<Participant> {
        self.participants
            .values()
            .filter(|p| p.participant_id != *participant_id)
            .cloned()
            .collect()
    }

    pub fn by_session(&self, session_id: &SessionId) -> Option<Participant> {
        self.participants
            .values()
            .find(|p| p.session_id == *session_id)
            .cloned()
    }
}

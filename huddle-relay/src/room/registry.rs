use crate::room::Room;
use dashmap::DashMap;
use huddle_core::{Participant, ParticipantId, RoomId, SessionId};
use tracing::info;

/// Process-scoped room store. Created empty at startup and mutated only
/// through join/leave/remove_session; per-room mutations run under the
/// map's entry lock so a racing join and leave on the same room can never
/// advertise a departed participant or prune a room mid-join.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `participant` in the room, creating the room if absent.
    /// Returns the members that were already present, excluding the caller.
    pub fn join(&self, room_id: &RoomId, participant: Participant) -> Vec<Participant> {
        let mut room = self.rooms.entry(room_id.clone()).or_default();
        let existing = room.members_except(&participant.participant_id);
        if room.insert(participant).is_none() && existing.is_empty() {
            info!("Created room {}", room_id);
        }
        existing
    }

    /// Removes the participant and returns it together with the remaining
    /// members. The room is pruned once empty.
    pub fn leave(
        &self,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Option<(Participant, Vec<Participant>)> {
        let result = {
            let mut room = self.rooms.get_mut(room_id)?;
            let removed = room.remove(participant_id)?;
            (removed, room.members())
        };
        self.prune_if_empty(room_id);
        Some(result)
    }

    /// Transport-level disconnect: sweeps every room the session belongs to.
    /// Returns one (room, departed, remaining) entry per affected room.
    pub fn remove_session(
        &self,
        session_id: &SessionId,
    ) -> Vec<(RoomId, Participant, Vec<Participant>)> {
        let affected: Vec<(RoomId, ParticipantId)> = self
            .rooms
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .by_session(session_id)
                    .map(|p| (entry.key().clone(), p.participant_id))
            })
            .collect();

        affected
            .into_iter()
            .filter_map(|(room_id, participant_id)| {
                self.leave(&room_id, &participant_id)
                    .map(|(departed, remaining)| (room_id, departed, remaining))
            })
            .collect()
    }

    /// Snapshot of a room's membership; empty if the room does not exist.
    pub fn members(&self, room_id: &RoomId) -> Vec<Participant> {
        self.rooms
            .get(room_id)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn prune_if_empty(&self, room_id: &RoomId) {
        if self
            .rooms
            .remove_if(room_id, |_, room| room.is_empty())
            .is_some()
        {
            info!("Pruned empty room {}", room_id);
        }
    }
}

use crate::room::RoomRegistry;
use dashmap::DashMap;
use huddle_core::{
    ClientEvent, IceServerConfig, Participant, ParticipantInfo, RoomId, ServerEvent, SessionId,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tracing::{info, warn};

struct RelayInner {
    sessions: DashMap<SessionId, mpsc::UnboundedSender<ServerEvent>>,
    registry: RoomRegistry,
    ice_servers: Vec<IceServerConfig>,
}

/// The signaling hub. Tracks connected sessions and room membership and
/// routes events between them; media never flows through here.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                sessions: DashMap::new(),
                registry: RoomRegistry::new(),
                ice_servers,
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    /// Registers a new transport connection: mints the ephemeral session id
    /// and greets the client with it plus the ICE server configuration.
    pub fn connect(&self) -> (SessionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let session_id = SessionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.sessions.insert(session_id, tx);

        self.send(&session_id, ServerEvent::Welcome { session_id });
        self.send(
            &session_id,
            ServerEvent::IceConfig {
                ice_servers: self.inner.ice_servers.clone(),
            },
        );

        (session_id, rx)
    }

    /// Transport-level disconnect: same cleanup as an explicit leave, for
    /// every room the session belongs to.
    pub fn disconnect(&self, session_id: &SessionId) {
        for (_, departed, remaining) in self.inner.registry.remove_session(session_id) {
            self.notify_left(&departed, &remaining);
        }
        self.inner.sessions.remove(session_id);
    }

    pub fn handle_event(&self, from: SessionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom {
                room_id,
                participant_id,
                user_name,
            } => {
                let participant = Participant {
                    participant_id,
                    session_id: from,
                    display_name: user_name.clone(),
                };
                let existing = self.inner.registry.join(&room_id, participant);
                info!("{} joined room {}", user_name, room_id);

                for member in &existing {
                    self.send(
                        &member.session_id,
                        ServerEvent::ParticipantJoined {
                            participant_id,
                            user_name: user_name.clone(),
                            relay_session_id: from,
                        },
                    );
                }

                let roster = existing
                    .into_iter()
                    .map(|p| ParticipantInfo {
                        id: p.participant_id,
                        name: p.display_name,
                        relay_session_id: p.session_id,
                    })
                    .collect();
                self.send(&from, ServerEvent::ExistingParticipants(roster));
            }

            ClientEvent::Offer { to, sdp } => {
                self.forward(&from, &to, ServerEvent::Offer { from, sdp });
            }

            ClientEvent::Answer { to, sdp } => {
                self.forward(&from, &to, ServerEvent::Answer { from, sdp });
            }

            ClientEvent::IceCandidate { to, candidate } => {
                self.forward(&from, &to, ServerEvent::IceCandidate { from, candidate });
            }

            ClientEvent::ChatMessage {
                room_id,
                message,
                user_name,
            } => {
                // Chat reaches the whole room, sender included, so every
                // client renders the same relay-stamped timeline.
                let event = ServerEvent::ChatMessage {
                    room_id: room_id.clone(),
                    message,
                    user_name,
                    timestamp: unix_millis(),
                };
                self.broadcast(&room_id, None, event);
            }

            ClientEvent::ToggleAudio {
                room_id,
                participant_id,
                enabled,
            } => {
                self.broadcast(
                    &room_id,
                    Some(&from),
                    ServerEvent::AudioToggled {
                        participant_id,
                        enabled,
                    },
                );
            }

            ClientEvent::ToggleVideo {
                room_id,
                participant_id,
                enabled,
            } => {
                self.broadcast(
                    &room_id,
                    Some(&from),
                    ServerEvent::VideoToggled {
                        participant_id,
                        enabled,
                    },
                );
            }

            ClientEvent::Reaction {
                room_id,
                participant_id,
                user_name,
                emoji,
            } => {
                self.broadcast(
                    &room_id,
                    Some(&from),
                    ServerEvent::Reaction {
                        participant_id,
                        user_name,
                        emoji,
                    },
                );
            }

            ClientEvent::ScreenShareStarted {
                room_id,
                participant_id,
            } => {
                self.broadcast(
                    &room_id,
                    Some(&from),
                    ServerEvent::ScreenShareStarted { participant_id },
                );
            }

            ClientEvent::ScreenShareStopped {
                room_id,
                participant_id,
            } => {
                self.broadcast(
                    &room_id,
                    Some(&from),
                    ServerEvent::ScreenShareStopped { participant_id },
                );
            }

            ClientEvent::LeaveRoom {
                room_id,
                participant_id,
            } => {
                if let Some((departed, remaining)) =
                    self.inner.registry.leave(&room_id, &participant_id)
                {
                    info!("{} left room {}", departed.display_name, room_id);
                    self.notify_left(&departed, &remaining);
                }
            }
        }
    }

    fn send(&self, to: &SessionId, event: ServerEvent) {
        if let Some(session) = self.inner.sessions.get(to) {
            if session.send(event).is_err() {
                warn!("Session {} hung up mid-send", to);
            }
        } else {
            warn!("Attempted to send to disconnected session {}", to);
        }
    }

    /// Forwards a signaling envelope verbatim. The payload is opaque here;
    /// only the routing fields matter. An envelope addressed to its own
    /// sender or to a vanished session is dropped.
    fn forward(&self, from: &SessionId, to: &SessionId, event: ServerEvent) {
        if to == from {
            warn!("Session {} addressed an envelope to itself", from);
            return;
        }
        self.send(to, event);
    }

    fn broadcast(&self, room_id: &RoomId, except: Option<&SessionId>, event: ServerEvent) {
        for member in self.inner.registry.members(room_id) {
            if except == Some(&member.session_id) {
                continue;
            }
            self.send(&member.session_id, event.clone());
        }
    }

    fn notify_left(&self, departed: &Participant, remaining: &[Participant]) {
        for member in remaining {
            self.send(
                &member.session_id,
                ServerEvent::ParticipantLeft {
                    participant_id: departed.participant_id,
                },
            );
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

use crate::engine::{
    MediaDevices, MediaEngine, MediaTrack, MediaTrackEvent, SenderTuning, TransportConfig,
    TransportEvent, TransportStats,
};
use crate::error::{SessionError, SignalingError};
use crate::link::{LinkRole, LinkTick, PeerLink};
use crate::media::{LocalMediaController, LocalMediaState, QualityProfile};
use crate::session::roster::RemoteParticipant;
use async_trait::async_trait;
use huddle_core::{ClientEvent, ParticipantId, ParticipantInfo, RoomId, ServerEvent, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Outbound half of the relay connection. The inbound half is the
/// [`ServerEvent`] stream handed to [`CallSession::new`].
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    async fn send(&self, event: ClientEvent) -> Result<(), SignalingError>;
}

/// Call-scoped happenings the embedding layer renders: chat, reactions,
/// remote tracks arriving.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    ChatMessage {
        user_name: String,
        message: String,
        timestamp: u64,
    },
    Reaction {
        participant_id: ParticipantId,
        user_name: String,
        emoji: String,
    },
    RemoteTrack {
        participant_id: ParticipantId,
        track: MediaTrack,
    },
}

enum SessionCommand {
    Join {
        room_id: RoomId,
        participant_id: ParticipantId,
        user_name: String,
        audio: bool,
        video: bool,
        reply: oneshot::Sender<Result<LocalMediaState, SessionError>>,
    },
    Leave {
        reply: oneshot::Sender<()>,
    },
    ToggleAudio {
        reply: oneshot::Sender<Result<bool, SessionError>>,
    },
    ToggleVideo {
        reply: oneshot::Sender<Result<bool, SessionError>>,
    },
    ToggleScreenShare {
        reply: oneshot::Sender<Result<bool, SessionError>>,
    },
    SendChat {
        message: String,
    },
    SendReaction {
        emoji: String,
    },
    Stats {
        reply: oneshot::Sender<HashMap<ParticipantId, TransportStats>>,
    },
}

/// Cloneable front for a running [`CallSession`].
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    roster: watch::Receiver<Vec<RemoteParticipant>>,
}

impl SessionHandle {
    pub async fn join(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
        user_name: &str,
        audio: bool,
        video: bool,
    ) -> Result<LocalMediaState, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Join {
                room_id,
                participant_id,
                user_name: user_name.to_string(),
                audio,
                video,
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn leave(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Leave { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Returns the new enabled state.
    pub async fn toggle_audio(&self) -> Result<bool, SessionError> {
        self.toggle(|reply| SessionCommand::ToggleAudio { reply }).await
    }

    pub async fn toggle_video(&self) -> Result<bool, SessionError> {
        self.toggle(|reply| SessionCommand::ToggleVideo { reply }).await
    }

    pub async fn toggle_screen_share(&self) -> Result<bool, SessionError> {
        self.toggle(|reply| SessionCommand::ToggleScreenShare { reply })
            .await
    }

    pub async fn send_chat(&self, message: &str) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::SendChat {
                message: message.to_string(),
            })
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn send_reaction(&self, emoji: &str) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::SendReaction {
                emoji: emoji.to_string(),
            })
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn connection_stats(
        &self,
    ) -> Result<HashMap<ParticipantId, TransportStats>, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(SessionCommand::Stats { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Watch the roster; every update is a complete sorted snapshot.
    pub fn roster(&self) -> watch::Receiver<Vec<RemoteParticipant>> {
        self.roster.clone()
    }

    async fn toggle<F>(&self, make: F) -> Result<bool, SessionError>
    where
        F: FnOnce(oneshot::Sender<Result<bool, SessionError>>) -> SessionCommand,
    {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }
}

enum EarlySignal {
    Offer(String),
    Candidate(String),
}

/// Per-client orchestrator. Owns the roster and the peer links, fans relay
/// events out to the right link, and is the only place links are created
/// or destroyed.
pub struct CallSession {
    engine: Arc<dyn MediaEngine>,
    media: LocalMediaController,
    signaling: Arc<dyn SignalingTransport>,
    transport_config: TransportConfig,

    local_session: Option<SessionId>,
    room: Option<RoomId>,
    participant_id: Option<ParticipantId>,
    user_name: String,

    links: HashMap<ParticipantId, PeerLink>,
    roster: HashMap<ParticipantId, RemoteParticipant>,
    by_session: HashMap<SessionId, ParticipantId>,
    /// Signals from relay sessions we have not discovered yet; replayed
    /// once the matching roster event lands.
    early_signals: HashMap<SessionId, Vec<EarlySignal>>,

    commands: mpsc::Receiver<SessionCommand>,
    server_events: mpsc::UnboundedReceiver<ServerEvent>,
    outbox_tx: mpsc::UnboundedSender<ClientEvent>,
    outbox_rx: mpsc::UnboundedReceiver<ClientEvent>,
    transport_tx: mpsc::UnboundedSender<TransportEvent>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    tick_tx: mpsc::UnboundedSender<LinkTick>,
    tick_rx: mpsc::UnboundedReceiver<LinkTick>,
    media_events: mpsc::UnboundedReceiver<MediaTrackEvent>,
    ui_events: mpsc::UnboundedSender<SessionEvent>,
    roster_tx: watch::Sender<Vec<RemoteParticipant>>,
}

impl CallSession {
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        devices: Arc<dyn MediaDevices>,
        signaling: Arc<dyn SignalingTransport>,
        server_events: mpsc::UnboundedReceiver<ServerEvent>,
        quality: QualityProfile,
    ) -> (
        Self,
        SessionHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let (command_tx, commands) = mpsc::channel(64);
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (roster_tx, roster_rx) = watch::channel(Vec::new());

        let media_events = devices.track_events();
        let media = LocalMediaController::new(devices, quality);

        let session = Self {
            engine,
            media,
            signaling,
            transport_config: TransportConfig::default(),
            local_session: None,
            room: None,
            participant_id: None,
            user_name: String::new(),
            links: HashMap::new(),
            roster: HashMap::new(),
            by_session: HashMap::new(),
            early_signals: HashMap::new(),
            commands,
            server_events,
            outbox_tx,
            outbox_rx,
            transport_tx,
            transport_rx,
            tick_tx,
            tick_rx,
            media_events,
            ui_events: ui_tx,
            roster_tx,
        };

        let handle = SessionHandle {
            commands: command_tx,
            roster: roster_rx,
        };

        (session, handle, ui_rx)
    }

    pub async fn run(mut self) {
        info!("Call session loop started");

        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },

                event = self.server_events.recv() => match event {
                    Some(event) => self.handle_server_event(event).await,
                    None => {
                        info!("Relay stream closed");
                        break;
                    }
                },

                Some(event) = self.transport_rx.recv() => {
                    self.handle_transport_event(event).await;
                }

                Some(tick) = self.tick_rx.recv() => self.handle_tick(tick).await,

                Some(event) = self.media_events.recv() => {
                    self.handle_media_event(event).await;
                }

                Some(out) = self.outbox_rx.recv() => self.deliver(out).await,

                else => break,
            }
        }

        if self.room.is_some() {
            self.leave().await;
        }
        info!("Call session loop finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Join {
                room_id,
                participant_id,
                user_name,
                audio,
                video,
                reply,
            } => {
                let result = self
                    .join(room_id, participant_id, user_name, audio, video)
                    .await;
                let _ = reply.send(result);
            }
            SessionCommand::Leave { reply } => {
                self.leave().await;
                let _ = reply.send(());
            }
            SessionCommand::ToggleAudio { reply } => {
                let _ = reply.send(self.toggle_audio());
            }
            SessionCommand::ToggleVideo { reply } => {
                let result = self.toggle_video().await;
                let _ = reply.send(result);
            }
            SessionCommand::ToggleScreenShare { reply } => {
                let result = self.toggle_screen_share().await;
                let _ = reply.send(result);
            }
            SessionCommand::SendChat { message } => {
                if let Ok((room_id, _)) = self.require_room() {
                    self.queue(ClientEvent::ChatMessage {
                        room_id,
                        message,
                        user_name: self.user_name.clone(),
                    });
                }
            }
            SessionCommand::SendReaction { emoji } => {
                if let Ok((room_id, participant_id)) = self.require_room() {
                    self.queue(ClientEvent::Reaction {
                        room_id,
                        participant_id,
                        user_name: self.user_name.clone(),
                        emoji,
                    });
                }
            }
            SessionCommand::Stats { reply } => {
                let _ = reply.send(self.collect_stats().await);
            }
        }
    }

    async fn join(
        &mut self,
        room_id: RoomId,
        participant_id: ParticipantId,
        user_name: String,
        audio: bool,
        video: bool,
    ) -> Result<LocalMediaState, SessionError> {
        if self.room.is_some() {
            return Err(SessionError::AlreadyJoined);
        }

        // Capture first, so the opening offers already carry tracks.
        match self.media.acquire_microphone().await {
            Ok(_) => self.media.set_audio_enabled(audio),
            Err(e) => warn!("Microphone unavailable, continuing without audio: {}", e),
        }
        if video {
            // A denied camera degrades the join to audio-only.
            if let Err(e) = self.media.acquire_camera().await {
                warn!("Camera unavailable, continuing audio-only: {}", e);
            }
        }

        self.room = Some(room_id.clone());
        self.participant_id = Some(participant_id);
        self.user_name = user_name.clone();

        self.signaling
            .send(ClientEvent::JoinRoom {
                room_id,
                participant_id,
                user_name,
            })
            .await?;

        Ok(self.media.state())
    }

    /// Cancels all negotiation work and releases local media before the
    /// relay hears about the leave.
    async fn leave(&mut self) {
        let (Some(room_id), Some(participant_id)) = (self.room.take(), self.participant_id.take())
        else {
            return;
        };

        for (_, mut link) in self.links.drain() {
            link.close().await;
        }
        self.media.release_all();

        if let Err(e) = self
            .signaling
            .send(ClientEvent::LeaveRoom {
                room_id,
                participant_id,
            })
            .await
        {
            warn!("Leave notification lost: {}", e);
        }

        self.roster.clear();
        self.by_session.clear();
        self.early_signals.clear();
        self.publish_roster();
    }

    fn toggle_audio(&mut self) -> Result<bool, SessionError> {
        let (room_id, participant_id) = self.require_room()?;
        let enabled = !self.media.state().audio_enabled;
        self.media.set_audio_enabled(enabled);
        self.queue(ClientEvent::ToggleAudio {
            room_id,
            participant_id,
            enabled,
        });
        Ok(enabled)
    }

    async fn toggle_video(&mut self) -> Result<bool, SessionError> {
        let (room_id, participant_id) = self.require_room()?;

        let enabled = if self.media.state().video_enabled {
            self.media.release_camera();
            if !self.media.state().screen_sharing {
                self.rebind_video(None).await;
            }
            false
        } else {
            let track = self.media.acquire_camera().await?;
            if !self.media.state().screen_sharing {
                self.rebind_video(Some(track)).await;
            }
            true
        };

        self.queue(ClientEvent::ToggleVideo {
            room_id,
            participant_id,
            enabled,
        });
        Ok(enabled)
    }

    async fn toggle_screen_share(&mut self) -> Result<bool, SessionError> {
        self.require_room()?;

        if self.media.state().screen_sharing {
            self.stop_screen_share().await;
            return Ok(false);
        }

        let track = self.media.acquire_screen().await?;
        self.retune_video(SenderTuning::SCREEN).await;
        self.rebind_video(Some(track)).await;

        if let Ok((room_id, participant_id)) = self.require_room() {
            self.queue(ClientEvent::ScreenShareStarted {
                room_id,
                participant_id,
            });
        }
        Ok(true)
    }

    /// Shared by the toggle command and the track-ended event from the OS.
    async fn stop_screen_share(&mut self) {
        let restore = self.media.release_screen();
        self.retune_video(SenderTuning::CAMERA).await;
        self.rebind_video(restore).await;

        if let Ok((room_id, participant_id)) = self.require_room() {
            self.queue(ClientEvent::ScreenShareStopped {
                room_id,
                participant_id,
            });
        }
    }

    async fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Welcome { session_id } => {
                debug!("Relay assigned session {}", session_id);
                self.local_session = Some(session_id);
            }

            ServerEvent::IceConfig { ice_servers } => {
                self.transport_config.ice_servers = ice_servers;
            }

            ServerEvent::ExistingParticipants(roster) => {
                for info in roster {
                    self.discover(info).await;
                }
            }

            ServerEvent::ParticipantJoined {
                participant_id,
                user_name,
                relay_session_id,
            } => {
                self.discover(ParticipantInfo {
                    id: participant_id,
                    name: user_name,
                    relay_session_id,
                })
                .await;
            }

            ServerEvent::ParticipantLeft { participant_id } => {
                self.drop_participant(participant_id).await;
            }

            ServerEvent::Offer { from, sdp } => match self.by_session.get(&from).copied() {
                Some(id) => {
                    if let Some(link) = self.links.get_mut(&id) {
                        if let Err(e) = link.handle_offer(sdp).await {
                            warn!("Offer from {} failed: {}", id, e);
                        }
                        self.sync_link_state(id);
                    }
                }
                None => {
                    debug!("Offer from undiscovered session {}, buffering", from);
                    self.early_signals
                        .entry(from)
                        .or_default()
                        .push(EarlySignal::Offer(sdp));
                }
            },

            ServerEvent::Answer { from, sdp } => match self.by_session.get(&from).copied() {
                Some(id) => {
                    if let Some(link) = self.links.get_mut(&id) {
                        if let Err(e) = link.handle_answer(sdp).await {
                            warn!("Answer from {} failed: {}", id, e);
                        }
                    }
                }
                None => warn!("Dropping answer from unknown session {}", from),
            },

            ServerEvent::IceCandidate { from, candidate } => {
                match self.by_session.get(&from).copied() {
                    Some(id) => {
                        if let Some(link) = self.links.get_mut(&id) {
                            if let Err(e) = link.handle_candidate(candidate).await {
                                warn!("Candidate from {} rejected: {}", id, e);
                            }
                        }
                    }
                    None => {
                        self.early_signals
                            .entry(from)
                            .or_default()
                            .push(EarlySignal::Candidate(candidate));
                    }
                }
            }

            ServerEvent::ChatMessage {
                message,
                user_name,
                timestamp,
                ..
            } => {
                self.emit(SessionEvent::ChatMessage {
                    user_name,
                    message,
                    timestamp,
                });
            }

            ServerEvent::AudioToggled {
                participant_id,
                enabled,
            } => {
                if let Some(entry) = self.roster.get_mut(&participant_id) {
                    entry.audio_enabled = enabled;
                    self.publish_roster();
                }
            }

            ServerEvent::VideoToggled {
                participant_id,
                enabled,
            } => {
                if let Some(entry) = self.roster.get_mut(&participant_id) {
                    entry.video_enabled = enabled;
                    self.publish_roster();
                }
            }

            ServerEvent::Reaction {
                participant_id,
                user_name,
                emoji,
            } => {
                self.emit(SessionEvent::Reaction {
                    participant_id,
                    user_name,
                    emoji,
                });
            }

            ServerEvent::ScreenShareStarted { participant_id } => {
                if let Some(entry) = self.roster.get_mut(&participant_id) {
                    entry.screen_sharing = true;
                    self.publish_roster();
                }
            }

            ServerEvent::ScreenShareStopped { participant_id } => {
                if let Some(entry) = self.roster.get_mut(&participant_id) {
                    entry.screen_sharing = false;
                    self.publish_roster();
                }
            }
        }
    }

    /// Create-or-keep a link for a participant surfaced by the relay,
    /// via either the existing-participant list or a join notification.
    /// Idempotent per participant: a duplicate discovery is a no-op, a new
    /// relay session replaces the old link.
    async fn discover(&mut self, info: ParticipantInfo) {
        if self.room.is_none() {
            return;
        }
        let ParticipantInfo {
            id,
            name,
            relay_session_id,
        } = info;

        if let Some(link) = self.links.get(&id) {
            if link.remote_session() == relay_session_id {
                debug!("Duplicate discovery for {}, keeping the existing link", id);
                return;
            }
            info!("{} reconnected on a new relay session, replacing link", id);
            if let Some(mut old) = self.links.remove(&id) {
                self.by_session.remove(&old.remote_session());
                old.close().await;
            }
        }

        let Some(local_session) = self.local_session else {
            warn!("Discovered {} before the relay welcome, dropping", id);
            return;
        };

        self.roster
            .insert(id, RemoteParticipant::new(id, relay_session_id, name));
        self.by_session.insert(relay_session_id, id);

        // If their offer outran the discovery event we answer instead of
        // offering; otherwise discovery makes us the offerer.
        let buffered = self
            .early_signals
            .remove(&relay_session_id)
            .unwrap_or_default();
        let role = if buffered.iter().any(|s| matches!(s, EarlySignal::Offer(_))) {
            LinkRole::Answerer
        } else {
            LinkRole::Offerer
        };

        let transport = match self.engine.create_transport(
            id,
            &self.transport_config,
            self.transport_tx.clone(),
        ) {
            Ok(transport) => transport,
            Err(e) => {
                warn!("Creating a transport for {} failed: {}", id, e);
                return;
            }
        };

        let mut link = PeerLink::new(
            id,
            relay_session_id,
            local_session,
            role,
            transport,
            self.outbox_tx.clone(),
            self.tick_tx.clone(),
        );

        // Bind whatever we are currently capturing.
        if let Some(mic) = self.media.microphone_track() {
            if let Err(e) = link.set_audio_track(Some(mic)).await {
                warn!("Binding audio for {} failed: {}", id, e);
            }
        }
        if self.media.state().screen_sharing {
            let _ = link.set_video_tuning(SenderTuning::SCREEN).await;
        }
        if let Some(video) = self.media.outbound_video_track() {
            if let Err(e) = link.set_video_track(Some(video)).await {
                warn!("Binding video for {} failed: {}", id, e);
            }
        }

        match role {
            LinkRole::Offerer => {
                if let Err(e) = link.send_offer().await {
                    warn!("Opening offer towards {} failed: {}", id, e);
                }
            }
            LinkRole::Answerer => {
                for signal in buffered {
                    let result = match signal {
                        EarlySignal::Offer(sdp) => link.handle_offer(sdp).await,
                        EarlySignal::Candidate(candidate) => link.handle_candidate(candidate).await,
                    };
                    if let Err(e) = result {
                        warn!("Replaying buffered signal for {} failed: {}", id, e);
                    }
                }
            }
        }

        if let Some(entry) = self.roster.get_mut(&id) {
            entry.link_state = link.state();
        }
        self.links.insert(id, link);
        self.publish_roster();
    }

    async fn drop_participant(&mut self, id: ParticipantId) {
        if let Some(mut link) = self.links.remove(&id) {
            self.by_session.remove(&link.remote_session());
            self.early_signals.remove(&link.remote_session());
            link.close().await;
        }
        self.roster.remove(&id);
        self.publish_roster();
    }

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGenerated(id, candidate) => {
                if let Some(link) = self.links.get(&id) {
                    self.queue(ClientEvent::IceCandidate {
                        to: link.remote_session(),
                        candidate,
                    });
                }
            }

            TransportEvent::StateChanged(id, state) => {
                if let Some(link) = self.links.get_mut(&id) {
                    link.handle_transport_state(state).await;
                    self.sync_link_state(id);
                }
            }

            TransportEvent::RemoteTrack(id, track) => {
                self.emit(SessionEvent::RemoteTrack {
                    participant_id: id,
                    track,
                });
            }
        }
    }

    async fn handle_tick(&mut self, tick: LinkTick) {
        match tick {
            LinkTick::GraceElapsed(id) => {
                if let Some(link) = self.links.get_mut(&id) {
                    link.on_grace_elapsed().await;
                }
            }
        }
    }

    async fn handle_media_event(&mut self, event: MediaTrackEvent) {
        match event {
            MediaTrackEvent::Ended(track_id) => {
                if self.media.is_screen_track(&track_id) {
                    info!("Screen capture ended by the system, stopping share");
                    self.stop_screen_share().await;
                }
            }
        }
    }

    /// In-place video sender swap across every link; never renegotiates.
    async fn rebind_video(&mut self, track: Option<MediaTrack>) {
        for link in self.links.values() {
            if let Err(e) = link.set_video_track(track.clone()).await {
                warn!("Video rebind for {} failed: {}", link.remote(), e);
            }
        }
    }

    async fn retune_video(&mut self, tuning: SenderTuning) {
        for link in self.links.values_mut() {
            if let Err(e) = link.set_video_tuning(tuning).await {
                warn!("Video retune for {} failed: {}", link.remote(), e);
            }
        }
    }

    async fn collect_stats(&self) -> HashMap<ParticipantId, TransportStats> {
        let mut stats = HashMap::new();
        for (id, link) in &self.links {
            match link.stats().await {
                Ok(s) => {
                    stats.insert(*id, s);
                }
                Err(e) => warn!("Stats for {} unavailable: {}", id, e),
            }
        }
        stats
    }

    async fn deliver(&mut self, event: ClientEvent) {
        if let Err(e) = self.signaling.send(event).await {
            // The whole session degrades when the relay is gone; reconnect
            // policy belongs to the embedding layer.
            warn!("Relay unreachable, dropping outbound event: {}", e);
        }
    }

    fn queue(&self, event: ClientEvent) {
        let _ = self.outbox_tx.send(event);
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.ui_events.send(event);
    }

    fn require_room(&self) -> Result<(RoomId, ParticipantId), SessionError> {
        match (&self.room, self.participant_id) {
            (Some(room), Some(id)) => Ok((room.clone(), id)),
            _ => Err(SessionError::NotInRoom),
        }
    }

    fn sync_link_state(&mut self, id: ParticipantId) {
        let Some(state) = self.links.get(&id).map(|link| link.state()) else {
            return;
        };
        if let Some(entry) = self.roster.get_mut(&id) {
            entry.link_state = state;
        }
        self.publish_roster();
    }

    fn publish_roster(&self) {
        let mut entries: Vec<RemoteParticipant> = self.roster.values().cloned().collect();
        entries.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.participant_id.0.cmp(&b.participant_id.0))
        });
        self.roster_tx.send_replace(entries);
    }
}

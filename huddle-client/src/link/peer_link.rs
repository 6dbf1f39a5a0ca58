use crate::engine::{
    MediaTrack, OfferOptions, PeerTransport, SenderTuning, SessionDescription, TransportState,
};
use crate::error::EngineError;
use crate::link::sdp::prefer_opus;
use crate::link::state::{LinkRole, NegotiationState};
use huddle_core::{ClientEvent, ParticipantId, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long a transport may sit in `Disconnected` before the link forces
/// an ICE restart.
pub const ICE_RESTART_GRACE: Duration = Duration::from_secs(3);

/// Timer wake-ups, drained by the session loop that owns the link.
#[derive(Debug, Clone, Copy)]
pub enum LinkTick {
    GraceElapsed(ParticipantId),
}

/// Negotiation driver for one remote participant. All methods run on the
/// owning session's event loop, so no two negotiation steps for the same
/// link are ever in flight at once.
pub struct PeerLink {
    remote: ParticipantId,
    remote_session: SessionId,
    local_session: SessionId,
    role: LinkRole,
    state: NegotiationState,
    renegotiating: bool,
    has_remote_description: bool,
    pending_candidates: Vec<String>,
    video_tuning: SenderTuning,
    transport: Arc<dyn PeerTransport>,
    outbox: mpsc::UnboundedSender<ClientEvent>,
    ticks: mpsc::UnboundedSender<LinkTick>,
    grace: Option<JoinHandle<()>>,
}

impl PeerLink {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        remote: ParticipantId,
        remote_session: SessionId,
        local_session: SessionId,
        role: LinkRole,
        transport: Arc<dyn PeerTransport>,
        outbox: mpsc::UnboundedSender<ClientEvent>,
        ticks: mpsc::UnboundedSender<LinkTick>,
    ) -> Self {
        Self {
            remote,
            remote_session,
            local_session,
            role,
            state: NegotiationState::New,
            renegotiating: false,
            has_remote_description: false,
            pending_candidates: Vec::new(),
            video_tuning: SenderTuning::CAMERA,
            transport,
            outbox,
            ticks,
            grace: None,
        }
    }

    pub fn remote(&self) -> ParticipantId {
        self.remote
    }

    pub fn remote_session(&self) -> SessionId {
        self.remote_session
    }

    pub fn role(&self) -> LinkRole {
        self.role
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Opening move of the offerer side.
    pub async fn send_offer(&mut self) -> Result<(), EngineError> {
        if self.state != NegotiationState::New {
            warn!(
                "Refusing a second offer attempt towards {} in {:?}",
                self.remote, self.state
            );
            return Ok(());
        }

        let offer = self.transport.create_offer(OfferOptions::default()).await?;
        let offer = SessionDescription::offer(prefer_opus(&offer.sdp));
        self.transport.set_local_description(offer.clone()).await?;
        self.state = NegotiationState::OfferSent;

        self.signal(ClientEvent::Offer {
            to: self.remote_session,
            sdp: offer.sdp,
        });
        Ok(())
    }

    pub async fn handle_offer(&mut self, sdp: String) -> Result<(), EngineError> {
        if self.state == NegotiationState::Closed {
            return Ok(());
        }

        if self.state == NegotiationState::OfferSent || self.renegotiating {
            // Glare: both sides offered. The smaller relay-session id keeps
            // the offerer role; the other side rolls back and answers.
            if self.local_session < self.remote_session {
                debug!(
                    "Glare with {}: holding our offer, discarding theirs",
                    self.remote
                );
                return Ok(());
            }

            info!("Glare with {}: yielding, answering their offer", self.remote);
            self.transport.rollback_local_description().await?;
            self.renegotiating = false;
            if self.state == NegotiationState::OfferSent {
                self.role = LinkRole::Answerer;
            }
            self.apply_remote(SessionDescription::offer(sdp)).await?;
            self.answer().await?;
            if self.state == NegotiationState::OfferSent {
                self.state = NegotiationState::AnswerSent;
            }
            return Ok(());
        }

        if self.state == NegotiationState::New {
            self.apply_remote(SessionDescription::offer(sdp)).await?;
            self.answer().await?;
            self.state = NegotiationState::AnswerSent;
            return Ok(());
        }

        if self.state.has_completed_exchange() {
            // The peer is renegotiating an established link, typically an
            // ICE restart. Roles stay as they are.
            debug!("Renegotiation offer from {} in {:?}", self.remote, self.state);
            self.apply_remote(SessionDescription::offer(sdp)).await?;
            return self.answer().await;
        }

        warn!("Unexpected offer from {} in {:?}", self.remote, self.state);
        Ok(())
    }

    pub async fn handle_answer(&mut self, sdp: String) -> Result<(), EngineError> {
        if self.state != NegotiationState::OfferSent && !self.renegotiating {
            warn!("Ignoring stale answer from {} in {:?}", self.remote, self.state);
            return Ok(());
        }

        self.apply_remote(SessionDescription::answer(sdp)).await?;
        self.renegotiating = false;
        Ok(())
    }

    /// Candidates arriving ahead of the remote description are buffered and
    /// flushed in arrival order once it lands.
    pub async fn handle_candidate(&mut self, candidate: String) -> Result<(), EngineError> {
        if !self.has_remote_description {
            debug!("Buffering early candidate from {}", self.remote);
            self.pending_candidates.push(candidate);
            return Ok(());
        }
        self.transport.add_ice_candidate(&candidate).await
    }

    pub async fn handle_transport_state(&mut self, new: TransportState) {
        match new {
            TransportState::Connected => {
                self.cancel_grace();
                self.state = NegotiationState::Connected;
                if let Err(e) = self.apply_tuning().await {
                    warn!("Sender tuning for {} failed: {}", self.remote, e);
                }
            }

            TransportState::Disconnected => {
                if !self.state.is_active() {
                    return;
                }
                info!(
                    "Transport to {} disconnected, starting {:?} grace window",
                    self.remote, ICE_RESTART_GRACE
                );
                self.state = NegotiationState::Disconnected;
                self.schedule_grace();
            }

            TransportState::Failed => {
                if !self.state.is_active() {
                    return;
                }
                warn!("Transport to {} failed, restarting ICE", self.remote);
                self.cancel_grace();
                self.state = NegotiationState::Failed;
                if let Err(e) = self.restart_ice().await {
                    warn!("ICE restart towards {} failed: {}", self.remote, e);
                }
            }

            TransportState::Closed => debug!("Transport to {} closed", self.remote),

            TransportState::New | TransportState::Connecting => {}
        }
    }

    /// Grace window expired; restart ICE if the transport never recovered.
    pub async fn on_grace_elapsed(&mut self) {
        if self.state != NegotiationState::Disconnected {
            return;
        }
        info!("Grace window for {} expired, restarting ICE", self.remote);
        if let Err(e) = self.restart_ice().await {
            warn!("ICE restart towards {} failed: {}", self.remote, e);
        }
    }

    /// Renegotiates transport paths without tearing the session down.
    /// Either side may initiate; the logical role does not change.
    pub async fn restart_ice(&mut self) -> Result<(), EngineError> {
        if self.state == NegotiationState::Closed || self.renegotiating {
            return Ok(());
        }

        self.renegotiating = true;
        let options = OfferOptions {
            ice_restart: true,
            ..OfferOptions::default()
        };
        let offer = self.transport.create_offer(options).await?;
        let offer = SessionDescription::offer(prefer_opus(&offer.sdp));
        self.transport.set_local_description(offer.clone()).await?;

        self.signal(ClientEvent::Offer {
            to: self.remote_session,
            sdp: offer.sdp,
        });
        Ok(())
    }

    pub async fn set_audio_track(&self, track: Option<MediaTrack>) -> Result<(), EngineError> {
        self.transport.set_audio_track(track).await
    }

    /// In-place sender swap; never produces an offer/answer round trip.
    pub async fn set_video_track(&self, track: Option<MediaTrack>) -> Result<(), EngineError> {
        self.transport.set_video_track(track).await
    }

    pub async fn set_video_tuning(&mut self, tuning: SenderTuning) -> Result<(), EngineError> {
        self.video_tuning = tuning;
        if self.state == NegotiationState::Connected {
            self.transport.tune_video_sender(tuning).await?;
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<crate::engine::TransportStats, EngineError> {
        self.transport.stats().await
    }

    pub async fn close(&mut self) {
        self.cancel_grace();
        self.state = NegotiationState::Closed;
        self.transport.close().await;
    }

    async fn answer(&mut self) -> Result<(), EngineError> {
        let answer = self.transport.create_answer().await?;
        let answer = SessionDescription::answer(prefer_opus(&answer.sdp));
        self.transport.set_local_description(answer.clone()).await?;

        self.signal(ClientEvent::Answer {
            to: self.remote_session,
            sdp: answer.sdp,
        });
        Ok(())
    }

    async fn apply_remote(&mut self, desc: SessionDescription) -> Result<(), EngineError> {
        self.transport.set_remote_description(desc).await?;
        self.has_remote_description = true;
        self.flush_candidates().await;
        Ok(())
    }

    async fn flush_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.pending_candidates) {
            if let Err(e) = self.transport.add_ice_candidate(&candidate).await {
                warn!("Buffered candidate for {} rejected: {}", self.remote, e);
            }
        }
    }

    async fn apply_tuning(&self) -> Result<(), EngineError> {
        self.transport.tune_audio_sender(SenderTuning::VOICE).await?;
        self.transport.tune_video_sender(self.video_tuning).await
    }

    fn schedule_grace(&mut self) {
        self.cancel_grace();
        let ticks = self.ticks.clone();
        let remote = self.remote;
        self.grace = Some(tokio::spawn(async move {
            tokio::time::sleep(ICE_RESTART_GRACE).await;
            let _ = ticks.send(LinkTick::GraceElapsed(remote));
        }));
    }

    fn cancel_grace(&mut self) {
        if let Some(timer) = self.grace.take() {
            timer.abort();
        }
    }

    fn signal(&self, event: ClientEvent) {
        if self.outbox.send(event).is_err() {
            warn!("Session outbox closed, dropping signal for {}", self.remote);
        }
    }
}

impl Drop for PeerLink {
    fn drop(&mut self) {
        self.cancel_grace();
    }
}

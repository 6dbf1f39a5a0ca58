use crate::engine::types::{
    MediaTrack, MediaTrackEvent, OfferOptions, SenderTuning, SessionDescription, TrackId,
    TransportConfig, TransportEvent, TransportStats,
};
use crate::error::{EngineError, MediaError};
use crate::media::{AudioConstraints, VideoConstraints};
use async_trait::async_trait;
use huddle_core::ParticipantId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Factory for per-peer transports. One transport is created per remote
/// participant; its events arrive on the channel handed in here, tagged
/// with the remote's id.
pub trait MediaEngine: Send + Sync {
    fn create_transport(
        &self,
        remote: ParticipantId,
        config: &TransportConfig,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>, EngineError>;
}

/// One negotiable media transport to a single remote peer.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self, options: OfferOptions) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    /// Discard a pending local offer that was never answered.
    async fn rollback_local_description(&self) -> Result<(), EngineError>;

    /// `candidate` is the wire blob exactly as the remote produced it.
    async fn add_ice_candidate(&self, candidate: &str) -> Result<(), EngineError>;

    /// Bind, replace or clear the outbound audio sender in place. Never
    /// triggers renegotiation.
    async fn set_audio_track(&self, track: Option<MediaTrack>) -> Result<(), EngineError>;

    /// Same contract as [`set_audio_track`](Self::set_audio_track), for video.
    async fn set_video_track(&self, track: Option<MediaTrack>) -> Result<(), EngineError>;

    async fn tune_audio_sender(&self, tuning: SenderTuning) -> Result<(), EngineError>;

    async fn tune_video_sender(&self, tuning: SenderTuning) -> Result<(), EngineError>;

    async fn stats(&self) -> Result<TransportStats, EngineError>;

    async fn close(&self);
}

/// Local capture surface: camera, microphone, screen.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn open_camera(&self, constraints: &VideoConstraints) -> Result<MediaTrack, MediaError>;

    async fn open_microphone(&self, constraints: &AudioConstraints)
    -> Result<MediaTrack, MediaError>;

    async fn open_screen(&self) -> Result<MediaTrack, MediaError>;

    /// Fully stops the source; for a camera this releases the hardware
    /// (and its indicator light), not just the samples.
    fn stop_track(&self, track: &TrackId);

    /// Mute/unmute without releasing the source.
    fn set_track_enabled(&self, track: &TrackId, enabled: bool);

    /// Take the device event stream. Yields at most once per controller.
    fn track_events(&self) -> mpsc::UnboundedReceiver<MediaTrackEvent>;
}

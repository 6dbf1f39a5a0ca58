use huddle_core::{IceServerConfig, ParticipantId};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct TrackId(pub Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Handle to a capture or remote track. Cheap to clone and pass around;
/// stopping the underlying source is reserved to whoever acquired it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: TrackId,
    pub kind: TrackKind,
    pub label: String,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: &str) -> Self {
        Self {
            id: TrackId::new(),
            kind,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpType {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: String) -> Self {
        Self {
            kind: SdpType::Offer,
            sdp,
        }
    }

    pub fn answer(sdp: String) -> Self {
        Self {
            kind: SdpType::Answer,
            sdp,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OfferOptions {
    pub receive_audio: bool,
    pub receive_video: bool,
    pub ice_restart: bool,
}

impl Default for OfferOptions {
    fn default() -> Self {
        Self {
            receive_audio: true,
            receive_video: true,
            ice_restart: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub ice_candidate_pool_size: u8,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: IceServerConfig::default_servers(),
            ice_candidate_pool_size: 10,
        }
    }
}

/// Encoding parameters applied to an outbound sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderTuning {
    pub max_bitrate: u32,
    pub max_framerate: Option<u32>,
    pub high_priority: bool,
}

impl SenderTuning {
    /// Opus ceiling; voice rides high network priority.
    pub const VOICE: Self = Self {
        max_bitrate: 510_000,
        max_framerate: None,
        high_priority: true,
    };

    pub const CAMERA: Self = Self {
        max_bitrate: 2_500_000,
        max_framerate: Some(60),
        high_priority: false,
    };

    /// Screen capture ceiling while a share is active.
    pub const SCREEN: Self = Self {
        max_bitrate: 8_000_000,
        max_framerate: Some(60),
        high_priority: false,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportStats {
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub packets_lost: u64,
    pub round_trip_time_ms: Option<f64>,
}

/// Events surfaced by a peer transport, tagged with the remote participant
/// the transport belongs to.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    CandidateGenerated(ParticipantId, String),
    StateChanged(ParticipantId, TransportState),
    RemoteTrack(ParticipantId, MediaTrack),
}

/// Events surfaced by the capture device layer.
#[derive(Debug, Clone)]
pub enum MediaTrackEvent {
    /// The source ended on its own, e.g. the user stopped a screen capture
    /// from the OS picker.
    Ended(TrackId),
}

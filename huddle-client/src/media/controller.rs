use crate::engine::{MediaDevices, MediaTrack, TrackId};
use crate::error::MediaError;
use crate::media::{AudioConstraints, QualityProfile};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSource {
    Camera,
    Screen,
    #[default]
    None,
}

/// Snapshot of the local capture situation, readable by every peer link
/// when deciding between track replacement and renegotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalMediaState {
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_sharing: bool,
    pub active_video_source: VideoSource,
}

/// Sole owner of the local capture and screen tracks. Links receive track
/// handles by value and may bind them to senders, but only this controller
/// ever stops a source.
pub struct LocalMediaController {
    devices: Arc<dyn MediaDevices>,
    quality: QualityProfile,
    microphone: Option<MediaTrack>,
    camera: Option<MediaTrack>,
    screen: Option<MediaTrack>,
    state: LocalMediaState,
}

impl LocalMediaController {
    pub fn new(devices: Arc<dyn MediaDevices>, quality: QualityProfile) -> Self {
        Self {
            devices,
            quality,
            microphone: None,
            camera: None,
            screen: None,
            state: LocalMediaState::default(),
        }
    }

    pub fn state(&self) -> LocalMediaState {
        self.state
    }

    pub async fn acquire_microphone(&mut self) -> Result<MediaTrack, MediaError> {
        let track = self
            .devices
            .open_microphone(&AudioConstraints::voice())
            .await?;
        debug!("Microphone acquired: {}", track.id);
        self.microphone = Some(track.clone());
        self.state.audio_enabled = true;
        Ok(track)
    }

    /// Mute keeps the source alive; only the samples stop.
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        if let Some(mic) = &self.microphone {
            self.devices.set_track_enabled(&mic.id, enabled);
        }
        self.state.audio_enabled = enabled;
    }

    pub async fn acquire_camera(&mut self) -> Result<MediaTrack, MediaError> {
        let constraints = self.quality.video_constraints();
        let track = self.devices.open_camera(&constraints).await?;
        debug!("Camera acquired: {}", track.id);
        self.camera = Some(track.clone());
        self.state.video_enabled = true;
        if !self.state.screen_sharing {
            self.state.active_video_source = VideoSource::Camera;
        }
        Ok(track)
    }

    /// Camera off means hardware off: the track is stopped and released so
    /// the capture indicator goes dark, not merely muted.
    pub fn release_camera(&mut self) {
        if let Some(camera) = self.camera.take() {
            self.devices.stop_track(&camera.id);
        }
        self.state.video_enabled = false;
        if !self.state.screen_sharing {
            self.state.active_video_source = VideoSource::None;
        }
    }

    /// Starting a share suspends the camera association without stopping
    /// it, so it can be restored verbatim when the share ends.
    pub async fn acquire_screen(&mut self) -> Result<MediaTrack, MediaError> {
        let track = self.devices.open_screen().await?;
        debug!("Screen capture acquired: {}", track.id);
        self.screen = Some(track.clone());
        self.state.screen_sharing = true;
        self.state.active_video_source = VideoSource::Screen;
        Ok(track)
    }

    /// Stops the share and returns the camera track to restore on the video
    /// sender, if the camera was on when the share started.
    pub fn release_screen(&mut self) -> Option<MediaTrack> {
        if let Some(screen) = self.screen.take() {
            self.devices.stop_track(&screen.id);
        }
        self.state.screen_sharing = false;
        self.state.active_video_source = if self.camera.is_some() {
            VideoSource::Camera
        } else {
            VideoSource::None
        };
        self.camera.clone()
    }

    /// Synchronous teardown of every owned source, run before the leave
    /// notification goes out.
    pub fn release_all(&mut self) {
        for track in [
            self.microphone.take(),
            self.camera.take(),
            self.screen.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.devices.stop_track(&track.id);
        }
        self.state = LocalMediaState::default();
    }

    pub fn microphone_track(&self) -> Option<MediaTrack> {
        self.microphone.clone()
    }

    pub fn camera_track(&self) -> Option<MediaTrack> {
        self.camera.clone()
    }

    pub fn screen_track(&self) -> Option<MediaTrack> {
        self.screen.clone()
    }

    /// The track a freshly created link should bind on its video sender.
    pub fn outbound_video_track(&self) -> Option<MediaTrack> {
        if self.state.screen_sharing {
            self.screen.clone()
        } else {
            self.camera.clone()
        }
    }

    pub fn is_screen_track(&self, track: &TrackId) -> bool {
        self.screen.as_ref().is_some_and(|s| s.id == *track)
    }
}

use crate::utils::{TestClient, pid, sid};
use huddle_client::engine::{SenderTuning, TransportState};
use huddle_core::{ClientEvent, ServerEvent};

#[tokio::test]
async fn video_off_and_on_swaps_tracks_without_renegotiating() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;
    let camera = client.devices.last_track("camera").unwrap();
    let offers_before = transport.offer_count();

    let enabled = client.handle.toggle_video().await.unwrap();
    assert!(!enabled);
    // The hardware is released, not muted, and the sender carries nothing.
    assert!(client.devices.stopped().contains(&camera.id));
    assert_eq!(transport.video_track(), None);

    let enabled = client.handle.toggle_video().await.unwrap();
    assert!(enabled);
    let fresh = client.devices.last_track("camera").unwrap();
    assert_ne!(fresh.id, camera.id, "re-enable must acquire a fresh track");
    assert_eq!(transport.video_track(), Some(fresh));

    assert_eq!(transport.offer_count(), offers_before);
    assert_eq!(transport.answer_count(), 0);

    client.settle().await;
    let sent = client.signaling.sent();
    assert!(sent.iter().any(|e| matches!(
        e,
        ClientEvent::ToggleVideo { enabled: false, .. }
    )));
    assert!(sent.iter().any(|e| matches!(
        e,
        ClientEvent::ToggleVideo { enabled: true, .. }
    )));
}

#[tokio::test]
async fn audio_toggle_is_notification_only() {
    let client = TestClient::start(sid(1)).await;
    client.join_with_peer(pid(10), pid(20), sid(2)).await;
    let created_before = client.engine.created_count();
    let mic = client.devices.last_track("mic").unwrap();

    let enabled = client.handle.toggle_audio().await.unwrap();
    assert!(!enabled);

    // The mic keeps running muted; no link or negotiation is touched.
    assert_eq!(client.devices.last_enabled(), Some((mic.id, false)));
    assert!(!client.devices.stopped().contains(&mic.id));
    assert_eq!(client.engine.created_count(), created_before);
    client.settle().await;
    assert!(client.signaling.sent().iter().any(|e| matches!(
        e,
        ClientEvent::ToggleAudio { enabled: false, .. }
    )));
}

#[tokio::test]
async fn screen_share_replaces_the_sender_track_and_restores_the_camera() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;
    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0".to_string(),
    });
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;

    let camera = client.devices.last_track("camera").unwrap();
    let offers_before = transport.offer_count();

    let sharing = client.handle.toggle_screen_share().await.unwrap();
    assert!(sharing);
    let screen = client.devices.last_track("screen").unwrap();
    assert_eq!(transport.video_track(), Some(screen.clone()));
    assert_eq!(transport.video_tuning(), Some(SenderTuning::SCREEN));
    // The camera is suspended, not stopped.
    assert!(!client.devices.stopped().contains(&camera.id));

    let sharing = client.handle.toggle_screen_share().await.unwrap();
    assert!(!sharing);
    assert_eq!(transport.video_track(), Some(camera));
    assert_eq!(transport.video_tuning(), Some(SenderTuning::CAMERA));
    assert!(client.devices.stopped().contains(&screen.id));

    // The whole dance was replace-in-place: no renegotiation.
    assert_eq!(transport.offer_count(), offers_before);

    client.settle().await;
    let sent = client.signaling.sent();
    assert!(sent.iter().any(|e| matches!(e, ClientEvent::ScreenShareStarted { .. })));
    assert!(sent.iter().any(|e| matches!(e, ClientEvent::ScreenShareStopped { .. })));
}

#[tokio::test]
async fn stopping_a_share_with_the_camera_off_leaves_the_sender_empty() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.handle.toggle_video().await.unwrap();
    client.handle.toggle_screen_share().await.unwrap();
    client.handle.toggle_screen_share().await.unwrap();

    assert_eq!(transport.video_track(), None);
}

#[tokio::test]
async fn the_os_ending_the_capture_stops_the_share() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.handle.toggle_screen_share().await.unwrap();
    let screen = client.devices.last_track("screen").unwrap();
    let camera = client.devices.last_track("camera").unwrap();

    client.devices.end_track(&screen.id);
    client.settle().await;

    assert_eq!(transport.video_track(), Some(camera));
    assert!(client.signaling.sent().iter().any(|e| matches!(
        e,
        ClientEvent::ScreenShareStopped { .. }
    )));
}

#[tokio::test]
async fn remote_toggles_update_the_roster_snapshot() {
    let client = TestClient::start(sid(1)).await;
    client.join_with_peer(pid(10), pid(20), sid(2)).await;
    assert!(client.roster()[0].video_enabled);

    client.push(ServerEvent::VideoToggled {
        participant_id: pid(20),
        enabled: false,
    });
    client.push(ServerEvent::AudioToggled {
        participant_id: pid(20),
        enabled: false,
    });
    client.push(ServerEvent::ScreenShareStarted {
        participant_id: pid(20),
    });
    client.settle().await;

    let entry = &client.roster()[0];
    assert!(!entry.video_enabled);
    assert!(!entry.audio_enabled);
    assert!(entry.screen_sharing);
}

#[tokio::test]
async fn a_peer_arriving_mid_share_gets_the_screen_track() {
    let client = TestClient::start(sid(1)).await;
    client.join("r1", pid(10), "alice").await;
    client.handle.toggle_screen_share().await.unwrap();
    let screen = client.devices.last_track("screen").unwrap();

    let transport = client.discover_peer(pid(20), sid(2)).await;
    assert_eq!(transport.video_track(), Some(screen));

    // The share tuning lands as soon as the transport comes up.
    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0".to_string(),
    });
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;
    assert_eq!(transport.video_tuning(), Some(SenderTuning::SCREEN));
}

use crate::utils::{TestPeer, init_tracing};
use huddle_core::{ClientEvent, RoomId, ServerEvent};
use huddle_relay::RelayService;

fn room_of_three(service: &RelayService) -> (TestPeer, TestPeer, TestPeer) {
    let mut alice = TestPeer::connect(service, "alice");
    let mut bob = TestPeer::connect(service, "bob");
    let mut carol = TestPeer::connect(service, "carol");
    alice.join(service, "r1");
    bob.join(service, "r1");
    carol.join(service, "r1");
    alice.drain();
    bob.drain();
    carol.drain();
    (alice, bob, carol)
}

#[tokio::test]
async fn chat_reaches_the_whole_room_with_a_relay_timestamp() {
    init_tracing();
    let service = RelayService::new(huddle_core::IceServerConfig::default_servers());
    let (mut alice, mut bob, mut carol) = room_of_three(&service);

    alice.send(
        &service,
        ClientEvent::ChatMessage {
            room_id: RoomId::from("r1"),
            message: "hello".to_string(),
            user_name: "alice".to_string(),
        },
    );

    for peer in [&mut alice, &mut bob, &mut carol] {
        match peer.recv() {
            Some(ServerEvent::ChatMessage {
                message,
                user_name,
                timestamp,
                ..
            }) => {
                assert_eq!(message, "hello");
                assert_eq!(user_name, "alice");
                assert!(timestamp > 0, "relay must stamp the timestamp");
            }
            other => panic!("{} expected chat-message, got {:?}", peer.name, other),
        }
    }
}

#[tokio::test]
async fn media_toggles_exclude_the_sender() {
    init_tracing();
    let service = RelayService::new(huddle_core::IceServerConfig::default_servers());
    let (mut alice, mut bob, mut carol) = room_of_three(&service);

    alice.send(
        &service,
        ClientEvent::ToggleAudio {
            room_id: RoomId::from("r1"),
            participant_id: alice.participant_id,
            enabled: false,
        },
    );
    alice.send(
        &service,
        ClientEvent::ToggleVideo {
            room_id: RoomId::from("r1"),
            participant_id: alice.participant_id,
            enabled: false,
        },
    );

    for peer in [&mut bob, &mut carol] {
        assert!(matches!(
            peer.recv(),
            Some(ServerEvent::AudioToggled { participant_id, enabled: false })
                if participant_id == alice.participant_id
        ));
        assert!(matches!(
            peer.recv(),
            Some(ServerEvent::VideoToggled { participant_id, enabled: false })
                if participant_id == alice.participant_id
        ));
    }
    alice.assert_silent();
}

#[tokio::test]
async fn reactions_and_screen_share_notices_exclude_the_sender() {
    init_tracing();
    let service = RelayService::new(huddle_core::IceServerConfig::default_servers());
    let (mut alice, mut bob, mut carol) = room_of_three(&service);

    bob.send(
        &service,
        ClientEvent::Reaction {
            room_id: RoomId::from("r1"),
            participant_id: bob.participant_id,
            user_name: "bob".to_string(),
            emoji: "🎉".to_string(),
        },
    );
    bob.send(
        &service,
        ClientEvent::ScreenShareStarted {
            room_id: RoomId::from("r1"),
            participant_id: bob.participant_id,
        },
    );
    bob.send(
        &service,
        ClientEvent::ScreenShareStopped {
            room_id: RoomId::from("r1"),
            participant_id: bob.participant_id,
        },
    );

    for peer in [&mut alice, &mut carol] {
        assert!(matches!(
            peer.recv(),
            Some(ServerEvent::Reaction { participant_id, .. })
                if participant_id == bob.participant_id
        ));
        assert!(matches!(
            peer.recv(),
            Some(ServerEvent::ScreenShareStarted { participant_id })
                if participant_id == bob.participant_id
        ));
        assert!(matches!(
            peer.recv(),
            Some(ServerEvent::ScreenShareStopped { participant_id })
                if participant_id == bob.participant_id
        ));
    }
    bob.assert_silent();
}

use crate::utils::{TestPeer, init_tracing};
use huddle_core::{ClientEvent, ServerEvent};
use huddle_relay::RelayService;

fn service() -> RelayService {
    RelayService::new(huddle_core::IceServerConfig::default_servers())
}

#[tokio::test]
async fn offer_reaches_only_the_addressed_session() {
    init_tracing();
    let service = service();

    let mut alice = TestPeer::connect(&service, "alice");
    let mut bob = TestPeer::connect(&service, "bob");
    let mut carol = TestPeer::connect(&service, "carol");

    alice.send(
        &service,
        ClientEvent::Offer {
            to: bob.session_id,
            sdp: "v=0 offer".to_string(),
        },
    );

    match bob.recv() {
        Some(ServerEvent::Offer { from, sdp }) => {
            assert_eq!(from, alice.session_id);
            assert_eq!(sdp, "v=0 offer");
        }
        other => panic!("Expected offer, got {:?}", other),
    }
    alice.assert_silent();
    carol.assert_silent();
}

#[tokio::test]
async fn answer_and_candidate_round_trip() {
    init_tracing();
    let service = service();

    let mut alice = TestPeer::connect(&service, "alice");
    let mut bob = TestPeer::connect(&service, "bob");

    bob.send(
        &service,
        ClientEvent::Answer {
            to: alice.session_id,
            sdp: "v=0 answer".to_string(),
        },
    );
    bob.send(
        &service,
        ClientEvent::IceCandidate {
            to: alice.session_id,
            // Payload is opaque to the relay; any blob must pass untouched.
            candidate: r#"{"candidate":"candidate:1 1 UDP 2122252543 192.0.2.1 54400 typ host","sdpMid":"0"}"#.to_string(),
        },
    );

    assert!(matches!(
        alice.recv(),
        Some(ServerEvent::Answer { from, .. }) if from == bob.session_id
    ));
    match alice.recv() {
        Some(ServerEvent::IceCandidate { from, candidate }) => {
            assert_eq!(from, bob.session_id);
            assert!(candidate.contains("typ host"));
        }
        other => panic!("Expected ice-candidate, got {:?}", other),
    }
}

#[tokio::test]
async fn envelope_to_self_is_dropped() {
    init_tracing();
    let service = service();

    let mut alice = TestPeer::connect(&service, "alice");
    alice.send(
        &service,
        ClientEvent::Offer {
            to: alice.session_id,
            sdp: "v=0".to_string(),
        },
    );

    alice.assert_silent();
}

#[tokio::test]
async fn envelope_to_vanished_session_is_dropped_silently() {
    init_tracing();
    let service = service();

    let mut alice = TestPeer::connect(&service, "alice");
    let bob = TestPeer::connect(&service, "bob");
    let gone = bob.session_id;
    service.disconnect(&gone);

    alice.send(
        &service,
        ClientEvent::Offer {
            to: gone,
            sdp: "v=0".to_string(),
        },
    );

    // No delivery failure surfaces to the sender.
    alice.assert_silent();
}

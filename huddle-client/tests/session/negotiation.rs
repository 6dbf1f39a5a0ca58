use crate::utils::{TestClient, info, pid, sid};
use huddle_client::engine::TransportState;
use huddle_client::link::{ICE_RESTART_GRACE, NegotiationState};
use huddle_core::ServerEvent;

#[tokio::test]
async fn inbound_offer_before_discovery_makes_us_answerer() {
    let client = TestClient::start(sid(1)).await;
    client.join("r1", pid(10), "alice").await;

    // Bob's offer outruns the participant-joined broadcast.
    client.push(ServerEvent::Offer {
        from: sid(2),
        sdp: "v=0 bob".to_string(),
    });
    client.push(ServerEvent::ParticipantJoined {
        participant_id: pid(20),
        user_name: "bob".to_string(),
        relay_session_id: sid(2),
    });
    client.settle().await;

    // We answered instead of offering; no glare was manufactured.
    assert!(client.signaling.offers().is_empty());
    let answers = client.signaling.answers();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].0, sid(2));
    assert!(answers[0].1.contains("maxaveragebitrate=128000"));

    let transport = client.engine.transport(pid(20));
    assert!(transport.ops().contains(&"set_remote(Offer)".to_string()));
}

#[tokio::test]
async fn glare_is_resolved_the_same_way_every_time() {
    // Our session id is smaller: we must keep the offerer role in every trial.
    for _ in 0..3 {
        let client = TestClient::start(sid(1)).await;
        let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

        client.push(ServerEvent::Offer {
            from: sid(2),
            sdp: "v=0 theirs".to_string(),
        });
        client.settle().await;

        assert!(client.signaling.answers().is_empty());
        assert!(!transport.ops().contains(&"rollback".to_string()));
        assert_eq!(
            client.roster()[0].link_state,
            NegotiationState::OfferSent
        );
    }

    // Their session id is smaller: we must yield in every trial.
    for _ in 0..3 {
        let client = TestClient::start(sid(9)).await;
        let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

        client.push(ServerEvent::Offer {
            from: sid(2),
            sdp: "v=0 theirs".to_string(),
        });
        client.settle().await;

        assert_eq!(client.signaling.answers().len(), 1);
        assert!(transport.ops().contains(&"rollback".to_string()));
        assert_eq!(
            client.roster()[0].link_state,
            NegotiationState::AnswerSent
        );
    }
}

#[tokio::test]
async fn early_candidates_apply_in_arrival_order_after_the_offer() {
    let client = TestClient::start(sid(1)).await;
    client.join("r1", pid(10), "alice").await;

    // Candidates and the offer all arrive before we know who sid(2) is.
    client.push(ServerEvent::IceCandidate {
        from: sid(2),
        candidate: "cand-a".to_string(),
    });
    client.push(ServerEvent::IceCandidate {
        from: sid(2),
        candidate: "cand-b".to_string(),
    });
    client.push(ServerEvent::Offer {
        from: sid(2),
        sdp: "v=0 bob".to_string(),
    });
    client.push(ServerEvent::ExistingParticipants(vec![info(
        pid(20),
        "bob",
        sid(2),
    )]));
    client.settle().await;

    let ops = client.engine.transport(pid(20)).ops();
    let remote_at = ops
        .iter()
        .position(|op| op == "set_remote(Offer)")
        .expect("remote description must be applied");
    let a_at = ops.iter().position(|op| op == "candidate(cand-a)").unwrap();
    let b_at = ops.iter().position(|op| op == "candidate(cand-b)").unwrap();

    assert!(remote_at < a_at, "no candidate before the remote description");
    assert!(a_at < b_at, "candidates must keep arrival order");
}

#[tokio::test]
async fn answer_completes_our_offer_and_late_candidates_apply_directly() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0 answer".to_string(),
    });
    client.push(ServerEvent::IceCandidate {
        from: sid(2),
        candidate: "cand-late".to_string(),
    });
    client.settle().await;

    let ops = transport.ops();
    assert!(ops.contains(&"set_remote(Answer)".to_string()));
    assert!(ops.contains(&"candidate(cand-late)".to_string()));
}

#[tokio::test]
async fn transport_failure_triggers_an_ice_restart_not_a_teardown() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0".to_string(),
    });
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;

    transport.emit_state(TransportState::Failed);
    client.settle().await;

    assert!(transport.ops().contains(&"create_offer(restart)".to_string()));
    assert!(!transport.ops().contains(&"close".to_string()));
    assert_eq!(client.signaling.offers().len(), 2);
    assert_eq!(client.roster().len(), 1, "the link must survive a failure");
}

#[tokio::test(start_paused = true)]
async fn a_stuck_disconnect_restarts_ice_after_the_grace_window() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0".to_string(),
    });
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;

    transport.emit_state(TransportState::Disconnected);
    client.settle().await;
    assert!(!transport.ops().contains(&"create_offer(restart)".to_string()));

    tokio::time::advance(ICE_RESTART_GRACE).await;
    client.settle().await;

    assert!(transport.ops().contains(&"create_offer(restart)".to_string()));
}

#[tokio::test(start_paused = true)]
async fn a_recovered_disconnect_never_restarts() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    client.push(ServerEvent::Answer {
        from: sid(2),
        sdp: "v=0".to_string(),
    });
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;

    transport.emit_state(TransportState::Disconnected);
    client.settle().await;
    transport.emit_state(TransportState::Connected);
    client.settle().await;

    tokio::time::advance(ICE_RESTART_GRACE).await;
    client.settle().await;

    assert!(!transport.ops().contains(&"create_offer(restart)".to_string()));
}

#[tokio::test]
async fn generated_candidates_are_addressed_to_the_peer_session() {
    let client = TestClient::start(sid(1)).await;
    let transport = client.join_with_peer(pid(10), pid(20), sid(2)).await;

    transport.emit_candidate("local-cand");
    client.settle().await;

    let sent = client.signaling.sent();
    assert!(sent.iter().any(|e| matches!(
        e,
        huddle_core::ClientEvent::IceCandidate { to, candidate }
            if *to == sid(2) && candidate == "local-cand"
    )));
}

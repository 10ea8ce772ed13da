//! Integration tests for the sync session, driven end to end through a
//! mock channel standing in for the lobby server.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::timeout;

use trivium_protocol::RoomCode;
use trivium_session::Status;
use trivium_sync::{
    Channel, ChannelEvent, SyncConfig, SyncError, SyncEvent, SyncHandle,
    SyncSession,
};

// =========================================================================
// Mock channel: the test plays the server.
// =========================================================================

struct MockChannel {
    inbox: mpsc::UnboundedReceiver<ChannelEvent>,
    sent: mpsc::UnboundedSender<(String, Value)>,
    closed: bool,
}

/// The server side of a mock channel.
struct MockServer {
    to_client: mpsc::UnboundedSender<ChannelEvent>,
    from_client: mpsc::UnboundedReceiver<(String, Value)>,
}

fn mock_channel() -> (MockChannel, MockServer) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    (
        MockChannel {
            inbox: event_rx,
            sent: sent_tx,
            closed: false,
        },
        MockServer {
            to_client: event_tx,
            from_client: sent_rx,
        },
    )
}

impl Channel for MockChannel {
    async fn emit(
        &mut self,
        name: &str,
        payload: Value,
    ) -> Result<(), SyncError> {
        if self.closed {
            return Err(SyncError::Disconnected);
        }
        self.sent
            .send((name.to_string(), payload))
            .map_err(|_| SyncError::Disconnected)
    }

    async fn next_event(&mut self) -> ChannelEvent {
        if self.closed {
            return ChannelEvent::Closed;
        }
        match self.inbox.recv().await {
            Some(event) => event,
            None => {
                self.closed = true;
                ChannelEvent::Closed
            }
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

impl MockServer {
    fn send(&self, name: &str, payload: Value) {
        self.to_client
            .send(ChannelEvent::Message {
                name: name.to_string(),
                payload,
            })
            .unwrap();
    }

    fn interrupt(&self, event: ChannelEvent) {
        self.to_client.send(event).unwrap();
    }

    /// Next frame the client emitted, failing the test after a second.
    async fn expect_frame(&mut self) -> (String, Value) {
        timeout(Duration::from_secs(1), self.from_client.recv())
            .await
            .expect("timed out waiting for a client frame")
            .expect("client channel closed")
    }

    /// Asserts the client emits nothing for a little while.
    async fn expect_silence(&mut self) {
        let got =
            timeout(Duration::from_millis(100), self.from_client.recv())
                .await;
        assert!(got.is_err(), "unexpected client frame: {:?}", got.unwrap());
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn code() -> RoomCode {
    RoomCode::parse("12345").unwrap()
}

fn config() -> SyncConfig {
    SyncConfig {
        join_timeout: Duration::from_secs(1),
        ..SyncConfig::default()
    }
}

fn roster(names: &[&str]) -> Value {
    json!({
        "members": names
            .iter()
            .map(|n| json!({"username": n, "score": 0}))
            .collect::<Vec<_>>(),
    })
}

fn question_payload(value: i32) -> Value {
    json!({
        "question": {
            "id": 7,
            "prompt": "Capital of New Zealand?",
            "answers": ["Wellington"],
            "value": value,
            "difficulty": 3
        },
        "members": [
            {"username": "ada", "score": 0},
            {"username": "grace", "score": 0}
        ],
    })
}

async fn next_event(
    events: &mut mpsc::UnboundedReceiver<SyncEvent>,
) -> SyncEvent {
    timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("timed out waiting for a sync event")
        .expect("event stream closed")
}

/// Joins a lobby as "ada", playing the server side of the handshake.
async fn join(
    is_host: bool,
    config: SyncConfig,
) -> (SyncHandle, mpsc::UnboundedReceiver<SyncEvent>, MockServer) {
    let (channel, mut server) = mock_channel();
    let joining = tokio::spawn(SyncSession::join(
        channel, code(), "ada", is_host, config,
    ));

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "JOIN_LOBBY");
    assert_eq!(payload["code"], "12345");
    assert_eq!(payload["user"], "ada");
    server.send("LOBBY_JOINED", roster(&["ada", "grace"]));

    let (handle, events) = joining.await.unwrap().unwrap();
    (handle, events, server)
}

/// Starts a round and consumes the RosterChanged + RoundStarted events.
async fn start_round(
    server: &MockServer,
    events: &mut mpsc::UnboundedReceiver<SyncEvent>,
    value: i32,
) {
    server.send("NEXT_QUESTION", question_payload(value));
    assert!(matches!(
        next_event(events).await,
        SyncEvent::RosterChanged(_)
    ));
    assert!(matches!(
        next_event(events).await,
        SyncEvent::RoundStarted { .. }
    ));
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test]
async fn test_join_populates_roster_from_snapshot() {
    let (handle, _events, _server) = join(false, config()).await;

    let view = handle.view().await.unwrap();
    let names: Vec<_> =
        view.members.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["ada", "grace"]);
    assert!(view.current_question.is_none());
    // A fresh lobby is between rounds so the host could start round one.
    assert!(view.round_over);
}

#[tokio::test]
async fn test_join_invalid_code_rejected_cleanly() {
    let (channel, mut server) = mock_channel();
    let joining = tokio::spawn(SyncSession::join(
        channel,
        code(),
        "ada",
        false,
        config(),
    ));

    server.expect_frame().await;
    server.send("INVALID_LOBBY", json!({}));

    assert!(matches!(
        joining.await.unwrap(),
        Err(SyncError::InvalidLobby)
    ));
}

#[tokio::test]
async fn test_join_times_out_when_server_silent() {
    let (channel, mut server) = mock_channel();
    let joining = tokio::spawn(SyncSession::join(
        channel,
        code(),
        "ada",
        false,
        SyncConfig {
            join_timeout: Duration::from_millis(50),
            ..SyncConfig::default()
        },
    ));

    server.expect_frame().await;
    // Say nothing.

    assert!(matches!(
        joining.await.unwrap(),
        Err(SyncError::JoinTimeout)
    ));
}

// =========================================================================
// Host gating
// =========================================================================

#[tokio::test]
async fn test_host_can_advance_before_first_round() {
    let (handle, _events, mut server) = join(true, config()).await;

    handle.advance().await.unwrap();

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "NEXT_QUESTION");
    assert_eq!(payload["code"], "12345");
}

#[tokio::test]
async fn test_guest_cannot_advance() {
    let (handle, _events, mut server) = join(false, config()).await;

    assert!(matches!(
        handle.advance().await,
        Err(SyncError::CannotAdvance)
    ));
    server.expect_silence().await;
}

#[tokio::test]
async fn test_host_cannot_advance_mid_round() {
    let (handle, mut events, server) = join(true, config()).await;
    start_round(&server, &mut events, 300).await;

    assert!(matches!(
        handle.advance().await,
        Err(SyncError::CannotAdvance)
    ));
}

// =========================================================================
// Rounds and results
// =========================================================================

#[tokio::test]
async fn test_correct_answer_emits_one_result_with_full_value() {
    let (handle, mut events, mut server) = join(false, config()).await;
    start_round(&server, &mut events, 300).await;

    let status = handle.submit_answer("  WELLINGTON ").await.unwrap();
    assert_eq!(status, Status::Correct);

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "RESULT");
    // Full question value — no time decay in multiplayer.
    assert_eq!(payload, json!({"code": "12345", "score": 300}));

    assert_eq!(
        next_event(&mut events).await,
        SyncEvent::RoundResolved {
            status: Status::Correct,
            score: 300
        }
    );

    // A second submission for the same round is refused and nothing
    // further reaches the server.
    assert!(matches!(
        handle.submit_answer("Wellington").await,
        Err(SyncError::NoActiveRound)
    ));
    server.expect_silence().await;
}

#[tokio::test]
async fn test_wrong_answer_reports_unchanged_score() {
    let (handle, mut events, mut server) = join(false, config()).await;
    start_round(&server, &mut events, 300).await;

    let status = handle.submit_answer("Auckland").await.unwrap();
    assert_eq!(status, Status::Incorrect);

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "RESULT");
    assert_eq!(payload["score"], 0);
}

#[tokio::test]
async fn test_round_timeout_forces_result_and_unlocks_host() {
    let (handle, mut events, mut server) = join(
        true,
        SyncConfig {
            answer_window: Duration::ZERO,
            ..config()
        },
    )
    .await;
    start_round(&server, &mut events, 300).await;

    // The zero-length window expires on its own: one RESULT with the
    // unchanged score, no answer submitted.
    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "RESULT");
    assert_eq!(payload["score"], 0);
    assert_eq!(
        next_event(&mut events).await,
        SyncEvent::RoundResolved {
            status: Status::TimedOut,
            score: 0
        }
    );

    // Losing the race leaves the late answer a no-op.
    assert!(matches!(
        handle.submit_answer("Wellington").await,
        Err(SyncError::NoActiveRound)
    ));
    server.expect_silence().await;

    // round_over is forced locally even though ROUND_OVER never came.
    let view = handle.view().await.unwrap();
    assert!(view.round_over);
    assert!(view.may_progress);
}

#[tokio::test]
async fn test_round_over_before_timer_expiry_yields_one_result() {
    // The server can declare the round over while our timer is still
    // armed and we have not answered. The expiry then resolves us as
    // timed out with exactly one RESULT.
    let (handle, mut events, mut server) = join(
        true,
        SyncConfig {
            answer_window: Duration::from_millis(50),
            ..config()
        },
    )
    .await;
    start_round(&server, &mut events, 300).await;

    server.send("ROUND_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::RoundOver);

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "RESULT");
    assert_eq!(payload["score"], 0);
    assert_eq!(
        next_event(&mut events).await,
        SyncEvent::RoundResolved {
            status: Status::TimedOut,
            score: 0
        }
    );

    // One RESULT only, and the round stays over.
    server.expect_silence().await;
    let view = handle.view().await.unwrap();
    assert!(view.round_over);
    assert!(view.may_progress);
}

// =========================================================================
// Message ordering tolerance
// =========================================================================

#[tokio::test]
async fn test_score_update_then_round_over() {
    let (handle, mut events, server) = join(true, config()).await;
    start_round(&server, &mut events, 300).await;

    server.send(
        "SCORE_UPDATE",
        json!({"username": "grace", "score": 300, "status": "CORRECT", "answer": "wellington"}),
    );
    assert!(matches!(
        next_event(&mut events).await,
        SyncEvent::ScoreUpdate { ref username, score: 300, .. } if username == "grace"
    ));

    server.send("ROUND_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::RoundOver);

    let view = handle.view().await.unwrap();
    assert_eq!(view.members[1].score, 300);
    assert!(view.round_over);
}

#[tokio::test]
async fn test_round_over_then_late_score_update_still_applies() {
    let (handle, mut events, server) = join(true, config()).await;
    start_round(&server, &mut events, 300).await;

    server.send("ROUND_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::RoundOver);

    // The straggler still counts.
    server.send(
        "SCORE_UPDATE",
        json!({"username": "grace", "score": 300, "status": "CORRECT", "answer": "wellington"}),
    );
    assert!(matches!(
        next_event(&mut events).await,
        SyncEvent::ScoreUpdate { .. }
    ));

    let view = handle.view().await.unwrap();
    assert_eq!(view.members[1].score, 300);
}

#[tokio::test]
async fn test_score_update_for_unknown_member_changes_nothing() {
    let (handle, mut events, server) = join(false, config()).await;
    start_round(&server, &mut events, 300).await;

    server.send(
        "SCORE_UPDATE",
        json!({"username": "nobody", "score": 999, "status": "CORRECT", "answer": "x"}),
    );
    // ROUND_OVER arrives after; channel messages are handled in order,
    // so seeing its event proves the unknown update was processed.
    server.send("ROUND_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::RoundOver);

    let view = handle.view().await.unwrap();
    assert!(view.members.iter().all(|m| m.score == 0));
}

// =========================================================================
// Lifecycle and teardown
// =========================================================================

#[tokio::test]
async fn test_game_over_is_terminal() {
    let (handle, mut events, server) = join(true, config()).await;
    start_round(&server, &mut events, 300).await;

    server.send("GAME_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::GameOver);

    assert!(matches!(
        handle.advance().await,
        Err(SyncError::GameFinished)
    ));
    assert!(matches!(
        handle.submit_answer("Wellington").await,
        Err(SyncError::GameFinished)
    ));
    assert!(handle.view().await.unwrap().finished);
}

#[tokio::test]
async fn test_next_question_after_game_over_is_ignored() {
    // A duplicated or reordered NEXT_QUESTION after GAME_OVER must not
    // restart play or arm the answer timer.
    let (handle, mut events, mut server) = join(
        true,
        SyncConfig {
            answer_window: Duration::ZERO,
            ..config()
        },
    )
    .await;
    server.send("GAME_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::GameOver);

    server.send("NEXT_QUESTION", question_payload(300));
    // Messages are handled in order, so this event arriving without a
    // RoundStarted before it proves the frame was dropped.
    server.send("ROUND_OVER", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::RoundOver);

    // No round began and the zero-length timer never armed: no RESULT.
    server.expect_silence().await;
    let view = handle.view().await.unwrap();
    assert!(view.finished);
    assert_eq!(view.status, Status::Reward);
}

#[tokio::test]
async fn test_lobby_closed_tears_the_session_down() {
    let (handle, mut events, server) = join(false, config()).await;

    server.send("LOBBY_CLOSED", json!({}));
    assert_eq!(next_event(&mut events).await, SyncEvent::LobbyClosed);

    // The actor has stopped; the handle is stale.
    assert!(matches!(
        handle.view().await,
        Err(SyncError::Unavailable)
    ));
}

#[tokio::test]
async fn test_leave_sends_best_effort_notice_and_stops() {
    let (handle, _events, mut server) = join(false, config()).await;

    handle.leave().await;

    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "LEAVE_LOBBY");
    assert_eq!(payload["code"], "12345");
    assert!(matches!(
        handle.view().await,
        Err(SyncError::Unavailable)
    ));
}

#[tokio::test]
async fn test_reconnect_rejoins_for_a_fresh_roster() {
    let (_handle, mut events, mut server) = join(false, config()).await;

    server.interrupt(ChannelEvent::Reconnected);

    // The session must not assume continuity: it re-requests the lobby.
    let (name, payload) = server.expect_frame().await;
    assert_eq!(name, "JOIN_LOBBY");
    assert_eq!(payload["user"], "ada");
    assert_eq!(next_event(&mut events).await, SyncEvent::Reconnected);

    // The fresh roster lands like any other snapshot.
    server.send("LOBBY_JOINED", roster(&["ada"]));
    assert!(matches!(
        next_event(&mut events).await,
        SyncEvent::RosterChanged(members) if members.len() == 1
    ));
}

#[tokio::test]
async fn test_offline_reported_once_to_watcher() {
    let (_handle, mut events, server) = join(false, config()).await;

    server.interrupt(ChannelEvent::Offline);

    assert_eq!(next_event(&mut events).await, SyncEvent::Offline);
}

//! Session behavior against an in-process mock backend

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aircon_client::{AcClient, Session, SessionEvent, SyncState, SyncTrigger};
use aircon_core::{CommandValue, DeviceId};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct MockBackend {
    snapshot_hits: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<Value>>>,
    reject_with: Option<(StatusCode, Value)>,
    snapshot_status: Option<StatusCode>,
}

async fn mock_snapshot(State(mock): State<MockBackend>) -> impl IntoResponse {
    mock.snapshot_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = mock.snapshot_status {
        return (status, Json(json!({"detail": "Missing file: ac_state.json"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "timestamp": "2024-03-01 10:00:00",
            "items": [
                {"ac_id": "F1-AC1", "floor": 1, "room": "Lobby", "status": "ON",
                 "current_temp": 24.0, "set_temp": 22.0, "mode": "Cooling",
                 "health": "Good", "last_service": "2024-01-10", "timestamp": "2024-03-01 10:00:00"},
                {"ac_id": "F1-AC2", "floor": "1", "room": "Reception", "status": "OFF",
                 "current_temp": "25.5", "set_temp": "23", "mode": "Fan",
                 "health": "Good", "last_service": "2024-01-12", "timestamp": "2024-03-01 10:00:00"}
            ]
        })),
    )
}

async fn mock_command(State(mock): State<MockBackend>, Json(body): Json<Value>) -> impl IntoResponse {
    mock.commands.lock().unwrap().push(body.clone());
    if let Some((status, detail)) = mock.reject_with.clone() {
        return (status, Json(detail));
    }
    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "action": body["action"],
            "ac_id": body["ac_id"],
            "new_value": body["value"],
        })),
    )
}

async fn spawn_backend(mock: MockBackend) -> String {
    let app = Router::new()
        .route("/ac", get(mock_snapshot))
        .route("/command", post(mock_command))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn session(base_url: &str) -> Session {
    Session::new(AcClient::new(base_url, "Admin").unwrap())
}

#[tokio::test]
async fn test_turn_off_round_trip_forces_resync() {
    let mock = MockBackend::default();
    let url = spawn_backend(mock.clone()).await;
    let session = session(&url);

    session.submit("turn off F1-AC2").await;

    let commands = mock.commands.lock().unwrap().clone();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["user"], "Admin");
    assert_eq!(commands[0]["action"], "set_status");
    assert_eq!(commands[0]["ac_id"], "F1-AC2");
    assert_eq!(commands[0]["value"], "OFF");
    assert_eq!(commands[0]["note"], "turn off F1-AC2");

    assert_eq!(mock.snapshot_hits.load(Ordering::SeqCst), 1);

    let events = session.events().drain();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], SessionEvent::Echo("turn off F1-AC2".to_string()));
    match &events[1] {
        SessionEvent::Applied(applied) => {
            assert_eq!(applied.action, "set_status");
            assert_eq!(applied.ac_id, DeviceId::new("F1-AC2"));
            assert_eq!(applied.new_value, CommandValue::Text("OFF".to_string()));
        }
        other => panic!("expected Applied, got {:?}", other),
    }
    match &events[2] {
        SessionEvent::Snapshot { trigger, records, .. } => {
            assert_eq!(*trigger, SyncTrigger::Command);
            assert_eq!(records.len(), 2);
        }
        other => panic!("expected Snapshot, got {:?}", other),
    }
    assert_eq!(session.sync_loop().state(), SyncState::Idle);
}

#[tokio::test]
async fn test_set_temp_sends_numeric_value() {
    let mock = MockBackend::default();
    let url = spawn_backend(mock.clone()).await;
    let session = session(&url);

    session.submit("SET f3-ac1 TO 21.5").await;

    let commands = mock.commands.lock().unwrap().clone();
    assert_eq!(commands[0]["ac_id"], "F3-AC1");
    assert_eq!(commands[0]["value"], json!(21.5));
}

#[tokio::test]
async fn test_rejected_command_surfaces_detail_without_resync() {
    let mock = MockBackend {
        reject_with: Some((StatusCode::NOT_FOUND, json!({"detail": "AC not found"}))),
        ..Default::default()
    };
    let url = spawn_backend(mock.clone()).await;
    let session = session(&url);

    session.submit("mode F9-AC9 heating").await;

    let events = session.events().drain();
    assert_eq!(events.len(), 2);
    match &events[1] {
        SessionEvent::Failed(failure) => assert_eq!(failure.bubble(), "Error: AC not found"),
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(mock.snapshot_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejection_without_detail_is_generic() {
    let mock = MockBackend {
        reject_with: Some((StatusCode::BAD_REQUEST, json!({"error": "nope"}))),
        ..Default::default()
    };
    let url = spawn_backend(mock.clone()).await;
    let session = session(&url);

    session.submit("set F1-AC1 to 40").await;

    let events = session.events().drain();
    assert_eq!(
        events.last(),
        Some(&SessionEvent::Failed(aircon_client::CommandFailure::generic()))
    );
}

#[tokio::test]
async fn test_unrecognized_text_never_reaches_backend() {
    let mock = MockBackend::default();
    let url = spawn_backend(mock.clone()).await;
    let session = session(&url);

    session.submit("please set it warmer").await;

    assert!(mock.commands.lock().unwrap().is_empty());
    assert_eq!(mock.snapshot_hits.load(Ordering::SeqCst), 0);
    assert_eq!(session.events().drain(), vec![SessionEvent::Hint]);
}

#[tokio::test]
async fn test_refresh_decodes_lenient_records() {
    let mock = MockBackend::default();
    let url = spawn_backend(mock).await;
    let session = session(&url);

    session.refresh(SyncTrigger::Timer).await;

    match session.events().drain().as_slice() {
        [SessionEvent::Snapshot { seq, timestamp, records, .. }] => {
            assert_eq!(*seq, 1);
            assert_eq!(timestamp.as_deref(), Some("2024-03-01 10:00:00"));
            assert_eq!(records[1].floor_level(), Some(1));
            assert_eq!(records[1].current_temp.as_str(), "25.5");
            assert_eq!(records[1].set_temp.as_str(), "23");
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_fetch_is_quiet() {
    let mock = MockBackend {
        snapshot_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Default::default()
    };
    let url = spawn_backend(mock).await;
    let session = session(&url);

    session.refresh(SyncTrigger::Timer).await;

    assert_eq!(
        session.events().drain(),
        vec![SessionEvent::FetchFailed {
            seq: 1,
            trigger: SyncTrigger::Timer
        }]
    );
}

#[tokio::test]
async fn test_unreachable_backend_fails_command_generically() {
    let session = session("http://127.0.0.1:9");
    session.submit("turn on F1-AC1").await;

    let events = session.events().drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], SessionEvent::Failed(_)));
}

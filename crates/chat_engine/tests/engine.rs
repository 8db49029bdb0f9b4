use std::sync::{Arc, Mutex};
use std::time::Duration;

use chat_engine::{
    Backend, BackendError, BackendSettings, ChatReply, EngineEvent, EngineHandle, FailureKind,
    RouteReply,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Backend for RecordingBackend {
    async fn chat(&self, query: &str) -> Result<ChatReply, BackendError> {
        self.calls.lock().unwrap().push(format!("chat:{query}"));
        Ok(ChatReply {
            response: format!("echo {query}"),
        })
    }

    async fn route(&self, origin: &str, destination: &str) -> Result<RouteReply, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("route:{origin}->{destination}"));
        Err(BackendError {
            kind: FailureKind::Network,
            message: "offline".to_string(),
        })
    }
}

#[test]
fn each_request_yields_one_tagged_event() {
    let backend = Arc::new(RecordingBackend::default());
    let engine = EngineHandle::with_backend(backend.clone()).expect("engine starts");

    engine.request_chat(4, "hello");
    let event = engine.recv_timeout(WAIT).expect("chat event");
    assert_eq!(
        event,
        EngineEvent::ChatCompleted {
            turn_id: 4,
            result: Ok(ChatReply {
                response: "echo hello".to_string()
            }),
        }
    );

    engine.request_route(5, "library", "canteen");
    match engine.recv_timeout(WAIT).expect("route event") {
        EngineEvent::RouteCompleted { turn_id, result } => {
            assert_eq!(turn_id, 5);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }

    assert_eq!(
        *backend.calls.lock().unwrap(),
        vec!["chat:hello".to_string(), "route:library->canteen".to_string()]
    );
    assert!(engine.try_recv().is_none());
}

#[test]
fn recv_waits_for_the_next_event() {
    let engine =
        EngineHandle::with_backend(Arc::new(RecordingBackend::default())).expect("engine starts");
    assert!(engine.try_recv().is_none());

    engine.request_chat(9, "late");
    assert_eq!(
        engine.recv(),
        Some(EngineEvent::ChatCompleted {
            turn_id: 9,
            result: Ok(ChatReply {
                response: "echo late".to_string()
            }),
        })
    );
}

#[test]
fn reqwest_engine_round_trips_against_mock_server() {
    let runtime = tokio::runtime::Runtime::new().expect("test runtime");
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/route"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "map_url": "https://maps/x" })),
            )
            .mount(&server)
            .await;
        server
    });

    let engine = EngineHandle::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("engine starts");
    engine.request_route(1, "a", "b");

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::RouteCompleted {
            turn_id: 1,
            result: Ok(RouteReply {
                map_url: "https://maps/x".to_string()
            }),
        })
    );
    runtime.block_on(async move { drop(server) });
}

//! Provider and call-backend clients against mock HTTP upstreams.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parley_types::{CallMetadata, Language, WebCallSession};
use parley_voice::{CallBackend, HttpCallBackend, ProviderConfig, ProviderService, VoiceError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth_headers: Arc<Mutex<Vec<String>>>,
}

async fn provider_handler(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    recorded.auth_headers.lock().unwrap().push(auth);

    let reject = body["agent_id"] == "agent-bad";
    recorded.bodies.lock().unwrap().push(body);

    if reject {
        return (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({"error": "quota exceeded"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"call_id": "call-7", "access_token": "tok-7"})),
    )
}

async fn spawn_provider(recorded: Recorded) -> String {
    let app = Router::new()
        .route("/v2/create-web-call", post(provider_handler))
        .with_state(recorded);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn metadata() -> CallMetadata {
    CallMetadata {
        language: Language::Ru,
        company_name: "Acme LLC".to_string(),
        valid_company: true,
    }
}

#[tokio::test]
async fn create_web_call_mints_credential() {
    let recorded = Recorded::default();
    let base = spawn_provider(recorded.clone()).await;
    let provider = ProviderService::new(ProviderConfig::new(base, "key-1"));

    let credential = provider.create_web_call("agent-x", &metadata()).await.unwrap();
    assert_eq!(credential.access_token, "tok-7");
    assert_eq!(credential.call_id.as_deref(), Some("call-7"));

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies[0]["agent_id"], "agent-x");
    assert_eq!(bodies[0]["metadata"]["company_name"], "Acme LLC");
    assert_eq!(bodies[0]["dynamic_variables"]["name"], "Acme LLC");

    let auth = recorded.auth_headers.lock().unwrap();
    assert_eq!(auth[0], "Bearer key-1");
}

#[tokio::test]
async fn provider_rejection_surfaces_status_and_body() {
    let base = spawn_provider(Recorded::default()).await;
    let provider = ProviderService::new(ProviderConfig::new(base, "key-1"));

    let err = provider
        .create_web_call("agent-bad", &metadata())
        .await
        .unwrap_err();
    match err {
        VoiceError::ProviderRejected { status, message } => {
            assert_eq!(status, 402);
            assert!(message.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

async fn backend_handler(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("company_id") == Some(&json!("boom")) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "provider failure"})),
        );
    }
    let session = WebCallSession {
        access_token: "tok-2".to_string(),
        call_id: None,
        metadata: CallMetadata {
            language: Language::En,
            company_name: "Sycorax AI".to_string(),
            valid_company: body.get("company_id").is_none(),
        },
    };
    (StatusCode::CREATED, Json(serde_json::to_value(session).unwrap()))
}

async fn spawn_backend() -> String {
    let app = Router::new().route("/api/create-web-call", post(backend_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn http_call_backend_round_trips_session() {
    let backend = HttpCallBackend::new(spawn_backend().await);

    let session = backend.create_web_call(None).await.unwrap();
    assert_eq!(session.access_token, "tok-2");
    assert!(session.metadata.valid_company);

    let session = backend.create_web_call(Some("999")).await.unwrap();
    assert!(!session.metadata.valid_company);
}

#[tokio::test]
async fn http_call_backend_maps_failure_status() {
    let backend = HttpCallBackend::new(spawn_backend().await);

    let err = backend.create_web_call(Some("boom")).await.unwrap_err();
    match err {
        VoiceError::Backend(message) => assert!(message.contains("500")),
        other => panic!("unexpected error: {other:?}"),
    }
}

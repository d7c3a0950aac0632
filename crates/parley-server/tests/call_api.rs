//! End-to-end API tests against a mock telephony provider.

use axum::body::Body;
use axum::extract::Json as AxumJson;
use axum::http::{header, Request, StatusCode};
use axum::routing::post;
use axum::Router;
use parley_server::{app, AppState};
use parley_tenants::{TenantDirectory, TenantSource, TenantStore, TenantTable, DEFAULT_TENANT_TTL};
use parley_types::{Language, TenantConfig};
use parley_voice::{ProviderConfig, ProviderService};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn provider_handler(AxumJson(body): AxumJson<Value>) -> (StatusCode, AxumJson<Value>) {
    let agent_id = body["agent_id"].as_str().unwrap_or_default();
    if agent_id == "agent-fail" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            AxumJson(json!({"error": "provider exploded"})),
        );
    }
    (
        StatusCode::CREATED,
        AxumJson(json!({
            "access_token": format!("tok-{agent_id}"),
            "call_id": "call-1"
        })),
    )
}

/// Spawns a mock provider and returns its base URL.
async fn spawn_provider() -> String {
    let router = Router::new().route("/v2/create-web-call", post(provider_handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn tenant(agent_id: &str, language: Language, display_name: &str) -> TenantConfig {
    TenantConfig {
        agent_id: agent_id.to_string(),
        language,
        display_name: display_name.to_string(),
    }
}

async fn setup_app() -> Router {
    let mut table = TenantTable::new();
    table.insert("123".to_string(), tenant("agent-x", Language::Ru, "Acme LLC"));
    table.insert("666".to_string(), tenant("agent-fail", Language::En, "Broken Co"));

    let store = TenantStore::new(TenantSource::Static(Arc::new(table)), DEFAULT_TENANT_TTL);
    let directory = TenantDirectory::new(store, tenant("agent-default", Language::En, "Sycorax AI"));
    let provider = ProviderService::new(ProviderConfig::new(spawn_provider().await, "test-key"));

    app(AppState {
        directory,
        provider,
        client_dir: "does-not-exist".to_string(),
    })
}

async fn post_create_web_call(app: Router, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method("POST")
            .uri("/api/create-web-call")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method("POST")
            .uri("/api/create-web-call")
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = setup_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn known_company_gets_its_language_and_name() {
    let app = setup_app().await;

    let (status, body) = post_create_web_call(app, Some(json!({"company_id": "123"}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["access_token"], "tok-agent-x");
    assert_eq!(body["metadata"]["language"], "ru");
    assert_eq!(body["metadata"]["company_name"], "Acme LLC");
    assert_eq!(body["metadata"]["valid_company"], true);
}

#[tokio::test]
async fn unknown_company_falls_back_to_defaults() {
    let app = setup_app().await;

    let (status, body) =
        post_create_web_call(app, Some(json!({"company_id": "unknown999"}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["access_token"], "tok-agent-default");
    assert_eq!(body["metadata"]["language"], "en");
    assert_eq!(body["metadata"]["company_name"], "Sycorax AI");
    assert_eq!(body["metadata"]["valid_company"], false);
}

#[tokio::test]
async fn missing_body_uses_defaults_without_flagging() {
    let app = setup_app().await;

    let (status, body) = post_create_web_call(app, None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["metadata"]["valid_company"], true);
    assert_eq!(body["metadata"]["company_name"], "Sycorax AI");
}

#[tokio::test]
async fn provider_failure_is_a_500() {
    let app = setup_app().await;

    let (status, _) = post_create_web_call(app, Some(json!({"company_id": "666"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn company_lookup_returns_stored_config() {
    let app = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/company/123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["company_id"], "123");
    assert_eq!(body["agent_id"], "agent-x");
    assert_eq!(body["language"], "ru");
    assert_eq!(body["company_name"], "Acme LLC");
}

#[tokio::test]
async fn company_lookup_unknown_is_404() {
    let app = setup_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/company/unknown999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Parley server library logic.
//!
//! A thin backend for the voice-agent web demo: one endpoint mints a
//! one-time web-call credential (resolving tenant config along the way),
//! one exposes the tenant lookup, and the rest is static-file serving for
//! the browser client. The session lifecycle itself lives in the browser;
//! this server is stateless between calls.

pub mod api_call;
pub mod api_company;
pub mod config;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use parley_tenants::TenantDirectory;
use parley_voice::ProviderService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Maximum request body size (64 KiB). Requests here carry at most a tenant
/// id; anything bigger is garbage.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
pub struct AppState {
    /// Tenant resolution over the cached table.
    pub directory: TenantDirectory,
    /// Telephony provider credential client.
    pub provider: ProviderService,
    /// Directory holding the browser client build.
    pub client_dir: String,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/create-web-call",
            post(api_call::create_web_call_handler),
        )
        .route(
            "/api/company/{companyId}",
            get(api_company::get_company_handler),
        );

    // Serve the browser client build if present, with index.html as the
    // SPA fallback.
    let client_dir = state.client_dir.clone();
    let router = if std::path::Path::new(&client_dir).join("index.html").exists() {
        tracing::info!(path = %client_dir, "serving client static files");
        let index = format!("{client_dir}/index.html");
        router.fallback_service(ServeDir::new(&client_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::info!(path = %client_dir, "client directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

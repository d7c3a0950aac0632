//! The web-call creation endpoint.

use crate::AppState;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::Json;
use parley_types::{CallMetadata, WebCallSession};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct CreateWebCallRequest {
    /// Tenant id the browser was opened for; absent for the plain demo path.
    #[serde(default)]
    pub company_id: Option<String>,
}

/// POST /api/create-web-call
///
/// Resolves the tenant config, mints a one-time credential from the
/// telephony provider for the resolved agent, and returns it with the
/// tenant metadata attached. Provider failure is a 500; an unreachable
/// tenant source is a 502. An unknown tenant id is neither: the defaults
/// are used and flagged via `valid_company`.
pub async fn create_web_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Option<Json<CreateWebCallRequest>>,
) -> Result<(StatusCode, Json<WebCallSession>), (StatusCode, String)> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let company_id = request.company_id.as_deref();

    let resolution = state.directory.resolve(company_id).await.map_err(|e| {
        tracing::error!(error = %e, "tenant resolution failed");
        (
            StatusCode::BAD_GATEWAY,
            "tenant source unavailable".to_string(),
        )
    })?;

    let metadata = CallMetadata {
        language: resolution.config.language,
        company_name: resolution.config.display_name.clone(),
        valid_company: resolution.valid_tenant,
    };

    let credential = state
        .provider
        .create_web_call(&resolution.config.agent_id, &metadata)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "error creating web call");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error creating web call".to_string(),
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(WebCallSession {
            access_token: credential.access_token,
            call_id: credential.call_id,
            metadata,
        }),
    ))
}

//! Companion tenant lookup endpoint.

use crate::AppState;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::Json;
use parley_types::Language;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub company_id: String,
    pub agent_id: String,
    pub language: Language,
    pub company_name: String,
}

/// GET /api/company/{companyId}
///
/// Unknown ids are a plain 404 here, unlike the create-web-call path where
/// they fall back to the defaults.
pub async fn get_company_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(company_id): Path<String>,
) -> Result<Json<CompanyResponse>, (StatusCode, String)> {
    let config = state
        .directory
        .lookup(&company_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "tenant lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                "tenant source unavailable".to_string(),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "unknown company id".to_string()))?;

    Ok(Json(CompanyResponse {
        company_id,
        agent_id: config.agent_id,
        language: config.language,
        company_name: config.display_name,
    }))
}

//! Browser-side client for the Parley call backend.
//!
//! The controller does not talk to the telephony provider directly: it asks
//! our own backend for a one-time credential plus tenant metadata, and only
//! then hands the credential to the SDK.

use crate::error::VoiceError;
use parley_types::WebCallSession;
use serde::Serialize;

/// Source of web-call credentials for the session controller.
#[allow(async_fn_in_trait)]
pub trait CallBackend {
    async fn create_web_call(&self, tenant_id: Option<&str>) -> Result<WebCallSession, VoiceError>;
}

#[derive(Serialize)]
struct CreateWebCallRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    company_id: Option<&'a str>,
}

/// [`CallBackend`] over HTTP, targeting `POST /api/create-web-call`.
#[derive(Debug, Clone)]
pub struct HttpCallBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCallBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl CallBackend for HttpCallBackend {
    async fn create_web_call(&self, tenant_id: Option<&str>) -> Result<WebCallSession, VoiceError> {
        let url = format!("{}/api/create-web-call", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&CreateWebCallRequest {
                company_id: tenant_id,
            })
            .send()
            .await
            .map_err(|e| VoiceError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VoiceError::Backend(format!(
                "create-web-call returned status {status}"
            )));
        }

        response
            .json::<WebCallSession>()
            .await
            .map_err(|e| VoiceError::Backend(format!("invalid create-web-call response: {e}")))
    }
}

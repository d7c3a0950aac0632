//! Server-side client for the telephony provider's web-call API.

use crate::config::ProviderConfig;
use crate::error::VoiceError;
use parley_types::CallMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One-time credential minted by the provider for a single web call.
#[derive(Debug, Clone, Deserialize)]
pub struct WebCallCredential {
    pub access_token: String,
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Serialize)]
struct CreateWebCallRequest<'a> {
    agent_id: &'a str,
    metadata: &'a CallMetadata,
    /// Variables interpolated into the agent's prompt (e.g. the company
    /// name it introduces itself for).
    dynamic_variables: HashMap<&'static str, &'a str>,
}

/// Client for the provider's credential-minting endpoint.
#[derive(Debug, Clone)]
pub struct ProviderService {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl ProviderService {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Requests a one-time web-call credential for the given agent.
    ///
    /// The tenant metadata is attached to the call so the agent and any
    /// downstream tooling can see which tenant the session belongs to.
    pub async fn create_web_call(
        &self,
        agent_id: &str,
        metadata: &CallMetadata,
    ) -> Result<WebCallCredential, VoiceError> {
        let url = format!("{}/v2/create-web-call", self.config.base_url);
        let request = CreateWebCallRequest {
            agent_id,
            metadata,
            dynamic_variables: HashMap::from([("name", metadata.company_name.as_str())]),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), agent_id, "provider rejected web call");
            return Err(VoiceError::ProviderRejected {
                status: status.as_u16(),
                message,
            });
        }

        let credential: WebCallCredential = response.json().await?;
        tracing::info!(
            agent_id,
            call_id = credential.call_id.as_deref().unwrap_or("<none>"),
            "minted web-call credential"
        );
        Ok(credential)
    }
}

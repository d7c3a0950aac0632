//! The SDK client surface consumed by the session controller.
//!
//! The provider's browser SDK is an external contract: two operations and
//! six named lifecycle events. It is abstracted as a trait so the controller
//! can be exercised against a scripted client in tests.

use crate::error::VoiceError;
use serde_json::Value;

/// Options for the SDK's start operation.
///
/// Everything except the credential is a fixed audio parameter passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCallOptions {
    pub access_token: String,
    pub sample_rate: u32,
    pub capture_device_id: String,
    pub emit_raw_audio_samples: bool,
}

/// Lifecycle events emitted by the SDK client during a call.
#[derive(Debug, Clone)]
pub enum CallEvent {
    CallStarted,
    CallEnded,
    AgentStartTalking,
    AgentStopTalking,
    /// Mid-call payload (transcripts etc.); forwarded, never interpreted.
    Update(Value),
    Error(String),
}

/// The opaque provider SDK client: start and stop a call session.
///
/// Futures are not required to be `Send`; the controller is generic over
/// the client, so callers that spawn pick their own bounds.
#[allow(async_fn_in_trait)]
pub trait VoiceClient {
    async fn start_call(&self, options: StartCallOptions) -> Result<(), VoiceError>;
    async fn stop_call(&self) -> Result<(), VoiceError>;
}

//! Voice-call plumbing for the Parley platform.
//!
//! Integrates with the third-party conversational-AI telephony provider:
//! mints one-time web-call credentials on the server side, and drives the
//! browser-side call session on the client side. The hard parts (speech
//! recognition, turn-taking, audio transport) live inside the provider's
//! SDK, consumed here as an opaque [`VoiceClient`] with six lifecycle
//! events and start/stop operations.
//!
//! The one real concurrency contract in this crate is the
//! [`SessionController`]'s single-flight guard: overlapping start/stop
//! requests are dropped, never queued, so start and stop sequences can
//! never interleave for one controller instance.

pub mod backend;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod provider;

pub use backend::{CallBackend, HttpCallBackend};
pub use client::{CallEvent, StartCallOptions, VoiceClient};
pub use config::{ProviderConfig, SessionConfig};
pub use controller::{
    ActionOutcome, AgentActivity, MicPermission, SessionController, SessionState,
};
pub use error::VoiceError;
pub use provider::{ProviderService, WebCallCredential};

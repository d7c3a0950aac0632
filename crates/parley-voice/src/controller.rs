//! Client-side call session state machine.
//!
//! One controller tracks one active session. User clicks toggle start/stop
//! through [`SessionController::handle_call_action`]; the SDK drives state
//! through [`SessionController::on_event`]. A single-flight guard drops any
//! action that arrives while a start or stop sequence is still running, so
//! the two can never interleave.
//!
//! Stop-during-connect policy: a stop arriving while the controller is
//! `Connecting` is dropped by the guard; the pending start completes and the
//! next action stops the session. There is no cancellation token for an
//! in-flight credential fetch.

use crate::backend::CallBackend;
use crate::client::{CallEvent, StartCallOptions, VoiceClient};
use crate::config::SessionConfig;
use crate::error::VoiceError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// What the agent is doing while a call is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentActivity {
    Listening,
    Speaking,
}

/// Lifecycle of the (at most one) call session owned by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Active(AgentActivity),
    Ending,
}

/// Microphone permission as reported by the environment.
///
/// Denial is handled locally by disabling the start path; it is never
/// surfaced as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicPermission {
    Unknown,
    Granted,
    Denied,
}

/// What a call to [`SessionController::handle_call_action`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Started,
    Stopped,
    /// Another start/stop sequence was in flight; the action was dropped.
    Busy,
    /// Microphone permission is denied; the start was not attempted.
    MicDenied,
}

/// Clears the in-flight flag on every exit path, including panics and early
/// returns, so a failure mid-action can never permanently block the
/// controller.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Controller for a single browser-tab call session.
///
/// State lives behind a `std::sync::Mutex` intentionally: every lock
/// acquisition is a brief read or write that never spans an `.await` point.
/// The single-flight guard is an atomic compare-and-swap rather than a
/// checked flag because tasks here are not confined to one cooperative
/// event loop.
#[derive(Debug)]
pub struct SessionController<C, B> {
    client: C,
    backend: B,
    config: SessionConfig,
    /// Tenant id this tab was opened for, if any (query parameter in the
    /// original UI). Passed through to the backend on every start.
    tenant_id: Option<String>,
    state: Mutex<SessionState>,
    mic_permission: Mutex<MicPermission>,
    in_flight: AtomicBool,
}

impl<C, B> SessionController<C, B>
where
    C: VoiceClient,
    B: CallBackend,
{
    pub fn new(client: C, backend: B, tenant_id: Option<String>, config: SessionConfig) -> Self {
        Self {
            client,
            backend,
            config,
            tenant_id,
            state: Mutex::new(SessionState::Idle),
            mic_permission: Mutex::new(MicPermission::Unknown),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("session state lock poisoned")
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().expect("session state lock poisoned");
        tracing::debug!(from = ?*state, to = ?next, "session state transition");
        *state = next;
    }

    pub fn mic_permission(&self) -> MicPermission {
        *self
            .mic_permission
            .lock()
            .expect("mic permission lock poisoned")
    }

    pub fn set_mic_permission(&self, permission: MicPermission) {
        *self
            .mic_permission
            .lock()
            .expect("mic permission lock poisoned") = permission;
    }

    /// Single public entry point: toggles start/stop for the session.
    ///
    /// At most one start-or-stop sequence runs at a time; an action arriving
    /// while one is in flight returns [`ActionOutcome::Busy`] without doing
    /// anything (dropped, not queued).
    pub async fn handle_call_action(&self) -> Result<ActionOutcome, VoiceError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(ActionOutcome::Busy);
        }
        let _reset = InFlightReset(&self.in_flight);

        if self.state() != SessionState::Idle {
            return self.stop_session().await;
        }

        if self.mic_permission() == MicPermission::Denied {
            tracing::warn!("microphone permission denied, start disabled");
            return Ok(ActionOutcome::MicDenied);
        }

        self.set_state(SessionState::Connecting);
        match self.start_session().await {
            Ok(()) => Ok(ActionOutcome::Started),
            Err(e) => {
                tracing::error!(error = %e, "failed to start call session");
                // Make sure no half-started session lingers.
                if let Err(stop_err) = self.client.stop_call().await {
                    tracing::debug!(error = %stop_err, "stop after failed start also failed");
                }
                self.set_state(SessionState::Idle);
                Err(e)
            }
        }
    }

    async fn start_session(&self) -> Result<(), VoiceError> {
        let session = self
            .backend
            .create_web_call(self.tenant_id.as_deref())
            .await?;

        if !session.metadata.valid_company {
            tracing::warn!(
                tenant_id = self.tenant_id.as_deref().unwrap_or("<none>"),
                "backend flagged tenant as invalid, proceeding with defaults"
            );
        }

        let options = StartCallOptions {
            access_token: session.access_token,
            sample_rate: self.config.sample_rate,
            capture_device_id: self.config.capture_device_id.clone(),
            emit_raw_audio_samples: self.config.emit_raw_audio_samples,
        };
        self.client.start_call(options).await
    }

    async fn stop_session(&self) -> Result<ActionOutcome, VoiceError> {
        self.set_state(SessionState::Ending);
        let stopped = self.client.stop_call().await;
        self.set_state(SessionState::Idle);
        stopped?;

        // Let the transport release the microphone before a new start can
        // re-acquire it. The guard stays held for the whole delay.
        tokio::time::sleep(self.config.settle_delay).await;
        Ok(ActionOutcome::Stopped)
    }

    /// Applies one SDK lifecycle event to the state machine.
    ///
    /// Each event maps to exactly one transition; no handler does business
    /// logic beyond updating state and logging.
    pub async fn on_event(&self, event: CallEvent) {
        match event {
            CallEvent::CallStarted => self.set_state(SessionState::Active(AgentActivity::Listening)),
            CallEvent::AgentStartTalking => {
                self.set_state(SessionState::Active(AgentActivity::Speaking))
            }
            CallEvent::AgentStopTalking => {
                self.set_state(SessionState::Active(AgentActivity::Listening))
            }
            CallEvent::CallEnded => self.set_state(SessionState::Idle),
            CallEvent::Update(update) => {
                tracing::debug!(%update, "call update");
            }
            CallEvent::Error(message) => {
                tracing::error!(error = %message, "sdk reported call error");
                if let Err(e) = self.client.stop_call().await {
                    tracing::debug!(error = %e, "stop after sdk error failed");
                }
                self.set_state(SessionState::Idle);
            }
        }
    }
}

use std::fmt;
use std::time::Duration;

/// Default settle delay after stopping a call, giving the transport time to
/// release the microphone before a new start re-acquires it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(400);

/// Audio sample rate passed through to the SDK unchanged.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Telephony provider API settings.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Session controller settings.
///
/// The audio parameters are fixed pass-through values for the SDK's start
/// operation; the controller never computes them.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub settle_delay: Duration,
    pub sample_rate: u32,
    pub capture_device_id: String,
    pub emit_raw_audio_samples: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            sample_rate: DEFAULT_SAMPLE_RATE,
            capture_device_id: "default".to_string(),
            emit_raw_audio_samples: false,
        }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("provider request failed: {0}")]
    ProviderHttp(#[from] reqwest::Error),

    #[error("provider rejected web-call request (status {status}): {message}")]
    ProviderRejected { status: u16, message: String },

    #[error("call backend error: {0}")]
    Backend(String),

    #[error("voice client error: {0}")]
    Client(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenantError {
    #[error("tenant source fetch failed: {0}")]
    UpstreamFetch(#[from] reqwest::Error),

    #[error("tenant source returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("tenant source returned no rows")]
    EmptyTable,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The SSO provider rejected a request or returned a non-success status.
    #[error("SSO {operation} failed (status {status:?}): {detail}")]
    Sso {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Sealing or unsealing the stored access token failed.
    #[error("token codec error: {0}")]
    Codec(String),
    /// CSRF state absent, mismatched, or already consumed.
    #[error("login state mismatch")]
    StateMismatch,
    #[error("invalid national id: {0}")]
    InvalidNationalId(String),
}

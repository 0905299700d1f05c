use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("upstream credentials are not configured")]
    NoCredentials,
    #[error("upstream rejected the call ({status}): {body}")]
    Unauthorized { status: u16, body: String },
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
    #[error("malformed generative output: {0}")]
    MalformedGenerative(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(String),
}

impl FeedError {
    /// 401/403/429 all mean "stop calling the live tier for a while"; everything
    /// else upstream-side is a plain failure for this one call.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 | 429 => FeedError::Unauthorized {
                status: status.as_u16(),
                body,
            },
            _ => FeedError::Upstream {
                status: status.as_u16(),
                body,
            },
        }
    }

    pub fn is_quota(&self) -> bool {
        matches!(self, FeedError::Unauthorized { status: 429, .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FeedError::Http(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

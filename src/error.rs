/// Failure confined to a single listing item.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("request failed for {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("read body of {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no node matching '{selector}' in {url}")]
    MissingNode { url: String, selector: String },
}

impl ItemError {
    /// Transient failures worth another attempt: transport errors and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Body { .. } => true,
            Self::Status { status, .. } => status.is_server_error(),
            Self::MissingNode { .. } => false,
        }
    }

    /// The page arrived but did not have the expected shape.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingNode { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::MissingNode { url, .. } => url,
        }
    }
}

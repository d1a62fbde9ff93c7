use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single completion round trip.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Sending the request or reading the response body failed.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status (bad credential,
    /// exhausted quota, unknown model, ...).
    #[error("completion request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// The response body could not be decoded.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("completion response contained no choices")]
    NoChoices,
}

impl CompletionError {
    /// Returns `true` if the service rejected the credential.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Api { status, .. } if *status == StatusCode::UNAUTHORIZED
        )
    }
}

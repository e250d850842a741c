use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single provider request.
///
/// Callers only ever see one kind of failure; the variants exist so the cause
/// can be logged. Slots replace it with their own fixed message before display.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty query")]
    EmptyQuery,

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("provider responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider response is missing `{0}`")]
    MissingField(&'static str),

    #[error("provider reported an error: {0}")]
    Provider(String),
}

impl FetchError {
    pub const CITY_MESSAGE: &'static str = "City not found or network error.";
}

impl From<reqwest::Error> for FetchError {
    /// The request URL carries the API key in its query, so it never goes into the error.
    fn from(error: reqwest::Error) -> Self {
        FetchError::Request(error.without_url())
    }
}

/// Cap on how much of an error body ends up in logs.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// An operation that needs a remote id was called before `create` succeeded.
    #[error("Need to call create before calling {operation}")]
    NotCreated { operation: &'static str },

    /// The server answered 200 but the body lacks an `id` field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("response has no data field")]
    MissingData,

    #[error("no access token available")]
    MissingAccessToken,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

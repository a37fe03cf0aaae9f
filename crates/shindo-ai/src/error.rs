use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// Model or shopping API output that does not match the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no product information found")]
    NotFound,

    #[error("model returned no text")]
    EmptyResponse,
}

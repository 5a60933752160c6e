use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("AI API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Text generation returned an empty response")]
    EmptyResponse,

    #[error("`{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Unknown AI backend: {0}")]
    UnknownBackend(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

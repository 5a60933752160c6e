use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] commitfolio_core::Error),

    #[error("Git error: {0}")]
    Git(#[from] commitfolio_git::Error),

    #[error("Text generation error: {0}")]
    Ai(#[from] commitfolio_ai::Error),

    #[error("{operation} timed out after {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: std::time::Duration,
    },

    #[error("Nothing to process: {0}")]
    NothingToProcess(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Await `future`, turning an elapsed `limit` into [`Error::Timeout`].
pub(crate) async fn with_timeout<T, E, F>(
    operation: &'static str,
    limit: std::time::Duration,
    future: F,
) -> Result<T>
where
    F: std::future::Future<Output = std::result::Result<T, E>>,
    Error: From<E>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => Err(Error::Timeout { operation, limit }),
    }
}

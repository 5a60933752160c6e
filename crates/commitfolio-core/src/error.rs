use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Concurrency limit must be at least 1 (got {0})")]
    InvalidConcurrency(usize),

    #[error("Malformed ledger at line {line}: {reason}")]
    MalformedLedger { line: usize, reason: String },

    #[error("No {stage} succeeded; partial artifacts are in {}", artifacts.display())]
    BatchExhausted { stage: String, artifacts: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

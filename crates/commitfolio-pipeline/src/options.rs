use commitfolio_core::{BoundedRunner, DEFAULT_CONCURRENCY};
use std::path::PathBuf;
use std::time::Duration;

use crate::Result;

/// Knobs shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub concurrency: usize,
    pub clone_timeout: Duration,
    pub log_timeout: Duration,
    pub generation_timeout: Duration,
    /// Parent of the transient per-repository checkouts.
    pub work_dir: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            clone_timeout: Duration::from_secs(120),
            log_timeout: Duration::from_secs(60),
            generation_timeout: Duration::from_secs(600),
            work_dir: std::env::temp_dir().join("commitfolio"),
        }
    }
}

impl PipelineOptions {
    pub fn runner(&self) -> Result<BoundedRunner> {
        Ok(BoundedRunner::new(self.concurrency)?)
    }
}

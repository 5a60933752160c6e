pub mod artifacts;
pub mod collect;
pub mod error;
pub mod generate;
pub mod options;
mod progress;

// Re-exports
pub use artifacts::OutputLayout;
pub use collect::{Collection, CommitCollector, RepoCollection};
pub use error::{Error, Result};
pub use generate::{assemble_resume, ResumeGenerator, ResumeOutcome};
pub use options::PipelineOptions;

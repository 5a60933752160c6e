pub mod error;
pub mod grouping;
pub mod ledger;
pub mod models;
pub mod report;
pub mod runner;

// Re-exports
pub use error::{Error, Result};
pub use grouping::{group_by_month, group_by_repo_marker, MonthGroups, RepoActivities};
pub use ledger::LedgerRow;
pub use models::{sort_newest_first, AuthorIdentity, Commit, RepoRef, RepoSummary, Section};
pub use report::{BatchSummary, ItemEvent, ItemOutcome, Reporter, Stage, TracingReporter};
pub use runner::{BoundedRunner, Completion};

/// Concurrency ceiling shared by every fan-out stage unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 10;

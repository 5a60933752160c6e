use serde::Serialize;

/// The three fan-out stages of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Collect,
    Sections,
    Summaries,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Collect => write!(f, "commit collection"),
            Stage::Sections => write!(f, "monthly sections"),
            Stage::Summaries => write!(f, "repository summaries"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome<'a> {
    Succeeded { detail: &'a str },
    Failed { reason: &'a str },
}

/// One work item resolved; `completed` counts in completion order.
#[derive(Debug, Clone, Copy)]
pub struct ItemEvent<'a> {
    pub stage: Stage,
    pub label: &'a str,
    pub outcome: ItemOutcome<'a>,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_results<T, E>(results: &[std::result::Result<T, E>]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    pub fn nothing_succeeded(&self) -> bool {
        self.succeeded == 0
    }
}

/// Sink for pipeline progress.
pub trait Reporter: Send + Sync {
    fn stage_started(&self, stage: Stage, total: usize);

    fn item_finished(&self, event: ItemEvent<'_>);

    fn stage_finished(&self, stage: Stage, summary: BatchSummary);
}

/// Reports through `tracing` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn stage_started(&self, stage: Stage, total: usize) {
        tracing::info!("Starting {}: {} items", stage, total);
    }

    fn item_finished(&self, event: ItemEvent<'_>) {
        match event.outcome {
            ItemOutcome::Succeeded { detail } => tracing::info!(
                "[{}/{}] ✓ {} {}",
                event.completed,
                event.total,
                event.label,
                detail
            ),
            ItemOutcome::Failed { reason } => tracing::warn!(
                "[{}/{}] ✗ {}: {}",
                event.completed,
                event.total,
                event.label,
                reason
            ),
        }
    }

    fn stage_finished(&self, stage: Stage, summary: BatchSummary) {
        tracing::info!(
            "Finished {}: {}/{} succeeded",
            stage,
            summary.succeeded,
            summary.total
        );
    }
}

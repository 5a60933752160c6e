use commitfolio_core::{BatchSummary, ItemEvent, ItemOutcome, Reporter, Stage};

/// Prints one line per finished item to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn stage_started(&self, stage: Stage, total: usize) {
        println!("\n{} ({} items)", stage, total);
    }

    fn item_finished(&self, event: ItemEvent<'_>) {
        println!("{}", item_line(&event));
    }

    fn stage_finished(&self, stage: Stage, summary: BatchSummary) {
        println!("{}", summary_line(stage, summary));
    }
}

fn item_line(event: &ItemEvent<'_>) -> String {
    match event.outcome {
        ItemOutcome::Succeeded { detail } => format!(
            "  [{}/{}] ✓ {} ({})",
            event.completed, event.total, event.label, detail
        ),
        ItemOutcome::Failed { reason } => format!(
            "  [{}/{}] ✗ {}: {}",
            event.completed, event.total, event.label, reason
        ),
    }
}

fn summary_line(stage: Stage, summary: BatchSummary) -> String {
    if summary.failed == 0 {
        format!("✓ {}: {}/{} succeeded", stage, summary.succeeded, summary.total)
    } else {
        format!(
            "⚠ {}: {}/{} succeeded, {} failed",
            stage, summary.succeeded, summary.total, summary.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_lines() {
        let ok = ItemEvent {
            stage: Stage::Collect,
            label: "api",
            outcome: ItemOutcome::Succeeded { detail: "12 commits" },
            completed: 3,
            total: 25,
        };
        assert_eq!(item_line(&ok), "  [3/25] ✓ api (12 commits)");

        let failed = ItemEvent {
            outcome: ItemOutcome::Failed {
                reason: "clone timed out after 120s",
            },
            ..ok
        };
        assert_eq!(item_line(&failed), "  [3/25] ✗ api: clone timed out after 120s");
    }

    #[test]
    fn test_summary_line() {
        let summary = BatchSummary {
            total: 25,
            succeeded: 24,
            failed: 1,
        };
        assert_eq!(
            summary_line(Stage::Collect, summary),
            "⚠ commit collection: 24/25 succeeded, 1 failed"
        );
    }
}

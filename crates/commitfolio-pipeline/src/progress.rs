use commitfolio_core::{Completion, ItemEvent, ItemOutcome, Reporter, Stage};
use std::fmt::Display;

/// Forward one runner completion to the reporter.
pub(crate) fn report_completion<T, E: Display>(
    reporter: &dyn Reporter,
    stage: Stage,
    label: &str,
    done: &Completion<'_, T, E>,
    describe: impl FnOnce(&T) -> String,
) {
    let text = match done.outcome {
        Ok(value) => describe(value),
        Err(e) => e.to_string(),
    };
    let outcome = if done.is_ok() {
        ItemOutcome::Succeeded { detail: &text }
    } else {
        ItemOutcome::Failed { reason: &text }
    };

    reporter.item_finished(ItemEvent {
        stage,
        label,
        outcome,
        completed: done.completed,
        total: done.total,
    });
}

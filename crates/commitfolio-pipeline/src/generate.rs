use commitfolio_ai::prompts::{self, CommitLine};
use commitfolio_ai::TextGenerator;
use commitfolio_core::{
    group_by_month, group_by_repo_marker, BatchSummary, LedgerRow, RepoSummary, Reporter,
    Section, Stage,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::artifacts::{write_file, OutputLayout};
use crate::error::with_timeout;
use crate::progress::report_completion;
use crate::{Error, PipelineOptions, Result};

const TECH_STACK_HEADING: &str = "## 기술 스택";
const PROJECTS_HEADING: &str = "## 프로젝트 경험";

#[derive(Debug, Clone)]
pub struct ResumeOutcome {
    pub sections: Vec<Section>,
    pub summaries: Vec<RepoSummary>,
    pub tech_stack: Option<String>,
    pub path: PathBuf,
}

/// Turns ledger rows into monthly sections, per-repository summaries and
/// the final resume, one generation call per group.
pub struct ResumeGenerator {
    generator: Arc<dyn TextGenerator>,
    layout: OutputLayout,
    options: PipelineOptions,
    reporter: Arc<dyn Reporter>,
}

impl ResumeGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        layout: OutputLayout,
        options: PipelineOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            generator,
            layout,
            options,
            reporter,
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Sections, then summaries, then the optional tech stack and the resume file.
    pub async fn run(&self, rows: &[LedgerRow]) -> Result<ResumeOutcome> {
        let sections = self.sections(rows).await?;
        let summaries = self.summaries(&sections).await?;
        let tech_stack = self.tech_stack(&summaries).await;

        let path = self.layout.resume_path();
        write_file(&path, &assemble_resume(tech_stack.as_deref(), &summaries)).await?;
        info!("Resume written to {:?}", path);

        Ok(ResumeOutcome {
            sections,
            summaries,
            tech_stack,
            path,
        })
    }

    /// One section per year-month, most recent month first.
    pub async fn sections(&self, rows: &[LedgerRow]) -> Result<Vec<Section>> {
        let groups = group_by_month(rows);
        if groups.is_empty() {
            return Err(Error::NothingToProcess(
                "no dated commits to group by month".to_string(),
            ));
        }
        let groups = groups.into_desc();
        tokio::fs::create_dir_all(self.layout.root()).await?;

        let runner = self.options.runner()?;
        self.reporter.stage_started(Stage::Sections, groups.len());

        let tasks: Vec<_> = groups
            .iter()
            .map(|(key, rows)| move || self.section(key, rows))
            .collect();

        let results = runner
            .run_with(tasks, |done| {
                report_completion(
                    self.reporter.as_ref(),
                    Stage::Sections,
                    &groups[done.index].0,
                    &done,
                    |section| format!("{} lines", section.content.lines().count()),
                )
            })
            .await;

        self.survivors(Stage::Sections, results)
    }

    async fn section(&self, key: &str, rows: &[LedgerRow]) -> Result<Section> {
        let lines: Vec<CommitLine<'_>> = rows
            .iter()
            .map(|row| CommitLine {
                repo: &row.repo,
                date: &row.date,
                message: &row.message,
            })
            .collect();
        let prompt = prompts::month_section_prompt(key, &lines);

        let content = self.generate("section generation", &prompt).await?;

        let path = self.layout.section_path(key);
        write_file(&path, &content).await?;

        Ok(Section {
            key: key.to_string(),
            content,
            path,
        })
    }

    /// One summary per repository named by a `[repo]` marker in the sections.
    pub async fn summaries(&self, sections: &[Section]) -> Result<Vec<RepoSummary>> {
        let activities = group_by_repo_marker(sections.iter().map(|s| s.content.as_str()));
        if activities.unattributed() > 0 {
            info!(
                "{} section lines carry no [repo] marker and are not summarized",
                activities.unattributed()
            );
        }
        if activities.is_empty() {
            return Err(commitfolio_core::Error::BatchExhausted {
                stage: Stage::Summaries.to_string(),
                artifacts: self.layout.sections_dir(),
            }
            .into());
        }

        let groups = activities.into_groups();
        let runner = self.options.runner()?;
        self.reporter.stage_started(Stage::Summaries, groups.len());

        let tasks: Vec<_> = groups
            .iter()
            .map(|(repo, lines)| move || self.summary(repo, lines))
            .collect();

        let results = runner
            .run_with(tasks, |done| {
                report_completion(
                    self.reporter.as_ref(),
                    Stage::Summaries,
                    &groups[done.index].0,
                    &done,
                    |summary| format!("-> {:?}", summary.path),
                )
            })
            .await;

        self.survivors(Stage::Summaries, results)
    }

    async fn summary(&self, repo: &str, activities: &[String]) -> Result<RepoSummary> {
        let prompt = prompts::repo_summary_prompt(repo, activities);
        let content = self.generate("summary generation", &prompt).await?;

        let path = self.layout.summary_path(repo);
        write_file(&path, &content).await?;

        Ok(RepoSummary {
            repo: repo.to_string(),
            content,
            path,
        })
    }

    /// Optional enrichment; a failure only drops the section.
    pub async fn tech_stack(&self, summaries: &[RepoSummary]) -> Option<String> {
        if summaries.is_empty() {
            return None;
        }

        let pairs: Vec<(&str, &str)> = summaries
            .iter()
            .map(|s| (s.repo.as_str(), s.content.as_str()))
            .collect();
        let prompt = prompts::tech_stack_prompt(&pairs);

        match self.generate("tech stack extraction", &prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Tech stack extraction failed, omitting the section: {}", e);
                None
            }
        }
    }

    async fn generate(&self, operation: &'static str, prompt: &str) -> Result<String> {
        with_timeout(
            operation,
            self.options.generation_timeout,
            self.generator.generate(prompt, self.layout.root()),
        )
        .await
    }

    /// Drop failed slots, keeping submission order. Zero survivors is fatal.
    fn survivors<T>(&self, stage: Stage, results: Vec<Result<T>>) -> Result<Vec<T>> {
        let summary = BatchSummary::from_results(&results);
        self.reporter.stage_finished(stage, summary);

        if summary.nothing_succeeded() {
            let artifacts = match stage {
                Stage::Summaries => self.layout.sections_dir(),
                _ => self.layout.root().to_path_buf(),
            };
            return Err(commitfolio_core::Error::BatchExhausted {
                stage: stage.to_string(),
                artifacts,
            }
            .into());
        }

        Ok(results.into_iter().filter_map(|r| r.ok()).collect())
    }
}

/// Tech stack (when present), then one subsection per repository in name order.
pub fn assemble_resume(tech_stack: Option<&str>, summaries: &[RepoSummary]) -> String {
    let mut ordered: Vec<&RepoSummary> = summaries.iter().collect();
    ordered.sort_by(|a, b| a.repo.cmp(&b.repo));

    let mut out = String::new();
    if let Some(stack) = tech_stack {
        out.push_str(TECH_STACK_HEADING);
        out.push_str("\n\n");
        out.push_str(stack.trim());
        out.push_str("\n\n");
    }

    out.push_str(PROJECTS_HEADING);
    out.push('\n');
    for summary in ordered {
        out.push_str(&format!("\n### {}\n\n{}\n", summary.repo, summary.content.trim()));
    }

    out
}

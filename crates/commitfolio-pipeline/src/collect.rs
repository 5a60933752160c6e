use commitfolio_core::{
    sort_newest_first, AuthorIdentity, BatchSummary, Commit, RepoRef, Reporter, Stage,
};
use commitfolio_git::{parse_log, TransientCheckout, VcsTransport};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::with_timeout;
use crate::progress::report_completion;
use crate::{PipelineOptions, Result};

/// What one repository contributed.
#[derive(Debug, Clone)]
pub struct RepoCollection {
    pub repo: RepoRef,
    pub commits: Vec<Commit>,
    /// Why the repository contributed nothing, if it failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Collection {
    /// One entry per submitted repository, in submission order.
    pub per_repo: Vec<RepoCollection>,
    /// Every collected commit, newest first.
    pub commits: Vec<Commit>,
    pub summary: BatchSummary,
}

/// Fans commit extraction out over repositories.
pub struct CommitCollector {
    transport: Arc<dyn VcsTransport>,
    options: PipelineOptions,
    reporter: Arc<dyn Reporter>,
}

impl CommitCollector {
    pub fn new(
        transport: Arc<dyn VcsTransport>,
        options: PipelineOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            transport,
            options,
            reporter,
        }
    }

    /// Collect the identity's commits from every repository.
    ///
    /// A repository that fails for any reason contributes no commits; the
    /// batch always runs to completion.
    pub async fn collect(&self, repos: &[RepoRef], identity: &AuthorIdentity) -> Result<Collection> {
        let runner = self.options.runner()?;
        let patterns = identity.patterns();
        let total = repos.len();

        info!(
            "Collecting commits from {} repositories for {:?} (limit {})",
            total,
            patterns,
            runner.limit()
        );
        self.reporter.stage_started(Stage::Collect, total);

        let tasks: Vec<_> = repos
            .iter()
            .map(|repo| {
                let patterns = &patterns;
                move || self.collect_repo(repo, patterns)
            })
            .collect();

        let results = runner
            .run_with(tasks, |done| {
                report_completion(
                    self.reporter.as_ref(),
                    Stage::Collect,
                    &repos[done.index].name,
                    &done,
                    |commits| format!("{} commits", commits.len()),
                )
            })
            .await;

        let summary = BatchSummary::from_results(&results);
        self.reporter.stage_finished(Stage::Collect, summary);

        let per_repo: Vec<RepoCollection> = repos
            .iter()
            .zip(results)
            .map(|(repo, result)| match result {
                Ok(commits) => RepoCollection {
                    repo: repo.clone(),
                    commits,
                    error: None,
                },
                Err(e) => RepoCollection {
                    repo: repo.clone(),
                    commits: Vec::new(),
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let mut commits: Vec<Commit> = per_repo
            .iter()
            .flat_map(|r| r.commits.iter().cloned())
            .collect();
        sort_newest_first(&mut commits);

        info!(
            "Collected {} commits ({}/{} repositories succeeded)",
            commits.len(),
            summary.succeeded,
            summary.total
        );

        Ok(Collection {
            per_repo,
            commits,
            summary,
        })
    }

    /// Clone, extract and clean up one repository.
    ///
    /// The checkout is released off the executor whether extraction succeeded
    /// or not; only a cancelled task falls back to removal on drop.
    async fn collect_repo(&self, repo: &RepoRef, patterns: &[String]) -> Result<Vec<Commit>> {
        let checkout = TransientCheckout::create(&self.options.work_dir, &repo.name).await?;
        let result = self
            .extract(repo, patterns, &checkout.path().join("repo.git"))
            .await;

        if let Err(e) = checkout.release().await {
            warn!("Failed to remove checkout for {}: {}", repo.name, e);
        }

        result
    }

    async fn extract(&self, repo: &RepoRef, patterns: &[String], dest: &Path) -> Result<Vec<Commit>> {
        with_timeout(
            "clone",
            self.options.clone_timeout,
            self.transport.clone_reduced(&repo.clone_url, dest),
        )
        .await?;

        let output = with_timeout(
            "log extraction",
            self.options.log_timeout,
            self.transport.author_log(dest, patterns),
        )
        .await?;

        let commits: Vec<Commit> = parse_log(&output)
            .into_iter()
            .map(|record| Commit::new(record.hash, record.subject, record.date, repo))
            .collect();

        debug!("{}: {} matching commits", repo.name, commits.len());

        Ok(commits)
    }
}

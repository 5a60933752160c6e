use anyhow::{Context, Result};
use commitfolio_core::{ledger, LedgerRow, RepoRef, Reporter};
use commitfolio_git::GitCli;
use commitfolio_github::{resolve_identity, GitHubClient, IdentityService};
use commitfolio_pipeline::{CommitCollector, OutputLayout, ResumeGenerator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::Commands;
use crate::config::Settings;
use crate::preflight;
use crate::prompt::select_org;
use crate::reporter::ConsoleReporter;

pub async fn execute(command: Commands, settings: Settings, token: Option<String>) -> Result<()> {
    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter);

    match command {
        Commands::Orgs => {
            let token = preflight::require_token(token.as_deref())?;
            let (github, user) = preflight::check_github(&token).await?;

            let orgs = github.organizations().await?;
            println!("Organizations for {}: {}", user.login, orgs.len());
            for org in orgs {
                println!("  {}", org);
            }
        }

        Commands::Collect { org, aliases } => {
            let token = preflight::require_token(token.as_deref())?;
            let (github, _) = preflight::check_github(&token).await?;
            let git = GitCli::new().with_token(token);
            preflight::check_git(&git).await?;

            let org = choose_org(&github, org).await?;
            let layout = OutputLayout::for_org(&settings.output_dir, &org);
            let rows = collect(&settings, &github, git, &org, aliases, &layout, reporter).await?;

            println!("\n✓ {} commits written to {:?}", rows.len(), layout.ledger_path());
        }

        Commands::Generate { org, ledger } => {
            let generator = preflight::check_ai(&settings.ai).await?;

            let (ledger_path, layout) = match ledger {
                Some(path) => {
                    let layout = ledger_layout(&path);
                    (path, layout)
                }
                None => {
                    let token = preflight::require_token(token.as_deref())?;
                    let (github, _) = preflight::check_github(&token).await?;
                    let org = choose_org(&github, org).await?;
                    let layout = OutputLayout::for_org(&settings.output_dir, &org);
                    (layout.ledger_path(), layout)
                }
            };

            let rows = read_ledger(&ledger_path).await?;
            let resume = ResumeGenerator::new(generator, layout, settings.pipeline_options(), reporter);
            generate(&resume, &rows).await?;
        }

        Commands::Run { org, aliases } => {
            let token = preflight::require_token(token.as_deref())?;
            let (github, _) = preflight::check_github(&token).await?;
            let git = GitCli::new().with_token(token);
            preflight::check_git(&git).await?;
            let generator = preflight::check_ai(&settings.ai).await?;

            let org = choose_org(&github, org).await?;
            let layout = OutputLayout::for_org(&settings.output_dir, &org);
            let rows = collect(
                &settings,
                &github,
                git,
                &org,
                aliases,
                &layout,
                reporter.clone(),
            )
            .await?;

            let resume = ResumeGenerator::new(generator, layout, settings.pipeline_options(), reporter);
            generate(&resume, &rows).await?;
        }
    }

    Ok(())
}

async fn choose_org(github: &GitHubClient, org: Option<String>) -> Result<String> {
    match org {
        Some(org) => Ok(org),
        None => select_org(github.organizations().await?).await,
    }
}

/// Pipeline (a): every repository of `org`, then the ledger file.
async fn collect(
    settings: &Settings,
    github: &GitHubClient,
    git: GitCli,
    org: &str,
    extra_aliases: Vec<String>,
    layout: &OutputLayout,
    reporter: Arc<dyn Reporter>,
) -> Result<Vec<LedgerRow>> {
    let mut aliases = settings.author_aliases.clone();
    aliases.extend(extra_aliases);
    let identity = resolve_identity(github, aliases).await?;

    let repos: Vec<RepoRef> = github
        .org_repositories(org)
        .await?
        .iter()
        .map(|r| r.to_repo_ref())
        .collect();

    let collector = CommitCollector::new(Arc::new(git), settings.pipeline_options(), reporter);
    let collection = collector.collect(&repos, &identity).await?;

    if collection.commits.is_empty() {
        warn!("No commits by {} found in {}", identity.username, org);
    }
    layout.write_ledger(&collection.commits).await?;

    Ok(collection.commits.iter().map(LedgerRow::from).collect())
}

/// Generated files go next to an explicitly named ledger.
fn ledger_layout(ledger: &Path) -> OutputLayout {
    let root = ledger
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    OutputLayout::new(root)
}

async fn read_ledger(path: &Path) -> Result<Vec<LedgerRow>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read ledger {:?}", path))?;
    let rows = ledger::parse(&text)?;
    info!("Read {} commits from {:?}", rows.len(), path);
    Ok(rows)
}

/// Pipelines (b) and (c) plus the resume.
async fn generate(resume: &ResumeGenerator, rows: &[LedgerRow]) -> Result<()> {
    let outcome = resume.run(rows).await?;

    println!();
    println!("✓ Resume written to {:?}", outcome.path);
    println!("  Sections: {}", outcome.sections.len());
    println!("  Summaries: {}", outcome.summaries.len());
    if outcome.tech_stack.is_none() {
        println!("  Tech stack: omitted");
    }

    Ok(())
}

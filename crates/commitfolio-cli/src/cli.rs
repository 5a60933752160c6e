use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "commitfolio")]
#[command(about = "Commitfolio - turn your GitHub commit history into a resume", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub github_token: Option<String>,

    /// Settings file (defaults to ./commitfolio.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum repositories or groups processed at once
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Directory that receives ledgers, sections, summaries and resumes
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the organizations you belong to
    Orgs,

    /// Collect your commits from every repository of an organization
    Collect {
        /// Organization login (prompted for when you belong to several)
        #[arg(long)]
        org: Option<String>,

        /// Extra author email or name to match, repeatable
        #[arg(long = "alias")]
        aliases: Vec<String>,
    },

    /// Generate sections, summaries and the resume from a commit ledger
    Generate {
        /// Organization whose ledger to read
        #[arg(long, conflicts_with = "ledger")]
        org: Option<String>,

        /// Ledger file; its directory receives the generated files
        #[arg(long)]
        ledger: Option<PathBuf>,
    },

    /// Collect, then generate
    Run {
        /// Organization login (prompted for when you belong to several)
        #[arg(long)]
        org: Option<String>,

        /// Extra author email or name to match, repeatable
        #[arg(long = "alias")]
        aliases: Vec<String>,
    },
}

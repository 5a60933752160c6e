use anyhow::{bail, Context, Result};
use commitfolio_ai::Backend;
use commitfolio_core::DEFAULT_CONCURRENCY;
use commitfolio_pipeline::PipelineOptions;
use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "commitfolio.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub concurrency: usize,
    pub clone_timeout_secs: u64,
    pub log_timeout_secs: u64,
    pub generation_timeout_secs: u64,
    pub output_dir: PathBuf,
    /// Parent of the transient checkouts; the system temp dir when unset.
    pub work_dir: Option<PathBuf>,
    pub author_aliases: Vec<String>,
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub backend: Backend,
    pub claude_binary: String,
    pub model: Option<String>,
    pub api_url: String,
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            clone_timeout_secs: 120,
            log_timeout_secs: 60,
            generation_timeout_secs: 600,
            output_dir: PathBuf::from("output"),
            work_dir: None,
            author_aliases: Vec::new(),
            ai: AiSettings::default(),
        }
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Cli,
            claude_binary: "claude".to_string(),
            model: None,
            api_url: commitfolio_ai::claude::DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Defaults, then the settings file, then `COMMITFOLIO_*` variables.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("COMMITFOLIO")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("author_aliases")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.clone_timeout_secs == 0 || self.log_timeout_secs == 0 {
            bail!("git timeouts must be greater than 0");
        }
        if self.generation_timeout_secs == 0 {
            bail!("generation_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Command-line flags win over every other source.
    pub fn with_overrides(
        mut self,
        concurrency: Option<usize>,
        output_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(concurrency) = concurrency {
            self.concurrency = concurrency;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        let defaults = PipelineOptions::default();
        PipelineOptions {
            concurrency: self.concurrency,
            clone_timeout: Duration::from_secs(self.clone_timeout_secs),
            log_timeout: Duration::from_secs(self.log_timeout_secs),
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            work_dir: self.work_dir.clone().unwrap_or(defaults.work_dir),
        }
    }
}

impl AiSettings {
    /// Configured key, else `ANTHROPIC_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

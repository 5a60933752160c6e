use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Claude Code CLI in print mode.
    Cli,
    /// Anthropic Messages API over HTTP.
    Api,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Cli => write!(f, "cli"),
            Backend::Api => write!(f, "api"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cli" | "claude-code" => Ok(Backend::Cli),
            "api" | "anthropic" => Ok(Backend::Api),
            _ => Err(Error::UnknownBackend(s.to_string())),
        }
    }
}

/// Single-turn text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn backend(&self) -> Backend;

    /// Generate text for `prompt`. `workdir` is where the generator may read
    /// files from; backends without file access ignore it.
    ///
    /// An empty or whitespace-only answer is an [`Error::EmptyResponse`].
    async fn generate(&self, prompt: &str, workdir: &Path) -> Result<String>;
}

/// Trimmed text, or `EmptyResponse` when nothing is left.
pub fn non_empty(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("cli".parse::<Backend>().unwrap(), Backend::Cli);
        assert_eq!("Claude-Code".parse::<Backend>().unwrap(), Backend::Cli);
        assert_eq!("anthropic".parse::<Backend>().unwrap(), Backend::Api);
        assert!(matches!(
            "gpt".parse::<Backend>(),
            Err(Error::UnknownBackend(_))
        ));
        assert_eq!(Backend::Api.to_string(), "api");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  hi \n").unwrap(), "hi");
        assert!(matches!(non_empty(" \n\t"), Err(Error::EmptyResponse)));
    }
}

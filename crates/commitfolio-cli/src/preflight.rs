use anyhow::Result;
use commitfolio_ai::{Backend, ClaudeApiGenerator, ClaudeCliGenerator, TextGenerator};
use commitfolio_git::GitCli;
use commitfolio_github::{GitHubClient, GitHubUser, IdentityService};
use std::sync::Arc;
use tracing::info;

use crate::config::AiSettings;

/// Something the run needs is missing or unusable. Nothing has been done yet.
#[derive(Debug, thiserror::Error)]
#[error("Prerequisite check failed: {0}")]
pub struct PrerequisiteError(pub String);

fn prerequisite(message: impl Into<String>) -> anyhow::Error {
    PrerequisiteError(message.into()).into()
}

pub fn require_token(token: Option<&str>) -> Result<String> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(prerequisite(
            "a GitHub token is required (--github-token or GITHUB_TOKEN)",
        )),
    }
}

/// Build the client and confirm GitHub accepts the token.
pub async fn check_github(token: &str) -> Result<(Arc<GitHubClient>, GitHubUser)> {
    let client = GitHubClient::new(token.to_string())
        .map_err(|e| prerequisite(format!("GitHub client: {}", e)))?;
    let user = client
        .authenticated_user()
        .await
        .map_err(|e| prerequisite(format!("GitHub rejected the token: {}", e)))?;

    info!("GitHub token accepted for {}", user.login);
    Ok((Arc::new(client), user))
}

pub async fn check_git(git: &GitCli) -> Result<()> {
    let version = git
        .version()
        .await
        .map_err(|e| prerequisite(format!("git is not available: {}", e)))?;
    info!("Using {}", version);
    Ok(())
}

/// Build the configured text generator, verifying it can run.
pub async fn check_ai(settings: &AiSettings) -> Result<Arc<dyn TextGenerator>> {
    match settings.backend {
        Backend::Cli => {
            let generator = ClaudeCliGenerator::new(settings.claude_binary.clone())
                .with_model(settings.model.clone());
            let version = generator.version().await.map_err(|e| {
                prerequisite(format!(
                    "`{}` is not available: {}",
                    settings.claude_binary, e
                ))
            })?;
            info!("Using Claude Code {}", version);
            Ok(Arc::new(generator))
        }
        Backend::Api => {
            let api_key = settings.resolved_api_key().ok_or_else(|| {
                prerequisite("the api backend needs ai.api_key or ANTHROPIC_API_KEY")
            })?;
            let mut generator = ClaudeApiGenerator::new(api_key)
                .map_err(|e| prerequisite(e.to_string()))?
                .with_api_url(settings.api_url.clone());
            if let Some(model) = &settings.model {
                generator = generator.with_model(model.clone());
            }
            info!("Using the Anthropic API");
            Ok(Arc::new(generator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_token() {
        assert_eq!(require_token(Some(" ghp_abc ")).unwrap(), "ghp_abc");

        let err = require_token(Some("  ")).unwrap_err();
        assert!(err.downcast_ref::<PrerequisiteError>().is_some());
        assert!(require_token(None).is_err());
    }

    #[tokio::test]
    async fn test_missing_claude_binary() {
        let settings = AiSettings {
            claude_binary: "/nonexistent/claude".to_string(),
            ..Default::default()
        };

        let err = check_ai(&settings).await.err().unwrap();
        assert!(err.downcast_ref::<PrerequisiteError>().is_some());
    }

    #[tokio::test]
    async fn test_api_backend_with_key() {
        let settings = AiSettings {
            backend: Backend::Api,
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };

        let generator = check_ai(&settings).await.unwrap();
        assert_eq!(generator.backend(), Backend::Api);
    }

    #[tokio::test]
    async fn test_missing_git_binary() {
        let git = GitCli::new().with_binary("/nonexistent/git".to_string());
        let err = check_git(&git).await.unwrap_err();
        assert!(err.to_string().contains("git is not available"));
    }
}

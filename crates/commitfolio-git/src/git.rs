use crate::log::{author_args, LOG_FORMAT};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Reduced clones and author-filtered history for one repository at a time.
///
/// Implementations must stop their underlying work when the returned future
/// is dropped; callers enforce timeouts by dropping it.
#[async_trait]
pub trait VcsTransport: Send + Sync {
    /// Clone `clone_url` into `dest` without file contents.
    async fn clone_reduced(&self, clone_url: &str, dest: &Path) -> Result<()>;

    /// Raw `git log` output for every ref, restricted to `authors`.
    async fn author_log(&self, repo_dir: &Path, authors: &[String]) -> Result<String>;
}

/// [`VcsTransport`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    token: Option<String>,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            binary: "git".to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.token = Some(token).filter(|t| !t.is_empty());
        self
    }

    pub fn with_binary(mut self, binary: String) -> Self {
        self.binary = binary;
        self
    }

    /// `git --version`, used as a prerequisite check.
    pub async fn version(&self) -> Result<String> {
        let output = self.run(&["--version".to_string()], "git --version").await?;
        Ok(output.trim().to_string())
    }

    /// HTTPS GitHub URLs get the token as `x-access-token` credentials.
    fn authenticated_url(&self, url: &str) -> String {
        match (&self.token, url.strip_prefix("https://")) {
            (Some(token), Some(rest)) if !rest.contains('@') => {
                format!("https://x-access-token:{}@{}", token, rest)
            }
            _ => url.to_string(),
        }
    }

    fn redact(&self, text: &str) -> String {
        match &self.token {
            Some(token) => text.replace(token.as_str(), "***"),
            None => text.to_string(),
        }
    }

    async fn run(&self, args: &[String], command_display: &str) -> Result<String> {
        debug!("Running {}", command_display);

        let output = Command::new(&self.binary)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed {
                command: command_display.to_string(),
                code: output.status.code(),
                stderr: self.redact(stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VcsTransport for GitCli {
    async fn clone_reduced(&self, clone_url: &str, dest: &Path) -> Result<()> {
        info!("Cloning {} to {:?}", clone_url, dest);

        let args = vec![
            "clone".to_string(),
            "--bare".to_string(),
            "--filter=blob:none".to_string(),
            "--no-tags".to_string(),
            "--quiet".to_string(),
            self.authenticated_url(clone_url),
            dest.to_string_lossy().into_owned(),
        ];

        self.run(&args, &format!("git clone {}", clone_url)).await?;

        debug!("Cloned {}", clone_url);

        Ok(())
    }

    async fn author_log(&self, repo_dir: &Path, authors: &[String]) -> Result<String> {
        let mut args = vec![
            format!("--git-dir={}", repo_dir.to_string_lossy()),
            "log".to_string(),
            "--all".to_string(),
            "--no-merges".to_string(),
            format!("--format={}", LOG_FORMAT),
        ];
        args.extend(author_args(authors));

        self.run(&args, &format!("git log ({:?})", repo_dir)).await
    }
}

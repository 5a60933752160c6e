use crate::generator::{non_empty, Backend, TextGenerator};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Text generation through the Claude Code CLI (`claude -p`).
///
/// The prompt goes in on stdin and the final assistant text is read from the
/// JSON result object. The child process is killed if the future is dropped.
#[derive(Debug, Clone)]
pub struct ClaudeCliGenerator {
    binary: String,
    model: Option<String>,
}

impl ClaudeCliGenerator {
    pub fn new(binary: String) -> Self {
        Self {
            binary,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// `claude --version`, used as a prerequisite check.
    pub async fn version(&self) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: format!("{} --version", self.binary),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl TextGenerator for ClaudeCliGenerator {
    fn backend(&self) -> Backend {
        Backend::Cli
    }

    async fn generate(&self, prompt: &str, workdir: &Path) -> Result<String> {
        let mut command = Command::new(&self.binary);
        command
            .args(["-p", "--output-format", "json"])
            .current_dir(workdir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(model) = &self.model {
            command.args(["--model", model]);
        }

        tracing::debug!("Running {} in {:?}", self.binary, workdir);

        let mut child = command.spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed {
                command: format!("{} -p", self.binary),
                message: format!("exit {:?}: {}", output.status.code(), stderr.trim()),
            });
        }

        let result: CliResult = serde_json::from_str(stdout.trim())?;
        if result.is_error {
            return Err(Error::ApiError(
                result.result.unwrap_or_else(|| result.subtype.unwrap_or_default()),
            ));
        }

        non_empty(result.result.as_deref().unwrap_or_default())
    }
}

/// Final message of `claude -p --output-format json`.
#[derive(Debug, Deserialize)]
struct CliResult {
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    result: Option<String>,
}

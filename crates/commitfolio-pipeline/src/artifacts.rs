use commitfolio_core::{ledger, Commit};
use std::path::{Path, PathBuf};

use crate::Result;

/// Where one organization's artifacts live:
///
/// ```text
/// <root>/commits.md
/// <root>/sections/<YYYY-MM>.md
/// <root>/summaries/<repo>.md
/// <root>/resume.md
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn for_org(output_dir: &Path, org: &str) -> Self {
        Self::new(output_dir.join(file_stem(org)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join("commits.md")
    }

    pub fn sections_dir(&self) -> PathBuf {
        self.root.join("sections")
    }

    pub fn section_path(&self, key: &str) -> PathBuf {
        self.sections_dir().join(format!("{}.md", file_stem(key)))
    }

    pub fn summaries_dir(&self) -> PathBuf {
        self.root.join("summaries")
    }

    pub fn summary_path(&self, repo: &str) -> PathBuf {
        self.summaries_dir().join(format!("{}.md", file_stem(repo)))
    }

    pub fn resume_path(&self) -> PathBuf {
        self.root.join("resume.md")
    }

    pub async fn write_ledger(&self, commits: &[Commit]) -> Result<PathBuf> {
        let path = self.ledger_path();
        write_file(&path, &ledger::render_commits(commits)).await?;
        tracing::info!("Wrote {} commits to {:?}", commits.len(), path);
        Ok(path)
    }
}

/// Write `contents`, creating parent directories as needed.
pub async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    match stem.trim_matches('.') {
        "" => "_".to_string(),
        _ => stem,
    }
}

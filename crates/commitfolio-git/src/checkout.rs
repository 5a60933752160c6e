use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory holding one repository's reduced clone.
///
/// The directory is removed by [`release`](Self::release), or on drop if the
/// owning work item errors out, times out or is cancelled.
#[derive(Debug)]
pub struct TransientCheckout {
    dir: TempDir,
    repo_name: String,
}

impl TransientCheckout {
    /// Create a uniquely named directory for `repo_name` under `base`.
    pub async fn create(base: &Path, repo_name: &str) -> Result<Self> {
        let base = base.to_path_buf();
        let prefix = format!("{}-", dir_safe(repo_name));

        let dir = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&base)?;
            tempfile::Builder::new().prefix(&prefix).tempdir_in(&base)
        })
        .await
        .map_err(|e| Error::Other(e.into()))??;

        tracing::debug!("Created checkout for {} at {:?}", repo_name, dir.path());

        Ok(Self {
            dir,
            repo_name: repo_name.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Remove the directory now and report failures instead of swallowing them.
    pub async fn release(self) -> Result<PathBuf> {
        let path = self.dir.path().to_path_buf();
        let dir = self.dir;

        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(|e| Error::Other(e.into()))??;

        tracing::debug!("Removed checkout for {} at {:?}", self.repo_name, path);

        Ok(path)
    }
}

fn dir_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_release_removes_directory() {
        let base = tempfile::tempdir().unwrap();
        let checkout = TransientCheckout::create(base.path(), "api").await.unwrap();

        let path = checkout.path().to_path_buf();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("api-"));
        assert_eq!(checkout.repo_name(), "api");

        let removed = checkout.release().await.unwrap();
        assert_eq!(removed, path);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let base = tempfile::tempdir().unwrap();
        let path = {
            let checkout = TransientCheckout::create(base.path(), "web/app").await.unwrap();
            std::fs::write(checkout.path().join("HEAD"), "ref: refs/heads/main\n").unwrap();
            checkout.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_same_repo_gets_distinct_directories() {
        let base = tempfile::tempdir().unwrap();
        let a = TransientCheckout::create(base.path(), "api").await.unwrap();
        let b = TransientCheckout::create(base.path(), "api").await.unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_dir_safe() {
        assert_eq!(dir_safe("web/app name"), "web_app_name");
        assert_eq!(dir_safe("my-repo_1.x"), "my-repo_1.x");
    }
}

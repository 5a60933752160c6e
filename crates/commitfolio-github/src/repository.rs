use commitfolio_core::RepoRef;
use serde::{Deserialize, Serialize};

/// A repository listed under an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub html_url: String,
    pub clone_url: String,
    pub archived: bool,
}

impl Repository {
    pub fn new(owner: String, name: String) -> Self {
        let html_url = format!("https://github.com/{}/{}", owner, name);
        let clone_url = format!("{}.git", html_url);
        Self {
            owner,
            name,
            html_url,
            clone_url,
            archived: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn to_repo_ref(&self) -> RepoRef {
        RepoRef::new(self.name.clone(), self.html_url.clone()).with_clone_url(self.clone_url.clone())
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_creation() {
        let repo = Repository::new("acme".to_string(), "api".to_string());
        assert_eq!(repo.full_name(), "acme/api");
        assert_eq!(repo.html_url, "https://github.com/acme/api");
        assert_eq!(repo.clone_url, "https://github.com/acme/api.git");
        assert!(!repo.archived);
    }

    #[test]
    fn test_to_repo_ref() {
        let repo = Repository::new("acme".to_string(), "api".to_string());
        let repo_ref = repo.to_repo_ref();
        assert_eq!(repo_ref.name, "api");
        assert_eq!(repo_ref.url, "https://github.com/acme/api");
        assert_eq!(repo_ref.clone_url, "https://github.com/acme/api.git");
    }
}

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// A repository as far as commit collection is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub name: String,
    /// Browser URL, used for commit links.
    pub url: String,
    pub clone_url: String,
}

impl RepoRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let clone_url = format!("{}.git", url.trim_end_matches('/'));
        Self {
            name: name.into(),
            url,
            clone_url,
        }
    }

    pub fn with_clone_url(mut self, clone_url: impl Into<String>) -> Self {
        self.clone_url = clone_url.into();
        self
    }

    pub fn commit_url(&self, hash: &str) -> String {
        format!("{}/commit/{}", self.url.trim_end_matches('/'), hash)
    }
}

/// The identities a user may have authored commits under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentity {
    pub username: String,
    pub email: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl AuthorIdentity {
    pub fn new(username: impl Into<String>, email: Option<String>) -> Self {
        Self {
            username: username.into(),
            email,
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Distinct, non-empty author patterns in priority order.
    pub fn patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = Vec::new();
        let candidates = std::iter::once(self.username.as_str())
            .chain(self.email.as_deref())
            .chain(self.aliases.iter().map(String::as_str));

        for candidate in candidates {
            let candidate = candidate.trim();
            if !candidate.is_empty() && !patterns.iter().any(|p| p == candidate) {
                patterns.push(candidate.to_string());
            }
        }

        patterns
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    /// Author date, ISO-8601 as reported by git.
    pub date: String,
    pub repo_name: String,
    pub repo_url: String,
}

impl Commit {
    pub fn new(hash: String, message: String, date: String, repo: &RepoRef) -> Self {
        Self {
            hash,
            message,
            date,
            repo_name: repo.name.clone(),
            repo_url: repo.url.clone(),
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }

    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }

    pub fn url(&self) -> String {
        format!("{}/commit/{}", self.repo_url.trim_end_matches('/'), self.hash)
    }
}

/// Sort commits most recent first. Undated commits go last; ties break on
/// repository then hash so the order is stable across runs.
pub fn sort_newest_first(commits: &mut [Commit]) {
    commits.sort_by(|a, b| {
        let by_time = match (a.timestamp(), b.timestamp()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.date.cmp(&a.date),
        };
        by_time
            .then_with(|| a.repo_name.cmp(&b.repo_name))
            .then_with(|| a.hash.cmp(&b.hash))
    });
}

/// Generated prose for one year-month group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub key: String,
    pub content: String,
    pub path: PathBuf,
}

/// Generated project summary for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSummary {
    pub repo: String,
    pub content: String,
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, date: &str, repo: &str) -> Commit {
        let repo = RepoRef::new(repo, format!("https://github.com/acme/{}", repo));
        Commit::new(hash.to_string(), "msg".to_string(), date.to_string(), &repo)
    }

    #[test]
    fn test_repo_urls() {
        let repo = RepoRef::new("api", "https://github.com/acme/api");
        assert_eq!(repo.clone_url, "https://github.com/acme/api.git");
        assert_eq!(repo.commit_url("abc"), "https://github.com/acme/api/commit/abc");
    }

    #[test]
    fn test_author_patterns_deduplicate() {
        let identity = AuthorIdentity::new("octo", Some("octo@example.com".to_string()))
            .with_aliases(vec![
                "octo@example.com".to_string(),
                " ".to_string(),
                "old@example.com".to_string(),
            ]);

        assert_eq!(
            identity.patterns(),
            vec!["octo", "octo@example.com", "old@example.com"]
        );
    }

    #[test]
    fn test_short_hash_and_url() {
        let c = commit("0123456789abcdef", "2025-01-15T10:00:00+09:00", "api");
        assert_eq!(c.short_hash(), "0123456");
        assert_eq!(c.url(), "https://github.com/acme/api/commit/0123456789abcdef");
    }

    #[test]
    fn test_sort_newest_first_across_offsets() {
        let mut commits = vec![
            commit("a", "2025-01-15T10:00:00+09:00", "api"),
            commit("b", "not a date", "api"),
            // 2025-01-15T02:00:00Z, later than the first one (01:00Z)
            commit("c", "2025-01-15T02:00:00+00:00", "web"),
            commit("d", "2025-02-01T00:00:00+00:00", "api"),
        ];

        sort_newest_first(&mut commits);

        let order: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(order, vec!["d", "c", "a", "b"]);
    }
}

use crate::identity::{GitHubUser, IdentityService};
use crate::{Error, Repository, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

const PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::AuthError("GitHub token is empty".to_string()));
        }

        let client = Octocrab::builder()
            .personal_token(token)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl IdentityService for GitHubClient {
    async fn authenticated_user(&self) -> Result<GitHubUser> {
        let user: ApiUser = self
            .client
            .get("/user", None::<&()>)
            .await
            .map_err(|e| Error::AuthError(format!("GET /user failed: {}", e)))?;

        Ok(GitHubUser {
            login: user.login,
            email: user.email.filter(|e| !e.is_empty()),
        })
    }

    async fn primary_email(&self) -> Result<Option<String>> {
        let emails: Vec<ApiEmail> = self.client.get("/user/emails", None::<&()>).await?;

        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }

    async fn organizations(&self) -> Result<Vec<String>> {
        let mut orgs = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<ApiOrg> = self
                .client
                .get("/user/orgs", Some(&PageParams { per_page: PER_PAGE, page }))
                .await?;
            let done = batch.len() < PER_PAGE as usize;
            orgs.extend(batch.into_iter().map(|o| o.login));
            if done {
                break;
            }
            page += 1;
        }

        tracing::debug!("Found {} organization memberships", orgs.len());

        Ok(orgs)
    }

    async fn org_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        tracing::info!("Listing repositories for {}", org);

        let route = format!("/orgs/{}/repos", org);
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<ApiRepo> = self
                .client
                .get(&route, Some(&PageParams { per_page: PER_PAGE, page }))
                .await?;
            let done = batch.len() < PER_PAGE as usize;
            repos.extend(batch.into_iter().map(|r| Repository {
                owner: r.owner.login,
                name: r.name,
                html_url: r.html_url,
                clone_url: r.clone_url,
                archived: r.archived,
            }));
            if done {
                break;
            }
            page += 1;
        }

        if repos.is_empty() {
            return Err(Error::ApiError(format!("No repositories visible in {}", org)));
        }

        tracing::info!("Found {} repositories in {}", repos.len(), org);

        Ok(repos)
    }
}

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u32,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct ApiOrg {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    owner: ApiOwner,
    html_url: String,
    clone_url: String,
    #[serde(default)]
    archived: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let result = GitHubClient::new("test_token".to_string());
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            GitHubClient::new("  ".to_string()),
            Err(Error::AuthError(_))
        ));
    }

    #[test]
    fn test_repo_payload_parsing() {
        let payload = r#"[{
            "name": "api",
            "owner": {"login": "acme", "id": 1},
            "html_url": "https://github.com/acme/api",
            "clone_url": "https://github.com/acme/api.git",
            "archived": true,
            "private": true
        }]"#;

        let repos: Vec<ApiRepo> = serde_json::from_str(payload).unwrap();
        assert_eq!(repos[0].owner.login, "acme");
        assert!(repos[0].archived);
    }
}

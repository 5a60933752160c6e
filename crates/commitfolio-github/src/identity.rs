use crate::{Repository, Result};
use async_trait::async_trait;
use commitfolio_core::AuthorIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    /// Public profile email, when the user exposes one.
    pub email: Option<String>,
}

/// Who the user is and which repositories they can see.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Fails with `AuthError` when the credentials are missing or rejected.
    async fn authenticated_user(&self) -> Result<GitHubUser>;

    /// Primary verified email, if the token is allowed to read it.
    async fn primary_email(&self) -> Result<Option<String>>;

    /// Logins of the organizations the user belongs to.
    async fn organizations(&self) -> Result<Vec<String>>;

    async fn org_repositories(&self, org: &str) -> Result<Vec<Repository>>;
}

/// Build the author identity used to filter commit logs.
///
/// The primary email wins over the public profile email. A failed email
/// lookup is not fatal; the login still matches most commits.
pub async fn resolve_identity(
    service: &dyn IdentityService,
    aliases: Vec<String>,
) -> Result<AuthorIdentity> {
    let user = service.authenticated_user().await?;

    let email = match service.primary_email().await {
        Ok(Some(email)) => Some(email),
        Ok(None) => user.email.clone(),
        Err(e) => {
            tracing::warn!("Could not read primary email for {}: {}", user.login, e);
            user.email.clone()
        }
    };

    tracing::info!(
        "Authenticated as {} ({})",
        user.login,
        email.as_deref().unwrap_or("no email")
    );

    Ok(AuthorIdentity::new(user.login, email).with_aliases(aliases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FakeService {
        primary: Result<Option<String>>,
    }

    #[async_trait]
    impl IdentityService for FakeService {
        async fn authenticated_user(&self) -> Result<GitHubUser> {
            Ok(GitHubUser {
                login: "octo".to_string(),
                email: Some("public@example.com".to_string()),
            })
        }

        async fn primary_email(&self) -> Result<Option<String>> {
            match &self.primary {
                Ok(email) => Ok(email.clone()),
                Err(e) => Err(Error::ApiError(e.to_string())),
            }
        }

        async fn organizations(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn org_repositories(&self, _org: &str) -> Result<Vec<Repository>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_primary_email_preferred() {
        let service = FakeService {
            primary: Ok(Some("primary@example.com".to_string())),
        };
        let identity = resolve_identity(&service, vec!["old@example.com".to_string()])
            .await
            .unwrap();

        assert_eq!(identity.username, "octo");
        assert_eq!(identity.email.as_deref(), Some("primary@example.com"));
        assert_eq!(identity.aliases, vec!["old@example.com"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_public_email() {
        let service = FakeService {
            primary: Err(Error::ApiError("403 scope".to_string())),
        };
        let identity = resolve_identity(&service, vec![]).await.unwrap();
        assert_eq!(identity.email.as_deref(), Some("public@example.com"));
    }
}

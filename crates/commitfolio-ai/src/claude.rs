use crate::generator::{non_empty, Backend, TextGenerator};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Text generation through the Anthropic Messages API.
pub struct ClaudeApiGenerator {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
    max_tokens: u32,
}

impl ClaudeApiGenerator {
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::InvalidApiKey);
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            max_tokens: 4096,
        })
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn call_api(&self, messages: Vec<Message>) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&json!({
                "model": &self.model,
                "messages": messages,
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(Error::ApiError(format!(
                "Claude API error ({}): {}",
                status, error_text
            )));
        }

        let result: ClaudeResponse = response.json().await?;

        Ok(result
            .content
            .iter()
            .filter(|c| c.kind == "text")
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl TextGenerator for ClaudeApiGenerator {
    fn backend(&self) -> Backend {
        Backend::Api
    }

    async fn generate(&self, prompt: &str, _workdir: &Path) -> Result<String> {
        tracing::debug!("Requesting {} ({} prompt chars)", self.model, prompt.len());

        let messages = vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        let text = self.call_api(messages).await?;
        non_empty(&text)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(url: String) -> ClaudeApiGenerator {
        ClaudeApiGenerator::new("test-key".to_string())
            .unwrap()
            .with_api_url(url)
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            ClaudeApiGenerator::new(String::new()),
            Err(Error::InvalidApiKey)
        ));
    }

    #[tokio::test]
    async fn test_generate_joins_text_blocks() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content":[{"type":"text","text":"- [api] 로그인 "},{"type":"text","text":"구현\n"}]}"#,
            )
            .create_async()
            .await;

        let text = generator(server.url())
            .generate("prompt", Path::new("."))
            .await
            .unwrap();

        assert_eq!(text, "- [api] 로그인 구현");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;

        let err = generator(server.url())
            .generate("prompt", Path::new("."))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyResponse));
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/messages")
            .with_status(529)
            .with_body("overloaded")
            .create_async()
            .await;

        let err = generator(server.url())
            .generate("prompt", Path::new("."))
            .await
            .unwrap_err();

        match err {
            Error::ApiError(message) => assert!(message.contains("overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! GitHub README source

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::DomainError;
use crate::domain::summary::{ReadmeSource, RepoRef};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";
const USER_AGENT: &str = "GitHub-Readme-Fetcher";

/// Fetches raw README content through the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubReadmeSource {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubReadmeSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn readme_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/readme",
            self.base_url,
            repo.owner(),
            repo.repo()
        )
    }
}

#[async_trait]
impl ReadmeSource for GitHubReadmeSource {
    async fn fetch_readme(&self, repo: &RepoRef) -> Result<String, DomainError> {
        let response = self
            .client
            .get(self.readme_url(repo))
            .header(reqwest::header::ACCEPT, RAW_ACCEPT)
            .send()
            .await
            .map_err(|e| DomainError::provider("github", format!("Request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => response.text().await.map_err(|e| {
                DomainError::provider("github", format!("Failed to read README: {}", e))
            }),
            StatusCode::NOT_FOUND => Err(DomainError::not_found(
                "README.md not found in this repository",
            )),
            status => Err(DomainError::provider(
                "github",
                format!("GitHub API error: {}", status.as_u16()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> GitHubReadmeSource {
        GitHubReadmeSource::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef::parse("tokio-rs/axum").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_readme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/tokio-rs/axum/readme"))
            .and(header("accept", RAW_ACCEPT))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("# axum\nWeb framework"))
            .expect(1)
            .mount(&server)
            .await;

        let readme = source(&server).fetch_readme(&repo()).await.unwrap();
        assert_eq!(readme, "# axum\nWeb framework");
    }

    #[tokio::test]
    async fn test_missing_readme_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/tokio-rs/axum/readme"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = source(&server).fetch_readme(&repo()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("README.md not found"));
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source(&server).fetch_readme(&repo()).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(err.to_string().contains("503"));
    }
}

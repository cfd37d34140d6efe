//! README summary service

use std::sync::Arc;

use tracing::info;

use crate::domain::DomainError;
use crate::domain::summary::{ReadmeSource, ReadmeSummarizer, ReadmeSummary, RepoRef};

/// Fetches a repository README and summarizes it
#[derive(Clone)]
pub struct SummaryService {
    source: Arc<dyn ReadmeSource>,
    summarizer: Arc<dyn ReadmeSummarizer>,
}

impl std::fmt::Debug for SummaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryService").finish_non_exhaustive()
    }
}

impl SummaryService {
    pub fn new(source: Arc<dyn ReadmeSource>, summarizer: Arc<dyn ReadmeSummarizer>) -> Self {
        Self { source, summarizer }
    }

    /// Summarize the repository named by a GitHub URL or `owner/repo`
    pub async fn summarize_repository(&self, repo_url: &str) -> Result<ReadmeSummary, DomainError> {
        let repo = RepoRef::parse(repo_url)?;

        let readme = self.source.fetch_readme(&repo).await?;
        let summary = self.summarizer.summarize(&readme).await?;

        info!(repo = %repo, facts = summary.cool_facts.len(), "Repository summarized");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::{MockReadmeSource, MockReadmeSummarizer};

    #[tokio::test]
    async fn test_summarize_repository() {
        let mut source = MockReadmeSource::new();
        source
            .expect_fetch_readme()
            .withf(|repo| repo.owner() == "tokio-rs" && repo.repo() == "axum")
            .times(1)
            .returning(|_| Ok("# axum".to_string()));

        let mut summarizer = MockReadmeSummarizer::new();
        summarizer
            .expect_summarize()
            .withf(|readme| readme.to_string() == "# axum")
            .times(1)
            .returning(|_| {
                Ok(ReadmeSummary {
                    summary: "Web framework".to_string(),
                    cool_facts: vec!["built on tower".to_string()],
                })
            });

        let service = SummaryService::new(Arc::new(source), Arc::new(summarizer));
        let summary = service
            .summarize_repository("https://github.com/tokio-rs/axum.git")
            .await
            .unwrap();

        assert_eq!(summary.summary, "Web framework");
        assert_eq!(summary.cool_facts.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_repo_skips_fetch() {
        let mut source = MockReadmeSource::new();
        source.expect_fetch_readme().times(0);
        let mut summarizer = MockReadmeSummarizer::new();
        summarizer.expect_summarize().times(0);

        let service = SummaryService::new(Arc::new(source), Arc::new(summarizer));
        let err = service.summarize_repository("not a repo").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_missing_readme_propagates() {
        let mut source = MockReadmeSource::new();
        source
            .expect_fetch_readme()
            .returning(|_| Err(DomainError::not_found("README.md not found in this repository")));
        let mut summarizer = MockReadmeSummarizer::new();
        summarizer.expect_summarize().times(0);

        let service = SummaryService::new(Arc::new(source), Arc::new(summarizer));
        let err = service.summarize_repository("owner/repo").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}

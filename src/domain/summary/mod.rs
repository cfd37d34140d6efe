//! README summary domain
//!
//! Downstream capability gated behind a valid API key: fetch a repository's
//! README and condense it into a short summary.

mod repo_ref;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

pub use repo_ref::RepoRef;

/// Structured summary of a README
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeSummary {
    pub summary: String,
    #[serde(default)]
    pub cool_facts: Vec<String>,
}

impl ReadmeSummary {
    /// Summary built from unstructured model output
    pub fn from_raw(text: impl Into<String>) -> Self {
        Self {
            summary: text.into(),
            cool_facts: Vec::new(),
        }
    }
}

/// Source of README content
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadmeSource: Send + Sync {
    /// Fetch the raw README of a repository
    async fn fetch_readme(&self, repo: &RepoRef) -> Result<String, DomainError>;
}

/// Text summarizer for README content
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReadmeSummarizer: Send + Sync {
    async fn summarize(&self, readme: &str) -> Result<ReadmeSummary, DomainError>;
}

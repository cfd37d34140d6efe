//! README summarizer infrastructure

mod github;
mod openai;
mod service;

pub use github::{DEFAULT_GITHUB_API_URL, GitHubReadmeSource};
pub use openai::{DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL, OpenAiReadmeSummarizer};
pub use service::SummaryService;

//! GitHub repository reference parsing

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

static GITHUB_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/\s]+)/([^/\s?#]+)").unwrap());

/// Owner/repository pair identifying a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    repo: String,
}

impl RepoRef {
    /// Parse `https://github.com/<owner>/<repo>[...]` or `<owner>/<repo>`
    ///
    /// A trailing `.git` on the repository name is removed.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();

        let (owner, repo) = if input.contains("github.com") {
            let captures = GITHUB_URL
                .captures(input)
                .ok_or_else(|| DomainError::validation("Could not parse GitHub URL"))?;
            (captures[1].to_string(), captures[2].to_string())
        } else {
            let parts: Vec<&str> = input.split('/').collect();
            match parts.as_slice() {
                [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
                    (owner.to_string(), repo.to_string())
                }
                _ => {
                    return Err(DomainError::validation(
                        "Invalid repo format. Expected \"owner/repo\"",
                    ));
                }
            }
        };

        let repo = repo.strip_suffix(".git").unwrap_or(&repo).to_string();
        if repo.is_empty() {
            return Err(DomainError::validation(
                "Invalid repo format. Expected \"owner/repo\"",
            ));
        }

        Ok(Self { owner, repo })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url() {
        let r = RepoRef::parse("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(r.owner(), "rust-lang");
        assert_eq!(r.repo(), "rust");
    }

    #[test]
    fn test_parse_url_with_suffixes() {
        let r = RepoRef::parse("https://github.com/tokio-rs/axum.git").unwrap();
        assert_eq!(r.to_string(), "tokio-rs/axum");

        let r = RepoRef::parse("https://github.com/tokio-rs/axum/tree/main/examples").unwrap();
        assert_eq!(r.to_string(), "tokio-rs/axum");
    }

    #[test]
    fn test_parse_short_form() {
        let r = RepoRef::parse(" serde-rs/serde ").unwrap();
        assert_eq!(r.owner(), "serde-rs");
        assert_eq!(r.repo(), "serde");
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["", "serde", "a/b/c", "/serde", "https://github.com/only-owner"] {
            let err = RepoRef::parse(input).unwrap_err();
            assert!(
                matches!(err, DomainError::Validation { .. }),
                "expected validation error for {:?}",
                input
            );
        }
    }
}

//! Key-gated README summarizer endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::summary::ReadmeSummary;

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(rename = "repoUrl", alias = "repo_url", default)]
    pub repo_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeResponse {
    pub summary: ReadmeSummary,
}

/// POST /api/github-summarizer
pub async fn summarize_repository(
    State(state): State<AppState>,
    _key: RequireApiKey,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let service = state
        .summary_service
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("README summarizer is not configured"))?;

    debug!(repo_url = %request.repo_url, "Summarizing repository README");

    let summary = service.summarize_repository(&request.repo_url).await?;

    Ok(Json(SummarizeResponse { summary }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let request: SummarizeRequest =
            serde_json::from_str(r#"{"repoUrl":"https://github.com/tokio-rs/axum"}"#).unwrap();
        assert_eq!(request.repo_url, "https://github.com/tokio-rs/axum");

        let request: SummarizeRequest =
            serde_json::from_str(r#"{"repo_url":"tokio-rs/axum"}"#).unwrap();
        assert_eq!(request.repo_url, "tokio-rs/axum");
    }

    #[test]
    fn test_response_shape() {
        let response = SummarizeResponse {
            summary: ReadmeSummary {
                summary: "A web framework".to_string(),
                cool_facts: vec!["Built on tower".to_string()],
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["summary"]["summary"], "A web framework");
        assert_eq!(json["summary"]["cool_facts"][0], "Built on tower");
    }
}

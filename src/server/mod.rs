use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::service::{QueryRequest, QueryService, ServiceError, DEFAULT_TOP_K};

#[derive(Clone)]
pub struct AppState {
    service: Arc<QueryService>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarProblemsRequest {
    pub user_query: String,
    pub method: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Wire shape of one result row. `S.No.` echoes the catalog `id` column,
/// not the result rank.
#[derive(Debug, Serialize)]
pub struct ProblemSummary {
    #[serde(rename = "S.No.")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Difficulty")]
    pub difficulty: String,
    #[serde(rename = "Link")]
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(service: Arc<QueryService>) -> Router {
    Router::new()
        .route("/get_similar_problems/", post(get_similar_problems))
        .with_state(AppState { service })
}

async fn get_similar_problems(
    State(state): State<AppState>,
    Json(request): Json<SimilarProblemsRequest>,
) -> Response {
    let request = QueryRequest {
        text: request.user_query,
        method: request.method,
        top_k: request.top_k,
    };

    match state.service.handle(&request) {
        Ok(ranked) => {
            let summaries: Vec<ProblemSummary> = ranked
                .into_iter()
                .map(|problem| ProblemSummary {
                    id: problem.record.id,
                    title: problem.record.title,
                    difficulty: problem.record.difficulty,
                    link: problem.record.url,
                })
                .collect();
            Json(summaries).into_response()
        }
        // A bad method selector is reported as a 200 with an error object
        // rather than a 4xx, preserving the service's original wire contract.
        Err(err @ ServiceError::InvalidMethod) => Json(ErrorBody {
            error: err.to_string(),
        })
        .into_response(),
        Err(err) => {
            error!(%err, "query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn serve(addr: SocketAddr, service: Arc<QueryService>) -> Result<()> {
    let app = router(service);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_summary_uses_the_original_field_names() {
        let summary = ProblemSummary {
            id: 42,
            title: "Two Sum".to_string(),
            difficulty: "Easy".to_string(),
            link: "https://example.com/42".to_string(),
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["S.No."], 42);
        assert_eq!(value["Title"], "Two Sum");
        assert_eq!(value["Difficulty"], "Easy");
        assert_eq!(value["Link"], "https://example.com/42");
    }

    #[test]
    fn top_k_defaults_to_five() {
        let request: SimilarProblemsRequest =
            serde_json::from_str(r#"{"user_query": "sum", "method": "tfidf"}"#).unwrap();
        assert_eq!(request.top_k, DEFAULT_TOP_K);
        assert_eq!(request.top_k, 5);
    }

    #[test]
    fn request_body_requires_query_and_method() {
        let missing_query = serde_json::from_str::<SimilarProblemsRequest>(r#"{"method": "tfidf"}"#);
        assert!(missing_query.is_err());

        let missing_method = serde_json::from_str::<SimilarProblemsRequest>(r#"{"user_query": "sum"}"#);
        assert!(missing_method.is_err());
    }
}

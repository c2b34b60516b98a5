use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, ProblemRecord};
use crate::index::{LexicalIndex, SemanticIndex};
use crate::search::{self, RankedMatch};

pub const DEFAULT_TOP_K: usize = 5;

/// Which precomputed index a request runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Tfidf,
    Embeddings,
}

impl Method {
    /// Case-insensitive selector parsing; anything else is a client error.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw.to_lowercase().as_str() {
            "tfidf" => Ok(Self::Tfidf),
            "embeddings" => Ok(Self::Embeddings),
            _ => Err(ServiceError::InvalidMethod),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub text: String,
    pub method: String,
    pub top_k: usize,
}

/// A catalog record paired with its similarity score, in ranker order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProblem {
    pub record: ProblemRecord,
    pub score: f32,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid method. Choose either 'tfidf' or 'embeddings'.")]
    InvalidMethod,
    #[error("failed to embed query")]
    EmbedQuery(#[source] anyhow::Error),
}

/// Stateless request facade over the catalog and both indices. All state is
/// built at startup and read-only afterwards, so one instance serves
/// concurrent requests without locking.
pub struct QueryService {
    catalog: Catalog,
    lexical: LexicalIndex,
    semantic: SemanticIndex,
}

impl QueryService {
    pub fn new(catalog: Catalog, lexical: LexicalIndex, semantic: SemanticIndex) -> Self {
        Self {
            catalog,
            lexical,
            semantic,
        }
    }

    pub fn handle(&self, request: &QueryRequest) -> Result<Vec<RankedProblem>, ServiceError> {
        let method = Method::parse(&request.method)?;
        let top_k = request.top_k.min(self.catalog.len());

        let matches = match method {
            Method::Tfidf => {
                let vector = self.lexical.vectorize(&request.text);
                search::rank(&vector, self.lexical.rows(), top_k)
            }
            Method::Embeddings => {
                let vector = self
                    .semantic
                    .embed_query(&request.text)
                    .map_err(ServiceError::EmbedQuery)?;
                search::rank(&vector, self.semantic.rows(), top_k)
            }
        };

        debug!(?method, top_k, returned = matches.len(), "ranked query");

        Ok(self.project(matches))
    }

    fn project(&self, matches: Vec<RankedMatch>) -> Vec<RankedProblem> {
        matches
            .into_iter()
            .filter_map(|m| {
                self.catalog.get(m.index).map(|record| RankedProblem {
                    record: record.clone(),
                    score: m.score,
                })
            })
            .collect()
    }
}

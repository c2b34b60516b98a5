use std::sync::Arc;

use anyhow::{ensure, Context, Result};

use crate::embedding::TextEmbedder;

/// Precomputed corpus embeddings plus the embedder that produced them.
/// Built once at startup; `embed_query` is the only per-request model call.
pub struct SemanticIndex {
    embedder: Arc<dyn TextEmbedder>,
    matrix: Vec<Vec<f32>>,
}

impl SemanticIndex {
    pub fn build(embedder: Arc<dyn TextEmbedder>, documents: &[String]) -> Result<Self> {
        let matrix = embedder
            .embed_batch(documents)
            .context("failed to embed problem descriptions")?;
        ensure!(
            matrix.len() == documents.len(),
            "embedder returned {} vectors for {} documents",
            matrix.len(),
            documents.len()
        );

        Ok(Self { embedder, matrix })
    }

    /// Embed a single query with the same model the corpus was embedded with.
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        self.embedder.embed(query)
    }

    /// Per-document embedding rows, in catalog order.
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.matrix
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }
}

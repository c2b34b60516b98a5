use std::sync::{Arc, Mutex};

use anyhow::{anyhow, ensure, Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use moka::sync::Cache;

use super::{TextEmbedder, VECTOR_DIM};

const MAX_CACHED_TEXTS: u64 = 10_000;

/// Local sentence-embedding model (`all-MiniLM-L6-v2` via fastembed),
/// fronted by a text-keyed cache so repeated queries skip inference.
pub struct ModelEmbedder {
    inner: Mutex<TextEmbedding>,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl ModelEmbedder {
    pub fn new(show_download_progress: bool) -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(show_download_progress),
        )
        .context("failed to initialize the sentence-embedding model")?;

        Ok(Self {
            inner: Mutex::new(model),
            cache: Cache::new(MAX_CACHED_TEXTS),
        })
    }
}

impl TextEmbedder for ModelEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors: Vec<Option<Vec<f32>>> = texts
            .iter()
            .map(|text| self.cache.get(text).map(|hit| hit.as_ref().clone()))
            .collect();

        let misses: Vec<usize> = (0..texts.len()).filter(|&i| vectors[i].is_none()).collect();

        if !misses.is_empty() {
            let inputs: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let embedded = {
                let mut model = self
                    .inner
                    .lock()
                    .map_err(|_| anyhow!("embedding model lock poisoned"))?;
                model.embed(inputs, None)?
            };
            ensure!(
                embedded.len() == misses.len(),
                "embedding model returned {} vectors for {} inputs",
                embedded.len(),
                misses.len()
            );

            for (&i, vector) in misses.iter().zip(embedded) {
                self.cache.insert(texts[i].clone(), Arc::new(vector.clone()));
                vectors[i] = Some(vector);
            }
        }

        Ok(vectors.into_iter().flatten().collect())
    }

    fn dimension(&self) -> usize {
        VECTOR_DIM
    }
}

mod local;

pub use local::ModelEmbedder;

use anyhow::Result;

pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const VECTOR_DIM: usize = 384;

/// A deterministic text-to-vector mapping. The service treats this as an
/// opaque capability so ranking can be tested with stub implementations
/// instead of real model inference.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()])?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no embedding generated"))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;
}

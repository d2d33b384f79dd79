//! Retrieval: embeds segments, builds an in-memory index and fetches the
//! passages most relevant to a query.

pub mod index;
pub mod openai_embed;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::extraction::Segment;
use crate::llm_client::{ApiKey, LlmError};

pub use index::{SearchHit, SimilarityIndex};
pub use openai_embed::OpenAiEmbedder;

/// Number of passages handed to answer synthesis.
pub const TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] LlmError),

    #[error("embedding service returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding service returned an empty vector")]
    Empty,
}

/// Abstract embedding contract: text in, vector out.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds every text, returning vectors in input order.
    async fn embed_documents(&self, api_key: &ApiKey, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    async fn embed_query(&self, api_key: &ApiKey, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Embeds every segment and builds a fresh index. No embedding call is made
/// for an empty segment list.
pub async fn build_index(
    embedder: &dyn Embedder,
    api_key: &ApiKey,
    segments: &[Segment],
) -> Result<SimilarityIndex, EmbeddingError> {
    if segments.is_empty() {
        return Ok(SimilarityIndex::default());
    }

    let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
    let vectors = embedder.embed_documents(api_key, &texts).await?;
    let index = SimilarityIndex::build(segments.to_vec(), vectors)?;
    debug!("Built similarity index over {} segments", index.len());
    Ok(index)
}

/// Embeds the query and returns up to `k` nearest segments.
pub async fn retrieve(
    embedder: &dyn Embedder,
    api_key: &ApiKey,
    index: &SimilarityIndex,
    query: &str,
    k: usize,
) -> Result<Vec<SearchHit>, EmbeddingError> {
    if index.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedder.embed_query(api_key, query).await?;
    index.search(&query_vector, k)
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Embedder, EmbeddingError};
use crate::llm_client::{ApiKey, LlmClient};

/// Embedding model used for both segments and queries.
pub const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
/// Maximum inputs sent in one embeddings request.
const MAX_BATCH: usize = 1000;

#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: LlmClient,
}

impl OpenAiEmbedder {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_documents(&self, api_key: &ApiKey, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH) {
            let request = EmbeddingsRequest {
                model: EMBEDDING_MODEL,
                input: batch,
            };
            let response: EmbeddingsResponse = self.client.post_json("embeddings", api_key, &request).await?;
            vectors.extend(into_ordered_vectors(response, batch.len())?);
        }
        Ok(vectors)
    }

    async fn embed_query(&self, api_key: &ApiKey, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = [text.to_string()];
        let mut vectors = self.embed_documents(api_key, &input).await?;
        vectors.pop().ok_or(EmbeddingError::CountMismatch {
            expected: 1,
            got: 0,
        })
    }
}

/// The API tags each vector with its input index; order by it rather than
/// trusting response order.
fn into_ordered_vectors(response: EmbeddingsResponse, expected: usize) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);
    if data.iter().any(|d| d.embedding.is_empty()) {
        return Err(EmbeddingError::Empty);
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

//! Evaluation pipeline: orchestrates one view request end to end.
//!
//! Flow: precondition check → extract segments → build query from template →
//!       embed + index → retrieve top-k → synthesize answer.
//!
//! Caching policy: none. Every view request re-extracts, re-embeds and
//! re-retrieves from the session's current document. Segment identity across
//! views is therefore not stable. Changing this is a product decision.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::evaluation::views::View;
use crate::extraction::{render_content, Document, ExtractionError, Segment, TextExtractor};
use crate::llm_client::prompts::build_qa_system;
use crate::llm_client::{ApiKey, ChatModel, LlmError};
use crate::retrieval::{build_index, retrieve, Embedder, EmbeddingError, SearchHit, TOP_K};
use crate::session::SessionContext;

#[derive(Debug, Error)]
#[error("answer synthesis failed: {0}")]
pub struct SynthesisError(#[from] pub LlmError);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Extraction(_) => "extraction_error",
            PipelineError::Embedding(_) => "embedding_error",
            PipelineError::Synthesis(_) => "synthesis_error",
        }
    }

    /// Categorised message safe to show to the user. The underlying error is logged instead.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Extraction(ExtractionError::NoText) => {
                "The resume has no extractable text. Scanned or image-only PDFs are not supported."
            }
            PipelineError::Extraction(_) => "The resume could not be read. Please upload a valid PDF.",
            PipelineError::Embedding(EmbeddingError::Request(e))
            | PipelineError::Synthesis(SynthesisError(e))
                if e.is_auth() =>
            {
                "The OpenAI API key was rejected. Please check the key and try again."
            }
            PipelineError::Embedding(EmbeddingError::Request(e))
            | PipelineError::Synthesis(SynthesisError(e))
                if e.is_rate_limited() =>
            {
                "The OpenAI API is rate limiting requests. Please wait a moment and try again."
            }
            PipelineError::Embedding(_) => "The resume could not be indexed for search. Please try again.",
            PipelineError::Synthesis(_) => "The language model did not return an answer. Please try again.",
        }
    }
}

/// Why a view could not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    MissingDocument,
    MissingCredential,
}

impl BlockReason {
    pub fn guidance(self) -> &'static str {
        match self {
            BlockReason::MissingDocument => "Please upload a resume",
            BlockReason::MissingCredential => "Please enter your OpenAI API Key",
        }
    }
}

/// The model's answer plus the passages it was given.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub passages: Vec<SearchHit>,
}

#[derive(Debug)]
pub enum PipelineResult {
    Ready(Answer),
    Blocked(BlockReason),
    Failed(PipelineError),
}

/// Stateless service object holding the three external collaborators.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
}

impl Pipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, embedder: Arc<dyn Embedder>, chat: Arc<dyn ChatModel>) -> Self {
        Self {
            extractor,
            embedder,
            chat,
        }
    }

    /// Runs one view. Never returns an error: failures become `PipelineResult::Failed`.
    pub async fn run(&self, view: View, ctx: &SessionContext) -> PipelineResult {
        let Some(document) = ctx.document.as_ref() else {
            return PipelineResult::Blocked(BlockReason::MissingDocument);
        };
        let Some(api_key) = ctx.api_key.as_ref() else {
            return PipelineResult::Blocked(BlockReason::MissingCredential);
        };

        info!(view = %view, document = %document.filename, "{}", view.progress_message());

        match self.evaluate(view, document, api_key).await {
            Ok(answer) => {
                info!(view = %view, passages = answer.passages.len(), "View ready");
                PipelineResult::Ready(answer)
            }
            Err(e) => {
                warn!(view = %view, kind = e.kind(), "Pipeline failed: {e}");
                PipelineResult::Failed(e)
            }
        }
    }

    async fn evaluate(&self, view: View, document: &Document, api_key: &ApiKey) -> Result<Answer, PipelineError> {
        // Step 1: extract segments
        let segments = self.extract(document).await?;

        // Step 2: query from template, parameterized by the full segment list
        let query = view.build_query(&render_content(&segments));

        // Step 3: embed + index, then retrieve top-k
        let index = build_index(self.embedder.as_ref(), api_key, &segments).await?;
        let passages = retrieve(self.embedder.as_ref(), api_key, &index, &query, TOP_K).await?;

        // Step 4: synthesize
        let text = synthesize(self.chat.as_ref(), api_key, &passages, &query).await?;
        Ok(Answer { text, passages })
    }

    async fn extract(&self, document: &Document) -> Result<Vec<Segment>, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        let document = document.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))?
    }
}

/// One completion request: retrieved passages as context, the query as the question.
pub async fn synthesize(
    chat: &dyn ChatModel,
    api_key: &ApiKey,
    passages: &[SearchHit],
    query: &str,
) -> Result<String, SynthesisError> {
    let system = build_qa_system(passages.iter().map(|h| h.segment.text.as_str()));
    Ok(chat.complete(api_key, &system, query).await?)
}

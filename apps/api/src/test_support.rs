//! Stub collaborators with call counters, shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::evaluation::pipeline::Pipeline;
use crate::extraction::{segments_from_text, Document, ExtractionError, Segment, TextExtractor, TextSplitter};
use crate::llm_client::{ApiKey, ChatModel, LlmError};
use crate::retrieval::{Embedder, EmbeddingError};

pub const JANE_DOE_RESUME: &str = "Jane Doe. Skills: Python, Go. Experience: 5 years backend.";

pub const OVERVIEW_ANSWER: &str = "\
**Key qualifications and skills (top 3-5)**
- Python
- Go

**Most relevant work experience (1-2 sentences)**
- 5 years of backend engineering.";

/// Treats every document as containing a fixed text.
pub struct StubExtractor {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _document: &Document) -> Result<Vec<Segment>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => segments_from_text(&TextSplitter::default(), text),
            None => Err(ExtractionError::Unreadable("stub: corrupt xref table".to_string())),
        }
    }
}

/// Embeds text as a one-dimensional vector holding its character count.
#[derive(Default)]
pub struct StubEmbedder {
    fail: bool,
    document_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::Request(LlmError::Api {
                status: 401,
                message: "Incorrect API key provided".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed_documents(&self, _api_key: &ApiKey, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(texts.iter().map(|t| vec![t.chars().count() as f32]).collect())
    }

    async fn embed_query(&self, _api_key: &ApiKey, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(vec![text.chars().count() as f32])
    }
}

/// Returns a canned answer and records every prompt it receives.
pub struct StubChat {
    answer: Option<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl StubChat {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, prompt)` pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for StubChat {
    async fn complete(&self, _api_key: &ApiKey, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.answer.clone().ok_or(LlmError::Api {
            status: 500,
            message: "stub: upstream unavailable".to_string(),
        })
    }
}

/// Stub collaborators wired into a pipeline, kept around for call-count assertions.
pub struct StubbedPipeline {
    pub extractor: Arc<StubExtractor>,
    pub embedder: Arc<StubEmbedder>,
    pub chat: Arc<StubChat>,
    pub pipeline: Pipeline,
}

impl StubbedPipeline {
    pub fn new(extractor: StubExtractor, embedder: StubEmbedder, chat: StubChat) -> Self {
        let extractor = Arc::new(extractor);
        let embedder = Arc::new(embedder);
        let chat = Arc::new(chat);
        let pipeline = Pipeline::new(extractor.clone(), embedder.clone(), chat.clone());
        Self {
            extractor,
            embedder,
            chat,
            pipeline,
        }
    }

    /// Jane Doe resume, working embedder, chat answering with the overview schema.
    pub fn happy() -> Self {
        Self::new(
            StubExtractor::with_text(JANE_DOE_RESUME),
            StubEmbedder::default(),
            StubChat::answering(OVERVIEW_ANSWER),
        )
    }
}

pub fn sample_document() -> Document {
    Document::new("jane_doe.pdf", bytes::Bytes::from_static(b"%PDF-1.4 stub"))
}

pub fn sample_key() -> ApiKey {
    ApiKey::new("sk-test-123").unwrap()
}

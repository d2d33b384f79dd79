//! Exact nearest-neighbour index over segment embeddings.
//!
//! Resumes produce a handful of segments, so a flat scan with squared L2
//! distance is all that is needed.

use serde::Serialize;

use crate::extraction::Segment;
use crate::retrieval::EmbeddingError;

/// A retrieved segment together with its distance to the query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub segment: Segment,
    /// Squared L2 distance; smaller is more similar.
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    dimension: usize,
    entries: Vec<(Segment, Vec<f32>)>,
}

impl SimilarityIndex {
    /// Pairs each segment with its vector. All vectors must share one non-zero dimension.
    pub fn build(segments: Vec<Segment>, vectors: Vec<Vec<f32>>) -> Result<Self, EmbeddingError> {
        if segments.len() != vectors.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: segments.len(),
                got: vectors.len(),
            });
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if !vectors.is_empty() && dimension == 0 {
            return Err(EmbeddingError::Empty);
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimension,
                got: bad.len(),
            });
        }

        Ok(Self {
            dimension,
            entries: segments.into_iter().zip(vectors).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the `min(k, len)` closest segments, most similar first.
    /// Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, EmbeddingError> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, v))| (i, squared_l2(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, distance)| SearchHit {
                segment: self.entries[i].0.clone(),
                distance,
            })
            .collect())
    }
}

pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let d = x - y;
        sum += d * d;
    }
    sum
}

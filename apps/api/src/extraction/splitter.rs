//! Recursive character splitter.
//!
//! Splits on the coarsest separator present in the text (`"\n\n"`, then `"\n"`,
//! then `" "`, then individual characters), recursing into pieces that are still
//! too long, and merges small pieces back into chunks with a bounded overlap.
//!
//! Guarantees, with lengths measured in `char`s:
//! - every chunk is at most `chunk_size` long and is whitespace-trimmed
//! - consecutive chunks share at most `chunk_overlap` characters
//! - chunk order follows the source text

use std::collections::VecDeque;

/// Default chunk length for resume text.
pub const CHUNK_SIZE: usize = 700;
/// Default overlap between consecutive chunks.
pub const CHUNK_OVERLAP: usize = 200;

const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// `chunk_overlap` is clamped below `chunk_size`; `chunk_size` is at least 1.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        TextSplitter {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.to_vec(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        // Pick the first separator that occurs in the text; "" always matches.
        let mut separator = "";
        let mut finer: &[&'static str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                break;
            }
            if text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }
            if finer.is_empty() {
                chunks.extend(trimmed(&piece));
            } else {
                chunks.extend(self.split_recursive(&piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily packs pieces into chunks. When a chunk is full, pieces are
    /// dropped from its front until at most `chunk_overlap` characters remain,
    /// and those carry over into the next chunk.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut out = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                out.extend(trimmed(&concat(&window)));
                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }
            window.push_back(piece.as_str());
            total += len;
        }

        if !window.is_empty() {
            out.extend(trimmed(&concat(&window)));
        }

        out
    }
}

/// Splits `text` on `separator`, attaching each separator to the start of the
/// piece that follows it. Empty pieces are dropped.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut parts = text.split(separator);
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            pieces.push(first.to_string());
        }
    }
    for part in parts {
        let mut piece = String::with_capacity(separator.len() + part.len());
        piece.push_str(separator);
        piece.push_str(part);
        pieces.push(piece);
    }
    pieces
}

fn concat(window: &VecDeque<&str>) -> String {
    window.iter().copied().collect()
}

fn trimmed(text: &str) -> Option<String> {
    let t = text.trim();
    (!t.is_empty()).then(|| t.to_string())
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

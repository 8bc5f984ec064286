//! Sentence-aware sliding window chunking

use crate::error::{IntervuError, Result};

/// How far back from a window's end to look for a sentence terminator
const SENTENCE_LOOKBACK: usize = 100;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits text into overlapping windows of at most `chunk_size` characters
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(IntervuError::InvalidArgument(
                "Chunk size must be greater than zero".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(IntervuError::InvalidArgument(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        if total <= self.chunk_size {
            return vec![text.trim().to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < total {
            // may run past the text; only the slice is clamped
            let mut end = start + self.chunk_size;

            if end < total {
                // the floor is never a candidate
                let floor = start.max(end.saturating_sub(SENTENCE_LOOKBACK));
                if let Some(i) = (floor + 1..end)
                    .rev()
                    .find(|&i| SENTENCE_TERMINATORS.contains(&chars[i]))
                {
                    end = i + 1;
                }
            }

            let chunk: String = chars[start..end.min(total)].iter().collect();
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }

            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }
}

/// Convenience wrapper validating parameters on every call
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(Chunker::new(chunk_size, overlap)?.chunk(text))
}

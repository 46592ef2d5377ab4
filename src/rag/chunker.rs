//! Recursive character chunking.
//!
//! Documents are split on the coarsest separator that yields pieces within
//! `chunk_size`, oversized pieces are re-split with the next separator, and
//! the resulting pieces are merged back into contiguous segments. Chunk
//! boundaries depend only on size and overlap, never on semantic content.

use crate::types::{AppError, Chunk, ChunkMetadata, Result};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk before the overlap prefix is added.
    pub chunk_size: usize,
    /// Characters repeated from the previous chunk. Must be < chunk_size.
    pub chunk_overlap: usize,
    /// Boundary strings tried from coarsest to finest. The empty string
    /// splits at raw character boundaries.
    pub separators: Vec<String>,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            separators: vec![
                "\n\n".to_string(),
                "\n".to_string(),
                " ".to_string(),
                String::new(),
            ],
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AppError::InvalidChunking(
                "chunk_size must be positive".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::InvalidChunking(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct TextChunker {
    config: ChunkConfig,
}

impl TextChunker {
    /// Fails fast on `chunk_overlap >= chunk_size`, before any splitting.
    pub fn new(config: ChunkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Split `text` into overlapping chunks tagged with `source`.
    ///
    /// Ids are fresh v4 UUIDs on every call; chunking the same text twice
    /// yields new ids (no dedup contract).
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Chunk> {
        self.segments(text)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| Chunk {
                id: Uuid::new_v4().to_string(),
                text,
                metadata: ChunkMetadata {
                    chunk_index,
                    source: source.to_string(),
                },
            })
            .collect()
    }

    /// Chunk texts with their overlap prefixes applied.
    ///
    /// Each element after the first starts with the trailing
    /// `chunk_overlap` characters of the previous base segment, so
    /// stripping those prefixes and concatenating reconstructs the input
    /// exactly.
    fn segments(&self, text: &str) -> Vec<String> {
        let base = self.base_segments(text);
        let mut out = Vec::with_capacity(base.len());
        for (i, segment) in base.iter().enumerate() {
            if i == 0 {
                out.push(segment.clone());
            } else {
                let mut with_overlap = char_tail(&base[i - 1], self.config.chunk_overlap);
                with_overlap.push_str(segment);
                out.push(with_overlap);
            }
        }
        out
    }

    /// Contiguous segments of at most `chunk_size` characters whose
    /// concatenation equals the input.
    fn base_segments(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.config.chunk_size {
            return vec![text.to_string()];
        }
        let pieces = split_recursive(text, &self.config.separators, self.config.chunk_size);
        self.merge(pieces)
    }

    /// Greedily merge adjacent small pieces back together up to chunk_size.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);
            if current_len > 0 && current_len + piece_len > self.config.chunk_size {
                segments.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Split into pieces of at most `max_len` characters, trying separators in
/// order. Separators stay attached to the preceding piece so nothing is
/// lost.
fn split_recursive(text: &str, separators: &[String], max_len: usize) -> Vec<String> {
    if char_len(text) <= max_len {
        return vec![text.to_string()];
    }

    let Some((separator, rest)) = separators.split_first() else {
        // Separator list exhausted; pass the oversized piece through.
        return vec![text.to_string()];
    };

    if separator.is_empty() {
        return split_chars(text, max_len);
    }
    if !text.contains(separator.as_str()) {
        return split_recursive(text, rest, max_len);
    }

    let mut pieces = Vec::new();
    for piece in split_keep_separator(text, separator) {
        if char_len(&piece) > max_len {
            pieces.extend(split_recursive(&piece, rest, max_len));
        } else {
            pieces.push(piece);
        }
    }
    pieces
}

/// Split on `separator`, keeping the separator at the end of each piece.
fn split_keep_separator(text: &str, separator: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        pieces.push(text[start..end].to_string());
        start = end;
    }
    if start < text.len() {
        pieces.push(text[start..].to_string());
    }
    pieces
}

/// Split at raw character boundaries (UTF-8 safe).
fn split_chars(text: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_len {
            pieces.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Last `n` characters of `text`.
fn char_tail(text: &str, n: usize) -> String {
    let len = char_len(text);
    if len <= n {
        return text.to_string();
    }
    text.chars().skip(len - n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chunker(size: usize, overlap: usize) -> TextChunker {
        TextChunker::new(ChunkConfig::new(size, overlap)).unwrap()
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let chunks = chunker(512, 50).chunk("hello world", "greeting.txt");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert_eq!(chunks[0].metadata.source, "greeting.txt");
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunker(512, 50).chunk("", "empty.txt").is_empty());
    }

    #[rstest]
    #[case(512, 512)]
    #[case(512, 600)]
    #[case(0, 0)]
    fn test_invalid_config_fails_fast(#[case] size: usize, #[case] overlap: usize) {
        let err = TextChunker::new(ChunkConfig::new(size, overlap)).unwrap_err();
        assert!(matches!(err, AppError::InvalidChunking(_)));
    }

    #[test]
    fn test_uniform_text_example() {
        // 1000 chars at 512/50: two chunks, the second starting 50 chars
        // before position 512.
        let text = "A".repeat(1000);
        let chunks = chunker(512, 50).chunk(&text, "a.txt");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 512);
        // 488 chars of tail plus the 50-char overlap prefix
        assert_eq!(chunks[1].text.chars().count(), 538);
    }

    #[test]
    fn test_overlap_prefix_repeats_previous_tail() {
        let text: String = ('a'..='z').cycle().take(1200).collect();
        let chunks = chunker(100, 20).chunk(&text, "t");
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text.chars().collect();
            let tail: String = prev[prev.len() - 20..].iter().collect();
            assert!(pair[1].text.starts_with(&tail));
        }
    }

    #[test]
    fn test_non_overlapping_portions_reconstruct_input() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let config = ChunkConfig::new(64, 16);
        let chunks = TextChunker::new(config.clone()).unwrap().chunk(&text, "t");

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(&chunk.text);
            } else {
                let stripped: String = chunk.text.chars().skip(config.chunk_overlap).collect();
                rebuilt.push_str(&stripped);
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_paragraph_boundaries_preferred() {
        let text = format!("{}\n\n{}", "x".repeat(30), "y".repeat(30));
        let chunks = chunker(40, 5).chunk(&text, "t");
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.ends_with("\n\n"));
        assert!(chunks[1].text.ends_with("y"));
    }

    #[test]
    fn test_base_segments_never_exceed_chunk_size() {
        let text = "word ".repeat(500);
        let config = ChunkConfig::new(50, 10);
        let chunker = TextChunker::new(config).unwrap();
        for segment in chunker.base_segments(&text) {
            assert!(segment.chars().count() <= 50);
        }
    }

    #[test]
    fn test_ids_are_fresh_per_call() {
        let chunker = chunker(512, 50);
        let a = chunker.chunk("same text", "s");
        let b = chunker.chunk("same text", "s");
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "héllo wörld ".repeat(100);
        let chunks = chunker(40, 8).chunk(&text, "t");
        assert!(chunks.len() > 1);
        // Would panic on a byte-boundary slice mid-codepoint.
        for chunk in &chunks {
            assert!(!chunk.text.is_empty());
        }
    }
}

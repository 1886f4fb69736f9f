//! Fixed-size text chunking.
//!
//! Documents are split into fixed-width character windows, optionally
//! overlapping. Counting characters rather than bytes keeps the slicing safe
//! for non-ASCII text.

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 0,
        }
    }
}

/// Split text into fixed-size chunks.
///
/// Consecutive chunks share `overlap` characters; the last chunk may be
/// shorter. For a text of length L the result has ceil((L - O) / (C - O))
/// chunks (ceil(L / C) when O = 0), and concatenating zero-overlap chunks in
/// order reconstructs the input.
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    if text.is_empty() || config.chunk_size == 0 {
        return Vec::new();
    }

    // Overlap must leave the window moving forward
    let overlap = config.overlap.min(config.chunk_size.saturating_sub(1));
    let step = config.chunk_size - overlap;

    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
    }

    #[test]
    fn test_no_overlap_chunk_count() {
        // 2500 characters at size 1000 -> exactly 3 chunks
        let text = "x".repeat(2500);
        let chunks = split_text(&text, &config(1000, 0));
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn test_no_overlap_reconstructs_input() {
        let text: String = ('a'..='z').cycle().take(3141).collect();
        let chunks = split_text(&text, &config(500, 0));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_overlap_chunk_count_formula() {
        // ceil((L - O) / (C - O)) with L=2500, C=1000, O=200 -> 3
        let text = "y".repeat(2500);
        let chunks = split_text(&text, &config(1000, 200));
        assert_eq!(chunks.len(), 3);

        // Each chunk starts 800 characters after the previous one
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 900);
    }

    #[test]
    fn test_overlap_repeats_tail_of_previous_chunk() {
        let text: String = (0..30).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = split_text(&text, &config(10, 4));

        for pair in chunks.windows(2) {
            let prev_tail: String = pair[0].chars().skip(pair[0].chars().count() - 4).collect();
            let next_head: String = pair[1].chars().take(4).collect();
            assert_eq!(prev_tail, next_head);
        }
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("short", &config(1000, 200));
        assert_eq!(chunks, vec!["short".to_string()]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(split_text("", &config(1000, 0)).is_empty());
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "привет мир ".repeat(40);
        let chunks = split_text(&text, &config(100, 0));
        assert_eq!(
            chunks.iter().map(|c| c.chars().count()).sum::<usize>(),
            text.chars().count()
        );
        assert_eq!(chunks.concat(), text);
    }
}

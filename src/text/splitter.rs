// Recursive character splitter for feeding bounded-context summarization models.
//
// Text is split on the coarsest separator present ("\n\n", then "\n", then " ",
// then individual characters); pieces are merged back greedily into chunks of at
// most `chunk_size` characters, and each new chunk starts with up to `overlap`
// characters of trailing context from the previous one. Pieces that are still
// too long are split again with the next finer separator.
use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl RecursiveSplitter {
    /// `overlap` is clamped below `chunk_size` so that every chunk makes progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (idx, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(**s))
            .map(|(i, s)| (i, *s))
            .unwrap_or((separators.len().saturating_sub(1), ""));
        let finer = &separators[(idx + 1).min(separators.len())..];

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting, separator));
                fitting.clear();
            }
            if finer.is_empty() {
                if !piece.trim().is_empty() {
                    chunks.push(piece.to_string());
                }
            } else {
                chunks.extend(self.split_with(piece, finer));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting, separator));
        }
        chunks
    }

    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let joiner = if window.is_empty() { 0 } else { sep_len };
            if total + len + joiner > self.chunk_size && !window.is_empty() {
                push_joined(&mut chunks, &window, separator);
                // Keep only as much trailing context as the overlap allows.
                loop {
                    let joiner = if window.is_empty() { 0 } else { sep_len };
                    let over_budget = total + len + joiner > self.chunk_size;
                    if total <= self.overlap && !(total > 0 && over_budget) {
                        break;
                    }
                    let Some(front) = window.pop_front() else { break };
                    let joined = if window.is_empty() { 0 } else { sep_len };
                    total = total.saturating_sub(char_len(front) + joined);
                }
            }
            let joiner = if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece);
            total += len + joiner;
        }
        push_joined(&mut chunks, &window, separator);
        chunks
    }
}

fn push_joined(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_windows_with_overlap() {
        let splitter = RecursiveSplitter::new(5, 2);
        let chunks = splitter.split("a b c d e f g h i j");
        assert_eq!(chunks, vec!["a b c", "c d e", "e f g", "g h i", "i j"]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveSplitter::new(2800, 300);
        let chunks = splitter.split("A short paragraph.");
        assert_eq!(chunks, vec!["A short paragraph."]);
    }

    #[test]
    fn test_empty_text() {
        let splitter = RecursiveSplitter::new(100, 10);
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   ").is_empty());
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let splitter = RecursiveSplitter::new(20, 0);
        let chunks = splitter.split("first paragraph\n\nsecond paragraph");
        assert_eq!(chunks, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_oversized_word_falls_back_to_characters() {
        let splitter = RecursiveSplitter::new(4, 0);
        let chunks = splitter.split("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_chunks_respect_size() {
        let text = "lorem ipsum dolor sit amet ".repeat(200);
        let splitter = RecursiveSplitter::new(120, 30);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 120));
    }

    #[test]
    fn test_overlap_clamped() {
        let splitter = RecursiveSplitter::new(3, 10);
        let chunks = splitter.split("a b c d");
        assert!(!chunks.is_empty());
    }
}

// Text Summarization module using the extractive approach: sentences are ranked
// by the summed document frequency of the words they contain and the top K are
// returned, best first.
use std::collections::HashMap;

use tracing::debug;

use super::Annotator;

/// Lowercased alphabetic non-stopword token -> occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn build(annotator: &dyn Annotator, text: &str) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in annotator.tag(text) {
            if token.is_alpha && !token.is_stop {
                *counts.entry(token.lower).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    /// Count for an exact surface form; unknown words count zero.
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSentence<'a> {
    pub score: usize,
    pub text: &'a str,
}

/// Scores every sentence of at least `min_chars` characters.
///
/// Words are taken from a plain whitespace split and only lowercased, so
/// "pets." does not match the table entry "pets" and contributes nothing.
pub fn score_sentences<'a>(
    annotator: &dyn Annotator,
    text: &'a str,
    min_chars: usize,
) -> Vec<ScoredSentence<'a>> {
    let table = FrequencyTable::build(annotator, text);
    annotator
        .segment(text)
        .into_iter()
        .map(|span| span.slice(text))
        .filter(|sentence| sentence.chars().count() >= min_chars)
        .map(|sentence| ScoredSentence {
            score: sentence
                .split_whitespace()
                .map(|w| table.get(&w.to_lowercase()))
                .sum(),
            text: sentence,
        })
        .collect()
}

/// Top `k` sentences by score, joined with single spaces in rank order.
/// Equal scores keep document order.
pub fn summarize_extractive(
    annotator: &dyn Annotator,
    text: &str,
    min_chars: usize,
    k: usize,
) -> String {
    let mut scored = score_sentences(annotator, text, min_chars);
    debug!(sentences = scored.len(), k, "ranking sentences");

    // Vec::sort_by is stable, which is what keeps ties in document order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    scored
        .iter()
        .take(k)
        .map(|s| s.text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::RuleAnnotator;

    const PETS: &str = "Cats are animals. Cats are popular pets. Dogs are also popular.";

    #[test]
    fn test_frequency_table() {
        let table = FrequencyTable::build(&RuleAnnotator::new(), PETS);
        assert_eq!(table.get("cats"), 2);
        assert_eq!(table.get("animals"), 1);
        assert_eq!(table.get("popular"), 2);
        assert_eq!(table.get("pets"), 1);
        assert_eq!(table.get("dogs"), 1);
        assert_eq!(table.get("are"), 0);
        assert_eq!(table.get("also"), 0);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_ranked_summary() {
        let summary = summarize_extractive(&RuleAnnotator::new(), PETS, 0, 2);
        assert_eq!(summary, "Cats are popular pets. Cats are animals.");
    }

    #[test]
    fn test_punctuation_attached_words_score_zero() {
        let scored = score_sentences(&RuleAnnotator::new(), PETS, 0);
        let scores: Vec<usize> = scored.iter().map(|s| s.score).collect();
        // "animals.", "pets." and "popular." miss the table.
        assert_eq!(scores, vec![2, 4, 1]);
    }

    #[test]
    fn test_fewer_sentences_than_k() {
        let summary = summarize_extractive(&RuleAnnotator::new(), PETS, 0, 10);
        assert_eq!(
            summary,
            "Cats are popular pets. Cats are animals. Dogs are also popular."
        );
    }

    #[test]
    fn test_short_sentences_filtered() {
        let text = "Intro. The quarterly revenue report shows revenue growth across regions.";
        let summary = summarize_extractive(&RuleAnnotator::new(), text, 30, 5);
        assert_eq!(
            summary,
            "The quarterly revenue report shows revenue growth across regions."
        );
    }

    #[test]
    fn test_ties_keep_document_order() {
        let text = "It is what it is. They were there then. We would have been.";
        let summary = summarize_extractive(&RuleAnnotator::new(), text, 0, 2);
        assert_eq!(summary, "It is what it is. They were there then.");
    }

    #[test]
    fn test_unicode_whitespace_before_period() {
        let text = "Revenue grew in the\u{a0}north. Revenue fell in the south.";
        let summary = summarize_extractive(&RuleAnnotator::new(), text, 0, 2);
        assert_eq!(summary, "Revenue grew in the\u{a0}north. Revenue fell in the south.");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(summarize_extractive(&RuleAnnotator::new(), "", 30, 5), "");
    }

    #[test]
    fn test_all_filtered() {
        assert_eq!(summarize_extractive(&RuleAnnotator::new(), PETS, 100, 5), "");
    }

    #[test]
    fn test_zero_k() {
        assert_eq!(summarize_extractive(&RuleAnnotator::new(), PETS, 0, 0), "");
    }

    #[test]
    fn test_deterministic() {
        let annotator = RuleAnnotator::new();
        let text = PETS.repeat(4);
        let first = summarize_extractive(&annotator, &text, 10, 3);
        for _ in 0..5 {
            assert_eq!(summarize_extractive(&annotator, &text, 10, 3), first);
        }
    }
}

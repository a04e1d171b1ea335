// Keyword ("scope theme") extraction: the most frequent nouns and proper nouns.
use std::collections::HashMap;

use super::Annotator;
use crate::text::truncate_chars;

/// Up to `count` distinct nominal words of at least `min_chars` characters,
/// uppercased, most frequent first. Ties keep first-seen order.
pub fn extract_keywords(
    annotator: &dyn Annotator,
    text: &str,
    budget: usize,
    count: usize,
    min_chars: usize,
) -> Vec<String> {
    let text = truncate_chars(text, budget);

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for token in annotator.tag(text) {
        if !token.is_nominal() || token.is_stop || token.lower.chars().count() < min_chars {
            continue;
        }
        let entry = counts.entry(token.lower.clone()).or_insert(0);
        if *entry == 0 {
            order.push(token.lower);
        }
        *entry += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|w| {
            let n = counts.get(&w).copied().unwrap_or(0);
            (w, n)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .map(|(w, _)| w.to_uppercase())
        .collect()
}

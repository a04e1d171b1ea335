// Exploratory question synthesis: subjects from the document paired with fixed
// question templates.
use std::collections::HashSet;

use super::Annotator;

/// One `{}` slot each.
pub const QUESTION_TEMPLATES: [&str; 10] = [
    "How is the concept of {} introduced and justified in the document?",
    "What are the primary data points or conclusions associated with {}?",
    "Does the text suggest any specific risks or challenges regarding {}?",
    "How does {} impact the overall scope and objectives of the report?",
    "What evidence is provided to support the claims made about {}?",
    "Are there any notable correlations involving {} discussed?",
    "How does the author address the long-term implications of {}?",
    "What methodologies are employed to analyze {}?",
    "Does the document highlight any specific stakeholders related to {}?",
    "Based on the summary, what is the final recommendation regarding {}?",
];

/// Appended to short pools so every question slot has a subject.
pub const FALLBACK_SUBJECTS: [&str; 10] = [
    "Objectives",
    "Methodology",
    "Data Analysis",
    "Results",
    "Stakeholders",
    "Risks",
    "Timeline",
    "Budget",
    "Conclusion",
    "Recommendations",
];

/// Entities longer than the entity minimum, then noun phrases longer than the
/// phrase minimum, deduplicated in first-seen order.
pub fn build_subject_pool(
    annotator: &dyn Annotator,
    text: &str,
    min_entity_chars: usize,
    min_phrase_chars: usize,
) -> Vec<String> {
    let entities = annotator
        .entities(text)
        .into_iter()
        .map(|e| e.text)
        .filter(|t| t.chars().count() >= min_entity_chars);
    let phrases = annotator
        .noun_phrases(text)
        .into_iter()
        .map(|span| span.slice(text).to_string())
        .filter(|t| t.chars().count() >= min_phrase_chars);

    let mut seen: HashSet<String> = HashSet::new();
    entities
        .chain(phrases)
        .filter(|subject| seen.insert(subject.clone()))
        .collect()
}

/// Exactly `count` questions, pairing `pool[i % len]` with
/// `QUESTION_TEMPLATES[i % 10]`.
pub fn synthesize_questions(pool: &[String], count: usize) -> Vec<String> {
    synthesize_with_templates(pool, &QUESTION_TEMPLATES, count)
}

pub fn synthesize_with_templates(pool: &[String], templates: &[&str], count: usize) -> Vec<String> {
    let templates = if templates.is_empty() {
        &QUESTION_TEMPLATES[..]
    } else {
        templates
    };

    let mut subjects: Vec<&str> = pool.iter().map(String::as_str).collect();
    if subjects.len() < count {
        subjects.extend(FALLBACK_SUBJECTS.iter().copied());
    }

    (0..count)
        .map(|i| {
            let subject = subjects[i % subjects.len()];
            templates[i % templates.len()].replacen("{}", subject, 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::RuleAnnotator;

    fn pool(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_pool_uses_fallbacks() {
        let questions = synthesize_questions(&[], 10);
        assert_eq!(questions.len(), 10);
        assert_eq!(
            questions[0],
            "How is the concept of Objectives introduced and justified in the document?"
        );
        assert_eq!(
            questions[9],
            "Based on the summary, what is the final recommendation regarding Recommendations?"
        );
    }

    #[test]
    fn test_short_pool_padded_after_document_subjects() {
        let questions = synthesize_questions(&pool(&["Acme Robotics Inc."]), 10);
        assert_eq!(questions.len(), 10);
        assert!(questions[0].contains("Acme Robotics Inc."));
        assert!(questions[1].contains("Objectives"));
        assert!(questions[9].contains("Conclusion"));
    }

    #[test]
    fn test_full_pool_pairs_in_order() {
        let subjects: Vec<String> = (0..12).map(|i| format!("subject {i}")).collect();
        let questions = synthesize_questions(&subjects, 10);
        assert_eq!(questions.len(), 10);
        for (i, q) in questions.iter().enumerate() {
            assert!(q.contains(&format!("subject {i}")));
        }
    }

    #[test]
    fn test_count_beyond_pool_and_templates_wraps() {
        let questions = synthesize_with_templates(&pool(&["Budget"]), &["Why {}?"], 25);
        assert_eq!(questions.len(), 25);
        assert_eq!(questions[0], "Why Budget?");
        assert_eq!(questions[11], "Why Budget?");
        assert!(questions.iter().all(|q| !q.is_empty()));
    }

    #[test]
    fn test_subject_pool_from_text() {
        let text = "Acme Robotics Inc. reported strong quarterly growth in London. \
                    The regional expansion plan targets Paris.";
        let subjects = build_subject_pool(&RuleAnnotator::new(), text, 4, 6);
        assert_eq!(subjects[0], "Acme Robotics Inc.");
        assert!(subjects.contains(&"London".to_string()));
        let unique: HashSet<&String> = subjects.iter().collect();
        assert_eq!(unique.len(), subjects.len());
    }
}

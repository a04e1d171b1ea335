// Rule-based annotator: sentence segmentation, tokenization, stopwords and a
// suffix/context heuristic for coarse part-of-speech. No model files are loaded.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ner, Annotator, Entity, Pos, Span, Token};

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*|[^\w\s]").unwrap());

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "across", "after", "again", "against", "all", "almost", "also",
        "although", "always", "am", "among", "an", "and", "another", "any", "anything", "are",
        "around", "as", "at", "be", "became", "because", "become", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
        "doing", "done", "down", "during", "each", "either", "else", "enough", "etc", "even",
        "ever", "every", "few", "for", "from", "further", "had", "has", "have", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if",
        "in", "into", "is", "it", "its", "itself", "just", "least", "less", "many", "may", "me",
        "might", "more", "most", "much", "must", "my", "myself", "neither", "never", "no", "nor",
        "not", "nothing", "now", "of", "off", "often", "on", "once", "only", "or", "other",
        "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
        "perhaps", "quite", "rather", "really", "same", "several", "shall", "she", "should",
        "since", "so", "some", "still", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "therefore", "these", "they", "this", "those", "though",
        "through", "thus", "to", "together", "too", "toward", "towards", "under", "until", "up",
        "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
        "where", "whereas", "whether", "which", "while", "who", "whom", "whose", "why", "will",
        "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
        "yourselves",
    ]
    .iter()
    .copied()
    .collect()
});

static DETERMINERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
        "all", "both", "either", "neither", "another", "such", "my", "your", "his", "her", "its",
        "our", "their", "whose",
    ]
    .iter()
    .copied()
    .collect()
});

static PRONOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
        "yourself", "himself", "herself", "itself", "ourselves", "themselves", "mine", "yours",
        "hers", "ours", "theirs", "who", "whom", "what", "which",
    ]
    .iter()
    .copied()
    .collect()
});

static AUXILIARIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
        "must",
    ]
    .iter()
    .copied()
    .collect()
});

static ADPOSITIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
        "out", "off", "over", "under", "upon", "within", "without", "among", "via", "across",
        "along", "around", "behind", "beyond", "despite", "toward", "towards", "per",
    ]
    .iter()
    .copied()
    .collect()
});

static CONJUNCTIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "or", "but", "nor", "so", "yet", "because", "although", "though", "while",
        "whereas", "if", "unless", "than", "whether",
    ]
    .iter()
    .copied()
    .collect()
});

// Periods after these never end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc",
        "ltd", "co", "corp", "no", "fig", "approx", "dept", "est", "jan", "feb", "mar", "apr",
        "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    ]
    .iter()
    .copied()
    .collect()
});

const NOUN_SUFFIXES: [&str; 16] = [
    "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "ism", "ist", "ure", "age",
    "ogy", "ics", "hood", "dom",
];

const ADJECTIVE_SUFFIXES: [&str; 10] =
    ["ous", "ful", "ive", "able", "ible", "ical", "ic", "less", "ish", "al"];

const VERB_SUFFIXES: [&str; 5] = ["ing", "ed", "ize", "ise", "ify"];

pub fn is_stopword(lower: &str) -> bool {
    STOP_WORDS.contains(lower)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleAnnotator;

impl RuleAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl Annotator for RuleAnnotator {
    fn segment(&self, text: &str) -> Vec<Span> {
        segment_sentences(text)
    }

    fn tag(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        for m in TOKEN_PATTERN.find_iter(text) {
            let surface = m.as_str();
            let lower = surface.to_lowercase();
            let sentence_start = tokens
                .last()
                .map_or(true, |t| matches!(t.text.as_str(), "." | "!" | "?"));
            let n = tokens.len();
            let prev = n.checked_sub(1).map(|i| &tokens[i]);
            let prev2 = n.checked_sub(2).map(|i| &tokens[i]);
            let pos = classify(surface, &lower, sentence_start, prev, prev2);
            tokens.push(Token {
                is_alpha: surface.chars().all(char::is_alphabetic),
                is_stop: is_stopword(&lower),
                text: surface.to_string(),
                lower,
                pos,
                start: m.start(),
                end: m.end(),
            });
        }
        tokens
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        ner::extract_entities_from_text(text)
    }
}

fn classify(
    surface: &str,
    lower: &str,
    sentence_start: bool,
    prev: Option<&Token>,
    prev2: Option<&Token>,
) -> Pos {
    let first = match surface.chars().next() {
        Some(c) => c,
        None => return Pos::Other,
    };
    if !first.is_alphanumeric() && first != '_' {
        return Pos::Punctuation;
    }
    if first.is_numeric() {
        return Pos::Numeral;
    }
    if DETERMINERS.contains(lower) {
        return Pos::Determiner;
    }
    if PRONOUNS.contains(lower) {
        return Pos::Pronoun;
    }
    if AUXILIARIES.contains(lower) {
        return Pos::Auxiliary;
    }
    if ADPOSITIONS.contains(lower) {
        return Pos::Adposition;
    }
    if CONJUNCTIONS.contains(lower) {
        return Pos::Conjunction;
    }
    if STOP_WORDS.contains(lower) {
        return Pos::Other;
    }

    let acronym = surface.chars().count() >= 2 && surface.chars().all(|c| c.is_uppercase());
    if acronym || (first.is_uppercase() && !sentence_start) {
        return Pos::ProperNoun;
    }

    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Pos::Noun;
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return Pos::Adverb;
    }
    let after_verb_marker =
        prev.map_or(false, |t| t.pos == Pos::Auxiliary || t.lower == "to");
    if after_verb_marker || VERB_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Pos::Verb;
    }
    if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return Pos::Adjective;
    }
    // "the budget review covers": an -s word right after a phrase head reads as a verb.
    let after_head = prev.map_or(false, |t| t.is_nominal())
        && prev2.map_or(false, |t| {
            matches!(t.pos, Pos::Determiner | Pos::Adjective | Pos::Noun | Pos::ProperNoun)
        });
    if after_head && lower.ends_with('s') && !lower.ends_with("ss") {
        return Pos::Verb;
    }
    Pos::Noun
}

fn segment_sentences(text: &str) -> Vec<Span> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (_, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }
        // Swallow runs like "?!" or "...", then closing quotes and brackets.
        let mut j = i + 1;
        while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?') {
            j += 1;
        }
        while j < chars.len() && matches!(chars[j].1, '"' | '\'' | ')' | ']' | '’' | '”') {
            j += 1;
        }
        let end = chars.get(j).map_or(text.len(), |(idx, _)| *idx);
        let at_break = j >= chars.len() || chars[j].1.is_whitespace();

        if at_break && !(c == '.' && j == i + 1 && is_non_terminal_period(text, chars[i].0, &chars[j..])) {
            push_span(text, start, end, &mut spans);
            start = end;
        }
        i = j;
    }
    push_span(text, start, text.len(), &mut spans);
    spans
}

// A lone period after an abbreviation or an initial, or one followed by a
// lowercase word, does not close the sentence.
fn is_non_terminal_period(text: &str, dot: usize, rest: &[(usize, char)]) -> bool {
    let word_start = text[..dot]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(p, c)| p + c.len_utf8());
    let word = text[word_start..dot].trim_start_matches(|c: char| !c.is_alphanumeric());
    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }
    let mut word_chars = word.chars();
    if let (Some(only), None) = (word_chars.next(), word_chars.next()) {
        if only.is_uppercase() {
            return true;
        }
    }
    rest.iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace())
        .map_or(false, |c| c.is_lowercase())
}

fn push_span(text: &str, start: usize, end: usize, spans: &mut Vec<Span>) {
    let raw = &text[start..end];
    let lead = raw.len() - raw.trim_start().len();
    let trail = raw.len() - raw.trim_end().len();
    if lead + trail < raw.len() {
        spans.push(Span {
            start: start + lead,
            end: end - trail,
        });
    }
}

/// Groups tagged tokens into noun phrases: an optional determiner, then
/// adjective/noun/numeral modifiers, closing on the last noun of the run.
pub fn noun_chunks(tokens: &[Token]) -> Vec<Span> {
    let mut chunks = Vec::new();
    let mut i = 0usize;
    while i < tokens.len() {
        let begin = i;
        let mut j = i;
        if tokens[j].pos == Pos::Determiner {
            j += 1;
        }
        let mut last_noun: Option<usize> = None;
        while j < tokens.len()
            && matches!(
                tokens[j].pos,
                Pos::Adjective | Pos::Noun | Pos::ProperNoun | Pos::Numeral
            )
        {
            if tokens[j].is_nominal() {
                last_noun = Some(j);
            }
            j += 1;
        }
        match last_noun {
            Some(end) => {
                chunks.push(Span {
                    start: tokens[begin].start,
                    end: tokens[end].end,
                });
                i = end + 1;
            }
            None => i = begin + 1,
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        RuleAnnotator::new()
            .segment(text)
            .iter()
            .map(|s| s.slice(text))
            .collect()
    }

    #[test]
    fn test_segment_basic() {
        let text = "Cats are animals. Cats are popular pets. Dogs are also popular.";
        assert_eq!(
            sentences(text),
            vec!["Cats are animals.", "Cats are popular pets.", "Dogs are also popular."]
        );
    }

    #[test]
    fn test_segment_keeps_abbreviations_and_initials() {
        let text = "Dr. Smith met J. Doe at 5 p.m. yesterday. The meeting ran long!";
        assert_eq!(
            sentences(text),
            vec!["Dr. Smith met J. Doe at 5 p.m. yesterday.", "The meeting ran long!"]
        );
    }

    #[test]
    fn test_segment_trailing_fragment_and_quotes() {
        let text = "He said \"stop.\" Then nothing happened";
        assert_eq!(sentences(text), vec!["He said \"stop.\"", "Then nothing happened"]);
    }

    #[test]
    fn test_segment_multibyte_whitespace_before_period() {
        let text = "Quarterly\u{3000}results. The board met again.";
        assert_eq!(
            sentences(text),
            vec!["Quarterly\u{3000}results.", "The board met again."]
        );
        let text = "Revenue grew in the\u{a0}north. Costs fell\u{2009}sharply. Margins held.";
        assert_eq!(sentences(text).len(), 3);
        let text = "Dr.\u{a0}Dr. Smith arrived.";
        assert_eq!(sentences(text), vec!["Dr.\u{a0}Dr. Smith arrived."]);
    }

    #[test]
    fn test_segment_empty() {
        assert!(sentences("").is_empty());
        assert!(sentences("   \n ").is_empty());
    }

    #[test]
    fn test_tag_attributes() {
        let tokens = RuleAnnotator::new().tag("The Board approved 3 budgets, didn't it?");
        let board = tokens.iter().find(|t| t.text == "Board").unwrap();
        assert_eq!(board.pos, Pos::ProperNoun);
        assert_eq!(board.lower, "board");
        assert!(board.is_alpha);

        let the = &tokens[0];
        assert!(the.is_stop);
        assert_eq!(the.pos, Pos::Determiner);

        let three = tokens.iter().find(|t| t.text == "3").unwrap();
        assert!(!three.is_alpha);
        assert_eq!(three.pos, Pos::Numeral);

        let contraction = tokens.iter().find(|t| t.text == "didn't").unwrap();
        assert!(!contraction.is_alpha);

        let comma = tokens.iter().find(|t| t.text == ",").unwrap();
        assert_eq!(comma.pos, Pos::Punctuation);
    }

    #[test]
    fn test_tag_suffix_heuristics() {
        let tokens = RuleAnnotator::new().tag("we will quickly evaluate the operational performance");
        let pos_of = |w: &str| tokens.iter().find(|t| t.text == w).unwrap().pos;
        assert_eq!(pos_of("quickly"), Pos::Adverb);
        assert_eq!(pos_of("operational"), Pos::Adjective);
        assert_eq!(pos_of("performance"), Pos::Noun);
    }

    #[test]
    fn test_noun_phrases() {
        let text = "The annual budget review covers regional growth.";
        let annotator = RuleAnnotator::new();
        let phrases: Vec<&str> = annotator
            .noun_phrases(text)
            .iter()
            .map(|s| s.slice(text))
            .collect();
        assert!(phrases.contains(&"The annual budget review"));
        assert!(phrases.contains(&"regional growth"));
    }
}

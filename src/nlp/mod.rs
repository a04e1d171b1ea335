// NLP module for Nexus: the annotator collaborator plus the pipeline stages that
// run on top of it (extractive summary, keywords, questions, chunked summaries).
pub mod abstractive;
pub mod keywords;
pub mod ner;
pub mod questions;
pub mod summarization;
pub mod tagger;

use serde::Serialize;

pub use abstractive::{summarize_chunks, OllamaSummarizer, Summarize};
pub use keywords::extract_keywords;
pub use ner::{Entity, EntityKind};
pub use questions::{build_subject_pool, synthesize_questions};
pub use summarization::{summarize_extractive, FrequencyTable, ScoredSentence};
pub use tagger::RuleAnnotator;

/// Coarse part-of-speech tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pos {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Determiner,
    Pronoun,
    Adposition,
    Conjunction,
    Auxiliary,
    Numeral,
    Punctuation,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub lower: String,
    pub is_alpha: bool,
    pub is_stop: bool,
    pub pos: Pos,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_nominal(&self) -> bool {
        matches!(self.pos, Pos::Noun | Pos::ProperNoun)
    }
}

/// Byte range into the annotated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Sentence segmentation, tagging and entity recognition over plain text.
///
/// Implementations must be deterministic and side-effect free; the pipeline
/// stages rely on identical input producing identical annotations.
pub trait Annotator: Send + Sync {
    fn segment(&self, text: &str) -> Vec<Span>;

    fn tag(&self, text: &str) -> Vec<Token>;

    fn entities(&self, text: &str) -> Vec<Entity>;

    /// Determiner + modifier runs ending in a noun, in document order.
    fn noun_phrases(&self, text: &str) -> Vec<Span> {
        tagger::noun_chunks(&self.tag(text))
    }
}

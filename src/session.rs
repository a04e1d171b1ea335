// Per-session state and the pipeline that runs against it.
//
// A `Session` owns the open document and whatever has been derived from it so
// far. A `Studio` holds the configured collaborators and runs each stage,
// filling the session's caches. Opening a differently named document drops
// every cached result.
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Result, StudioError};
use crate::nlp::abstractive::ChunkBounds;
use crate::nlp::{
    build_subject_pool, extract_keywords, summarize_chunks, summarize_extractive,
    synthesize_questions, Annotator, OllamaSummarizer, RuleAnnotator, Summarize,
};
use crate::pdf::{extract_page_range, render_report, sample_pages, PdfDocument, SampleStrategy};
use crate::text::RecursiveSplitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Extractive,
    Abstractive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub mode: SummaryMode,
    pub text: String,
    pub keywords: Vec<String>,
    /// Characters of document text the summary was computed from.
    pub source_chars: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    document: Option<PdfDocument>,
    summary: Option<Summary>,
    keywords: Option<Vec<String>>,
    questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub document: Option<String>,
    pub pages: usize,
    pub summary: Option<SummaryMode>,
    pub keywords: bool,
    pub questions: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `name` the current document. Reopening the current name keeps the
    /// document and its caches; any other name resets first, so a parse
    /// failure leaves the session empty.
    pub fn open(&mut self, name: &str, bytes: Vec<u8>) -> Result<&PdfDocument> {
        let same = self
            .document
            .as_ref()
            .map(|d| d.name() == name)
            .unwrap_or(false);
        if !same {
            self.reset();
            self.document = Some(PdfDocument::parse(name, bytes)?);
            info!(name, "opened document");
        } else {
            debug!(name, "document already open, keeping cached results");
        }
        self.document()
    }

    /// Drops the document and every derived result.
    pub fn reset(&mut self) {
        self.document = None;
        self.clear_cache();
    }

    pub fn clear_cache(&mut self) {
        self.summary = None;
        self.keywords = None;
        self.questions = None;
    }

    pub fn document(&self) -> Result<&PdfDocument> {
        self.document.as_ref().ok_or(StudioError::NoDocument)
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn keywords(&self) -> Option<&[String]> {
        self.keywords.as_deref()
    }

    pub fn questions(&self) -> Option<&[String]> {
        self.questions.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            document: self.document.as_ref().map(|d| d.name().to_string()),
            pages: self.document.as_ref().map(|d| d.page_count()).unwrap_or(0),
            summary: self.summary.as_ref().map(|s| s.mode),
            keywords: self.keywords.is_some(),
            questions: self.questions.is_some(),
        }
    }
}

pub struct Studio {
    settings: Settings,
    annotator: Box<dyn Annotator>,
    summarizer: Box<dyn Summarize>,
}

impl Studio {
    /// Rule-based annotator plus a local Ollama summarizer.
    pub fn new(settings: Settings) -> Self {
        let summarizer = OllamaSummarizer::new(settings.model.clone());
        Self::with_collaborators(settings, Box::new(RuleAnnotator::new()), Box::new(summarizer))
    }

    pub fn with_collaborators(
        settings: Settings,
        annotator: Box<dyn Annotator>,
        summarizer: Box<dyn Summarize>,
    ) -> Self {
        Self {
            settings,
            annotator,
            summarizer,
        }
    }

    fn sampled(&self, doc: &PdfDocument, strategy: SampleStrategy, budget: usize) -> String {
        let pages = sample_pages(doc.page_count(), strategy);
        let text = doc.sampled_text(&pages, budget);
        debug!(?pages, chars = text.chars().count(), "sampled document text");
        text
    }

    /// Summary plus keywords for the open document, computed once per mode.
    pub fn summarize(&self, session: &mut Session, mode: SummaryMode) -> Result<Summary> {
        if let Some(cached) = session.summary.as_ref().filter(|s| s.mode == mode) {
            return Ok(cached.clone());
        }
        let doc = session.document()?;
        let s = &self.settings;

        let (text, source) = match mode {
            SummaryMode::Extractive => {
                let source = self.sampled(doc, SampleStrategy::Triad, s.summary_char_budget);
                let text = summarize_extractive(
                    self.annotator.as_ref(),
                    &source,
                    s.min_sentence_chars,
                    s.summary_sentences,
                );
                (text, source)
            }
            SummaryMode::Abstractive => {
                let source = doc.full_text();
                let splitter = RecursiveSplitter::new(s.chunk_size, s.chunk_overlap);
                let bounds = ChunkBounds {
                    max_chunks: s.max_chunks,
                    max_length: s.chunk_max_length,
                    min_length: s.chunk_min_length,
                };
                let chunked = summarize_chunks(self.summarizer.as_ref(), &splitter, &source, bounds)?;
                (chunked.text, source)
            }
        };

        let keywords = extract_keywords(
            self.annotator.as_ref(),
            &source,
            s.keyword_char_budget,
            s.keyword_count,
            s.min_keyword_chars,
        );
        let summary = Summary {
            mode,
            text,
            keywords: keywords.clone(),
            source_chars: source.chars().count(),
        };
        info!(?mode, chars = summary.text.len(), keywords = keywords.len(), "summary ready");
        session.keywords = Some(keywords);
        session.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Keywords from the sampled first, middle and last pages.
    pub fn keywords(&self, session: &mut Session) -> Result<Vec<String>> {
        if let Some(cached) = session.keywords.as_ref() {
            return Ok(cached.clone());
        }
        let doc = session.document()?;
        let s = &self.settings;
        let source = self.sampled(doc, SampleStrategy::Triad, s.keyword_char_budget);
        let keywords = extract_keywords(
            self.annotator.as_ref(),
            &source,
            s.keyword_char_budget,
            s.keyword_count,
            s.min_keyword_chars,
        );
        session.keywords = Some(keywords.clone());
        Ok(keywords)
    }

    /// Exactly `question_count` questions drawn from five sampled pages.
    pub fn questions(&self, session: &mut Session) -> Result<Vec<String>> {
        if let Some(cached) = session.questions.as_ref() {
            return Ok(cached.clone());
        }
        let doc = session.document()?;
        let s = &self.settings;
        let source = self.sampled(doc, SampleStrategy::Quintile, s.question_char_budget);
        let pool = build_subject_pool(
            self.annotator.as_ref(),
            &source,
            s.min_entity_chars,
            s.min_phrase_chars,
        );
        debug!(subjects = pool.len(), "built subject pool");
        let questions = synthesize_questions(&pool, s.question_count);
        session.questions = Some(questions.clone());
        Ok(questions)
    }

    /// Bytes of a new PDF holding pages `start..=end` of the open document.
    pub fn split(&self, session: &Session, start: u32, end: u32) -> Result<Vec<u8>> {
        extract_page_range(session.document()?, start, end)
    }

    /// The cached summary rendered as a PDF report.
    pub fn export(&self, session: &Session) -> Result<Vec<u8>> {
        let summary = session.summary().ok_or(StudioError::NoSummary)?;
        render_report(&summary.text)
    }
}

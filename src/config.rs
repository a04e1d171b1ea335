// Runtime settings. Defaults match the interactive tool; a JSON file can override
// any subset of fields and CLI flags override the file.
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub summary_char_budget: usize,
    pub keyword_char_budget: usize,
    pub question_char_budget: usize,
    pub min_sentence_chars: usize,
    pub summary_sentences: usize,
    pub keyword_count: usize,
    pub min_keyword_chars: usize,
    pub question_count: usize,
    pub min_entity_chars: usize,
    pub min_phrase_chars: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_chunks: usize,
    pub chunk_max_length: usize,
    pub chunk_min_length: usize,
    /// Ollama model override (e.g. gemma3:4b). When unset the model is probed.
    pub model: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summary_char_budget: 15_000,
            keyword_char_budget: 10_000,
            question_char_budget: 20_000,
            min_sentence_chars: 30,
            summary_sentences: 5,
            keyword_count: 8,
            min_keyword_chars: 5,
            question_count: 10,
            min_entity_chars: 4,
            min_phrase_chars: 6,
            chunk_size: 2800,
            chunk_overlap: 300,
            max_chunks: 10,
            chunk_max_length: 150,
            chunk_min_length: 50,
            model: None,
        }
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let settings: Settings = serde_json::from_reader(f)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(settings)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

// Chunked abstractive summarization through a local Ollama model.
use std::process::Command;

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{Result, StudioError};
use crate::text::RecursiveSplitter;

const DEFAULT_MODEL: &str = "mistral";

/// A bounded-length summarization model.
pub trait Summarize: Send + Sync {
    fn summarize(&self, chunk: &str, max_length: usize, min_length: usize) -> Result<String>;
}

/// Runs `ollama run <model> <prompt>` once per chunk. The model is resolved on
/// first use and reused for the lifetime of the value.
pub struct OllamaSummarizer {
    model_override: Option<String>,
    model: OnceCell<String>,
}

impl OllamaSummarizer {
    pub fn new(model_override: Option<String>) -> Self {
        Self {
            model_override,
            model: OnceCell::new(),
        }
    }

    pub fn model(&self) -> &str {
        self.model
            .get_or_init(|| resolve_model(self.model_override.clone()))
    }
}

impl Summarize for OllamaSummarizer {
    fn summarize(&self, chunk: &str, max_length: usize, min_length: usize) -> Result<String> {
        let model = self.model();
        let prompt = format!(
            "Summarize the following text in {min_length} to {max_length} words. \
             Reply with the summary only, without preamble.\n\n{chunk}"
        );
        let output = Command::new("ollama")
            .arg("run")
            .arg(model)
            .arg(&prompt)
            .output()
            .map_err(|e| StudioError::Summarizer(format!("failed to invoke ollama: {e}")))?;
        if !output.status.success() {
            let serr = String::from_utf8_lossy(&output.stderr);
            return Err(StudioError::Summarizer(format!(
                "ollama run failed ({model}): {}",
                serr.trim()
            )));
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(StudioError::Summarizer(format!("{model} returned no text")));
        }
        Ok(text)
    }
}

// Flag, then OLLAMA_MODEL, then the smallest installed model, then the default.
fn resolve_model(model_override: Option<String>) -> String {
    if let Some(m) = model_override {
        return m;
    }
    if let Ok(m) = std::env::var("OLLAMA_MODEL") {
        return m;
    }
    let probed = Command::new("ollama")
        .arg("list")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| smallest_model(&String::from_utf8_lossy(&out.stdout)));
    match probed {
        Some(m) => {
            info!(model = %m, "using smallest installed ollama model");
            m
        }
        None => String::from(DEFAULT_MODEL),
    }
}

/// Picks the smallest model from `ollama list` output.
/// Lines look like: NAME  ID  SIZE UNIT  MODIFIED
pub fn smallest_model(listing: &str) -> Option<String> {
    let mut best: Option<(String, f32)> = None;
    for line in listing.lines() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 3 {
            continue;
        }
        let size = cols.windows(2).skip(1).find_map(|pair| {
            let v = pair[0].parse::<f32>().ok()?;
            let bytes = match pair[1].to_uppercase().as_str() {
                "GB" => v * 1024.0 * 1024.0 * 1024.0,
                "MB" => v * 1024.0 * 1024.0,
                "KB" => v * 1024.0,
                _ => v,
            };
            Some(bytes)
        });
        if let Some(sz) = size {
            match &best {
                Some((_, bsz)) if *bsz <= sz => {}
                _ => best = Some((cols[0].to_string(), sz)),
            }
        }
    }
    best.map(|(name, _)| name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedSummary {
    pub text: String,
    pub sections: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkBounds {
    pub max_chunks: usize,
    pub max_length: usize,
    pub min_length: usize,
}

/// Summarizes up to `max_chunks` chunks of `text`, labelling each result
/// "Section N:" and separating sections with a blank line. Failed chunks are
/// skipped; an error is returned only when every attempted chunk failed.
pub fn summarize_chunks(
    summarizer: &dyn Summarize,
    splitter: &RecursiveSplitter,
    text: &str,
    bounds: ChunkBounds,
) -> Result<ChunkedSummary> {
    let chunks = splitter.split(text);
    let attempted = chunks.len().min(bounds.max_chunks);
    debug!(chunks = chunks.len(), attempted, "summarizing chunks");

    let mut sections = Vec::new();
    for (i, chunk) in chunks.iter().take(attempted).enumerate() {
        match summarizer.summarize(chunk, bounds.max_length, bounds.min_length) {
            Ok(s) => sections.push(format!("Section {}: {}", i + 1, s)),
            Err(e) => warn!(section = i + 1, error = %e, "skipping section"),
        }
    }

    if attempted > 0 && sections.is_empty() {
        return Err(StudioError::SummarizerUnavailable(attempted));
    }
    Ok(ChunkedSummary {
        sections: sections.len(),
        skipped: attempted - sections.len(),
        text: sections.join("\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FakeSummarizer {
        calls: Mutex<Vec<(usize, usize)>>,
    }

    impl FakeSummarizer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Summarize for FakeSummarizer {
        fn summarize(&self, chunk: &str, max_length: usize, min_length: usize) -> Result<String> {
            self.calls.lock().push((max_length, min_length));
            if chunk.contains("FAIL") {
                return Err(StudioError::Summarizer("boom".into()));
            }
            Ok(format!("<{}>", chunk.split_whitespace().next().unwrap_or("")))
        }
    }

    const BOUNDS: ChunkBounds = ChunkBounds {
        max_chunks: 10,
        max_length: 150,
        min_length: 50,
    };

    #[test]
    fn test_sections_labelled_in_order() {
        let fake = FakeSummarizer::new();
        let splitter = RecursiveSplitter::new(12, 0);
        let result = summarize_chunks(&fake, &splitter, "alpha one\n\nbeta two", BOUNDS).unwrap();
        assert_eq!(result.text, "Section 1: <alpha>\n\nSection 2: <beta>");
        assert_eq!(result.sections, 2);
        assert_eq!(result.skipped, 0);
        assert!(fake.calls.lock().iter().all(|&c| c == (150, 50)));
    }

    #[test]
    fn test_failed_chunk_is_skipped() {
        let fake = FakeSummarizer::new();
        let splitter = RecursiveSplitter::new(12, 0);
        let result =
            summarize_chunks(&fake, &splitter, "alpha one\n\nFAIL two\n\ngamma", BOUNDS).unwrap();
        assert_eq!(result.text, "Section 1: <alpha>\n\nSection 3: <gamma>");
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_all_chunks_failing_is_reported() {
        let fake = FakeSummarizer::new();
        let splitter = RecursiveSplitter::new(100, 0);
        let result = summarize_chunks(&fake, &splitter, "FAIL everything", BOUNDS);
        assert!(matches!(result, Err(StudioError::SummarizerUnavailable(1))));
    }

    #[test]
    fn test_chunk_limit() {
        let fake = FakeSummarizer::new();
        let splitter = RecursiveSplitter::new(3, 0);
        let bounds = ChunkBounds { max_chunks: 2, ..BOUNDS };
        let result = summarize_chunks(&fake, &splitter, "a b c d e f g h", bounds).unwrap();
        assert_eq!(result.sections, 2);
        assert_eq!(fake.calls.lock().len(), 2);
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let fake = FakeSummarizer::new();
        let splitter = RecursiveSplitter::new(100, 0);
        let result = summarize_chunks(&fake, &splitter, "", BOUNDS).unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.sections, 0);
    }

    #[test]
    fn test_smallest_model() {
        let listing = "NAME            ID              SIZE      MODIFIED\n\
                       mistral:latest  f974a74358d6    4.1 GB    2 weeks ago\n\
                       gemma3:1b       8648f39daa8f    815 MB    3 days ago\n\
                       llama3:8b       365c0bd3c000    4.7 GB    1 month ago\n";
        assert_eq!(smallest_model(listing).as_deref(), Some("gemma3:1b"));
    }

    #[test]
    fn test_smallest_model_empty_listing() {
        assert_eq!(smallest_model(""), None);
        assert_eq!(smallest_model("NAME ID SIZE MODIFIED"), None);
    }

    #[test]
    fn test_override_wins() {
        let summarizer = OllamaSummarizer::new(Some("gemma3:4b".into()));
        assert_eq!(summarizer.model(), "gemma3:4b");
    }
}

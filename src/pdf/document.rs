// Parsed PDF with lazily extracted, cached page text.
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use once_cell::unsync::OnceCell;
use tracing::{debug, warn};

use crate::error::{Result, StudioError};
use crate::text::normalize_pages;

#[derive(Debug)]
struct Page {
    /// 1-based page number as lopdf counts it.
    number: u32,
    text: OnceCell<String>,
}

#[derive(Debug)]
pub struct PdfDocument {
    name: String,
    raw: Vec<u8>,
    inner: lopdf::Document,
    pages: Vec<Page>,
}

impl PdfDocument {
    /// Parses `bytes`; fails on structurally broken files and on zero pages.
    pub fn parse(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let inner = lopdf::Document::load_mem(&bytes)?;
        let pages: Vec<Page> = inner
            .get_pages()
            .keys()
            .map(|&number| Page {
                number,
                text: OnceCell::new(),
            })
            .collect();
        if pages.is_empty() {
            return Err(StudioError::EmptyDocument);
        }
        debug!(name = %name, pages = pages.len(), "parsed pdf");
        Ok(Self {
            name,
            raw: bytes,
            inner,
            pages,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Text of the 0-based page `index`, extracted on first access. Pages
    /// without a text layer (or with unreadable content) yield "".
    pub fn page_text(&self, index: usize) -> Option<&str> {
        let page = self.pages.get(index)?;
        let text = page.text.get_or_init(|| {
            match self.inner.extract_text(&[page.number]) {
                Ok(t) => t,
                Err(e) => {
                    warn!(page = page.number, error = %e, "no text extracted");
                    String::new()
                }
            }
        });
        Some(text.as_str())
    }

    /// Normalized text of the given 0-based pages, capped at `budget` chars.
    pub fn sampled_text(&self, indices: &[usize], budget: usize) -> String {
        normalize_pages(indices.iter().map(|&i| self.page_text(i)), budget)
    }

    /// Every page's text in order. Falls back to pdf-extract when the page
    /// extractor finds no text anywhere.
    pub fn full_text(&self) -> String {
        let joined = (0..self.page_count())
            .filter_map(|i| self.page_text(i))
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.trim().is_empty() {
            return joined;
        }
        // pdf-extract panics on some malformed fonts.
        match panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&self.raw)
        })) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(error = %e, "fallback extraction failed");
                String::new()
            }
            Err(_) => {
                warn!("fallback extraction panicked");
                String::new()
            }
        }
    }
}

//! Nexus Studio: local PDF document intelligence.
//!
//! Page sampling, whitespace normalisation, a frequency-ranked extractive
//! summarizer, keyword and question extraction, chunked abstractive summaries
//! through Ollama, page-range splitting and plain PDF report export.
pub mod config;
pub mod digest;
pub mod error;
pub mod nlp;
pub mod pdf;
pub mod session;
pub mod shell;
pub mod text;
pub mod ui;

pub use config::Settings;
pub use error::{Result, StudioError};
pub use pdf::PdfDocument;
pub use session::{Session, Studio, Summary, SummaryMode};

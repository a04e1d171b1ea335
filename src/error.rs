// Library error type. Every message is short enough to show to the user as-is.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudioError>;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Error reading PDF structure: {0}")]
    Parse(String),

    #[error("The PDF has no pages")]
    EmptyDocument,

    #[error("No document is open")]
    NoDocument,

    #[error("Nothing to export yet; run a summary first")]
    NoSummary,

    #[error("Split failed: pages {start}-{end} are not a valid range for a {total}-page document")]
    InvalidPageRange { start: u32, end: u32, total: u32 },

    #[error("Split failed: {0}")]
    Split(String),

    #[error("Report export failed: {0}")]
    Export(String),

    #[error("Summarization failed for all {0} sections")]
    SummarizerUnavailable(usize),

    #[error("Summarizer error: {0}")]
    Summarizer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for StudioError {
    fn from(e: lopdf::Error) -> Self {
        StudioError::Parse(e.to_string())
    }
}

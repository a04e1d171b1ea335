pub mod document;
pub mod report;
pub mod sampler;
pub mod split;

pub use document::PdfDocument;
pub use report::{clean_text, render_pages, render_report, DEFAULT_REPORT_NAME};
pub use sampler::{sample_pages, SampleStrategy};
pub use split::{extract_page_range, validate_range};

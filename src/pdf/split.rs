// Page-range extraction into a new standalone PDF.
use tracing::info;

use super::PdfDocument;
use crate::error::{Result, StudioError};

/// Checks that `start..=end` is a valid 1-based range for a `total`-page
/// document.
pub fn validate_range(start: u32, end: u32, total: usize) -> Result<()> {
    let total_u32 = u32::try_from(total).unwrap_or(u32::MAX);
    if start < 1 || end < start || end > total_u32 {
        return Err(StudioError::InvalidPageRange {
            start,
            end,
            total: total_u32,
        });
    }
    Ok(())
}

/// Copies pages `start..=end` (1-based, inclusive) into a new PDF and
/// returns its bytes. Nothing is produced when the range is invalid.
pub fn extract_page_range(doc: &PdfDocument, start: u32, end: u32) -> Result<Vec<u8>> {
    validate_range(start, end, doc.page_count())?;

    let mut out = doc.inner().clone();
    let outside: Vec<u32> = out
        .get_pages()
        .keys()
        .copied()
        .filter(|n| *n < start || *n > end)
        .collect();
    out.delete_pages(&outside);
    out.prune_objects();

    let mut buf = Vec::new();
    out.save_to(&mut buf)
        .map_err(|e| StudioError::Split(e.to_string()))?;
    info!(
        source = doc.name(),
        start,
        end,
        bytes = buf.len(),
        "extracted page range"
    );
    Ok(buf)
}

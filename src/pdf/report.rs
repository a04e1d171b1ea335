// Plain-text PDF report writer (A4, Helvetica 10pt, WinAnsi).
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::{Result, StudioError};

pub const DEFAULT_REPORT_NAME: &str = "Nexus_Report.pdf";

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;
// Helvetica averages about half an em per glyph.
const WRAP_COLUMNS: usize = 95;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Maps `text` into printable Latin-1: typographic punctuation is
/// transliterated, everything else outside the range becomes `?`.
pub fn clean_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2022}' => out.push('*'),
            '\u{2026}' => out.push_str("..."),
            '\n' => out.push('\n'),
            '\t' => out.push(' '),
            '\r' => {}
            ' '..='~' | '\u{A0}'..='\u{FF}' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap; words wider than a line are broken across lines.
fn wrap(paragraph: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    for word in paragraph.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(columns) {
            let piece: String = piece.iter().collect();
            let len = piece.chars().count();
            if width > 0 && width + 1 + len > columns {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            current.push_str(&piece);
            width += len;
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Renders `text` as a paginated report. Blank lines in the input are kept.
pub fn render_report(text: &str) -> Result<Vec<u8>> {
    let cleaned = clean_text(text);
    let lines: Vec<String> = cleaned
        .split('\n')
        .flat_map(|p| wrap(p, WRAP_COLUMNS))
        .collect();
    let pages: Vec<Vec<String>> = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.to_vec())
        .collect();
    render_pages(&pages)
}

/// Writes one page per entry, one text line per string. Lines are expected
/// to be short enough for the page; they are cleaned but not wrapped.
pub fn render_pages(pages: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let empty = [Vec::new()];
    let pages = if pages.is_empty() { &empty[..] } else { pages };

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for lines in pages {
        let page_id = add_page(&mut doc, pages_id, resources_id, lines)?;
        kids.push(page_id.into());
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Nexus Report"),
        "Producer" => Object::string_literal(concat!("nexus-studio ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| StudioError::Export(e.to_string()))?;
    debug!(pages = count, bytes = buf.len(), "rendered report");
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    lines: &[String],
) -> Result<ObjectId> {
    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let encoded = latin1_bytes(&clean_text(line));
        if encoded.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }
        let y = PAGE_HEIGHT - MARGIN - FONT_SIZE - (i as i64) * LEADING;
        // One text object per line so extractors see a line break.
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), Object::Integer(FONT_SIZE)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Integer(MARGIN), Object::Integer(y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encoded, StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations }
        .encode()
        .map_err(|e| StudioError::Export(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    }))
}

// Input is already clean, so every char fits in one byte.
fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfDocument;

    #[test]
    fn test_clean_text_transliterates() {
        assert_eq!(
            clean_text("\u{201C}Growth\u{201D} \u{2013} it\u{2019}s here\u{2026}"),
            "\"Growth\" - it's here..."
        );
        assert_eq!(clean_text("\u{2022} item"), "* item");
    }

    #[test]
    fn test_clean_text_replaces_outside_latin1() {
        assert_eq!(clean_text("caf\u{e9} \u{4e2d}\u{6587} \u{1F600}"), "caf\u{e9} ?? ?");
        assert_eq!(clean_text("a\tb\r\nc"), "a b\nc");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn test_report_round_trips_text() {
        let bytes = render_report("Section 1: revenue grew.\n\nSection 2: costs fell.").unwrap();
        let doc = PdfDocument::parse("report.pdf", bytes).unwrap();
        assert_eq!(doc.page_count(), 1);
        let text = doc.page_text(0).unwrap();
        assert!(text.contains("Section 1: revenue grew."));
        assert!(text.contains("Section 2: costs fell."));
    }

    #[test]
    fn test_long_report_paginates() {
        let text = (0..150).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let doc = PdfDocument::parse("long.pdf", render_report(&text).unwrap()).unwrap();
        assert_eq!(doc.page_count(), 150usize.div_ceil(LINES_PER_PAGE));
        assert!(doc.page_text(doc.page_count() - 1).unwrap().contains("line 149"));
    }

    #[test]
    fn test_empty_report_has_one_page() {
        let doc = PdfDocument::parse("empty.pdf", render_report("").unwrap()).unwrap();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_non_latin1_export_does_not_fail() {
        assert!(render_report("\u{4e2d}\u{6587} summary \u{2014} ok").is_ok());
    }
}

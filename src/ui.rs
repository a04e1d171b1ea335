// Coloured status lines and result printing shared by the CLI and the shell.
use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::session::Summary;

fn status<W: WriteColor>(out: &mut W, color: Color, label: &str, msg: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    writeln!(out, " {msg}")
}

pub fn error<W: WriteColor>(out: &mut W, msg: &str) -> io::Result<()> {
    status(out, Color::Red, "error:", msg)
}

pub fn notice<W: WriteColor>(out: &mut W, msg: &str) -> io::Result<()> {
    status(out, Color::Yellow, "note:", msg)
}

pub fn success<W: WriteColor>(out: &mut W, msg: &str) -> io::Result<()> {
    status(out, Color::Green, "done:", msg)
}

fn heading<W: WriteColor>(out: &mut W, title: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{title}")?;
    out.reset()
}

pub fn print_summary<W: WriteColor>(out: &mut W, summary: &Summary) -> io::Result<()> {
    if summary.source_chars == 0 {
        return notice(out, "No extractable text found; nothing to summarize.");
    }
    heading(out, "Summary")?;
    if summary.text.is_empty() {
        notice(out, "No sentence was long enough to rank.")?;
    } else {
        writeln!(out, "{}", summary.text)?;
    }
    writeln!(out)?;
    print_keywords(out, &summary.keywords)
}

pub fn print_keywords<W: WriteColor>(out: &mut W, keywords: &[String]) -> io::Result<()> {
    heading(out, "Key themes")?;
    if keywords.is_empty() {
        writeln!(out, "(none)")
    } else {
        writeln!(out, "{}", keywords.join(", "))
    }
}

pub fn print_questions<W: WriteColor>(out: &mut W, questions: &[String]) -> io::Result<()> {
    heading(out, "Questions")?;
    for (i, q) in questions.iter().enumerate() {
        writeln!(out, "{:>2}. {}", i + 1, q)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SummaryMode;
    use termcolor::NoColor;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>,
    {
        let mut out = NoColor::new(Vec::new());
        f(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(render(|o| error(o, "bad range")), "error: bad range\n");
        assert_eq!(render(|o| success(o, "wrote out.pdf")), "done: wrote out.pdf\n");
    }

    #[test]
    fn test_questions_are_numbered() {
        let qs = vec!["Why?".to_string(), "How?".to_string()];
        assert_eq!(render(|o| print_questions(o, &qs)), "Questions\n 1. Why?\n 2. How?\n");
    }

    #[test]
    fn test_textless_summary_prints_notice() {
        let summary = Summary {
            mode: SummaryMode::Extractive,
            text: String::new(),
            keywords: Vec::new(),
            source_chars: 0,
        };
        let text = render(|o| print_summary(o, &summary));
        assert!(text.starts_with("note: No extractable text"));
    }
}

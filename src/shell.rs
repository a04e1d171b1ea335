// Interactive shell: one session, one command per line.
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use termcolor::WriteColor;

use crate::pdf::DEFAULT_REPORT_NAME;
use crate::session::{Session, Studio, SummaryMode};
use crate::ui;

pub const HELP: &str = "\
commands:
  open <path>                 load a PDF (a new name clears cached results)
  summary [abstractive]       summary and key themes
  keywords                    key themes only
  questions                   exploratory questions
  split <start> <end> <out>   write pages start..=end (1-based) to <out>
  export [out]                write the last summary as a PDF report
  reset                       close the document and clear results
  status                      show what is loaded and cached
  help                        this text
  quit                        leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Summary(SummaryMode),
    Keywords,
    Questions,
    Split { start: u32, end: u32, out: PathBuf },
    Export(PathBuf),
    Reset,
    Status,
    Help,
    Quit,
}

/// Parses one input line; blank lines give `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let name = match words.next() {
        Some(n) => n.to_lowercase(),
        None => return Ok(None),
    };
    let args: Vec<&str> = words.collect();

    let cmd = match (name.as_str(), args.as_slice()) {
        ("open", [path]) => Command::Open(PathBuf::from(path)),
        ("open", _) => bail!("usage: open <path>"),
        ("summary", []) => Command::Summary(SummaryMode::Extractive),
        ("summary", ["abstractive"]) => Command::Summary(SummaryMode::Abstractive),
        ("summary", _) => bail!("usage: summary [abstractive]"),
        ("keywords", []) => Command::Keywords,
        ("questions", []) => Command::Questions,
        ("split", [start, end, out]) => Command::Split {
            start: parse_page(start)?,
            end: parse_page(end)?,
            out: PathBuf::from(out),
        },
        ("split", _) => bail!("usage: split <start> <end> <out>"),
        ("export", []) => Command::Export(PathBuf::from(DEFAULT_REPORT_NAME)),
        ("export", [out]) => Command::Export(PathBuf::from(out)),
        ("reset", []) => Command::Reset,
        ("status", []) => Command::Status,
        ("help", _) | ("?", _) => Command::Help,
        ("quit", _) | ("exit", _) => Command::Quit,
        _ => bail!("unknown command '{}'; type 'help'", line.trim()),
    };
    Ok(Some(cmd))
}

fn parse_page(s: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|_| anyhow!("'{s}' is not a page number"))
}

pub struct Shell<'a> {
    studio: &'a Studio,
    session: Session,
}

impl<'a> Shell<'a> {
    pub fn new(studio: &'a Studio) -> Self {
        Self {
            studio,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reads commands until `quit` or end of input. Only I/O failures on
    /// `input`/`out` end the loop early; command failures are printed.
    pub fn run<R: BufRead, W: WriteColor>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        write!(out, "nexus> ")?;
        out.flush()?;
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(cmd)) => self.execute(cmd, out)?,
                Err(e) => ui::error(out, &e.to_string())?,
            }
            write!(out, "nexus> ")?;
            out.flush()?;
        }
        writeln!(out)
    }

    pub fn execute<W: WriteColor>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match self.dispatch(cmd, out) {
            Ok(()) => Ok(()),
            Err(e) => ui::error(out, &format!("{e:#}")),
        }
    }

    fn dispatch<W: WriteColor>(&mut self, cmd: Command, out: &mut W) -> Result<()> {
        match cmd {
            Command::Open(path) => {
                let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let pages = self.session.open(&name, bytes)?.page_count();
                ui::success(out, &format!("opened {name} ({pages} pages)"))?;
            }
            Command::Summary(mode) => {
                let summary = self.studio.summarize(&mut self.session, mode)?;
                ui::print_summary(out, &summary)?;
            }
            Command::Keywords => {
                let keywords = self.studio.keywords(&mut self.session)?;
                ui::print_keywords(out, &keywords)?;
            }
            Command::Questions => {
                let questions = self.studio.questions(&mut self.session)?;
                ui::print_questions(out, &questions)?;
            }
            Command::Split { start, end, out: path } => {
                let bytes = self.studio.split(&self.session, start, end)?;
                fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
                ui::success(out, &format!("pages {start}-{end} written to {}", path.display()))?;
            }
            Command::Export(path) => {
                let bytes = self.studio.export(&self.session)?;
                fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
                ui::success(out, &format!("report written to {}", path.display()))?;
            }
            Command::Reset => {
                self.session.reset();
                ui::success(out, "session cleared")?;
            }
            Command::Status => {
                let status = self.session.status();
                match status.document {
                    Some(name) => writeln!(out, "document: {name} ({} pages)", status.pages)?,
                    None => writeln!(out, "document: none")?,
                }
                let summary = match status.summary {
                    Some(SummaryMode::Extractive) => "extractive",
                    Some(SummaryMode::Abstractive) => "abstractive",
                    None => "none",
                };
                writeln!(
                    out,
                    "summary: {summary}, keywords: {}, questions: {}",
                    if status.keywords { "cached" } else { "none" },
                    if status.questions { "cached" } else { "none" },
                )?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => {}
        }
        Ok(())
    }
}

// nexus: command-line front end for the document pipeline.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use nexus_studio::pdf::DEFAULT_REPORT_NAME;
use nexus_studio::shell::{Shell, HELP};
use nexus_studio::{digest, ui, Session, Settings, Studio, SummaryMode};

#[derive(Parser)]
#[command(
    name = "nexus",
    version,
    about = "Local PDF intelligence: summaries, key themes, questions and page splits"
)]
struct Cli {
    /// JSON settings file; flags below override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging for this crate (otherwise RUST_LOG, default warn).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary and key themes of one PDF.
    Summarize {
        file: PathBuf,
        /// Chunked summary through a local Ollama model instead of sentence ranking.
        #[arg(short, long)]
        abstractive: bool,
        /// Also write the summary as a PDF report.
        #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_REPORT_NAME)]
        report: Option<PathBuf>,
        /// Sentences in the extractive summary.
        #[arg(short = 'k', long)]
        sentences: Option<usize>,
        /// Optional Ollama model override (e.g. gemma3:4b). If omitted the app will probe for a fast model.
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
    },
    /// Key themes only.
    Keywords {
        file: PathBuf,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Exploratory questions about one PDF.
    Questions {
        file: PathBuf,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Copy pages start..=end (1-based) into a new PDF.
    Split {
        file: PathBuf,
        #[arg(short, long)]
        start: u32,
        #[arg(short, long)]
        end: u32,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Summarize every PDF under a directory into a JSON report.
    Digest {
        #[arg(short, long)]
        dir: PathBuf,
        #[arg(short, long, default_value = "nexus_digest.json")]
        out: PathBuf,
    },
    /// Interactive session.
    Shell {
        #[arg(short = 'm', long = "model")]
        model: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("nexus_studio=debug,nexus=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_session(file: &Path) -> Result<Session> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let name = file
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());
    let mut session = Session::new();
    session.open(&name, bytes)?;
    Ok(session)
}

fn run(cli: Cli, stdout: &mut StandardStream, stderr: &mut StandardStream) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Summarize {
            file,
            abstractive,
            report,
            sentences,
            model,
        } => {
            if let Some(k) = sentences {
                settings.summary_sentences = k;
            }
            if model.is_some() {
                settings.model = model;
            }
            let studio = Studio::new(settings);
            let mut session = open_session(&file)?;
            let mode = if abstractive {
                SummaryMode::Abstractive
            } else {
                SummaryMode::Extractive
            };
            let summary = studio.summarize(&mut session, mode)?;
            ui::print_summary(stdout, &summary)?;
            if let Some(path) = report {
                let bytes = studio.export(&session)?;
                fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
                ui::success(stderr, &format!("report written to {}", path.display()))?;
            }
        }
        Commands::Keywords { file, count } => {
            if let Some(n) = count {
                settings.keyword_count = n;
            }
            let studio = Studio::new(settings);
            let mut session = open_session(&file)?;
            let keywords = studio.keywords(&mut session)?;
            ui::print_keywords(stdout, &keywords)?;
        }
        Commands::Questions { file, count } => {
            if let Some(n) = count {
                settings.question_count = n;
            }
            let studio = Studio::new(settings);
            let mut session = open_session(&file)?;
            let questions = studio.questions(&mut session)?;
            ui::print_questions(stdout, &questions)?;
        }
        Commands::Split {
            file,
            start,
            end,
            out,
        } => {
            let studio = Studio::new(settings);
            let session = open_session(&file)?;
            let bytes = studio.split(&session, start, end)?;
            fs::write(&out, bytes).with_context(|| format!("writing {}", out.display()))?;
            ui::success(
                stderr,
                &format!("pages {start}-{end} written to {}", out.display()),
            )?;
        }
        Commands::Digest { dir, out } => {
            let studio = Studio::new(settings);
            let report = digest::digest_dir(&studio, &dir, true)?;
            digest::write_report(&report, &out)?;
            for failure in &report.failures {
                ui::notice(stderr, &format!("{}: {}", failure.path, failure.error))?;
            }
            ui::success(
                stderr,
                &format!(
                    "{} documents digested, {} failed; wrote {}",
                    report.documents.len(),
                    report.failures.len(),
                    out.display()
                ),
            )?;
        }
        Commands::Shell { model } => {
            if model.is_some() {
                settings.model = model;
            }
            let studio = Studio::new(settings);
            writeln!(stdout, "{HELP}")?;
            let stdin = io::stdin();
            Shell::new(&studio).run(stdin.lock(), stdout)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    match run(cli, &mut stdout, &mut stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = ui::error(&mut stderr, &format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_flag_default_name() {
        let cli = Cli::try_parse_from(["nexus", "summarize", "doc.pdf", "--report"]).unwrap();
        match cli.command {
            Commands::Summarize { report, abstractive, .. } => {
                assert_eq!(report, Some(PathBuf::from(DEFAULT_REPORT_NAME)));
                assert!(!abstractive);
            }
            _ => panic!("expected summarize"),
        }
    }

    #[test]
    fn test_split_flags() {
        let cli = Cli::try_parse_from([
            "nexus", "split", "doc.pdf", "-s", "2", "-e", "4", "-o", "part.pdf",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Split { start: 2, end: 4, .. }
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nexus", "keywords", "doc.pdf", "-v", "-n", "3"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Keywords { count: Some(3), .. }));
    }

    #[test]
    fn test_open_session_missing_file() {
        let result = open_session(Path::new("/nonexistent/doc.pdf"));
        assert!(result.is_err());
    }
}

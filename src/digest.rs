// Directory digest: extractive summary + keywords for every PDF under a
// directory, in parallel, written out as one JSON report.
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::session::{Session, Studio, SummaryMode};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DigestEntry {
    pub path: String,
    pub pages: usize,
    pub summary: String,
    pub keywords: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DigestFailure {
    pub path: String,
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct DigestReport {
    pub root: String,
    pub documents: Vec<DigestEntry>,
    pub failures: Vec<DigestFailure>,
}

/// `.pdf` files under `dir` (any case), sorted by path.
pub fn collect_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn digest_file(studio: &Studio, path: &Path) -> crate::error::Result<DigestEntry> {
    let bytes = fs::read(path)?;
    let name = path.to_string_lossy().to_string();
    let mut session = Session::new();
    let pages = session.open(&name, bytes)?.page_count();
    let summary = studio.summarize(&mut session, SummaryMode::Extractive)?;
    Ok(DigestEntry {
        path: name,
        pages,
        summary: summary.text,
        keywords: summary.keywords,
    })
}

/// Digests every PDF under `dir`. A file that cannot be processed is
/// recorded under `failures` and does not stop the others.
pub fn digest_dir(studio: &Studio, dir: &Path, show_progress: bool) -> Result<DigestReport> {
    let files = collect_pdfs(dir);
    info!(dir = %dir.display(), files = files.len(), "digesting directory");

    let pb = if show_progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let failures: Mutex<Vec<DigestFailure>> = Mutex::new(Vec::new());
    let documents: Vec<DigestEntry> = files
        .par_iter()
        .filter_map(|p| {
            let result = digest_file(studio, p);
            pb.inc(1);
            match result {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(path = %p.display(), error = %e, "skipping file");
                    failures.lock().push(DigestFailure {
                        path: p.to_string_lossy().to_string(),
                        error: e.to_string(),
                    });
                    None
                }
            }
        })
        .collect();
    pb.finish_with_message("digest complete");

    let mut failures = failures.into_inner();
    failures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(DigestReport {
        root: dir.to_string_lossy().to_string(),
        documents,
        failures,
    })
}

pub fn write_report(report: &DigestReport, out: &Path) -> Result<()> {
    let fout = File::create(out)?;
    serde_json::to_writer_pretty(fout, report)?;
    Ok(())
}

//! Feeding documents from disk through a compiled query.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use jwalk::WalkDir;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{Diagnostic, JqlError, Result};
use crate::value::Value;
use crate::Query;

/// Outcome of a run over a set of files.
#[derive(Debug, Default)]
pub struct Report {
    /// Matching files, sorted by path.
    pub matched: Vec<PathBuf>,
    /// Files that could not be read or decoded.
    pub skipped: usize,
    pub evaluated: usize,
    pub diagnostics: Vec<(PathBuf, Diagnostic)>,
}

/// Lists candidate files under `root`.
///
/// A file root is returned as is. A directory yields its files, and with
/// `recursive` the files of every directory below it.
pub fn discover(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(root).map_err(|source| JqlError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort(true).max_depth(depth) {
        match entry {
            Ok(e) if e.file_type().is_file() => files.push(e.path()),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "skipping unreadable directory entry"),
        }
    }
    debug!(count = files.len(), root = %root.display(), "discovered files");
    Ok(files.into_iter().sorted().collect())
}

/// Reads and decodes one JSON document.
///
/// Files that are not UTF-8 are read as single-byte Latin-1 text instead.
pub fn load_document(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path).map_err(|source| JqlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), "not UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    };
    let json: serde_json::Value = serde_json::from_str(&text).map_err(|source| JqlError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Value::from(json))
}

/// Evaluates `query` against every file.
///
/// Unreadable and non-JSON files are skipped. A query whose root is not a
/// boolean stops the run, since it would fail the same way on every file.
pub fn run(query: &Query, files: &[PathBuf]) -> Result<Report> {
    let mut report = Report::default();
    for path in files {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("skipping {e}");
                report.skipped += 1;
                continue;
            }
        };
        let verdict = query.evaluate(&doc)?;
        report.evaluated += 1;
        debug!(path = %path.display(), matched = verdict.matched, "evaluated");
        if verdict.matched {
            report.matched.push(path.clone());
        }
        report
            .diagnostics
            .extend(verdict.diagnostics.into_iter().map(|d| (path.clone(), d)));
    }
    report.matched.sort();
    info!(
        evaluated = report.evaluated,
        matched = report.matched.len(),
        skipped = report.skipped,
        "run complete"
    );
    Ok(report)
}

/// Pretty-printed JSON for `--explain` and `--json` output.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(JqlError::Output)
}

//! File-backed analyzers.
//!
//! The CLI has no analysis service to call. Instead definitions are read
//! from disk: either a catalog directory holding one file per word, or a
//! single file that answers every word.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use etymon::{
    analyze::{AnalyzeOutcome, Analyzer},
    parse_definition,
};

/// Answers words from a directory of definition files.
///
/// For a word `w` (lowercased), `w.json` is a complete answer and
/// `w.degraded.json` a degraded one. A word with neither file fails.
#[derive(Debug, Clone)]
pub struct CatalogAnalyzer {
    dir: PathBuf,
}

impl CatalogAnalyzer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Analyzer for CatalogAnalyzer {
    fn analyze(&mut self, word: &str, force_update: bool) -> AnalyzeOutcome {
        let stem = word.trim().to_lowercase();
        if force_update {
            debug!(word = stem.as_str(); "Catalog entries are fixed, answering a forced update from disk");
        }

        let complete = self.dir.join(format!("{stem}.json"));
        if complete.is_file() {
            return read_outcome(&complete, false);
        }

        let degraded = self.dir.join(format!("{stem}.degraded.json"));
        if degraded.is_file() {
            return read_outcome(&degraded, true);
        }

        info!(word = stem.as_str(), dir = self.dir.display().to_string(); "Word not in catalog");
        AnalyzeOutcome::failed(format!("no catalog entry for `{stem}`"))
    }
}

/// Answers every word with the definition stored in one file.
#[derive(Debug, Clone)]
pub struct FileAnalyzer {
    path: PathBuf,
}

impl FileAnalyzer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Analyzer for FileAnalyzer {
    fn analyze(&mut self, _word: &str, _force_update: bool) -> AnalyzeOutcome {
        read_outcome(&self.path, false)
    }
}

fn read_outcome(path: &Path, degraded: bool) -> AnalyzeOutcome {
    debug!(path = path.display().to_string(), degraded; "Reading definition");

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => return AnalyzeOutcome::failed(format!("{}: {err}", path.display())),
    };

    match parse_definition(&source) {
        Ok(definition) if degraded => AnalyzeOutcome::Degraded(definition),
        Ok(definition) => AnalyzeOutcome::Complete(definition),
        Err(err) => AnalyzeOutcome::failed(format!("{}: {err}", path.display())),
    }
}

//! CLI logic for the Etymon word graph tool.
//!
//! The CLI is a rendering host for [`Session`]: it answers analysis requests
//! from definition files, measures nodes with real font metrics, drives the
//! render pipeline until it settles and writes the result.

pub mod catalog;
pub mod error_adapter;
pub mod measure;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info, warn};

use etymon::{
    EtymonError, Session,
    analyze::Analyzer,
    controller::{Notification, NotificationLevel},
    geometry::Size,
    identifier::Id,
    store::{JsonFileStore, KeyValueStore, MemoryStore},
    sync::SyncEvent,
};

use catalog::{CatalogAnalyzer, FileAnalyzer};
use measure::NodeMeasurer;

/// Run the Etymon CLI application
///
/// Analyzes the requested word (if any), lays out its graph and writes it to
/// the output file.
///
/// # Errors
///
/// Returns `EtymonError` for:
/// - Configuration loading errors
/// - Counter store errors
/// - File I/O errors
/// - Export errors
///
/// A failed analysis is not an error: the placeholder graph is written and
/// the failure is logged.
pub fn run(args: &Args) -> Result<(), EtymonError> {
    info!(
        word:? = args.word,
        output_path = args.output,
        format:% = args.format;
        "Processing word"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let store = open_store(args.store.as_ref())?;
    let mut session = Session::new(store, &app_config);

    if let Some(word) = &args.word {
        match analyzer(args) {
            Some(mut analyzer) => {
                analyze(&mut session, analyzer.as_mut(), word);
                if args.regenerate {
                    analyze(&mut session, analyzer.as_mut(), word);
                }
            }
            None => warn!(word = word.as_str(); "No definition source given, skipping analysis"),
        }
    }

    if let Some(prompt) = session.open_prompt() {
        info!(word_count = prompt.word_count(); "{}: {}", prompt.title(), prompt.message());
    }

    settle(&mut session, &mut NodeMeasurer::new());

    let output = session.export(args.format)?;
    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Graph exported successfully");

    Ok(())
}

fn open_store(explicit_path: Option<&String>) -> Result<Box<dyn KeyValueStore>, EtymonError> {
    match config::store_path(explicit_path) {
        Some(path) => {
            debug!(path = path.display().to_string(); "Using counter store");
            Ok(Box::new(JsonFileStore::open(path)?))
        }
        None => {
            warn!("No counter store location, usage counts will not persist");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}

fn analyzer(args: &Args) -> Option<Box<dyn Analyzer>> {
    if let Some(dir) = &args.catalog {
        return Some(Box::new(CatalogAnalyzer::new(dir)));
    }
    args.definition
        .as_ref()
        .map(|path| Box::new(FileAnalyzer::new(path)) as Box<dyn Analyzer>)
}

fn analyze(session: &mut Session, analyzer: &mut dyn Analyzer, word: &str) {
    match session.analyze_with(analyzer, word) {
        Ok(resolution) => debug!(resolution:?; "Analysis resolved"),
        Err(err) => warn!(word, err:%; "Analysis not submitted"),
    }

    for notification in session.take_notifications() {
        report(&notification);
    }
}

fn report(notification: &Notification) {
    match notification.level() {
        NotificationLevel::Success | NotificationLevel::Info => {
            info!(level:% = notification.level(); "{}", notification.message())
        }
        NotificationLevel::Warning => {
            warn!(level:% = notification.level(); "{}", notification.message())
        }
    }
}

/// Measures every node and polls the pipeline until it has nothing left to do.
fn settle(session: &mut Session, measurer: &mut NodeMeasurer) {
    let sizes: Vec<(Id, Size)> = session
        .nodes()
        .iter()
        .map(|node| (node.id(), measurer.measure(node)))
        .collect();
    for (id, size) in sizes {
        session.record_size(id, size);
    }

    while let Some(event) = session.poll() {
        if let SyncEvent::FitView { bounds, .. } = event {
            debug!(width = bounds.width(), height = bounds.height(); "Graph settled");
        }
    }
}

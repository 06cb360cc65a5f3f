//! Etymon - etymological decomposition graphs.
//!
//! A word is described by a [`Definition`](definition::Definition): leaf
//! morpheme parts plus layers of combinations that merge them back into the
//! word. This crate turns that description into a graph, lays it out from
//! measured node sizes and drives the analysis of new words.
//!
//! - [`structure`] derives the ordered node and edge lists
//! - [`layout`] positions measured nodes in centred horizontal layers
//! - [`sync`] runs the measure-then-layout pipeline
//! - [`controller`] owns the definition on display and the analysis lifecycle
//! - [`Session`] wires a controller to a pipeline
//!
//! # Examples
//!
//! ```rust
//! use etymon::{Session, analyze::AnalyzeOutcome, config::AppConfig, store::MemoryStore};
//!
//! let mut session = Session::new(Box::new(MemoryStore::new()), &AppConfig::default());
//!
//! let body = r#"{
//!     "thought": "",
//!     "parts": [
//!         {"id": "read", "text": "read", "originalWord": "rædan",
//!          "origin": "Old English", "meaning": "to advise"},
//!         {"id": "er", "text": "er", "originalWord": "-ere",
//!          "origin": "Old English", "meaning": "one who"}
//!     ],
//!     "combinations": [[
//!         {"id": "reader", "text": "reader", "definition": "one who reads",
//!          "sourceIds": ["read", "er"]}
//!     ]]
//! }"#;
//!
//! let mut analyzer = |_word: &str, _force: bool| AnalyzeOutcome::from_response(200, body);
//! session.analyze_with(&mut analyzer, "reader").expect("not busy");
//!
//! assert_eq!(session.nodes().len(), 6);
//! assert_eq!(session.edges().len(), 4);
//! ```

pub mod analyze;
pub mod config;
pub mod controller;
pub mod export;
pub mod layout;
pub mod location;
pub mod session;
pub mod store;
pub mod structure;
pub mod sync;

mod error;

pub use etymon_core::{definition, diagnostic, geometry, identifier, node};

pub use error::EtymonError;
pub use session::Session;

use std::{fs, path::Path};

use log::{debug, trace};

use definition::Definition;

/// Parses a definition from its JSON form.
///
/// # Errors
///
/// Returns [`EtymonError::Definition`] if `source` is not a valid definition.
pub fn parse_definition(source: &str) -> Result<Definition, EtymonError> {
    trace!(source; "Parsing definition");
    let definition: Definition = serde_json::from_str(source)?;
    debug!(
        parts = definition.parts().len(),
        combinations = definition.combination_count();
        "Definition parsed"
    );
    Ok(definition)
}

/// Reads and parses a definition file.
///
/// # Errors
///
/// Returns [`EtymonError::Io`] if the file cannot be read, or
/// [`EtymonError::Definition`] if it does not hold a valid definition.
pub fn read_definition(path: impl AsRef<Path>) -> Result<Definition, EtymonError> {
    let path = path.as_ref();
    debug!(path:? = path; "Reading definition");
    let source = fs::read_to_string(path)?;
    parse_definition(&source)
}

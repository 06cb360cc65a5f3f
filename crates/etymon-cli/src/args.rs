//! Command-line argument definitions for the Etymon CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments choose where definitions come from, where the
//! rendered graph goes, configuration and counter-store locations, and
//! logging verbosity.

use clap::{ArgGroup, Parser};

use etymon::export::ExportFormat;

/// Command-line arguments for the Etymon word graph tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").args(["catalog", "definition"])))]
pub struct Args {
    /// Word to decompose; the placeholder graph is rendered when omitted
    #[arg(requires = "source")]
    pub word: Option<String>,

    /// Directory of `<word>.json` definitions (`<word>.degraded.json` marks a degraded answer)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Single definition file answering any word
    #[arg(long)]
    pub definition: Option<String>,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format (svg, json)
    #[arg(long, default_value_t = ExportFormat::Svg)]
    pub format: ExportFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to the usage counter store (JSON)
    #[arg(long)]
    pub store: Option<String>,

    /// Analyze the word, then ask for a fresh analysis of it
    #[arg(long, requires = "word")]
    pub regenerate: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

//! Writing positioned graphs out.
//!
//! Two formats are supported:
//!
//! - [`svg`] - an unstyled structural drawing: one box with its label lines
//!   per node and a straight line per edge
//! - [`json`] - the positioned nodes, edges and bounds as a JSON document

pub mod json;
pub mod svg;

use std::{fmt, str::FromStr};

use etymon_core::{
    geometry::Bounds,
    node::{GraphEdge, GraphNode},
};

use crate::error::EtymonError;

/// Output format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Svg,
    Json,
}

impl ExportFormat {
    /// Renders the graph in this format.
    ///
    /// # Errors
    ///
    /// Returns [`EtymonError::Export`] if the graph cannot be serialized.
    pub fn render(
        self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        bounds: Bounds,
    ) -> Result<String, EtymonError> {
        match self {
            ExportFormat::Svg => Ok(svg::render(nodes, edges, bounds)),
            ExportFormat::Json => json::render(nodes, edges, bounds),
        }
    }

    /// The usual file extension of this format.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format `{other}`")),
        }
    }
}

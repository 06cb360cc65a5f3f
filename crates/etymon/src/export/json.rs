//! JSON export of a positioned graph.
//!
//! ```text
//! { "nodes": [{"id", "type", "data", "position", "measured", "dimmed"}],
//!   "edges": [{"id", "source", "target"}],
//!   "bounds": {"min_x", "min_y", "max_x", "max_y"} }
//! ```

use log::debug;
use serde::Serialize;

use etymon_core::{
    geometry::Bounds,
    node::{GraphEdge, GraphNode},
};

use crate::error::EtymonError;

#[derive(Serialize)]
struct Document<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    bounds: Bounds,
}

/// Serializes the graph as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`EtymonError::Export`] if serialization fails.
pub fn render(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    bounds: Bounds,
) -> Result<String, EtymonError> {
    let document = Document {
        nodes,
        edges,
        bounds,
    };

    let json =
        serde_json::to_string_pretty(&document).map_err(|err| EtymonError::Export(Box::new(err)))?;
    debug!(bytes = json.len(); "JSON document rendered");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use etymon_core::definition::Definition;
    use serde_json::Value;

    use super::*;
    use crate::structure::{InputParams, build_graph};

    #[test]
    fn test_document_shape() {
        let graph = build_graph(&Definition::placeholder(), &InputParams::default());
        let json = render(graph.nodes(), graph.edges(), Bounds::default()).expect("render");
        let value: Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(9));
        assert_eq!(value["edges"].as_array().map(Vec::len), Some(7));
        assert_eq!(value["nodes"][0]["type"], "input");
        assert_eq!(value["nodes"][1]["type"], "partChunk");
        assert_eq!(value["nodes"][2]["data"]["origin"], "Latin");
        assert_eq!(value["edges"][0]["source"], "de");
        assert_eq!(value["edges"][0]["target"], "origin-de");
        assert!(value["bounds"].is_object());
    }
}

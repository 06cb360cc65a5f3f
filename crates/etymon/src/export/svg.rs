//! SVG export of a positioned graph.
//!
//! Edges are drawn first, as straight lines from the bottom-centre of the
//! source box to the top-centre of the target box. Each node follows as a
//! group holding its box and its label lines. Dimmed nodes are drawn at half
//! opacity.

use std::collections::HashMap;

use log::debug;
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use etymon_core::{
    geometry::{Bounds, Insets, Point},
    identifier::Id,
    node::{GraphEdge, GraphNode},
};

const MARGIN: f32 = 20.0;
const FONT_SIZE: f32 = 14.0;
const STROKE_COLOR: &str = "#4B5563";
const DIMMED_OPACITY: f32 = 0.5;

/// Renders the graph framed by `bounds` as an SVG document.
pub fn render(nodes: &[GraphNode], edges: &[GraphEdge], bounds: Bounds) -> String {
    let frame = bounds.add_padding(Insets::uniform(MARGIN));

    let mut document = Document::new()
        .set(
            "viewBox",
            (frame.min_x(), frame.min_y(), frame.width(), frame.height()),
        )
        .set("width", frame.width())
        .set("height", frame.height());

    let by_id: HashMap<Id, &GraphNode> = nodes.iter().map(|node| (node.id(), node)).collect();

    let mut edge_group = svg_element::Group::new().set("data-layer", "edges");
    for edge in edges {
        let (Some(source), Some(target)) = (by_id.get(&edge.source()), by_id.get(&edge.target()))
        else {
            continue;
        };
        edge_group = edge_group.add(render_edge(edge, source, target));
    }
    document = document.add(edge_group);

    let mut node_group = svg_element::Group::new().set("data-layer", "nodes");
    for node in nodes {
        node_group = node_group.add(render_node(node));
    }
    document = document.add(node_group);

    debug!(nodes = nodes.len(), edges = edges.len(); "SVG document rendered");
    document.to_string()
}

fn render_edge(edge: &GraphEdge, source: &GraphNode, target: &GraphNode) -> svg_element::Line {
    let start = bottom_center(source.bounds());
    let end = top_center(target.bounds());

    svg_element::Line::new()
        .set("data-id", edge.id().to_string())
        .set("x1", start.x())
        .set("y1", start.y())
        .set("x2", end.x())
        .set("y2", end.y())
        .set("stroke", STROKE_COLOR)
        .set("stroke-width", 1)
}

fn render_node(node: &GraphNode) -> svg_element::Group {
    let bounds = node.bounds();
    let lines = node.kind().label_lines();

    let mut group = svg_element::Group::new()
        .set("data-id", node.id().to_string())
        .set("data-type", node.kind().name());
    if node.is_dimmed() {
        group = group.set("opacity", DIMMED_OPACITY);
    }

    let rect = svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("rx", 6.0)
        .set("fill", "white")
        .set("stroke", STROKE_COLOR);
    group = group.add(rect);

    let center_x = bounds.center().x();
    let line_height = bounds.height() / (lines.len() + 1) as f32;

    let mut text = svg_element::Text::new("")
        .set("x", center_x)
        .set("y", bounds.min_y())
        .set("text-anchor", "middle")
        .set("dominant-baseline", "central")
        .set("font-size", FONT_SIZE);
    for line in &lines {
        let tspan = svg_element::TSpan::new("")
            .set("x", center_x)
            .set("dy", line_height)
            .add(SvgText::new(line.as_str()));
        text = text.add(tspan);
    }

    group.add(text)
}

fn bottom_center(bounds: Bounds) -> Point {
    Point::new(bounds.center().x(), bounds.max_y())
}

fn top_center(bounds: Bounds) -> Point {
    Point::new(bounds.center().x(), bounds.min_y())
}

#[cfg(test)]
mod tests {
    use etymon_core::{definition::Definition, geometry::Size};

    use super::*;
    use crate::{
        layout::LayoutEngine,
        structure::{InputParams, build_graph},
    };

    fn laid_out() -> (Vec<GraphNode>, Vec<GraphEdge>, Bounds) {
        let mut graph = build_graph(&Definition::placeholder(), &InputParams::default());
        for node in graph.nodes_mut() {
            node.set_measured(Some(Size::new(80.0, 40.0)));
        }
        let layout = LayoutEngine::new().calculate(graph.nodes());
        layout.apply(graph.nodes_mut());
        (graph.nodes().to_vec(), graph.edges().to_vec(), layout.bounds())
    }

    #[test]
    fn test_renders_every_node_and_edge() {
        let (nodes, edges, bounds) = laid_out();
        let svg = render(&nodes, &edges, bounds);

        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 9);
        assert_eq!(svg.matches("<line").count(), 7);
        assert!(svg.contains("data-id=\"origin-construc\""));
        assert!(svg.contains("construere"));
    }

    #[test]
    fn test_edges_run_bottom_to_top() {
        let (nodes, _, _) = laid_out();
        let chunk = nodes.iter().find(|n| n.id() == "de").expect("chunk");
        let origin = nodes.iter().find(|n| n.id() == "origin-de").expect("origin");

        let start = bottom_center(chunk.bounds());
        let end = top_center(origin.bounds());
        assert_eq!(start.y(), chunk.position().y() + 40.0);
        assert_eq!(end.y(), origin.position().y());
        assert!(start.y() < end.y());
    }

    #[test]
    fn test_dangling_edge_is_skipped() {
        let (nodes, _, bounds) = laid_out();
        let edges = vec![GraphEdge::new(Id::new("de"), Id::new("nowhere"))];
        let svg = render(&nodes, &edges, bounds);
        assert_eq!(svg.matches("<line").count(), 0);
    }

    #[test]
    fn test_dimmed_nodes_are_faded() {
        let (mut nodes, edges, bounds) = laid_out();
        nodes[0].set_dimmed(true);
        let svg = render(&nodes, &edges, bounds);
        assert_eq!(svg.matches("opacity=\"0.5\"").count(), 1);
    }
}

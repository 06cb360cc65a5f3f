//! Layered layout of the word graph.
//!
//! The [`LayoutEngine`] places nodes in horizontal rows, one row per layer,
//! in a single top-to-bottom pass:
//!
//! - Each row is centered on `x = 0`. Its nodes keep their input order and are
//!   separated by a per-layer gap.
//! - The first row sits at `y = 0`. Every later row starts below the previous
//!   one by the tallest node of that row plus the vertical gap.
//! - The input, part chunk and origin rows are always placed; an empty one
//!   still advances by the vertical gap. Combination layers without nodes are
//!   skipped and add no height.
//!
//! Positions are top-left corners. Unmeasured nodes count as zero-sized.
//! Edges play no part in placement: there is no crossing minimization and no
//! reordering.

use std::cmp::Ordering;

use indexmap::IndexMap;
use log::trace;

use etymon_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    node::{GraphNode, ORIGIN_LAYER, PART_CHUNK_LAYER},
};

use crate::config::LayoutConfig;

/// Node positions computed by one layout run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: IndexMap<Id, Point>,
    bounds: Bounds,
}

impl Layout {
    /// Returns the position assigned to `id`.
    pub fn position(&self, id: Id) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Iterates positions in input node order.
    pub fn positions(&self) -> impl Iterator<Item = (Id, Point)> + '_ {
        self.positions.iter().map(|(id, point)| (*id, *point))
    }

    /// The box covering every node at its new position.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Writes the positions into `nodes`. Nodes without a position are left untouched.
    pub fn apply(&self, nodes: &mut [GraphNode]) {
        for node in nodes {
            if let Some(position) = self.position(node.id()) {
                node.set_position(position);
            }
        }
    }
}

/// Computes layered layouts.
///
/// # Examples
///
/// ```
/// # use etymon::layout::LayoutEngine;
/// let engine = LayoutEngine::new()
///     .with_chunk_gap(3.0)
///     .with_vertical_gap(40.0);
/// assert_eq!(engine.vertical_gap(), 40.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    chunk_gap: f32,
    origin_gap: f32,
    combination_gap: f32,
    vertical_gap: f32,
}

impl LayoutEngine {
    /// Creates an engine with the default gaps.
    pub fn new() -> Self {
        Self::from_config(&LayoutConfig::default())
    }

    /// Creates an engine from the `[layout]` configuration section.
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            chunk_gap: config.chunk_gap(),
            origin_gap: config.origin_gap(),
            combination_gap: config.combination_gap(),
            vertical_gap: config.vertical_gap(),
        }
    }

    /// Set the horizontal gap between part chunks
    pub fn with_chunk_gap(mut self, gap: f32) -> Self {
        self.chunk_gap = gap;
        self
    }

    /// Set the horizontal gap between origin nodes
    pub fn with_origin_gap(mut self, gap: f32) -> Self {
        self.origin_gap = gap;
        self
    }

    /// Set the horizontal gap between combinations of one layer
    pub fn with_combination_gap(mut self, gap: f32) -> Self {
        self.combination_gap = gap;
        self
    }

    /// Set the vertical gap between layers
    pub fn with_vertical_gap(mut self, gap: f32) -> Self {
        self.vertical_gap = gap;
        self
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }

    /// Returns the horizontal gap used between nodes of `layer`.
    pub fn gap_for_layer(&self, layer: usize) -> f32 {
        match layer {
            PART_CHUNK_LAYER => self.chunk_gap,
            ORIGIN_LAYER => self.origin_gap,
            _ => self.combination_gap,
        }
    }

    /// Lays out `nodes` using their measured sizes.
    ///
    /// The result depends only on the node order, layers and sizes, so equal
    /// inputs always produce identical layouts.
    pub fn calculate(&self, nodes: &[GraphNode]) -> Layout {
        let layers = Self::group_by_layer(nodes);

        let mut positions = IndexMap::with_capacity(nodes.len());
        let mut cumulative_y = 0.0;

        for (layer_idx, layer_nodes) in &layers {
            let layer_idx = *layer_idx;
            let gap = self.gap_for_layer(layer_idx);
            let xs = Self::row_x_positions(nodes, layer_nodes, gap);

            for (&node_idx, x) in layer_nodes.iter().zip(xs) {
                positions.insert(nodes[node_idx].id(), Point::new(x, cumulative_y));
            }

            let row_height = layer_nodes
                .iter()
                .map(|&node_idx| nodes[node_idx].size().height())
                .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Less))
                .unwrap_or_default();

            trace!(
                layer = layer_idx,
                nodes = layer_nodes.len(),
                y = cumulative_y,
                row_height;
                "Placed layer"
            );
            cumulative_y += self.vertical_gap + row_height;
        }

        let bounds = nodes
            .iter()
            .filter_map(|node| {
                positions
                    .get(&node.id())
                    .map(|&position| Bounds::new_from_top_left(position, node.size()))
            })
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();

        Layout { positions, bounds }
    }

    /// Groups node indices by layer, top to bottom.
    ///
    /// Rows up to the origin layer are always present; deeper layers only
    /// when they hold nodes.
    fn group_by_layer(nodes: &[GraphNode]) -> Vec<(usize, Vec<usize>)> {
        let Some(max_layer) = nodes.iter().map(GraphNode::layer).max() else {
            return Vec::new();
        };

        let mut layers = vec![Vec::new(); max_layer + 1];
        for (node_idx, node) in nodes.iter().enumerate() {
            layers[node.layer()].push(node_idx);
        }

        layers
            .into_iter()
            .enumerate()
            .filter(|(layer, row)| *layer <= ORIGIN_LAYER || !row.is_empty())
            .collect()
    }

    /// Left edges of one row, centered on zero.
    fn row_x_positions(nodes: &[GraphNode], row: &[usize], gap: f32) -> Vec<f32> {
        if row.is_empty() {
            return Vec::new();
        }

        let widths: Vec<f32> = row
            .iter()
            .map(|&node_idx| nodes[node_idx].size().width())
            .collect();
        let total_width = widths.iter().sum::<f32>() + gap * (row.len() - 1) as f32;

        let mut x = -total_width / 2.0;
        widths
            .into_iter()
            .map(|width| {
                let left = x;
                x += width + gap;
                left
            })
            .collect()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use etymon_core::{definition::Definition, geometry::Size, node::INPUT_LAYER};

    use super::*;
    use crate::structure::{INPUT_NODE_ID, InputParams, build_graph};

    fn measured_placeholder() -> Vec<GraphNode> {
        let mut graph = build_graph(&Definition::placeholder(), &InputParams::default());
        for node in graph.nodes_mut() {
            let size = match node.layer() {
                INPUT_LAYER => Size::new(200.0, 40.0),
                PART_CHUNK_LAYER => Size::new(50.0, 30.0),
                ORIGIN_LAYER => Size::new(120.0, 90.0),
                _ => Size::new(160.0, 70.0),
            };
            node.set_measured(Some(size));
        }
        graph.nodes().to_vec()
    }

    #[test]
    fn test_input_node_centered_at_top() {
        let nodes = measured_placeholder();
        let layout = LayoutEngine::new().calculate(&nodes);

        let input = layout.position(Id::new(INPUT_NODE_ID)).expect("input placed");
        assert_approx_eq!(f32, input.x(), -100.0);
        assert_approx_eq!(f32, input.y(), 0.0);
    }

    #[test]
    fn test_part_chunks_use_chunk_gap() {
        let nodes = measured_placeholder();
        let layout = LayoutEngine::new().calculate(&nodes);

        // 3 * 50 + 2 * 3 = 156
        let de = layout.position(Id::new("de")).expect("de placed");
        let construc = layout.position(Id::new("construc")).expect("construc placed");
        let tor = layout.position(Id::new("tor")).expect("tor placed");
        assert_approx_eq!(f32, de.x(), -78.0);
        assert_approx_eq!(f32, construc.x(), -25.0);
        assert_approx_eq!(f32, tor.x(), 28.0);
        assert_approx_eq!(f32, de.y(), 90.0);
    }

    #[test]
    fn test_rows_stack_by_tallest_node() {
        let nodes = measured_placeholder();
        let layout = LayoutEngine::new().calculate(&nodes);

        let origin = layout.position(Id::new("origin-de")).expect("origin placed");
        let constructor = layout.position(Id::new("constructor")).expect("placed");
        let deconstructor = layout.position(Id::new("deconstructor")).expect("placed");

        // 40 + 50, then 30 + 50, then 90 + 50, then 70 + 50
        assert_approx_eq!(f32, origin.y(), 170.0);
        assert_approx_eq!(f32, constructor.y(), 310.0);
        assert_approx_eq!(f32, deconstructor.y(), 430.0);
        assert_approx_eq!(f32, constructor.x(), -80.0);
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let nodes = measured_placeholder();
        let layout = LayoutEngine::new().calculate(&nodes);
        let bounds = layout.bounds();

        // Origin row: 3 * 120 + 2 * 10 = 380
        assert_approx_eq!(f32, bounds.min_x(), -190.0);
        assert_approx_eq!(f32, bounds.max_x(), 190.0);
        assert_approx_eq!(f32, bounds.min_y(), 0.0);
        assert_approx_eq!(f32, bounds.max_y(), 500.0);
    }

    #[test]
    fn test_unmeasured_nodes_are_zero_sized() {
        let graph = build_graph(&Definition::placeholder(), &InputParams::default());
        let layout = LayoutEngine::new().calculate(graph.nodes());

        let chunk = layout.position(Id::new("construc")).expect("placed");
        assert_approx_eq!(f32, chunk.x(), 0.0);
        assert_approx_eq!(f32, chunk.y(), 50.0);
        let last = layout.position(Id::new("deconstructor")).expect("placed");
        assert_approx_eq!(f32, last.y(), 200.0);
    }

    #[test]
    fn test_empty_combination_layer_adds_no_height() {
        use etymon_core::definition::{Combination, MorphemePart};

        let definition = Definition::new(
            "",
            vec![MorphemePart::new("a", "a", "a", "Latin", "m")],
            vec![vec![], vec![Combination::new("x", "x", "", ["a"])]],
        );
        let mut graph = build_graph(&definition, &InputParams::default());
        for node in graph.nodes_mut() {
            node.set_measured(Some(Size::new(10.0, 10.0)));
        }

        let layout = LayoutEngine::new().calculate(graph.nodes());
        let x = layout.position(Id::new("x")).expect("placed");
        // Three rows of 10 + 50; the empty combination layer is skipped.
        assert_approx_eq!(f32, x.y(), 180.0);
    }

    #[test]
    fn test_empty_node_set() {
        let layout = LayoutEngine::new().calculate(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.bounds(), Bounds::default());
    }

    #[test]
    fn test_custom_gaps() {
        let nodes = measured_placeholder();
        let layout = LayoutEngine::new()
            .with_chunk_gap(10.0)
            .with_vertical_gap(0.0)
            .calculate(&nodes);

        let de = layout.position(Id::new("de")).expect("placed");
        assert_approx_eq!(f32, de.x(), -85.0);
        assert_approx_eq!(f32, de.y(), 40.0);
    }

    #[test]
    fn test_apply_writes_positions() {
        let mut nodes = measured_placeholder();
        let layout = LayoutEngine::new().calculate(&nodes);
        layout.apply(&mut nodes);

        for node in &nodes {
            assert_eq!(Some(node.position()), layout.position(node.id()));
        }
    }
}

//! Derivation of the word graph from a definition.
//!
//! [`build_graph`] turns a [`Definition`] into the ordered node and edge lists
//! the rest of the pipeline works on. It is pure: no measurement, no logging,
//! no failure for well-formed input. Source references that do not resolve
//! are skipped and reported through [`WordGraph::dropped_sources`]. A node
//! whose id is already taken is left out and reported through
//! [`WordGraph::duplicate_ids`], so every id in the graph names one node.
//!
//! # Node Order
//!
//! 1. The input node.
//! 2. Per part, in order: its part chunk followed by its origin, joined by an
//!    edge from the chunk to the origin.
//! 3. Per combination layer, per combination, in order: the combination,
//!    with one edge from each resolved source into it.
//!
//! A source naming a part resolves to that part's origin node; any other
//! source must name a combination and resolves to the combination itself.

pub mod validate;

use std::collections::HashSet;

use etymon_core::{
    definition::Definition,
    identifier::Id,
    node::{CombinationData, GraphEdge, GraphNode, InputData, NodeKind, OriginData, PartChunkData},
};

/// Id of the word entry node.
pub const INPUT_NODE_ID: &str = "input1";

/// Parameters of the input node.
///
/// These only shape the input node's payload; they never affect the structure
/// of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputParams {
    displayed_word: Option<String>,
    locked: bool,
    has_analyzed: bool,
    analyzed_word: Option<String>,
}

impl InputParams {
    /// Creates input parameters.
    ///
    /// # Arguments
    ///
    /// * `displayed_word` - The word shown in the entry field
    /// * `locked` - Whether the entry is disabled
    /// * `has_analyzed` - Whether the current definition was produced for `analyzed_word`
    /// * `analyzed_word` - The word the current definition belongs to
    pub fn new(
        displayed_word: Option<String>,
        locked: bool,
        has_analyzed: bool,
        analyzed_word: Option<String>,
    ) -> Self {
        Self {
            displayed_word,
            locked,
            has_analyzed,
            analyzed_word,
        }
    }

    pub fn displayed_word(&self) -> Option<&str> {
        self.displayed_word.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_analyzed(&self) -> bool {
        self.has_analyzed
    }

    pub fn analyzed_word(&self) -> Option<&str> {
        self.analyzed_word.as_deref()
    }

    fn to_input_data(&self) -> InputData {
        InputData::new(
            self.displayed_word.clone(),
            self.locked,
            self.has_analyzed,
            self.analyzed_word.clone(),
        )
    }
}

/// A source reference that did not resolve to any node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSource {
    combination: Id,
    source: String,
}

impl DroppedSource {
    /// The combination that referenced the missing source.
    pub fn combination(&self) -> Id {
        self.combination
    }

    /// The source id as written in the definition.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Ordered nodes and edges derived from one definition.
#[derive(Debug, Clone, Default)]
pub struct WordGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    dropped: Vec<DroppedSource>,
    duplicates: Vec<Id>,
}

impl WordGraph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Source references skipped while building, in definition order.
    pub fn dropped_sources(&self) -> &[DroppedSource] {
        &self.dropped
    }

    /// Ids whose later definitions were left out, in definition order.
    pub fn duplicate_ids(&self) -> &[Id] {
        &self.duplicates
    }

    /// Returns the first node with the given id.
    pub fn node(&self, id: Id) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns the first node with the given id, mutably.
    pub fn node_mut(&mut self, id: Id) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Returns the input node's payload.
    pub fn input(&self) -> Option<&InputData> {
        self.nodes.iter().find_map(|node| match node.kind() {
            NodeKind::Input(data) => Some(data),
            _ => None,
        })
    }

    /// Rewrites the input node's payload from `params`.
    ///
    /// Returns whether the payload changed.
    pub fn set_input(&mut self, params: &InputParams) -> bool {
        let data = params.to_input_data();
        let Some(node) = self.node_mut(Id::new(INPUT_NODE_ID)) else {
            return false;
        };
        if matches!(node.kind(), NodeKind::Input(current) if *current == data) {
            return false;
        }
        node.set_kind(NodeKind::Input(data));
        true
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `node` unless its id is already taken.
    fn push_node(&mut self, taken: &mut HashSet<Id>, node: GraphNode) -> bool {
        if taken.insert(node.id()) {
            self.nodes.push(node);
            true
        } else {
            self.duplicates.push(node.id());
            false
        }
    }
}

/// Builds the word graph for `definition`.
///
/// # Examples
///
/// ```
/// # use etymon::structure::{build_graph, InputParams};
/// # use etymon_core::definition::Definition;
/// let graph = build_graph(&Definition::placeholder(), &InputParams::default());
/// assert_eq!(graph.nodes().len(), 9);
/// assert_eq!(graph.edges().len(), 7);
/// ```
pub fn build_graph(definition: &Definition, params: &InputParams) -> WordGraph {
    let part_ids: HashSet<&str> = definition.parts().iter().map(|part| part.id()).collect();
    let combination_ids: HashSet<&str> = definition
        .combinations()
        .map(|(_, combination)| combination.id())
        .collect();

    let node_count = 1 + 2 * definition.parts().len() + definition.combination_count();
    let edge_count = definition.parts().len() + definition.source_reference_count();

    let mut graph = WordGraph {
        nodes: Vec::with_capacity(node_count),
        edges: Vec::with_capacity(edge_count),
        dropped: Vec::new(),
        duplicates: Vec::new(),
    };
    let mut taken = HashSet::new();

    graph.push_node(
        &mut taken,
        GraphNode::new(Id::new(INPUT_NODE_ID), NodeKind::Input(params.to_input_data())),
    );

    for part in definition.parts() {
        let chunk_id = Id::new(part.id());
        let origin_id = Id::origin_of(chunk_id);

        let chunk = GraphNode::new(chunk_id, NodeKind::PartChunk(PartChunkData::new(part.text())));
        let origin = GraphNode::new(
            origin_id,
            NodeKind::Origin(OriginData::new(
                part.original_word(),
                part.origin(),
                part.meaning(),
            )),
        );
        let chunk_added = graph.push_node(&mut taken, chunk);
        let origin_added = graph.push_node(&mut taken, origin);
        if chunk_added && origin_added {
            graph.edges.push(GraphEdge::new(chunk_id, origin_id));
        }
    }

    for (layer_idx, combination) in definition.combinations() {
        let combination_id = Id::new(combination.id());
        let node = GraphNode::new(
            combination_id,
            NodeKind::Combination(CombinationData::new(
                combination.text(),
                combination.definition(),
                layer_idx,
            )),
        );
        if !graph.push_node(&mut taken, node) {
            continue;
        }

        for source in combination.source_ids() {
            let source = source.as_str();
            let source_id = if part_ids.contains(source) {
                Id::origin_of(Id::new(source))
            } else if combination_ids.contains(source) {
                Id::new(source)
            } else {
                graph.dropped.push(DroppedSource {
                    combination: combination_id,
                    source: source.to_string(),
                });
                continue;
            };
            graph.edges.push(GraphEdge::new(source_id, combination_id));
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use etymon_core::definition::{Combination, MorphemePart};

    use super::*;

    fn part(id: &str) -> MorphemePart {
        MorphemePart::new(id, id, format!("{id}-"), "Latin", "gloss")
    }

    #[test]
    fn test_placeholder_order() {
        let graph = build_graph(&Definition::placeholder(), &InputParams::default());

        let ids: Vec<String> = graph.nodes().iter().map(|n| n.id().to_string()).collect();
        assert_eq!(
            ids,
            [
                "input1",
                "de",
                "origin-de",
                "construc",
                "origin-construc",
                "tor",
                "origin-tor",
                "constructor",
                "deconstructor",
            ]
        );

        let edges: Vec<String> = graph.edges().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(
            edges,
            [
                "edge-de-origin-de",
                "edge-construc-origin-construc",
                "edge-tor-origin-tor",
                "edge-origin-construc-constructor",
                "edge-origin-tor-constructor",
                "edge-origin-de-deconstructor",
                "edge-constructor-deconstructor",
            ]
        );
        assert!(graph.dropped_sources().is_empty());
    }

    #[test]
    fn test_layers_assigned_by_kind() {
        let graph = build_graph(&Definition::placeholder(), &InputParams::default());
        let layers: Vec<usize> = graph.nodes().iter().map(GraphNode::layer).collect();
        assert_eq!(layers, [0, 1, 2, 1, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn test_dangling_source_is_dropped() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![vec![Combination::new("ab", "ab", "", ["a", "missing"])]],
        );
        let graph = build_graph(&definition, &InputParams::default());

        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.dropped_sources().len(), 1);

        let dropped = &graph.dropped_sources()[0];
        assert_eq!(dropped.combination(), "ab");
        assert_eq!(dropped.source(), "missing");
    }

    #[test]
    fn test_duplicate_ids_keep_first_node() {
        let definition = Definition::new(
            "",
            vec![part("read"), part("er")],
            vec![vec![Combination::new("read", "reader", "", ["read", "er"])]],
        );
        let graph = build_graph(&definition, &InputParams::default());

        assert_eq!(graph.nodes().len(), 5);
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.duplicate_ids(), [Id::new("read")]);
        assert!(matches!(
            graph.node(Id::new("read")).map(GraphNode::kind),
            Some(NodeKind::PartChunk(_))
        ));

        let ids: HashSet<Id> = graph.nodes().iter().map(GraphNode::id).collect();
        assert_eq!(ids.len(), graph.nodes().len());
    }

    #[test]
    fn test_input_params_flow_into_input_node() {
        let params = InputParams::new(
            Some("reader".to_string()),
            true,
            true,
            Some("reader".to_string()),
        );
        let graph = build_graph(&Definition::placeholder(), &params);

        let input = graph.input().expect("input node");
        assert_eq!(input.initial_word(), Some("reader"));
        assert!(input.is_locked());
        assert!(input.has_analyzed());
        assert_eq!(input.analyzed_word(), Some("reader"));
    }

    #[test]
    fn test_set_input_keeps_geometry() {
        let mut graph = build_graph(&Definition::placeholder(), &InputParams::default());
        let input_id = Id::new(INPUT_NODE_ID);
        if let Some(node) = graph.node_mut(input_id) {
            node.set_measured(Some(etymon_core::geometry::Size::new(120.0, 40.0)));
        }

        let params = InputParams::new(Some("reader".to_string()), true, false, None);
        assert!(graph.set_input(&params));
        assert!(!graph.set_input(&params));

        let node = graph.node(input_id).expect("input node");
        assert!(node.measured().is_some());
        assert_eq!(graph.input().and_then(InputData::initial_word), Some("reader"));
    }

    #[test]
    fn test_empty_definition_has_only_input() {
        let graph = build_graph(&Definition::new("", vec![], vec![]), &InputParams::default());
        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_nodes_start_unpositioned() {
        let graph = build_graph(&Definition::placeholder(), &InputParams::default());
        assert!(graph.nodes().iter().all(|n| n.position().is_zero()));
        assert!(graph.nodes().iter().all(|n| n.measured().is_none()));
    }
}

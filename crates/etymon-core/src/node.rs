//! Graph nodes and edges derived from a [`Definition`](crate::definition::Definition).
//!
//! Every node is one of four closed kinds, each with its own payload:
//!
//! | Kind          | Layer       | Payload                                   |
//! |---------------|-------------|-------------------------------------------|
//! | Input         | 0           | word entry state ([`InputData`])          |
//! | PartChunk     | 1           | fragment text ([`PartChunkData`])         |
//! | Origin        | 2           | source word, language, gloss ([`OriginData`]) |
//! | Combination   | 3 + layer   | composite term ([`CombinationData`])      |
//!
//! The structural fields of a node are fixed when the graph is built. The
//! position belongs to the layout engine, the measured size to whoever
//! measures the rendered node, and the `dimmed` flag mirrors the loading
//! state of the analysis that produced the graph.

use serde::Serialize;

use crate::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// Layer index of the input node.
pub const INPUT_LAYER: usize = 0;
/// Layer index of part chunk nodes.
pub const PART_CHUNK_LAYER: usize = 1;
/// Layer index of origin nodes.
pub const ORIGIN_LAYER: usize = 2;
/// Layer index of the first combination layer.
pub const FIRST_COMBINATION_LAYER: usize = 3;

/// What submitting a word from the input node will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// First analysis of this word.
    Analyze,
    /// The word is already shown; ask for a fresh analysis.
    Regenerate,
}

impl SubmitAction {
    /// Routes a submission of `word`.
    ///
    /// A word regenerates when the graph was already produced for it,
    /// ignoring surrounding whitespace and letter case.
    pub fn route(has_analyzed: bool, analyzed_word: Option<&str>, word: &str) -> Self {
        let matches = has_analyzed
            && analyzed_word
                .is_some_and(|analyzed| analyzed.to_lowercase() == word.trim().to_lowercase());

        if matches {
            Self::Regenerate
        } else {
            Self::Analyze
        }
    }
}

/// State of the word entry node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputData {
    initial_word: Option<String>,
    locked: bool,
    has_analyzed: bool,
    analyzed_word: Option<String>,
}

impl InputData {
    /// Creates input node data.
    ///
    /// # Arguments
    ///
    /// * `initial_word` - The word pre-filled in the entry field
    /// * `locked` - Whether the entry is disabled
    /// * `has_analyzed` - Whether the displayed graph belongs to `analyzed_word`
    /// * `analyzed_word` - The word the current graph was produced for
    pub fn new(
        initial_word: Option<String>,
        locked: bool,
        has_analyzed: bool,
        analyzed_word: Option<String>,
    ) -> Self {
        Self {
            initial_word,
            locked,
            has_analyzed,
            analyzed_word,
        }
    }

    pub fn initial_word(&self) -> Option<&str> {
        self.initial_word.as_deref()
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

    /// Decides whether submitting `word` analyzes it or regenerates it.
    pub fn action_for(&self, word: &str) -> SubmitAction {
        SubmitAction::route(self.has_analyzed, self.analyzed_word(), word)
    }

    /// Label of the submit button for the word currently in the entry field.
    pub fn button_label(&self, word: &str) -> &'static str {
        if self.locked {
            return "Locked";
        }
        match self.action_for(word) {
            SubmitAction::Regenerate => "Try Again",
            SubmitAction::Analyze => "Analyze",
        }
    }
}

/// Payload of a part chunk node: the fragment as written in the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartChunkData {
    text: String,
}

impl PartChunkData {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Payload of an origin node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginData {
    original_word: String,
    origin: String,
    meaning: String,
}

impl OriginData {
    pub fn new(
        original_word: impl Into<String>,
        origin: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            original_word: original_word.into(),
            origin: origin.into(),
            meaning: meaning.into(),
        }
    }

    pub fn original_word(&self) -> &str {
        &self.original_word
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }
}

/// Payload of a combination node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationData {
    text: String,
    definition: String,
    /// Index into the definition's combination layers.
    layer: usize,
}

impl CombinationData {
    pub fn new(text: impl Into<String>, definition: impl Into<String>, layer: usize) -> Self {
        Self {
            text: text.into(),
            definition: definition.into(),
            layer,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Index of the combination layer this node belongs to (0-based).
    pub fn layer(&self) -> usize {
        self.layer
    }
}

/// The kind of a graph node together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum NodeKind {
    Input(InputData),
    PartChunk(PartChunkData),
    Origin(OriginData),
    Combination(CombinationData),
}

impl NodeKind {
    /// Returns the vertical layer this kind of node is placed in.
    pub fn layer(&self) -> usize {
        match self {
            NodeKind::Input(_) => INPUT_LAYER,
            NodeKind::PartChunk(_) => PART_CHUNK_LAYER,
            NodeKind::Origin(_) => ORIGIN_LAYER,
            NodeKind::Combination(data) => FIRST_COMBINATION_LAYER + data.layer,
        }
    }

    /// Returns a short name of the kind, used in logs and exports.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Input(_) => "input",
            NodeKind::PartChunk(_) => "partChunk",
            NodeKind::Origin(_) => "origin",
            NodeKind::Combination(_) => "combination",
        }
    }

    /// The text lines a node of this kind displays, top to bottom.
    ///
    /// Hosts measure these lines to size the node; exporters draw them.
    pub fn label_lines(&self) -> Vec<String> {
        match self {
            NodeKind::Input(data) => {
                let word = data.initial_word().unwrap_or_default();
                let prompt = if word.is_empty() { "Enter a word" } else { word };
                vec![prompt.to_string(), data.button_label(word).to_string()]
            }
            NodeKind::PartChunk(data) => vec![data.text().to_string()],
            NodeKind::Origin(data) => vec![
                data.original_word().to_string(),
                data.origin().to_string(),
                data.meaning().to_string(),
            ],
            NodeKind::Combination(data) => {
                vec![data.text().to_string(), data.definition().to_string()]
            }
        }
    }
}

/// A node of the word graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    id: Id,
    #[serde(flatten)]
    kind: NodeKind,
    position: Point,
    measured: Option<Size>,
    dimmed: bool,
}

impl GraphNode {
    /// Creates an unmeasured node at the origin.
    pub fn new(id: Id, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            position: Point::default(),
            measured: None,
            dimmed: false,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Replaces the payload, keeping position and size.
    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    /// Returns the vertical layer of this node.
    pub fn layer(&self) -> usize {
        self.kind.layer()
    }

    /// Returns the top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Returns the measured size, if the node has been measured.
    pub fn measured(&self) -> Option<Size> {
        self.measured
    }

    /// Returns the measured size, treating an unmeasured node as zero-sized.
    pub fn size(&self) -> Size {
        self.measured.unwrap_or_default()
    }

    pub fn set_measured(&mut self, size: Option<Size>) {
        self.measured = size;
    }

    /// Whether the node is faded out while an analysis is in flight.
    pub fn is_dimmed(&self) -> bool {
        self.dimmed
    }

    pub fn set_dimmed(&mut self, dimmed: bool) {
        self.dimmed = dimmed;
    }

    /// Returns the box covered by this node at its current position.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size())
    }
}

/// A presentation-only connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    id: Id,
    source: Id,
    target: Id,
}

impl GraphEdge {
    /// Creates the edge from `source` to `target`, deriving its id from both ends.
    pub fn new(source: Id, target: Id) -> Self {
        Self {
            id: Id::edge(source, target),
            source,
            target,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }
}

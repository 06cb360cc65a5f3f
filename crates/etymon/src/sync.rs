//! Measure-then-layout pipeline.
//!
//! Node sizes are only known once the host has rendered the nodes, so a graph
//! goes through three phases before it is framed:
//!
//! 1. **Structural** - [`RenderSync::commit`] stores fresh nodes at the origin.
//!    The host renders them and reports sizes with [`RenderSync::record_size`].
//! 2. **Positioned** - once every node has a size, the next
//!    [`RenderSync::poll`] runs the layout engine once and replaces all
//!    positions together.
//! 3. **Settled** - the following poll asks the host to fit the viewport to
//!    the laid-out graph, once.
//!
//! Committing a new graph restarts the pipeline from scratch. Sizes reported
//! after the layout ran are stored but never trigger another layout run.

use log::{debug, info, trace};

use etymon_core::{
    geometry::{Bounds, Size},
    identifier::Id,
    node::{GraphEdge, GraphNode},
};

use crate::{
    config::ViewportConfig,
    layout::LayoutEngine,
    structure::{InputParams, WordGraph},
};

/// Pipeline phase of the current graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncPhase {
    /// Nodes are committed and waiting for sizes.
    Structural,
    /// Layout was applied; the viewport fit is still due.
    Positioned { bounds: Bounds },
    /// The viewport fit was requested.
    Settled,
}

/// Work the host must react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncEvent {
    /// Every node received its final position.
    Positioned,
    /// Frame `bounds` in the viewport, animating over `animate_ms` milliseconds.
    FitView { bounds: Bounds, animate_ms: u32 },
}

/// Drives one graph at a time through the pipeline.
#[derive(Debug, Clone)]
pub struct RenderSync {
    engine: LayoutEngine,
    fit_duration_ms: u32,
    graph: WordGraph,
    generation: u64,
    phase: SyncPhase,
    loading: bool,
}

impl RenderSync {
    /// Creates a pipeline with no graph committed.
    pub fn new(engine: LayoutEngine, viewport: &ViewportConfig) -> Self {
        Self {
            engine,
            fit_duration_ms: viewport.fit_duration_ms(),
            graph: WordGraph::default(),
            generation: 0,
            phase: SyncPhase::Structural,
            loading: false,
        }
    }

    /// Starts a new generation with `graph`.
    ///
    /// Positions and sizes carried by `graph` are discarded; every node starts
    /// unmeasured at the origin.
    pub fn commit(&mut self, mut graph: WordGraph) {
        for node in graph.nodes_mut() {
            node.set_position(Default::default());
            node.set_measured(None);
            node.set_dimmed(self.loading);
        }

        self.generation += 1;
        debug!(
            generation = self.generation,
            nodes = graph.nodes().len(),
            edges = graph.edges().len();
            "Committed graph structure"
        );

        self.graph = graph;
        self.phase = SyncPhase::Structural;
    }

    /// Records the rendered size of node `id`.
    ///
    /// Unknown ids are ignored. Returns whether a node was updated.
    pub fn record_size(&mut self, id: Id, size: Size) -> bool {
        match self.graph.node_mut(id) {
            Some(node) => {
                node.set_measured(Some(size));
                true
            }
            None => {
                trace!(id:%; "Ignoring size for unknown node");
                false
            }
        }
    }

    /// Whether every current node has a known size.
    pub fn is_ready(&self) -> bool {
        !self.graph.is_empty() && self.graph.nodes().iter().all(|n| n.measured().is_some())
    }

    /// Advances the pipeline by one step.
    ///
    /// Returns `None` when there is nothing to do; polling again in the same
    /// state keeps returning `None`.
    pub fn poll(&mut self) -> Option<SyncEvent> {
        match self.phase {
            SyncPhase::Structural if self.is_ready() => {
                let layout = self.engine.calculate(self.graph.nodes());
                layout.apply(self.graph.nodes_mut());

                info!(
                    generation = self.generation,
                    nodes = layout.len(),
                    width = layout.bounds().width(),
                    height = layout.bounds().height();
                    "Layout applied"
                );
                self.phase = SyncPhase::Positioned {
                    bounds: layout.bounds(),
                };
                Some(SyncEvent::Positioned)
            }
            SyncPhase::Positioned { bounds } => {
                self.phase = SyncPhase::Settled;
                Some(SyncEvent::FitView {
                    bounds,
                    animate_ms: self.fit_duration_ms,
                })
            }
            SyncPhase::Structural | SyncPhase::Settled => None,
        }
    }

    /// Rewrites the input node's payload in place.
    ///
    /// Positions and sizes are kept, so the pipeline is not restarted.
    pub fn update_input(&mut self, params: &InputParams) -> bool {
        let changed = self.graph.set_input(params);
        if changed {
            trace!(params:?; "Input node updated");
        }
        changed
    }

    /// Fades every node in or out with the loading state.
    ///
    /// The flag also applies to graphs committed later.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        for node in self.graph.nodes_mut() {
            node.set_dimmed(loading);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Number of graphs committed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[GraphNode] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        self.graph.edges()
    }

    /// The bounds framed by the last layout run of this generation.
    pub fn bounds(&self) -> Option<Bounds> {
        match self.phase {
            SyncPhase::Structural => None,
            SyncPhase::Positioned { bounds } => Some(bounds),
            SyncPhase::Settled => Some(self.layout_bounds()),
        }
    }

    fn layout_bounds(&self) -> Bounds {
        self.graph
            .nodes()
            .iter()
            .map(GraphNode::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }
}

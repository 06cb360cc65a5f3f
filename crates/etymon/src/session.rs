//! A controller and its render pipeline behind one handle.
//!
//! [`Session`] keeps the committed graph in step with the controller: every
//! time the definition is replaced the graph is rebuilt and committed as a
//! new generation, and every other state change only rewrites the input node
//! and the loading fade.

use log::{debug, warn};

use etymon_core::{
    definition::Definition,
    geometry::Size,
    identifier::Id,
    node::{GraphEdge, GraphNode},
};

use crate::{
    analyze::{AnalyzeOutcome, Analyzer},
    config::AppConfig,
    controller::{
        AnalysisController, AnalyzeRequest, Notification, Resolution, SubmitRejected,
        usage::UsagePrompt,
    },
    error::EtymonError,
    export::ExportFormat,
    layout::LayoutEngine,
    store::KeyValueStore,
    structure::build_graph,
    sync::{RenderSync, SyncEvent},
};

/// An analysis controller wired to a render pipeline.
///
/// # Examples
///
/// ```
/// use etymon::{Session, config::AppConfig, geometry::Size, store::MemoryStore};
///
/// let mut session = Session::new(Box::new(MemoryStore::new()), &AppConfig::default());
///
/// // The placeholder graph is committed on creation.
/// assert_eq!(session.nodes().len(), 9);
///
/// let ids: Vec<_> = session.nodes().iter().map(|node| node.id()).collect();
/// for id in ids {
///     session.record_size(id, Size::new(80.0, 40.0));
/// }
/// while session.poll().is_some() {}
///
/// let svg = session.export(Default::default()).expect("export");
/// assert!(svg.starts_with("<svg"));
/// ```
pub struct Session {
    controller: AnalysisController,
    sync: RenderSync,
    committed_revision: Option<u64>,
}

impl Session {
    /// Creates a session and commits the placeholder graph.
    pub fn new(store: Box<dyn KeyValueStore>, config: &AppConfig) -> Self {
        let controller = AnalysisController::new(store, config);
        let sync = RenderSync::new(
            LayoutEngine::from_config(config.layout()),
            config.viewport(),
        );

        let mut session = Self {
            controller,
            sync,
            committed_revision: None,
        };
        session.refresh();
        session
    }

    pub fn controller(&self) -> &AnalysisController {
        &self.controller
    }

    pub fn sync(&self) -> &RenderSync {
        &self.sync
    }

    pub fn nodes(&self) -> &[GraphNode] {
        self.sync.nodes()
    }

    pub fn edges(&self) -> &[GraphEdge] {
        self.sync.edges()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    /// Submits `word`; see [`AnalysisController::submit`].
    ///
    /// # Errors
    ///
    /// Returns the controller's rejection.
    pub fn submit(&mut self, word: &str) -> Result<AnalyzeRequest, SubmitRejected> {
        let request = self.controller.submit(word)?;
        self.refresh();
        Ok(request)
    }

    /// Regenerates `word`; see [`AnalysisController::regenerate`].
    ///
    /// # Errors
    ///
    /// Returns the controller's rejection.
    pub fn regenerate(&mut self, word: &str) -> Result<AnalyzeRequest, SubmitRejected> {
        let request = self.controller.regenerate(word)?;
        self.refresh();
        Ok(request)
    }

    /// Applies an analysis outcome and recommits the graph if it changed.
    pub fn resolve(&mut self, request: &AnalyzeRequest, outcome: AnalyzeOutcome) -> Resolution {
        let resolution = self.controller.resolve(request.ticket(), outcome);
        self.refresh();
        resolution
    }

    /// Submits `word` and resolves it with `analyzer` in one step.
    ///
    /// # Errors
    ///
    /// Returns the controller's rejection.
    pub fn analyze_with<A>(
        &mut self,
        analyzer: &mut A,
        word: &str,
    ) -> Result<Resolution, SubmitRejected>
    where
        A: Analyzer + ?Sized,
    {
        let request = self.submit(word)?;
        let outcome = analyzer.analyze(request.word(), request.force_update());
        Ok(self.resolve(&request, outcome))
    }

    /// Shows `definition` for `word` without an analysis request.
    pub fn preload(&mut self, word: &str, definition: Definition) {
        self.controller.preload(word, definition);
        self.refresh();
    }

    /// Records the word the host is now showing.
    pub fn set_displayed_word(&mut self, word: Option<&str>) {
        self.controller.set_displayed_word(word);
        self.refresh();
    }

    /// Records the rendered size of node `id`.
    pub fn record_size(&mut self, id: Id, size: Size) -> bool {
        self.sync.record_size(id, size)
    }

    /// Advances the render pipeline; see [`RenderSync::poll`].
    pub fn poll(&mut self) -> Option<SyncEvent> {
        self.sync.poll()
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.controller.take_notifications()
    }

    pub fn open_prompt(&self) -> Option<&UsagePrompt> {
        self.controller.open_prompt()
    }

    pub fn dismiss_prompt(&mut self) -> bool {
        self.controller.dismiss_prompt()
    }

    pub fn opt_in(&mut self) {
        self.controller.opt_in();
    }

    /// Renders the current graph.
    ///
    /// A graph that has not been laid out yet is exported at the origin with
    /// empty bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EtymonError::Export`] if the format fails to serialize.
    pub fn export(&self, format: ExportFormat) -> Result<String, EtymonError> {
        let bounds = self.sync.bounds().unwrap_or_default();
        format.render(self.sync.nodes(), self.sync.edges(), bounds)
    }

    fn refresh(&mut self) {
        let revision = self.controller.revision();
        let params = self.controller.input_params();

        if self.committed_revision != Some(revision) {
            let graph = build_graph(self.controller.definition(), &params);
            for dropped in graph.dropped_sources() {
                warn!(
                    combination:% = dropped.combination(),
                    source = dropped.source();
                    "Dropping edge from unknown source"
                );
            }
            for id in graph.duplicate_ids() {
                warn!(id:%; "Dropping node with repeated id");
            }
            debug!(revision; "Definition replaced, committing new graph");
            self.sync.commit(graph);
            self.committed_revision = Some(revision);
        } else {
            self.sync.update_input(&params);
        }

        self.sync.set_loading(self.controller.is_loading());
    }
}

//! The analysis state machine.
//!
//! [`AnalysisController`] owns the definition on display and decides what
//! happens when the user submits a word. It performs no I/O: submitting a word
//! yields an [`AnalyzeRequest`] that the host carries out, and the host hands
//! the [`AnalyzeOutcome`] back through [`AnalysisController::resolve`].
//!
//! # States
//!
//! ```text
//!  Idle ──submit──► Loading ──complete/degraded──► Ready
//!                     │  ▲                           │
//!                  failed└──────────submit───────────┤
//!                     ▼                              │
//!                   Error ─────────submit────────────┘
//! ```
//!
//! Only one request may be outstanding. Every request carries a ticket and
//! only the outstanding ticket is accepted on resolution; anything else is a
//! stale response and is discarded.

mod notification;
pub mod usage;

pub use notification::{Notification, NotificationLevel};

use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use thiserror::Error;

use etymon_core::{definition::Definition, node::SubmitAction};

use crate::{
    analyze::{AnalyzeOutcome, Analyzer},
    config::{AppConfig, ValidationConfig},
    error::EtymonError,
    location::WordLocation,
    store::KeyValueStore,
    structure::{InputParams, validate},
};

use usage::{UsageGate, UsagePrompt};

/// Lifecycle state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing analyzed yet; the placeholder definition is shown.
    Idle,
    /// A request is outstanding and the input is locked.
    Loading,
    /// The latest request produced the definition on display.
    Ready,
    /// The latest request failed; the previous definition is kept.
    Error,
}

/// Identifies one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// An analysis the host must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    ticket: Ticket,
    word: String,
    force_update: bool,
}

impl AnalyzeRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// The trimmed word to analyze.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Whether the service should bypass cached analyses.
    pub fn force_update(&self) -> bool {
        self.force_update
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("the word is empty")]
    EmptyWord,

    #[error("an analysis is already in progress")]
    Busy,

    #[error("only the analyzed word can be regenerated")]
    NotAnalyzed,
}

/// What resolving a request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The definition was replaced.
    Updated,
    /// The request failed; the definition was kept.
    Failed,
    /// The ticket was not the outstanding one; nothing changed.
    Stale,
}

/// The analysis state machine.
pub struct AnalysisController {
    state: ControllerState,
    definition: Definition,
    /// Bumped whenever `definition` is replaced.
    revision: u64,
    displayed_word: Option<String>,
    analyzed_word: Option<String>,
    has_analyzed: bool,
    pending: Option<AnalyzeRequest>,
    next_ticket: u64,
    location: Option<WordLocation>,
    notifications: VecDeque<Notification>,
    usage: UsageGate,
    validation: ValidationConfig,
}

impl AnalysisController {
    /// Creates an idle controller showing the placeholder definition.
    ///
    /// Usage counters are read from `store` once, here.
    pub fn new(store: Box<dyn KeyValueStore>, config: &AppConfig) -> Self {
        Self {
            state: ControllerState::Idle,
            definition: Definition::placeholder(),
            revision: 0,
            displayed_word: None,
            analyzed_word: None,
            has_analyzed: false,
            pending: None,
            next_ticket: 0,
            location: None,
            notifications: VecDeque::new(),
            usage: UsageGate::new(store, config.usage().clone()),
            validation: config.validation().clone(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The definition on display.
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Counter bumped every time the definition is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_loading(&self) -> bool {
        self.state == ControllerState::Loading
    }

    pub fn displayed_word(&self) -> Option<&str> {
        self.displayed_word.as_deref()
    }

    /// The word the definition on display was produced for.
    pub fn analyzed_word(&self) -> Option<&str> {
        self.analyzed_word.as_deref()
    }

    pub fn has_analyzed(&self) -> bool {
        self.has_analyzed
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<&AnalyzeRequest> {
        self.pending.as_ref()
    }

    /// Shareable location of the last analyzed word.
    pub fn location(&self) -> Option<&WordLocation> {
        self.location.as_ref()
    }

    pub fn usage(&self) -> &UsageGate {
        &self.usage
    }

    pub fn open_prompt(&self) -> Option<&UsagePrompt> {
        self.usage.open_prompt()
    }

    /// Parameters for the input node of the graph built from this state.
    pub fn input_params(&self) -> InputParams {
        InputParams::new(
            self.displayed_word.clone(),
            self.is_loading(),
            self.has_analyzed,
            self.analyzed_word.clone(),
        )
    }

    /// Submits `word` for analysis.
    ///
    /// A word matching the analyzed word (ignoring case and surrounding
    /// whitespace) is routed to [`regenerate`](Self::regenerate).
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::EmptyWord`] for a blank word and
    /// [`SubmitRejected::Busy`] while a request is outstanding.
    pub fn submit(&mut self, word: &str) -> Result<AnalyzeRequest, SubmitRejected> {
        let word = self.check_submittable(word)?;

        if self.matches_analyzed(&word) {
            return self.regenerate(&word);
        }
        Ok(self.start(word, false))
    }

    /// Asks for a fresh analysis of the word on display.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::NotAnalyzed`] unless `word` matches the
    /// analyzed word, in addition to the rejections of [`submit`](Self::submit).
    pub fn regenerate(&mut self, word: &str) -> Result<AnalyzeRequest, SubmitRejected> {
        let word = self.check_submittable(word)?;

        if !self.matches_analyzed(&word) {
            debug!(word = word.as_str(); "Refusing to regenerate a word that was not analyzed");
            return Err(SubmitRejected::NotAnalyzed);
        }
        Ok(self.start(word, true))
    }

    /// Applies the outcome of the request identified by `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, outcome: AnalyzeOutcome) -> Resolution {
        let Some(request) = self.pending.take_if(|pending| pending.ticket == ticket) else {
            warn!(ticket = ticket.0; "Discarding stale analysis response");
            return Resolution::Stale;
        };

        let regenerating = request.force_update;
        let word = request.word;

        let (definition, degraded) = match outcome {
            AnalyzeOutcome::Complete(definition) => (definition, false),
            AnalyzeOutcome::Degraded(definition) => (definition, true),
            AnalyzeOutcome::Failed { reason } => {
                warn!(word = word.as_str(), reason = reason.as_str(); "Analysis failed");
                return self.fail();
            }
        };

        if let Err(err) = self.check_definition(&definition, &word) {
            warn!(word = word.as_str(), err:%; "Rejecting analysis");
            return self.fail();
        }

        let notification = if degraded {
            Notification::degraded(regenerating)
        } else if regenerating {
            Notification::regenerated()
        } else {
            Notification::analyzed(&word)
        };
        self.notifications.push_back(notification);

        self.usage.record_success();
        self.location = Some(WordLocation::new(word.as_str()));
        self.replace_definition(definition, word);

        info!(
            word = self.analyzed_word.as_deref().unwrap_or_default(),
            degraded,
            regenerating;
            "Analysis applied"
        );
        Resolution::Updated
    }

    /// Submits `word` and resolves it with `analyzer` in one step.
    ///
    /// # Errors
    ///
    /// Returns the rejection from [`submit`](Self::submit).
    pub fn analyze_with<A>(&mut self, analyzer: &mut A, word: &str) -> Result<Resolution, SubmitRejected>
    where
        A: Analyzer + ?Sized,
    {
        let request = self.submit(word)?;
        let outcome = analyzer.analyze(request.word(), request.force_update());
        Ok(self.resolve(request.ticket(), outcome))
    }

    /// Shows `definition` for `word` without issuing a request.
    ///
    /// Used for pre-rendered or cached analyses. Any outstanding request is
    /// abandoned and usage counters are left alone.
    pub fn preload(&mut self, word: &str, definition: Definition) {
        if let Some(abandoned) = self.pending.take() {
            debug!(ticket = abandoned.ticket.0; "Abandoning request for preloaded word");
        }
        info!(word; "Preloading definition");
        self.replace_definition(definition, word.trim().to_string());
    }

    /// Records the word the host is now showing, e.g. after navigation.
    ///
    /// Moving to a different word clears the analyzed flag so a submit
    /// analyzes instead of regenerating.
    pub fn set_displayed_word(&mut self, word: Option<&str>) {
        if self.analyzed_word.is_some() && self.analyzed_word.as_deref() != word {
            debug!(word:?; "Displayed word changed, clearing analyzed flag");
            self.has_analyzed = false;
        }
        self.displayed_word = word.map(str::to_string);
    }

    /// Drains queued notifications in the order they were raised.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Closes the usage prompt without opting in.
    pub fn dismiss_prompt(&mut self) -> bool {
        self.usage.dismiss()
    }

    /// Records the opt-in and closes the usage prompt.
    pub fn opt_in(&mut self) {
        self.usage.opt_in();
    }

    fn check_submittable(&self, word: &str) -> Result<String, SubmitRejected> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SubmitRejected::EmptyWord);
        }
        if self.is_loading() {
            debug!(word; "Rejecting submit while loading");
            return Err(SubmitRejected::Busy);
        }
        Ok(word.to_string())
    }

    fn matches_analyzed(&self, word: &str) -> bool {
        SubmitAction::route(self.has_analyzed, self.analyzed_word.as_deref(), word)
            == SubmitAction::Regenerate
    }

    fn start(&mut self, word: String, force_update: bool) -> AnalyzeRequest {
        self.next_ticket += 1;
        let request = AnalyzeRequest {
            ticket: Ticket(self.next_ticket),
            word,
            force_update,
        };

        info!(
            word = request.word.as_str(),
            force_update,
            ticket = self.next_ticket;
            "Submitting analysis"
        );

        self.displayed_word = Some(request.word.clone());
        self.state = ControllerState::Loading;
        self.pending = Some(request.clone());
        request
    }

    fn check_definition(&self, definition: &Definition, word: &str) -> Result<(), EtymonError> {
        let diagnostics = validate::ensure_valid(definition, Some(word), &self.validation)?;
        for diagnostic in &diagnostics {
            warn!(word, code = diagnostic.code().as_str(); "{}", diagnostic.message());
        }
        Ok(())
    }

    fn fail(&mut self) -> Resolution {
        self.notifications.push_back(Notification::failed());
        self.state = ControllerState::Error;
        Resolution::Failed
    }

    fn replace_definition(&mut self, definition: Definition, word: String) {
        trace!(definition:?; "Replacing definition");
        self.definition = definition;
        self.revision += 1;
        self.displayed_word = Some(word.clone());
        self.analyzed_word = Some(word);
        self.has_analyzed = true;
        self.state = ControllerState::Ready;
    }
}

//! The boundary to the external analysis service.
//!
//! An [`Analyzer`] turns a word into an [`AnalyzeOutcome`]. The crate never
//! talks to the service itself; hosts implement the trait over whatever
//! transport they have, or feed outcomes to the controller directly.

use log::debug;

use etymon_core::definition::Definition;

/// HTTP status the service uses to flag a degraded result.
pub const DEGRADED_STATUS: u16 = 203;

/// Result of one analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeOutcome {
    /// The service produced a definition.
    Complete(Definition),

    /// The service produced a definition but had trouble doing so.
    Degraded(Definition),

    /// No definition was produced.
    Failed { reason: String },
}

impl AnalyzeOutcome {
    /// Creates a failed outcome.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Interprets an HTTP-style response.
    ///
    /// Any status outside `200..300` fails with the body as the reason.
    /// [`DEGRADED_STATUS`] yields a degraded result. A body that does not
    /// parse as a definition fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use etymon::analyze::AnalyzeOutcome;
    /// let outcome = AnalyzeOutcome::from_response(500, "upstream timeout");
    /// assert!(outcome.is_failure());
    /// ```
    pub fn from_response(status: u16, body: &str) -> Self {
        if !(200..300).contains(&status) {
            debug!(status; "Analysis request failed");
            return Self::failed(body);
        }

        match serde_json::from_str::<Definition>(body) {
            Ok(definition) if status == DEGRADED_STATUS => Self::Degraded(definition),
            Ok(definition) => Self::Complete(definition),
            Err(err) => {
                debug!(status, err:%; "Analysis response is not a definition");
                Self::failed(format!("malformed definition: {err}"))
            }
        }
    }

    /// Returns the definition carried by a successful outcome.
    pub fn definition(&self) -> Option<&Definition> {
        match self {
            Self::Complete(definition) | Self::Degraded(definition) => Some(definition),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Produces definitions for words.
pub trait Analyzer {
    /// Analyzes `word`.
    ///
    /// `force_update` asks the service to bypass any cached answer and
    /// produce a fresh analysis.
    fn analyze(&mut self, word: &str, force_update: bool) -> AnalyzeOutcome;
}

impl<F> Analyzer for F
where
    F: FnMut(&str, bool) -> AnalyzeOutcome,
{
    fn analyze(&mut self, word: &str, force_update: bool) -> AnalyzeOutcome {
        self(word, force_update)
    }
}

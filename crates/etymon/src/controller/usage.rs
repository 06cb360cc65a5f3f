//! Usage-gated prompt.
//!
//! Every successful analysis bumps a persistent counter. When the counter
//! reaches the first threshold, and every interval after that, a non-blocking
//! prompt opens, unless the user has already opted in. Each threshold fires
//! at most once: the counter value of the last prompt is persisted too.
//!
//! Store write failures are logged and otherwise ignored; the in-memory
//! counters stay authoritative for the session.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::UsageConfig,
    store::{self, KeyValueStore},
};

const USAGE_COUNT_KEY: &str = "usage_count";
const DISMISS_COUNT_KEY: &str = "prompt_dismiss_count";
const OPTED_IN_KEY: &str = "opted_in";
const LAST_PROMPTED_AT_KEY: &str = "last_prompted_at";

/// Why a prompt opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PromptTrigger {
    /// The first threshold was reached.
    Initial,
    /// A later multiple of the interval was reached.
    Recurring,
}

/// An open usage prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePrompt {
    word_count: u64,
    dismiss_count: u64,
    trigger: PromptTrigger,
}

impl UsagePrompt {
    /// Number of successful analyses when the prompt opened.
    pub fn word_count(&self) -> u64 {
        self.word_count
    }

    /// Number of earlier prompts the user dismissed.
    pub fn dismiss_count(&self) -> u64 {
        self.dismiss_count
    }

    pub fn trigger(&self) -> PromptTrigger {
        self.trigger
    }

    pub fn title(&self) -> &'static str {
        if self.dismiss_count > 0 {
            "Still interested in updates?"
        } else {
            "Word Explorer Milestone!"
        }
    }

    pub fn message(&self) -> String {
        if self.dismiss_count > 0 {
            format!(
                "You've now deconstructed {} words! We'd love to keep you updated on new features and improvements.",
                self.word_count
            )
        } else {
            format!(
                "You've deconstructed {} words! Enter your email to continue your language journey and get notified about new features.",
                self.word_count
            )
        }
    }
}

/// Persistent counters behind the prompt.
pub struct UsageGate {
    store: Box<dyn KeyValueStore>,
    config: UsageConfig,
    usage_count: u64,
    dismiss_count: u64,
    opted_in: bool,
    last_prompted_at: Option<u64>,
    open_prompt: Option<UsagePrompt>,
}

impl UsageGate {
    /// Creates a gate, reading the current counters from `store`.
    pub fn new(store: Box<dyn KeyValueStore>, config: UsageConfig) -> Self {
        let usage_count = store::get_or(store.as_ref(), USAGE_COUNT_KEY, 0);
        let dismiss_count = store::get_or(store.as_ref(), DISMISS_COUNT_KEY, 0);
        let opted_in = store::get_or(store.as_ref(), OPTED_IN_KEY, false);
        let last_prompted_at = store::get_or(store.as_ref(), LAST_PROMPTED_AT_KEY, None);

        debug!(
            usage_count,
            dismiss_count,
            opted_in;
            "Loaded usage counters"
        );

        Self {
            store,
            config,
            usage_count,
            dismiss_count,
            opted_in,
            last_prompted_at,
            open_prompt: None,
        }
    }

    pub fn usage_count(&self) -> u64 {
        self.usage_count
    }

    pub fn dismiss_count(&self) -> u64 {
        self.dismiss_count
    }

    pub fn is_opted_in(&self) -> bool {
        self.opted_in
    }

    /// The prompt currently shown, if any.
    pub fn open_prompt(&self) -> Option<&UsagePrompt> {
        self.open_prompt.as_ref()
    }

    /// Counts one successful analysis and opens the prompt on a threshold.
    ///
    /// Returns the prompt when this call opened it.
    pub fn record_success(&mut self) -> Option<UsagePrompt> {
        self.usage_count += 1;
        persist(self.store.as_mut(), USAGE_COUNT_KEY, &self.usage_count);

        if self.opted_in || self.last_prompted_at == Some(self.usage_count) {
            return None;
        }

        let trigger = self.trigger_for(self.usage_count)?;
        let prompt = UsagePrompt {
            word_count: self.usage_count,
            dismiss_count: self.dismiss_count,
            trigger,
        };

        self.last_prompted_at = Some(self.usage_count);
        persist(self.store.as_mut(), LAST_PROMPTED_AT_KEY, &self.last_prompted_at);
        self.open_prompt = Some(prompt.clone());

        info!(word_count = prompt.word_count, trigger:? = prompt.trigger; "Usage prompt opened");
        Some(prompt)
    }

    /// Closes the open prompt without opting in.
    ///
    /// Returns `false` when no prompt was open.
    pub fn dismiss(&mut self) -> bool {
        if self.open_prompt.take().is_none() {
            return false;
        }

        self.dismiss_count += 1;
        persist(self.store.as_mut(), DISMISS_COUNT_KEY, &self.dismiss_count);
        debug!(dismiss_count = self.dismiss_count; "Usage prompt dismissed");
        true
    }

    /// Records that the user opted in. No further prompts open.
    pub fn opt_in(&mut self) {
        self.open_prompt = None;
        if !self.opted_in {
            self.opted_in = true;
            persist(self.store.as_mut(), OPTED_IN_KEY, &true);
            info!("User opted in to updates");
        }
    }

    fn trigger_for(&self, count: u64) -> Option<PromptTrigger> {
        let first = self.config.first_prompt_at();
        let interval = self.config.prompt_interval();

        if count == first {
            Some(PromptTrigger::Initial)
        } else if count > first && (count - first) % interval == 0 {
            Some(PromptTrigger::Recurring)
        } else {
            None
        }
    }
}

fn persist<T: Serialize + ?Sized>(store: &mut dyn KeyValueStore, key: &str, value: &T) {
    if let Err(err) = store::set(store, key, value) {
        warn!(key, err:%; "Failed to persist usage counter");
    }
}

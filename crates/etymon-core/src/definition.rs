//! The word decomposition model.
//!
//! A [`Definition`] describes how a word breaks down into leaf morphemes
//! ([`MorphemePart`]) and how those parts recombine, layer by layer, into
//! composite terms ([`Combination`]) until the last layer yields the word
//! itself.
//!
//! # Wire format
//!
//! Definitions (de)serialize with `serde` using the JSON shape produced by the
//! analysis service:
//!
//! ```text
//! { "thought": "...",
//!   "parts": [{"id", "text", "originalWord", "origin", "meaning"}],
//!   "combinations": [[{"id", "text", "definition", "sourceIds": [..]}]] }
//! ```
//!
//! `combinations` is layer-ordered: each inner list holds the combinations that
//! share a layer. A combination may only draw on parts or on combinations of
//! strictly earlier layers.

use serde::{Deserialize, Serialize};

/// A leaf fragment of the analyzed word with its source language and gloss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphemePart {
    id: String,
    text: String,
    original_word: String,
    origin: String,
    meaning: String,
}

impl MorphemePart {
    /// Creates a new part.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier, unique within the definition
    /// * `text` - The fragment as it appears in the analyzed word
    /// * `original_word` - The source-language word the fragment descends from
    /// * `origin` - The source language
    /// * `meaning` - A short gloss
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        original_word: impl Into<String>,
        origin: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            original_word: original_word.into(),
            origin: origin.into(),
            meaning: meaning.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
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

/// A composite term formed from parts or earlier combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    id: String,
    text: String,
    definition: String,
    #[serde(default)]
    source_ids: Vec<String>,
}

impl Combination {
    /// Creates a new combination drawing on the given sources, in order.
    pub fn new<I, S>(
        id: impl Into<String>,
        text: impl Into<String>,
        definition: impl Into<String>,
        source_ids: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            definition: definition.into(),
            source_ids: source_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Returns the ids this combination is built from, in order.
    pub fn source_ids(&self) -> &[String] {
        &self.source_ids
    }
}

/// The complete decomposition of a word.
///
/// # Examples
///
/// ```
/// # use etymon_core::definition::Definition;
/// let definition = Definition::placeholder();
/// assert_eq!(definition.parts().len(), 3);
/// assert_eq!(definition.layers().len(), 2);
/// assert_eq!(definition.final_combination().map(|c| c.text()), Some("deconstructor"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Free-form rationale from the analysis. Never rendered.
    #[serde(default)]
    thought: String,
    parts: Vec<MorphemePart>,
    #[serde(rename = "combinations", default)]
    layers: Vec<Vec<Combination>>,
}

impl Definition {
    /// Creates a definition from its parts and layer-ordered combinations.
    pub fn new(
        thought: impl Into<String>,
        parts: Vec<MorphemePart>,
        layers: Vec<Vec<Combination>>,
    ) -> Self {
        Self {
            thought: thought.into(),
            parts,
            layers,
        }
    }

    /// The definition shown before anything has been analyzed.
    ///
    /// Decomposes "deconstructor" into `de` + `construc` + `tor`, combining
    /// `construc` and `tor` into "constructor" first.
    pub fn placeholder() -> Self {
        Self::new(
            "",
            vec![
                MorphemePart::new("de", "de", "de-", "Latin", "down, off, away"),
                MorphemePart::new(
                    "construc",
                    "construc",
                    "construere",
                    "Latin",
                    "to build, to pile up",
                ),
                MorphemePart::new(
                    "tor",
                    "tor",
                    "-or",
                    "Latin",
                    "agent noun, one who does an action",
                ),
            ],
            vec![
                vec![Combination::new(
                    "constructor",
                    "constructor",
                    "one who constructs or builds",
                    ["construc", "tor"],
                )],
                vec![Combination::new(
                    "deconstructor",
                    "deconstructor",
                    "one who takes apart or analyzes the construction of something",
                    ["de", "constructor"],
                )],
            ],
        )
    }

    pub fn thought(&self) -> &str {
        &self.thought
    }

    pub fn parts(&self) -> &[MorphemePart] {
        &self.parts
    }

    /// Returns the combination layers in ascending order.
    pub fn layers(&self) -> &[Vec<Combination>] {
        &self.layers
    }

    /// Iterates over every combination together with its layer index.
    pub fn combinations(&self) -> impl Iterator<Item = (usize, &Combination)> {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(layer_idx, layer)| layer.iter().map(move |c| (layer_idx, c)))
    }

    /// Returns the part with the given id, if any.
    pub fn part(&self, id: &str) -> Option<&MorphemePart> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// Returns the single combination of the final layer.
    ///
    /// `None` when there are no layers or the final layer does not hold
    /// exactly one combination.
    pub fn final_combination(&self) -> Option<&Combination> {
        match self.layers.last().map(Vec::as_slice) {
            Some([single]) => Some(single),
            _ => None,
        }
    }

    /// Total number of combinations across all layers.
    pub fn combination_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Total number of source references across all combinations.
    pub fn source_reference_count(&self) -> usize {
        self.combinations()
            .map(|(_, combination)| combination.source_ids.len())
            .sum()
    }
}

impl Default for Definition {
    fn default() -> Self {
        Self::placeholder()
    }
}

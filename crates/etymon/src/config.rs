//! Configuration types for Etymon.
//!
//! This module provides configuration structures that control how word graphs
//! are laid out, when the usage prompt appears and how strictly definitions
//! are checked. All types implement [`serde::Deserialize`] for flexible loading
//! from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Gaps used by the layered layout.
//! - [`UsageConfig`] - Usage prompt thresholds.
//! - [`ViewportConfig`] - Viewport framing options.
//! - [`ValidationConfig`] - How definition diagnostics are treated.
//!
//! # Example
//!
//! ```
//! # use etymon::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().vertical_gap(), 50.0);
//! assert_eq!(config.usage().prompt_interval(), 5);
//! ```

use serde::Deserialize;

/// Top-level configuration combining all sections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Usage prompt configuration section.
    #[serde(default)]
    usage: UsageConfig,

    /// Viewport configuration section.
    #[serde(default)]
    viewport: ViewportConfig,

    /// Validation configuration section.
    #[serde(default)]
    validation: ValidationConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        usage: UsageConfig,
        viewport: ViewportConfig,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            layout,
            usage,
            viewport,
            validation,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the usage prompt configuration.
    pub fn usage(&self) -> &UsageConfig {
        &self.usage
    }

    /// Returns the viewport configuration.
    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    /// Returns the validation configuration.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

/// Gaps used by the layered layout, in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between part chunks.
    chunk_gap: f32,

    /// Horizontal gap between origin nodes.
    origin_gap: f32,

    /// Horizontal gap between combinations of one layer.
    combination_gap: f32,

    /// Vertical gap between consecutive layers.
    vertical_gap: f32,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(chunk_gap: f32, origin_gap: f32, combination_gap: f32, vertical_gap: f32) -> Self {
        Self {
            chunk_gap,
            origin_gap,
            combination_gap,
            vertical_gap,
        }
    }

    pub fn chunk_gap(&self) -> f32 {
        self.chunk_gap
    }

    pub fn origin_gap(&self) -> f32 {
        self.origin_gap
    }

    pub fn combination_gap(&self) -> f32 {
        self.combination_gap
    }

    pub fn vertical_gap(&self) -> f32 {
        self.vertical_gap
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chunk_gap: 3.0,
            origin_gap: 10.0,
            combination_gap: 10.0,
            vertical_gap: 50.0,
        }
    }
}

/// When the usage prompt appears.
///
/// The prompt fires when the success counter reaches `first_prompt_at`, and
/// again every `prompt_interval` successes after that.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    first_prompt_at: u64,
    prompt_interval: u64,
}

impl UsageConfig {
    /// Creates a new [`UsageConfig`].
    ///
    /// An interval of zero is treated as one.
    pub fn new(first_prompt_at: u64, prompt_interval: u64) -> Self {
        Self {
            first_prompt_at,
            prompt_interval,
        }
    }

    pub fn first_prompt_at(&self) -> u64 {
        self.first_prompt_at
    }

    pub fn prompt_interval(&self) -> u64 {
        self.prompt_interval.max(1)
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            first_prompt_at: 5,
            prompt_interval: 5,
        }
    }
}

/// Viewport framing options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Duration of the animated fit, in milliseconds. Zero disables animation.
    fit_duration_ms: u32,
}

impl ViewportConfig {
    pub fn new(fit_duration_ms: u32) -> Self {
        Self { fit_duration_ms }
    }

    pub fn fit_duration_ms(&self) -> u32 {
        self.fit_duration_ms
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fit_duration_ms: 1000,
        }
    }
}

/// How definition diagnostics are treated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject definitions that produce any diagnostic, warnings included.
    strict: bool,
}

impl ValidationConfig {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

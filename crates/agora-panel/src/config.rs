#![forbid(unsafe_code)]

//! Tunables for the sticky panel.
//!
//! Defaults match the behavior of the proposal page as shipped, so
//! `StickyConfig::default()` needs no file at all.
//!
//! ```toml
//! # agora-panel.toml
//! anticipation_margin = 4.0
//! fixed_class = "is-panel-fixed"
//! remeasure_header_on_resize = false
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Pixels before the header edge at which the panel starts pinning.
pub const DEFAULT_ANTICIPATION_MARGIN: f64 = 4.0;

/// Class marker appended to a pinned panel.
pub const DEFAULT_FIXED_CLASS: &str = "is-panel-fixed";

/// Sticky panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickyConfig {
    /// The panel pins once its top is closer than this to the header's
    /// bottom edge, so it engages slightly before touching.
    pub anticipation_margin: f64,

    /// Class name added to the panel while pinned.
    pub fixed_class: String,

    /// Re-measure the header on every resize instead of once at mount.
    pub remeasure_header_on_resize: bool,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            anticipation_margin: DEFAULT_ANTICIPATION_MARGIN,
            fixed_class: DEFAULT_FIXED_CLASS.to_owned(),
            remeasure_header_on_resize: false,
        }
    }
}

impl StickyConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)?.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)?.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.anticipation_margin.is_finite() || self.anticipation_margin < 0.0 {
            errors.push(format!(
                "anticipation_margin must be a finite, non-negative number, got {}",
                self.anticipation_margin
            ));
        }

        let class = self.fixed_class.trim();
        if class.is_empty() {
            errors.push("fixed_class must not be empty".into());
        } else if class.contains(char::is_whitespace) {
            errors.push(format!(
                "fixed_class must be a single class name, got {:?}",
                self.fixed_class
            ));
        }

        errors
    }

    /// Return `self` if valid, otherwise every validation failure.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

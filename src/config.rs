//! Keyboard engine configuration
//!
//! Stored in `~/.config/keychord/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::keymap::KeymapError;

/// Tunables for sequence timing and the text-input guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Idle time after which a half-typed sequence is abandoned
    #[serde(default = "default_sequence_timeout_ms")]
    pub sequence_timeout_ms: u64,

    /// Delay before all sequences reset after one completes
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Ignore keys typed into input, select and textarea targets
    #[serde(default = "default_guard_text_inputs")]
    pub guard_text_inputs: bool,

    /// Class that opts a text input back into key handling
    #[serde(default = "default_opt_in_class")]
    pub opt_in_class: String,
}

fn default_sequence_timeout_ms() -> u64 {
    1000
}

fn default_settle_delay_ms() -> u64 {
    10
}

fn default_guard_text_inputs() -> bool {
    true
}

fn default_opt_in_class() -> String {
    "keychord".to_string()
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            sequence_timeout_ms: default_sequence_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            guard_text_inputs: default_guard_text_inputs(),
            opt_in_class: default_opt_in_class(),
        }
    }
}

impl KeyboardConfig {
    pub fn sequence_timeout(&self) -> Duration {
        Duration::from_millis(self.sequence_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Parse a config from YAML, missing fields take their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, KeymapError> {
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, KeymapError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

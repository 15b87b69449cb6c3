//! YAML configuration parsing for keymaps
//!
//! A keymap file maps combo strings to command names:
//!
//! ```yaml
//! bindings:
//!   - keys: "g i"
//!     command: GoToInbox
//!   - keys: "shift"
//!     command: ShiftReleased
//!     action: keyup
//! ```

use std::path::Path;

use serde::Deserialize;

use super::types::KeyAction;

/// Command name that removes a binding when layered over another keymap
pub const UNBOUND: &str = "Unbound";

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    pub bindings: Vec<BindingConfig>,
}

/// A single binding entry from YAML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BindingConfig {
    /// Combo string, comma-joined list of combos, or sequence
    pub keys: String,
    pub command: String,
    #[serde(default)]
    pub action: KeyAction,
    #[serde(default)]
    pub platform: Option<String>,
}

impl BindingConfig {
    pub fn new(keys: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            keys: keys.into(),
            command: command.into(),
            action: KeyAction::KeyDown,
            platform: None,
        }
    }

    /// Check if this entry removes rather than adds a binding
    pub fn is_unbound(&self) -> bool {
        self.command == UNBOUND
    }

    /// Check if this entry targets the same keys and action as `other`
    pub fn same_trigger(&self, other: &BindingConfig) -> bool {
        self.keys == other.keys && self.action == other.action
    }
}

/// Load keymap entries from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<BindingConfig>, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    parse_keymap_yaml(&content)
}

/// Parse keymap entries from a YAML string
///
/// Entries for other platforms are dropped.
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<BindingConfig>, KeymapError> {
    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;

    let current_platform = get_current_platform();
    let mut bindings = Vec::with_capacity(config.bindings.len());

    for entry in config.bindings {
        if let Some(ref platform) = entry.platform {
            if platform != current_platform {
                continue;
            }
        }

        if entry.keys.trim().is_empty() {
            return Err(KeymapError::InvalidKey(format!(
                "Empty keys for command {}",
                entry.command
            )));
        }
        if entry.command.trim().is_empty() {
            return Err(KeymapError::InvalidCommand(format!(
                "Empty command for keys {}",
                entry.keys
            )));
        }

        bindings.push(entry);
    }

    Ok(bindings)
}

/// Get the current platform identifier
fn get_current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

/// Errors that can occur when loading keymaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    IoError(String),
    ParseError(String),
    InvalidKey(String),
    InvalidCommand(String),
}

impl std::fmt::Display for KeymapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeymapError::IoError(e) => write!(f, "IO error: {}", e),
            KeymapError::ParseError(e) => write!(f, "Parse error: {}", e),
            KeymapError::InvalidKey(k) => write!(f, "Invalid key: {}", k),
            KeymapError::InvalidCommand(c) => write!(f, "Invalid command: {}", c),
        }
    }
}

impl std::error::Error for KeymapError {}

//! Default keymap and layered loading
//!
//! The embedded `keymap.yaml` ships with the crate. A project-local
//! `keymap.yaml` and the user's keymap are layered on top of it.

use std::path::Path;

use super::config::{load_keymap_file, parse_keymap_yaml, BindingConfig};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// Load and merge keymaps: defaults + overrides
///
/// Loading order (each layer overrides the previous):
/// 1. Embedded default keymap (compiled into binary)
/// 2. keymap.yaml in current directory (project-local overrides)
/// 3. User config at ~/.config/keychord/keymap.yaml
///
/// Entries with `command: Unbound` remove matching entries from lower layers.
pub fn load_default_keymap() -> Vec<BindingConfig> {
    let mut bindings = match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(b) => {
            tracing::info!("Loaded embedded default keymap ({} bindings)", b.len());
            b
        }
        Err(e) => {
            tracing::warn!("Failed to parse embedded keymap: {}", e);
            Vec::new()
        }
    };

    if let Ok(local_bindings) = load_keymap_file(Path::new("keymap.yaml")) {
        tracing::info!(
            "Merging project keymap.yaml ({} bindings)",
            local_bindings.len()
        );
        bindings = merge_bindings(bindings, local_bindings);
    }

    if let Some(user_path) = crate::config_paths::keymap_file() {
        if user_path.exists() {
            match load_keymap_file(&user_path) {
                Ok(user_bindings) => {
                    tracing::info!(
                        "Merging user keymap from {} ({} bindings)",
                        user_path.display(),
                        user_bindings.len()
                    );
                    bindings = merge_bindings(bindings, user_bindings);
                }
                Err(e) => {
                    tracing::warn!("Failed to load user keymap from {}: {}", user_path.display(), e);
                }
            }
        }
    }

    bindings
}

/// Merge override entries into base entries
///
/// - Same keys + action → replaces the base entry
/// - `Unbound` command → removes matching base entries
/// - Otherwise → appended
pub fn merge_bindings(base: Vec<BindingConfig>, overrides: Vec<BindingConfig>) -> Vec<BindingConfig> {
    let mut result = base;

    for entry in overrides {
        if entry.is_unbound() {
            result.retain(|b| !b.same_trigger(&entry));
            continue;
        }

        match result.iter().position(|b| b.same_trigger(&entry)) {
            Some(idx) => result[idx] = entry,
            None => result.push(entry),
        }
    }

    result
}

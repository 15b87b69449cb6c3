//! Command-line argument parsing for the demo binary
//!
//! Supports:
//! - Replacing the layered keymap with a single file
//! - Loading engine config from a specific file
//! - Listing the bound keymap without opening a window

use clap::Parser;
use std::path::PathBuf;

use crate::config::KeyboardConfig;
use crate::keymap::{load_default_keymap, load_keymap_file, BindingConfig, KeymapError};

/// Open a window and log every shortcut it recognizes
#[derive(Parser, Debug)]
#[command(name = "keychord", version, about = "Keyboard shortcut demo")]
pub struct CliArgs {
    /// Keymap file to use instead of the layered defaults
    #[arg(short, long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Engine config file (default: ~/.config/keychord/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the bound keymap and exit
    #[arg(short, long)]
    pub list: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub keyboard: KeyboardConfig,
    pub keymap: Vec<BindingConfig>,
    /// Print bindings instead of opening a window
    pub list_only: bool,
}

impl CliArgs {
    /// Load the files named by the arguments
    ///
    /// An explicitly named file that fails to load is an error; the
    /// layered defaults fall back silently.
    pub fn into_config(self) -> Result<StartupConfig, KeymapError> {
        let keyboard = match &self.config {
            Some(path) => KeyboardConfig::load_from(path)?,
            None => KeyboardConfig::load(),
        };

        let keymap = match &self.keymap {
            Some(path) => {
                let bindings = load_keymap_file(path)?;
                tracing::info!(
                    "Loaded keymap from {} ({} bindings)",
                    path.display(),
                    bindings.len()
                );
                bindings
            }
            None => load_default_keymap(),
        };

        Ok(StartupConfig {
            keyboard,
            keymap,
            list_only: self.list,
        })
    }
}

//! keychord - keyboard shortcut engine
//!
//! Binds combo strings such as `"ctrl+shift+k"` or `"g i"` to callbacks
//! and dispatches raw key events to them, tracking multi-key sequences
//! with host-polled reset timers.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod keymap;
pub mod runtime;
pub mod tracing;

// Re-export commonly used types
pub use config::KeyboardConfig;
pub use keymap::{Dispatch, KeyAction, KeyEvent, Keyboard, Propagation};

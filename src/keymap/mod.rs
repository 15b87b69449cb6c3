//! Keyboard shortcut engine
//!
//! This module binds combo strings to callbacks and dispatches raw key
//! events to them:
//! - Single keys with modifiers (`"ctrl+shift+k"`, `"?"`)
//! - Multi-key sequences (`"g i"`, `"up up down down left right left right b a enter"`)
//! - Key-down and key-up bindings, including bare modifiers
//! - Data-driven keymaps loaded from layered YAML files
//!
//! # Architecture
//!
//! ```text
//! winit event → KeyEvent → Keyboard::handle_event() → Registry::matches() → callbacks
//!                                    ↘ SequenceTracker / SequenceTimers
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut keyboard = Keyboard::new();
//! keyboard.bind("g i", |_| {
//!     println!("go to inbox");
//!     Ok(Propagation::Continue)
//! });
//!
//! keyboard.handle_event(&KeyEvent::down(71))?;
//! keyboard.handle_event(&KeyEvent::down(73))?;
//! ```

mod attach;
mod binding;
mod combo;
mod config;
mod defaults;
mod keyboard;
mod registry;
mod sequence;
mod symbols;
mod timer;
mod types;
mod winit_adapter;

pub use attach::{AttachError, Attached};
pub use binding::{
    callback, Binding, BindingKind, Callback, Deferred, DeferredOp, Invocation, Propagation,
    SequenceStep,
};
pub use combo::{compile, compile_stroke, normalize_whitespace, split_combos, Combo, Stroke};
pub use config::{load_keymap_file, parse_keymap_yaml, BindingConfig, KeymapError, UNBOUND};
pub use defaults::{get_default_keymap_yaml, load_default_keymap, merge_bindings};
pub use keyboard::{Dispatch, Keyboard, Keys, StopPolicy};
pub use registry::Registry;
pub use sequence::SequenceTracker;
pub use timer::SequenceTimers;
pub use types::{KeyAction, KeyCode, KeyEvent, ModifierSet, Target};
pub use winit_adapter::{key_code_from_winit, key_event_from_winit};

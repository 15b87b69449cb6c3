//! Runtime module - winit integration for the demo binary
//!
//! - `app` - ApplicationHandler, window management and command callbacks

pub mod app;

pub use app::{build_keyboard, App};

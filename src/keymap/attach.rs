//! A keyboard attached to a single event target

use std::fmt;

use super::keyboard::{Dispatch, Keyboard};
use super::types::KeyEvent;

/// Errors that can occur when attaching a keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    MissingTarget,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::MissingTarget => write!(f, "No target to attach the keyboard to"),
        }
    }
}

impl std::error::Error for AttachError {}

/// A [`Keyboard`] that only reacts to events from one target
///
/// `T` is whatever identifies an event source to the host, such as a
/// winit `WindowId`.
#[derive(Debug)]
pub struct Attached<T> {
    target: T,
    keyboard: Keyboard,
}

impl<T: PartialEq + fmt::Debug> Attached<T> {
    pub fn new(target: Option<T>, keyboard: Keyboard) -> Result<Self, AttachError> {
        let target = target.ok_or(AttachError::MissingTarget)?;
        tracing::debug!("Keyboard attached to {:?}", target);
        Ok(Self { target, keyboard })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn into_keyboard(self) -> Keyboard {
        self.keyboard
    }

    /// Dispatch an event if it came from the attached target
    ///
    /// Returns `Ok(None)` for events from any other target.
    pub fn deliver(&mut self, target: &T, event: &KeyEvent) -> anyhow::Result<Option<Dispatch>> {
        if *target != self.target {
            return Ok(None);
        }
        self.keyboard.handle_event(event).map(Some)
    }
}

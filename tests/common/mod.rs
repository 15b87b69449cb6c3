//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use keychord::keymap::{Invocation, KeyEvent, Keyboard, Propagation};

pub const A: u32 = 65;
pub const B: u32 = 66;
pub const G: u32 = 71;
pub const I: u32 = 73;
pub const S: u32 = 83;
pub const T: u32 = 84;

/// Records the label of every callback that fires, in order
#[derive(Clone, Default)]
pub struct Recorder {
    fired: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that appends `label` when invoked
    pub fn cb(&self, label: &str) -> impl Fn(&Invocation<'_>) -> anyhow::Result<Propagation> {
        let fired = Rc::clone(&self.fired);
        let label = label.to_string();
        move |_| {
            fired.borrow_mut().push(label.clone());
            Ok(Propagation::Continue)
        }
    }

    /// Everything fired since the last call
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.fired.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.fired.borrow().is_empty()
    }
}

/// Dispatch a key-down event, panicking on callback errors
pub fn press(keyboard: &mut Keyboard, code: u32) {
    keyboard.handle_event(&KeyEvent::down(code)).unwrap();
}

/// Dispatch a key-up event, panicking on callback errors
pub fn release(keyboard: &mut Keyboard, code: u32) {
    keyboard.handle_event(&KeyEvent::up(code)).unwrap();
}

/// Dispatch an arbitrary event, panicking on callback errors
pub fn send(keyboard: &mut Keyboard, event: KeyEvent) {
    keyboard.handle_event(&event).unwrap();
}

/// Run only the earliest pending timer, as if its deadline just passed
pub fn expire_next(keyboard: &mut Keyboard) -> bool {
    match keyboard.next_deadline() {
        Some(deadline) => keyboard.poll_timers(deadline),
        None => false,
    }
}

/// Run every pending timer
pub fn expire_all(keyboard: &mut Keyboard) -> bool {
    keyboard.poll_timers(Instant::now() + Duration::from_secs(60))
}

//! Binding struct tying a compiled keystroke to a callback

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::combo::Stroke;
use super::keyboard::Keys;
use super::types::{KeyAction, KeyCode, KeyEvent, ModifierSet};

/// What a callback asks the host to do with the key after it ran
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Let the key reach the focused widget as usual
    #[default]
    Continue,
    /// Swallow the key: prevent its default handling
    Stop,
}

/// Arguments handed to a callback
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    /// The event that matched, `None` when invoked through `trigger`
    pub event: Option<&'a KeyEvent>,
    /// The combo string the callback was bound under
    pub combo: &'a str,
    /// Binding changes requested by the callback
    pub keyboard: &'a Deferred,
}

/// A binding change queued from inside a callback
pub enum DeferredOp {
    Bind {
        keys: Keys,
        callback: Callback,
        action: KeyAction,
    },
    Unbind {
        keys: Keys,
        action: KeyAction,
    },
    Reset,
}

/// Binding API available to callbacks while a dispatch is running
///
/// The keyboard applies queued operations in order once the current
/// `handle_event` or `trigger` call has finished matching, so the
/// registry never changes under a match query.
#[derive(Default)]
pub struct Deferred {
    ops: RefCell<Vec<DeferredOp>>,
}

impl Deferred {
    /// Queue a key-down binding
    pub fn bind<F>(&self, keys: impl Into<Keys>, f: F)
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<Propagation> + 'static,
    {
        self.bind_action(keys, f, KeyAction::KeyDown);
    }

    pub fn bind_action<F>(&self, keys: impl Into<Keys>, f: F, action: KeyAction)
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<Propagation> + 'static,
    {
        self.push(DeferredOp::Bind {
            keys: keys.into(),
            callback: callback(f),
            action,
        });
    }

    pub fn unbind(&self, keys: impl Into<Keys>, action: KeyAction) {
        self.push(DeferredOp::Unbind {
            keys: keys.into(),
            action,
        });
    }

    /// Queue dropping every binding
    pub fn reset(&self) {
        self.push(DeferredOp::Reset);
    }

    fn push(&self, op: DeferredOp) {
        self.ops.borrow_mut().push(op);
    }

    /// Remove and return everything queued so far
    pub(crate) fn drain(&self) -> Vec<DeferredOp> {
        std::mem::take(&mut *self.ops.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.borrow().is_empty()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("queued", &self.len())
            .finish()
    }
}

/// A bound callback, shared between the registry and the direct map
pub type Callback = Rc<dyn Fn(&Invocation<'_>) -> anyhow::Result<Propagation>>;

/// Wrap a closure as a [`Callback`]
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Invocation<'_>) -> anyhow::Result<Propagation> + 'static,
{
    Rc::new(f)
}

/// Position of a binding inside a multi-key sequence
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceStep {
    /// Name shared by every step (the normalized combo string)
    pub sequence: Rc<str>,
    /// Progress level the sequence must be at for this step to match
    pub level: usize,
    /// The final step runs the user callback instead of advancing
    pub last: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Direct,
    Step(SequenceStep),
}

/// A single registered binding
#[derive(Clone)]
pub struct Binding {
    pub key: KeyCode,
    pub modifiers: ModifierSet,
    pub action: KeyAction,
    /// Combo string passed back to the callback
    pub combo: Rc<str>,
    pub kind: BindingKind,
    pub callback: Callback,
}

impl Binding {
    /// Create a direct (non-sequence) binding
    pub fn direct(stroke: Stroke, action: KeyAction, combo: &str, callback: Callback) -> Self {
        Self {
            key: stroke.key,
            modifiers: stroke.modifiers,
            action,
            combo: Rc::from(combo),
            kind: BindingKind::Direct,
            callback,
        }
    }

    /// Create one step of a sequence
    pub fn step(
        stroke: Stroke,
        action: KeyAction,
        step: SequenceStep,
        callback: Callback,
    ) -> Self {
        Self {
            key: stroke.key,
            modifiers: stroke.modifiers,
            action,
            combo: step.sequence.clone(),
            kind: BindingKind::Step(step),
            callback,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.kind, BindingKind::Direct)
    }

    pub fn sequence_step(&self) -> Option<&SequenceStep> {
        match &self.kind {
            BindingKind::Direct => None,
            BindingKind::Step(step) => Some(step),
        }
    }

    /// Check if this binding reacts to the given key state
    pub fn matches(&self, modifiers: &ModifierSet, action: KeyAction) -> bool {
        self.action == action && self.modifiers == *modifiers
    }

    /// Check if registering `self` replaces `existing`
    ///
    /// Both must react to the same key state. A direct binding replaces
    /// direct bindings; a step replaces the step at the same level of its
    /// sequence.
    pub fn overrides(&self, existing: &Binding) -> bool {
        if self.key != existing.key || !existing.matches(&self.modifiers, self.action) {
            return false;
        }
        match (&self.kind, &existing.kind) {
            (BindingKind::Direct, BindingKind::Direct) => true,
            (BindingKind::Step(new), BindingKind::Step(old)) => {
                new.sequence == old.sequence && new.level == old.level
            }
            _ => false,
        }
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            key: self.key,
            modifiers: self.modifiers.clone(),
        }
    }

    /// Get display string for this binding
    pub fn display_string(&self) -> String {
        match &self.kind {
            BindingKind::Direct => format!("{} [{}]", self.stroke(), self.action),
            BindingKind::Step(step) => format!(
                "{} [{}] step {} of \"{}\"",
                self.stroke(),
                self.action,
                step.level,
                step.sequence
            ),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("key", &self.key)
            .field("modifiers", &self.modifiers)
            .field("action", &self.action)
            .field("combo", &self.combo)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

//! Keyboard engine: binds combos to callbacks and dispatches key events

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use super::binding::{
    callback, Binding, BindingKind, Callback, Deferred, DeferredOp, Invocation, Propagation,
    SequenceStep,
};
use super::combo::{self, Combo};
use super::config::BindingConfig;
use super::registry::Registry;
use super::sequence::SequenceTracker;
use super::timer::SequenceTimers;
use super::types::{KeyAction, KeyEvent};
use super::KeymapError;
use crate::config::KeyboardConfig;

/// The `keys` argument of [`Keyboard::bind`]
///
/// Either one string (possibly several combos joined with commas) or an
/// explicit list of combos.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keys {
    One(String),
    List(Vec<String>),
}

impl Keys {
    /// The individual combos to compile
    pub fn combos(&self) -> Vec<&str> {
        match self {
            Keys::One(keys) => combo::split_combos(keys).collect(),
            Keys::List(list) => list.iter().map(String::as_str).collect(),
        }
    }

    /// Lookup key for [`Keyboard::trigger`]: the unsplit keys plus the action
    pub fn direct_key(&self, action: KeyAction) -> String {
        format!("{}:{}", self, action)
    }
}

impl fmt::Display for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keys::One(keys) => f.write_str(keys),
            Keys::List(list) => f.write_str(&list.join(",")),
        }
    }
}

impl From<&str> for Keys {
    fn from(keys: &str) -> Self {
        Keys::One(keys.to_string())
    }
}

impl From<String> for Keys {
    fn from(keys: String) -> Self {
        Keys::One(keys)
    }
}

impl From<&String> for Keys {
    fn from(keys: &String) -> Self {
        Keys::One(keys.clone())
    }
}

impl From<Vec<String>> for Keys {
    fn from(list: Vec<String>) -> Self {
        Keys::List(list)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(list: Vec<&str>) -> Self {
        Keys::List(list.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(list: &[&str]) -> Self {
        Keys::List(list.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(list: [&str; N]) -> Self {
        Keys::List(list.iter().map(|s| s.to_string()).collect())
    }
}

/// Outcome of dispatching one key event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// User callbacks invoked
    pub fired: usize,
    /// Sequences moved forward without completing
    pub advanced: usize,
    /// A callback returned [`Propagation::Stop`]
    pub default_prevented: bool,
    /// The event was dropped before matching (text input guard)
    pub ignored: bool,
}

impl Dispatch {
    /// Check if the event did anything at all
    pub fn handled(&self) -> bool {
        self.fired > 0 || self.advanced > 0
    }
}

/// Decides whether an event should be dropped before matching
pub type StopPolicy = Box<dyn Fn(&KeyEvent) -> bool>;

/// Registry, sequence state, direct map and timers for one event source
pub struct Keyboard {
    config: KeyboardConfig,
    registry: Registry,
    sequences: SequenceTracker,
    /// `"keys:action"` → most recent callback, for [`Keyboard::trigger`]
    direct: HashMap<String, Callback>,
    timers: SequenceTimers,
    stop_policy: Option<StopPolicy>,
    /// Binding changes queued by callbacks during the current dispatch
    deferred: Deferred,
}

impl Keyboard {
    /// Create a keyboard with default configuration
    pub fn new() -> Self {
        Self::with_config(KeyboardConfig::default())
    }

    pub fn with_config(config: KeyboardConfig) -> Self {
        let timers = SequenceTimers::new(config.sequence_timeout(), config.settle_delay());
        Self {
            config,
            registry: Registry::new(),
            sequences: SequenceTracker::new(),
            direct: HashMap::new(),
            timers,
            stop_policy: None,
            deferred: Deferred::default(),
        }
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Bind keys to a callback on key-down
    pub fn bind<F>(&mut self, keys: impl Into<Keys>, f: F)
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<Propagation> + 'static,
    {
        self.bind_callback(keys, callback(f), KeyAction::KeyDown);
    }

    /// Bind keys to a callback for a specific action
    pub fn bind_action<F>(&mut self, keys: impl Into<Keys>, f: F, action: KeyAction)
    where
        F: Fn(&Invocation<'_>) -> anyhow::Result<Propagation> + 'static,
    {
        self.bind_callback(keys, callback(f), action);
    }

    /// Bind keys to an already shared callback
    pub fn bind_callback(&mut self, keys: impl Into<Keys>, callback: Callback, action: KeyAction) {
        let keys = keys.into();
        for combo in keys.combos() {
            self.bind_combo(combo, callback.clone(), action);
        }
        tracing::debug!("Bound {} [{}]", keys, action);
        self.direct.insert(keys.direct_key(action), callback);
    }

    fn bind_combo(&mut self, combo: &str, callback: Callback, action: KeyAction) {
        let replaced = match combo::compile(combo) {
            Combo::Single(stroke) => self
                .registry
                .add(Binding::direct(stroke, action, combo, callback))
                .len(),
            Combo::Sequence { name, steps } => {
                self.sequences.register(&name);
                let sequence: Rc<str> = Rc::from(name.as_str());
                let last = steps.len() - 1;
                let mut replaced = 0;
                for (level, stroke) in steps.into_iter().enumerate() {
                    let step = SequenceStep {
                        sequence: sequence.clone(),
                        level,
                        last: level == last,
                    };
                    replaced += self
                        .registry
                        .add(Binding::step(stroke, action, step, callback.clone()))
                        .len();
                }
                replaced
            }
        };
        if replaced > 0 {
            tracing::trace!("{} [{}] replaced {} binding(s)", combo, action, replaced);
        }
    }

    /// Replace whatever is bound to `keys` with a no-op
    pub fn unbind(&mut self, keys: impl Into<Keys>, action: KeyAction) {
        self.bind_action(keys, |_| Ok(Propagation::Continue), action);
    }

    /// Bind every keymap entry, resolving command names through `resolve`
    ///
    /// Nothing is bound if any command fails to resolve. `Unbound` entries
    /// unbind their keys. Returns the number of entries applied.
    pub fn bind_keymap<R>(
        &mut self,
        entries: &[BindingConfig],
        mut resolve: R,
    ) -> Result<usize, KeymapError>
    where
        R: FnMut(&str) -> Option<Callback>,
    {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_unbound() {
                resolved.push((entry, None));
                continue;
            }
            let callback = resolve(&entry.command)
                .ok_or_else(|| KeymapError::InvalidCommand(entry.command.clone()))?;
            resolved.push((entry, Some(callback)));
        }

        for (entry, callback) in &resolved {
            match callback {
                Some(callback) => {
                    self.bind_callback(entry.keys.as_str(), callback.clone(), entry.action)
                }
                None => self.unbind(entry.keys.as_str(), entry.action),
            }
        }

        tracing::info!("Bound keymap ({} entries)", resolved.len());
        Ok(resolved.len())
    }

    /// Invoke the callback bound to exactly these keys, without a key event
    ///
    /// Returns `Ok(false)` when nothing was bound under `keys` and `action`.
    pub fn trigger(&mut self, keys: impl Into<Keys>, action: KeyAction) -> anyhow::Result<bool> {
        let keys = keys.into();
        let Some(callback) = self.direct.get(&keys.direct_key(action)).cloned() else {
            tracing::trace!("Nothing to trigger for {} [{}]", keys, action);
            return Ok(false);
        };

        let combo = keys.to_string();
        let result = callback(&Invocation {
            event: None,
            combo: &combo,
            keyboard: &self.deferred,
        });
        self.apply_deferred();
        result.map(|_| true)
    }

    /// Drop every binding and every `trigger` entry
    ///
    /// Sequence progress and pending timers are left alone.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.direct.clear();
        tracing::debug!("Keyboard bindings reset");
    }

    /// Use a custom predicate instead of the text-input guard
    pub fn set_stop_policy<F>(&mut self, policy: F)
    where
        F: Fn(&KeyEvent) -> bool + 'static,
    {
        self.stop_policy = Some(Box::new(policy));
    }

    pub fn clear_stop_policy(&mut self) {
        self.stop_policy = None;
    }

    fn should_stop(&self, event: &KeyEvent) -> bool {
        if let Some(policy) = &self.stop_policy {
            return policy(event);
        }
        if !self.config.guard_text_inputs {
            return false;
        }
        event
            .target
            .as_ref()
            .is_some_and(|t| t.is_text_input() && !t.has_class(&self.config.opt_in_class))
    }

    /// Dispatch one key event
    ///
    /// Every matching sequence step fires. A direct binding fires only when
    /// no step matched and no sequence is in progress, and then only the
    /// first one. The first failing callback aborts dispatch and its error
    /// is returned.
    ///
    /// Binding changes queued through [`Invocation::keyboard`] are applied
    /// after matching ends, whether or not a callback failed.
    pub fn handle_event(&mut self, event: &KeyEvent) -> anyhow::Result<Dispatch> {
        let result = self.dispatch_event(event);
        self.apply_deferred();
        result
    }

    fn dispatch_event(&mut self, event: &KeyEvent) -> anyhow::Result<Dispatch> {
        let now = Instant::now();
        self.poll_timers(now);

        if self.should_stop(event) {
            tracing::trace!(code = event.code, "Key ignored in text input");
            return Ok(Dispatch {
                ignored: true,
                ..Dispatch::default()
            });
        }

        let key = event.key();
        let modifiers = event.modifiers();
        let matched: Vec<Binding> = self
            .registry
            .matches(key, &modifiers, event.action, &self.sequences)
            .cloned()
            .collect();

        tracing::trace!(
            key = %key,
            modifiers = %modifiers,
            action = %event.action,
            matches = matched.len(),
            "Dispatching key event"
        );

        let mut dispatch = Dispatch::default();
        let mut advanced: HashSet<String> = HashSet::new();
        let mut direct_fired = false;

        for binding in &matched {
            match &binding.kind {
                BindingKind::Step(step) => {
                    advanced.insert(step.sequence.to_string());
                    if step.last {
                        Self::fire(binding, event, &self.deferred, &mut dispatch)?;
                        self.sequences.reset(&step.sequence);
                        self.timers.schedule_settle(now);
                        tracing::debug!(sequence = %step.sequence, "Sequence completed");
                    } else {
                        self.sequences.advance(&step.sequence, event.action);
                        self.timers.arm(now);
                        dispatch.advanced += 1;
                    }
                }
                BindingKind::Direct => {
                    if direct_fired || !advanced.is_empty() || self.sequences.is_active() {
                        continue;
                    }
                    direct_fired = true;
                    Self::fire(binding, event, &self.deferred, &mut dispatch)?;
                }
            }
        }

        if self.sequences.inside() == Some(event.action) && !key.is_modifier() {
            self.sequences.reset_all(&advanced);
        }

        Ok(dispatch)
    }

    fn fire(
        binding: &Binding,
        event: &KeyEvent,
        deferred: &Deferred,
        dispatch: &mut Dispatch,
    ) -> anyhow::Result<()> {
        let invocation = Invocation {
            event: Some(event),
            combo: &binding.combo,
            keyboard: deferred,
        };
        if (binding.callback)(&invocation)? == Propagation::Stop {
            dispatch.default_prevented = true;
        }
        dispatch.fired += 1;
        Ok(())
    }

    fn apply_deferred(&mut self) {
        let ops = self.deferred.drain();
        if ops.is_empty() {
            return;
        }
        tracing::debug!("Applying {} binding change(s) from callbacks", ops.len());
        for op in ops {
            match op {
                DeferredOp::Bind {
                    keys,
                    callback,
                    action,
                } => self.bind_callback(keys, callback, action),
                DeferredOp::Unbind { keys, action } => self.unbind(keys, action),
                DeferredOp::Reset => self.reset(),
            }
        }
    }

    /// Run every timer whose deadline has passed
    ///
    /// Any fired timer resets all sequence progress. Returns whether one fired.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let fired = self.timers.take_due(now);
        if fired == 0 {
            return false;
        }
        self.sequences.reset_all(&HashSet::new());
        tracing::debug!("Sequence timer fired ({} due)", fired);
        true
    }

    /// When the host should next call [`Keyboard::poll_timers`]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Progress of a bound sequence (0 when idle or unknown)
    pub fn sequence_level(&self, sequence: &str) -> usize {
        self.sequences.level(&combo::normalize_whitespace(sequence))
    }

    /// Check if a sequence is in progress
    pub fn is_in_sequence(&self) -> bool {
        self.sequences.is_active()
    }

    /// Get the pending sequences (for status bar display)
    pub fn pending_sequence_display(&self) -> Option<String> {
        let mut pending: Vec<String> = self
            .sequences
            .in_progress()
            .map(|(name, level)| {
                let typed: Vec<&str> = name.split(' ').take(level).collect();
                typed.join(" ")
            })
            .collect();
        pending.sort();
        pending.dedup();
        (!pending.is_empty()).then(|| pending.join(" | "))
    }

    /// Number of registered bindings (each sequence step counts)
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Display strings for every binding
    pub fn describe(&self) -> Vec<String> {
        self.registry.iter().map(Binding::display_string).collect()
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyboard")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("sequences", &self.sequences)
            .field("direct", &self.direct.keys().collect::<Vec<_>>())
            .field("timers", &self.timers)
            .field("stop_policy", &self.stop_policy.is_some())
            .field("deferred", &self.deferred)
            .finish()
    }
}

//! Binding registry: bindings grouped by terminal key code

use std::collections::HashMap;

use super::binding::Binding;
use super::sequence::SequenceTracker;
use super::types::{KeyAction, KeyCode, ModifierSet};

/// All registered bindings, indexed by key code
///
/// Within one key code the list is ordered: sequence steps first (newest
/// first), then direct bindings in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    by_key: HashMap<KeyCode, Vec<Binding>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding, replacing whatever it overrides
    ///
    /// See [`Binding::overrides`]. Returns the replaced bindings.
    pub fn add(&mut self, binding: Binding) -> Vec<Binding> {
        let replaced = self.take(&binding);
        let list = self.by_key.entry(binding.key).or_default();
        if binding.is_direct() {
            list.push(binding);
        } else {
            list.insert(0, binding);
        }
        replaced
    }

    /// Every binding on `key` with the given modifiers and action
    pub fn query<'a>(
        &'a self,
        key: KeyCode,
        modifiers: &'a ModifierSet,
        action: KeyAction,
    ) -> impl Iterator<Item = &'a Binding> + 'a {
        self.by_key
            .get(&key)
            .into_iter()
            .flatten()
            .filter(move |binding| binding.matches(modifiers, action))
    }

    /// Like [`Registry::query`], but sequence steps only match when their
    /// sequence has progressed exactly to their level
    pub fn matches<'a>(
        &'a self,
        key: KeyCode,
        modifiers: &'a ModifierSet,
        action: KeyAction,
        sequences: &'a SequenceTracker,
    ) -> impl Iterator<Item = &'a Binding> + 'a {
        self.query(key, modifiers, action)
            .filter(move |binding| match binding.sequence_step() {
                Some(step) => sequences.level(&step.sequence) == step.level,
                None => true,
            })
    }

    /// Remove and return the registered bindings that `binding` overrides
    pub fn take(&mut self, binding: &Binding) -> Vec<Binding> {
        let Some(list) = self.by_key.get_mut(&binding.key) else {
            return Vec::new();
        };
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(list)
            .into_iter()
            .partition(|existing| binding.overrides(existing));
        *list = kept;
        taken
    }

    /// Bindings registered on a key, in match order
    pub fn bindings_for(&self, key: KeyCode) -> &[Binding] {
        self.by_key.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over every binding, ordered by key code
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        let mut keys: Vec<&KeyCode> = self.by_key.keys().collect();
        keys.sort();
        keys.into_iter().flat_map(move |key| self.by_key[key].iter())
    }

    pub fn len(&self) -> usize {
        self.by_key.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::keymap::binding::{callback, Callback, Propagation, SequenceStep};
    use crate::keymap::combo::compile_stroke;

    fn noop() -> Callback {
        callback(|_| Ok(Propagation::Continue))
    }

    fn direct(combo: &str, action: KeyAction) -> Binding {
        Binding::direct(compile_stroke(combo), action, combo, noop())
    }

    fn step(sequence: &str, token: &str, level: usize, last: bool) -> Binding {
        Binding::step(
            compile_stroke(token),
            KeyAction::KeyDown,
            SequenceStep {
                sequence: Rc::from(sequence),
                level,
                last,
            },
            noop(),
        )
    }

    #[test]
    fn test_query_unbound_key_is_empty() {
        let registry = Registry::new();
        let mods = ModifierSet::new();
        assert_eq!(registry.query(KeyCode(65), &mods, KeyAction::KeyDown).count(), 0);
        assert!(registry.bindings_for(KeyCode(65)).is_empty());
    }

    #[test]
    fn test_rebinding_overrides_direct_binding() {
        let mut registry = Registry::new();
        registry.add(direct("a", KeyAction::KeyDown));
        registry.add(direct("a", KeyAction::KeyDown));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_override_respects_action_and_modifiers() {
        let mut registry = Registry::new();
        registry.add(direct("a", KeyAction::KeyDown));
        registry.add(direct("a", KeyAction::KeyUp));
        registry.add(direct("shift+a", KeyAction::KeyDown));

        assert_eq!(registry.len(), 3);
        let shift = ModifierSet::singleton(KeyCode::SHIFT);
        assert_eq!(registry.query(KeyCode(65), &shift, KeyAction::KeyDown).count(), 1);
    }

    #[test]
    fn test_equivalent_spellings_override_each_other() {
        let mut registry = Registry::new();
        registry.add(direct("?", KeyAction::KeyDown));
        registry.add(direct("shift+/", KeyAction::KeyDown));

        let list = registry.bindings_for(KeyCode(191));
        assert_eq!(list.len(), 1);
        assert_eq!(&*list[0].combo, "shift+/");
    }

    #[test]
    fn test_sequence_steps_go_first() {
        let mut registry = Registry::new();
        registry.add(direct("g", KeyAction::KeyDown));
        registry.add(step("g i", "g", 0, false));

        let list = registry.bindings_for(KeyCode(71));
        assert_eq!(list.len(), 2);
        assert!(!list[0].is_direct());
        assert!(list[1].is_direct());
    }

    #[test]
    fn test_direct_binding_does_not_remove_steps() {
        let mut registry = Registry::new();
        registry.add(step("g i", "g", 0, false));
        registry.add(direct("g", KeyAction::KeyDown));

        assert_eq!(registry.bindings_for(KeyCode(71)).len(), 2);
    }

    #[test]
    fn test_rebinding_step_replaces_same_level() {
        let mut registry = Registry::new();
        registry.add(step("g i", "g", 0, false));
        registry.add(step("g t", "g", 0, false));
        registry.add(step("g i", "g", 0, false));

        assert_eq!(registry.bindings_for(KeyCode(71)).len(), 2);
    }

    #[test]
    fn test_matches_filters_by_sequence_level() {
        let mut registry = Registry::new();
        registry.add(step("g i", "i", 1, true));
        let mut sequences = SequenceTracker::new();
        sequences.register("g i");
        let mods = ModifierSet::new();

        assert_eq!(
            registry
                .matches(KeyCode(73), &mods, KeyAction::KeyDown, &sequences)
                .count(),
            0
        );

        sequences.advance("g i", KeyAction::KeyDown);
        assert_eq!(
            registry
                .matches(KeyCode(73), &mods, KeyAction::KeyDown, &sequences)
                .count(),
            1
        );
    }

    #[test]
    fn test_modifier_order_matters() {
        let mut registry = Registry::new();
        registry.add(direct("ctrl+shift+k", KeyAction::KeyDown));

        let canonical = ModifierSet::from_flags(true, false, true, false);
        assert_eq!(registry.query(KeyCode(75), &canonical, KeyAction::KeyDown).count(), 1);
        assert_eq!(
            registry
                .query(KeyCode(75), &ModifierSet::singleton(KeyCode::CTRL), KeyAction::KeyDown)
                .count(),
            0
        );
    }

    #[test]
    fn test_take_removes_overridden_only() {
        let mut registry = Registry::new();
        registry.add(direct("a", KeyAction::KeyDown));
        registry.add(direct("a", KeyAction::KeyUp));
        registry.add(step("a b", "a", 0, false));

        let taken = registry.take(&direct("a", KeyAction::KeyDown));
        assert_eq!(taken.len(), 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.take(&direct("b", KeyAction::KeyDown)).is_empty());
    }

    #[test]
    fn test_add_returns_replaced_binding() {
        let mut registry = Registry::new();
        assert!(registry.add(step("g i", "g", 0, false)).is_empty());

        let replaced = registry.add(step("g i", "g", 0, false));
        assert_eq!(replaced.len(), 1);
        assert_eq!(&*replaced[0].combo, "g i");
    }

    #[test]
    fn test_keyup_sequence_step_does_not_replace_keydown_step() {
        let mut registry = Registry::new();
        registry.add(step("g i", "g", 0, false));
        let mut keyup = step("g i", "g", 0, false);
        keyup.action = KeyAction::KeyUp;
        registry.add(keyup);

        assert_eq!(registry.bindings_for(KeyCode(71)).len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut registry = Registry::new();
        registry.add(direct("a", KeyAction::KeyDown));
        registry.add(step("g i", "g", 0, false));
        assert!(!registry.is_empty());

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.iter().count(), 0);
    }
}

//! Progress tracking for multi-key sequences

use std::collections::{HashMap, HashSet};

use super::types::KeyAction;

/// Progress level of every compiled sequence
///
/// Entries are created when a sequence is bound and only ever reset to 0.
/// `inside` remembers which action advanced a sequence last; while it is
/// set, direct bindings stay quiet.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    levels: HashMap<String, usize>,
    inside: Option<KeyAction>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a sequence, or restart it if already known
    pub fn register(&mut self, name: &str) {
        self.levels.insert(name.to_string(), 0);
    }

    /// Current level of a sequence (0 when unknown)
    pub fn level(&self, name: &str) -> usize {
        self.levels.get(name).copied().unwrap_or(0)
    }

    /// Move a sequence one step forward
    pub fn advance(&mut self, name: &str, action: KeyAction) -> usize {
        self.inside = Some(action);
        let level = self.levels.entry(name.to_string()).or_insert(0);
        *level += 1;
        tracing::debug!(sequence = name, level = *level, "sequence advanced");
        *level
    }

    /// Put a single sequence back to level 0
    pub fn reset(&mut self, name: &str) {
        if let Some(level) = self.levels.get_mut(name) {
            *level = 0;
        }
    }

    /// Reset every sequence not named in `keep`
    ///
    /// Clears the inside flag unless a kept sequence exists.
    pub fn reset_all(&mut self, keep: &HashSet<String>) {
        let mut kept_any = false;
        for (name, level) in self.levels.iter_mut() {
            if keep.contains(name) {
                kept_any = true;
                continue;
            }
            *level = 0;
        }

        if !kept_any {
            self.inside = None;
        }
        tracing::trace!(kept = keep.len(), inside = ?self.inside, "sequences reset");
    }

    /// The action that last advanced a sequence, if one is in progress
    pub fn inside(&self) -> Option<KeyAction> {
        self.inside
    }

    pub fn is_active(&self) -> bool {
        self.inside.is_some()
    }

    /// Names of sequences currently past level 0
    pub fn in_progress(&self) -> impl Iterator<Item = (&str, usize)> {
        self.levels
            .iter()
            .filter(|(_, &level)| level > 0)
            .map(|(name, &level)| (name.as_str(), level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keep(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_unknown_sequence_is_level_zero() {
        let tracker = SequenceTracker::new();
        assert_eq!(tracker.level("g i"), 0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_advance_sets_inside() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");

        assert_eq!(tracker.advance("g i", KeyAction::KeyUp), 1);
        assert_eq!(tracker.level("g i"), 1);
        assert_eq!(tracker.inside(), Some(KeyAction::KeyUp));
    }

    #[test]
    fn test_reset_all_keeps_listed_sequences() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");
        tracker.register("g t");
        tracker.advance("g i", KeyAction::KeyDown);
        tracker.advance("g t", KeyAction::KeyDown);

        tracker.reset_all(&keep(&["g i"]));
        assert_eq!(tracker.level("g i"), 1);
        assert_eq!(tracker.level("g t"), 0);
        assert!(tracker.is_active());
    }

    #[test]
    fn test_reset_all_without_keep_clears_inside() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");
        tracker.advance("g i", KeyAction::KeyDown);

        tracker.reset_all(&HashSet::new());
        assert_eq!(tracker.level("g i"), 0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_keep_of_unknown_sequence_clears_inside() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");
        tracker.advance("g i", KeyAction::KeyDown);

        tracker.reset_all(&keep(&["never bound"]));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_register_restarts_progress() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");
        tracker.advance("g i", KeyAction::KeyDown);

        tracker.register("g i");
        assert_eq!(tracker.level("g i"), 0);
    }

    #[test]
    fn test_in_progress() {
        let mut tracker = SequenceTracker::new();
        tracker.register("g i");
        tracker.register("g t");
        tracker.advance("g t", KeyAction::KeyDown);

        let active: Vec<_> = tracker.in_progress().collect();
        assert_eq!(active, vec![("g t", 1)]);
    }
}

//! Combo compiler: turns strings like `"ctrl+shift+k"` or `"g i"` into keystrokes
//!
//! Compilation never fails. Tokens that resolve to nothing known fall back to
//! the code of their first character.

use std::fmt;

use super::symbols;
use super::types::{KeyCode, ModifierSet};

/// A terminal key together with the modifiers that must be held
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stroke {
    pub key: KeyCode,
    pub modifiers: ModifierSet,
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mods: Vec<KeyCode> = self
            .modifiers
            .as_slice()
            .iter()
            .copied()
            .filter(|&m| m != self.key)
            .collect();
        for m in mods {
            write!(f, "{}+", m)?;
        }
        write!(f, "{}", self.key)
    }
}

/// Compiled form of one combo string
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Combo {
    /// One keystroke, possibly with modifiers
    Single(Stroke),
    /// Keystrokes that must be typed one after another
    Sequence {
        /// Whitespace-normalized source string, used as the sequence name
        name: String,
        steps: Vec<Stroke>,
    },
}

/// Collapse whitespace runs to single spaces and trim the ends
pub fn normalize_whitespace(combo: &str) -> String {
    combo.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a `bind` argument into its individual combos
///
/// Commas separate combos, so `"a,b"` binds two keys.
pub fn split_combos(keys: &str) -> impl Iterator<Item = &str> {
    keys.split(',')
}

/// Compile a single combo string
pub fn compile(combo: &str) -> Combo {
    let normalized = normalize_whitespace(combo);
    let tokens: Vec<&str> = normalized.split(' ').collect();

    if tokens.len() > 1 {
        let steps = tokens.iter().map(|token| compile_stroke(token)).collect();
        return Combo::Sequence {
            name: normalized.clone(),
            steps,
        };
    }

    Combo::Single(compile_stroke(&normalized))
}

/// Compile one `+`-joined token into a stroke
///
/// The last part resolved is the terminal key; modifiers are expected to
/// come first. A lone `"+"` is the plus key itself.
pub fn compile_stroke(token: &str) -> Stroke {
    let parts: Vec<&str> = if token == "+" {
        vec!["+"]
    } else {
        token.split('+').collect()
    };

    let mut modifiers = ModifierSet::new();
    let mut key = KeyCode(0);

    for part in parts.into_iter().filter(|p| !p.is_empty()) {
        let part = match symbols::unshifted(part) {
            Some(base) => {
                modifiers.insert(KeyCode::SHIFT);
                base
            }
            None => part,
        };

        key = resolve_part(part);
        if key.is_modifier() {
            modifiers.insert(key);
        }
    }

    Stroke { key, modifiers }
}

fn resolve_part(part: &str) -> KeyCode {
    if let Some(code) = symbols::named_key(part) {
        return code;
    }
    part.chars()
        .next()
        .map(symbols::char_code)
        .unwrap_or(KeyCode(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(combo: &str) -> Stroke {
        match compile(combo) {
            Combo::Single(stroke) => stroke,
            other => panic!("expected single stroke for {combo:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_letter() {
        let stroke = single("a");
        assert_eq!(stroke.key, KeyCode(65));
        assert!(stroke.modifiers.is_empty());
    }

    #[test]
    fn test_modifier_combo_in_any_order_is_canonical() {
        let a = single("ctrl+shift+k");
        let b = single("shift+ctrl+k");
        assert_eq!(a.key, KeyCode(75));
        assert_eq!(a.modifiers.as_slice(), &[KeyCode::SHIFT, KeyCode::CTRL]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_shifted_symbol_adds_shift() {
        let stroke = single("?");
        assert_eq!(stroke.key, KeyCode(191));
        assert_eq!(stroke.modifiers, ModifierSet::singleton(KeyCode::SHIFT));
        assert_eq!(stroke, single("shift+/"));
    }

    #[test]
    fn test_lone_plus_is_the_plus_key() {
        let stroke = single("+");
        assert_eq!(stroke.key, KeyCode(187));
        assert_eq!(stroke.modifiers, ModifierSet::singleton(KeyCode::SHIFT));
    }

    #[test]
    fn test_bare_modifier() {
        let stroke = single("shift");
        assert_eq!(stroke.key, KeyCode::SHIFT);
        assert_eq!(stroke.modifiers, ModifierSet::singleton(KeyCode::SHIFT));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(single("enter").key, KeyCode(13));
        assert_eq!(single("command+left").modifiers.as_slice(), &[KeyCode::META]);
        assert_eq!(single("alt+f4").key, KeyCode(115));
    }

    #[test]
    fn test_unknown_tokens_fall_back_to_first_char() {
        assert_eq!(single("é").key, KeyCode('É' as u32));
        // multi-character garbage resolves to its first letter
        assert_eq!(single("bogus").key, KeyCode(66));
        assert_eq!(single("Ctrl+x").key, KeyCode(88));
        assert!(single("Ctrl+x").modifiers.is_empty());
    }

    #[test]
    fn test_sequence() {
        let Combo::Sequence { name, steps } = compile("g  i") else {
            panic!("expected a sequence");
        };
        assert_eq!(name, "g i");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].key, KeyCode(71));
        assert_eq!(steps[1].key, KeyCode(73));
    }

    #[test]
    fn test_sequence_with_modifiers() {
        let Combo::Sequence { steps, .. } = compile("ctrl+k ctrl+c") else {
            panic!("expected a sequence");
        };
        assert!(steps.iter().all(|s| s.modifiers.as_slice() == [KeyCode::CTRL]));
        assert_eq!(steps[1].key, KeyCode(67));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert!(matches!(compile(" a "), Combo::Single(_)));
        assert_eq!(normalize_whitespace("\tg \n i "), "g i");
    }

    #[test]
    fn test_split_combos() {
        let combos: Vec<&str> = split_combos("a,ctrl+b,g i").collect();
        assert_eq!(combos, vec!["a", "ctrl+b", "g i"]);
    }

    #[test]
    fn test_stroke_display() {
        assert_eq!(single("ctrl+shift+k").to_string(), "shift+ctrl+k");
        assert_eq!(single("shift").to_string(), "shift");
        assert_eq!(single("?").to_string(), "shift+/");
    }
}

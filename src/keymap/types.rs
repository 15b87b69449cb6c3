//! Core types for the keymap system: KeyCode, ModifierSet, KeyAction, KeyEvent

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::symbols;

/// A key code after raw-code normalization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const SHIFT: KeyCode = KeyCode(16);
    pub const CTRL: KeyCode = KeyCode(17);
    pub const ALT: KeyCode = KeyCode(18);
    pub const META: KeyCode = KeyCode(91);

    /// Canonicalize a code reported by an event source
    #[inline]
    pub fn normalize(raw: u32) -> KeyCode {
        symbols::normalize_raw(raw)
    }

    /// Check if this is one of shift, ctrl, alt or meta
    #[inline]
    pub const fn is_modifier(self) -> bool {
        matches!(self.0, 16 | 17 | 18 | 91)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            8 => write!(f, "backspace"),
            9 => write!(f, "tab"),
            13 => write!(f, "enter"),
            16 => write!(f, "shift"),
            17 => write!(f, "ctrl"),
            18 => write!(f, "alt"),
            20 => write!(f, "capslock"),
            27 => write!(f, "esc"),
            32 => write!(f, "space"),
            33 => write!(f, "pageup"),
            34 => write!(f, "pagedown"),
            35 => write!(f, "end"),
            36 => write!(f, "home"),
            37 => write!(f, "left"),
            38 => write!(f, "up"),
            39 => write!(f, "right"),
            40 => write!(f, "down"),
            45 => write!(f, "ins"),
            46 => write!(f, "del"),
            91 => write!(f, "meta"),
            n @ 112..=130 => write!(f, "f{}", n - 111),
            186 => write!(f, ";"),
            187 => write!(f, "="),
            188 => write!(f, ","),
            189 => write!(f, "-"),
            190 => write!(f, "."),
            191 => write!(f, "/"),
            192 => write!(f, "`"),
            219 => write!(f, "["),
            220 => write!(f, "\\"),
            221 => write!(f, "]"),
            222 => write!(f, "'"),
            n => match char::from_u32(n) {
                Some(c) if c.is_ascii_alphanumeric() => write!(f, "{}", c.to_ascii_lowercase()),
                _ => write!(f, "#{}", n),
            },
        }
    }
}

/// Modifier keys in the fixed scan order used for every [`ModifierSet`]
pub const SCAN_ORDER: [KeyCode; 4] = [KeyCode::SHIFT, KeyCode::ALT, KeyCode::CTRL, KeyCode::META];

/// Ordered list of held modifier keys
///
/// Always kept in [`SCAN_ORDER`] without duplicates, so equality is a plain
/// element-by-element comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet(Vec<KeyCode>);

impl ModifierSet {
    pub const fn new() -> Self {
        ModifierSet(Vec::new())
    }

    /// Build from the four modifier flags of an event
    pub fn from_flags(shift: bool, alt: bool, ctrl: bool, meta: bool) -> Self {
        let held = [shift, alt, ctrl, meta];
        ModifierSet(
            SCAN_ORDER
                .iter()
                .zip(held)
                .filter_map(|(&code, on)| on.then_some(code))
                .collect(),
        )
    }

    /// A set holding just one modifier key
    pub fn singleton(code: KeyCode) -> Self {
        let mut set = Self::new();
        set.insert(code);
        set
    }

    /// Add a modifier at its scan-order position
    ///
    /// Returns false for non-modifier codes and for modifiers already present.
    pub fn insert(&mut self, code: KeyCode) -> bool {
        if !code.is_modifier() || self.0.contains(&code) {
            return false;
        }
        let rank = |c: &KeyCode| SCAN_ORDER.iter().position(|s| s == c);
        let at = self
            .0
            .iter()
            .position(|held| rank(held) > rank(&code))
            .unwrap_or(self.0.len());
        self.0.insert(at, code);
        true
    }

    #[inline]
    pub fn contains(&self, code: KeyCode) -> bool {
        self.0.contains(&code)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[KeyCode] {
        &self.0
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// Which edge of a key press a binding reacts to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    #[default]
    KeyDown,
    KeyUp,
}

impl KeyAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            KeyAction::KeyDown => "keydown",
            KeyAction::KeyUp => "keyup",
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keydown" => Ok(KeyAction::KeyDown),
            "keyup" => Ok(KeyAction::KeyUp),
            _ => Err(()),
        }
    }
}

/// The element that had focus when a key event was produced
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Target {
    pub tag: String,
    pub classes: Vec<String>,
}

impl Target {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
        }
    }

    /// Add a class (builder pattern)
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// input, select and textarea controls consume typed text themselves
    pub fn is_text_input(&self) -> bool {
        ["input", "select", "textarea"]
            .iter()
            .any(|tag| self.tag.eq_ignore_ascii_case(tag))
    }
}

/// A raw key event as delivered by an event source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Raw code, not yet normalized
    pub code: u32,
    pub action: KeyAction,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub target: Option<Target>,
}

impl KeyEvent {
    pub fn new(code: u32, action: KeyAction) -> Self {
        Self {
            code,
            action,
            shift: false,
            alt: false,
            ctrl: false,
            meta: false,
            target: None,
        }
    }

    /// A key-down event for a raw code
    pub fn down(code: u32) -> Self {
        Self::new(code, KeyAction::KeyDown)
    }

    /// A key-up event for a raw code
    pub fn up(code: u32) -> Self {
        Self::new(code, KeyAction::KeyUp)
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Normalized key code
    pub fn key(&self) -> KeyCode {
        KeyCode::normalize(self.code)
    }

    /// Modifiers active for matching this event
    ///
    /// A released modifier key counts as the only held modifier, so a
    /// binding on the bare modifier still matches its key-up.
    pub fn modifiers(&self) -> ModifierSet {
        let key = self.key();
        if self.action == KeyAction::KeyUp && key.is_modifier() {
            return ModifierSet::singleton(key);
        }
        ModifierSet::from_flags(self.shift, self.alt, self.ctrl, self.meta)
    }
}

//! Static key tables: named keys, shifted symbols and raw code normalization
//!
//! Codes follow the legacy DOM `keyCode` numbering, which is what most
//! platform event sources can be mapped onto.

use super::types::KeyCode;

/// Resolve a named key (or a punctuation symbol) to its key code
///
/// Lookup is exact: `"ctrl"` resolves, `"Ctrl"` does not.
pub fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "backspace" => 8,
        "tab" => 9,
        "enter" | "return" => 13,
        "shift" => 16,
        "ctrl" => 17,
        "alt" | "option" => 18,
        "capslock" => 20,
        "esc" | "escape" => 27,
        "space" => 32,
        "pageup" => 33,
        "pagedown" => 34,
        "end" => 35,
        "home" => 36,
        "left" => 37,
        "up" => 38,
        "right" => 39,
        "down" => 40,
        "ins" | "insert" => 45,
        "del" | "delete" => 46,
        "meta" | "command" => 91,

        ";" => 186,
        "=" => 187,
        "," => 188,
        "-" => 189,
        "." => 190,
        "/" => 191,
        "`" => 192,
        "[" => 219,
        "\\" => 220,
        "]" => 221,
        "'" => 222,

        _ => return function_key(name),
    };
    Some(KeyCode(code))
}

/// `f1`..`f19` map onto 112..130
fn function_key(name: &str) -> Option<KeyCode> {
    let n: u32 = name.strip_prefix('f')?.parse().ok()?;
    (1..=19).contains(&n).then(|| KeyCode(111 + n))
}

/// The unshifted symbol typed on the same physical key (US layout)
pub fn unshifted(symbol: &str) -> Option<&'static str> {
    let base = match symbol {
        "~" => "`",
        "!" => "1",
        "@" => "2",
        "#" => "3",
        "$" => "4",
        "%" => "5",
        "^" => "6",
        "&" => "7",
        "*" => "8",
        "(" => "9",
        ")" => "0",
        "_" => "-",
        "+" => "=",
        ":" => ";",
        "\"" => "'",
        "<" => ",",
        ">" => ".",
        "?" => "/",
        "|" => "\\",
        _ => return None,
    };
    Some(base)
}

/// Map a raw code reported by an event source onto its canonical code
///
/// Numpad digits become top-row digits, every meta/super variant becomes
/// 91, and browser-specific punctuation codes fold onto the common ones.
pub fn normalize_raw(raw: u32) -> KeyCode {
    let code = match raw {
        96..=105 => raw - 48,
        92 | 93 | 224 => 91,
        59 => 186,
        61 => 187,
        109 | 173 => 189,
        110 => 190,
        111 => 191,
        _ => raw,
    };
    KeyCode(code)
}

/// Resolve a single character the way the combo compiler falls back to
pub fn char_code(c: char) -> KeyCode {
    let upper = c.to_uppercase().next().unwrap_or(c);
    KeyCode(upper as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys() {
        assert_eq!(named_key("enter"), Some(KeyCode(13)));
        assert_eq!(named_key("return"), Some(KeyCode(13)));
        assert_eq!(named_key("esc"), named_key("escape"));
        assert_eq!(named_key("command"), Some(KeyCode::META));
        assert_eq!(named_key("option"), Some(KeyCode::ALT));
        assert_eq!(named_key("/"), Some(KeyCode(191)));
    }

    #[test]
    fn test_named_keys_are_case_sensitive() {
        assert_eq!(named_key("Ctrl"), None);
        assert_eq!(named_key("ctrl"), Some(KeyCode::CTRL));
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(named_key("f1"), Some(KeyCode(112)));
        assert_eq!(named_key("f12"), Some(KeyCode(123)));
        assert_eq!(named_key("f19"), Some(KeyCode(130)));
        assert_eq!(named_key("f20"), None);
        assert_eq!(named_key("f0"), None);
        assert_eq!(named_key("foo"), None);
    }

    #[test]
    fn test_unshifted_symbols() {
        assert_eq!(unshifted("?"), Some("/"));
        assert_eq!(unshifted("+"), Some("="));
        assert_eq!(unshifted("!"), Some("1"));
        assert_eq!(unshifted("/"), None);
        assert_eq!(unshifted("a"), None);
    }

    #[test]
    fn test_normalize_numpad_digits() {
        for digit in 0..10 {
            assert_eq!(normalize_raw(96 + digit), KeyCode(48 + digit));
        }
    }

    #[test]
    fn test_normalize_meta_variants() {
        assert_eq!(normalize_raw(92), KeyCode::META);
        assert_eq!(normalize_raw(93), KeyCode::META);
        assert_eq!(normalize_raw(224), KeyCode::META);
        assert_eq!(normalize_raw(91), KeyCode::META);
    }

    #[test]
    fn test_normalize_passthrough() {
        assert_eq!(normalize_raw(65), KeyCode(65));
        assert_eq!(normalize_raw(13), KeyCode(13));
    }

    #[test]
    fn test_char_code_uppercases() {
        assert_eq!(char_code('a'), KeyCode(65));
        assert_eq!(char_code('A'), KeyCode(65));
        assert_eq!(char_code('1'), KeyCode(49));
    }
}

//! Adapter to convert winit key events to our KeyEvent type
//!
//! Physical keys are translated to the legacy key codes the combo
//! compiler resolves names to, so `"a"` matches the A key regardless of
//! the active layout.

use winit::event::ElementState;
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

use super::types::{KeyAction, KeyCode, KeyEvent};

/// Legacy key code for a physical key
///
/// Returns None for keys without one (media keys, IME keys, ...)
pub fn key_code_from_winit(physical_key: PhysicalKey) -> Option<u32> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    let code = match code {
        // Editing and whitespace
        WinitKeyCode::Backspace => 8,
        WinitKeyCode::Tab => 9,
        WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => 13,
        WinitKeyCode::Space => 32,
        WinitKeyCode::Escape => 27,
        WinitKeyCode::Insert => 45,
        WinitKeyCode::Delete => 46,

        // Modifiers
        WinitKeyCode::ShiftLeft | WinitKeyCode::ShiftRight => 16,
        WinitKeyCode::ControlLeft | WinitKeyCode::ControlRight => 17,
        WinitKeyCode::AltLeft | WinitKeyCode::AltRight => 18,
        WinitKeyCode::SuperLeft => 91,
        WinitKeyCode::SuperRight => 92,
        WinitKeyCode::ContextMenu => 93,

        // Locks
        WinitKeyCode::Pause => 19,
        WinitKeyCode::CapsLock => 20,
        WinitKeyCode::PrintScreen => 44,
        WinitKeyCode::NumLock => 144,
        WinitKeyCode::ScrollLock => 145,

        // Navigation
        WinitKeyCode::PageUp => 33,
        WinitKeyCode::PageDown => 34,
        WinitKeyCode::End => 35,
        WinitKeyCode::Home => 36,
        WinitKeyCode::ArrowLeft => 37,
        WinitKeyCode::ArrowUp => 38,
        WinitKeyCode::ArrowRight => 39,
        WinitKeyCode::ArrowDown => 40,

        // Digits
        WinitKeyCode::Digit0 => 48,
        WinitKeyCode::Digit1 => 49,
        WinitKeyCode::Digit2 => 50,
        WinitKeyCode::Digit3 => 51,
        WinitKeyCode::Digit4 => 52,
        WinitKeyCode::Digit5 => 53,
        WinitKeyCode::Digit6 => 54,
        WinitKeyCode::Digit7 => 55,
        WinitKeyCode::Digit8 => 56,
        WinitKeyCode::Digit9 => 57,

        // Letters
        WinitKeyCode::KeyA => 65,
        WinitKeyCode::KeyB => 66,
        WinitKeyCode::KeyC => 67,
        WinitKeyCode::KeyD => 68,
        WinitKeyCode::KeyE => 69,
        WinitKeyCode::KeyF => 70,
        WinitKeyCode::KeyG => 71,
        WinitKeyCode::KeyH => 72,
        WinitKeyCode::KeyI => 73,
        WinitKeyCode::KeyJ => 74,
        WinitKeyCode::KeyK => 75,
        WinitKeyCode::KeyL => 76,
        WinitKeyCode::KeyM => 77,
        WinitKeyCode::KeyN => 78,
        WinitKeyCode::KeyO => 79,
        WinitKeyCode::KeyP => 80,
        WinitKeyCode::KeyQ => 81,
        WinitKeyCode::KeyR => 82,
        WinitKeyCode::KeyS => 83,
        WinitKeyCode::KeyT => 84,
        WinitKeyCode::KeyU => 85,
        WinitKeyCode::KeyV => 86,
        WinitKeyCode::KeyW => 87,
        WinitKeyCode::KeyX => 88,
        WinitKeyCode::KeyY => 89,
        WinitKeyCode::KeyZ => 90,

        // Numpad
        WinitKeyCode::Numpad0 => 96,
        WinitKeyCode::Numpad1 => 97,
        WinitKeyCode::Numpad2 => 98,
        WinitKeyCode::Numpad3 => 99,
        WinitKeyCode::Numpad4 => 100,
        WinitKeyCode::Numpad5 => 101,
        WinitKeyCode::Numpad6 => 102,
        WinitKeyCode::Numpad7 => 103,
        WinitKeyCode::Numpad8 => 104,
        WinitKeyCode::Numpad9 => 105,
        WinitKeyCode::NumpadMultiply => 106,
        WinitKeyCode::NumpadAdd => 107,
        WinitKeyCode::NumpadSubtract => 109,
        WinitKeyCode::NumpadDecimal => 110,
        WinitKeyCode::NumpadDivide => 111,

        // Function keys
        WinitKeyCode::F1 => 112,
        WinitKeyCode::F2 => 113,
        WinitKeyCode::F3 => 114,
        WinitKeyCode::F4 => 115,
        WinitKeyCode::F5 => 116,
        WinitKeyCode::F6 => 117,
        WinitKeyCode::F7 => 118,
        WinitKeyCode::F8 => 119,
        WinitKeyCode::F9 => 120,
        WinitKeyCode::F10 => 121,
        WinitKeyCode::F11 => 122,
        WinitKeyCode::F12 => 123,
        WinitKeyCode::F13 => 124,
        WinitKeyCode::F14 => 125,
        WinitKeyCode::F15 => 126,
        WinitKeyCode::F16 => 127,
        WinitKeyCode::F17 => 128,
        WinitKeyCode::F18 => 129,
        WinitKeyCode::F19 => 130,

        // Punctuation (US layout positions)
        WinitKeyCode::Semicolon => 186,
        WinitKeyCode::Equal => 187,
        WinitKeyCode::Comma => 188,
        WinitKeyCode::Minus => 189,
        WinitKeyCode::Period => 190,
        WinitKeyCode::Slash => 191,
        WinitKeyCode::Backquote => 192,
        WinitKeyCode::BracketLeft => 219,
        WinitKeyCode::Backslash | WinitKeyCode::IntlBackslash => 220,
        WinitKeyCode::BracketRight => 221,
        WinitKeyCode::Quote => 222,

        _ => return None,
    };

    Some(code)
}

/// Convert winit key event data to our KeyEvent type
///
/// `modifiers` is the state last reported by `WindowEvent::ModifiersChanged`,
/// which some platforms send after the key press itself. A pressed modifier
/// key therefore always reports its own flag. Returns None if the key cannot
/// be mapped.
pub fn key_event_from_winit(
    physical_key: PhysicalKey,
    state: ElementState,
    modifiers: ModifiersState,
) -> Option<KeyEvent> {
    let code = key_code_from_winit(physical_key)?;
    let action = match state {
        ElementState::Pressed => KeyAction::KeyDown,
        ElementState::Released => KeyAction::KeyUp,
    };

    let mut event = KeyEvent::new(code, action);
    event.shift = modifiers.shift_key();
    event.alt = modifiers.alt_key();
    event.ctrl = modifiers.control_key();
    event.meta = modifiers.super_key(); // super = meta = cmd on macOS

    if action == KeyAction::KeyDown {
        match KeyCode::normalize(code) {
            KeyCode::SHIFT => event.shift = true,
            KeyCode::ALT => event.alt = true,
            KeyCode::CTRL => event.ctrl = true,
            KeyCode::META => event.meta = true,
            _ => {}
        }
    }
    Some(event)
}

//! Demo application: one window, one attached keyboard

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::config::KeyboardConfig;
use crate::keymap::{
    callback, key_event_from_winit, Attached, BindingConfig, Callback, KeymapError, Keyboard,
    Propagation,
};

/// Command that closes the demo window
pub const QUIT_COMMAND: &str = "Quit";

/// Callback that logs the command it was bound for
fn command_callback(command: &str, quit: &Rc<Cell<bool>>) -> Callback {
    let command = command.to_string();
    let quit = Rc::clone(quit);
    callback(move |invocation| {
        tracing::info!("{} ({})", command, invocation.combo);
        println!("{:<16} {}", command, invocation.combo);
        if command == QUIT_COMMAND {
            quit.set(true);
        }
        Ok(Propagation::Stop)
    })
}

/// Build a keyboard with every keymap entry bound to a logging callback
///
/// `quit` is set when the `Quit` command fires.
pub fn build_keyboard(
    config: KeyboardConfig,
    keymap: &[BindingConfig],
    quit: &Rc<Cell<bool>>,
) -> Result<Keyboard, KeymapError> {
    let mut keyboard = Keyboard::with_config(config);
    keyboard.bind_keymap(keymap, |command| Some(command_callback(command, quit)))?;
    Ok(keyboard)
}

pub struct App {
    config: KeyboardConfig,
    keymap: Vec<BindingConfig>,
    window: Option<Window>,
    keyboard: Option<Attached<WindowId>>,
    modifiers: ModifiersState,
    quit: Rc<Cell<bool>>,
}

impl App {
    pub fn new(config: KeyboardConfig, keymap: Vec<BindingConfig>) -> Self {
        Self {
            config,
            keymap,
            window: None,
            keyboard: None,
            modifiers: ModifiersState::empty(),
            quit: Rc::new(Cell::new(false)),
        }
    }

    fn attach(&mut self, window_id: WindowId) -> anyhow::Result<()> {
        let keyboard = build_keyboard(self.config.clone(), &self.keymap, &self.quit)?;
        tracing::info!("Listening for {} bindings", keyboard.len());
        self.keyboard = Some(Attached::new(Some(window_id), keyboard)?);
        Ok(())
    }

    fn handle_key(&mut self, window_id: WindowId, event: &winit::event::KeyEvent) {
        let Some(keyboard) = self.keyboard.as_mut() else {
            return;
        };
        let Some(key_event) = key_event_from_winit(event.physical_key, event.state, self.modifiers)
        else {
            tracing::trace!("Unmapped key {:?}", event.physical_key);
            return;
        };

        match keyboard.deliver(&window_id, &key_event) {
            Ok(Some(dispatch)) if dispatch.handled() => {
                tracing::debug!(
                    "Key {} [{}]: {} fired, {} advanced",
                    key_event.key(),
                    key_event.action,
                    dispatch.fired,
                    dispatch.advanced
                );
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Shortcut callback failed: {:#}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("keychord")
            .with_inner_size(LogicalSize::new(480, 240));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => window,
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.attach(window.id()) {
            tracing::error!("Failed to bind keymap: {}", e);
            event_loop.exit();
            return;
        }
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(window_id, &event);
            }
            _ => {}
        }

        if self.quit.get() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attached) = self.keyboard.as_mut() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        let keyboard = attached.keyboard_mut();
        keyboard.poll_timers(Instant::now());

        // Sleep until the next sequence timer instead of polling
        match keyboard.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{KeyAction, KeyEvent};

    #[test]
    fn test_build_keyboard_binds_every_entry() {
        let quit = Rc::new(Cell::new(false));
        let keymap = vec![
            BindingConfig::new("a", "Alpha"),
            BindingConfig::new("ctrl+q", QUIT_COMMAND),
        ];

        let keyboard = build_keyboard(KeyboardConfig::default(), &keymap, &quit).unwrap();
        assert_eq!(keyboard.len(), 2);
    }

    #[test]
    fn test_quit_command_sets_flag() {
        let quit = Rc::new(Cell::new(false));
        let keymap = vec![BindingConfig::new("ctrl+q", QUIT_COMMAND)];
        let mut keyboard = build_keyboard(KeyboardConfig::default(), &keymap, &quit).unwrap();

        let dispatch = keyboard
            .handle_event(&KeyEvent::down(81).with_ctrl())
            .unwrap();
        assert!(dispatch.default_prevented);
        assert!(quit.get());
    }

    #[test]
    fn test_other_commands_leave_flag_alone() {
        let quit = Rc::new(Cell::new(false));
        let keymap = vec![BindingConfig::new("a", "Alpha")];
        let mut keyboard = build_keyboard(KeyboardConfig::default(), &keymap, &quit).unwrap();

        assert!(keyboard.trigger("a", KeyAction::KeyDown).unwrap());
        assert!(!quit.get());
    }
}

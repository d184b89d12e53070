//! Keyboard state to tick input
//!
//! Keys are tracked by physical position so the WASD cluster works on any
//! layout.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::sim::TickInput;

/// Held keys plus one-shot presses waiting for a tick
#[derive(Default, Debug, Clone)]
pub struct InputState {
    held: HashSet<KeyCode>,
    /// Fire was pressed since the last tick consumed it
    fire_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit key event. Returns `true` if the key is a game control.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        match event.physical_key {
            PhysicalKey::Code(code) => self.handle_key(code, event.state, event.repeat),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) -> bool {
        if !is_control(code) {
            return false;
        }
        match state {
            ElementState::Pressed => {
                let newly_down = self.held.insert(code);
                if code == KeyCode::Space && newly_down && !repeat {
                    self.fire_pending = true;
                }
            }
            ElementState::Released => {
                self.held.remove(&code);
            }
        }
        true
    }

    #[inline]
    pub fn is_down(&self, code: KeyCode) -> bool {
        self.held.contains(&code)
    }

    /// Snapshot for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            turn_left: self.is_down(KeyCode::KeyA),
            turn_right: self.is_down(KeyCode::KeyD),
            forward: self.is_down(KeyCode::KeyW),
            backward: self.is_down(KeyCode::KeyS),
            turret_left: self.is_down(KeyCode::KeyQ),
            turret_right: self.is_down(KeyCode::KeyE),
            fire: self.fire_pending,
        }
    }

    /// Clear one-shot inputs after a tick has seen them
    pub fn consume_one_shots(&mut self) {
        self.fire_pending = false;
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.fire_pending = false;
    }
}

fn is_control(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::KeyA
            | KeyCode::KeyD
            | KeyCode::KeyW
            | KeyCode::KeyS
            | KeyCode::KeyQ
            | KeyCode::KeyE
            | KeyCode::Space
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut InputState, code: KeyCode) {
        input.handle_key(code, ElementState::Pressed, false);
    }

    fn release(input: &mut InputState, code: KeyCode) {
        input.handle_key(code, ElementState::Released, false);
    }

    #[test]
    fn test_mapping() {
        let mut input = InputState::new();
        for code in [
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::KeyW,
            KeyCode::KeyS,
            KeyCode::KeyQ,
            KeyCode::KeyE,
        ] {
            press(&mut input, code);
        }
        let tick = input.tick_input();
        assert!(tick.turn_left && tick.turn_right);
        assert!(tick.forward && tick.backward);
        assert!(tick.turret_left && tick.turret_right);
        assert!(!tick.fire);

        release(&mut input, KeyCode::KeyW);
        assert!(!input.tick_input().forward);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = InputState::new();
        assert!(!input.handle_key(KeyCode::KeyZ, ElementState::Pressed, false));
        assert!(!input.handle_key(KeyCode::ArrowUp, ElementState::Pressed, false));
        assert_eq!(input.tick_input(), TickInput::default());
    }

    #[test]
    fn test_fire_is_one_shot() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Space);
        assert!(input.tick_input().fire);

        input.consume_one_shots();
        // Still held, but no new press
        assert!(input.is_down(KeyCode::Space));
        assert!(!input.tick_input().fire);
    }

    #[test]
    fn test_fire_ignores_key_repeat() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Space);
        input.consume_one_shots();

        input.handle_key(KeyCode::Space, ElementState::Pressed, true);
        assert!(!input.tick_input().fire);

        release(&mut input, KeyCode::Space);
        press(&mut input, KeyCode::Space);
        assert!(input.tick_input().fire);
    }

    #[test]
    fn test_tap_between_ticks_still_fires() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::Space);
        release(&mut input, KeyCode::Space);
        assert!(input.tick_input().fire);
    }

    #[test]
    fn test_clear_on_focus_loss() {
        let mut input = InputState::new();
        press(&mut input, KeyCode::KeyW);
        press(&mut input, KeyCode::Space);
        input.clear();
        assert_eq!(input.tick_input(), TickInput::default());
    }
}

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Quit,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Pause | Key::Quit => None,
        }
    }
}

/// Key-down state for the current frame. The terminal only reports presses,
/// so a key counts as down for the frame its event arrived in.
#[derive(Default)]
pub struct InputManager {
    down: HashSet<Key>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.down.clear();
    }

    pub fn handle_key(&mut self, ev: &KeyEvent) -> Option<Key> {
        let key = map_key(ev)?;
        self.press(key);
        Some(key)
    }

    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

fn map_key(ev: &KeyEvent) -> Option<Key> {
    if is_ctrl_c(ev) {
        return Some(Key::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Key::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Key::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Key::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Key::Right),
        KeyCode::Esc => Some(Key::Pause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn maps_arrows_and_wasd() {
        let mut input = InputManager::new();
        assert_eq!(input.handle_key(&key(KeyCode::Up)), Some(Key::Up));
        assert_eq!(input.handle_key(&key(KeyCode::Char('a'))), Some(Key::Left));
        assert_eq!(input.handle_key(&key(KeyCode::Esc)), Some(Key::Pause));
        assert_eq!(input.handle_key(&key(KeyCode::Char('x'))), None);

        assert!(input.is_key_down(Key::Up));
        assert!(input.is_key_down(Key::Left));
        assert!(!input.is_key_down(Key::Down));
    }

    #[test]
    fn ctrl_c_quits_plain_c_does_nothing() {
        let mut input = InputManager::new();
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        assert_eq!(input.handle_key(&ctrl_c), Some(Key::Quit));
        assert_eq!(input.handle_key(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn keys_only_last_one_frame() {
        let mut input = InputManager::new();
        input.press(Key::Right);
        assert!(input.is_key_down(Key::Right));

        input.begin_frame();
        assert!(!input.is_key_down(Key::Right));
    }

    #[test]
    fn movement_keys_have_directions() {
        assert_eq!(Key::Down.direction(), Some(Direction::Down));
        assert_eq!(Key::Quit.direction(), None);
    }
}

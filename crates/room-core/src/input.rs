//! Keyboard snapshot handed in by the host every frame

use std::collections::HashSet;

use glam::Vec3;

/// Keys the editor reacts to, named after browser `KeyboardEvent.key` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Navigation
    W,
    A,
    S,
    D,
    Q,
    E,
    // Manipulation
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Shift,
    Enter,
    Delete,
    Backspace,
    C,
}

impl Key {
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "w" | "W" => Key::W,
            "a" | "A" => Key::A,
            "s" | "S" => Key::S,
            "d" | "D" => Key::D,
            "q" | "Q" => Key::Q,
            "e" | "E" => Key::E,
            "ArrowLeft" | "left" => Key::ArrowLeft,
            "ArrowRight" | "right" => Key::ArrowRight,
            "ArrowUp" | "up" => Key::ArrowUp,
            "ArrowDown" | "down" => Key::ArrowDown,
            "PageUp" | "pageup" => Key::PageUp,
            "PageDown" | "pagedown" => Key::PageDown,
            "Shift" | "shift" => Key::Shift,
            "Enter" | "enter" => Key::Enter,
            "Delete" | "delete" => Key::Delete,
            "Backspace" | "backspace" => Key::Backspace,
            "c" | "C" => Key::C,
            _ => return None,
        };
        Some(key)
    }

    /// Unit translation of a manipulation key, if it is one
    pub fn nudge_direction(&self) -> Option<Vec3> {
        match self {
            Key::ArrowLeft => Some(Vec3::NEG_X),
            Key::ArrowRight => Some(Vec3::X),
            Key::ArrowUp => Some(Vec3::NEG_Z),
            Key::ArrowDown => Some(Vec3::Z),
            Key::PageUp => Some(Vec3::Y),
            Key::PageDown => Some(Vec3::NEG_Y),
            _ => None,
        }
    }
}

/// Set of currently pressed keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(HashSet<Key>);

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.0.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.0.remove(&key);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.0.contains(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.0.iter().copied()
    }

    /// Sum of the unit directions of all pressed manipulation keys
    pub fn nudge_vector(&self) -> Vec3 {
        self.iter().filter_map(|k| k.nudge_direction()).sum()
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-frame input snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub keys: KeySet,
    /// Pointer capture for first-person navigation is active
    pub capture_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::ArrowUp));
        assert_eq!(Key::from_name("w"), Some(Key::W));
        assert_eq!(Key::from_name("F13"), None);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keys: KeySet = [Key::ArrowLeft, Key::ArrowRight, Key::PageUp, Key::Shift]
            .into_iter()
            .collect();
        assert_eq!(keys.nudge_vector(), Vec3::Y);
    }
}

//! Keyboard input: canonical key identifiers, the pressed-key set, and the
//! keyboard flight simulator used when motion sensors are unavailable.

pub mod sim;

pub use sim::{KeyboardSimulator, KeyboardTuning, ViewBasis};

use std::collections::HashSet;

/// Canonicalized key identifier for the keys the simulator cares about.
///
/// Platform key strings are case-insensitive at the boundary; anything else
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    R,
    F,
    C,
    X,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
}

impl Key {
    /// Parse a platform key identifier ("w", "ArrowUp", "Shift", ...).
    /// Returns `None` for keys this system does not use.
    pub fn parse(id: &str) -> Option<Key> {
        match id.to_ascii_lowercase().as_str() {
            "w" => Some(Key::W),
            "a" => Some(Key::A),
            "s" => Some(Key::S),
            "d" => Some(Key::D),
            "r" => Some(Key::R),
            "f" => Some(Key::F),
            "c" => Some(Key::C),
            "x" => Some(Key::X),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            "shift" => Some(Key::Shift),
            _ => None,
        }
    }
}

/// Set of currently pressed keys. Updated by key-down/key-up callbacks,
/// read once per simulation step.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    down: HashSet<Key>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key-down by platform identifier. Returns the canonical key
    /// if it was recognized.
    pub fn press_id(&mut self, id: &str) -> Option<Key> {
        let key = Key::parse(id);
        match key {
            Some(k) => {
                self.down.insert(k);
            }
            None => tracing::trace!(id, "Ignoring unrecognized key"),
        }
        key
    }

    /// Register a key-up by platform identifier.
    pub fn release_id(&mut self, id: &str) -> Option<Key> {
        let key = Key::parse(id);
        if let Some(k) = key {
            self.down.remove(&k);
        }
        key
    }

    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.down.contains(k))
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

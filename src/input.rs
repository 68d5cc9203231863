//! Key-state table.
//!
//! The driver owns a `KeyTracker` and feeds it key-down / key-up events as
//! they arrive.  Once per frame it takes an immutable `KeyState` snapshot and
//! hands that to the core; entities never see the live table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Abstract key identifier.  Character keys are stored lower-cased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub fn char(c: char) -> Key {
        Key::Char(c.to_ascii_lowercase())
    }
}

/// The five logical actions of one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMap {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub fire: Key,
}

impl KeyMap {
    /// W / S / A / D, fire on E.
    pub fn player_one() -> Self {
        Self {
            up: Key::Char('w'),
            down: Key::Char('s'),
            left: Key::Char('a'),
            right: Key::Char('d'),
            fire: Key::Char('e'),
        }
    }

    /// Arrow keys, fire on `/`.
    pub fn player_two() -> Self {
        Self {
            up: Key::Up,
            down: Key::Down,
            left: Key::Left,
            right: Key::Right,
            fire: Key::Char('/'),
        }
    }
}

// ── Per-frame snapshot ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyState {
    held: HashMap<Key, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot where exactly `keys` are held.
    pub fn holding(keys: &[Key]) -> Self {
        Self {
            held: keys.iter().map(|&k| (k, true)).collect(),
        }
    }

    pub fn set(&mut self, key: Key, held: bool) {
        self.held.insert(key, held);
    }

    /// Keys missing from the table are not held.
    pub fn is_held(&self, key: Key) -> bool {
        self.held.get(&key).copied().unwrap_or(false)
    }
}

// ── Live table ────────────────────────────────────────────────────────────────

/// Records, for each held key, the frame it was last seen (press or repeat).
///
/// Terminals that report key releases clear entries immediately.  Classic
/// terminals only send presses, with OS auto-repeat standing in for "still
/// held"; for those a `HoldWindow` expires keys that went quiet.  A key seen
/// only once gets the long `first` window, which has to outlast the OS delay
/// before auto-repeat starts.  Once repeats arrive, the short `repeat` window
/// applies.
#[derive(Clone, Debug)]
pub struct KeyTracker {
    last_seen: HashMap<Key, Seen>,
    hold_window: Option<HoldWindow>,
}

/// Frame counts after which a quiet key counts as released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HoldWindow {
    first: u64,
    repeat: u64,
}

#[derive(Clone, Copy, Debug)]
struct Seen {
    frame: u64,
    repeated: bool,
}

impl KeyTracker {
    /// Keys stay held until released.
    pub fn with_releases() -> Self {
        Self {
            last_seen: HashMap::new(),
            hold_window: None,
        }
    }

    /// Keys expire `first` frames after a lone press, or `repeat` frames
    /// after their latest auto-repeat.
    pub fn with_hold_window(first: u64, repeat: u64) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold_window: Some(HoldWindow { first, repeat }),
        }
    }

    /// A press of a key that is still held counts as a repeat; anything else
    /// starts a fresh hold.
    pub fn press(&mut self, key: Key, frame: u64) {
        let repeated = self.is_held(key, frame);
        self.last_seen.insert(key, Seen { frame, repeated });
    }

    pub fn release(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    pub fn is_held(&self, key: Key, frame: u64) -> bool {
        match (self.last_seen.get(&key), self.hold_window) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(seen), Some(window)) => {
                let limit = if seen.repeated {
                    window.repeat
                } else {
                    window.first
                };
                frame.saturating_sub(seen.frame) <= limit
            }
        }
    }

    pub fn snapshot(&self, frame: u64) -> KeyState {
        let mut state = KeyState::new();
        for &key in self.last_seen.keys() {
            state.set(key, self.is_held(key, frame));
        }
        state
    }
}

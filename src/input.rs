//! Keyboard input mapping
//!
//! Movement and rotate keys are tracked as held and auto-repeated through
//! [`KeyRepeat`]. The primary and restart keys act once per key-down.
//!
//! Many terminals never send key release events. When releases are not
//! reported, a held key counts as released once no press or repeat event has
//! been seen for [`KEY_TIMEOUT`].

use crate::game::Action;
use crate::settings::Settings;
use crate::timing::{KeyRepeat, RepeatAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};
use std::time::{Duration, Instant};

/// Time after which we consider a key "released" if no repeat received
const KEY_TIMEOUT: Duration = Duration::from_millis(150);

/// What a key press asks of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Action),
    Quit,
}

/// Key bindings configuration - supports multiple keys per action
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub primary: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        let lower = s.to_lowercase();
        let code = match lower.as_str() {
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" | "escape" => KeyCode::Esc,
            "shift" => KeyCode::Modifier(ModifierKeyCode::LeftShift),
            "ctrl" | "control" => KeyCode::Modifier(ModifierKeyCode::LeftControl),
            "alt" => KeyCode::Modifier(ModifierKeyCode::LeftAlt),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };
        Some(code)
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    tracing::warn!(key = %s, "ignoring unknown key name in bindings");
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            move_left: Self::parse_keys(&settings.keys.move_left),
            move_right: Self::parse_keys(&settings.keys.move_right),
            soft_drop: Self::parse_keys(&settings.keys.soft_drop),
            rotate: Self::parse_keys(&settings.keys.rotate),
            primary: Self::parse_keys(&settings.keys.primary),
            restart: Self::parse_keys(&settings.keys.restart),
            quit: Self::parse_keys(&settings.keys.quit),
        }
    }

    /// The auto-repeating action bound to `code`, if any
    fn repeat_action(&self, code: KeyCode) -> Option<RepeatAction> {
        if self.move_left.contains(&code) {
            Some(RepeatAction::Left)
        } else if self.move_right.contains(&code) {
            Some(RepeatAction::Right)
        } else if self.soft_drop.contains(&code) {
            Some(RepeatAction::Down)
        } else if self.rotate.contains(&code) {
            Some(RepeatAction::Rotate)
        } else {
            None
        }
    }
}

/// Input handler feeding the repeat limiter
pub struct InputHandler {
    bindings: KeyBindings,
    repeat: KeyRepeat,
    /// Last press or repeat event per held action, for release timeouts
    last_seen: [Option<Instant>; 4],
    /// Whether the terminal reports key releases
    reports_release: bool,
}

impl InputHandler {
    /// Create input handler from settings
    pub fn from_settings(settings: &Settings, reports_release: bool) -> Self {
        Self {
            bindings: KeyBindings::from_settings(settings),
            repeat: KeyRepeat::new(settings.gameplay.repeat_intervals()),
            last_seen: [None; 4],
            reports_release,
        }
    }

    /// Handle a key press or repeat event
    /// Held actions are only recorded here; they fire from [`Self::update`].
    pub fn key_down(&mut self, key: KeyEvent, now: Instant) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);

        if let Some(held) = self.bindings.repeat_action(code) {
            self.repeat.press(held);
            self.last_seen[held.index()] = Some(now);
            return None;
        }

        if self.bindings.primary.contains(&code) {
            Some(Command::Game(Action::Primary))
        } else if self.bindings.restart.contains(&code) {
            Some(Command::Game(Action::Restart))
        } else if self.bindings.quit.contains(&code) {
            Some(Command::Quit)
        } else {
            None
        }
    }

    /// Handle a key release event (only sent by some terminals)
    pub fn key_up(&mut self, key: KeyEvent) {
        let code = normalize_key(key.code);
        if let Some(held) = self.bindings.repeat_action(code) {
            self.repeat.release(held);
            self.last_seen[held.index()] = None;
        }
    }

    /// Expire silent keys and return the repeat actions due (call every frame)
    pub fn update(&mut self, now: Instant) -> Vec<Action> {
        if !self.reports_release {
            for held in RepeatAction::ALL {
                let seen = &mut self.last_seen[held.index()];
                if seen.is_some_and(|t| now.saturating_duration_since(t) > KEY_TIMEOUT) {
                    *seen = None;
                    self.repeat.release(held);
                }
            }
        }
        self.repeat.poll(now)
    }

    /// Clear all held keys and the repeat ledger
    pub fn clear(&mut self) {
        self.repeat.clear();
        self.last_seen = [None; 4];
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

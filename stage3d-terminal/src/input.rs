//! Terminal key handling
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use stage3d_core::{InputTracker, Key};
use std::time::{Duration, Instant};

/// Camera orbit per key press, in radians
pub const ORBIT_STEP: f32 = 0.1;
/// Dolly per key press
pub const DOLLY_STEP: f32 = 0.1;

/// Without release events a key counts as held until its auto-repeat stops
/// for this long. Covers the usual initial repeat delay.
const HOLD_TIMEOUT: Duration = Duration::from_millis(600);

/// What one key event asks the app to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Press(Key),
    Release(Key),
    Orbit { yaw: f32, pitch: f32 },
    Dolly(f32),
    Quit,
}

/// Translate a crossterm key event.
///
/// `s` is the stop key, so pitching down is only bound to the down arrow.
pub fn map_key(event: &KeyEvent) -> Option<Command> {
    let demo_key = match event.code {
        KeyCode::Char(' ') => Some(Key::Action),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::Stop),
        _ => None,
    };
    if let Some(key) = demo_key {
        return match event.kind {
            KeyEventKind::Release => Some(Command::Release(key)),
            KeyEventKind::Press | KeyEventKind::Repeat => Some(Command::Press(key)),
        };
    }

    if event.kind == KeyEventKind::Release {
        return None;
    }

    match event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Left | KeyCode::Char('a') => Some(Command::Orbit {
            yaw: -ORBIT_STEP,
            pitch: 0.0,
        }),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::Orbit {
            yaw: ORBIT_STEP,
            pitch: 0.0,
        }),
        KeyCode::Up | KeyCode::Char('w') => Some(Command::Orbit {
            yaw: 0.0,
            pitch: ORBIT_STEP,
        }),
        KeyCode::Down => Some(Command::Orbit {
            yaw: 0.0,
            pitch: -ORBIT_STEP,
        }),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::Dolly(DOLLY_STEP)),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Command::Dolly(-DOLLY_STEP)),
        _ => None,
    }
}

/// Releases keys whose presses have stopped arriving, for terminals that
/// never report key releases
#[derive(Debug, Default)]
pub struct HoldLatch {
    last_seen: [Option<Instant>; 2],
}

impl HoldLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pressed(&mut self, key: Key, now: Instant) {
        self.last_seen[slot(key)] = Some(now);
    }

    /// Release every key not seen within the hold timeout
    pub fn expire(&mut self, now: Instant, tracker: &mut InputTracker) {
        for key in [Key::Action, Key::Stop] {
            let seen = &mut self.last_seen[slot(key)];
            if let Some(at) = *seen {
                if now.duration_since(at) >= HOLD_TIMEOUT {
                    *seen = None;
                    tracker.release(key);
                }
            }
        }
    }
}

fn slot(key: Key) -> usize {
    match key {
        Key::Action => 0,
        Key::Stop => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_demo_keys_map_press_and_release() {
        assert_eq!(
            map_key(&event(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(Command::Press(Key::Action))
        );
        assert_eq!(
            map_key(&event(KeyCode::Char(' '), KeyEventKind::Release)),
            Some(Command::Release(Key::Action))
        );
        assert_eq!(
            map_key(&event(KeyCode::Char('s'), KeyEventKind::Repeat)),
            Some(Command::Press(Key::Stop))
        );
    }

    #[test]
    fn test_camera_and_quit_keys() {
        assert_eq!(map_key(&event(KeyCode::Esc, KeyEventKind::Press)), Some(Command::Quit));
        assert_eq!(
            map_key(&event(KeyCode::Left, KeyEventKind::Press)),
            Some(Command::Orbit {
                yaw: -ORBIT_STEP,
                pitch: 0.0
            })
        );
        assert_eq!(
            map_key(&event(KeyCode::Char('+'), KeyEventKind::Press)),
            Some(Command::Dolly(DOLLY_STEP))
        );
        // Releases of non-demo keys are ignored
        assert_eq!(map_key(&event(KeyCode::Char('q'), KeyEventKind::Release)), None);
        assert_eq!(map_key(&event(KeyCode::Char('x'), KeyEventKind::Press)), None);
    }

    #[test]
    fn test_latch_releases_after_timeout() {
        let mut tracker = InputTracker::new();
        let mut latch = HoldLatch::new();
        let start = Instant::now();

        tracker.press(Key::Action);
        latch.pressed(Key::Action, start);

        latch.expire(start + Duration::from_millis(100), &mut tracker);
        assert!(tracker.is_held(Key::Action));

        // Auto-repeat keeps it alive
        latch.pressed(Key::Action, start + Duration::from_millis(500));
        latch.expire(start + Duration::from_millis(900), &mut tracker);
        assert!(tracker.is_held(Key::Action));

        latch.expire(start + Duration::from_millis(1200), &mut tracker);
        assert!(!tracker.is_held(Key::Action));
    }
}

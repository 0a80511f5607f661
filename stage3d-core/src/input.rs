//! Keyboard input, reduced to a per-frame snapshot
//!
//! Hosts feed raw press/release events into an [`InputTracker`] as they
//! arrive and take one [`InputState`] per frame. Demos never see the
//! events themselves.

/// Keys the demos react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Space: hold to animate (scatter) or toggle swing (fan)
    Action,
    /// `s`: toggle the fan blades
    Stop,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            " " | "Space" | "Spacebar" => Some(Key::Action),
            "s" | "S" => Some(Key::Stop),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Key::Action => 0,
            Key::Stop => 1,
        }
    }
}

/// What the keyboard looked like for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub action_held: bool,
    /// Action went down since the previous frame
    pub action_pressed: bool,
    /// Stop went down since the previous frame
    pub stop_pressed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct KeyState {
    held: bool,
    pressed: bool,
}

/// Accumulates key events between frames
#[derive(Debug, Default)]
pub struct InputTracker {
    keys: [KeyState; 2],
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat presses while held do not count as new presses.
    pub fn press(&mut self, key: Key) {
        let state = &mut self.keys[key.index()];
        if !state.held {
            state.pressed = true;
        }
        state.held = true;
    }

    pub fn release(&mut self, key: Key) {
        self.keys[key.index()].held = false;
    }

    /// Forget held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        for state in &mut self.keys {
            state.held = false;
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys[key.index()].held
    }

    /// Take this frame's snapshot and clear the press edges
    pub fn snapshot(&mut self) -> InputState {
        let action = self.keys[Key::Action.index()];
        let stop = self.keys[Key::Stop.index()];
        for state in &mut self.keys {
            state.pressed = false;
        }

        InputState {
            action_held: action.held,
            action_pressed: action.pressed,
            stop_pressed: stop.pressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_reported_once() {
        let mut tracker = InputTracker::new();
        tracker.press(Key::Action);

        let first = tracker.snapshot();
        assert!(first.action_held);
        assert!(first.action_pressed);

        let second = tracker.snapshot();
        assert!(second.action_held);
        assert!(!second.action_pressed);
    }

    #[test]
    fn test_auto_repeat_does_not_retrigger() {
        let mut tracker = InputTracker::new();
        tracker.press(Key::Stop);
        tracker.snapshot();
        tracker.press(Key::Stop);
        assert!(!tracker.snapshot().stop_pressed);

        tracker.release(Key::Stop);
        tracker.press(Key::Stop);
        assert!(tracker.snapshot().stop_pressed);
    }

    #[test]
    fn test_tap_between_frames_still_counts() {
        let mut tracker = InputTracker::new();
        tracker.press(Key::Action);
        tracker.release(Key::Action);

        let state = tracker.snapshot();
        assert!(state.action_pressed);
        assert!(!state.action_held);
    }

    #[test]
    fn test_release_all() {
        let mut tracker = InputTracker::new();
        tracker.press(Key::Action);
        tracker.release_all();
        assert!(!tracker.is_held(Key::Action));
        assert!(!tracker.snapshot().action_held);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name(" "), Some(Key::Action));
        assert_eq!(Key::from_name("s"), Some(Key::Stop));
        assert_eq!(Key::from_name("Enter"), None);
    }
}

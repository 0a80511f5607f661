//! Frame time sources
use std::time::Instant;

/// Time handed to a demo for one frame, in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Since the clock started; never decreases
    pub elapsed: f32,
    /// Since the previous tick
    pub delta: f32,
}

pub trait Clock {
    /// Read the clock for a new frame
    fn tick(&mut self) -> FrameTime;
}

/// Wall clock for native hosts
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    last: f32,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: 0.0,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed().as_secs_f32();
        let delta = elapsed - self.last;
        self.last = elapsed;
        FrameTime { elapsed, delta }
    }
}

/// Clock driven by the host (browser timestamps) or by tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f32,
    last: f32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to `elapsed` seconds; going backwards is ignored
    pub fn set(&mut self, elapsed: f32) {
        if elapsed > self.now {
            self.now = elapsed;
        }
    }

    pub fn advance(&mut self, seconds: f32) {
        self.set(self.now + seconds);
    }
}

impl Clock for ManualClock {
    fn tick(&mut self) -> FrameTime {
        let delta = self.now - self.last;
        self.last = self.now;
        FrameTime {
            elapsed: self.now,
            delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut clock = ManualClock::new();
        clock.set(2.0);
        assert_eq!(clock.tick(), FrameTime { elapsed: 2.0, delta: 2.0 });

        clock.set(1.0);
        assert_eq!(clock.tick(), FrameTime { elapsed: 2.0, delta: 0.0 });

        clock.advance(0.5);
        assert_eq!(clock.tick(), FrameTime { elapsed: 2.5, delta: 0.5 });
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let mut clock = SystemClock::new();
        let first = clock.tick();
        let second = clock.tick();
        assert!(second.elapsed >= first.elapsed);
        assert!(second.delta >= 0.0);
    }
}

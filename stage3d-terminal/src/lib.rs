/// Terminal host for stage3d demos
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use stage3d_core::{Camera, Clock, Demo, InputTracker, OrbitControls, SystemClock};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod input;
pub mod renderer;

pub use input::{map_key, Command, HoldLatch};
pub use renderer::{AsciiRenderer, CELL_ASPECT};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    demo: Box<dyn Demo>,
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    tracker: InputTracker,
    latch: HoldLatch,
    clock: SystemClock,
    /// The terminal reports key releases, so the latch is not needed
    release_events: bool,
    target_fps: u32,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(demo: Box<dyn Demo>, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let mut camera = demo.camera();
        camera.set_viewport(width as f32, height as f32 * CELL_ASPECT);

        Ok(Self {
            demo,
            camera,
            controls: OrbitControls::default(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            tracker: InputTracker::new(),
            latch: HoldLatch::new(),
            clock: SystemClock::new(),
            release_events: false,
            target_fps: target_fps.max(1),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!(release_events = self.release_events, demo = %self.demo.kind(), "Terminal ready");

        let result = self.main_loop();

        // Cleanup, even when the loop failed
        if self.release_events {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), ResetColor, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.target_fps;

        while self.running {
            let frame_start = Instant::now();

            // Drain every pending event without blocking
            while event::poll(Duration::ZERO)? {
                self.handle_event(event::read()?);
            }
            if !self.release_events {
                self.latch.expire(frame_start, &mut self.tracker);
            }

            // Update
            let input = self.tracker.snapshot();
            let time = self.clock.tick();
            self.demo.step(time, &input);
            self.controls.update(&mut self.camera);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
                debug!(fps = self.fps, "Frame rate");
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => match map_key(&key) {
                Some(Command::Press(key)) => {
                    self.tracker.press(key);
                    self.latch.pressed(key, Instant::now());
                }
                Some(Command::Release(key)) => self.tracker.release(key),
                Some(Command::Orbit { yaw, pitch }) => self.controls.rotate(yaw, pitch),
                Some(Command::Dolly(amount)) => self.controls.dolly(amount),
                Some(Command::Quit) => self.running = false,
                None => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            Event::FocusLost => self.tracker.release_all(),
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        if width == 0 || height == 0 {
            warn!(width, height, "Ignoring empty terminal size");
            return;
        }
        self.renderer.resize(width as usize, height as usize);
        self.camera.set_viewport(width as f32, height as f32 * CELL_ASPECT);
        debug!(width, height, "Terminal resized");
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.render_scene(self.demo.scene(), &self.camera);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "stage3d {} | FPS: {:.1} | Space=Action S=Stop Arrows/WAD=Orbit +/-=Zoom Q=Quit",
                self.demo.kind(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

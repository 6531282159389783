//! Desktop simulator for the bubble level.
//!
//! Renders level-core pages in an SDL2 window via `embedded-graphics-simulator`.
//! A synthetic motion sensor feeds gravity vectors through the full pipeline,
//! either wobbling on its own or steered from the keyboard.
//!
//! # Key bindings
//!
//! | Key              | Action                          |
//! |------------------|---------------------------------|
//! | Arrows / WASD    | Tilt (switches to manual mode)  |
//! | M                | Toggle automatic wobble         |
//! | R                | Level the device                |
//! | Space            | Pause / resume                  |
//! | Q / Esc          | Quit                            |
//!
//! # Flags
//!
//! - `--accelerometer`: only offer a raw accelerometer (low-pass path)
//! - `--no-sensor`: offer no sensor at all (unavailable page)

use std::time::{Duration, Instant};

use embassy_futures::block_on;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use level_core::app_state::{AppRunState, LevelApp, TILT_CHANNEL};
use level_core::config::LevelConfig;
use level_core::framebuffer::FrameBuffer;
use level_core::sensors::{GravitySample, MotionSensor, SensorError, SensorKind};
use level_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Standard gravity in m/s².
const GRAVITY: f32 = 9.81;

/// Degrees added per key press in manual mode.
const KEY_STEP_DEG: f32 = 2.0;

/// Manual tilt limit; the tangent construction breaks down at 90°.
const MAX_MANUAL_TILT_DEG: f32 = 80.0;

// ---------------------------------------------------------------------------
// Synthetic sensor
// ---------------------------------------------------------------------------

/// Generates gravity vectors for a device tilted by (pitch, roll).
struct SimulatedSensor {
    kind: SensorKind,
    started: Instant,
    wobble: bool,
    pitch_deg: f32,
    roll_deg: f32,
}

impl SimulatedSensor {
    fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            started: Instant::now(),
            wobble: true,
            pitch_deg: 0.0,
            roll_deg: 0.0,
        }
    }

    /// Nudge the manual tilt, leaving wobble mode.
    fn nudge(&mut self, pitch_deg: f32, roll_deg: f32) {
        self.wobble = false;
        self.pitch_deg =
            (self.pitch_deg + pitch_deg).clamp(-MAX_MANUAL_TILT_DEG, MAX_MANUAL_TILT_DEG);
        self.roll_deg = (self.roll_deg + roll_deg).clamp(-MAX_MANUAL_TILT_DEG, MAX_MANUAL_TILT_DEG);
    }

    fn level(&mut self) {
        self.wobble = false;
        self.pitch_deg = 0.0;
        self.roll_deg = 0.0;
    }

    fn toggle_wobble(&mut self) {
        self.wobble = !self.wobble;
        info!(
            "{} mode",
            if self.wobble { "Wobble" } else { "Manual" }
        );
    }

    /// Current (pitch, roll) in degrees.
    fn angles(&self) -> (f32, f32) {
        if !self.wobble {
            return (self.pitch_deg, self.roll_deg);
        }
        let t = self.started.elapsed().as_secs_f32();
        (15.0 * (t * 0.5).sin(), 20.0 * (t * 0.3).cos())
    }

    /// Gravity vector whose pitch/roll decode back to `angles()`.
    fn gravity(&self) -> GravitySample {
        let (pitch, roll) = self.angles();
        let (x, y) = (roll.to_radians().tan(), pitch.to_radians().tan());
        let scale = GRAVITY / (x * x + y * y + 1.0).sqrt();
        let mut sample = GravitySample::new(x * scale, y * scale, scale);

        if self.kind == SensorKind::Accelerometer {
            // Hand tremor the low-pass filter is there to hide
            let t = self.started.elapsed().as_secs_f32();
            sample.x += 0.4 * (t * 23.0).sin();
            sample.y += 0.4 * (t * 17.0).cos();
        }
        sample
    }
}

impl MotionSensor for SimulatedSensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    async fn read(&mut self) -> Result<GravitySample, SensorError> {
        Ok(self.gravity())
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Sensor kinds offered to the app, from the command line.
fn available_sensors() -> Vec<SensorKind> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--no-sensor") {
        Vec::new()
    } else if args.iter().any(|a| a == "--accelerometer") {
        vec![SensorKind::Accelerometer]
    } else {
        vec![SensorKind::Gravity, SensorKind::Accelerometer]
    }
}

fn main() {
    env_logger::init();
    info!("Starting level simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: arrows/WASD=tilt  M=wobble  R=level  Space=pause  Q=quit");

    let available = available_sensors();
    let mut sensor = SimulatedSensor::new(
        available
            .first()
            .copied()
            .unwrap_or(SensorKind::Gravity),
    );

    let mut app = match LevelApp::new(
        FrameBuffer::new(),
        &TILT_CHANNEL,
        &available,
        LevelConfig::default(),
    ) {
        Ok(app) => app,
        Err(e) => {
            error!("Cannot start: {}", e);
            return;
        }
    };

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Level Simulator", &output_settings);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = app.tick();
    let _ = app
        .display_manager_mut()
        .display_mut()
        .flush(&mut display);
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::Up | Keycode::W => sensor.nudge(-KEY_STEP_DEG, 0.0),
                    Keycode::Down | Keycode::S => sensor.nudge(KEY_STEP_DEG, 0.0),
                    Keycode::Left | Keycode::A => sensor.nudge(0.0, -KEY_STEP_DEG),
                    Keycode::Right | Keycode::D => sensor.nudge(0.0, KEY_STEP_DEG),
                    Keycode::M => sensor.toggle_wobble(),
                    Keycode::R => sensor.level(),
                    Keycode::Space => match app.run_state() {
                        AppRunState::Running => app.pause(),
                        AppRunState::Paused => {
                            if let Err(e) = app.resume() {
                                error!("Cannot resume: {}", e);
                            }
                        }
                        AppRunState::SensorUnavailable => {}
                    },
                    _ => {}
                },

                _ => {}
            }
        }

        // --- Sensor sample ------------------------------------------------
        if app.run_state() == AppRunState::Running {
            if let Err(e) = block_on(app.poll(&mut sensor)) {
                warn!("Sensor read failed: {}", e);
            }
        }

        // --- Render -------------------------------------------------------
        if let Err(e) = app.tick() {
            error!("Draw error: {:?}", e);
        }
        let _ = app
            .display_manager_mut()
            .display_mut()
            .flush(&mut display);
        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}

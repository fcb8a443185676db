use airdraw_config::AppConfig;
use airdraw_input::Key;
use airdraw_motion::{AxisReading, MotionEvent, OrientationEvent, RateReading};
use airdraw_session::{InputMode, TrackingSession};
use anyhow::Result;
use tracing::{info, warn};

/// Simulated frame period: 60 fps.
const FRAME_MS: f64 = 1000.0 / 60.0;

/// Headless demo driver standing in for the render loop: scripts a keyboard
/// flight and a synthetic sensor segment, logging what a renderer would
/// draw each frame.
struct Demo {
    session: TrackingSession,
    now_ms: f64,
    frames: u64,
}

impl Demo {
    fn new(session: TrackingSession) -> Self {
        Self {
            session,
            now_ms: 0.0,
            frames: 0,
        }
    }

    /// Key-down with command bindings: `d` toggles drawing, `c` clears,
    /// `x` recenters.
    fn key_down(&mut self, id: &str) {
        match self.session.key_down(id) {
            Some(Key::D) => {
                let active = self.session.is_drawing();
                self.session.set_drawing(!active);
            }
            Some(Key::C) => self.session.clear(),
            Some(Key::X) => self.session.recenter(),
            _ => {}
        }
    }

    fn key_up(&mut self, id: &str) {
        self.session.key_up(id);
    }

    /// Advance `frames` simulation steps, logging HUD stats once a second.
    fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.now_ms += FRAME_MS;
            self.frames += 1;
            let frame = self.session.tick(self.now_ms);
            if self.frames % 60 == 0 {
                info!(
                    t_s = format_args!("{:.1}", self.now_ms / 1000.0),
                    speed_mps = format_args!("{:.2}", frame.speed_mps()),
                    distance_m = format_args!("{:.2}", frame.distance_m()),
                    strokes = frame.strokes.len(),
                    "HUD"
                );
            }
        }
    }
}

/// Keyboard flight: draw a short run forward, boost, then turn using a
/// rotated view basis pushed by the "camera".
fn keyboard_segment(demo: &mut Demo) {
    info!("Keyboard segment: W forward, Shift boost, draw toggled with D");
    demo.session.set_mode(InputMode::Keyboard);

    demo.key_down("d");
    demo.key_down("w");
    demo.run(120);

    demo.key_down("shift");
    demo.run(60);
    demo.key_up("shift");

    // Camera yaws 90 degrees; forward flight now tracks +X.
    demo.session.set_view_basis(glam::Vec3::X, glam::Vec3::Z);
    demo.run(120);

    demo.key_up("w");
    demo.key_down("d");
    demo.run(30);
}

/// Sensor segment: synthetic orientation plus an acceleration pulse, then
/// stillness long enough for the zero-velocity reset to land.
fn sensor_segment(demo: &mut Demo) {
    info!("Sensor segment: synthetic motion events, then stillness");
    demo.session.set_mode(InputMode::Sensor);

    // Yaw only: gravity stays aligned with world down, so the at-rest
    // reading cancels exactly while the push is steered by the heading.
    demo.session.orientation_event(OrientationEvent {
        alpha: Some(15.0),
        beta: None,
        gamma: None,
    });
    demo.session.screen_rotation_event(Some(0.0));

    // One second of a gentle push to the side, gravity riding along.
    demo.session.motion_event(MotionEvent {
        accel_including_gravity: Some(AxisReading {
            x: Some(0.8),
            y: Some(0.0),
            z: Some(-9.81),
        }),
        rotation_rate: Some(RateReading {
            alpha: Some(12.0),
            beta: Some(2.0),
            gamma: Some(1.0),
        }),
    });
    demo.run(60);

    // Back to rest: the stability window zeroes the velocity.
    demo.session.motion_event(MotionEvent {
        accel_including_gravity: Some(AxisReading {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(-9.81),
        }),
        rotation_rate: Some(RateReading {
            alpha: Some(0.1),
            beta: Some(0.1),
            gamma: Some(0.0),
        }),
    });
    demo.run(60);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airdraw=info,airdraw_session=info".into()),
        )
        .init();

    info!("Airdraw dead-reckoning demo starting");

    let config = airdraw_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let mut demo = Demo::new(TrackingSession::new(&config));

    keyboard_segment(&mut demo);
    sensor_segment(&mut demo);

    let total_points: usize = demo
        .session
        .strokes()
        .iter()
        .map(|s| s.points().len())
        .sum();
    info!(
        strokes = demo.session.strokes().len(),
        total_points,
        final_position = ?demo.session.position(),
        "Demo finished"
    );

    Ok(())
}

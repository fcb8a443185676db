//! Per-frame session glue: one simulation tick per rendered frame.
//!
//! Sensor and keyboard callbacks only write the latest raw value into the
//! session's cells; integration, stability evaluation, and stroke mutation
//! all happen inside [`TrackingSession::tick`]. Commands (draw on/off,
//! clear, recenter, mode switch) queue up and take effect atomically at the
//! start of the next tick.

use airdraw_config::{AppConfig, KeyboardConfig, MotionConfig, StrokeConfig};
use airdraw_input::{Key, KeySet, KeyboardSimulator, KeyboardTuning, ViewBasis};
use airdraw_motion::{
    FrameClock, InertialIntegrator, IntegratorTuning, MotionEvent, OrientationEvent, SensorInputs,
    WorldState,
};
use airdraw_stroke::{Stroke, StrokeId, StrokeRecorder, StrokeStyle};
use glam::Vec3;
use tracing::{debug, info, warn};

/// Frames between debug heartbeats.
const HEARTBEAT_FRAMES: u64 = 300;

/// Which input path drives the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Inertial dead reckoning from motion/orientation events.
    Sensor,
    /// Keyboard flight for environments without motion sensors.
    Keyboard,
}

/// The active integrator. Owning the per-mode state inside the variant
/// keeps simultaneous-mode states unrepresentable.
enum Mode {
    Sensor(InertialIntegrator),
    Keyboard(KeyboardSimulator),
}

impl Mode {
    fn input_mode(&self) -> InputMode {
        match self {
            Mode::Sensor(_) => InputMode::Sensor,
            Mode::Keyboard(_) => InputMode::Keyboard,
        }
    }
}

/// Deferred user command, applied at the start of the next tick.
#[derive(Debug, Clone, Copy)]
enum Command {
    SetDrawing(bool),
    Clear,
    Recenter,
    SetMode(InputMode),
}

/// Snapshot handed to the presentation layer once per frame.
#[derive(Debug)]
pub struct Frame<'a> {
    /// World-frame position in meters.
    pub position: Vec3,
    /// World-frame velocity in m/s.
    pub velocity: Vec3,
    /// All strokes in draw order, the in-progress one last.
    pub strokes: &'a [Stroke],
}

impl Frame<'_> {
    /// Instantaneous speed in m/s, as shown on the HUD.
    pub fn speed_mps(&self) -> f32 {
        self.velocity.length()
    }

    /// Straight-line distance from the world origin in meters.
    pub fn distance_m(&self) -> f32 {
        self.position.length()
    }
}

/// The drawing-tracker session: sensor cells, world state, stroke recorder,
/// and the per-frame tick that drives them.
pub struct TrackingSession {
    start_position: Vec3,
    integrator_tuning: IntegratorTuning,
    keyboard_tuning: KeyboardTuning,

    inputs: SensorInputs,
    keys: KeySet,
    view: ViewBasis,

    state: WorldState,
    clock: FrameClock,
    mode: Mode,

    recorder: StrokeRecorder,
    drawing: bool,
    active_stroke: Option<StrokeId>,
    style: StrokeStyle,

    pending: Vec<Command>,
    frame_count: u64,
}

impl TrackingSession {
    pub fn new(config: &AppConfig) -> Self {
        let integrator_tuning = integrator_tuning(&config.motion);
        let keyboard_tuning = keyboard_tuning(&config.keyboard);
        info!(
            start = ?config.start_position,
            gravity_included = config.motion.gravity_included,
            "Session created"
        );
        Self {
            start_position: config.start_position,
            integrator_tuning,
            keyboard_tuning,
            inputs: SensorInputs::new(),
            keys: KeySet::new(),
            view: ViewBasis::default(),
            state: WorldState::at(config.start_position),
            clock: FrameClock::new(),
            mode: Mode::Sensor(InertialIntegrator::new(integrator_tuning)),
            recorder: StrokeRecorder::new(config.stroke.min_spacing_m),
            drawing: false,
            active_stroke: None,
            style: stroke_style(&config.stroke),
            pending: Vec::new(),
            frame_count: 0,
        }
    }

    // ----- asynchronous event side: cells only, no integration -----

    /// Latest orientation sample; refreshes the fused rotation immediately.
    pub fn orientation_event(&mut self, event: OrientationEvent) {
        self.inputs.apply_orientation(event);
    }

    /// Latest screen-rotation angle in degrees; refreshes the fused rotation.
    pub fn screen_rotation_event(&mut self, angle_deg: Option<f32>) {
        self.inputs.apply_screen_rotation(angle_deg);
    }

    /// Latest motion sample (acceleration including gravity, rotation rate).
    pub fn motion_event(&mut self, event: MotionEvent) {
        self.inputs.apply_motion(event);
    }

    /// Key-down by platform identifier. Returns the canonical key if known.
    pub fn key_down(&mut self, id: &str) -> Option<Key> {
        self.keys.press_id(id)
    }

    /// Key-up by platform identifier.
    pub fn key_up(&mut self, id: &str) -> Option<Key> {
        self.keys.release_id(id)
    }

    /// Latest camera basis from the presentation layer, for keyboard flight.
    pub fn set_view_basis(&mut self, forward: Vec3, right: Vec3) {
        if !forward.is_finite() || !right.is_finite() {
            warn!(?forward, ?right, "Ignoring non-finite view basis");
            return;
        }
        self.view = ViewBasis { forward, right };
    }

    /// Style applied to strokes begun after this call.
    pub fn set_stroke_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    // ----- command side: queued, applied at the next tick -----

    pub fn set_drawing(&mut self, active: bool) {
        self.pending.push(Command::SetDrawing(active));
    }

    pub fn clear(&mut self) {
        self.pending.push(Command::Clear);
    }

    pub fn recenter(&mut self) {
        self.pending.push(Command::Recenter);
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.pending.push(Command::SetMode(mode));
    }

    // ----- per-frame tick -----

    /// Run one simulation step and return the frame snapshot.
    ///
    /// `now_ms` is the frame timestamp in milliseconds on any monotonic
    /// clock; the step is clamped by the frame clock.
    pub fn tick(&mut self, now_ms: f64) -> Frame<'_> {
        let pending = std::mem::take(&mut self.pending);
        for command in pending {
            self.apply(command);
        }

        let dt = self.clock.tick(now_ms);

        match &mut self.mode {
            Mode::Sensor(integrator) => integrator.step(
                dt,
                self.inputs.accel_including_gravity(),
                self.inputs.rotation_rate(),
                self.inputs.device_to_world(),
                &mut self.state,
                now_ms,
            ),
            Mode::Keyboard(simulator) => {
                simulator.step(dt, &self.keys, &self.view, &mut self.state)
            }
        }

        if self.drawing {
            if let Some(id) = self.active_stroke {
                self.recorder.append(id, self.state.position);
            }
        }

        self.frame_count += 1;
        if self.frame_count % HEARTBEAT_FRAMES == 0 {
            debug!(
                frames = self.frame_count,
                position = ?self.state.position,
                strokes = self.recorder.strokes().len(),
                "Tick heartbeat"
            );
        }

        Frame {
            position: self.state.position,
            velocity: self.state.velocity,
            strokes: self.recorder.strokes(),
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetDrawing(active) if active != self.drawing => {
                self.drawing = active;
                if active {
                    let id = self.recorder.begin(self.style, self.state.position);
                    self.active_stroke = Some(id);
                    info!(at = ?self.state.position, "Drawing on");
                } else {
                    if let Some(id) = self.active_stroke.take() {
                        self.recorder.end(id);
                    }
                    info!("Drawing off");
                }
            }
            Command::SetDrawing(_) => {}
            Command::Clear => {
                self.recorder.clear();
                self.active_stroke = None;
            }
            Command::Recenter => {
                self.state.position = self.start_position;
                self.state.velocity = Vec3::ZERO;
                info!("Recentered");
            }
            Command::SetMode(mode) if mode != self.mode.input_mode() => {
                self.mode = match mode {
                    InputMode::Sensor => {
                        Mode::Sensor(InertialIntegrator::new(self.integrator_tuning))
                    }
                    InputMode::Keyboard => {
                        Mode::Keyboard(KeyboardSimulator::new(self.keyboard_tuning))
                    }
                };
                self.state.velocity = Vec3::ZERO;
                info!(?mode, "Input mode switched");
            }
            Command::SetMode(_) => {}
        }
    }

    // ----- accessors -----

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.recorder.strokes()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn input_mode(&self) -> InputMode {
        self.mode.input_mode()
    }
}

fn integrator_tuning(motion: &MotionConfig) -> IntegratorTuning {
    IntegratorTuning {
        gravity_included: motion.gravity_included,
        accel_deadband_mps2: motion.accel_deadband_mps2,
        stable_accel_mps2: motion.stable_accel_mps2,
        stable_rot_dps: motion.stable_rot_dps,
        stable_time_ms: motion.stable_time_ms,
        velocity_damping: motion.velocity_damping,
    }
}

fn keyboard_tuning(keyboard: &KeyboardConfig) -> KeyboardTuning {
    KeyboardTuning {
        speed_mps: keyboard.speed_mps,
        normal_scale: keyboard.normal_scale,
        boost_scale: keyboard.boost_scale,
        velocity_blend: keyboard.velocity_blend,
    }
}

fn stroke_style(stroke: &StrokeConfig) -> StrokeStyle {
    StrokeStyle {
        color: stroke.color,
        width_px: stroke.width_px,
    }
}

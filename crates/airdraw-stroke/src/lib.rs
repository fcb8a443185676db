//! Stroke recording: turns a dense per-frame position stream into decimated
//! polyline traces.
//!
//! The recorder only ever appends to the single active stroke; sealed
//! strokes are immutable. Handles are generation-style ids, so appends
//! against a stale handle (after `end` or `clear`) are silent no-ops.

use glam::Vec3;
use tracing::{debug, info};

/// Default minimum spacing between recorded points, in meters (~2 cm).
pub const DEFAULT_MIN_SPACING_M: f32 = 0.02;

/// Visual style of a stroke. The renderer interprets these; the recorder
/// just carries them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Line width in pixels.
    pub width_px: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            width_px: 4.0,
        }
    }
}

/// Handle to a stroke begun on a [`StrokeRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeId(u64);

/// One continuous recorded drawing path.
#[derive(Debug, Clone)]
pub struct Stroke {
    id: StrokeId,
    style: StrokeStyle,
    points: Vec<Vec3>,
}

impl Stroke {
    /// Recorded points in draw order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }
}

/// Consumes the position stream while drawing is active and emits decimated
/// point sequences, one stroke per pen-down span.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    strokes: Vec<Stroke>,
    active: Option<StrokeId>,
    next_id: u64,
    min_spacing_sq_m2: f32,
}

impl StrokeRecorder {
    pub fn new(min_spacing_m: f32) -> Self {
        Self {
            strokes: Vec::new(),
            active: None,
            next_id: 0,
            min_spacing_sq_m2: min_spacing_m * min_spacing_m,
        }
    }

    /// Start a new stroke at `start`. Any previously active stroke is sealed
    /// first.
    pub fn begin(&mut self, style: StrokeStyle, start: Vec3) -> StrokeId {
        if let Some(open) = self.active {
            self.end(open);
        }

        let id = StrokeId(self.next_id);
        self.next_id += 1;
        self.strokes.push(Stroke {
            id,
            style,
            points: vec![start],
        });
        self.active = Some(id);
        debug!(stroke = id.0, ?start, "Stroke started");
        id
    }

    /// Append `point` to the stroke behind `id`.
    ///
    /// No-op unless `id` is the active stroke and the point has moved at
    /// least the minimum spacing from the stroke's last recorded point.
    pub fn append(&mut self, id: StrokeId, point: Vec3) {
        if self.active != Some(id) {
            return;
        }
        let Some(stroke) = self.strokes.last_mut() else {
            return;
        };
        let last = stroke.points[stroke.points.len() - 1];
        if last.distance_squared(point) < self.min_spacing_sq_m2 {
            return;
        }
        stroke.points.push(point);
    }

    /// Seal the stroke behind `id`; further appends against it are no-ops.
    pub fn end(&mut self, id: StrokeId) {
        if self.active == Some(id) {
            self.active = None;
            if let Some(stroke) = self.strokes.last() {
                debug!(stroke = id.0, points = stroke.points.len(), "Stroke sealed");
            }
        }
    }

    /// Drop all strokes, discarding any in-progress stroke without sealing
    /// it. Outstanding handles become permanently stale.
    pub fn clear(&mut self) {
        info!(strokes = self.strokes.len(), "Clearing strokes");
        self.strokes.clear();
        self.active = None;
    }

    /// All recorded strokes in draw order, the in-progress one last.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SPACING_M)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> StrokeRecorder {
        StrokeRecorder::new(DEFAULT_MIN_SPACING_M)
    }

    #[test]
    fn new_stroke_has_exactly_one_point() {
        let mut rec = recorder();
        let id = rec.begin(StrokeStyle::default(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(rec.strokes().len(), 1);
        assert_eq!(rec.strokes()[0].points(), &[Vec3::new(0.0, 1.0, 0.0)]);

        // Appending the same position is decimated away.
        rec.append(id, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(rec.strokes()[0].points().len(), 1);
    }

    #[test]
    fn appends_below_min_spacing_are_dropped() {
        let mut rec = recorder();
        let id = rec.begin(StrokeStyle::default(), Vec3::ZERO);

        // Creep along X in 4 mm steps: nothing records until the cumulative
        // offset from the last recorded point passes 2 cm.
        for i in 1..=4 {
            rec.append(id, Vec3::new(0.004 * i as f32, 0.0, 0.0));
        }
        assert_eq!(rec.strokes()[0].points().len(), 1);

        rec.append(id, Vec3::new(0.024, 0.0, 0.0));
        assert_eq!(rec.strokes()[0].points().len(), 2);
    }

    #[test]
    fn consecutive_recorded_points_respect_spacing() {
        let mut rec = recorder();
        let id = rec.begin(StrokeStyle::default(), Vec3::ZERO);
        // Dense sweep at 1 mm resolution.
        for i in 1..=500 {
            rec.append(id, Vec3::new(0.001 * i as f32, 0.0, 0.0));
        }
        let points = rec.strokes()[0].points();
        assert!(points.len() > 2);
        for pair in points.windows(2) {
            assert!(pair[0].distance_squared(pair[1]) >= 0.0004 - 1e-7);
        }
    }

    #[test]
    fn end_seals_the_stroke() {
        let mut rec = recorder();
        let id = rec.begin(StrokeStyle::default(), Vec3::ZERO);
        rec.append(id, Vec3::new(0.1, 0.0, 0.0));
        rec.end(id);

        rec.append(id, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(rec.strokes()[0].points().len(), 2);
        assert!(!rec.is_recording());
    }

    #[test]
    fn begin_seals_any_open_stroke() {
        let mut rec = recorder();
        let first = rec.begin(StrokeStyle::default(), Vec3::ZERO);
        let _second = rec.begin(StrokeStyle::default(), Vec3::new(1.0, 0.0, 0.0));

        // The first handle is stale now.
        rec.append(first, Vec3::new(9.0, 0.0, 0.0));
        assert_eq!(rec.strokes().len(), 2);
        assert_eq!(rec.strokes()[0].points().len(), 1);
    }

    #[test]
    fn clear_discards_everything_and_stales_handles() {
        let mut rec = recorder();
        let done = rec.begin(StrokeStyle::default(), Vec3::ZERO);
        rec.append(done, Vec3::new(0.1, 0.0, 0.0));
        rec.end(done);
        let open = rec.begin(StrokeStyle::default(), Vec3::ZERO);

        rec.clear();
        assert!(rec.strokes().is_empty());
        assert!(!rec.is_recording());

        rec.append(open, Vec3::new(0.5, 0.0, 0.0));
        rec.append(done, Vec3::new(0.5, 0.0, 0.0));
        assert!(rec.strokes().is_empty());
    }

    #[test]
    fn strokes_keep_draw_order_and_style() {
        let mut rec = recorder();
        let red = StrokeStyle {
            color: [1.0, 0.0, 0.0],
            width_px: 2.0,
        };
        let blue = StrokeStyle {
            color: [0.0, 0.0, 1.0],
            width_px: 8.0,
        };

        let a = rec.begin(red, Vec3::ZERO);
        rec.end(a);
        let b = rec.begin(blue, Vec3::ONE);
        rec.end(b);

        assert_eq!(rec.strokes()[0].style(), red);
        assert_eq!(rec.strokes()[1].style(), blue);
    }
}

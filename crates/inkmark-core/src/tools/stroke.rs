//! Freehand stroke capture for the pen and highlighter tools.

use crate::shapes::{SerializableColor, Stroke, StrokeKind};
use kurbo::Point;
use web_time::Instant;

/// Accumulates pointer samples into a stroke.
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    stroke: Stroke,
    start: Point,
    started_at: Instant,
}

impl StrokeBuilder {
    /// Begin a stroke at a scene point.
    pub fn begin(kind: StrokeKind, color: SerializableColor, size: f64, point: Point) -> Self {
        let mut stroke = Stroke::new(kind, color, size);
        if kind == StrokeKind::Brush {
            stroke.add_timed_point(point, 0.0);
        } else {
            stroke.add_point(point);
        }
        Self {
            stroke,
            start: point,
            started_at: Instant::now(),
        }
    }

    /// Append a sample, timing it against the start of the stroke.
    pub fn extend(&mut self, point: Point, constrain: bool) {
        let elapsed_ms = self.started_at.elapsed().as_secs_f64() * 1000.0;
        self.extend_at(point, constrain, elapsed_ms);
    }

    /// Append a sample captured `time_ms` after the stroke began.
    ///
    /// With `constrain` held, pen and highlighter strokes collapse to a
    /// straight segment from the start point. Brush strokes ignore it.
    pub fn extend_at(&mut self, point: Point, constrain: bool, time_ms: f64) {
        match self.stroke.kind {
            StrokeKind::Brush => self.stroke.add_timed_point(point, time_ms),
            StrokeKind::Pen | StrokeKind::Highlighter if constrain => {
                self.stroke.points = vec![self.start, point];
            }
            StrokeKind::Pen | StrokeKind::Highlighter => self.stroke.add_point(point),
        }
    }

    /// The stroke as drawn so far.
    pub fn preview(&self) -> &Stroke {
        &self.stroke
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// Finish the stroke. Returns `None` for a click that never moved.
    pub fn finish(self) -> Option<Stroke> {
        (!self.stroke.is_degenerate()).then_some(self.stroke)
    }
}

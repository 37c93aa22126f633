//! Eraser engine: whole-stroke removal and fragment clipping against a circular brush.
//!
//! Fragment clipping classifies each segment once with
//! [`circle_segment_clip`](crate::geometry::circle_segment_clip) and then feeds
//! that classification to a [`RunBuilder`], which extends or flushes the
//! current run of surviving points.

use crate::geometry::{SegmentClip, circle_segment_clip, lerp};
use crate::shapes::{KindSet, Shape, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Squared lengths below this make a segment a single point.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// How the eraser treats a stroke it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraseMode {
    /// Remove the stroke if any of its points is under the brush.
    Whole,
    /// Cut away only the parts of the stroke covered by the brush.
    #[default]
    Fragment,
}

/// User-facing eraser parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserSettings {
    /// Brush radius in screen pixels.
    pub size_px: f64,
    pub mode: EraseMode,
    /// Kinds the eraser is allowed to touch.
    pub kinds: KindSet,
}

impl Default for EraserSettings {
    fn default() -> Self {
        Self {
            size_px: 20.0,
            mode: EraseMode::Fragment,
            kinds: KindSet::strokes(),
        }
    }
}

impl EraserSettings {
    /// Brush radius in scene units at the given zoom scale.
    pub fn radius(&self, scale: f64) -> f64 {
        self.size_px / scale
    }
}

/// Apply one eraser step at `point` and return the resulting shape list.
///
/// Shapes whose kind is not in `targets` and all text boxes pass through
/// unchanged. Resulting strokes with fewer than two points are dropped.
pub fn erase_at(
    shapes: &[Shape],
    point: Point,
    radius: f64,
    mode: EraseMode,
    targets: &KindSet,
) -> Vec<Shape> {
    let mut result = Vec::with_capacity(shapes.len());
    for shape in shapes {
        match shape {
            Shape::Stroke(stroke) if targets.contains(shape.kind()) => match mode {
                EraseMode::Whole => {
                    if !stroke.any_point_within(point, radius) {
                        result.push(shape.clone());
                    }
                }
                EraseMode::Fragment => {
                    result.extend(
                        clip_stroke(stroke, point, radius)
                            .into_iter()
                            .map(Shape::Stroke),
                    );
                }
            },
            _ => result.push(shape.clone()),
        }
    }
    result.retain(Shape::is_committable);
    result
}

/// Split `stroke` into the runs that survive the brush.
///
/// Each run becomes a new stroke carrying the source's kind, color and size.
pub fn clip_stroke(stroke: &Stroke, center: Point, radius: f64) -> Vec<Stroke> {
    let mut runs = RunBuilder::default();
    for pair in stroke.points.windows(2) {
        let (v, w) = (pair[0], pair[1]);
        let clip = circle_segment_clip(v, w, center, radius);
        runs.feed(v, w, clip);
    }
    runs.finish()
        .into_iter()
        .map(|points| stroke.with_points(points))
        .collect()
}

/// Accumulates surviving point runs while walking a polyline.
#[derive(Debug, Default)]
struct RunBuilder {
    current: Vec<Point>,
    done: Vec<Vec<Point>>,
}

impl RunBuilder {
    fn feed(&mut self, v: Point, w: Point, clip: SegmentClip) {
        match clip {
            SegmentClip::FullyOutside => {
                self.seed(v);
                self.push(w);
            }
            SegmentClip::FullyInside => self.flush(),
            SegmentClip::Enter { t } => {
                self.seed(v);
                self.push(lerp(v, w, t));
                self.flush();
            }
            SegmentClip::Exit { t } => {
                self.flush();
                self.current = vec![lerp(v, w, t)];
                self.push(w);
            }
            SegmentClip::EnterAndExit { enter, exit } => {
                self.seed(v);
                self.push(lerp(v, w, enter));
                self.flush();
                self.current = vec![lerp(v, w, exit)];
                self.push(w);
            }
        }
    }

    /// Append `p` unless it coincides with the last point of the run.
    fn push(&mut self, p: Point) {
        let distinct = self
            .current
            .last()
            .is_none_or(|&last| (p - last).hypot2() >= DEGENERATE_EPSILON);
        if distinct {
            self.current.push(p);
        }
    }

    /// Start the run at `v` if nothing is pending.
    fn seed(&mut self, v: Point) {
        if self.current.is_empty() {
            self.current.push(v);
        }
    }

    fn flush(&mut self) {
        let run = std::mem::take(&mut self.current);
        if run.len() >= 2 {
            self.done.push(run);
        }
    }

    fn finish(mut self) -> Vec<Vec<Point>> {
        self.flush();
        self.done
    }
}

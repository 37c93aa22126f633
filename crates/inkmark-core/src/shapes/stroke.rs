//! Freehand stroke shape (pen, brush and highlighter).

use super::{SerializableColor, ShapeKind, ShapeTrait};
use crate::geometry::{bounding_box, distance, point_to_segment_distance};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Which tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeKind {
    #[default]
    Pen,
    /// Pen variant whose width follows drawing speed.
    Brush,
    Highlighter,
}

/// A polyline in scene space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub kind: StrokeKind,
    /// Points in the path.
    pub points: Vec<Point>,
    /// Per-point capture times in milliseconds, only recorded for brush strokes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<f64>,
    pub color: SerializableColor,
    /// Stroke width at scale 1.
    pub size: f64,
}

impl Stroke {
    /// Default pen width.
    pub const DEFAULT_SIZE: f64 = 4.0;

    /// Create an empty stroke.
    pub fn new(kind: StrokeKind, color: SerializableColor, size: f64) -> Self {
        Self {
            kind,
            points: Vec::new(),
            timestamps: Vec::new(),
            color,
            size,
        }
    }

    /// Create from existing points with default style.
    pub fn from_points(kind: StrokeKind, points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::new(kind, SerializableColor::black(), Self::DEFAULT_SIZE)
        }
    }

    /// Copy of this stroke's attributes carrying a different point run.
    ///
    /// Timestamps are dropped: fragment points no longer line up with
    /// the capture samples.
    pub fn with_points(&self, points: Vec<Point>) -> Self {
        Self {
            kind: self.kind,
            points,
            timestamps: Vec::new(),
            color: self.color,
            size: self.size,
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Add a point with its capture time.
    pub fn add_timed_point(&mut self, point: Point, time_ms: f64) {
        self.points.push(point);
        self.timestamps.push(time_ms);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than two points: not drawable, never committed.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    /// Whether any vertex lies within `radius` of `center`.
    pub fn any_point_within(&self, center: Point, radius: f64) -> bool {
        self.points.iter().any(|p| distance(*p, center) <= radius)
    }
}

impl ShapeTrait for Stroke {
    fn kind(&self) -> ShapeKind {
        self.kind.into()
    }

    fn bounds(&self) -> Rect {
        bounding_box(&self.points).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.points.len() < 2 {
            return self
                .points
                .first()
                .is_some_and(|p| distance(point, *p) <= tolerance);
        }

        self.points
            .windows(2)
            .any(|w| point_to_segment_distance(point, w[0], w[1]) <= tolerance)
    }

    fn color(&self) -> SerializableColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_creation() {
        let stroke = Stroke::new(StrokeKind::Pen, SerializableColor::black(), 4.0);
        assert!(stroke.is_empty());
        assert!(stroke.is_degenerate());
    }

    #[test]
    fn test_add_points() {
        let mut stroke = Stroke::new(StrokeKind::Brush, SerializableColor::black(), 4.0);
        stroke.add_timed_point(Point::new(0.0, 0.0), 0.0);
        stroke.add_timed_point(Point::new(10.0, 10.0), 16.0);
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.timestamps, vec![0.0, 16.0]);
        assert!(!stroke.is_degenerate());
    }

    #[test]
    fn test_bounds() {
        let stroke = Stroke::from_points(
            StrokeKind::Pen,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 50.0),
                Point::new(50.0, 100.0),
            ],
        );

        let bounds = stroke.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let stroke = Stroke::from_points(
            StrokeKind::Pen,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
        );

        assert!(stroke.hit_test(Point::new(50.0, 0.0), 5.0));
        assert!(stroke.hit_test(Point::new(50.0, 5.0), 5.0));
        assert!(!stroke.hit_test(Point::new(50.0, 20.0), 5.0));
    }

    #[test]
    fn test_with_points_keeps_attributes() {
        let mut stroke = Stroke::new(StrokeKind::Brush, SerializableColor::yellow(), 9.0);
        stroke.add_timed_point(Point::new(0.0, 0.0), 1.0);
        stroke.add_timed_point(Point::new(5.0, 0.0), 2.0);

        let fragment = stroke.with_points(vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
        assert_eq!(fragment.kind, StrokeKind::Brush);
        assert_eq!(fragment.color, SerializableColor::yellow());
        assert!((fragment.size - 9.0).abs() < f64::EPSILON);
        assert!(fragment.timestamps.is_empty());
    }

    #[test]
    fn test_any_point_within() {
        let stroke = Stroke::from_points(
            StrokeKind::Pen,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
        );
        assert!(stroke.any_point_within(Point::new(3.0, 4.0), 5.0));
        // Segment passes the center but no vertex is near it
        assert!(!stroke.any_point_within(Point::new(50.0, 0.0), 5.0));
    }
}

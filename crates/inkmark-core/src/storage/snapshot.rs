//! JSON form of a persisted shape list: a bare array of tagged shapes.

use super::{StorageError, StorageResult};
use crate::shapes::Shape;

/// Serialize shapes to the persisted JSON form.
pub fn to_json(shapes: &[Shape]) -> StorageResult<String> {
    serde_json::to_string(shapes).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse the persisted JSON form.
pub fn from_json(json: &str) -> StorageResult<Vec<Shape>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{
        HorizontalAlign, SerializableColor, Stroke, StrokeKind, TextBackground, TextBox,
        VerticalAlign,
    };
    use kurbo::{Point, Rect};

    fn sample() -> Vec<Shape> {
        let mut brush = Stroke::new(StrokeKind::Brush, SerializableColor::new(10, 20, 30, 255), 6.5);
        brush.add_timed_point(Point::new(0.1, 0.2), 0.0);
        brush.add_timed_point(Point::new(3.3, -4.4), 16.7);

        let mut text = TextBox::new(Rect::new(1.0, 2.0, 31.0, 12.0), "note")
            .with_alignment(HorizontalAlign::Right, VerticalAlign::Bottom);
        text.rotation = 0.25;
        text.background = Some(TextBackground::default());

        vec![
            Shape::Stroke(Stroke::from_points(
                StrokeKind::Pen,
                vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            )),
            Shape::Stroke(brush),
            Shape::TextBox(text),
        ]
    }

    #[test]
    fn test_round_trip_is_stable() {
        let shapes = sample();
        let first = to_json(&shapes).unwrap();
        let loaded = from_json(&first).unwrap();
        assert_eq!(loaded, shapes);
        assert_eq!(to_json(&loaded).unwrap(), first);
    }

    /// Coordinates as `Viewport::to_scene` produces them at odd zoom levels.
    fn zoomed_points(n: i32) -> Vec<Point> {
        let scale = 1.1f64.powi(n);
        (0..500)
            .map(|k| {
                let px = f64::from(k) * 7.0 + 0.5;
                Point::new((px * 0.73 - 311.0) / scale, (px * 0.41 + 97.0) / scale)
            })
            .collect()
    }

    #[test]
    fn test_round_trip_keeps_full_precision() {
        let shapes: Vec<Shape> = (-8..=8)
            .map(|n| Shape::Stroke(Stroke::from_points(StrokeKind::Pen, zoomed_points(n))))
            .collect();
        let first = to_json(&shapes).unwrap();
        let loaded = from_json(&first).unwrap();
        for (a, b) in loaded.iter().zip(&shapes) {
            let (a, b) = (a.as_stroke().unwrap(), b.as_stroke().unwrap());
            for (p, q) in a.points.iter().zip(&b.points) {
                assert_eq!(p.x.to_bits(), q.x.to_bits());
                assert_eq!(p.y.to_bits(), q.y.to_bits());
            }
        }
        assert_eq!(to_json(&loaded).unwrap(), first);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
        assert!(from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(from_json("{not json"), Err(StorageError::Serialization(_))));
        assert!(matches!(
            from_json(r#"[{"type":"circle"}]"#),
            Err(StorageError::Serialization(_))
        ));
    }
}

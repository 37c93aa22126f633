//! Text box shape.

use super::{SerializableColor, ShapeKind, ShapeTrait};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Horizontal text alignment inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Filled background behind the text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBackground {
    pub color: SerializableColor,
    /// 0.0 = fully transparent, 1.0 = fully opaque.
    pub opacity: f64,
}

impl Default for TextBackground {
    fn default() -> Self {
        Self {
            color: SerializableColor::white(),
            opacity: 1.0,
        }
    }
}

/// Outline around the text box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextBorder {
    pub color: SerializableColor,
    pub width: f64,
}

impl Default for TextBorder {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 1.0,
        }
    }
}

/// A rectangular text region in scene space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The text content.
    pub value: String,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: String,
    pub color: SerializableColor,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default)]
    pub valign: VerticalAlign,
    /// Rotation angle in radians (around center). Ignored by hit-testing.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<TextBackground>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<TextBorder>,
}

impl TextBox {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    /// Default font family.
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";

    /// Create a text box covering `rect`.
    pub fn new(rect: Rect, value: impl Into<String>) -> Self {
        let rect = rect.abs();
        Self {
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            value: value.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            color: SerializableColor::black(),
            align: HorizontalAlign::default(),
            valign: VerticalAlign::default(),
            rotation: 0.0,
            background: None,
            border: None,
        }
    }

    /// Set the font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the text color.
    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    /// Set both alignments.
    pub fn with_alignment(mut self, align: HorizontalAlign, valign: VerticalAlign) -> Self {
        self.align = align;
        self.valign = valign;
        self
    }

    /// The box as a rectangle (rotation not applied).
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Inclusive containment test against the unrotated rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Drag the bottom-right corner to `corner`, keeping each side at least `min_size`.
    pub fn resize_to(&mut self, corner: Point, min_size: f64) {
        self.width = (corner.x - self.x).max(min_size);
        self.height = (corner.y - self.y).max(min_size);
    }

    /// Point the rotation handle at `point`: rotation becomes the angle from the center.
    pub fn rotate_towards(&mut self, point: Point) {
        let center = self.center();
        self.rotation = (point.y - center.y).atan2(point.x - center.x);
    }
}

impl ShapeTrait for TextBox {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Text
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let r = self.rect().inflate(tolerance, tolerance);
        point.x >= r.x0 && point.x <= r.x1 && point.y >= r.y0 && point.y <= r.y1
    }

    fn color(&self) -> SerializableColor {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = TextBox::new(Rect::new(10.0, 20.0, 110.0, 70.0), "Hello");
        assert_eq!(text.value, "Hello");
        assert!((text.width - 100.0).abs() < f64::EPSILON);
        assert!((text.height - 50.0).abs() < f64::EPSILON);
        assert!((text.font_size - TextBox::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_new_normalizes_rect() {
        let text = TextBox::new(Rect::new(110.0, 70.0, 10.0, 20.0), "");
        assert!((text.x - 10.0).abs() < f64::EPSILON);
        assert!((text.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let text = TextBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), "");
        assert!(text.contains(Point::new(10.0, 10.0)));
        assert!(text.contains(Point::new(0.0, 5.0)));
        assert!(!text.contains(Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_hit_test_ignores_rotation() {
        let mut text = TextBox::new(Rect::new(0.0, 0.0, 100.0, 10.0), "wide");
        text.rotation = std::f64::consts::FRAC_PI_2;
        assert!(text.hit_test(Point::new(90.0, 5.0), 0.0));
        assert!(!text.hit_test(Point::new(50.0, 40.0), 0.0));
    }

    #[test]
    fn test_resize_respects_minimum() {
        let mut text = TextBox::new(Rect::new(0.0, 0.0, 50.0, 50.0), "");
        text.resize_to(Point::new(80.0, 5.0), 10.0);
        assert!((text.width - 80.0).abs() < f64::EPSILON);
        assert!((text.height - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_towards() {
        let mut text = TextBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), "");
        text.rotate_towards(Point::new(5.0, 20.0));
        assert!((text.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_optional_style_defaults() {
        let json = r##"{"x":1,"y":2,"width":3,"height":4,"value":"v","font_size":12,
            "font_family":"Arial","color":"#000000"}"##;
        let text: TextBox = serde_json::from_str(json).unwrap();
        assert_eq!(text.align, HorizontalAlign::Left);
        assert_eq!(text.valign, VerticalAlign::Top);
        assert!(text.background.is_none());
        assert!(text.rotation.abs() < f64::EPSILON);
    }
}

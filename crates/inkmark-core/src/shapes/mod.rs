//! Shape definitions for the annotation canvas.

mod stroke;
mod text;

pub use stroke::{Stroke, StrokeKind};
pub use text::{HorizontalAlign, TextBackground, TextBorder, TextBox, VerticalAlign};

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

/// Serializable color representation (RGBA8), stored as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn yellow() -> Self {
        Self::new(255, 255, 0, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with alpha scaled by `opacity` (0.0..=1.0).
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let alpha = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..*self }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl Serialize for SerializableColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for SerializableColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {hex}")))
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Kind tag used by tools to decide which shapes they act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Pen,
    Brush,
    Highlighter,
    Text,
}

impl ShapeKind {
    /// Every kind, in toolbar order.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Pen,
            ShapeKind::Brush,
            ShapeKind::Highlighter,
            ShapeKind::Text,
        ]
    }
}

impl From<StrokeKind> for ShapeKind {
    fn from(kind: StrokeKind) -> Self {
        match kind {
            StrokeKind::Pen => ShapeKind::Pen,
            StrokeKind::Brush => ShapeKind::Brush,
            StrokeKind::Highlighter => ShapeKind::Highlighter,
        }
    }
}

/// Set of shape kinds a tool is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindSet(HashSet<ShapeKind>);

impl KindSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stroke kinds (the eraser default).
    pub fn strokes() -> Self {
        [ShapeKind::Pen, ShapeKind::Brush, ShapeKind::Highlighter]
            .into_iter()
            .collect()
    }

    /// Every kind.
    pub fn all() -> Self {
        ShapeKind::all().iter().copied().collect()
    }

    pub fn contains(&self, kind: ShapeKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn insert(&mut self, kind: ShapeKind) -> bool {
        self.0.insert(kind)
    }

    pub fn remove(&mut self, kind: ShapeKind) -> bool {
        self.0.remove(&kind)
    }

    /// Add or remove `kind`, like a toolbar checkbox.
    pub fn set(&mut self, kind: ShapeKind, enabled: bool) {
        if enabled {
            self.0.insert(kind);
        } else {
            self.0.remove(&kind);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ShapeKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = ShapeKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Common behaviour of every shape variant.
pub trait ShapeTrait {
    /// Kind tag used for tool eligibility.
    fn kind(&self) -> ShapeKind;

    /// Axis-aligned bounding box in scene coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a scene point hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Primary color.
    fn color(&self) -> SerializableColor;
}

/// Closed set of shapes stored in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Stroke(Stroke),
    #[serde(rename = "text")]
    TextBox(TextBox),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Stroke(s) => s.kind(),
            Shape::TextBox(t) => t.kind(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Stroke(s) => s.bounds(),
            Shape::TextBox(t) => t.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Stroke(s) => s.hit_test(point, tolerance),
            Shape::TextBox(t) => t.hit_test(point, tolerance),
        }
    }

    pub fn color(&self) -> SerializableColor {
        match self {
            Shape::Stroke(s) => s.color(),
            Shape::TextBox(t) => t.color(),
        }
    }

    /// Get the stroke if this shape is a stroke.
    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Shape::Stroke(s) => Some(s),
            _ => None,
        }
    }

    /// Get the text box if this shape is a text box.
    pub fn as_text_box(&self) -> Option<&TextBox> {
        match self {
            Shape::TextBox(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text box if this shape is a text box.
    pub fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match self {
            Shape::TextBox(t) => Some(t),
            _ => None,
        }
    }

    /// Whether the shape may live in a committed scene.
    pub fn is_committable(&self) -> bool {
        match self {
            Shape::Stroke(s) => !s.is_degenerate(),
            Shape::TextBox(_) => true,
        }
    }
}

impl From<Stroke> for Shape {
    fn from(stroke: Stroke) -> Self {
        Shape::Stroke(stroke)
    }
}

impl From<TextBox> for Shape {
    fn from(text: TextBox) -> Self {
        Shape::TextBox(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#000000"), Some(SerializableColor::black()));
        assert_eq!(SerializableColor::from_hex("#ff0"), Some(SerializableColor::yellow()));
        assert_eq!(
            SerializableColor::from_hex("#11223380"),
            Some(SerializableColor::new(0x11, 0x22, 0x33, 0x80))
        );
        assert!(SerializableColor::from_hex("red").is_none());
        assert!(SerializableColor::from_hex("#12345").is_none());
        assert!(SerializableColor::from_hex("#gg0000").is_none());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::yellow().to_hex(), "#ffff00");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_with_opacity() {
        let c = SerializableColor::white().with_opacity(0.5);
        assert_eq!(c.a, 128);
        assert_eq!(c.r, 255);
    }

    #[test]
    fn test_kind_set() {
        let mut set = KindSet::strokes();
        assert!(set.contains(ShapeKind::Pen));
        assert!(!set.contains(ShapeKind::Text));
        set.set(ShapeKind::Pen, false);
        assert!(!set.contains(ShapeKind::Pen));
        assert!(KindSet::all().contains(ShapeKind::Text));
        assert!(KindSet::new().is_empty());
    }

    #[test]
    fn test_shape_dispatch() {
        let stroke = Stroke::from_points(
            StrokeKind::Highlighter,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        );
        let shape = Shape::from(stroke);
        assert_eq!(shape.kind(), ShapeKind::Highlighter);
        assert!(shape.as_stroke().is_some());
        assert!(shape.as_text_box().is_none());
        assert!(shape.is_committable());
        assert!(shape.hit_test(Point::new(5.0, 1.0), 2.0));
    }

    #[test]
    fn test_serialized_tag() {
        let text = Shape::TextBox(TextBox::new(Rect::new(0.0, 0.0, 10.0, 10.0), "hi"));
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["type"], "text");

        let stroke = Shape::Stroke(Stroke::from_points(
            StrokeKind::Pen,
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
        ));
        let json = serde_json::to_value(&stroke).unwrap();
        assert_eq!(json["type"], "stroke");
        assert_eq!(json["kind"], "pen");
        assert_eq!(json["color"], "#000000");
    }

    #[test]
    fn test_color_rejects_bad_hex() {
        let err = serde_json::from_str::<SerializableColor>("\"#zz\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex color"));
    }
}

//! Tool system for the annotation canvas.

mod stroke;
mod text;

pub use stroke::StrokeBuilder;
pub use text::{TextRegionBuilder, default_region_side};

use crate::eraser::EraserSettings;
use crate::selection::{SelectorSession, TextTransform};
use crate::shapes::{
    HorizontalAlign, KindSet, SerializableColor, ShapeKind, Stroke, StrokeKind, TextBox,
    VerticalAlign,
};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The drawing, erasing and selecting modes a pointer can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Pen,
    Highlighter,
    Text,
    #[default]
    Select,
    Eraser,
}

/// Pen tool parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenSettings {
    pub color: SerializableColor,
    pub size: f64,
    /// `pen` or `brush`.
    pub kind: StrokeKind,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            size: Stroke::DEFAULT_SIZE,
            kind: StrokeKind::Pen,
        }
    }
}

/// Highlighter tool parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterSettings {
    pub color: SerializableColor,
    pub size: f64,
}

impl Default for HighlighterSettings {
    fn default() -> Self {
        Self {
            color: SerializableColor::yellow(),
            size: 20.0,
        }
    }
}

/// Text tool parameters applied to new text boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub font_size: f64,
    pub font_family: String,
    pub color: SerializableColor,
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
    /// A click creates a square of `font_size / scale * default_box_factor`.
    pub default_box_factor: f64,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font_size: TextBox::DEFAULT_FONT_SIZE,
            font_family: TextBox::DEFAULT_FONT_FAMILY.to_string(),
            color: SerializableColor::black(),
            align: HorizontalAlign::Left,
            valign: VerticalAlign::Top,
            default_box_factor: 5.0,
        }
    }
}

impl TextSettings {
    /// A text box over `region` styled with these settings.
    pub fn text_box(&self, region: Rect, value: impl Into<String>) -> TextBox {
        TextBox::new(region, value)
            .with_font_size(self.font_size)
            .with_font_family(self.font_family.clone())
            .with_color(self.color)
            .with_alignment(self.align, self.valign)
    }
}

/// Selector tool parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    /// Stroke hit distance in screen pixels.
    pub hit_tolerance_px: f64,
    pub kinds: KindSet,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            hit_tolerance_px: 5.0,
            kinds: [ShapeKind::Pen, ShapeKind::Highlighter, ShapeKind::Text]
                .into_iter()
                .collect(),
        }
    }
}

impl SelectorSettings {
    /// Hit tolerance in scene units at the given zoom scale.
    pub fn tolerance(&self, scale: f64) -> f64 {
        self.hit_tolerance_px / scale
    }
}

/// Where the active gesture is, if any.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pen or highlighter stroke in progress.
    Drawing(StrokeBuilder),
    /// Eraser held down; `cursor` is the last brush center in scene space.
    Erasing { cursor: Point },
    Selecting(SelectorSession),
    /// Dragging a resize or rotate handle of the selected text box.
    /// `recorded` turns true once the pre-drag snapshot is on the undo stack.
    Transforming {
        transform: TextTransform,
        recorded: bool,
    },
    PlacingText(TextRegionBuilder),
    /// Region chosen, waiting for the text value.
    EditingText { region: Rect },
}

/// Manages the current tool, its settings and its interaction state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Active tool.
    pub current_tool: ToolKind,
    /// Gesture state of the active tool.
    pub state: ToolState,
    pub pen: PenSettings,
    pub highlighter: HighlighterSettings,
    pub text: TextSettings,
    pub selector: SelectorSettings,
    pub eraser: EraserSettings,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, dropping any interaction in progress.
    ///
    /// Returns true if the tool actually changed.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        let changed = self.current_tool != tool;
        self.current_tool = tool;
        self.state = ToolState::Idle;
        changed
    }

    /// Drop the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Start a stroke for the current drawing tool, if it draws.
    pub fn begin_stroke(&self, point: Point) -> Option<StrokeBuilder> {
        match self.current_tool {
            ToolKind::Pen => Some(StrokeBuilder::begin(
                self.pen.kind,
                self.pen.color,
                self.pen.size,
                point,
            )),
            ToolKind::Highlighter => Some(StrokeBuilder::begin(
                StrokeKind::Highlighter,
                self.highlighter.color,
                self.highlighter.size,
                point,
            )),
            ToolKind::Text | ToolKind::Select | ToolKind::Eraser => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_select_tool() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);

        assert!(tm.set_tool(ToolKind::Pen));
        assert_eq!(tm.current_tool, ToolKind::Pen);
        assert!(!tm.set_tool(ToolKind::Pen));
    }

    #[test]
    fn test_set_tool_resets_state() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Eraser);
        tm.state = ToolState::Erasing { cursor: Point::ZERO };

        tm.set_tool(ToolKind::Select);
        assert!(matches!(tm.state, ToolState::Idle));

        tm.state = ToolState::Erasing { cursor: Point::ZERO };
        tm.cancel();
        assert!(matches!(tm.state, ToolState::Idle));
        assert_eq!(tm.current_tool, ToolKind::Select);
    }

    #[test]
    fn test_begin_stroke_uses_tool_settings() {
        let mut tm = ToolManager::new();
        tm.pen.kind = StrokeKind::Brush;
        tm.set_tool(ToolKind::Pen);
        let pen = tm.begin_stroke(Point::ZERO).unwrap();
        assert_eq!(pen.preview().kind, StrokeKind::Brush);

        tm.set_tool(ToolKind::Highlighter);
        let hl = tm.begin_stroke(Point::ZERO).unwrap();
        assert_eq!(hl.preview().kind, StrokeKind::Highlighter);
        assert_eq!(hl.preview().color, SerializableColor::yellow());
        assert!((hl.preview().size - 20.0).abs() < f64::EPSILON);

        tm.set_tool(ToolKind::Select);
        assert!(tm.begin_stroke(Point::ZERO).is_none());
    }

    #[test]
    fn test_text_settings_style_new_boxes() {
        let settings = TextSettings {
            font_size: 24.0,
            align: HorizontalAlign::Center,
            ..TextSettings::default()
        };
        let text = settings.text_box(Rect::new(0.0, 0.0, 10.0, 10.0), "hi");
        assert!((text.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(text.align, HorizontalAlign::Center);
        assert_eq!(text.font_family, "Arial");
    }

    #[test]
    fn test_selector_defaults_skip_brush() {
        let settings = SelectorSettings::default();
        assert!(!settings.kinds.contains(ShapeKind::Brush));
        assert!(settings.kinds.contains(ShapeKind::Text));
        assert!((settings.tolerance(0.5) - 10.0).abs() < f64::EPSILON);
    }
}

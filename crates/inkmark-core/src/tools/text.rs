//! Region placement for new text boxes.

use crate::geometry::rect_from_corners;
use kurbo::{Point, Rect};

/// Drag-or-click gesture that defines where a text box goes.
#[derive(Debug, Clone, Default)]
pub struct TextRegionBuilder {
    start: Option<Point>,
    region: Option<Rect>,
}

impl TextRegionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, point: Point) {
        self.start = Some(point);
        self.region = None;
    }

    /// Track the drag; returns the normalized region so far.
    pub fn drag(&mut self, point: Point) -> Option<Rect> {
        let start = self.start?;
        let region = rect_from_corners(start, point);
        self.region = Some(region);
        Some(region)
    }

    /// Finish the gesture.
    ///
    /// A click without any drag produces a square of side `default_side`
    /// anchored at its top-left on the click point.
    pub fn finish(&mut self, point: Point, default_side: f64) -> Option<Rect> {
        self.start.take()?;
        let region = self.region.take().unwrap_or_else(|| {
            Rect::new(point.x, point.y, point.x + default_side, point.y + default_side)
        });
        Some(region)
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.region = None;
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Region to outline while dragging.
    pub fn preview(&self) -> Option<Rect> {
        self.region
    }
}

/// Side of the square a click creates: `font_size / scale * factor`.
pub fn default_region_side(font_size: f64, scale: f64, factor: f64) -> f64 {
    font_size / scale * factor
}

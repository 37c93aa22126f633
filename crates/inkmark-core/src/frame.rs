//! Read-only view of everything the renderer needs for one frame.

use crate::geometry::rects_intersect;
use crate::selection::SelectionSet;
use crate::shapes::{Shape, Stroke};
use crate::viewport::{GridLayer, Viewport};
use kurbo::{Point, Rect};

/// Transient interaction feedback drawn on top of the shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview<'a> {
    /// Pen or highlighter stroke still being drawn.
    Stroke(&'a Stroke),
    /// Drag-select rectangle in scene coordinates.
    SelectionRect(Rect),
    /// Eraser brush outline; `radius` is in scene units.
    EraserCursor { center: Point, radius: f64 },
    /// Region of a text box being placed or typed into.
    TextRegion(Rect),
}

/// Snapshot of scene state handed to the render collaborator.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// Committed shapes, back to front.
    pub shapes: &'a [Shape],
    pub selection: &'a SelectionSet,
    pub preview: Option<Preview<'a>>,
    pub viewport: &'a Viewport,
    /// Scene-space area the canvas shows. Shapes outside it can be culled.
    /// Empty until the scene is given a viewport size.
    pub visible: Rect,
    /// Background grid layers, coarsest first.
    pub grid: [GridLayer; 4],
}

impl Frame<'_> {
    /// Shapes paired with whether they are selected.
    pub fn shapes_with_selection(&self) -> impl Iterator<Item = (&Shape, bool)> + '_ {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| (shape, self.selection.contains(i)))
    }

    /// Shapes whose bounds touch the visible area, with their selection flag.
    pub fn visible_shapes(&self) -> impl Iterator<Item = (&Shape, bool)> + '_ {
        self.shapes_with_selection()
            .filter(|(shape, _)| rects_intersect(shape.bounds(), self.visible))
    }
}

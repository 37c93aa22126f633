//! Selection hit-testing, the drag-select session and text box handles.

use crate::geometry::{rect_from_corners, rects_intersect};
use crate::shapes::{KindSet, Shape, TextBox};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handle hit radius in screen pixels.
pub const HANDLE_HIT_RADIUS: f64 = 6.0;
/// Distance from the top edge to the rotation handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 20.0;
/// Smallest text box side reachable by resizing, in screen pixels.
pub const MIN_TEXT_BOX_SIZE: f64 = 10.0;

/// Indices of selected shapes, relative to the current store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<usize>);

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Replace the whole selection.
    pub fn set(&mut self, indices: BTreeSet<usize>) {
        self.0 = indices;
    }

    pub fn indices(&self) -> &BTreeSet<usize> {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// The index if exactly one shape is selected.
    pub fn single(&self) -> Option<usize> {
        if self.0.len() == 1 {
            self.0.first().copied()
        } else {
            None
        }
    }
}

impl From<BTreeSet<usize>> for SelectionSet {
    fn from(indices: BTreeSet<usize>) -> Self {
        Self(indices)
    }
}

impl FromIterator<usize> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every selectable shape under `point`.
///
/// Text boxes hit inside their unrotated rectangle; strokes hit when any
/// segment lies within `tolerance` (scene units). All matches are returned.
pub fn hit_test_point(
    shapes: &[Shape],
    point: Point,
    tolerance: f64,
    kinds: &KindSet,
) -> BTreeSet<usize> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| kinds.contains(shape.kind()))
        .filter(|(_, shape)| match shape {
            Shape::TextBox(text) => text.contains(point),
            Shape::Stroke(stroke) => {
                stroke.points.len() >= 2 && shape.hit_test(point, tolerance)
            }
        })
        .map(|(i, _)| i)
        .collect()
}

/// Every selectable shape whose bounding box touches `rect`.
pub fn hit_test_rect(shapes: &[Shape], rect: Rect, kinds: &KindSet) -> BTreeSet<usize> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| kinds.contains(shape.kind()))
        .filter(|(_, shape)| match shape {
            Shape::Stroke(stroke) if stroke.is_empty() => false,
            _ => rects_intersect(rect, shape.bounds()),
        })
        .map(|(i, _)| i)
        .collect()
}

/// Pointer state of one selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    /// Button is down but the pointer has not moved yet.
    Pressed { start: Point },
    Dragging { start: Point, current: Point },
}

/// Click-or-drag selection gesture in scene coordinates.
///
/// A press released without any move in between is a point click;
/// otherwise the gesture selects by rectangle.
#[derive(Debug, Clone, Default)]
pub struct SelectorSession {
    state: SelectorState,
}

impl SelectorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn pointer_down(&mut self, point: Point) {
        self.state = SelectorState::Pressed { start: point };
    }

    /// Track the pointer; returns the live selection rectangle while dragging.
    pub fn pointer_move(&mut self, point: Point) -> Option<Rect> {
        match self.state {
            SelectorState::Idle => None,
            SelectorState::Pressed { start } | SelectorState::Dragging { start, .. } => {
                self.state = SelectorState::Dragging {
                    start,
                    current: point,
                };
                Some(rect_from_corners(start, point))
            }
        }
    }

    /// Finish the gesture and compute the new selection.
    ///
    /// Returns `None` if no gesture was in progress.
    pub fn pointer_up(
        &mut self,
        point: Point,
        shapes: &[Shape],
        tolerance: f64,
        kinds: &KindSet,
    ) -> Option<BTreeSet<usize>> {
        let state = std::mem::take(&mut self.state);
        match state {
            SelectorState::Idle => None,
            SelectorState::Pressed { .. } => Some(hit_test_point(shapes, point, tolerance, kinds)),
            SelectorState::Dragging { start, .. } => {
                Some(hit_test_rect(shapes, rect_from_corners(start, point), kinds))
            }
        }
    }

    /// Rectangle to draw while dragging.
    pub fn preview_rect(&self) -> Option<Rect> {
        match self.state {
            SelectorState::Dragging { start, current } => Some(rect_from_corners(start, current)),
            _ => None,
        }
    }
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Type of text box handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    /// Rotation handle above the top-center.
    Rotate,
}

/// A handle with its position in scene coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// `radius` should already be adjusted for zoom.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// Handles of a text box at the given zoom scale.
///
/// Corners sit on the unrotated rectangle, matching hit-testing.
pub fn text_box_handles(text: &TextBox, scale: f64) -> Vec<Handle> {
    let r = text.rect();
    vec![
        Handle::new(Point::new(r.x0, r.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(r.x1, r.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(r.x0, r.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(r.x1, r.y1), HandleKind::Corner(Corner::BottomRight)),
        Handle::new(
            Point::new(r.center().x, r.y0 - ROTATE_HANDLE_OFFSET / scale),
            HandleKind::Rotate,
        ),
    ]
}

/// Find which handle (if any) is under `point`.
pub fn hit_test_text_handles(text: &TextBox, point: Point, scale: f64) -> Option<HandleKind> {
    let radius = HANDLE_HIT_RADIUS / scale;
    text_box_handles(text, scale)
        .into_iter()
        .find(|h| h.hit_test(point, radius))
        .map(|h| h.kind)
}

/// An in-progress resize or rotate of one text box.
#[derive(Debug, Clone)]
pub struct TextTransform {
    pub index: usize,
    pub handle: HandleKind,
    pub start: Point,
    pub original: TextBox,
}

impl TextTransform {
    pub fn new(index: usize, handle: HandleKind, start: Point, original: TextBox) -> Self {
        Self {
            index,
            handle,
            start,
            original,
        }
    }

    /// The text box as it should look with the pointer at `point`.
    pub fn apply(&self, point: Point, scale: f64) -> TextBox {
        let mut text = self.original.clone();
        let min = MIN_TEXT_BOX_SIZE / scale;
        match self.handle {
            HandleKind::Rotate => text.rotate_towards(point),
            HandleKind::Corner(corner) => resize_from_corner(&mut text, corner, point - self.start, min),
        }
        text
    }
}

/// Move one corner by `delta`, keeping the opposite corner fixed.
fn resize_from_corner(text: &mut TextBox, corner: Corner, delta: Vec2, min: f64) {
    let r = text.rect();
    match corner {
        Corner::BottomRight => text.resize_to(Point::new(r.x1 + delta.x, r.y1 + delta.y), min),
        Corner::TopLeft => {
            let width = (r.width() - delta.x).max(min);
            let height = (r.height() - delta.y).max(min);
            text.x = r.x1 - width;
            text.y = r.y1 - height;
            text.width = width;
            text.height = height;
        }
        Corner::TopRight => {
            let height = (r.height() - delta.y).max(min);
            text.width = (r.width() + delta.x).max(min);
            text.y = r.y1 - height;
            text.height = height;
        }
        Corner::BottomLeft => {
            let width = (r.width() - delta.x).max(min);
            text.x = r.x1 - width;
            text.width = width;
            text.height = (r.height() + delta.y).max(min);
        }
    }
}

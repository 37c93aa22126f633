//! Ordered shape list with snapshot-based undo/redo.

use crate::shapes::Shape;
use std::collections::BTreeSet;
use std::sync::Arc;

/// An immutable copy of the shape list used as a restore point.
///
/// Snapshots share their allocation with the live list until the next
/// mutation, so pushing one is a reference-count bump.
pub type Snapshot = Arc<Vec<Shape>>;

/// The authoritative shape sequence and its history.
///
/// The only mutation entry points are [`push_undo`](Self::push_undo) and
/// [`commit`](Self::commit); the helpers below are built from those two.
/// Indices handed out by [`shapes`](Self::shapes) are only valid until the
/// next mutation.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    shapes: Snapshot,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth, `None` for unbounded.
    history_limit: Option<usize>,
}

impl SceneStore {
    /// Create an empty store with unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `shapes` with empty history.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self {
            shapes: Arc::new(shapes),
            ..Self::default()
        }
    }

    /// Bound the undo stack to `limit` snapshots (oldest dropped first).
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    /// Read-only view of the current shapes.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shared handle on the current list.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.shapes)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Push the current state to the undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(Arc::clone(&self.shapes));
        self.redo_stack.clear();
        self.trim_history();
    }

    /// Replace the shape list. Degenerate strokes are pruned on the way in.
    pub fn commit(&mut self, mut shapes: Vec<Shape>) {
        shapes.retain(Shape::is_committable);
        self.shapes = Arc::new(shapes);
    }

    /// Snapshot then commit, as one step.
    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.push_undo();
        self.commit(shapes);
    }

    /// Append a shape as one undoable step.
    ///
    /// Returns false (and records nothing) if the shape is not committable.
    pub fn add(&mut self, shape: Shape) -> bool {
        if !shape.is_committable() {
            return false;
        }
        let mut shapes = self.shapes.as_ref().clone();
        shapes.push(shape);
        self.replace(shapes);
        true
    }

    /// Edit the shape at `index` in place as one undoable step.
    ///
    /// Returns false if the index is out of range or `edit` declines the
    /// shape by returning false; history is untouched in that case.
    pub fn update<F>(&mut self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut Shape) -> bool,
    {
        let Some(current) = self.shapes.get(index) else {
            return false;
        };
        let mut edited = current.clone();
        if !edit(&mut edited) {
            return false;
        }
        let mut shapes = self.shapes.as_ref().clone();
        shapes[index] = edited;
        self.replace(shapes);
        true
    }

    /// Remove every shape whose index is in `indices` as one undoable step.
    ///
    /// Returns false when nothing matched; no snapshot is pushed then.
    pub fn delete_indices(&mut self, indices: &BTreeSet<usize>) -> bool {
        if !indices.iter().any(|&i| i < self.shapes.len()) {
            return false;
        }
        let kept = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(i, _)| !indices.contains(i))
            .map(|(_, shape)| shape.clone())
            .collect();
        self.replace(kept);
        true
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.shapes, snapshot);
        self.redo_stack.push(current);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.shapes, snapshot);
        self.undo_stack.push(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }
}

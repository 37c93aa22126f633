//! The scene: shapes, history, viewport, tools and selection behind one input surface.

use crate::config::SceneConfig;
use crate::eraser::erase_at;
use crate::frame::{Frame, Preview};
use crate::input::{Command, Modifiers, MouseButton, PointerEvent};
use crate::scheduler::{FrameRequester, RenderScheduler};
use crate::selection::{SelectionSet, SelectorSession, TextTransform, hit_test_text_handles};
use crate::shapes::{Shape, TextBox};
use crate::storage::{MemoryStorage, Storage, StorageError};
use crate::store::SceneStore;
use crate::tools::{
    StrokeBuilder, TextRegionBuilder, ToolKind, ToolManager, ToolState, default_region_side,
};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use std::sync::Arc;

/// An interactive annotation scene.
///
/// All mutation runs synchronously inside the call that triggered it. Every
/// committed change is saved to storage before the call returns and marks
/// a redraw as pending.
pub struct Scene {
    store: SceneStore,
    viewport: Viewport,
    tools: ToolManager,
    selection: SelectionSet,
    scheduler: RenderScheduler,
    frame_requester: Option<Box<dyn FrameRequester + Send>>,
    storage: Arc<dyn Storage>,
    storage_key: String,
    zoom_factor: f64,
    viewport_size: Size,
    /// Offset between the pointer and the origin while middle-button panning.
    pan_grab: Option<Vec2>,
    load_error: Option<StorageError>,
    last_persist_error: Option<StorageError>,
}

impl Scene {
    /// Open the scene stored under `config.storage_key`.
    ///
    /// A missing entry starts an empty scene. An unreadable entry also starts
    /// empty and is reported through [`load_error`](Self::load_error).
    pub fn open(config: SceneConfig, storage: Arc<dyn Storage>) -> Self {
        let (shapes, load_error) = match storage.load(&config.storage_key) {
            Ok(mut shapes) => {
                shapes.retain(Shape::is_committable);
                (shapes, None)
            }
            Err(StorageError::NotFound(key)) => {
                log::debug!("No stored scene under {key:?}, starting empty");
                (Vec::new(), None)
            }
            Err(e) => {
                log::warn!("Failed to load scene {:?}: {e}", config.storage_key);
                (Vec::new(), Some(e))
            }
        };
        log::info!("Opened scene {:?} with {} shapes", config.storage_key, shapes.len());

        let tools = ToolManager {
            pen: config.pen,
            highlighter: config.highlighter,
            text: config.text,
            selector: config.selector,
            eraser: config.eraser,
            ..ToolManager::default()
        };

        Self {
            store: SceneStore::with_shapes(shapes).with_history_limit(config.history_limit),
            viewport: config.viewport.viewport(),
            tools,
            selection: SelectionSet::new(),
            scheduler: RenderScheduler::new(),
            frame_requester: None,
            storage,
            storage_key: config.storage_key,
            zoom_factor: config.viewport.zoom_factor,
            viewport_size: Size::ZERO,
            pan_grab: None,
            load_error,
            last_persist_error: None,
        }
    }

    /// A scene backed by fresh in-memory storage.
    pub fn in_memory(config: SceneConfig) -> Self {
        Self::open(config, Arc::new(MemoryStorage::new()))
    }

    /// Arm animation frames through `requester` whenever a redraw becomes pending.
    pub fn with_frame_requester(mut self, requester: Box<dyn FrameRequester + Send>) -> Self {
        self.frame_requester = Some(requester);
        self
    }

    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    /// Tool settings can be edited freely; the interaction state is reset
    /// through [`set_tool`](Self::set_tool).
    pub fn tools_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Error from the initial load, if the stored scene could not be read.
    pub fn load_error(&self) -> Option<&StorageError> {
        self.load_error.as_ref()
    }

    /// Error from the most recent save, cleared by the next successful one.
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.last_persist_error.as_ref()
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
        self.invalidate();
    }

    /// Set zoom and pan directly; the scale is clamped.
    pub fn set_transform(&mut self, scale: f64, origin_x: f64, origin_y: f64) {
        self.viewport.set_transform(scale, origin_x, origin_y);
        self.invalidate();
    }

    /// Activate a tool. Clears the selection and every transient preview.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.set_tool(tool) {
            log::debug!("Switched to {tool:?} tool");
        }
        self.selection.clear();
        self.invalidate();
    }

    /// Route a pointer event to panning/zooming or the active tool.
    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) {
        match event {
            PointerEvent::Down { position, button } => self.on_down(position, button),
            PointerEvent::Move { position } => self.on_move(position, modifiers),
            PointerEvent::Up { position, button } => self.on_up(position, button),
            PointerEvent::Leave => self.on_leave(),
            PointerEvent::Wheel { position, delta_y } => {
                let factor = if delta_y < 0.0 {
                    self.zoom_factor
                } else {
                    1.0 / self.zoom_factor
                };
                self.viewport.zoom_at(position, factor);
                self.invalidate();
            }
        }
    }

    /// Run a keyboard command. Returns true if the scene changed.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::DeleteSelected => self.delete_selected(),
        }
    }

    pub fn undo(&mut self) -> bool {
        if !self.store.undo() {
            return false;
        }
        log::debug!("Undo: {} shapes", self.store.len());
        self.after_reindex();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.store.redo() {
            return false;
        }
        log::debug!("Redo: {} shapes", self.store.len());
        self.after_reindex();
        true
    }

    /// Remove the selected shapes as one undoable step.
    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let deleted = self.store.delete_indices(self.selection.indices());
        if deleted {
            log::debug!("Deleted {} shapes", self.selection.len());
            self.after_reindex();
        } else {
            self.selection.clear();
        }
        deleted
    }

    /// Add a shape as one undoable step. Degenerate strokes are refused.
    pub fn add_shape(&mut self, shape: Shape) -> bool {
        if !self.store.add(shape) {
            return false;
        }
        self.persist();
        self.invalidate();
        true
    }

    /// Commit the pending text region with `value`. Empty values are kept.
    pub fn commit_text(&mut self, value: &str) -> bool {
        let ToolState::EditingText { region } = self.tools.state else {
            return false;
        };
        self.tools.state = ToolState::Idle;
        let text = self.tools.text.text_box(region, value);
        self.add_shape(Shape::TextBox(text))
    }

    /// Drop the pending text region without creating a shape.
    pub fn cancel_text(&mut self) {
        if matches!(self.tools.state, ToolState::EditingText { .. }) {
            self.tools.state = ToolState::Idle;
            self.invalidate();
        }
    }

    /// Edit the text box at `index` as one undoable step.
    ///
    /// Returns false if `index` is not a text box.
    pub fn edit_text_box<F>(&mut self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut TextBox),
    {
        let edited = self.store.update(index, |shape| match shape.as_text_box_mut() {
            Some(text) => {
                edit(text);
                true
            }
            None => false,
        });
        if edited {
            self.persist();
            self.invalidate();
        }
        edited
    }

    /// Center the most recently added shape in the viewport.
    pub fn focus_last_shape(&mut self) -> bool {
        let Some(last) = self.store.shapes().last() else {
            return false;
        };
        let bounds = last.bounds();
        self.viewport.focus_on(bounds, self.viewport_size);
        self.invalidate();
        true
    }

    /// Whether a redraw is pending.
    pub fn needs_redraw(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Called from the animation-frame callback. Returns the frame to draw
    /// if a redraw was pending.
    pub fn begin_frame(&mut self) -> Option<Frame<'_>> {
        if self.scheduler.begin_frame() {
            Some(self.frame())
        } else {
            None
        }
    }

    /// Current render state.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            shapes: self.store.shapes(),
            selection: &self.selection,
            preview: self.preview(),
            viewport: &self.viewport,
            visible: self.viewport.visible_scene_rect(self.viewport_size),
            grid: self.viewport.grid_layers(),
        }
    }

    fn preview(&self) -> Option<Preview<'_>> {
        match &self.tools.state {
            ToolState::Idle | ToolState::Transforming { .. } => None,
            ToolState::Drawing(builder) => Some(Preview::Stroke(builder.preview())),
            ToolState::Erasing { cursor } => Some(Preview::EraserCursor {
                center: *cursor,
                radius: self.tools.eraser.radius(self.viewport.scale()),
            }),
            ToolState::Selecting(session) => session.preview_rect().map(Preview::SelectionRect),
            ToolState::PlacingText(builder) => builder.preview().map(Preview::TextRegion),
            ToolState::EditingText { region } => Some(Preview::TextRegion(*region)),
        }
    }

    fn on_down(&mut self, screen: Point, button: MouseButton) {
        match button {
            MouseButton::Middle => {
                self.pan_grab = Some(screen - self.viewport.origin().to_point());
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }

        let point = self.viewport.to_scene(screen);
        let state = std::mem::take(&mut self.tools.state);
        self.tools.state = match state {
            // Waiting for the typed value; clicks do not start a new region
            editing @ ToolState::EditingText { .. } => editing,
            _ => match self.tools.current_tool {
                ToolKind::Pen | ToolKind::Highlighter => self
                    .tools
                    .begin_stroke(point)
                    .map_or(ToolState::Idle, ToolState::Drawing),
                ToolKind::Eraser => {
                    self.erase_step(point);
                    ToolState::Erasing { cursor: point }
                }
                ToolKind::Select => self.begin_select(point),
                ToolKind::Text => {
                    let mut builder = TextRegionBuilder::new();
                    builder.begin(point);
                    ToolState::PlacingText(builder)
                }
            },
        };
        self.invalidate();
    }

    fn on_move(&mut self, screen: Point, modifiers: Modifiers) {
        if let Some(grab) = self.pan_grab {
            let origin = screen - grab;
            self.viewport
                .set_transform(self.viewport.scale(), origin.x, origin.y);
            self.invalidate();
            return;
        }

        let point = self.viewport.to_scene(screen);
        let state = std::mem::take(&mut self.tools.state);
        self.tools.state = match state {
            ToolState::Idle => return,
            ToolState::Drawing(mut builder) => {
                builder.extend(point, modifiers.ctrl);
                ToolState::Drawing(builder)
            }
            ToolState::Erasing { .. } => {
                self.erase_step(point);
                ToolState::Erasing { cursor: point }
            }
            ToolState::Selecting(mut session) => {
                session.pointer_move(point);
                ToolState::Selecting(session)
            }
            ToolState::Transforming {
                transform,
                recorded,
            } => {
                let recorded = self.apply_transform(&transform, point, recorded);
                ToolState::Transforming {
                    transform,
                    recorded,
                }
            }
            ToolState::PlacingText(mut builder) => {
                builder.drag(point);
                ToolState::PlacingText(builder)
            }
            editing @ ToolState::EditingText { .. } => {
                self.tools.state = editing;
                return;
            }
        };
        self.invalidate();
    }

    fn on_up(&mut self, screen: Point, button: MouseButton) {
        match button {
            MouseButton::Middle => {
                self.pan_grab = None;
                return;
            }
            MouseButton::Right => return,
            MouseButton::Left => {}
        }

        let point = self.viewport.to_scene(screen);
        let state = std::mem::take(&mut self.tools.state);
        self.tools.state = match state {
            ToolState::Drawing(builder) => {
                self.finish_stroke(builder);
                ToolState::Idle
            }
            ToolState::Selecting(mut session) => {
                let tolerance = self.tools.selector.tolerance(self.viewport.scale());
                if let Some(hits) = session.pointer_up(
                    point,
                    self.store.shapes(),
                    tolerance,
                    &self.tools.selector.kinds,
                ) {
                    log::debug!("Selected {} shapes", hits.len());
                    self.selection.set(hits);
                }
                ToolState::Idle
            }
            ToolState::PlacingText(mut builder) => {
                let side = default_region_side(
                    self.tools.text.font_size,
                    self.viewport.scale(),
                    self.tools.text.default_box_factor,
                );
                builder
                    .finish(point, side)
                    .map_or(ToolState::Idle, |region| ToolState::EditingText { region })
            }
            ToolState::Idle | ToolState::Erasing { .. } | ToolState::Transforming { .. } => {
                ToolState::Idle
            }
            editing @ ToolState::EditingText { .. } => editing,
        };
        self.invalidate();
    }

    /// Pointer left the canvas: strokes are kept, drags are abandoned.
    fn on_leave(&mut self) {
        self.pan_grab = None;
        let state = std::mem::take(&mut self.tools.state);
        self.tools.state = match state {
            ToolState::Drawing(builder) => {
                self.finish_stroke(builder);
                ToolState::Idle
            }
            editing @ ToolState::EditingText { .. } => editing,
            _ => ToolState::Idle,
        };
        self.invalidate();
    }

    fn begin_select(&mut self, point: Point) -> ToolState {
        let scale = self.viewport.scale();
        let handle_target = self.selection.single().and_then(|index| {
            let text = self.store.shapes().get(index)?.as_text_box()?;
            let handle = hit_test_text_handles(text, point, scale)?;
            Some(TextTransform::new(index, handle, point, text.clone()))
        });
        if let Some(transform) = handle_target {
            return ToolState::Transforming {
                transform,
                recorded: false,
            };
        }

        let mut session = SelectorSession::new();
        session.pointer_down(point);
        ToolState::Selecting(session)
    }

    /// Returns the new `recorded` flag.
    fn apply_transform(&mut self, transform: &TextTransform, point: Point, recorded: bool) -> bool {
        let updated = Shape::TextBox(transform.apply(point, self.viewport.scale()));
        let mut shapes = self.store.shapes().to_vec();
        let Some(slot) = shapes.get_mut(transform.index) else {
            return recorded;
        };
        if slot.as_text_box().is_none() || *slot == updated {
            return recorded;
        }
        *slot = updated;
        if !recorded {
            self.store.push_undo();
        }
        self.store.commit(shapes);
        self.persist();
        true
    }

    fn finish_stroke(&mut self, builder: StrokeBuilder) {
        if let Some(stroke) = builder.finish() {
            self.add_shape(Shape::Stroke(stroke));
        }
    }

    fn erase_step(&mut self, point: Point) {
        let settings = &self.tools.eraser;
        let radius = settings.radius(self.viewport.scale());
        let next = erase_at(self.store.shapes(), point, radius, settings.mode, &settings.kinds);
        if next.as_slice() == self.store.shapes() {
            return;
        }
        log::debug!(
            "Erased at ({:.1}, {:.1}) r={:.1}: {} -> {} shapes",
            point.x,
            point.y,
            radius,
            self.store.len(),
            next.len()
        );
        self.store.replace(next);
        self.after_reindex();
    }

    /// Indices changed: drop the selection and any gesture tied to the old
    /// list, then save and redraw.
    fn after_reindex(&mut self) {
        self.selection.clear();
        if matches!(
            self.tools.state,
            ToolState::Transforming { .. } | ToolState::Selecting(_)
        ) {
            log::debug!("Dropping gesture on reindexed shapes");
            self.tools.cancel();
        }
        self.persist();
        self.invalidate();
    }

    fn persist(&mut self) {
        match self.storage.save(&self.storage_key, self.store.shapes()) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                log::error!("Failed to save scene {:?}: {e}", self.storage_key);
                self.last_persist_error = Some(e);
            }
        }
    }

    fn invalidate(&mut self) {
        match self.frame_requester.as_deref_mut() {
            Some(requester) => {
                self.scheduler.request_with(requester);
            }
            None => {
                self.scheduler.request();
            }
        }
    }
}

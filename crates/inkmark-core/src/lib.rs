//! Inkmark Core Library
//!
//! Scene engine for an infinite annotation canvas: freehand strokes and text
//! boxes under a pan/zoom viewport, with undo/redo, erasing, selection and
//! coalesced redraws. Rendering is left to the host; it reads a [`Frame`].

pub mod config;
pub mod eraser;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod scheduler;
pub mod selection;
pub mod shapes;
pub mod storage;
pub mod store;
pub mod tools;
pub mod viewport;

pub use config::{ConfigError, SceneConfig, ViewportConfig};
pub use eraser::{EraseMode, EraserSettings, clip_stroke, erase_at};
pub use frame::{Frame, Preview};
pub use input::{Command, Modifiers, MouseButton, PointerEvent};
pub use scene::Scene;
pub use scheduler::{FrameRequester, RenderScheduler};
pub use selection::{SelectionSet, SelectorSession, hit_test_point, hit_test_rect};
pub use shapes::{KindSet, SerializableColor, Shape, ShapeKind, Stroke, StrokeKind, TextBox};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use store::SceneStore;
pub use tools::{ToolKind, ToolManager, ToolState};
pub use viewport::{GridLayer, GridWeights, Viewport};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;

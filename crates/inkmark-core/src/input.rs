//! Pointer and keyboard input delivered to the scene.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Which button a press or release came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    /// Pointer left the canvas.
    Leave,
    /// Wheel notch; negative `delta_y` zooms in.
    Wheel {
        position: Point,
        delta_y: f64,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Wheel { position, .. } => Some(position),
            PointerEvent::Leave => None,
        }
    }
}

/// Keyboard-triggered scene commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Undo,
    Redo,
    DeleteSelected,
}

impl Command {
    /// Map a key (DOM-style key name, e.g. `"z"`, `"Delete"`) to a command.
    ///
    /// Ctrl+Z undoes; Ctrl+Y and Ctrl+Shift+Z redo; Delete removes the selection.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        if modifiers.ctrl {
            if key.eq_ignore_ascii_case("z") {
                return Some(if modifiers.shift {
                    Command::Redo
                } else {
                    Command::Undo
                });
            }
            if key.eq_ignore_ascii_case("y") {
                return Some(Command::Redo);
            }
        }
        (key == "Delete").then_some(Command::DeleteSelected)
    }
}

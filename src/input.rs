//! Input event types delivered by the host event loop.
//!
//! Pointer positions arrive in device pixels and are mapped to scene space by
//! the [`Viewport`](crate::viewport::Viewport) before any handler sees them.

use serde::{Deserialize, Serialize};

use crate::model::Point;
use crate::tool::Tool;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    /// Whether the modifier bound to `role` is held.
    pub fn holds(&self, role: ModifierKey) -> bool {
        match role {
            ModifierKey::Shift => self.shift,
            ModifierKey::Ctrl => self.ctrl,
            ModifierKey::Alt => self.alt,
            ModifierKey::Meta => self.meta,
        }
    }
}

/// A single modifier key, used when binding modifier roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    /// The [`Key`] emitted when this modifier is pressed on its own.
    pub fn key(&self) -> Key {
        match self {
            ModifierKey::Shift => Key::Shift,
            ModifierKey::Ctrl => Key::Ctrl,
            ModifierKey::Alt => Key::Alt,
            ModifierKey::Meta => Key::Meta,
        }
    }
}

/// Keyboard keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Space,
    Delete,
    Backspace,
    Escape,
    Enter,
    Shift,
    Ctrl,
    Alt,
    Meta,
}

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Press,
    Move,
    Release,
}

/// A pointer event in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Device-space position
    pub position: Point,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, modifiers: Modifiers) -> Self {
        Self {
            kind,
            position,
            modifiers,
        }
    }

    pub fn press(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::new(PointerEventKind::Press, Point::new(x, y), modifiers)
    }

    pub fn moved(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::new(PointerEventKind::Move, Point::new(x, y), modifiers)
    }

    pub fn release(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::new(PointerEventKind::Release, Point::new(x, y), modifiers)
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
    /// Set by the host for OS key repeat
    pub auto_repeat: bool,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            pressed: true,
            auto_repeat: false,
            modifiers: Modifiers::none(),
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            pressed: false,
            auto_repeat: false,
            modifiers: Modifiers::none(),
        }
    }

    pub fn repeated(mut self) -> Self {
        self.auto_repeat = true;
        self
    }
}

/// Cursor the renderer should display over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Arrow,
    Crosshair,
    OpenHand,
    ZoomIn,
    ZoomOut,
    /// Top-left / bottom-right diagonal
    ResizeDiagonalMain,
    /// Top-right / bottom-left diagonal
    ResizeDiagonalAnti,
    ResizeVertical,
    ResizeHorizontal,
}

/// Effects the host should apply after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Scene or viewport changed; repaint.
    Redraw,
    SetCursor(CursorHint),
    /// The active tool changed; update toolbar state.
    ToolChanged(Tool),
}

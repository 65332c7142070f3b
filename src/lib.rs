//! roiview - image viewer core with interactive region-of-interest editing
//!
//! Shows an image with text labels and lets the user draw, select, move,
//! resize and duplicate rectangular and elliptical ROIs, with pan and zoom.
//! Rendering and the windowing event loop belong to the host, which feeds
//! [`PointerEvent`]s and [`KeyEvent`]s into an [`ImageViewer`] and applies the
//! returned [`Action`]s.
//!
//! | Module | Content |
//! |--------|---------|
//! | [`model`] | Geometry, resize handles and the ROI shape |
//! | [`scene`] | Live ROI set and gesture state |
//! | [`layers`] | Image and text layers |
//! | [`viewport`] | Device to scene coordinate mapping |
//! | [`tool`] | Tools and the input state machine |
//! | [`config`] | JSON configuration and logging setup |

pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod keybindings;
pub mod layers;
pub mod model;
pub mod scene;
pub mod tool;
pub mod viewer;
pub mod viewport;

#[cfg(test)]
mod tests;

pub use config::{LogLevel, ViewerConfig, init_logging};
pub use error::{ConfigError, ViewerError};
pub use input::{Action, CursorHint, Key, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
pub use model::{HandleId, Point, Rect, RoiId, RoiKind, RoiShape};
pub use scene::{Gesture, RoiMatrix, SceneModel};
pub use tool::{Tool, ToolController};
pub use viewer::ImageViewer;
pub use viewport::Viewport;

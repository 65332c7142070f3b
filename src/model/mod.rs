//! Data models for the ROI viewer.

mod geometry;
mod handle;
mod roi;

pub use geometry::{Point, Rect};
pub use handle::{HandleId, handle_at};
pub use roi::{ResizeSession, RoiId, RoiKind, RoiShape};

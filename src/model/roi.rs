//! Region-of-interest shapes and their interactive resize logic.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};
use super::handle::{HandleId, handle_at};

/// Unique identifier for a ROI within a scene.
pub type RoiId = u32;

/// The outline drawn inside a ROI's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiKind {
    Rect,
    Ellipse,
}

impl RoiKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            RoiKind::Rect => "Rect",
            RoiKind::Ellipse => "Ellipse",
        }
    }
}

/// Snapshot taken when a handle is grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    /// The grabbed handle
    pub handle: HandleId,
    /// Pointer position at press time
    pub press_pos: Point,
    /// Bounds at press time
    pub press_bounds: Rect,
}

/// A single editable annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiShape {
    id: RoiId,
    kind: RoiKind,
    bounds: Rect,
    selected: bool,
    mutable: bool,
    show_handles: bool,
    resize: Option<ResizeSession>,
}

impl RoiShape {
    /// Create a shape. Zero-size bounds are legal.
    pub fn new(id: RoiId, kind: RoiKind, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            kind,
            bounds: Rect::new(x, y, width, height),
            selected: false,
            mutable: false,
            show_handles: false,
            resize: None,
        }
    }

    /// A fresh, unselected copy with a new identity.
    pub fn duplicate(&self, id: RoiId) -> Self {
        let mut copy = Self::new(
            id,
            self.kind,
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.bounds.height,
        );
        copy.mutable = self.mutable;
        copy
    }

    pub fn id(&self) -> RoiId {
        self.id
    }

    pub fn kind(&self) -> RoiKind {
        self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn shows_handles(&self) -> bool {
        self.show_handles
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// Replace the bounds. Callers normalize before persisting.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.bounds = self.bounds.translated(dx, dy);
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.overlaps(&Rect::at_point(p))
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.bounds.overlaps(other)
    }

    /// The handle under `point`, if any. `size` is the grab area in scene units.
    pub fn handle_at(&self, point: Point, size: f32) -> Option<HandleId> {
        handle_at(&self.bounds, point, size)
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn set_show_handles(&mut self, show: bool) {
        self.show_handles = show;
    }

    /// Toggle whether the shape accepts hover, move, resize and select input.
    pub fn set_mutable(&mut self, mutable: bool) {
        self.mutable = mutable;
        if !mutable {
            self.resize = None;
        }
    }

    /// Grab `handle` at `pointer`.
    pub fn begin_resize(&mut self, handle: HandleId, pointer: Point) {
        self.resize = Some(ResizeSession {
            handle,
            press_pos: pointer,
            press_bounds: self.bounds,
        });
    }

    /// Apply the pointer delta since the grab to the owned edges and normalize.
    ///
    /// Returns the new bounds, or `None` when no handle is grabbed.
    pub fn continue_resize(&mut self, pointer: Point) -> Option<Rect> {
        let session = self.resize?;
        let (dx, dy) = pointer.delta_from(session.press_pos);
        let rect = session
            .handle
            .drag(&session.press_bounds, dx, dy)
            .normalized();
        self.bounds = rect;
        Some(rect)
    }

    pub fn end_resize(&mut self) {
        self.resize = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(x: f32, y: f32, w: f32, h: f32) -> RoiShape {
        RoiShape::new(1, RoiKind::Rect, x, y, w, h)
    }

    #[test]
    fn test_new_shape_defaults() {
        let s = RoiShape::new(7, RoiKind::Ellipse, 1.0, 2.0, 0.0, 0.0);
        assert_eq!(s.id(), 7);
        assert_eq!(s.kind(), RoiKind::Ellipse);
        assert_eq!(s.bounds(), Rect::new(1.0, 2.0, 0.0, 0.0));
        assert!(!s.is_selected());
        assert!(!s.is_mutable());
        assert!(!s.shows_handles());
    }

    #[test]
    fn test_resize_bottom_right_past_origin_normalizes() {
        let mut s = shape(0.0, 0.0, 10.0, 10.0);
        s.begin_resize(HandleId::BottomRight, Point::new(10.0, 10.0));
        let r = s.continue_resize(Point::new(-5.0, -5.0));
        assert_eq!(r, Some(Rect::new(-5.0, -5.0, 5.0, 5.0)));
        s.end_resize();
        assert_eq!(s.bounds(), Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert!(s.bounds().is_normalized());
    }

    #[test]
    fn test_resize_is_relative_to_press_snapshot() {
        let mut s = shape(0.0, 0.0, 10.0, 10.0);
        s.begin_resize(HandleId::MiddleRight, Point::new(10.0, 5.0));
        s.continue_resize(Point::new(30.0, 5.0));
        s.continue_resize(Point::new(12.0, 5.0));
        assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 12.0, 10.0));
    }

    #[test]
    fn test_resize_top_left_grows() {
        let mut s = shape(10.0, 10.0, 10.0, 10.0);
        s.begin_resize(HandleId::TopLeft, Point::new(10.0, 10.0));
        s.continue_resize(Point::new(4.0, 6.0));
        assert_eq!(s.bounds(), Rect::new(4.0, 6.0, 16.0, 14.0));
    }

    #[test]
    fn test_continue_without_grab_is_noop() {
        let mut s = shape(0.0, 0.0, 10.0, 10.0);
        assert_eq!(s.continue_resize(Point::new(50.0, 50.0)), None);
        assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_set_immutable_clears_resize() {
        let mut s = shape(0.0, 0.0, 10.0, 10.0);
        s.set_mutable(true);
        s.begin_resize(HandleId::TopMiddle, Point::new(5.0, 0.0));
        assert!(s.is_resizing());
        s.set_mutable(false);
        assert!(!s.is_resizing());
        assert_eq!(s.continue_resize(Point::new(5.0, -20.0)), None);
    }

    #[test]
    fn test_contains_point_uses_strict_overlap() {
        let s = shape(0.0, 0.0, 10.0, 10.0);
        assert!(s.contains_point(Point::new(1.0, 1.0)));
        assert!(!s.contains_point(Point::new(0.0, 0.0)));
        assert!(!s.contains_point(Point::new(11.0, 1.0)));
    }

    #[test]
    fn test_duplicate_copies_geometry_not_state() {
        let mut s = RoiShape::new(1, RoiKind::Ellipse, 1.0, 2.0, 3.0, 4.0);
        s.set_selected(true);
        s.set_show_handles(true);
        s.set_mutable(true);
        let copy = s.duplicate(2);
        assert_eq!(copy.id(), 2);
        assert_eq!(copy.kind(), RoiKind::Ellipse);
        assert_eq!(copy.bounds(), s.bounds());
        assert!(!copy.is_selected());
        assert!(!copy.shows_handles());
        assert!(copy.is_mutable());
    }
}

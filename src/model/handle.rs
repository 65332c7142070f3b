//! Resize handles around a shape's bounding box.

use super::geometry::{Point, Rect};
use crate::input::CursorHint;

/// One of the eight grab points on a shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleId {
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl HandleId {
    /// All handles in hit-test priority order.
    pub fn all() -> &'static [HandleId] {
        &[
            HandleId::TopLeft,
            HandleId::TopMiddle,
            HandleId::TopRight,
            HandleId::MiddleLeft,
            HandleId::MiddleRight,
            HandleId::BottomLeft,
            HandleId::BottomMiddle,
            HandleId::BottomRight,
        ]
    }

    /// Where this handle sits on `bounds`.
    pub fn anchor(&self, bounds: &Rect) -> Point {
        let c = bounds.center();
        match self {
            HandleId::TopLeft => Point::new(bounds.left(), bounds.top()),
            HandleId::TopMiddle => Point::new(c.x, bounds.top()),
            HandleId::TopRight => Point::new(bounds.right(), bounds.top()),
            HandleId::MiddleLeft => Point::new(bounds.left(), c.y),
            HandleId::MiddleRight => Point::new(bounds.right(), c.y),
            HandleId::BottomLeft => Point::new(bounds.left(), bounds.bottom()),
            HandleId::BottomMiddle => Point::new(c.x, bounds.bottom()),
            HandleId::BottomRight => Point::new(bounds.right(), bounds.bottom()),
        }
    }

    /// The square grab area of this handle.
    pub fn rect(&self, bounds: &Rect, size: f32) -> Rect {
        Rect::square_around(self.anchor(bounds), size)
    }

    pub fn moves_left(&self) -> bool {
        matches!(
            self,
            HandleId::TopLeft | HandleId::MiddleLeft | HandleId::BottomLeft
        )
    }

    pub fn moves_right(&self) -> bool {
        matches!(
            self,
            HandleId::TopRight | HandleId::MiddleRight | HandleId::BottomRight
        )
    }

    pub fn moves_top(&self) -> bool {
        matches!(
            self,
            HandleId::TopLeft | HandleId::TopMiddle | HandleId::TopRight
        )
    }

    pub fn moves_bottom(&self) -> bool {
        matches!(
            self,
            HandleId::BottomLeft | HandleId::BottomMiddle | HandleId::BottomRight
        )
    }

    /// Move the edges this handle owns by `(dx, dy)`.
    ///
    /// The returned rect is not normalized.
    pub fn drag(&self, original: &Rect, dx: f32, dy: f32) -> Rect {
        let mut left = original.left();
        let mut top = original.top();
        let mut right = original.right();
        let mut bottom = original.bottom();

        if self.moves_left() {
            left += dx;
        }
        if self.moves_right() {
            right += dx;
        }
        if self.moves_top() {
            top += dy;
        }
        if self.moves_bottom() {
            bottom += dy;
        }

        Rect::from_edges(left, top, right, bottom)
    }

    /// Cursor shown while hovering this handle.
    pub fn cursor(&self) -> CursorHint {
        match self {
            HandleId::TopLeft | HandleId::BottomRight => CursorHint::ResizeDiagonalMain,
            HandleId::TopRight | HandleId::BottomLeft => CursorHint::ResizeDiagonalAnti,
            HandleId::TopMiddle | HandleId::BottomMiddle => CursorHint::ResizeVertical,
            HandleId::MiddleLeft | HandleId::MiddleRight => CursorHint::ResizeHorizontal,
        }
    }
}

/// Find the first handle of `bounds` whose grab area contains `point`.
pub fn handle_at(bounds: &Rect, point: Point, size: f32) -> Option<HandleId> {
    HandleId::all()
        .iter()
        .copied()
        .find(|handle| handle.rect(bounds, size).contains_inclusive(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_handle_found_at_its_anchor() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        for handle in HandleId::all() {
            let anchor = handle.anchor(&bounds);
            assert_eq!(handle_at(&bounds, anchor, 8.0), Some(*handle));
        }
    }

    #[test]
    fn test_interior_point_has_no_handle() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(handle_at(&bounds, Point::new(30.0, 25.0), 8.0), None);
    }

    #[test]
    fn test_ties_resolve_in_enumeration_order() {
        // Every handle of a zero-size rect sits on the same point.
        let bounds = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(
            handle_at(&bounds, Point::new(5.0, 5.0), 8.0),
            Some(HandleId::TopLeft)
        );

        // On a thin rect the top and bottom rows overlap.
        let thin = Rect::new(0.0, 0.0, 100.0, 2.0);
        assert_eq!(
            handle_at(&thin, Point::new(50.0, 1.0), 8.0),
            Some(HandleId::TopMiddle)
        );
    }

    #[test]
    fn test_drag_moves_only_owned_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            HandleId::MiddleRight.drag(&r, 5.0, 100.0),
            Rect::new(0.0, 0.0, 15.0, 10.0)
        );
        assert_eq!(
            HandleId::TopMiddle.drag(&r, 100.0, 3.0),
            Rect::new(0.0, 3.0, 10.0, 7.0)
        );
        assert_eq!(
            HandleId::TopLeft.drag(&r, 2.0, 2.0),
            Rect::new(2.0, 2.0, 8.0, 8.0)
        );
    }

    #[test]
    fn test_drag_past_opposite_edge_inverts() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let dragged = HandleId::MiddleLeft.drag(&r, 15.0, 0.0);
        assert_eq!(dragged.width, -5.0);
        assert_eq!(dragged.normalized(), Rect::new(10.0, 0.0, 5.0, 10.0));
    }

    #[test]
    fn test_cursor_mapping() {
        assert_eq!(HandleId::TopLeft.cursor(), CursorHint::ResizeDiagonalMain);
        assert_eq!(HandleId::BottomLeft.cursor(), CursorHint::ResizeDiagonalAnti);
        assert_eq!(HandleId::BottomMiddle.cursor(), CursorHint::ResizeVertical);
        assert_eq!(HandleId::MiddleRight.cursor(), CursorHint::ResizeHorizontal);
    }
}

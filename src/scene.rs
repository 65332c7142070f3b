//! Scene model: the live set of ROIs plus the transient state of the gesture in progress.
//!
//! The scene owns every shape. Gesture handlers take scene-space points only;
//! mapping from device pixels happens before they are called.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::input::CursorHint;
use crate::layers::{ImageLayer, TextLayer};
use crate::model::{HandleId, Point, Rect, RoiId, RoiKind, RoiShape};

/// The gesture currently in progress. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress
    #[default]
    Idle,
    /// Drawing a new shape from an anchor corner
    Drawing { id: RoiId, anchor: Point },
    /// Panning all layers, with the pointer position of the previous event
    Panning { last: Point },
    /// Rubber-band selection spanning from `anchor`
    RubberBand { anchor: Point, rect: Rect },
    /// Dragging every selected shape
    Moving { last: Point },
    /// Dragging a resize handle of one shape
    Resizing { id: RoiId },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Serializable geometry of a ROI, used to hand the live set to external persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiRecord {
    pub kind: RoiKind,
    pub bounds: Rect,
}

/// A regular grid of equally sized ROIs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiMatrix {
    pub rows: usize,
    pub cols: usize,
    /// Horizontal and vertical distance between neighbouring cells
    pub spacing: (f32, f32),
    /// Top-left corner of the first cell
    pub origin: Point,
    /// Width and height of every cell
    pub size: (f32, f32),
}

impl RoiMatrix {
    /// Bounds of the cell at `row`, `col`.
    pub fn cell(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.origin.x + col as f32 * self.spacing.0,
            self.origin.y + row as f32 * self.spacing.1,
            self.size.0,
            self.size.1,
        )
    }
}

/// All live ROIs, the gesture state and the sibling image/text layers.
#[derive(Debug, Clone)]
pub struct SceneModel {
    shapes: HashMap<RoiId, RoiShape>,
    /// Copies produced by the current duplicate gesture, merged on release
    duplicate_buffer: Vec<RoiShape>,
    gesture: Gesture,
    next_id: RoiId,
    /// Keep shapes whose draw gesture ended without any extent
    keep_empty_rois: bool,
    image: ImageLayer,
    texts: TextLayer,
}

impl Default for SceneModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneModel {
    pub fn new() -> Self {
        Self {
            shapes: HashMap::new(),
            duplicate_buffer: Vec::new(),
            gesture: Gesture::Idle,
            next_id: 1,
            keep_empty_rois: true,
            image: ImageLayer::new(),
            texts: TextLayer::new(),
        }
    }

    pub fn set_keep_empty_rois(&mut self, keep: bool) {
        self.keep_empty_rois = keep;
    }

    fn allocate_id(&mut self) -> RoiId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ========================================================================
    // Live set management
    // ========================================================================

    /// Create a ROI and add it to the live set. New shapes start immutable.
    pub fn add_roi(&mut self, kind: RoiKind, x: f32, y: f32, width: f32, height: f32) -> RoiId {
        let id = self.allocate_id();
        self.shapes
            .insert(id, RoiShape::new(id, kind, x, y, width, height));
        log::debug!(
            "Added {} ROI {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
            kind.name(),
            id,
            x,
            y,
            width,
            height
        );
        id
    }

    /// Add one ROI per cell of `matrix`, row by row.
    pub fn add_roi_matrix(&mut self, kind: RoiKind, matrix: &RoiMatrix) -> Vec<RoiId> {
        let mut ids = Vec::with_capacity(matrix.rows * matrix.cols);
        for row in 0..matrix.rows {
            for col in 0..matrix.cols {
                let cell = matrix.cell(row, col);
                ids.push(self.add_roi(kind, cell.x, cell.y, cell.width, cell.height));
            }
        }
        log::info!(
            "Added {}x{} {} ROI matrix",
            matrix.rows,
            matrix.cols,
            kind.name()
        );
        ids
    }

    /// Remove a ROI. Removing an absent ROI does nothing.
    pub fn remove_roi(&mut self, id: RoiId) -> Option<RoiShape> {
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            if matches!(self.gesture, Gesture::Drawing { id: g, .. } | Gesture::Resizing { id: g } if g == id)
            {
                self.gesture = Gesture::Idle;
            }
            log::debug!("Removed ROI {}", id);
        }
        removed
    }

    /// Remove several ROIs, returning how many were actually present.
    pub fn remove_rois(&mut self, ids: impl IntoIterator<Item = RoiId>) -> usize {
        ids.into_iter()
            .filter(|id| self.remove_roi(*id).is_some())
            .count()
    }

    /// Remove every ROI and abandon any gesture.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.duplicate_buffer.clear();
        self.gesture = Gesture::Idle;
    }

    pub fn get(&self, id: RoiId) -> Option<&RoiShape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: RoiId) -> Option<&mut RoiShape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: RoiId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Live shapes, in no particular order.
    pub fn shapes(&self) -> impl Iterator<Item = &RoiShape> {
        self.shapes.values()
    }

    /// Copies being dragged by a duplicate gesture, not yet in the live set.
    pub fn pending_duplicates(&self) -> &[RoiShape] {
        &self.duplicate_buffer
    }

    /// Everything the renderer should draw: live shapes and pending copies.
    pub fn visible_shapes(&self) -> impl Iterator<Item = &RoiShape> {
        self.shapes.values().chain(self.duplicate_buffer.iter())
    }

    /// Live ROI ids in ascending order.
    pub fn ids(&self) -> Vec<RoiId> {
        let mut ids: Vec<RoiId> = self.shapes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn all_shapes_mut(&mut self) -> impl Iterator<Item = &mut RoiShape> {
        self.shapes
            .values_mut()
            .chain(self.duplicate_buffer.iter_mut())
    }

    /// Enable or disable input on every shape. Only the select tool leaves shapes mutable.
    pub fn set_all_mutable(&mut self, mutable: bool) {
        for shape in self.all_shapes_mut() {
            shape.set_mutable(mutable);
        }
        if !mutable && matches!(self.gesture, Gesture::Resizing { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn set_roi_mutable(&mut self, id: RoiId, mutable: bool) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.set_mutable(mutable);
        }
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Ids of selected live shapes, ascending.
    pub fn selected_ids(&self) -> Vec<RoiId> {
        let mut ids: Vec<RoiId> = self
            .shapes
            .values()
            .filter(|s| s.is_selected())
            .map(RoiShape::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn deselect_all(&mut self) {
        for shape in self.all_shapes_mut() {
            shape.set_selected(false);
            shape.set_show_handles(false);
        }
    }

    /// Make `id` the only selected shape.
    pub fn select_only(&mut self, id: RoiId) {
        for shape in self.all_shapes_mut() {
            let selected = shape.id() == id;
            shape.set_selected(selected);
            shape.set_show_handles(selected);
        }
    }

    /// Remove every selected shape. Returns the number removed.
    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selected_ids();
        if selected.is_empty() {
            return 0;
        }
        let removed = self.remove_rois(selected);
        log::info!("Deleted {} selected ROI(s)", removed);
        removed
    }

    /// The topmost mutable shape whose interior contains `p`.
    ///
    /// Later shapes are drawn above earlier ones, so the highest id wins.
    pub fn shape_at(&self, p: Point) -> Option<RoiId> {
        self.shapes
            .values()
            .filter(|s| s.is_mutable() && s.contains_point(p))
            .map(RoiShape::id)
            .max()
    }

    /// A grabbable handle under `p` on a selected shape.
    fn handle_hit(&self, p: Point, handle_size: f32) -> Option<(RoiId, HandleId)> {
        self.shapes
            .values()
            .filter(|s| s.is_mutable() && s.is_selected() && s.shows_handles())
            .filter_map(|s| s.handle_at(p, handle_size).map(|h| (s.id(), h)))
            .max_by_key(|(id, _)| *id)
    }

    /// Cursor for a pointer hovering `p` while the select tool is active.
    pub fn hover_cursor(&self, p: Point, handle_size: f32) -> CursorHint {
        self.handle_hit(p, handle_size)
            .map_or(CursorHint::Arrow, |(_, handle)| handle.cursor())
    }

    // ========================================================================
    // Gestures
    // ========================================================================

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// The transient rubber-band rectangle, if a band selection is in progress.
    pub fn rubber_band(&self) -> Option<Rect> {
        match self.gesture {
            Gesture::RubberBand { rect, .. } => Some(rect),
            _ => None,
        }
    }

    /// Abandon the gesture in progress, leaving the scene consistent.
    ///
    /// A shape being drawn keeps its current bounds and pending duplicates
    /// are merged, as if the pointer had been released.
    pub fn cancel_gesture(&mut self) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing { id, .. } => self.finish_draw(id),
            Gesture::Resizing { id } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.end_resize();
                }
            }
            Gesture::Panning { .. } | Gesture::RubberBand { .. } | Gesture::Moving { .. } => {}
        }
        self.merge_duplicates();
        if !self.gesture.is_idle() {
            log::debug!("Cancelled gesture {:?}", self.gesture);
        }
        self.gesture = Gesture::Idle;
    }

    // --- Draw ---

    /// Start drawing a zero-size shape anchored at `p`.
    pub fn begin_draw(&mut self, kind: RoiKind, p: Point) -> RoiId {
        let id = self.add_roi(kind, p.x, p.y, 0.0, 0.0);
        self.gesture = Gesture::Drawing { id, anchor: p };
        log::debug!("Draw {}: started at ({:.1}, {:.1})", kind.name(), p.x, p.y);
        id
    }

    pub fn update_draw(&mut self, p: Point) {
        if let Gesture::Drawing { id, anchor } = self.gesture {
            if let Some(shape) = self.shapes.get_mut(&id) {
                shape.set_bounds(Rect::from_corners(anchor, p));
            }
        }
    }

    /// Finish drawing. The shape keeps its last bounds.
    pub fn end_draw(&mut self) -> Option<RoiId> {
        let Gesture::Drawing { id, .. } = self.gesture else {
            return None;
        };
        self.gesture = Gesture::Idle;
        self.finish_draw(id);
        self.shapes.contains_key(&id).then_some(id)
    }

    fn finish_draw(&mut self, id: RoiId) {
        let Some(bounds) = self.shapes.get(&id).map(RoiShape::bounds) else {
            return;
        };
        if !self.keep_empty_rois && bounds.is_point() {
            self.shapes.remove(&id);
            log::debug!("Discarded empty ROI {}", id);
        } else {
            log::info!(
                "Created ROI {} at ({:.1}, {:.1}) size {:.1}x{:.1}",
                id,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height
            );
        }
    }

    // --- Pan ---

    pub fn begin_pan(&mut self, p: Point) {
        self.gesture = Gesture::Panning { last: p };
    }

    /// Move every shape and both layers by the delta since the previous event.
    pub fn update_pan(&mut self, p: Point) {
        let Gesture::Panning { last } = self.gesture else {
            return;
        };
        let (dx, dy) = p.delta_from(last);
        self.translate_all(dx, dy);
        self.gesture = Gesture::Panning { last: p };
    }

    pub fn end_pan(&mut self) {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Translate all shapes and the image/text layers by the same delta.
    pub fn translate_all(&mut self, dx: f32, dy: f32) {
        for shape in self.all_shapes_mut() {
            shape.move_by(dx, dy);
        }
        self.image.move_by(dx, dy);
        self.texts.move_by(dx, dy);
    }

    // --- Select tool ---

    /// Pointer press with the select tool.
    ///
    /// Resolves, in order: duplicate gesture (when `duplicate` is held),
    /// handle grab on a selected shape, press inside a shape, and otherwise a
    /// rubber-band selection.
    pub fn select_press(&mut self, p: Point, duplicate: bool, handle_size: f32) {
        if duplicate && self.begin_duplicate(p) {
            self.gesture = Gesture::Moving { last: p };
            return;
        }

        if let Some((id, handle)) = self.handle_hit(p, handle_size) {
            if let Some(shape) = self.shapes.get_mut(&id) {
                shape.begin_resize(handle, p);
                self.gesture = Gesture::Resizing { id };
                log::debug!("Resize ROI {}: grabbed {:?}", id, handle);
                return;
            }
        }

        if let Some(id) = self.shape_at(p) {
            if !self.shapes.get(&id).is_some_and(RoiShape::is_selected) {
                self.select_only(id);
                log::debug!("Selected ROI {}", id);
            }
            self.gesture = Gesture::Moving { last: p };
            return;
        }

        self.gesture = Gesture::RubberBand {
            anchor: p,
            rect: Rect::at_point(p),
        };
    }

    pub fn select_move(&mut self, p: Point) {
        match self.gesture {
            Gesture::RubberBand { anchor, .. } => {
                let rect = Rect::from_corners(anchor, p);
                self.gesture = Gesture::RubberBand { anchor, rect };
                for shape in self.shapes.values_mut().filter(|s| s.is_mutable()) {
                    let selected = shape.overlaps(&rect);
                    shape.set_selected(selected);
                    shape.set_show_handles(selected);
                }
            }
            Gesture::Moving { last } => {
                let (dx, dy) = p.delta_from(last);
                for shape in self.all_shapes_mut().filter(|s| s.is_selected()) {
                    shape.move_by(dx, dy);
                }
                self.gesture = Gesture::Moving { last: p };
            }
            Gesture::Resizing { id } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.continue_resize(p);
                }
            }
            _ => {}
        }
    }

    pub fn select_release(&mut self, p: Point) {
        match self.gesture {
            Gesture::RubberBand { anchor, .. } => {
                if anchor == p && self.shape_at(p).is_none() {
                    self.deselect_all();
                    log::debug!("Click on background, selection cleared");
                }
            }
            Gesture::Moving { .. } => {
                self.merge_duplicates();
            }
            Gesture::Resizing { id } => {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.end_resize();
                    log::debug!("Resize ROI {}: finished at {:?}", id, shape.bounds());
                }
            }
            _ => {}
        }
        self.gesture = Gesture::Idle;
    }

    // --- Duplicate ---

    /// Copy every selected shape into the duplicate buffer and select the copies.
    ///
    /// When nothing is selected, the shape under `p` is selected first.
    /// Returns false when there was nothing to duplicate.
    pub fn begin_duplicate(&mut self, p: Point) -> bool {
        if self.selected_ids().is_empty() {
            if let Some(id) = self.shape_at(p) {
                if let Some(shape) = self.shapes.get_mut(&id) {
                    shape.set_selected(true);
                }
            }
        }

        let originals = self.selected_ids();
        if originals.is_empty() {
            return false;
        }

        for id in &originals {
            let new_id = self.allocate_id();
            let Some(original) = self.shapes.get_mut(id) else {
                continue;
            };
            let mut copy = original.duplicate(new_id);
            original.set_selected(false);
            original.set_show_handles(false);
            copy.set_selected(true);
            copy.set_show_handles(false);
            self.duplicate_buffer.push(copy);
        }
        log::debug!("Duplicating {} ROI(s)", self.duplicate_buffer.len());
        true
    }

    /// Move pending copies into the live set, unselected.
    pub fn merge_duplicates(&mut self) {
        if self.duplicate_buffer.is_empty() {
            return;
        }
        let count = self.duplicate_buffer.len();
        for mut copy in self.duplicate_buffer.drain(..) {
            copy.set_selected(false);
            copy.set_show_handles(false);
            self.shapes.insert(copy.id(), copy);
        }
        log::info!("Added {} duplicated ROI(s)", count);
    }

    // ========================================================================
    // Layers
    // ========================================================================

    pub fn image(&self) -> &ImageLayer {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut ImageLayer {
        &mut self.image
    }

    pub fn texts(&self) -> &TextLayer {
        &self.texts
    }

    pub fn texts_mut(&mut self) -> &mut TextLayer {
        &mut self.texts
    }

    /// Put the image and text layers back at the scene origin.
    pub fn reset_layers(&mut self) {
        self.image.reset_position();
        self.texts.reset_position();
    }

    // ========================================================================
    // Import/Export
    // ========================================================================

    /// Geometry of every live ROI, ordered by id.
    pub fn records(&self) -> Vec<RoiRecord> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.shapes.get(&id))
            .map(|s| RoiRecord {
                kind: s.kind(),
                bounds: s.bounds(),
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String, ViewerError> {
        Ok(serde_json::to_string_pretty(&self.records())?)
    }

    /// Build a scene holding the ROIs described by `json`.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let mut scene = Self::new();
        scene.load_json(json)?;
        Ok(scene)
    }

    /// Add the ROIs described by `json` to the live set. Returns their ids.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<RoiId>, ViewerError> {
        let records: Vec<RoiRecord> = serde_json::from_str(json)?;
        let ids = records
            .into_iter()
            .map(|r| {
                let b = r.bounds.normalized();
                self.add_roi(r.kind, b.x, b.y, b.width, b.height)
            })
            .collect();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDLE: f32 = 8.0;

    fn mutable_scene(rects: &[(f32, f32, f32, f32)]) -> (SceneModel, Vec<RoiId>) {
        let mut scene = SceneModel::new();
        let ids = rects
            .iter()
            .map(|&(x, y, w, h)| scene.add_roi(RoiKind::Rect, x, y, w, h))
            .collect();
        scene.set_all_mutable(true);
        (scene, ids)
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_add_roi_starts_immutable() {
        let mut scene = SceneModel::new();
        let id = scene.add_roi(RoiKind::Ellipse, 1.0, 2.0, 3.0, 4.0);
        let shape = scene.get(id).unwrap();
        assert!(!shape.is_mutable());
        assert_eq!(shape.kind(), RoiKind::Ellipse);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 5.0, 5.0), (10.0, 10.0, 5.0, 5.0)]);
        assert!(scene.remove_roi(ids[0]).is_some());
        assert!(scene.remove_roi(ids[0]).is_none());
        assert_eq!(scene.remove_rois([ids[0], ids[1], 999]), 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_draw_zero_movement_keeps_empty_shape() {
        let mut scene = SceneModel::new();
        let id = scene.begin_draw(RoiKind::Rect, p(7.0, 9.0));
        assert_eq!(scene.end_draw(), Some(id));
        assert_eq!(scene.get(id).unwrap().bounds(), Rect::new(7.0, 9.0, 0.0, 0.0));
        assert!(scene.gesture().is_idle());
    }

    #[test]
    fn test_draw_empty_shape_discarded_when_configured() {
        let mut scene = SceneModel::new();
        scene.set_keep_empty_rois(false);
        scene.begin_draw(RoiKind::Rect, p(7.0, 9.0));
        assert_eq!(scene.end_draw(), None);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_draw_flat_shape_kept_when_empty_discarded() {
        let mut scene = SceneModel::new();
        scene.set_keep_empty_rois(false);
        let id = scene.begin_draw(RoiKind::Rect, p(0.0, 0.0));
        scene.update_draw(p(10.0, 0.0));
        assert_eq!(scene.end_draw(), Some(id));
        assert_eq!(scene.get(id).unwrap().bounds(), Rect::new(0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_draw_normalizes_against_anchor() {
        let mut scene = SceneModel::new();
        let id = scene.begin_draw(RoiKind::Ellipse, p(20.0, 20.0));
        scene.update_draw(p(30.0, 25.0));
        scene.update_draw(p(5.0, 10.0));
        scene.end_draw();
        assert_eq!(scene.get(id).unwrap().bounds(), Rect::new(5.0, 10.0, 15.0, 10.0));
    }

    #[test]
    fn test_rubber_band_selects_by_strict_overlap() {
        let (mut scene, ids) = mutable_scene(&[
            (0.0, 0.0, 5.0, 5.0),
            (10.0, 10.0, 5.0, 5.0),
            (20.0, 20.0, 5.0, 5.0),
        ]);
        // The origin lies on the first shape's edge, so the press starts a band.
        scene.select_press(p(0.0, 0.0), false, HANDLE);
        assert!(scene.rubber_band().is_some());
        scene.select_move(p(12.0, 12.0));
        assert_eq!(scene.rubber_band(), Some(Rect::new(0.0, 0.0, 12.0, 12.0)));
        assert_eq!(scene.selected_ids(), vec![ids[0], ids[1]]);
        assert!(scene.get(ids[1]).unwrap().shows_handles());
        assert!(!scene.get(ids[2]).unwrap().shows_handles());

        scene.select_release(p(12.0, 12.0));
        assert!(scene.rubber_band().is_none());
        assert_eq!(scene.selected_ids(), vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_background_click_clears_selection() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 5.0, 5.0)]);
        scene.select_only(ids[0]);
        scene.select_press(p(50.0, 50.0), false, HANDLE);
        scene.select_release(p(50.0, 50.0));
        assert!(scene.selected_ids().is_empty());
    }

    #[test]
    fn test_press_inside_shape_selects_and_moves() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0), (20.0, 0.0, 10.0, 10.0)]);
        scene.select_press(p(5.0, 5.0), false, HANDLE);
        assert!(scene.rubber_band().is_none());
        assert_eq!(scene.selected_ids(), vec![ids[0]]);

        scene.select_move(p(7.0, 8.0));
        scene.select_move(p(9.0, 11.0));
        scene.select_release(p(9.0, 11.0));
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(4.0, 6.0, 10.0, 10.0));
        assert_eq!(scene.get(ids[1]).unwrap().bounds(), Rect::new(20.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_handle_drag_resizes_selected_shape() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        scene.select_only(ids[0]);
        scene.select_press(p(10.0, 10.0), false, HANDLE);
        assert_eq!(scene.gesture(), Gesture::Resizing { id: ids[0] });
        scene.select_move(p(-5.0, -5.0));
        scene.select_release(p(-5.0, -5.0));
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert!(!scene.get(ids[0]).unwrap().is_resizing());
    }

    #[test]
    fn test_handles_ignored_on_unselected_shapes() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        scene.select_press(p(10.0, 10.0), false, HANDLE);
        assert!(matches!(scene.gesture(), Gesture::RubberBand { .. }));
        scene.select_release(p(10.0, 10.0));
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_duplicate_then_drag() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        scene.select_only(ids[0]);

        scene.select_press(p(5.0, 5.0), true, HANDLE);
        assert_eq!(scene.pending_duplicates().len(), 1);
        assert!(!scene.get(ids[0]).unwrap().is_selected());

        scene.select_move(p(10.0, 10.0));
        scene.select_release(p(10.0, 10.0));

        assert!(scene.pending_duplicates().is_empty());
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));

        let copy = scene.shapes().find(|s| s.id() != ids[0]).unwrap();
        assert_eq!(copy.bounds(), Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(copy.kind(), RoiKind::Rect);
        assert!(!copy.is_selected());
        assert!(!copy.shows_handles());
    }

    #[test]
    fn test_duplicate_without_selection_uses_shape_under_pointer() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0), (50.0, 50.0, 10.0, 10.0)]);
        scene.select_press(p(55.0, 55.0), true, HANDLE);
        assert_eq!(scene.pending_duplicates().len(), 1);
        assert_eq!(scene.pending_duplicates()[0].bounds(), scene.get(ids[1]).unwrap().bounds());
        scene.select_release(p(55.0, 55.0));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_duplicate_on_background_falls_back_to_rubber_band() {
        let (mut scene, _) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        scene.select_press(p(50.0, 50.0), true, HANDLE);
        assert!(scene.pending_duplicates().is_empty());
        assert!(matches!(scene.gesture(), Gesture::RubberBand { .. }));
    }

    #[test]
    fn test_delete_selected() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 5.0, 5.0), (10.0, 10.0, 5.0, 5.0)]);
        assert_eq!(scene.delete_selected(), 0);
        assert_eq!(scene.ids(), ids);

        scene.select_only(ids[1]);
        assert_eq!(scene.delete_selected(), 1);
        assert_eq!(scene.ids(), vec![ids[0]]);
    }

    #[test]
    fn test_pan_is_incremental_across_layers() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 5.0, 5.0)]);
        scene.texts_mut().add("t", "label", [0, 0, 0], p(1.0, 1.0));

        scene.begin_pan(p(100.0, 100.0));
        let moves = [(103.0, 101.0), (110.0, 90.0), (95.0, 95.0)];
        for (x, y) in moves {
            scene.update_pan(p(x, y));
        }
        scene.end_pan();

        // Sum of per-step deltas equals last - first.
        let expected = (-5.0, -5.0);
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(-5.0, -5.0, 5.0, 5.0));
        assert_eq!(scene.image().offset(), p(expected.0, expected.1));
        assert_eq!(scene.texts().scene_position("t"), Some(p(-4.0, -4.0)));
        assert!(scene.gesture().is_idle());
    }

    #[test]
    fn test_set_all_mutable_false_stops_resize() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        scene.select_only(ids[0]);
        scene.select_press(p(10.0, 10.0), false, HANDLE);
        scene.set_all_mutable(false);
        assert!(scene.gesture().is_idle());
        scene.select_move(p(30.0, 30.0));
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_hover_cursor_on_handle() {
        let (mut scene, ids) = mutable_scene(&[(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(scene.hover_cursor(p(10.0, 5.0), HANDLE), CursorHint::Arrow);
        scene.select_only(ids[0]);
        assert_eq!(
            scene.hover_cursor(p(10.0, 5.0), HANDLE),
            CursorHint::ResizeHorizontal
        );
    }

    #[test]
    fn test_roi_matrix_layout() {
        let mut scene = SceneModel::new();
        let matrix = RoiMatrix {
            rows: 2,
            cols: 3,
            spacing: (20.0, 15.0),
            origin: p(5.0, 5.0),
            size: (10.0, 8.0),
        };
        let ids = scene.add_roi_matrix(RoiKind::Ellipse, &matrix);
        assert_eq!(ids.len(), 6);
        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Rect::new(5.0, 5.0, 10.0, 8.0));
        assert_eq!(scene.get(ids[2]).unwrap().bounds(), Rect::new(45.0, 5.0, 10.0, 8.0));
        assert_eq!(scene.get(ids[5]).unwrap().bounds(), Rect::new(45.0, 20.0, 10.0, 8.0));
    }

    #[test]
    fn test_json_export_import() {
        let (scene, _) = mutable_scene(&[(0.0, 0.0, 5.0, 5.0), (10.0, 10.0, 2.0, 3.0)]);
        let json = scene.to_json().unwrap();
        assert!(json.contains("\"rect\""));

        let mut other = SceneModel::new();
        let ids = other.load_json(&json).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(other.records(), scene.records());

        assert!(other.load_json("not json").is_err());

        let rebuilt = SceneModel::from_json(&json).unwrap();
        assert_eq!(rebuilt.len(), 2);
    }
}

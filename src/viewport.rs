//! Mapping between device pixels and scene coordinates under zoom.
//!
//! Positions are converted in a fixed order: device → widget-local → scene.
//! Shape coordinates never change with zoom; only this transform does, which
//! is why every interactive handler works on scene positions.

use crate::constants::{DEFAULT_VIEW_SIZE, MIN_HANDLE_ZOOM, MIN_SCALE};
use crate::model::{Point, Rect};

/// Zoom and translation applied to the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Scale factor (1.0 = 100%)
    scale: f32,
    /// Widget-space position of the scene origin
    translation: (f32, f32),
    /// Device-space position of the widget's top-left corner
    widget_origin: Point,
    /// Widget size in device pixels
    view_size: (f32, f32),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: (0.0, 0.0),
            widget_origin: Point::default(),
            view_size: DEFAULT_VIEW_SIZE,
        }
    }
}

impl Viewport {
    pub fn new(view_width: f32, view_height: f32) -> Self {
        Self {
            view_size: (view_width, view_height),
            ..Self::default()
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current translation (pan offset) in widget pixels.
    pub fn pan(&self) -> (f32, f32) {
        self.translation
    }

    pub fn view_size(&self) -> (f32, f32) {
        self.view_size
    }

    pub fn set_view_size(&mut self, width: f32, height: f32) {
        self.view_size = (width, height);
    }

    pub fn widget_origin(&self) -> Point {
        self.widget_origin
    }

    /// Where the widget sits on the device surface.
    pub fn set_widget_origin(&mut self, origin: Point) {
        self.widget_origin = origin;
    }

    /// Back to identity: scale 1, no translation.
    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.translation = (0.0, 0.0);
        log::debug!("Viewport reset to identity");
    }

    /// Post-multiply the current scale by `factor`.
    ///
    /// Non-positive or non-finite factors are ignored.
    pub fn scale_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            log::warn!("Ignoring invalid zoom factor {}", factor);
            return;
        }
        self.scale = (self.scale * factor).max(MIN_SCALE);
    }

    /// Translate so that `scene_point` is drawn at the widget center.
    pub fn center_on(&mut self, scene_point: Point) {
        let cx = self.view_size.0 / 2.0;
        let cy = self.view_size.1 / 2.0;
        self.translation = (cx - scene_point.x * self.scale, cy - scene_point.y * self.scale);
    }

    /// Scale by `factor`, then recenter on `scene_point`.
    pub fn zoom_at(&mut self, factor: f32, scene_point: Point) {
        self.scale_by(factor);
        self.center_on(scene_point);
        log::debug!(
            "Zoom x{:.3} -> scale {:.3}, centered on ({:.1}, {:.1})",
            factor,
            self.scale,
            scene_point.x,
            scene_point.y
        );
    }

    pub fn device_to_widget(&self, device: Point) -> Point {
        Point::new(device.x - self.widget_origin.x, device.y - self.widget_origin.y)
    }

    pub fn widget_to_scene(&self, widget: Point) -> Point {
        Point::new(
            (widget.x - self.translation.0) / self.scale,
            (widget.y - self.translation.1) / self.scale,
        )
    }

    pub fn scene_to_widget(&self, scene: Point) -> Point {
        Point::new(
            scene.x * self.scale + self.translation.0,
            scene.y * self.scale + self.translation.1,
        )
    }

    /// Map a device position all the way to scene space.
    pub fn device_to_scene(&self, device: Point) -> Point {
        self.widget_to_scene(self.device_to_widget(device))
    }

    pub fn scene_to_device(&self, scene: Point) -> Point {
        let w = self.scene_to_widget(scene);
        Point::new(w.x + self.widget_origin.x, w.y + self.widget_origin.y)
    }

    /// Convert a widget-space distance to scene units.
    ///
    /// The scale is clamped to `MIN_HANDLE_ZOOM` so distances stay bounded
    /// when zoomed far out.
    pub fn widget_dist_to_scene(&self, dist: f32) -> f32 {
        dist / self.scale.max(MIN_HANDLE_ZOOM)
    }

    /// The part of the scene currently visible in the widget.
    pub fn visible_scene_rect(&self) -> Rect {
        let top_left = self.widget_to_scene(Point::new(0.0, 0.0));
        let bottom_right = self.widget_to_scene(Point::new(self.view_size.0, self.view_size.1));
        Rect::from_corners(top_left, bottom_right)
    }
}

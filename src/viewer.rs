//! The embeddable viewer: scene, tools and viewport behind one handle.
//!
//! The host forwards pointer and key events and applies the returned
//! [`Action`]s (repaint, cursor change, toolbar update).

use ndarray::{ArrayD, ArrayViewD};

use crate::config::ViewerConfig;
use crate::constants::DEFAULT_TEXT_COLOR;
use crate::error::ViewerError;
use crate::input::{Action, CursorHint, KeyEvent, PointerEvent};
use crate::model::{Point, RoiId, RoiKind, RoiShape};
use crate::scene::{RoiMatrix, SceneModel};
use crate::tool::{Tool, ToolController};
use crate::viewport::Viewport;

/// Image viewer with interactive ROI editing.
#[derive(Debug, Clone)]
pub struct ImageViewer {
    scene: SceneModel,
    tools: ToolController,
    viewport: Viewport,
    config: ViewerConfig,
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageViewer {
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        let prefs = &config.preferences;
        let mut scene = SceneModel::new();
        scene.set_keep_empty_rois(prefs.keep_empty_rois);
        let tools = ToolController::new(
            config.keybindings.clone(),
            prefs.zoom_step,
            prefs.handle_size,
        );
        Self {
            scene,
            tools,
            viewport: Viewport::default(),
            config,
        }
    }

    /// Apply a new configuration. Scene contents and the active tool are kept.
    pub fn set_config(&mut self, config: ViewerConfig) {
        let prefs = &config.preferences;
        self.scene.set_keep_empty_rois(prefs.keep_empty_rois);
        self.tools.set_zoom_step(prefs.zoom_step);
        self.tools.set_handle_size(prefs.handle_size);
        self.tools.set_bindings(config.keybindings.clone());
        log::debug!("Configuration applied");
        self.config = config;
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn active_tool(&self) -> Tool {
        self.tools.active_tool()
    }

    pub fn cursor(&self) -> CursorHint {
        self.tools.cursor()
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.tools.set_tool(tool, &mut self.scene)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Action> {
        self.tools
            .handle_pointer(event, &mut self.scene, &mut self.viewport)
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> Vec<Action> {
        self.tools
            .handle_key(event, &mut self.scene, &mut self.viewport)
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Reset zoom and move the image and text back to the origin.
    pub fn fit(&mut self) -> Vec<Action> {
        self.tools.fit(&mut self.scene, &mut self.viewport)
    }

    /// The widget was resized: refit and redraw the image for the new size.
    pub fn resize(&mut self, width: f32, height: f32) -> Vec<Action> {
        log::debug!("View resized to {:.0}x{:.0}", width, height);
        self.viewport.set_view_size(width, height);
        self.scene.image_mut().refresh((width, height));
        self.fit()
    }

    /// Where the widget sits on the device surface.
    pub fn set_widget_origin(&mut self, x: f32, y: f32) {
        self.viewport.set_widget_origin(Point::new(x, y));
    }

    pub fn show_toolbar(&mut self, show: bool) {
        self.config.preferences.show_toolbar = show;
    }

    pub fn toolbar_visible(&self) -> bool {
        self.config.preferences.show_toolbar
    }

    // ========================================================================
    // Image and text
    // ========================================================================

    /// Display a grayscale `(h, w)` or BGR `(h, w, 3)` image.
    pub fn set_image(&mut self, array: ArrayViewD<'_, u8>) -> Result<(), ViewerError> {
        let view_size = self.viewport.view_size();
        self.scene.image_mut().set_image(array, view_size)
    }

    /// The array last passed to [`ImageViewer::set_image`].
    pub fn image(&self) -> Option<&ArrayD<u8>> {
        self.scene.image().source()
    }

    /// Add a label in the default text color.
    pub fn add_text(&mut self, name: &str, text: &str, x: f32, y: f32) {
        self.add_text_colored(name, text, DEFAULT_TEXT_COLOR, x, y);
    }

    pub fn add_text_colored(&mut self, name: &str, text: &str, color: [u8; 3], x: f32, y: f32) {
        self.scene
            .texts_mut()
            .add(name, text, color, Point::new(x, y));
    }

    pub fn update_text(&mut self, name: &str, text: &str) -> Result<(), ViewerError> {
        self.scene.texts_mut().update(name, text)
    }

    pub fn remove_text(&mut self, name: &str) -> Result<(), ViewerError> {
        self.scene.texts_mut().remove(name).map(|_| ())
    }

    // ========================================================================
    // ROIs
    // ========================================================================

    /// Add a ROI. It accepts input only while the select tool is active.
    pub fn add_roi(&mut self, kind: RoiKind, x: f32, y: f32, width: f32, height: f32) -> RoiId {
        let id = self.scene.add_roi(kind, x, y, width, height);
        self.scene
            .set_roi_mutable(id, self.tools.active_tool() == Tool::Select);
        id
    }

    /// Add a grid of ROIs, see [`RoiMatrix`].
    pub fn add_roi_matrix(&mut self, kind: RoiKind, matrix: &RoiMatrix) -> Vec<RoiId> {
        let mutable = self.tools.active_tool() == Tool::Select;
        let ids = self.scene.add_roi_matrix(kind, matrix);
        for id in &ids {
            self.scene.set_roi_mutable(*id, mutable);
        }
        ids
    }

    pub fn roi(&self, id: RoiId) -> Option<&RoiShape> {
        self.scene.get(id)
    }

    pub fn rois(&self) -> impl Iterator<Item = &RoiShape> {
        self.scene.shapes()
    }

    pub fn remove_roi(&mut self, id: RoiId) -> bool {
        self.scene.remove_roi(id).is_some()
    }

    pub fn remove_rois(&mut self, ids: impl IntoIterator<Item = RoiId>) -> usize {
        self.scene.remove_rois(ids)
    }

    /// Remove every ROI.
    pub fn clear(&mut self) {
        self.scene.clear();
        log::info!("Cleared all ROIs");
    }

    pub fn rois_to_json(&self) -> Result<String, ViewerError> {
        self.scene.to_json()
    }

    /// Add ROIs from JSON produced by [`ImageViewer::rois_to_json`].
    pub fn load_rois_json(&mut self, json: &str) -> Result<Vec<RoiId>, ViewerError> {
        let ids = self.scene.load_json(json)?;
        let mutable = self.tools.active_tool() == Tool::Select;
        for id in &ids {
            self.scene.set_roi_mutable(*id, mutable);
        }
        Ok(ids)
    }
}

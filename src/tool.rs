//! Interaction tools and the controller that routes input to them.
//!
//! Exactly one tool is active. Holding the temporary-pan key switches to
//! [`Tool::Pan`] and releasing it restores whatever tool was active before.

use serde::{Deserialize, Serialize};

use crate::input::{Action, CursorHint, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
use crate::keybindings::KeyBindings;
use crate::model::{Point, RoiKind};
use crate::scene::SceneModel;
use crate::viewport::Viewport;

/// The interaction tool receiving pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    /// Select, move, resize and duplicate shapes
    #[default]
    Select,
    /// Draw rectangles
    DrawRect,
    /// Draw ellipses
    DrawEllipse,
    /// Click to zoom in, with the zoom-out modifier to zoom out
    Zoom,
    /// Drag to move everything in the scene
    Pan,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::DrawRect => "Rectangle",
            Tool::DrawEllipse => "Ellipse",
            Tool::Zoom => "Zoom",
            Tool::Pan => "Pan",
        }
    }

    pub fn all() -> &'static [Tool] {
        &[
            Tool::Select,
            Tool::DrawRect,
            Tool::DrawEllipse,
            Tool::Zoom,
            Tool::Pan,
        ]
    }

    /// The shape kind a drawing tool creates.
    pub fn draws(&self) -> Option<RoiKind> {
        match self {
            Tool::DrawRect => Some(RoiKind::Rect),
            Tool::DrawEllipse => Some(RoiKind::Ellipse),
            _ => None,
        }
    }
}

/// Tool state machine: active tool, temporary-pan memory and cursor.
#[derive(Debug, Clone)]
pub struct ToolController {
    active: Tool,
    /// Tool to restore when the temporary-pan key is released
    previous: Option<Tool>,
    temporary_pan: bool,
    zoom_out_held: bool,
    cursor: CursorHint,
    bindings: KeyBindings,
    zoom_step: f32,
    handle_size: f32,
}

impl ToolController {
    pub fn new(bindings: KeyBindings, zoom_step: f32, handle_size: f32) -> Self {
        Self {
            active: Tool::Select,
            previous: None,
            temporary_pan: false,
            zoom_out_held: false,
            cursor: CursorHint::Arrow,
            bindings,
            zoom_step,
            handle_size,
        }
    }

    pub fn active_tool(&self) -> Tool {
        self.active
    }

    /// Tool that will be restored when temporary pan ends.
    pub fn previous_tool(&self) -> Option<Tool> {
        self.previous
    }

    pub fn is_temporary_pan(&self) -> bool {
        self.temporary_pan
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    pub fn set_zoom_step(&mut self, step: f32) {
        self.zoom_step = step;
    }

    pub fn set_handle_size(&mut self, size: f32) {
        self.handle_size = size;
    }

    /// Handle grab size in scene units, constant on screen at every zoom.
    pub fn handle_hit_size(&self, viewport: &Viewport) -> f32 {
        viewport.widget_dist_to_scene(self.handle_size)
    }

    /// Select a tool.
    ///
    /// While temporary pan is held the choice is remembered and applied on release.
    pub fn set_tool(&mut self, tool: Tool, scene: &mut SceneModel) -> Vec<Action> {
        if self.temporary_pan {
            log::debug!("Temporary pan active, {} tool applied on release", tool.name());
            self.previous = Some(tool);
            return Vec::new();
        }
        self.switch_to(tool, scene)
    }

    fn switch_to(&mut self, tool: Tool, scene: &mut SceneModel) -> Vec<Action> {
        if tool == self.active {
            return Vec::new();
        }
        scene.cancel_gesture();
        self.active = tool;
        scene.set_all_mutable(tool == Tool::Select);
        log::info!("Tool changed to {}", tool.name());

        let mut actions = vec![Action::ToolChanged(tool), Action::Redraw];
        let cursor = self.idle_cursor();
        actions.extend(self.set_cursor(cursor));
        actions
    }

    fn idle_cursor(&self) -> CursorHint {
        match self.active {
            Tool::Select => CursorHint::Arrow,
            Tool::DrawRect | Tool::DrawEllipse => CursorHint::Crosshair,
            Tool::Pan => CursorHint::OpenHand,
            Tool::Zoom if self.zoom_out_held => CursorHint::ZoomOut,
            Tool::Zoom => CursorHint::ZoomIn,
        }
    }

    fn set_cursor(&mut self, cursor: CursorHint) -> Option<Action> {
        if cursor == self.cursor {
            return None;
        }
        self.cursor = cursor;
        Some(Action::SetCursor(cursor))
    }

    /// Reset the viewport to identity and move the image and text back to the origin.
    pub fn fit(&mut self, scene: &mut SceneModel, viewport: &mut Viewport) -> Vec<Action> {
        viewport.reset();
        scene.reset_layers();
        log::debug!("Fit view");
        vec![Action::Redraw]
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn handle_key(
        &mut self,
        event: KeyEvent,
        scene: &mut SceneModel,
        viewport: &mut Viewport,
    ) -> Vec<Action> {
        if event.auto_repeat {
            return Vec::new();
        }
        let key = event.key;

        if self.bindings.is_temporary_pan(key) {
            return if event.pressed {
                self.begin_temporary_pan(scene)
            } else {
                self.end_temporary_pan(scene)
            };
        }

        if key == self.bindings.zoom_out_modifier.key() {
            self.zoom_out_held = event.pressed;
            let cursor = self.idle_cursor();
            return self.set_cursor(cursor).into_iter().collect();
        }

        if !event.pressed {
            return Vec::new();
        }

        if self.bindings.is_delete(key) {
            let deleted = self.active == Tool::Select
                && scene.gesture().is_idle()
                && scene.delete_selected() > 0;
            return if deleted { vec![Action::Redraw] } else { Vec::new() };
        }

        if self.bindings.is_fit(key) {
            return self.fit(scene, viewport);
        }

        if let Some(tool) = self.bindings.tool_for_key(key) {
            return self.set_tool(tool, scene);
        }

        Vec::new()
    }

    fn begin_temporary_pan(&mut self, scene: &mut SceneModel) -> Vec<Action> {
        // Only the first press edge records the tool to restore.
        if self.temporary_pan {
            return Vec::new();
        }
        let from = self.active;
        self.previous = Some(from);
        let actions = self.switch_to(Tool::Pan, scene);
        self.temporary_pan = true;
        log::debug!("Temporary pan started from {}", from.name());
        actions
    }

    fn end_temporary_pan(&mut self, scene: &mut SceneModel) -> Vec<Action> {
        if !self.temporary_pan {
            return Vec::new();
        }
        self.temporary_pan = false;
        let restore = self.previous.take().unwrap_or_default();
        log::debug!("Temporary pan ended, restoring {}", restore.name());
        self.switch_to(restore, scene)
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        scene: &mut SceneModel,
        viewport: &mut Viewport,
    ) -> Vec<Action> {
        let pos = viewport.device_to_scene(event.position);
        log::trace!(
            "{:?} at device ({:.1}, {:.1}) -> scene ({:.1}, {:.1})",
            event.kind,
            event.position.x,
            event.position.y,
            pos.x,
            pos.y
        );

        // A press while a gesture is still open means the release was lost.
        if event.kind == PointerEventKind::Press && !scene.gesture().is_idle() {
            log::warn!("Press during {:?}, closing previous gesture", scene.gesture());
            scene.cancel_gesture();
        }

        let was_active = !scene.gesture().is_idle();
        let mut actions = Vec::new();

        match self.active {
            Tool::Select => self.select_event(event, pos, scene, viewport, &mut actions),
            Tool::DrawRect | Tool::DrawEllipse => match event.kind {
                PointerEventKind::Press => {
                    if let Some(kind) = self.active.draws() {
                        scene.begin_draw(kind, pos);
                    }
                }
                PointerEventKind::Move => scene.update_draw(pos),
                PointerEventKind::Release => {
                    scene.end_draw();
                }
            },
            Tool::Pan => match event.kind {
                PointerEventKind::Press => scene.begin_pan(pos),
                PointerEventKind::Move => scene.update_pan(pos),
                PointerEventKind::Release => scene.end_pan(),
            },
            Tool::Zoom => self.zoom_event(event, pos, viewport, &mut actions),
        }

        if was_active || !scene.gesture().is_idle() {
            actions.push(Action::Redraw);
        }
        actions
    }

    fn select_event(
        &mut self,
        event: PointerEvent,
        pos: Point,
        scene: &mut SceneModel,
        viewport: &Viewport,
        actions: &mut Vec<Action>,
    ) {
        let hit_size = self.handle_hit_size(viewport);
        match event.kind {
            PointerEventKind::Press => {
                let duplicate = event.modifiers.holds(self.bindings.duplicate_modifier);
                scene.select_press(pos, duplicate, hit_size);
            }
            PointerEventKind::Move => {
                if scene.gesture().is_idle() {
                    let cursor = scene.hover_cursor(pos, hit_size);
                    actions.extend(self.set_cursor(cursor));
                } else {
                    scene.select_move(pos);
                }
            }
            PointerEventKind::Release => scene.select_release(pos),
        }
    }

    fn zoom_event(
        &mut self,
        event: PointerEvent,
        pos: Point,
        viewport: &mut Viewport,
        actions: &mut Vec<Action>,
    ) {
        let zoom_out = self.zoom_out_from(event.modifiers);
        match event.kind {
            PointerEventKind::Press => {}
            PointerEventKind::Move => {
                let cursor = self.idle_cursor();
                actions.extend(self.set_cursor(cursor));
            }
            PointerEventKind::Release => {
                let factor = if zoom_out {
                    1.0 / self.zoom_step
                } else {
                    self.zoom_step
                };
                viewport.zoom_at(factor, pos);
                actions.push(Action::Redraw);
            }
        }
    }

    /// Track the zoom-out modifier from pointer modifiers as well as key events.
    fn zoom_out_from(&mut self, modifiers: Modifiers) -> bool {
        self.zoom_out_held = modifiers.holds(self.bindings.zoom_out_modifier);
        self.zoom_out_held
    }
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new(
            KeyBindings::default(),
            crate::constants::ZOOM_STEP,
            crate::constants::HANDLE_SIZE,
        )
    }
}

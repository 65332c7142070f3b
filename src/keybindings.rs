//! Customizable keybindings for the viewer.
//!
//! Tool hotkeys, the temporary-pan key, the delete key and the modifier
//! roles used by the select and zoom tools.

use serde::{Deserialize, Serialize};

use crate::input::{Key, ModifierKey};
use crate::tool::Tool;

/// Keybinding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Hotkey for the Select tool
    pub tool_select: Key,
    /// Hotkey for the Rectangle tool
    pub tool_rect: Key,
    /// Hotkey for the Ellipse tool
    pub tool_ellipse: Key,
    /// Hotkey for the Zoom tool
    pub tool_zoom: Key,
    /// Hotkey for the Pan tool
    pub tool_pan: Key,
    /// Fit image and text back to the view
    pub fit: Key,
    /// Held to pan temporarily, restoring the previous tool on release
    pub temporary_pan: Key,
    /// Deletes the current selection
    pub delete: Key,
    /// Held while pressing to duplicate the selection
    pub duplicate_modifier: ModifierKey,
    /// Held while clicking with the zoom tool to zoom out
    pub zoom_out_modifier: ModifierKey,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tool_select: Key::Char('a'),
            tool_rect: Key::Char('r'),
            tool_ellipse: Key::Char('o'),
            tool_zoom: Key::Char('z'),
            tool_pan: Key::Char('p'),
            fit: Key::Char('f'),
            temporary_pan: Key::Space,
            delete: Key::Delete,
            duplicate_modifier: ModifierKey::Ctrl,
            zoom_out_modifier: ModifierKey::Alt,
        }
    }
}

/// Character keys compare case-insensitively.
fn same_key(a: Key, b: Key) -> bool {
    match (a, b) {
        (Key::Char(x), Key::Char(y)) => x.eq_ignore_ascii_case(&y),
        _ => a == b,
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the tool that corresponds to a key press, if any.
    pub fn tool_for_key(&self, key: Key) -> Option<Tool> {
        Tool::all()
            .iter()
            .copied()
            .find(|tool| same_key(key, self.key_for_tool(*tool)))
    }

    pub fn key_for_tool(&self, tool: Tool) -> Key {
        match tool {
            Tool::Select => self.tool_select,
            Tool::DrawRect => self.tool_rect,
            Tool::DrawEllipse => self.tool_ellipse,
            Tool::Zoom => self.tool_zoom,
            Tool::Pan => self.tool_pan,
        }
    }

    pub fn set_tool_key(&mut self, tool: Tool, key: Key) {
        match tool {
            Tool::Select => self.tool_select = key,
            Tool::DrawRect => self.tool_rect = key,
            Tool::DrawEllipse => self.tool_ellipse = key,
            Tool::Zoom => self.tool_zoom = key,
            Tool::Pan => self.tool_pan = key,
        }
    }

    pub fn is_fit(&self, key: Key) -> bool {
        same_key(key, self.fit)
    }

    pub fn is_temporary_pan(&self, key: Key) -> bool {
        same_key(key, self.temporary_pan)
    }

    /// Delete and Backspace both delete when Delete is bound.
    pub fn is_delete(&self, key: Key) -> bool {
        same_key(key, self.delete) || (self.delete == Key::Delete && key == Key::Backspace)
    }
}

//! Browser bindings.
//!
//! [`WasmEditor`] wraps an [`AnnotationEditor`] for JavaScript hosts. Methods
//! that change state return the resulting effects as a JSON array string.

use wasm_bindgen::prelude::*;

use crate::config::AppConfig;
use crate::editor::AnnotationEditor;
use crate::event::{Effect, InputEvent, Key, Modifiers};
use crate::geometry::ContainerRect;
use crate::keybindings::key_to_string;
use crate::model::{AnnotationId, AnnotationTool, ColorRole, FontWeight, Palette, Point};
use crate::zoom_math::ViewTransform;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load_or_default();
    let level = config.preferences.log_level.to_level_filter();
    if let Some(level) = level.to_level() {
        // A second init (hot reload) fails harmlessly.
        let _ = console_log::init_with_level(level);
    }
    log::info!("{} overlay starting", config.app_name);
}

fn effects_json(effects: &[Effect]) -> String {
    match serde_json::to_string(effects) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize effects: {}", e);
            "[]".to_string()
        }
    }
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Annotation overlay handle exported to JavaScript.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: AnnotationEditor,
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmEditor {
    fn dispatch(&mut self, event: InputEvent) -> String {
        effects_json(&self.editor.handle_event(event))
    }
}

fn parse_tool(tool: &str) -> Result<AnnotationTool, JsValue> {
    AnnotationTool::from_id(tool).ok_or_else(|| to_js_error(format!("Unknown tool: {}", tool)))
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor using the configuration saved in localStorage.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmEditor {
        WasmEditor {
            editor: AnnotationEditor::new(&AppConfig::load_or_default()),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerDown { x, y })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerMove { x, y })
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::PointerUp { x, y })
    }

    pub fn double_click(&mut self, x: f32, y: f32) -> String {
        self.dispatch(InputEvent::DoubleClick { x, y })
    }

    /// Forward a `keydown`. Keys outside the supported set are ignored.
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        let Some(key) = Key::from_dom(key) else {
            return effects_json(&[]);
        };
        self.dispatch(InputEvent::KeyDown {
            key,
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    pub fn edit_input(&mut self, text: String) -> String {
        self.dispatch(InputEvent::EditInput { text })
    }

    pub fn edit_blur(&mut self) -> String {
        self.dispatch(InputEvent::EditBlur)
    }

    /// Switch tools by id (`select`, `arrow`, `text`, `rect`, `circle`, `line`).
    pub fn set_tool(&mut self, tool: &str) -> Result<String, JsValue> {
        let tool = parse_tool(tool)?;
        Ok(effects_json(&self.editor.set_tool(tool)))
    }

    pub fn tool(&self) -> String {
        self.editor.tool().name().to_string()
    }

    pub fn set_view(&mut self, x: f32, y: f32, scale: f32) -> String {
        effects_json(
            &self
                .editor
                .set_view(ViewTransform::new(Point::new(x, y), scale)),
        )
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) -> String {
        effects_json(&self.editor.pan_by(dx, dy))
    }

    pub fn zoom_in(&mut self) -> String {
        effects_json(&self.editor.zoom_in())
    }

    pub fn zoom_out(&mut self) -> String {
        effects_json(&self.editor.zoom_out())
    }

    /// Wheel zoom: scale by `factor` keeping the point under the cursor fixed.
    pub fn zoom_at(&mut self, client_x: f32, client_y: f32, factor: f32) -> String {
        effects_json(&self.editor.zoom_at(client_x, client_y, factor))
    }

    /// Measure the overlay container. Call on mount and on resize.
    pub fn measure_container(&mut self, element: &web_sys::Element) -> String {
        let rect = element.get_bounding_client_rect();
        let container = ContainerRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        );
        effects_json(&self.editor.set_container(Some(container)))
    }

    pub fn unmount_container(&mut self) -> String {
        effects_json(&self.editor.set_container(None))
    }

    /// Select an annotation by raw id, or clear the selection with `undefined`.
    pub fn select(&mut self, id: Option<f64>) -> String {
        let id = id.map(|raw| AnnotationId::new(raw as u64));
        effects_json(&self.editor.select(id))
    }

    pub fn selected(&self) -> Option<f64> {
        self.editor.selected().map(|id| id.get() as f64)
    }

    pub fn set_color(&mut self, color: &str) -> String {
        effects_json(&self.editor.set_color(color))
    }

    /// Apply a palette swatch (`primary`, `secondary` or `text`).
    pub fn set_palette_color(&mut self, role: &str) -> Result<String, JsValue> {
        let role = match role {
            "primary" => ColorRole::Primary,
            "secondary" => ColorRole::Secondary,
            "text" => ColorRole::Text,
            other => return Err(to_js_error(format!("Unknown palette color: {}", other))),
        };
        Ok(effects_json(&self.editor.set_palette_color(role)))
    }

    pub fn set_stroke_width(&mut self, width: f32) -> String {
        effects_json(&self.editor.set_stroke_width(width))
    }

    pub fn set_font_size(&mut self, size: f32) -> String {
        effects_json(&self.editor.set_font_size(size))
    }

    pub fn set_bold(&mut self, bold: bool) -> String {
        let weight = if bold {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        effects_json(&self.editor.set_font_weight(weight))
    }

    pub fn set_font_family(&mut self, family: Option<String>) -> String {
        effects_json(&self.editor.set_font_family(family))
    }

    pub fn duplicate_selected(&mut self) -> String {
        effects_json(&self.editor.duplicate_selected())
    }

    pub fn delete_selected(&mut self) -> String {
        effects_json(&self.editor.delete_selected())
    }

    pub fn clear(&mut self) -> String {
        effects_json(&self.editor.clear())
    }

    pub fn undo(&mut self) -> String {
        effects_json(&self.editor.undo())
    }

    pub fn redo(&mut self) -> String {
        effects_json(&self.editor.redo())
    }

    /// Apply a theme palette given as `{"primary", "secondary", "text"}` JSON.
    pub fn apply_palette(&mut self, palette_json: &str) -> Result<usize, JsValue> {
        let palette: Palette = serde_json::from_str(palette_json).map_err(to_js_error)?;
        Ok(self.editor.apply_palette(palette))
    }

    pub fn annotation_count(&self) -> usize {
        self.editor.annotation_count()
    }

    /// Register `callback(count)`, called after every structural change.
    pub fn on_count_change(&mut self, callback: js_sys::Function) {
        self.editor.set_count_observer(move |count| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from(count as u32)) {
                log::warn!("Count callback failed: {:?}", e);
            }
        });
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.editor.clear_dirty();
    }

    pub fn render_svg(&self, include_handles: bool) -> String {
        self.editor.render_svg(include_handles)
    }

    /// The context toolbar for the current selection as JSON, or `undefined`.
    pub fn toolbar_json(&self) -> Result<Option<String>, JsValue> {
        self.editor
            .toolbar()
            .map(|toolbar| serde_json::to_string(&toolbar).map_err(to_js_error))
            .transpose()
    }

    pub fn to_snapshot_json(&self) -> Result<String, JsValue> {
        self.editor.to_snapshot_json().map_err(to_js_error)
    }

    pub fn load_snapshot_json(&mut self, json: &str) -> Result<String, JsValue> {
        let effects = self.editor.load_snapshot_json(json).map_err(to_js_error)?;
        Ok(effects_json(&effects))
    }

    /// Display label of a tool's hotkey, e.g. `R`.
    pub fn tool_key(&self, tool: &str) -> Result<String, JsValue> {
        let tool = parse_tool(tool)?;
        Ok(key_to_string(self.editor.keybindings().key_for_tool(tool)))
    }

    /// Rebind a tool hotkey. Throws if the key is unsupported or taken.
    pub fn set_tool_key(&mut self, tool: &str, key: &str) -> Result<(), JsValue> {
        let tool = parse_tool(tool)?;
        let key = Key::from_dom(key)
            .ok_or_else(|| to_js_error(format!("Unsupported key: {}", key)))?;
        self.editor.set_tool_key(tool, key).map_err(to_js_error)
    }

    /// Persist the current key bindings to localStorage.
    pub fn save_config(&self) -> Result<(), JsValue> {
        let mut config = AppConfig::load_or_default();
        config.keybindings = self.editor.keybindings().clone();
        config.save_to_local_storage().map_err(to_js_error)
    }
}

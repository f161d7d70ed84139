//! The annotation editor.
//!
//! [`AnnotationEditor`] ties the [`Document`] (annotations plus history) to the
//! [`InteractionController`] and exposes the commands a host toolbar needs.
//! All methods that change something return the [`Effect`]s they caused.

mod document;

#[cfg(test)]
mod tests;

pub use document::Document;

use crate::config::AppConfig;
use crate::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::controller::{InteractionController, InteractionState, TextEdit};
use crate::event::{Effect, InputEvent, Key};
use crate::geometry::ContainerRect;
use crate::keybindings::{KeyBindingError, KeyBindings, key_to_string};
use crate::model::{
    Annotation, AnnotationId, AnnotationPatch, AnnotationTool, ColorRole, FontWeight, Palette,
    Point, TextPatch,
};
use crate::render::{ContextToolbar, Overlay, OverlayInput, SvgOptions, render_overlay, to_svg};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::store::AnnotationStore;
use crate::undo::{UndoConfig, UndoStack};
use crate::zoom_math::ViewTransform;

/// A diagram's annotation layer: data, history and interaction state.
#[derive(Debug)]
pub struct AnnotationEditor {
    document: Document,
    controller: InteractionController,
}

impl Default for AnnotationEditor {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AnnotationEditor {
    pub fn new(config: &AppConfig) -> Self {
        let history = UndoStack::with_config(UndoConfig {
            max_history: config.preferences.undo_history,
        });
        Self {
            document: Document::new(AnnotationStore::new(), history),
            controller: InteractionController::new(
                config.preferences.to_tool_style(),
                config.keybindings.clone(),
            ),
        }
    }

    /// Feed one input event through the interaction state machine.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Effect> {
        self.controller.handle_event(&mut self.document, event)
    }

    /// Register the callback that receives the annotation count after every
    /// structural change.
    pub fn set_count_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.document.store.set_count_observer(observer);
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn store(&self) -> &AnnotationStore {
        &self.document.store
    }

    pub fn history(&self) -> &UndoStack {
        &self.document.history
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.document.store.annotations()
    }

    pub fn annotation_count(&self) -> usize {
        self.document.store.len()
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.document.store.get(id)
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.document.store.selected()
    }

    pub fn tool(&self) -> AnnotationTool {
        self.controller.tool()
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn edit(&self) -> Option<&TextEdit> {
        self.controller.edit()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.store.is_dirty()
    }

    /// Call after the host has redrawn the overlay.
    pub fn clear_dirty(&mut self) {
        self.document.store.clear_dirty();
    }

    // ------------------------------------------------------------------------
    // Host geometry
    // ------------------------------------------------------------------------

    pub fn set_view(&mut self, view: ViewTransform) -> Vec<Effect> {
        self.handle_event(InputEvent::ViewChanged { view })
    }

    pub fn set_container(&mut self, rect: Option<ContainerRect>) -> Vec<Effect> {
        self.handle_event(InputEvent::ContainerChanged { rect })
    }

    pub fn view(&self) -> &ViewTransform {
        self.controller.view()
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) -> Vec<Effect> {
        let view = self.controller.view().pan_by(dx, dy);
        self.set_view(view)
    }

    pub fn zoom_in(&mut self) -> Vec<Effect> {
        let view = self.controller.view().zoom_in(ZOOM_STEP, MAX_ZOOM);
        self.set_view(view)
    }

    pub fn zoom_out(&mut self) -> Vec<Effect> {
        let view = self.controller.view().zoom_out(ZOOM_STEP, MIN_ZOOM);
        self.set_view(view)
    }

    /// Zoom by `factor` about a client-space cursor (wheel zoom). The canvas
    /// point under the cursor stays put.
    ///
    /// Ignored until the container is measured, or for a factor that is not
    /// a positive number.
    pub fn zoom_at(&mut self, client_x: f32, client_y: f32, factor: f32) -> Vec<Effect> {
        let Some(container) = self.controller.container().copied() else {
            return Vec::new();
        };
        let view = *self.controller.view();
        if !(factor.is_finite() && factor > 0.0) || !view.is_invertible() {
            return Vec::new();
        }

        let new_scale = (view.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let cursor = Point::new(client_x - container.left, client_y - container.top);
        self.set_view(view.zoom_to_cursor(new_scale, cursor, container.local_center()))
    }

    // ------------------------------------------------------------------------
    // Toolbar commands
    // ------------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: AnnotationTool) -> Vec<Effect> {
        self.handle_event(InputEvent::SelectTool { tool })
    }

    pub fn select(&mut self, id: Option<AnnotationId>) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller.select(&mut self.document, id, &mut effects);
        effects
    }

    fn modify_selected(&mut self, patch: AnnotationPatch) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(id) = self.document.store.selected()
            && self.document.modify(id, &patch)
        {
            effects.push(Effect::Updated(id));
        }
        effects
    }

    /// Recolor the selected annotation. It stops following the palette.
    pub fn set_color(&mut self, color: &str) -> Vec<Effect> {
        self.modify_selected(AnnotationPatch::color(color))
    }

    /// Recolor the selected annotation from a palette swatch. It keeps
    /// following that entry on theme changes.
    pub fn set_palette_color(&mut self, role: ColorRole) -> Vec<Effect> {
        let Some(color) = self.controller.style().palette.color_for(role) else {
            return Vec::new();
        };
        let patch = AnnotationPatch::themed_color(role, color);
        self.modify_selected(patch)
    }

    pub fn set_stroke_width(&mut self, width: f32) -> Vec<Effect> {
        self.modify_selected(AnnotationPatch::stroke_width(width))
    }

    pub fn set_font_size(&mut self, size: f32) -> Vec<Effect> {
        self.modify_selected(AnnotationPatch::text(TextPatch {
            font_size: Some(size),
            ..Default::default()
        }))
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) -> Vec<Effect> {
        self.modify_selected(AnnotationPatch::text(TextPatch {
            font_weight: Some(weight),
            ..Default::default()
        }))
    }

    /// Set the font family of the selected text; `None` resets it to the host font.
    pub fn set_font_family(&mut self, family: Option<String>) -> Vec<Effect> {
        self.modify_selected(AnnotationPatch::text(TextPatch {
            font_family: Some(family),
            ..Default::default()
        }))
    }

    pub fn duplicate_selected(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller
            .duplicate_selected(&mut self.document, &mut effects);
        effects
    }

    pub fn delete_selected(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller
            .delete_selected(&mut self.document, &mut effects);
        effects
    }

    /// Remove every annotation as one undo step.
    pub fn clear(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller.reset(&mut self.document, &mut effects);
        if self.document.clear() > 0 {
            effects.push(Effect::Cleared);
        }
        effects
    }

    pub fn undo(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller.undo(&mut self.document, &mut effects);
        effects
    }

    pub fn redo(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.controller.redo(&mut self.document, &mut effects);
        effects
    }

    /// Switch themes: recolor palette-following annotations and use the new
    /// colors for future drawings. Returns how many annotations changed.
    ///
    /// Recoloring is not an undo step.
    pub fn apply_palette(&mut self, palette: Palette) -> usize {
        let changed = self.document.store.apply_palette(&palette);
        self.controller.style_mut().palette = palette;
        changed
    }

    pub fn keybindings(&self) -> &KeyBindings {
        self.controller.keybindings()
    }

    /// Rebind a tool hotkey. A key that already belongs to another tool is
    /// refused and nothing changes.
    pub fn set_tool_key(
        &mut self,
        tool: AnnotationTool,
        key: Key,
    ) -> Result<(), KeyBindingError> {
        let mut keybindings = self.controller.keybindings().clone();
        keybindings.try_set_tool_key(tool, key)?;
        log::debug!("Bound {} to the {} tool", key_to_string(key), tool.name());
        self.controller.set_keybindings(keybindings);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------------

    pub fn to_snapshot_json(&self) -> Result<String, SnapshotError> {
        self.document.store.to_snapshot_json()
    }

    /// Replace all annotations from snapshot JSON.
    ///
    /// Drops any gesture, text edit and the undo history. On error nothing changes.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<Vec<Effect>, SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        let mut effects = Vec::new();
        self.controller.reset(&mut self.document, &mut effects);
        let count = snapshot.annotations.len();
        self.document.store.replace_all(snapshot.annotations);
        self.document.history.clear();
        log::info!("Loaded {} annotations from snapshot", count);
        effects.push(Effect::Loaded(count));
        Ok(effects)
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    pub fn render(&self) -> Overlay {
        render_overlay(&OverlayInput {
            annotations: self.document.store.annotations(),
            selected: self.document.store.selected(),
            tool: self.controller.tool(),
            state: self.controller.state(),
            edit: self.controller.edit(),
            style: self.controller.style(),
            view: self.controller.view(),
        })
    }

    pub fn toolbar(&self) -> Option<ContextToolbar> {
        self.render().toolbar
    }

    /// Render the overlay as SVG placed in the current container (if measured).
    pub fn render_svg(&self, include_handles: bool) -> String {
        to_svg(
            &self.render(),
            &SvgOptions {
                container: self.controller.container(),
                view: *self.controller.view(),
                include_handles,
                title: None,
            },
        )
    }
}

//! Pointer and keyboard state machine for the annotation overlay.
//!
//! [`InteractionController::handle_event`] is the single reducer: it takes an
//! [`InputEvent`], mutates the [`Document`] and reports what changed as
//! [`Effect`]s. Events whose coordinates cannot be mapped into canvas space
//! (container not measured yet) are dropped without touching any state.

use crate::constants::{HANDLE_RADIUS, HIT_TOLERANCE, MIN_DRAW_DISTANCE};
use crate::editor::Document;
use crate::event::{Effect, InputEvent, Key, Modifiers};
use crate::geometry::{ContainerRect, to_canvas};
use crate::handles::{HandleKind, apply_handle_drag, hit_test_handle};
use crate::keybindings::KeyBindings;
use crate::model::{
    Annotation, AnnotationId, AnnotationPatch, AnnotationShape, AnnotationTool, Point, TextPatch,
    ToolStyle,
};
use crate::zoom_math::ViewTransform;

/// What the pointer is currently doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// A drawing tool gesture is in progress.
    Drawing {
        tool: AnnotationTool,
        start: Point,
        current: Point,
    },
    /// An annotation (or one of its handles) is being dragged.
    Dragging {
        id: AnnotationId,
        /// Offset from the annotation's anchor to the point it was grabbed at.
        grab_offset: (f32, f32),
        handle: Option<HandleKind>,
        /// Pointer position of the previous event; moves are applied incrementally.
        last: Point,
        /// The record as it was when the drag began, for the undo step.
        original: Annotation,
    },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::Drawing { .. } => "Drawing",
            InteractionState::Dragging { .. } => "Dragging",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}

/// An inline text edit in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEdit {
    pub id: AnnotationId,
    /// Current content of the edit field; only written to the annotation on commit.
    pub draft: String,
}

/// Owns all transient interaction state: tool, gesture, text edit and the
/// view geometry needed to map pointer events.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    tool: AnnotationTool,
    edit: Option<TextEdit>,
    view: ViewTransform,
    container: Option<ContainerRect>,
    style: ToolStyle,
    keybindings: KeyBindings,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ToolStyle::default(), KeyBindings::default())
    }
}

impl InteractionController {
    pub fn new(style: ToolStyle, keybindings: KeyBindings) -> Self {
        Self {
            state: InteractionState::Idle,
            tool: AnnotationTool::Select,
            edit: None,
            view: ViewTransform::identity(),
            container: None,
            style,
            keybindings,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> AnnotationTool {
        self.tool
    }

    pub fn edit(&self) -> Option<&TextEdit> {
        self.edit.as_ref()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn container(&self) -> Option<&ContainerRect> {
        self.container.as_ref()
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ToolStyle {
        &mut self.style
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn set_keybindings(&mut self, keybindings: KeyBindings) {
        self.keybindings = keybindings;
    }

    /// Map a client-space pointer position into canvas space.
    pub fn to_canvas(&self, client_x: f32, client_y: f32) -> Option<Point> {
        to_canvas(client_x, client_y, self.container.as_ref(), &self.view)
    }

    /// Process one input event.
    pub fn handle_event(&mut self, doc: &mut Document, event: InputEvent) -> Vec<Effect> {
        log::trace!("{:?} in state {}", event, self.state.name());
        let mut effects = Vec::new();
        self.drop_orphaned_edit(doc, &mut effects);
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(doc, x, y, &mut effects),
            InputEvent::PointerMove { x, y } => self.pointer_move(doc, x, y, &mut effects),
            InputEvent::PointerUp { x, y } => self.pointer_up(doc, x, y, &mut effects),
            InputEvent::DoubleClick { x, y } => self.double_click(doc, x, y, &mut effects),
            InputEvent::KeyDown { key, modifiers } => {
                self.key_down(doc, key, modifiers, &mut effects)
            }
            InputEvent::EditInput { text } => {
                if let Some(edit) = self.edit.as_mut() {
                    edit.draft = text;
                    effects.push(Effect::Redraw);
                }
            }
            InputEvent::EditBlur => self.commit_edit(doc, &mut effects),
            InputEvent::SelectTool { tool } => self.set_tool(doc, tool, &mut effects),
            InputEvent::ContainerChanged { rect } => {
                self.container = rect;
            }
            InputEvent::ViewChanged { view } => {
                self.view = view;
                effects.push(Effect::Redraw);
            }
        }
        effects
    }

    // ------------------------------------------------------------------------
    // Pointer handling
    // ------------------------------------------------------------------------

    fn pointer_down(&mut self, doc: &mut Document, x: f32, y: f32, effects: &mut Vec<Effect>) {
        let Some(point) = self.to_canvas(x, y) else {
            log::trace!("PointerDown dropped: no container geometry");
            return;
        };

        // The edit field lives outside the overlay, so any overlay press is a click outside it.
        self.commit_edit(doc, effects);

        if !self.state.is_idle() {
            log::debug!("PointerDown while {}, finishing stale gesture", self.state.name());
            self.cancel_gesture(doc);
        }

        match self.tool {
            AnnotationTool::Select => self.begin_select(doc, point, effects),
            AnnotationTool::Text => {
                let draft = self.style.draft(self.style.text_at(point));
                let id = doc.create(draft);
                effects.push(Effect::Created(id));
                self.set_active_tool(AnnotationTool::Select, effects);
            }
            tool => {
                log::debug!("{}: started at ({:.1}, {:.1})", tool.name(), point.x, point.y);
                self.state = InteractionState::Drawing {
                    tool,
                    start: point,
                    current: point,
                };
                effects.push(Effect::Redraw);
            }
        }
    }

    /// Select-mode press: grab a handle of the selected annotation, or pick
    /// the top-most annotation under the pointer, or deselect.
    fn begin_select(&mut self, doc: &mut Document, point: Point, effects: &mut Vec<Effect>) {
        let handle_radius = self.view.screen_to_canvas_len(HANDLE_RADIUS);
        let tolerance = self.view.screen_to_canvas_len(HIT_TOLERANCE);

        let handle_hit = doc.store.selected_annotation().and_then(|annotation| {
            hit_test_handle(&annotation.shape, &point, handle_radius)
                .map(|handle| (annotation.id, handle))
        });

        let (id, handle) = match handle_hit {
            Some((id, handle)) => (id, Some(handle)),
            None => match doc.store.hit_test(&point, tolerance) {
                Some(id) => (id, None),
                None => {
                    self.select(doc, None, effects);
                    return;
                }
            },
        };

        self.select(doc, Some(id), effects);
        let Some(original) = doc.store.get(id).cloned() else {
            return;
        };
        log::debug!(
            "Dragging annotation {} (handle={})",
            id,
            handle.map(|h| h.name()).unwrap_or("none")
        );
        self.state = InteractionState::Dragging {
            id,
            grab_offset: original.shape.anchor().delta_to(&point),
            handle,
            last: point,
            original,
        };
    }

    fn pointer_move(&mut self, doc: &mut Document, x: f32, y: f32, effects: &mut Vec<Effect>) {
        let Some(point) = self.to_canvas(x, y) else {
            log::trace!("PointerMove dropped: no container geometry");
            return;
        };

        let drag = match &mut self.state {
            InteractionState::Idle => None,
            InteractionState::Drawing { current, .. } => {
                *current = point;
                effects.push(Effect::Redraw);
                None
            }
            InteractionState::Dragging {
                id, handle, last, ..
            } => {
                let (dx, dy) = last.delta_to(&point);
                *last = point;
                Some((*id, *handle, dx, dy))
            }
        };

        let Some((id, handle, dx, dy)) = drag else {
            return;
        };
        let Some(annotation) = doc.store.get(id) else {
            log::debug!("Dragged annotation {} no longer exists", id);
            self.state = InteractionState::Idle;
            return;
        };

        let next = match handle {
            Some(handle) => apply_handle_drag(&annotation.shape, handle, dx, dy),
            None => Some(annotation.shape.translated(dx, dy)),
        };
        if let Some(shape) = next {
            doc.store.update(id, &AnnotationPatch::geometry(&shape));
            effects.push(Effect::Updated(id));
        }
    }

    fn pointer_up(&mut self, doc: &mut Document, x: f32, y: f32, effects: &mut Vec<Effect>) {
        let point = self.to_canvas(x, y);
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => {}
            InteractionState::Drawing {
                tool,
                start,
                current,
            } => {
                let end = point.unwrap_or(current);
                self.finish_draw(doc, tool, start, end, effects);
            }
            InteractionState::Dragging { id, original, .. } => {
                if let Some(current) = doc.store.get(id).cloned() {
                    doc.record_modify(original, current);
                }
                log::debug!("Finished dragging annotation {}", id);
            }
        }
    }

    fn finish_draw(
        &mut self,
        doc: &mut Document,
        tool: AnnotationTool,
        start: Point,
        end: Point,
        effects: &mut Vec<Effect>,
    ) {
        let distance = start.distance_to(&end);
        if distance < MIN_DRAW_DISTANCE {
            log::debug!(
                "{}: discarded {:.1}-unit gesture as a click",
                tool.name(),
                distance
            );
            effects.push(Effect::Redraw);
            return;
        }

        let Some(shape) = tool.build_shape(start, end, &self.style) else {
            return;
        };
        let id = doc.create(self.style.draft(shape));
        effects.push(Effect::Created(id));
        self.set_active_tool(AnnotationTool::Select, effects);
    }

    fn double_click(&mut self, doc: &mut Document, x: f32, y: f32, effects: &mut Vec<Effect>) {
        if self.tool != AnnotationTool::Select {
            return;
        }
        let Some(point) = self.to_canvas(x, y) else {
            return;
        };
        let tolerance = self.view.screen_to_canvas_len(HIT_TOLERANCE);
        let Some(id) = doc.store.hit_test(&point, tolerance) else {
            return;
        };
        let Some(AnnotationShape::Text { text, .. }) = doc.store.get(id).map(|a| &a.shape) else {
            return;
        };
        if self.edit.as_ref().is_some_and(|edit| edit.id == id) {
            return;
        }
        let text = text.clone();

        self.commit_edit(doc, effects);
        self.cancel_gesture(doc);
        self.select(doc, Some(id), effects);
        log::debug!("Editing text annotation {}", id);
        self.edit = Some(TextEdit { id, draft: text });
        effects.push(Effect::EditStarted(id));
    }

    // ------------------------------------------------------------------------
    // Keyboard handling
    // ------------------------------------------------------------------------

    fn key_down(
        &mut self,
        doc: &mut Document,
        key: Key,
        modifiers: Modifiers,
        effects: &mut Vec<Effect>,
    ) {
        // While editing, the edit field owns the keyboard.
        if self.edit.is_some() {
            match key {
                Key::Enter => self.commit_edit(doc, effects),
                Key::Escape => self.cancel_edit(effects),
                _ => {}
            }
            return;
        }

        if key == Key::Escape {
            if !self.cancel_gesture(doc) {
                self.select(doc, None, effects);
            }
            effects.push(Effect::Redraw);
            return;
        }

        if modifiers.command() {
            if key.is_char('z') {
                if modifiers.shift {
                    self.redo(doc, effects);
                } else {
                    self.undo(doc, effects);
                }
                return;
            }
            if key.is_char('y') {
                self.redo(doc, effects);
                return;
            }
        }

        if doc.store.selected().is_some() {
            match key {
                Key::Delete | Key::Backspace => {
                    self.delete_selected(doc, effects);
                    return;
                }
                _ if modifiers.command() && (key.is_char('c') || key.is_char('d')) => {
                    self.duplicate_selected(doc, effects);
                    return;
                }
                _ => {}
            }
        }

        if !modifiers.any()
            && let Some(tool) = self.keybindings.tool_for_key(key)
        {
            self.set_tool(doc, tool, effects);
        }
    }

    // ------------------------------------------------------------------------
    // Commands shared by keyboard shortcuts and the toolbar
    // ------------------------------------------------------------------------

    /// Switch tools from outside the overlay (toolbar or hotkey).
    ///
    /// Commits a pending text edit and abandons any gesture. Picking a drawing
    /// tool clears the selection.
    pub fn set_tool(&mut self, doc: &mut Document, tool: AnnotationTool, effects: &mut Vec<Effect>) {
        self.commit_edit(doc, effects);
        self.cancel_gesture(doc);
        if tool.is_drawing_tool() {
            self.select(doc, None, effects);
        }
        self.set_active_tool(tool, effects);
    }

    fn set_active_tool(&mut self, tool: AnnotationTool, effects: &mut Vec<Effect>) {
        if self.tool != tool {
            log::debug!("Tool: {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
            effects.push(Effect::ToolChanged(tool));
        }
    }

    /// Change the selection, committing an open text edit on another annotation first.
    pub fn select(&mut self, doc: &mut Document, id: Option<AnnotationId>, effects: &mut Vec<Effect>) {
        let previous = doc.store.selected();
        if previous == id {
            return;
        }
        if self.edit.as_ref().is_some_and(|edit| Some(edit.id) != id) {
            self.commit_edit(doc, effects);
        }
        doc.store.select(id);
        let now = doc.store.selected();
        if now != previous {
            effects.push(Effect::SelectionChanged(now));
        }
    }

    /// Delete the selected annotation. Returns `false` if nothing was selected.
    pub fn delete_selected(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) -> bool {
        let Some(id) = doc.store.selected() else {
            return false;
        };
        if self.edit.as_ref().is_some_and(|edit| edit.id == id) {
            self.cancel_edit(effects);
        }
        self.cancel_gesture(doc);
        if doc.delete(id) {
            effects.push(Effect::Deleted(id));
            effects.push(Effect::SelectionChanged(None));
            true
        } else {
            false
        }
    }

    /// Duplicate the selected annotation and select the copy.
    pub fn duplicate_selected(
        &mut self,
        doc: &mut Document,
        effects: &mut Vec<Effect>,
    ) -> Option<AnnotationId> {
        self.commit_edit(doc, effects);
        let id = doc.store.selected()?;
        self.cancel_gesture(doc);
        let copy = doc.duplicate(id)?;
        effects.push(Effect::Created(copy));
        self.select(doc, Some(copy), effects);
        Some(copy)
    }

    /// Undo the last command. An open text edit is discarded first.
    pub fn undo(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) -> bool {
        self.cancel_edit(effects);
        self.cancel_gesture(doc);
        let previous = doc.store.selected();
        let applied = doc.undo();
        self.after_history(doc, previous, applied, effects);
        applied
    }

    pub fn redo(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) -> bool {
        self.cancel_edit(effects);
        self.cancel_gesture(doc);
        let previous = doc.store.selected();
        let applied = doc.redo();
        self.after_history(doc, previous, applied, effects);
        applied
    }

    fn after_history(
        &mut self,
        doc: &Document,
        previous: Option<AnnotationId>,
        applied: bool,
        effects: &mut Vec<Effect>,
    ) {
        if !applied {
            return;
        }
        effects.push(Effect::HistoryApplied);
        let now = doc.store.selected();
        if now != previous {
            effects.push(Effect::SelectionChanged(now));
        }
    }

    /// Drop all transient state: gesture, text edit (discarded) and selection.
    pub fn reset(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) {
        self.cancel_edit(effects);
        self.cancel_gesture(doc);
        self.select(doc, None, effects);
    }

    // ------------------------------------------------------------------------
    // Gesture and edit bookkeeping
    // ------------------------------------------------------------------------

    /// Return to `Idle`. A draw in progress is discarded; a drag keeps what it
    /// already applied and becomes one undo step. Returns `false` if already idle.
    fn cancel_gesture(&mut self, doc: &mut Document) -> bool {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => false,
            InteractionState::Drawing { tool, .. } => {
                log::debug!("{}: drawing cancelled", tool.name());
                true
            }
            InteractionState::Dragging { id, original, .. } => {
                if let Some(current) = doc.store.get(id).cloned() {
                    doc.record_modify(original, current);
                }
                true
            }
        }
    }

    /// Write the edit field's text into the annotation and close the edit.
    ///
    /// A blank draft keeps the previous text.
    fn commit_edit(&mut self, doc: &mut Document, effects: &mut Vec<Effect>) {
        let Some(edit) = self.edit.take() else {
            return;
        };
        if edit.draft.trim().is_empty() {
            log::debug!("Blank text for annotation {}, keeping previous value", edit.id);
            effects.push(Effect::EditCancelled(edit.id));
            return;
        }
        let patch = AnnotationPatch::text(TextPatch {
            text: Some(edit.draft),
            ..Default::default()
        });
        if doc.modify(edit.id, &patch) {
            effects.push(Effect::Updated(edit.id));
        }
        effects.push(Effect::EditCommitted(edit.id));
    }

    /// Close an edit whose annotation was removed behind its back.
    fn drop_orphaned_edit(&mut self, doc: &Document, effects: &mut Vec<Effect>) {
        if self
            .edit
            .as_ref()
            .is_some_and(|edit| !doc.store.contains(edit.id))
        {
            self.cancel_edit(effects);
        }
    }

    fn cancel_edit(&mut self, effects: &mut Vec<Effect>) {
        if let Some(edit) = self.edit.take() {
            log::debug!("Discarded text edit of annotation {}", edit.id);
            effects.push(Effect::EditCancelled(edit.id));
        }
    }
}

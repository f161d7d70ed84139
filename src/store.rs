//! Annotation storage and selection.
//!
//! [`AnnotationStore`] is the sole owner of the annotation collection. Every
//! operation is total: unknown ids are ignored rather than reported.

use std::fmt;

use crate::model::{Annotation, AnnotationDraft, AnnotationId, AnnotationPatch, Palette, Point};

/// Callback invoked with the new annotation count after every structural change.
pub type CountObserver = Box<dyn FnMut(usize)>;

/// Storage for the annotations of one diagram, in render order.
pub struct AnnotationStore {
    /// All annotations, bottom-most first.
    annotations: Vec<Annotation>,
    /// Counter for generating unique annotation IDs. Never decreases.
    next_id: u64,
    /// Currently selected annotation ID.
    selected_id: Option<AnnotationId>,
    /// Dirty flag - set when annotations or selection changes.
    /// Used to avoid re-rendering the overlay when nothing changed.
    dirty: bool,
    count_observer: Option<CountObserver>,
}

impl fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("annotations", &self.annotations)
            .field("next_id", &self.next_id)
            .field("selected_id", &self.selected_id)
            .field("dirty", &self.dirty)
            .field("count_observer", &self.count_observer.is_some())
            .finish()
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            next_id: 1,
            selected_id: None,
            dirty: true, // Start dirty so the first overlay render happens
            count_observer: None,
        }
    }

    /// Register the count-changed observer, replacing any previous one.
    pub fn set_count_observer(&mut self, observer: impl FnMut(usize) + 'static) {
        self.count_observer = Some(Box::new(observer));
    }

    fn notify_count(&mut self) {
        let count = self.annotations.len();
        if let Some(observer) = self.count_observer.as_mut() {
            observer(count);
        }
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call after re-rendering the overlay.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Keep the id counter ahead of an id that entered the store from outside.
    ///
    /// Returns `false` for ids above [`AnnotationId::MAX`], which cannot be reserved.
    fn reserve_id(&mut self, id: AnnotationId) -> bool {
        if id > AnnotationId::MAX {
            return false;
        }
        if id.get() >= self.next_id {
            self.next_id = id.get() + 1;
        }
        true
    }

    /// Append a new annotation and return its freshly assigned ID.
    pub fn create(&mut self, draft: AnnotationDraft) -> AnnotationId {
        let id = self.allocate_id();
        log::info!("Created {} annotation {}", draft.shape.name(), id);
        self.annotations.push(Annotation::from_draft(id, draft));
        self.mark_dirty();
        self.notify_count();
        id
    }

    /// Put a previously removed annotation back at `index` (clamped).
    ///
    /// The annotation keeps its id unless that id is already taken, in which
    /// case a fresh one is assigned. Returns the id it ended up with.
    pub fn restore(&mut self, index: usize, mut annotation: Annotation) -> AnnotationId {
        if self.contains(annotation.id) || !self.reserve_id(annotation.id) {
            let fresh = self.allocate_id();
            log::warn!("Id {} unavailable, restoring as {}", annotation.id, fresh);
            annotation.id = fresh;
        }
        let id = annotation.id;
        let index = index.min(self.annotations.len());
        self.annotations.insert(index, annotation);
        self.mark_dirty();
        self.notify_count();
        id
    }

    /// Merge `patch` into the annotation with `id`.
    ///
    /// Returns `false` (and changes nothing) if no such annotation exists.
    pub fn update(&mut self, id: AnnotationId, patch: &AnnotationPatch) -> bool {
        let Some(annotation) = self.annotations.iter_mut().find(|a| a.id == id) else {
            log::debug!("Update for unknown annotation {} ignored", id);
            return false;
        };
        annotation.apply_patch(patch);
        self.mark_dirty();
        true
    }

    /// Overwrite the stored record that has the same id as `annotation`.
    pub fn replace(&mut self, annotation: Annotation) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == annotation.id) {
            Some(slot) => {
                *slot = annotation;
                self.mark_dirty();
                true
            }
            None => {
                log::debug!("Replace for unknown annotation {} ignored", annotation.id);
                false
            }
        }
    }

    /// Remove an annotation by ID, returning it with its former index.
    pub fn delete(&mut self, id: AnnotationId) -> Option<(usize, Annotation)> {
        if self.selected_id == Some(id) {
            self.selected_id = None;
            self.mark_dirty();
        }
        let index = self.index_of(id)?;
        let removed = self.annotations.remove(index);
        log::info!("Deleted annotation {}", id);
        self.mark_dirty();
        self.notify_count();
        Some((index, removed))
    }

    /// Remove every annotation, returning them in order.
    pub fn clear(&mut self) -> Vec<Annotation> {
        let removed = std::mem::take(&mut self.annotations);
        self.selected_id = None;
        self.mark_dirty();
        log::info!("Cleared {} annotations", removed.len());
        self.notify_count();
        removed
    }

    /// Append a copy of `source` with a new id, shifted by the duplicate offset.
    pub fn duplicate(&mut self, source: &Annotation) -> Annotation {
        let id = self.allocate_id();
        let copy = Annotation::from_draft(id, AnnotationDraft::duplicate_of(source));
        log::info!("Duplicated annotation {} as {}", source.id, id);
        self.annotations.push(copy.clone());
        self.mark_dirty();
        self.notify_count();
        copy
    }

    /// Get an annotation by ID.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|a| a.id == id)
    }

    /// All annotations in render order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Get the number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Select an annotation, or clear the selection with `None`.
    ///
    /// Selecting an id that is not in the store clears the selection.
    pub fn select(&mut self, id: Option<AnnotationId>) {
        let id = id.filter(|id| self.contains(*id));
        if self.selected_id != id {
            log::debug!(
                "Selection: {}",
                id.map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            self.selected_id = id;
            self.mark_dirty();
        }
    }

    /// Get the selected annotation ID.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected_id
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected_id.and_then(|id| self.get(id))
    }

    /// Find the top-most annotation at a given point.
    pub fn hit_test(&self, point: &Point, tolerance: f32) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.contains_point(point, tolerance))
            .map(|a| a.id)
    }

    /// Recolor every annotation that follows the palette.
    ///
    /// Annotations with [`crate::model::ColorRole::Custom`] keep their color. Returns how many
    /// annotations changed.
    pub fn apply_palette(&mut self, palette: &Palette) -> usize {
        let mut changed = 0;
        for annotation in &mut self.annotations {
            if let Some(color) = palette.color_for(annotation.role)
                && annotation.color != color
            {
                annotation.color = color.to_string();
                changed += 1;
            }
        }
        if changed > 0 {
            log::info!("Recolored {} annotations for new palette", changed);
            self.mark_dirty();
        }
        changed
    }

    /// Replace the whole collection, e.g. from a snapshot.
    ///
    /// Clears the selection. The id counter only moves forward.
    pub(crate) fn replace_all(&mut self, mut annotations: Vec<Annotation>) {
        for annotation in &mut annotations {
            if !self.reserve_id(annotation.id) {
                let fresh = self.allocate_id();
                log::warn!("Id {} out of range, loading as {}", annotation.id, fresh);
                annotation.id = fresh;
            }
        }
        self.annotations = annotations;
        self.selected_id = None;
        self.mark_dirty();
        self.notify_count();
    }
}

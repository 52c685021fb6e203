//! Scene store: the ordered entity list and its undo/redo operation log.
//!
//! List order is draw order. Undo operations snapshot the exact indices they
//! touched; indices are otherwise unstable across insertions and deletions.

use crate::entity::{Entity, EntityId, ImageEntity, Stroke, TextEntity};
use kurbo::Point;

/// An entity captured by a delete operation, together with the index it
/// occupied at deletion time.
#[derive(Debug)]
pub struct DeletedEntity {
    /// Index in the entity list at the moment of deletion.
    pub index: usize,
    /// The removed entity. `Some` while the operation is un-applied
    /// (sitting on the undo stack); taken when undo re-inserts it.
    parked: Option<Entity>,
}

/// A recorded, invertible mutation of the scene.
///
/// The same operation value moves between the undo and redo stacks; the
/// entity it governs is parked inside it whenever it is not in the scene,
/// so undo/redo shuffle the original entities rather than reconstructions.
#[derive(Debug)]
pub enum Operation {
    /// A committed stroke. Undo removes the last entity matching `id`;
    /// redo re-appends it.
    AddStroke {
        id: EntityId,
        parked: Option<Entity>,
    },
    /// A bulk delete. Items are stored in ascending index order so undo can
    /// re-insert front-to-back; redo walks them back-to-front so earlier
    /// removals never shift later recorded indices.
    DeleteEntities { items: Vec<DeletedEntity> },
    /// A full clear. The snapshot holds the entire list while cleared.
    Clear { snapshot: Vec<Entity> },
}

/// The ordered entity list plus the two-stack operation log.
#[derive(Debug, Default)]
pub struct SceneStore {
    entities: Vec<Entity>,
    undo_stack: Vec<Operation>,
    redo_stack: Vec<Operation>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entities in draw order (back to front).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Mutable access for gesture-driven edits (image move/resize). These
    /// edits are intentionally outside the undo log.
    pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Append a finished stroke and record it in one step.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        let id = stroke.id;
        self.entities.push(Entity::Stroke(stroke));
        self.undo_stack.push(Operation::AddStroke { id, parked: None });
        self.redo_stack.clear();
    }

    /// Start streaming a stroke: append it so it renders while being drawn,
    /// clear the redo stack (this is a fresh mutation), but defer the undo
    /// record to [`SceneStore::register_stroke`] at gesture end.
    pub fn begin_stroke(&mut self, stroke: Stroke) -> EntityId {
        let id = stroke.id;
        self.entities.push(Entity::Stroke(stroke));
        self.redo_stack.clear();
        id
    }

    /// The streamed stroke with the given id, for appending points.
    pub fn stroke_mut(&mut self, id: EntityId) -> Option<&mut Stroke> {
        self.entities
            .iter_mut()
            .rev()
            .find(|e| e.id() == id)
            .and_then(Entity::as_stroke_mut)
    }

    /// Point count of the streamed stroke, if it is still in the scene.
    pub fn stroke_len(&self, id: EntityId) -> Option<usize> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.id() == id)
            .and_then(Entity::as_stroke)
            .map(Stroke::len)
    }

    /// Remove a streamed stroke that was cancelled before registration.
    pub fn discard_stroke(&mut self, id: EntityId) {
        if let Some(idx) = self.entities.iter().rposition(|e| e.id() == id) {
            self.entities.remove(idx);
        }
    }

    /// Record the undo entry for a stroke that was streamed into the scene
    /// via [`SceneStore::begin_stroke`]. Does not clear the redo stack; that
    /// already happened at gesture start. No-op if the stroke is gone.
    pub fn register_stroke(&mut self, id: EntityId) {
        if self.entities.iter().any(|e| e.id() == id) {
            self.undo_stack.push(Operation::AddStroke { id, parked: None });
        }
    }

    /// Append a pasted/dropped image. Clears the redo stack.
    pub fn add_image(&mut self, image: ImageEntity) {
        self.entities.push(Entity::Image(image));
        self.redo_stack.clear();
    }

    /// Append a committed text entity. Clears the redo stack.
    pub fn add_text(&mut self, text: TextEntity) {
        self.entities.push(Entity::Text(text));
        self.redo_stack.clear();
    }

    /// Overwrite the entity at `index` with an edited text entity,
    /// preserving its z-order position.
    pub fn replace_text(&mut self, index: usize, text: TextEntity) {
        if index < self.entities.len() {
            self.entities[index] = Entity::Text(text);
        }
    }

    /// Delete the entities at the given indices. Duplicate and out-of-range
    /// indices are ignored. Records a single `DeleteEntities` operation and
    /// clears the redo stack.
    pub fn delete_entities(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        // Remove from the back so earlier indices stay valid.
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut items = Vec::with_capacity(sorted.len());
        for index in sorted {
            if index < self.entities.len() {
                items.push(DeletedEntity {
                    index,
                    parked: Some(self.entities.remove(index)),
                });
            }
        }
        if items.is_empty() {
            return;
        }
        // Stored ascending so undo can replay front-to-back.
        items.reverse();
        self.undo_stack.push(Operation::DeleteEntities { items });
        self.redo_stack.clear();
    }

    /// Clear the whole scene, snapshotting it for undo. No-op when empty.
    pub fn clear(&mut self) {
        if self.entities.is_empty() {
            return;
        }
        let snapshot = std::mem::take(&mut self.entities);
        log::debug!("cleared {} entities", snapshot.len());
        self.undo_stack.push(Operation::Clear { snapshot });
        self.redo_stack.clear();
    }

    /// Undo the most recent operation. Safe no-op on an empty stack.
    pub fn undo(&mut self) {
        let Some(mut op) = self.undo_stack.pop() else {
            return;
        };
        match &mut op {
            Operation::AddStroke { id, parked } => {
                if let Some(idx) = self.entities.iter().rposition(|e| e.id() == *id) {
                    *parked = Some(self.entities.remove(idx));
                }
            }
            Operation::DeleteEntities { items } => {
                // Ascending order keeps each recorded index valid as the
                // earlier ones go back in.
                for item in items.iter_mut() {
                    if let Some(entity) = item.parked.take() {
                        let at = item.index.min(self.entities.len());
                        self.entities.insert(at, entity);
                    }
                }
            }
            Operation::Clear { snapshot } => {
                self.entities.append(snapshot);
            }
        }
        self.redo_stack.push(op);
    }

    /// Redo the most recently undone operation. Safe no-op on an empty stack.
    pub fn redo(&mut self) {
        let Some(mut op) = self.redo_stack.pop() else {
            return;
        };
        match &mut op {
            Operation::AddStroke { parked, .. } => {
                if let Some(entity) = parked.take() {
                    self.entities.push(entity);
                }
            }
            Operation::DeleteEntities { items } => {
                // Descending order so removals don't shift the remaining
                // recorded indices.
                for item in items.iter_mut().rev() {
                    if item.index < self.entities.len() {
                        item.parked = Some(self.entities.remove(item.index));
                    }
                }
            }
            Operation::Clear { snapshot } => {
                snapshot.extend(self.entities.drain(..));
            }
        }
        self.undo_stack.push(op);
    }

    /// Index of the topmost image whose bounding box contains the point.
    pub fn topmost_image_at(&self, point: Point) -> Option<usize> {
        self.entities
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.as_image().is_some_and(|img| img.hit_test(point)))
            .map(|(i, _)| i)
    }

    /// Index of the topmost text entity whose bounds contain the point.
    pub fn topmost_text_at(&self, point: Point) -> Option<usize> {
        self.entities
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.as_text().is_some_and(|t| t.hit_test(point)))
            .map(|(i, _)| i)
    }

    /// Indices of all path strokes passing within `radius` of the point.
    /// Used by the stroke eraser's scrub pass.
    pub fn strokes_within(&self, point: Point, radius: f64) -> Vec<usize> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.as_stroke().is_some_and(|s| s.hit_test(point, radius)))
            .map(|(i, _)| i)
            .collect()
    }
}

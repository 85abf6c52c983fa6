//! The ordered set of fate objects in a session.

use crate::category::Category;
use crate::entity::{Entity, EntityId, ModelError, ModelResult};
use log::{debug, warn};

/// All fate objects currently tracked, in insertion order.
///
/// Entities are addressed by [`EntityId`]; two entities with identical
/// content are still distinct.
#[derive(Debug, Default)]
pub struct Collection {
    entities: Vec<Entity>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return its id.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        debug!("adding {} entity {}", entity.category(), id);
        self.entities.push(entity);
        id
    }

    /// Create and append a new empty, unnamed entity.
    pub fn create(&mut self, category: Category) -> EntityId {
        self.add(Entity::empty(category))
    }

    /// Discard the current contents and take the given entities.
    pub fn replace_all(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.entities = entities.into_iter().collect();
        debug!("collection replaced, {} entities", self.entities.len());
    }

    /// Append several entities, keeping the current contents.
    pub fn extend(&mut self, entities: impl IntoIterator<Item = Entity>) {
        let before = self.entities.len();
        self.entities.extend(entities);
        debug!(
            "collection merged {} entities",
            self.entities.len() - before
        );
    }

    /// Remove an entity by identity, returning it.
    pub fn remove(&mut self, id: EntityId) -> ModelResult<Entity> {
        match self.position(id) {
            Some(index) => Ok(self.entities.remove(index)),
            None => {
                warn!("remove of unknown entity {id}");
                Err(ModelError::EntityNotFound(id))
            }
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Iterate entities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Alias for [`Collection::iter`].
    pub fn all(&self) -> std::slice::Iter<'_, Entity> {
        self.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Like [`Collection::get_mut`] but reports a missing entity as an error.
    pub fn entity_mut(&mut self, id: EntityId) -> ModelResult<&mut Entity> {
        self.get_mut(id).ok_or(ModelError::EntityNotFound(id))
    }

    /// Insertion index of an entity.
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities grouped by category, most used first within each group.
    ///
    /// Ties keep insertion order.
    pub fn ranked(&self) -> Vec<&Entity> {
        let mut ranked: Vec<&Entity> = self.entities.iter().collect();
        ranked.sort_by(|a, b| {
            a.category()
                .cmp(&b.category())
                .then_with(|| b.total().cmp(&a.total()))
        });
        ranked
    }

    /// Ids in [`Collection::ranked`] order.
    pub fn ranked_ids(&self) -> Vec<EntityId> {
        self.ranked().into_iter().map(Entity::id).collect()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Entity> for Collection {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

//! Fate objects and their aspect counters.

use crate::category::Category;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors from model bookkeeping.
///
/// These indicate the caller referenced something it did not obtain from
/// the model itself; they are never produced by well-behaved front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("aspect `{label}` not found on `{entity}`")]
    AspectNotFound { entity: String, label: String },

    #[error("entity {0} not found in collection")]
    EntityNotFound(EntityId),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Process-local identity of a fate object.
///
/// Assigned at construction and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Create a new unique entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A fate object: a named, categorized set of aspect counters.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    category: Category,
    name: String,
    aspects: BTreeMap<String, u32>,
}

impl Entity {
    /// Create an entity, adding each initial label with a zero count.
    ///
    /// Duplicate labels collapse into one.
    pub fn new<I, S>(category: Category, name: impl Into<String>, initial_aspects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entity = Self {
            id: EntityId::new(),
            category,
            name: name.into(),
            aspects: BTreeMap::new(),
        };
        for label in initial_aspects {
            entity.add_aspect(label);
        }
        entity
    }

    /// Create an unnamed entity with no aspects.
    pub fn empty(category: Category) -> Self {
        Self::new(category, "", Vec::<String>::new())
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name. Empty names are allowed.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        debug!("entity {} renamed to {:?}", self.id, self.name);
    }

    /// Add an aspect with a zero count, resetting it if already present.
    pub fn add_aspect(&mut self, label: impl Into<String>) {
        let label = label.into();
        if let Some(previous) = self.aspects.insert(label.clone(), 0) {
            debug!(
                "entity {} aspect {:?} reset from {}",
                self.id, label, previous
            );
        }
    }

    /// Add one use to an aspect.
    pub fn increment_aspect(&mut self, label: &str) -> ModelResult<u32> {
        match self.aspects.get_mut(label) {
            Some(count) => {
                *count = count.saturating_add(1);
                Ok(*count)
            }
            None => Err(self.aspect_not_found(label)),
        }
    }

    /// Get the current count for an aspect.
    pub fn aspect_count(&self, label: &str) -> ModelResult<u32> {
        self.aspects
            .get(label)
            .copied()
            .ok_or_else(|| self.aspect_not_found(label))
    }

    pub fn has_aspect(&self, label: &str) -> bool {
        self.aspects.contains_key(label)
    }

    /// Sum of all aspect counts. Used for ranking only.
    pub fn total(&self) -> u64 {
        self.aspects.values().map(|&c| u64::from(c)).sum()
    }

    /// Current aspect labels, in label order.
    pub fn aspect_labels(&self) -> impl Iterator<Item = &str> {
        self.aspects.keys().map(String::as_str)
    }

    /// Iterate `(label, count)` pairs in label order.
    pub fn aspects(&self) -> impl Iterator<Item = (&str, u32)> {
        self.aspects.iter().map(|(label, &count)| (label.as_str(), count))
    }

    /// Aspects sorted by count, most used first; ties by label.
    pub fn ranked_aspects(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<_> = self.aspects().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn aspect_len(&self) -> usize {
        self.aspects.len()
    }

    /// Whether the entity has no aspects.
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// Overwrite an aspect's count, inserting it if absent.
    ///
    /// Only used when restoring persisted counts.
    pub(crate) fn set_aspect_count(&mut self, label: impl Into<String>, count: u32) {
        self.aspects.insert(label.into(), count);
    }

    /// Compare category, name and aspects, ignoring identity.
    pub fn same_content(&self, other: &Entity) -> bool {
        self.category == other.category && self.name == other.name && self.aspects == other.aspects
    }

    fn aspect_not_found(&self, label: &str) -> ModelError {
        ModelError::AspectNotFound {
            entity: self.name.clone(),
            label: label.to_string(),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n", self.name)?;
        let labels: Vec<&str> = self.aspect_labels().collect();
        f.write_str(&labels.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new(Category::Pc, "Avery", ["Brave", "Reckless", "Brave"]);
        assert_eq!(entity.name(), "Avery");
        assert_eq!(entity.category(), Category::Pc);
        assert_eq!(entity.aspect_len(), 2);
        assert_eq!(entity.aspect_count("Brave"), Ok(0));
        assert_eq!(entity.total(), 0);
    }

    #[test]
    fn test_add_aspect_resets_count() {
        let mut entity = Entity::new(Category::Npc, "Guard", ["Sleepy"]);
        entity.increment_aspect("Sleepy").unwrap();
        entity.increment_aspect("Sleepy").unwrap();
        assert_eq!(entity.aspect_count("Sleepy"), Ok(2));

        entity.add_aspect("Sleepy");
        assert_eq!(entity.aspect_count("Sleepy"), Ok(0));
    }

    #[test]
    fn test_add_twice_differs_from_add_then_increment() {
        let mut twice = Entity::empty(Category::Object);
        twice.add_aspect("Cursed");
        twice.add_aspect("Cursed");

        let mut incremented = Entity::empty(Category::Object);
        incremented.add_aspect("Cursed");
        incremented.increment_aspect("Cursed").unwrap();

        assert_eq!(twice.aspect_count("Cursed"), Ok(0));
        assert_eq!(incremented.aspect_count("Cursed"), Ok(1));
    }

    #[test]
    fn test_sneaky_scenario() {
        let mut entity = Entity::new(Category::Npc, "", Vec::<String>::new());
        entity.add_aspect("Sneaky");
        entity.increment_aspect("Sneaky").unwrap();
        entity.increment_aspect("Sneaky").unwrap();
        assert_eq!(entity.aspect_count("Sneaky"), Ok(2));
        assert_eq!(entity.total(), 2);
    }

    #[test]
    fn test_missing_aspect_is_not_found() {
        let mut entity = Entity::new(Category::Location, "Docks", ["Foggy"]);
        let err = entity.increment_aspect("Sunny").unwrap_err();
        assert_eq!(
            err,
            ModelError::AspectNotFound {
                entity: "Docks".to_string(),
                label: "Sunny".to_string(),
            }
        );
        assert!(entity.aspect_count("Sunny").is_err());
        assert_eq!(entity.aspect_count("Foggy"), Ok(0));
    }

    #[test]
    fn test_total_tracks_counts() {
        let mut entity = Entity::new(Category::Situation, "Ambush", ["Dark", "Loud", "Tight"]);
        for _ in 0..3 {
            entity.increment_aspect("Dark").unwrap();
        }
        entity.increment_aspect("Tight").unwrap();
        assert_eq!(entity.total(), 4);

        entity.add_aspect("Dark");
        assert_eq!(entity.total(), 1);

        entity.add_aspect("Windy");
        entity.increment_aspect("Windy").unwrap();
        assert_eq!(entity.total(), 2);
    }

    #[test]
    fn test_increment_saturates() {
        let mut entity = Entity::empty(Category::Pc);
        entity.set_aspect_count("Lucky", u32::MAX);
        assert_eq!(entity.increment_aspect("Lucky"), Ok(u32::MAX));
    }

    #[test]
    fn test_rename_accepts_anything() {
        let mut entity = Entity::new(Category::Pc, "Avery", Vec::<String>::new());
        entity.rename("");
        assert_eq!(entity.name(), "");
        entity.rename("Avery the Bold");
        assert_eq!(entity.name(), "Avery the Bold");
    }

    #[test]
    fn test_ranked_aspects() {
        let mut entity = Entity::new(Category::Pc, "Avery", ["Brave", "Clever", "Angry"]);
        entity.increment_aspect("Clever").unwrap();
        entity.increment_aspect("Clever").unwrap();
        entity.increment_aspect("Brave").unwrap();

        let ranked = entity.ranked_aspects();
        assert_eq!(ranked, vec![("Clever", 2), ("Brave", 1), ("Angry", 0)]);
    }

    #[test]
    fn test_identity_is_unique() {
        let a = Entity::new(Category::Pc, "Twin", ["Same"]);
        let b = Entity::new(Category::Pc, "Twin", ["Same"]);
        assert_ne!(a.id(), b.id());
        assert!(a.same_content(&b));
    }

    #[test]
    fn test_display() {
        let entity = Entity::new(Category::Pc, "Avery", ["Brave", "Angry"]);
        assert_eq!(entity.to_string(), "Avery\n\nAngry\nBrave");
    }
}

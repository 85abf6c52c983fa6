//! A working session: the collection plus the file it belongs to.

use crate::category::Category;
use crate::collection::Collection;
use crate::entity::{Entity, EntityId, ModelError};
use crate::persist::{self, CountPolicy, PersistError};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// The collection being edited, bound to a file on disk.
///
/// Every mutation goes through the session so it can track unsaved changes.
#[derive(Debug)]
pub struct Session {
    collection: Collection,
    path: PathBuf,
    policy: CountPolicy,
    dirty: bool,
}

impl Session {
    /// Start an empty session bound to `path`. Nothing is read or written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            collection: Collection::new(),
            path: path.into(),
            policy: CountPolicy::default(),
            dirty: false,
        }
    }

    /// Set how counts are treated by later loads.
    pub fn with_count_policy(mut self, policy: CountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load a session from an existing file.
    pub fn open(path: impl Into<PathBuf>, policy: CountPolicy) -> SessionResult<Self> {
        let path = path.into();
        let collection = persist::load(&path, policy)?;
        Ok(Self {
            collection,
            path,
            policy,
            dirty: false,
        })
    }

    /// Load a session, starting empty if the file does not exist yet.
    pub fn open_or_new(path: impl Into<PathBuf>, policy: CountPolicy) -> SessionResult<Self> {
        let path = path.into();
        match Self::open(&path, policy) {
            Err(SessionError::Persist(PersistError::Io { source, .. }))
                if source.kind() == io::ErrorKind::NotFound =>
            {
                info!("{} does not exist, starting empty", path.display());
                Ok(Self::new(path).with_count_policy(policy))
            }
            other => other,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn count_policy(&self) -> CountPolicy {
        self.policy
    }

    /// Whether there are changes not yet written to [`Session::path`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.collection.get(id)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a new empty entity of the given category.
    pub fn add_entity(&mut self, category: Category) -> EntityId {
        self.dirty = true;
        self.collection.create(category)
    }

    /// Add a fully built entity.
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        self.dirty = true;
        self.collection.add(entity)
    }

    pub fn rename(&mut self, id: EntityId, name: impl Into<String>) -> SessionResult<()> {
        self.collection.entity_mut(id)?.rename(name);
        self.dirty = true;
        Ok(())
    }

    pub fn add_aspect(&mut self, id: EntityId, label: impl Into<String>) -> SessionResult<()> {
        self.collection.entity_mut(id)?.add_aspect(label);
        self.dirty = true;
        Ok(())
    }

    /// Record one use of an aspect, returning the new count.
    pub fn increment_aspect(&mut self, id: EntityId, label: &str) -> SessionResult<u32> {
        let count = self.collection.entity_mut(id)?.increment_aspect(label)?;
        self.dirty = true;
        Ok(count)
    }

    pub fn remove(&mut self, id: EntityId) -> SessionResult<Entity> {
        let entity = self.collection.remove(id)?;
        self.dirty = true;
        Ok(entity)
    }

    /// Drop every entity. The session stays bound to the same file.
    pub fn clear(&mut self) {
        if !self.collection.is_empty() {
            self.dirty = true;
        }
        self.collection.clear();
    }

    // =========================================================================
    // File operations
    // =========================================================================

    /// Replace the collection with the contents of `path` and bind to it.
    ///
    /// On error nothing changes.
    pub fn load(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        let path = path.into();
        let entities = persist::load_entities(&path, self.policy)?;
        self.collection.replace_all(entities);
        self.path = path;
        self.dirty = false;
        Ok(())
    }

    /// Append the contents of `path`. The bound file is unchanged.
    pub fn merge(&mut self, path: impl AsRef<Path>) -> SessionResult<usize> {
        let added = persist::merge(&mut self.collection, path, self.policy)?;
        if added > 0 {
            self.dirty = true;
        }
        Ok(added)
    }

    /// Write to the bound file.
    pub fn save(&mut self) -> SessionResult<()> {
        persist::save(&self.collection, &self.path)?;
        self.dirty = false;
        Ok(())
    }

    /// Write to `path` and bind the session to it.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> SessionResult<()> {
        let path = path.into();
        persist::save(&self.collection, &path)?;
        self.path = path;
        self.dirty = false;
        Ok(())
    }
}

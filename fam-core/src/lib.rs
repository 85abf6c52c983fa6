//! Fate aspect manager core.
//!
//! This crate provides:
//! - Fate objects (PCs, NPCs, locations, situations, objects) with aspect
//!   usage counters
//! - The collection of fate objects in a session
//! - `.fam` JSON persistence
//!
//! # Quick Start
//!
//! ```no_run
//! use fam_core::{Category, CountPolicy, Session};
//!
//! fn main() -> Result<(), fam_core::SessionError> {
//!     let mut session = Session::open_or_new("default.fam", CountPolicy::Reset)?;
//!
//!     let avery = session.add_entity(Category::Pc);
//!     session.rename(avery, "Avery")?;
//!     session.add_aspect(avery, "Brave")?;
//!     session.increment_aspect(avery, "Brave")?;
//!
//!     session.save()?;
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod collection;
pub mod entity;
pub mod persist;
pub mod session;

pub use category::{Category, CategoryInfo, ParseCategoryError, Rgba};
pub use collection::Collection;
pub use entity::{Entity, EntityId, ModelError, ModelResult};
pub use persist::{CountPolicy, FateRecord, PersistError, PersistResult, DEFAULT_FILE_NAME};
pub use session::{Session, SessionError, SessionResult};

//! `.fam` file persistence.
//!
//! A `.fam` file is a pretty-printed JSON array with one record per fate
//! object:
//!
//! ```json
//! [
//!     {
//!         "category": "pc",
//!         "name": "Avery",
//!         "aspects": {
//!             "Brave": 3
//!         }
//!     }
//! ]
//! ```
//!
//! Counts are written out, but by default they are discarded on load and
//! every aspect starts again at zero. [`CountPolicy::Preserve`] opts into
//! restoring them.

use crate::category::Category;
use crate::collection::Collection;
use crate::entity::Entity;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name used when the user supplies none.
pub const DEFAULT_FILE_NAME: &str = "default.fam";

/// Conventional extension for aspect files.
pub const FILE_EXTENSION: &str = "fam";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid aspect file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// What to do with persisted aspect counts when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountPolicy {
    /// Keep only the labels; every count starts at zero.
    #[default]
    Reset,
    /// Restore the counts written in the file.
    Preserve,
}

/// One fate object as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FateRecord {
    pub category: Category,
    pub name: String,
    /// Files may hold counts beyond the in-memory counter range.
    pub aspects: BTreeMap<String, u64>,
}

impl FateRecord {
    /// Snapshot an entity, including its current counts.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            category: entity.category(),
            name: entity.name().to_string(),
            aspects: entity
                .aspects()
                .map(|(label, count)| (label.to_string(), u64::from(count)))
                .collect(),
        }
    }

    /// Rebuild an entity from this record.
    pub fn into_entity(self, policy: CountPolicy) -> Entity {
        match policy {
            CountPolicy::Reset => Entity::new(self.category, self.name, self.aspects.into_keys()),
            CountPolicy::Preserve => {
                let mut entity = Entity::new(self.category, self.name, Vec::<String>::new());
                for (label, count) in self.aspects {
                    entity.set_aspect_count(label, u32::try_from(count).unwrap_or(u32::MAX));
                }
                entity
            }
        }
    }
}

/// Convert a collection into its on-disk records.
pub fn encode(collection: &Collection) -> Vec<FateRecord> {
    collection.iter().map(FateRecord::from_entity).collect()
}

/// Convert on-disk records into entities.
pub fn decode(records: Vec<FateRecord>, policy: CountPolicy) -> Vec<Entity> {
    records
        .into_iter()
        .map(|record| record.into_entity(policy))
        .collect()
}

/// Render a collection as a `.fam` document.
pub fn to_json_string(collection: &Collection) -> PersistResult<String> {
    let records = encode(collection);
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse a `.fam` document into entities.
pub fn from_json_str(document: &str, policy: CountPolicy) -> Result<Vec<Entity>, serde_json::Error> {
    let records: Vec<FateRecord> = serde_json::from_str(document)?;
    Ok(decode(records, policy))
}

/// Read and parse a file without touching any collection.
pub fn load_entities(path: impl AsRef<Path>, policy: CountPolicy) -> PersistResult<Vec<Entity>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&content, policy).map_err(|source| PersistError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a whole collection from a file.
pub fn load(path: impl AsRef<Path>, policy: CountPolicy) -> PersistResult<Collection> {
    let path = path.as_ref();
    let collection: Collection = load_entities(path, policy)?.into_iter().collect();
    info!(
        "loaded {} entities from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Append the entities of a file to an existing collection.
///
/// On error the collection is left untouched. Returns the number of
/// entities added.
pub fn merge(
    collection: &mut Collection,
    path: impl AsRef<Path>,
    policy: CountPolicy,
) -> PersistResult<usize> {
    let path = path.as_ref();
    let entities = load_entities(path, policy)?;
    let added = entities.len();
    collection.extend(entities);
    info!("merged {added} entities from {}", path.display());
    Ok(added)
}

/// Write a collection to a file, replacing any existing content.
pub fn save(collection: &Collection, path: impl AsRef<Path>) -> PersistResult<()> {
    let path = path.as_ref();
    let content = to_json_string(collection)?;
    fs::write(path, content).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved {} entities to {}", collection.len(), path.display());
    Ok(())
}

/// Path used when none is given, relative to the working directory.
pub fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_FILE_NAME)
}

/// Whether a path carries the `.fam` extension.
pub fn has_fam_extension(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .map(|e| e == FILE_EXTENSION)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Collection {
        let mut collection = Collection::new();
        let avery = collection.add(Entity::new(Category::Pc, "Avery", ["Brave", "Reckless"]));
        collection.add(Entity::new(Category::Location, "Docks", ["Foggy"]));
        let entity = collection.get_mut(avery).unwrap();
        entity.increment_aspect("Brave").unwrap();
        entity.increment_aspect("Brave").unwrap();
        collection
    }

    #[test]
    fn test_encode_includes_counts() {
        let records = encode(&sample());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Pc);
        assert_eq!(records[0].name, "Avery");
        assert_eq!(records[0].aspects.get("Brave"), Some(&2));
        assert_eq!(records[0].aspects.get("Reckless"), Some(&0));
    }

    #[test]
    fn test_round_trip_resets_counts() {
        let original = sample();
        let json = to_json_string(&original).unwrap();
        let decoded = from_json_str(&json, CountPolicy::Reset).unwrap();

        assert_eq!(decoded.len(), original.len());
        for (before, after) in original.iter().zip(&decoded) {
            assert_eq!(before.category(), after.category());
            assert_eq!(before.name(), after.name());
            assert!(before.aspect_labels().eq(after.aspect_labels()));
            assert!(after.aspects().all(|(_, count)| count == 0));
        }
    }

    #[test]
    fn test_round_trip_preserve_counts() {
        let json = to_json_string(&sample()).unwrap();
        let decoded = from_json_str(&json, CountPolicy::Preserve).unwrap();
        assert_eq!(decoded[0].aspect_count("Brave"), Ok(2));
        assert_eq!(decoded[0].total(), 2);
    }

    #[test]
    fn test_avery_document() {
        let doc = r#"[{"category":"pc","name":"Avery","aspects":{"Brave":3}}]"#;
        let entities = from_json_str(doc, CountPolicy::Reset).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].category(), Category::Pc);
        assert_eq!(entities[0].name(), "Avery");
        assert_eq!(entities[0].aspect_count("Brave"), Ok(0));
    }

    #[test]
    fn test_oversized_counts_load() {
        let doc = r#"[{"category":"pc","name":"Avery","aspects":{"Brave":4294967296}}]"#;

        let reset = from_json_str(doc, CountPolicy::Reset).unwrap();
        assert_eq!(reset[0].aspect_count("Brave"), Ok(0));

        let kept = from_json_str(doc, CountPolicy::Preserve).unwrap();
        assert_eq!(kept[0].aspect_count("Brave"), Ok(u32::MAX));
    }

    #[test]
    fn test_pretty_output_shape() {
        let mut collection = Collection::new();
        collection.add(Entity::new(Category::Npc, "Guard", ["Sleepy"]));
        let json = to_json_string(&collection).unwrap();
        let expected = "[\n    {\n        \"category\": \"npc\",\n        \"name\": \"Guard\",\n        \"aspects\": {\n            \"Sleepy\": 0\n        }\n    }\n]\n";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_collection() {
        let json = to_json_string(&Collection::new()).unwrap();
        assert_eq!(json, "[]\n");
        assert!(from_json_str(&json, CountPolicy::Reset).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_documents() {
        let bad = [
            "not json",
            r#"{"category":"pc","name":"x","aspects":{}}"#,
            r#"[{"category":"dragon","name":"x","aspects":{}}]"#,
            r#"[{"category":"pc","aspects":{}}]"#,
            r#"[{"category":"pc","name":"x","aspects":{"Brave":-1}}]"#,
        ];
        for doc in bad {
            assert!(
                from_json_str(doc, CountPolicy::Reset).is_err(),
                "should reject {doc}"
            );
        }
    }

    #[test]
    fn test_fam_extension() {
        assert!(has_fam_extension("campaign.fam"));
        assert!(!has_fam_extension("campaign.json"));
        assert!(!has_fam_extension("campaign"));
        assert!(has_fam_extension(default_path()));
    }
}

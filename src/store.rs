//! Persisted building blocks.
//!
//! The store maps each [`Category`] to the ordered list of strings generated for
//! it. A category only appears after its generation procedure has been accepted
//! end-to-end; the pipeline never writes partial results.
//!
//! On disk the store is a `bincode` snapshot carrying a magic string and a
//! format version, with categories keyed by name. Keys are validated back into
//! [`Category`] when loading, so an unknown or corrupted entry is rejected
//! instead of being trusted.

use crate::category::Category;
use crate::error::{BlockError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const SNAPSHOT_MAGIC: &str = "cogbias-building-blocks";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    magic: String,
    version: u32,
    blocks: BTreeMap<String, Vec<String>>,
}

/// In-memory mapping from category to generated strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingBlockStore {
    blocks: BTreeMap<Category, Vec<String>>,
}

impl BuildingBlockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a store previously written by [`Self::save`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new();
        store.load(path)?;
        Ok(store)
    }

    /// Replaces the in-memory mapping with the snapshot at `path`.
    ///
    /// The file is fully decoded and validated before anything is swapped in;
    /// on error the current contents are left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| BlockError::deserialization(path, e))?;
        let blocks =
            Self::decode(&bytes).map_err(|reason| BlockError::deserialization(path, reason))?;

        info!("Loaded {} categories from {}", blocks.len(), path.display());
        self.blocks = blocks;
        Ok(())
    }

    /// Writes the current mapping to `path`.
    ///
    /// The snapshot is written next to the target and renamed into place, so a
    /// failed save never leaves a truncated store behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.encode()?;

        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, &bytes).map_err(|e| BlockError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(BlockError::io(path, e));
        }

        info!(
            "Saved {} categories ({} bytes) to {}",
            self.blocks.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.blocks.get(&category).map(|items| items.as_slice())
    }

    pub fn set(&mut self, category: Category, items: Vec<String>) {
        debug!("Storing {} items for '{}'", items.len(), category);
        self.blocks.insert(category, items);
    }

    pub fn contains(&self, category: Category) -> bool {
        self.blocks.contains_key(&category)
    }

    /// Categories currently present, in [`Category`] order.
    pub fn categories(&self) -> Vec<Category> {
        self.blocks.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let snapshot = Snapshot {
            magic: SNAPSHOT_MAGIC.to_string(),
            version: SNAPSHOT_VERSION,
            blocks: self
                .blocks
                .iter()
                .map(|(category, items)| (category.as_str().to_string(), items.clone()))
                .collect(),
        };
        bincode::serialize(&snapshot).map_err(|e| BlockError::Serialization(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> std::result::Result<BTreeMap<Category, Vec<String>>, String> {
        let snapshot: Snapshot = bincode::deserialize(bytes).map_err(|e| e.to_string())?;

        if snapshot.magic != SNAPSHOT_MAGIC {
            return Err(format!("not a building-block snapshot (magic '{}')", snapshot.magic));
        }
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            ));
        }

        snapshot
            .blocks
            .into_iter()
            .map(|(key, items)| {
                let category = key
                    .parse::<Category>()
                    .map_err(|_| format!("unknown category '{}'", key))?;
                Ok((category, items))
            })
            .collect()
    }
}

//! Experiment items built from generated building blocks.
//!
//! An [`Experiment`] exposes a length and indexed access to its rendered
//! items. [`ConjunctionFallacy`] fills a one-line template with the i-th
//! occupation, hobby and description and a name, prefixed by the fixed
//! transcript context.

use crate::category::Category;
use crate::error::{BlockError, Result};
use crate::store::BuildingBlockStore;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Framing shown before every experiment item.
pub const TRANSCRIPT_CONTEXT: &str = "This is the transcript of a conversation between a \
researcher and a subject who agreed to answer a few questions honestly and to the best of their \
ability.\n---BEGIN TRANSCRIPT---\n";

/// Indexed collection of experiment items.
pub trait Experiment {
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The rendered item at `index`, or `None` past the end.
    fn item_at(&self, index: usize) -> Option<String>;
}

/// Reads the first line of a template file, without its line terminator.
pub fn load_template(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| BlockError::Template {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let first_line = content.lines().next().ok_or_else(|| BlockError::Template {
        path: path.to_path_buf(),
        reason: "template file is empty".to_string(),
    })?;

    debug!("Loaded template from {}", path.display());
    Ok(first_line.to_string())
}

/// Conjunction-fallacy items: `{name}`, `{occupation}`, `{hobby}` and
/// `{description}` placeholders in the template are replaced per item.
pub struct ConjunctionFallacy {
    context: String,
    template: String,
    blocks: BuildingBlockStore,
}

impl ConjunctionFallacy {
    pub fn new(template: impl Into<String>, blocks: BuildingBlockStore) -> Self {
        Self {
            context: TRANSCRIPT_CONTEXT.to_string(),
            template: template.into(),
            blocks,
        }
    }

    pub fn from_template_file(path: impl AsRef<Path>, blocks: BuildingBlockStore) -> Result<Self> {
        Ok(Self::new(load_template(path)?, blocks))
    }

    /// Fails when hobbies or descriptions do not line up one-to-one with the
    /// list they were fanned out from.
    pub fn check_alignment(&self) -> Result<()> {
        let pairs = [
            (Category::Hobbies, Category::Occupations),
            (Category::Descriptions, Category::Hobbies),
        ];
        for (category, prerequisite) in pairs {
            let len = self.block(category).len();
            let prerequisite_len = self.block(prerequisite).len();
            if len != prerequisite_len {
                return Err(BlockError::Misaligned {
                    category,
                    len,
                    prerequisite,
                    prerequisite_len,
                });
            }
        }
        Ok(())
    }

    fn block(&self, category: Category) -> &[String] {
        self.blocks.get(category).unwrap_or_default()
    }
}

impl Experiment for ConjunctionFallacy {
    fn name(&self) -> &str {
        "conjunction fallacy"
    }

    /// Number of descriptions; each one anchors an item.
    fn len(&self) -> usize {
        self.block(Category::Descriptions).len()
    }

    /// `None` past the end, or for every index when the lists are misaligned.
    fn item_at(&self, index: usize) -> Option<String> {
        if self.check_alignment().is_err() {
            return None;
        }
        let description = self.block(Category::Descriptions).get(index)?;
        let occupation = self.block(Category::Occupations).get(index)?;
        let hobby = self.block(Category::Hobbies).get(index)?;
        // names are independent of the other lists, so they are reused cyclically
        let names = self.block(Category::Names);
        let name = names.get(index % names.len().max(1))?;

        let item = self
            .template
            .replace("{name}", name)
            .replace("{occupation}", occupation)
            .replace("{hobby}", hobby)
            .replace("{description}", description);

        Some(format!("{}{}", self.context, item))
    }
}

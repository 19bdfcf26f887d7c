//! Loading textbook word catalogs from JSON files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::db::Database;
use crate::models::CurriculumItemInput;

/// Read a JSON array of catalog entries.
pub fn read_catalog(path: &Path) -> Result<Vec<CurriculumItemInput>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let items: Vec<CurriculumItemInput> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid catalog JSON in {}", path.display()))?;

    if let Some(blank) = items.iter().position(|item| item.word.trim().is_empty()) {
        anyhow::bail!("Catalog entry {} has an empty word", blank);
    }
    Ok(items)
}

/// Read a catalog file and append its entries to the database.
pub fn import_catalog(db: &Database, path: &Path) -> Result<usize> {
    let items = read_catalog(path)?;
    let count = db.import_curriculum_items(&items)?;
    tracing::info!("Imported {} curriculum items from {}", count, path.display());
    Ok(count)
}

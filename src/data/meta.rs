use std::collections::HashMap;
use std::path::Path;

use super::error::LoadError;
use super::loader::{read_csv, RawTable};
use super::schema::{normalize_header, MetaSchema};

/// Homepage and one-line description of a university.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversityMeta {
    pub homepage_url: String,
    pub description: String,
}

impl UniversityMeta {
    /// Placeholder used when the metadata table has no entry.
    pub fn fallback(university: &str) -> Self {
        Self {
            homepage_url: "#".to_string(),
            description: university.to_string(),
        }
    }
}

/// University name → metadata. Loaded once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct UniversityIndex {
    entries: HashMap<String, UniversityMeta>,
}

impl UniversityIndex {
    /// Metadata for `university`, or [`UniversityMeta::fallback`] when absent.
    pub fn lookup(&self, university: &str) -> UniversityMeta {
        self.entries
            .get(university)
            .cloned()
            .unwrap_or_else(|| UniversityMeta::fallback(university))
    }

    pub fn contains(&self, university: &str) -> bool {
        self.entries.contains_key(university)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the index from the metadata CSV.
pub fn build_index(path: &Path, schema: &MetaSchema) -> Result<UniversityIndex, LoadError> {
    let index = index_from_raw(read_csv(path)?, schema)?;
    log::info!(
        "Loaded metadata for {} universities from {}",
        index.len(),
        path.display()
    );
    Ok(index)
}

fn index_from_raw(raw: RawTable, schema: &MetaSchema) -> Result<UniversityIndex, LoadError> {
    let headers: Vec<String> = raw.headers.iter().map(|h| normalize_header(h)).collect();
    let required = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
            })
    };
    let key_col = required(&schema.university)?;
    let url_col = required(&schema.url)?;
    let desc_col = required(&schema.description)?;

    let mut entries = HashMap::new();
    for row in &raw.rows {
        let text = |idx: usize| {
            row.get(idx)
                .filter(|c| !c.is_blank())
                .and_then(|c| c.to_text())
        };
        let Some(name) = text(key_col) else {
            continue;
        };
        if entries.contains_key(&name) {
            log::warn!("Duplicate metadata entry for '{name}'; keeping the first");
            continue;
        }
        let meta = UniversityMeta {
            homepage_url: text(url_col).unwrap_or_else(|| "#".to_string()),
            description: text(desc_col).unwrap_or_else(|| name.clone()),
        };
        entries.insert(name, meta);
    }

    Ok(UniversityIndex { entries })
}

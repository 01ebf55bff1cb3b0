//! Immutable researcher catalog.
//!
//! Loaded once at startup from a JSON array. Research areas and statistics are normalized here,
//! once, so nothing downstream re-checks the raw shape. Strategies derive their per-record
//! representations from [`Catalog::records`] and refer to records by index.

pub mod error;
pub mod record;


pub use error::{CatalogError, CatalogResult};
pub use record::{Record, Statistics, flatten_research_areas};

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

/// The fixed set of researcher records available for matching.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Reads and normalizes the catalog file at `path`.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), records = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Parses a catalog from JSON text.
    pub fn from_json_str(raw: &str) -> CatalogResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Normalizes a parsed JSON array of raw records.
    pub fn from_value(value: Value) -> CatalogResult<Self> {
        let Value::Array(entries) = value else {
            return Err(CatalogError::NotAnArray);
        };

        let mut records = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            records.push(normalize_entry(index, entry)?);
        }
        Self::from_records(records)
    }

    /// Builds a catalog from already-normalized records.
    pub fn from_records(records: Vec<Record>) -> CatalogResult<Self> {
        let mut by_name = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(CatalogError::MissingName { index });
            }
            if by_name.insert(record.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateName {
                    name: record.name.clone(),
                    index,
                });
            }
        }
        Ok(Self { records, by_name })
    }

    /// All records in catalog order.
    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Exact-name lookup.
    pub fn get_by_name(&self, name: &str) -> Option<&Record> {
        self.index_of(name).map(|i| &self.records[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Research-area text per record, in catalog order (the vectorizer fit corpus).
    pub fn research_corpus(&self) -> Vec<String> {
        self.records.iter().map(Record::research_text).collect()
    }

    /// The first `n` records in catalog order, cloned.
    pub fn head(&self, n: usize) -> Vec<Record> {
        self.records.iter().take(n).cloned().collect()
    }
}

fn normalize_entry(index: usize, entry: Value) -> CatalogResult<Record> {
    let Value::Object(mut map) = entry else {
        return Err(CatalogError::MissingName { index });
    };

    let name = match map.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(CatalogError::MissingName { index }),
    };

    let research_areas = flatten_research_areas(map.remove("research_areas").as_ref());
    let statistics = Statistics::from_value(map.remove("statistics").as_ref());

    if research_areas.is_empty() {
        debug!(index, name = %name, "Record has no research areas");
    }

    Ok(Record {
        name,
        research_areas,
        statistics,
        extra: map,
    })
}

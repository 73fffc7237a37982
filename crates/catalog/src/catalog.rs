//! Catalog loading and lookup.

use crs_common::{CrsId, Region};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Default catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/crs.json");

/// Metadata for one catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsRecord {
    /// Region tag. Drives the compatibility check and area-of-interest
    /// selection.
    pub country: Region,

    /// Full display title.
    pub title: String,

    /// Abbreviated display title.
    pub title_short: String,

    /// Axis labels; axes beyond the CRS dimension are null.
    pub v1: Option<String>,
    pub v2: Option<String>,
    pub v3: Option<String>,
    pub v4: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog record for '{id}': {source}")]
    Record { id: String, source: serde_json::Error },
}

/// Immutable mapping from CRS identifier to its record.
///
/// Loaded once at process start; a load failure is a configuration error
/// that must abort startup, never a per-request condition. Lookups preserve
/// the insertion order of the backing JSON document.
#[derive(Debug, Clone)]
pub struct CrsCatalog {
    order: Vec<CrsId>,
    records: HashMap<CrsId, CrsRecord>,
}

impl CrsCatalog {
    /// Parse a catalog from a JSON document mapping identifiers to records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        // serde_json is built with preserve_order, so the map iterates in
        // document order.
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut order = Vec::with_capacity(raw.len());
        let mut records = HashMap::with_capacity(raw.len());

        for (key, value) in raw {
            let id = CrsId::new(&key);
            let record: CrsRecord =
                serde_json::from_value(value).map_err(|source| CatalogError::Record {
                    id: key.clone(),
                    source,
                })?;
            order.push(id.clone());
            records.insert(id, record);
        }

        Ok(Self { order, records })
    }

    /// Load a catalog from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            "Loaded {} CRS records from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn lookup(&self, id: &CrsId) -> Option<&CrsRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &CrsId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in catalog insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &CrsId> {
        self.order.iter()
    }

    /// Group identifiers by country, countries and identifiers both in
    /// first-encounter catalog order.
    pub fn index_by_country(&self) -> Vec<(Region, Vec<CrsId>)> {
        let mut index: Vec<(Region, Vec<CrsId>)> = Vec::new();

        for id in &self.order {
            let country = self.records[id].country;
            match index.iter_mut().find(|(region, _)| *region == country) {
                Some((_, ids)) => ids.push(id.clone()),
                None => index.push((country, vec![id.clone()])),
            }
        }

        index
    }
}

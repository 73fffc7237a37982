//! CRS-info response shapes and their enrichment chain.
//!
//! The published API grew in revisions: v1.0 returns the bare catalog
//! record, v1.1 adds the srid, area of use and bounding box, v1.2 adds the
//! axis units. Each revision is an explicit pure function over the previous
//! shape rather than a chain of handlers calling each other.

use crate::catalog::CrsRecord;
use crs_common::CrsId;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Engine-side (or secondary-registry) metadata about one CRS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrsMetadata {
    /// Human-readable name of the area of use, e.g. "Denmark - onshore".
    pub area_of_use: String,

    /// West, south, east, north in degrees.
    pub bounding_box: [f64; 4],

    /// Unit name per axis; axes beyond the CRS dimension are null.
    pub axis_units: [Option<String>; 4],
}

/// v1.0 response shape: the catalog record as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrsInfo {
    pub country: String,
    pub title: String,
    pub title_short: String,
    pub v1: Option<String>,
    pub v2: Option<String>,
    pub v3: Option<String>,
    pub v4: Option<String>,
}

impl CrsInfo {
    pub fn from_record(record: &CrsRecord) -> Self {
        Self {
            country: record.country.to_string(),
            title: record.title.clone(),
            title_short: record.title_short.clone(),
            v1: record.v1.clone(),
            v2: record.v2.clone(),
            v3: record.v3.clone(),
            v4: record.v4.clone(),
        }
    }

    /// v1.1 enrichment: attach the requested srid and the area of use.
    pub fn with_area_of_use(self, srid: &CrsId, meta: &CrsMetadata) -> CrsInfoWithArea {
        CrsInfoWithArea {
            base: self,
            srid: srid.to_string(),
            area_of_use: meta.area_of_use.clone(),
            bounding_box: meta.bounding_box,
        }
    }
}

/// v1.1 response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrsInfoWithArea {
    #[serde(flatten)]
    pub base: CrsInfo,
    pub srid: String,
    pub area_of_use: String,
    pub bounding_box: [f64; 4],
}

impl CrsInfoWithArea {
    /// v1.2 enrichment: attach the unit of each axis.
    pub fn with_units(self, meta: &CrsMetadata) -> CrsInfoFull {
        let [v1_unit, v2_unit, v3_unit, v4_unit] = meta.axis_units.clone();
        CrsInfoFull {
            inner: self,
            v1_unit,
            v2_unit,
            v3_unit,
            v4_unit,
        }
    }
}

/// v1.2 response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsInfoFull {
    pub inner: CrsInfoWithArea,
    pub v1_unit: Option<String>,
    pub v2_unit: Option<String>,
    pub v3_unit: Option<String>,
    pub v4_unit: Option<String>,
}

// The v1.2 document has always been published with its keys in sorted
// order, so the serialization spells them out instead of flattening.
impl Serialize for CrsInfoFull {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let base = &self.inner.base;
        let mut map = serializer.serialize_map(Some(14))?;
        map.serialize_entry("area_of_use", &self.inner.area_of_use)?;
        map.serialize_entry("bounding_box", &self.inner.bounding_box)?;
        map.serialize_entry("country", &base.country)?;
        map.serialize_entry("srid", &self.inner.srid)?;
        map.serialize_entry("title", &base.title)?;
        map.serialize_entry("title_short", &base.title_short)?;
        map.serialize_entry("v1", &base.v1)?;
        map.serialize_entry("v1_unit", &self.v1_unit)?;
        map.serialize_entry("v2", &base.v2)?;
        map.serialize_entry("v2_unit", &self.v2_unit)?;
        map.serialize_entry("v3", &base.v3)?;
        map.serialize_entry("v3_unit", &self.v3_unit)?;
        map.serialize_entry("v4", &base.v4)?;
        map.serialize_entry("v4_unit", &self.v4_unit)?;
        map.end()
    }
}

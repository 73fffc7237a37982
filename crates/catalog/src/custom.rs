//! Secondary registry for locally defined identifiers.
//!
//! The engine's own database does not know the historical Danish systems;
//! their area-of-use metadata is kept here and consulted only after an
//! engine lookup has failed.

use crate::enrich::CrsMetadata;
use crs_common::CrsId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CustomCrsRegistry {
    entries: HashMap<CrsId, CrsMetadata>,
}

fn metre_2d(area_of_use: &str, bounding_box: [f64; 4]) -> CrsMetadata {
    CrsMetadata {
        area_of_use: area_of_use.to_string(),
        bounding_box,
        axis_units: [Some("metre".into()), Some("metre".into()), None, None],
    }
}

impl Default for CustomCrsRegistry {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            CrsId::new("DK:S34J"),
            metre_2d("Denmark - Jutland onshore", [8.0, 54.5, 11.0, 57.75]),
        );
        entries.insert(
            CrsId::new("DK:S34S"),
            metre_2d("Denmark - Sealand onshore", [11.0, 54.5, 12.8, 56.5]),
        );
        entries.insert(
            CrsId::new("DK:S45B"),
            metre_2d("Denmark - Bornholm onshore", [14.6, 54.9, 15.2, 55.3]),
        );
        Self { entries }
    }
}

impl CustomCrsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self, id: &CrsId) -> Option<&CrsMetadata> {
        self.entries.get(id)
    }
}

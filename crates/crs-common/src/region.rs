//! Region tags and the cross-region transformation policy.

use crate::id::CrsId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic bounding box used to disambiguate between candidate
/// transformations covering the same CRS pair.
///
/// Coordinates are degrees, west/south/east/north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfInterest {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfInterest {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}

/// Region tag attached to every catalog entry.
///
/// Transformations are only meaningful within one region, or between a
/// regional CRS and a global one. The non-Global side owns the datum grids
/// that make a transformation unambiguous, so its bounding box is the one
/// handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "DK")]
    Denmark,
    #[serde(rename = "GL")]
    Greenland,
    Global,
}

/// Denmark onshore and nearshore.
const AOI_DENMARK: AreaOfInterest = AreaOfInterest::new(3.0, 54.5, 15.5, 58.0);

/// Greenland, including offshore.
const AOI_GREENLAND: AreaOfInterest = AreaOfInterest::new(-75.0, 56.0, 8.5, 87.5);

impl Region {
    /// Whether a transformation between CRS's of the two regions is allowed:
    /// the regions are equal, or either side is Global.
    pub fn compatible(self, other: Region) -> bool {
        self == other || self == Region::Global || other == Region::Global
    }

    /// The static bounding box for this region. Global has none.
    pub fn bounds(self) -> Option<AreaOfInterest> {
        match self {
            Region::Denmark => Some(AOI_DENMARK),
            Region::Greenland => Some(AOI_GREENLAND),
            Region::Global => None,
        }
    }

    /// The bounding box that disambiguates a transformation between the two
    /// regions: equal regions use their own box, a Global side defers to the
    /// regional side. A Global/Global pair has no constraint.
    pub fn area_of_interest(src: Region, dst: Region) -> Option<AreaOfInterest> {
        if src == dst {
            src.bounds()
        } else if src == Region::Global {
            dst.bounds()
        } else {
            src.bounds()
        }
    }

    /// The geographic CRS used as a transformation hub when a locally
    /// defined identifier from this region enters or leaves a pipeline.
    pub fn geographic_hub(self) -> Option<CrsId> {
        match self {
            Region::Denmark => Some(CrsId::new("EPSG:4258")),
            Region::Greenland => Some(CrsId::new("EPSG:4909")),
            Region::Global => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Region::Denmark => "DK",
            Region::Greenland => "GL",
            Region::Global => "Global",
        };
        write!(f, "{}", tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility() {
        assert!(Region::Denmark.compatible(Region::Denmark));
        assert!(Region::Denmark.compatible(Region::Global));
        assert!(Region::Global.compatible(Region::Greenland));
        assert!(Region::Global.compatible(Region::Global));
        assert!(!Region::Denmark.compatible(Region::Greenland));
        assert!(!Region::Greenland.compatible(Region::Denmark));
    }

    #[test]
    fn test_area_of_interest_same_region() {
        let aoi = Region::area_of_interest(Region::Denmark, Region::Denmark).unwrap();
        assert_eq!(aoi, AreaOfInterest::new(3.0, 54.5, 15.5, 58.0));
    }

    #[test]
    fn test_area_of_interest_prefers_regional_side() {
        // Global source defers to the regional destination.
        let aoi = Region::area_of_interest(Region::Global, Region::Greenland).unwrap();
        assert_eq!(aoi, AreaOfInterest::new(-75.0, 56.0, 8.5, 87.5));

        // Regional source wins over a global destination.
        let aoi = Region::area_of_interest(Region::Denmark, Region::Global).unwrap();
        assert_eq!(aoi, AreaOfInterest::new(3.0, 54.5, 15.5, 58.0));
    }

    #[test]
    fn test_area_of_interest_global_pair_unconstrained() {
        assert!(Region::area_of_interest(Region::Global, Region::Global).is_none());
    }

    #[test]
    fn test_geographic_hub() {
        assert_eq!(
            Region::Denmark.geographic_hub(),
            Some(CrsId::new("EPSG:4258"))
        );
        assert_eq!(
            Region::Greenland.geographic_hub(),
            Some(CrsId::new("EPSG:4909"))
        );
        assert_eq!(Region::Global.geographic_hub(), None);
    }

    #[test]
    fn test_serde_tags() {
        assert_eq!(
            serde_json::from_str::<Region>("\"DK\"").unwrap(),
            Region::Denmark
        );
        assert_eq!(
            serde_json::from_str::<Region>("\"Global\"").unwrap(),
            Region::Global
        );
        assert_eq!(serde_json::to_string(&Region::Greenland).unwrap(), "\"GL\"");
    }
}

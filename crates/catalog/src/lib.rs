//! The static CRS catalog: identifier metadata, the country index, the
//! CRS-info enrichment chain, and the secondary registry for locally
//! defined identifiers.

pub mod catalog;
pub mod custom;
pub mod enrich;

pub use catalog::{CatalogError, CrsCatalog, CrsRecord};
pub use custom::CustomCrsRegistry;
pub use enrich::{CrsInfo, CrsInfoFull, CrsInfoWithArea, CrsMetadata};

//! Common types shared across the coordinate transformation services.

pub mod coord;
pub mod error;
pub mod id;
pub mod region;

pub use coord::Coord;
pub use error::{TransError, TransResult};
pub use id::CrsId;
pub use region::{AreaOfInterest, Region};

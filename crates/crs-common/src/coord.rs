//! The canonical 4-component coordinate.

use crate::error::{TransError, TransResult};
use serde::Serialize;

/// A coordinate in its canonical 4-component form.
///
/// Components beyond the input dimension are explicitly absent, not
/// zero-filled: a 2D coordinate has no height, which is different from a
/// height of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    pub v1: f64,
    pub v2: f64,
    pub v3: Option<f64>,
    pub v4: Option<f64>,
}

impl Coord {
    pub fn new2(v1: f64, v2: f64) -> Self {
        Self {
            v1,
            v2,
            v3: None,
            v4: None,
        }
    }

    pub fn new3(v1: f64, v2: f64, v3: f64) -> Self {
        Self {
            v1,
            v2,
            v3: Some(v3),
            v4: None,
        }
    }

    pub fn new4(v1: f64, v2: f64, v3: f64, v4: f64) -> Self {
        Self {
            v1,
            v2,
            v3: Some(v3),
            v4: Some(v4),
        }
    }

    /// Normalize a variable-length component list to the canonical form.
    ///
    /// Accepts 2, 3 or 4 components; trailing components are marked absent.
    pub fn from_components(parts: &[f64]) -> TransResult<Self> {
        match *parts {
            [v1, v2] => Ok(Self::new2(v1, v2)),
            [v1, v2, v3] => Ok(Self::new3(v1, v2, v3)),
            [v1, v2, v3, v4] => Ok(Self::new4(v1, v2, v3, v4)),
            _ => Err(TransError::InvalidCoordinate(format!(
                "expected 2, 3 or 4 components, got {}",
                parts.len()
            ))),
        }
    }

    /// Number of present components.
    pub fn dimension(&self) -> usize {
        2 + usize::from(self.v3.is_some()) + usize::from(self.v4.is_some())
    }

    /// Whether any present component is positive or negative infinity.
    ///
    /// The engine signals a coordinate outside the valid domain of a
    /// transformation by producing infinite output components.
    pub fn has_infinite_component(&self) -> bool {
        self.v1.is_infinite()
            || self.v2.is_infinite()
            || self.v3.is_some_and(f64::is_infinite)
            || self.v4.is_some_and(f64::is_infinite)
    }
}

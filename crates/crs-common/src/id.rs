//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized CRS identifier of the form `AUTHORITY:CODE`.
///
/// Identifiers are upper-cased on construction so that lookups and cache
/// keys are case-insensitive. A code may be compound (`CODE1+CODE2`),
/// combining a horizontal and a vertical reference system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct CrsId(String);

impl CrsId {
    /// Create a normalized identifier from user input.
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_uppercase())
    }

    /// The authority prefix, e.g. "EPSG" in "EPSG:4326".
    ///
    /// Identifiers without a colon are treated as their own authority.
    pub fn authority(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// The code part after the authority prefix.
    pub fn code(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, code)) => code,
            None => &self.0,
        }
    }

    /// Whether the code combines a horizontal and a vertical CRS
    /// (e.g. "EPSG:25832+5799").
    pub fn is_compound(&self) -> bool {
        self.code().contains('+')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CrsId {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for CrsId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

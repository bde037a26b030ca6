//! # Unit Types
//!
//! Area wrappers for site-level coefficients. Regulatory retention rates are
//! quoted per hectare while site areas are measured in m², so the conversion
//! lives in one place. Both types serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::units::{Hectares, SqMeters};
//!
//! let site_ha: Hectares = SqMeters(25_000.0).into();
//! assert_eq!(site_ha.value(), 2.5);
//! ```

use serde::{Deserialize, Serialize};

/// Square meters in one hectare
pub const SQ_METERS_PER_HECTARE: f64 = 10_000.0;

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMeters(pub f64);

/// Area in hectares
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hectares(pub f64);

impl SqMeters {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Hectares {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<SqMeters> for Hectares {
    fn from(m2: SqMeters) -> Self {
        Hectares(m2.0 / SQ_METERS_PER_HECTARE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sq_meters_to_hectares() {
        let ha: Hectares = SqMeters(1000.0).into();
        assert_eq!(ha.value(), 0.1);
        assert_eq!(Hectares::from(SqMeters(0.0)), Hectares(0.0));
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&SqMeters(1234.5)).unwrap();
        assert_eq!(json, "1234.5");
    }
}

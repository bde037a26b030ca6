//! # Auxiliary Works
//!
//! Soil improvement and micro-piles reported alongside the wall. These do not
//! interact with any wall-body quantity.

use serde::{Deserialize, Serialize};

use crate::equations::micro_pile_total_length;
use crate::errors::{check_non_negative, CalcResult};

/// Optional auxiliary works entered with a wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuxiliaryWorks {
    /// Ground improvement plan area (m²)
    #[serde(default)]
    pub soil_improvement_area_m2: f64,

    /// Number of micro-piles
    #[serde(default)]
    pub micro_pile_count: u32,

    /// Length of each micro-pile (m)
    #[serde(default)]
    pub micro_pile_length_m: f64,
}

impl AuxiliaryWorks {
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("soil_improvement_area_m2", self.soil_improvement_area_m2)?;
        check_non_negative("micro_pile_length_m", self.micro_pile_length_m)
    }

    /// Aggregate for reporting. Items with zero quantity are omitted.
    pub fn summarize(&self) -> CalcResult<AuxiliaryWorksSummary> {
        self.validate()?;
        Ok(AuxiliaryWorksSummary {
            soil_improvement_area_m2: (self.soil_improvement_area_m2 > 0.0).then_some(self.soil_improvement_area_m2),
            micro_pile_total_length_m: (self.micro_pile_count > 0)
                .then(|| micro_pile_total_length(self.micro_pile_count, self.micro_pile_length_m)),
        })
    }
}

/// Reported auxiliary quantities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AuxiliaryWorksSummary {
    /// Soil improvement area when any is planned (m²)
    pub soil_improvement_area_m2: Option<f64>,
    /// Total micro-pile length when any piles are planned (m)
    pub micro_pile_total_length_m: Option<f64>,
}

impl AuxiliaryWorksSummary {
    pub fn is_empty(&self) -> bool {
        self.soil_improvement_area_m2.is_none() && self.micro_pile_total_length_m.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_works() {
        let summary = AuxiliaryWorks::default().summarize().unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_totals() {
        let works = AuxiliaryWorks {
            soil_improvement_area_m2: 450.0,
            micro_pile_count: 40,
            micro_pile_length_m: 9.0,
        };
        let summary = works.summarize().unwrap();
        assert_eq!(summary.soil_improvement_area_m2, Some(450.0));
        assert_eq!(summary.micro_pile_total_length_m, Some(360.0));
    }

    #[test]
    fn test_piles_with_zero_length_still_reported() {
        let works = AuxiliaryWorks {
            micro_pile_count: 5,
            ..Default::default()
        };
        assert_eq!(works.summarize().unwrap().micro_pile_total_length_m, Some(0.0));
    }

    #[test]
    fn test_negative_area_rejected() {
        let works = AuxiliaryWorks {
            soil_improvement_area_m2: -1.0,
            ..Default::default()
        };
        assert!(works.summarize().is_err());
    }
}

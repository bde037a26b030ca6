//! # Takeoff Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Wall track
//!
//! - [`geometry`] - Outer/inner run lengths from the centerline
//! - [`method`] - Construction methods and body quantities
//! - [`auxiliary`] - Soil improvement and micro-piles
//! - [`schedule`] - Guide wall and panel durations
//! - [`wall`] - The whole wall takeoff
//!
//! ## Earthworks track
//!
//! - [`sediment`] - Sediment retention pools
//! - [`spoil`] - Spoil buffer pits
//! - [`site_prep`] - Preparation schedule for pools and pits
//! - [`earthworks`] - Pools, pits and preparation together

pub mod auxiliary;
pub mod earthworks;
pub mod geometry;
pub mod method;
pub mod schedule;
pub mod sediment;
pub mod site_prep;
pub mod spoil;
pub mod wall;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcResult, CalcWarning};
use crate::project::GlobalSettings;

// Re-export commonly used types
pub use earthworks::{EarthworksInput, EarthworksResult};
pub use method::{CasingDiameter, ConstructionMethod, MethodKind};
pub use sediment::{SedimentPoolInput, SedimentPoolResult};
pub use site_prep::{PrepScheduleResult, PrepSettings};
pub use spoil::{SpoilPitInput, SpoilPitResult};
pub use wall::{WallInput, WallQuantityResult};

/// Emit each warning attached to a result.
pub(crate) fn log_warnings(context: &str, warnings: &[CalcWarning]) {
    for warning in warnings {
        tracing::warn!(context, code = warning.warning_code(), "{}", warning);
    }
}

/// Enum wrapper for all calculation types.
///
/// This allows storing heterogeneous calculations in a single collection
/// while maintaining type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Diaphragm wall takeoff and schedule
    Wall(WallInput),
    /// Sediment pools alone
    SedimentPool(SedimentPoolInput),
    /// Spoil pits alone
    SpoilPit(SpoilPitInput),
    /// Pools, pits and their preparation schedule
    Earthworks(EarthworksInput),
}

impl CalculationItem {
    /// Build an item from one JSON document.
    ///
    /// Wall method and length-mode problems come back as their own error
    /// kinds instead of a generic serialization error.
    pub fn from_value(value: serde_json::Value) -> CalcResult<Self> {
        if value.get("type").and_then(|t| t.as_str()) == Some("Wall") {
            wall::check_document(&value)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Wall(w) => &w.label,
            CalculationItem::SedimentPool(p) => &p.label,
            CalculationItem::SpoilPit(p) => &p.label,
            CalculationItem::Earthworks(e) => &e.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Wall(_) => "Wall",
            CalculationItem::SedimentPool(_) => "SedimentPool",
            CalculationItem::SpoilPit(_) => "SpoilPit",
            CalculationItem::Earthworks(_) => "Earthworks",
        }
    }

    /// Run the calculation with project settings.
    pub fn evaluate(&self, settings: &GlobalSettings) -> CalcResult<CalculationOutput> {
        Ok(match self {
            CalculationItem::Wall(input) => CalculationOutput::Wall(wall::calculate(input)?),
            CalculationItem::SedimentPool(input) => CalculationOutput::SedimentPool(sediment::calculate(input)?),
            CalculationItem::SpoilPit(input) => CalculationOutput::SpoilPit(spoil::calculate(input)?),
            CalculationItem::Earthworks(input) => {
                CalculationOutput::Earthworks(earthworks::calculate(input, &settings.prep)?)
            }
        })
    }
}

/// Result of evaluating a [`CalculationItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Wall(WallQuantityResult),
    SedimentPool(SedimentPoolResult),
    SpoilPit(SpoilPitResult),
    Earthworks(EarthworksResult),
}

impl CalculationOutput {
    /// Warnings from every stage of the result
    pub fn warnings(&self) -> Vec<&CalcWarning> {
        match self {
            CalculationOutput::Wall(r) => r.warnings.iter().collect(),
            CalculationOutput::SedimentPool(r) => r.warnings.iter().collect(),
            CalculationOutput::SpoilPit(r) => r.warnings.iter().collect(),
            CalculationOutput::Earthworks(r) => r
                .pool
                .warnings
                .iter()
                .chain(&r.pit.warnings)
                .chain(&r.prep.warnings)
                .collect(),
        }
    }
}

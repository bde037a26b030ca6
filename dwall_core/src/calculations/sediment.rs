//! # Sediment Pool Sizing
//!
//! Sizes temporary sediment retention pools for the disturbed site area.
//!
//! The required volume is the site area in hectares times the regulatory
//! coefficient. Two modes follow from whether a pool depth is given:
//!
//! - **Capacity check** (depth given): capacity of the planned pools is
//!   compared against the target volume, and the pool count needed at that
//!   size is recommended.
//! - **Depth recommendation** (no depth): the depth needed to hold the
//!   required volume over the planned count and footprint is back-calculated.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::sediment::{calculate, PoolConfig, PoolSizing, SedimentPoolInput, SiteParams};
//!
//! let input = SedimentPoolInput {
//!     label: "SP".to_string(),
//!     site: SiteParams { site_area_m2: 1000.0, avg_depth_m: 0.0 },
//!     pool: PoolConfig {
//!         regulatory_coefficient_m3_per_ha: 600.0,
//!         pool_count: 2,
//!         pool_length_m: 6.0,
//!         pool_width_m: 5.0,
//!         pool_depth_m: None,
//!         target_volume_m3: None,
//!     },
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.required_total_m3 - 60.0).abs() < 1e-9);
//! match result.sizing {
//!     PoolSizing::DepthRecommendation { required_depth } => {
//!         assert!((required_depth.value - 1.0).abs() < 1e-9);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::log_warnings;
use crate::equations::{pools_needed, rectangular_volume, required_retention_volume, uniform_depth, Equation, EquationTracker, GuardedValue};
use crate::errors::{check_count, check_non_negative, check_positive, count_from_f64, CalcResult, CalcWarning};

/// Pool depths above this are flagged as impractical (m)
pub const POOL_DEPTH_LIMIT_M: f64 = 3.0;

/// Site parameters shared by the earthworks calculations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteParams {
    /// Disturbed site area (m²)
    pub site_area_m2: f64,
    /// Average excavation depth over the site (m)
    #[serde(default)]
    pub avg_depth_m: f64,
}

impl SiteParams {
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("site_area_m2", self.site_area_m2)?;
        check_non_negative("avg_depth_m", self.avg_depth_m)
    }

    /// Total site excavation volume (m³)
    pub fn total_site_volume_m3(&self) -> f64 {
        self.site_area_m2 * self.avg_depth_m
    }
}

/// Planned sediment pools.
///
/// ## JSON Example
///
/// ```json
/// {
///   "regulatory_coefficient_m3_per_ha": 600.0,
///   "pool_count": 2,
///   "pool_length_m": 6.0,
///   "pool_width_m": 5.0,
///   "pool_depth_m": 2.0,
///   "target_volume_m3": null
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Required retention per hectare of disturbed area (m³/ha)
    pub regulatory_coefficient_m3_per_ha: f64,

    /// Number of pools planned
    pub pool_count: u32,

    /// Pool length (m)
    pub pool_length_m: f64,

    /// Pool width (m)
    pub pool_width_m: f64,

    /// Effective water depth below the outlet (m); None to back-calculate
    #[serde(default)]
    pub pool_depth_m: Option<f64>,

    /// Explicit target capacity (m³); overrides the site-derived requirement
    /// when greater than zero
    #[serde(default)]
    pub target_volume_m3: Option<f64>,
}

impl PoolConfig {
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("regulatory_coefficient_m3_per_ha", self.regulatory_coefficient_m3_per_ha)?;
        check_count("pool_count", self.pool_count)?;
        check_non_negative("pool_length_m", self.pool_length_m)?;
        check_non_negative("pool_width_m", self.pool_width_m)?;
        if let Some(depth) = self.pool_depth_m {
            check_positive("pool_depth_m", depth)?;
        }
        if let Some(target) = self.target_volume_m3 {
            check_non_negative("target_volume_m3", target)?;
        }
        Ok(())
    }

    /// Plan area of all pools (m²)
    pub fn total_footprint_m2(&self) -> f64 {
        f64::from(self.pool_count) * self.pool_length_m * self.pool_width_m
    }
}

/// Sediment pool request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SedimentPoolInput {
    /// User label (e.g., "SP-1", "East gate pools")
    pub label: String,
    pub site: SiteParams,
    pub pool: PoolConfig,
}

/// Outcome of comparing provided capacity against a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Compliance {
    /// Capacity meets the target
    Pass { surplus_m3: f64 },
    /// Capacity falls short of the target
    Fail { shortfall_m3: f64 },
    /// No target volume to check against
    NotEvaluated,
}

impl Compliance {
    /// Compare a provided capacity against a target. A zero target is not evaluated.
    pub fn evaluate(provided_m3: f64, target_m3: f64) -> Self {
        if target_m3 <= 0.0 {
            Compliance::NotEvaluated
        } else if provided_m3 >= target_m3 {
            Compliance::Pass {
                surplus_m3: provided_m3 - target_m3,
            }
        } else {
            Compliance::Fail {
                shortfall_m3: target_m3 - provided_m3,
            }
        }
    }

    pub fn passes(&self) -> bool {
        matches!(self, Compliance::Pass { .. })
    }
}

/// Mode-specific pool sizing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum PoolSizing {
    /// Pool depth was given
    CapacityCheck {
        /// Volume of one pool (m³)
        single_volume_m3: f64,
        /// Volume of all planned pools (m³)
        total_volume_m3: f64,
        /// Volume checked against (explicit target or site requirement)
        target_volume_m3: f64,
        compliance: Compliance,
        /// Pools of this size needed for the site requirement
        pools_needed: u32,
        /// Capacity of the recommended pool count (m³)
        recommended_total_m3: f64,
    },
    /// No depth given; depth back-calculated
    DepthRecommendation {
        /// Depth needed over the planned footprint (m)
        required_depth: GuardedValue,
    },
}

/// Results from sediment pool sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SedimentPoolResult {
    /// Site-derived retention requirement (m³)
    pub required_total_m3: f64,

    /// Plan area of the planned pools (m²)
    pub total_footprint_m2: f64,

    /// Planned pool count
    pub pool_count: u32,

    pub sizing: PoolSizing,

    /// Depth the pools are dug to: given depth, or the back-calculated one (m)
    pub design_depth_m: f64,

    /// Design depth exceeds the practical limit
    pub too_deep: bool,

    /// Volume dug for the planned pools (m³)
    pub excavated_volume_m3: f64,

    pub warnings: Vec<CalcWarning>,

    pub equations_used: Vec<Equation>,
}

impl SedimentPoolResult {
    /// Compliance in capacity-check mode
    pub fn compliance(&self) -> Option<Compliance> {
        match self.sizing {
            PoolSizing::CapacityCheck { compliance, .. } => Some(compliance),
            PoolSizing::DepthRecommendation { .. } => None,
        }
    }
}

/// Size sediment pools.
pub fn calculate(input: &SedimentPoolInput) -> CalcResult<SedimentPoolResult> {
    input.site.validate()?;
    input.pool.validate()?;

    let pool = &input.pool;
    tracing::debug!(
        label = %input.label,
        site_area_m2 = input.site.site_area_m2,
        coefficient = pool.regulatory_coefficient_m3_per_ha,
        pool_count = pool.pool_count,
        depth_given = pool.pool_depth_m.is_some(),
        "sizing sediment pools"
    );

    let mut tracker = EquationTracker::new();
    let mut warnings = Vec::new();
    let context = input.label.as_str();

    let required_total = required_retention_volume(input.site.site_area_m2, pool.regulatory_coefficient_m3_per_ha);
    tracker.record(Equation::RequiredRetentionVolume, context);

    let footprint = pool.total_footprint_m2();

    let (sizing, design_depth) = match pool.pool_depth_m {
        Some(depth) => {
            let single = rectangular_volume(pool.pool_length_m, pool.pool_width_m, depth);
            let total = single * f64::from(pool.pool_count);
            tracker.record(Equation::PoolCapacity, context);

            let target = pool
                .target_volume_m3
                .filter(|t| *t > 0.0)
                .unwrap_or(required_total);

            let needed = pools_needed(required_total, single);
            tracker.record(Equation::PoolsNeeded, context);
            if needed.guarded {
                warnings.push(CalcWarning::division_guarded("pools_needed", "single_volume_m3"));
            }
            let needed = count_from_f64("pools_needed", needed.value)?;

            (
                PoolSizing::CapacityCheck {
                    single_volume_m3: single,
                    total_volume_m3: total,
                    target_volume_m3: target,
                    compliance: Compliance::evaluate(total, target),
                    pools_needed: needed,
                    recommended_total_m3: f64::from(needed) * single,
                },
                depth,
            )
        }
        None => {
            let depth = uniform_depth(required_total, footprint);
            tracker.record(Equation::PoolDepth, context);
            if depth.guarded {
                warnings.push(CalcWarning::division_guarded("required_depth_m", "total_footprint_m2"));
            }
            (PoolSizing::DepthRecommendation { required_depth: depth }, depth.value)
        }
    };

    let too_deep = design_depth > POOL_DEPTH_LIMIT_M;
    if too_deep {
        warnings.push(CalcWarning::PoolTooDeep {
            depth_m: design_depth,
            limit_m: POOL_DEPTH_LIMIT_M,
        });
    }

    log_warnings(context, &warnings);

    Ok(SedimentPoolResult {
        required_total_m3: required_total,
        total_footprint_m2: footprint,
        pool_count: pool.pool_count,
        sizing,
        design_depth_m: design_depth,
        too_deep,
        excavated_volume_m3: footprint * design_depth,
        warnings,
        equations_used: tracker.unique_equations(),
    })
}

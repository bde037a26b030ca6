//! # Earthworks Track
//!
//! Sediment pools and spoil pits for one site, followed by the preparation
//! schedule built from their excavated volumes. Independent of the wall
//! track.

use serde::{Deserialize, Serialize};

use super::sediment::{self, PoolConfig, SedimentPoolInput, SedimentPoolResult, SiteParams};
use super::site_prep::{self, PrepScheduleResult, PrepSettings, SitePrepInput};
use super::spoil::{self, PitConfig, SpoilPitInput, SpoilPitResult};
use crate::errors::CalcResult;

/// Pools, pits and preparation for one site.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Main site",
///   "site": { "site_area_m2": 1000.0, "avg_depth_m": 2.0 },
///   "pool": { "regulatory_coefficient_m3_per_ha": 600.0, "pool_count": 2, "pool_length_m": 6.0, "pool_width_m": 5.0 },
///   "pit": { "daily_solid_volume_m3": 200.0, "swell_factor": 1.25, "truck_volume_m3": 10.0,
///            "max_trips": 20, "pit_count": 1, "pit_length_m": 6.0, "pit_width_m": 5.0 },
///   "prep": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthworksInput {
    pub label: String,
    pub site: SiteParams,
    pub pool: PoolConfig,
    pub pit: PitConfig,
    /// Overrides the project's preparation settings
    #[serde(default)]
    pub prep: Option<PrepSettings>,
}

impl EarthworksInput {
    pub fn pool_input(&self) -> SedimentPoolInput {
        SedimentPoolInput {
            label: format!("{} pools", self.label),
            site: self.site,
            pool: self.pool,
        }
    }

    pub fn pit_input(&self) -> SpoilPitInput {
        SpoilPitInput {
            label: format!("{} pits", self.label),
            site: self.site,
            pit: self.pit,
        }
    }
}

/// Results for the whole earthworks track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthworksResult {
    pub pool: SedimentPoolResult,
    pub pit: SpoilPitResult,
    pub prep: PrepScheduleResult,
}

impl EarthworksResult {
    /// Whether any stage reported a warning
    pub fn has_warnings(&self) -> bool {
        !(self.pool.warnings.is_empty() && self.pit.warnings.is_empty() && self.prep.warnings.is_empty())
    }
}

/// Size pools and pits, then schedule their preparation.
///
/// `defaults` apply unless the input carries its own `prep` settings.
pub fn calculate(input: &EarthworksInput, defaults: &PrepSettings) -> CalcResult<EarthworksResult> {
    tracing::debug!(label = %input.label, "calculating earthworks");

    let pool = sediment::calculate(&input.pool_input())?;
    let pit = spoil::calculate(&input.pit_input())?;

    let settings = input.prep.unwrap_or(*defaults);
    let prep = site_prep::calculate(&SitePrepInput::from_results(&pool, &pit, settings))?;

    Ok(EarthworksResult { pool, pit, prep })
}

//! # Spoil Pit Sizing
//!
//! Sizes temporary pits that buffer excavated spoil the trucks cannot haul
//! away the same day.
//!
//! Daily in-situ excavation bulks by the swell factor into loose spoil. The
//! portion above the daily haul capacity is the buffer, and the pit depth is
//! that buffer spread over the planned pit footprint.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::sediment::SiteParams;
//! use dwall_core::calculations::spoil::{calculate, PitConfig, SpoilPitInput};
//!
//! let input = SpoilPitInput {
//!     label: "Pit".to_string(),
//!     site: SiteParams { site_area_m2: 1000.0, avg_depth_m: 2.0 },
//!     pit: PitConfig {
//!         daily_solid_volume_m3: 200.0,
//!         swell_factor: 1.25,
//!         truck_volume_m3: 10.0,
//!         max_trips: 20,
//!         pit_count: 1,
//!         pit_length_m: 6.0,
//!         pit_width_m: 5.0,
//!     },
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.buffer_needed_m3 - 50.0).abs() < 1e-9);
//! assert!((result.required_depth.value - 1.667).abs() < 0.001);
//! assert_eq!(result.excavation_days.value, 10.0);
//! ```

use serde::{Deserialize, Serialize};

use super::log_warnings;
use super::sediment::SiteParams;
use crate::equations::{
    buffer_volume, daily_haul_capacity, daily_loose_volume, site_excavation_days, uniform_depth, Equation,
    EquationTracker, GuardedValue,
};
use crate::errors::{check_count, check_non_negative, CalcError, CalcResult, CalcWarning};

/// Pit depths above this are flagged as impractical (m)
pub const PIT_DEPTH_LIMIT_M: f64 = 2.5;

/// Spoil production, hauling and planned pits.
///
/// ## JSON Example
///
/// ```json
/// {
///   "daily_solid_volume_m3": 200.0,
///   "swell_factor": 1.25,
///   "truck_volume_m3": 10.0,
///   "max_trips": 20,
///   "pit_count": 1,
///   "pit_length_m": 6.0,
///   "pit_width_m": 5.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitConfig {
    /// In-situ excavation per day (m³)
    pub daily_solid_volume_m3: f64,

    /// Loose to in-situ volume ratio, at least 1.0
    pub swell_factor: f64,

    /// Loose capacity of one truck (m³)
    pub truck_volume_m3: f64,

    /// Truck trips allowed per day
    pub max_trips: u32,

    /// Number of pits planned
    pub pit_count: u32,

    /// Pit length (m)
    pub pit_length_m: f64,

    /// Pit width (m)
    pub pit_width_m: f64,
}

impl PitConfig {
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("daily_solid_volume_m3", self.daily_solid_volume_m3)?;
        if !self.swell_factor.is_finite() || self.swell_factor < 1.0 {
            return Err(CalcError::invalid_range(
                "swell_factor",
                self.swell_factor.to_string(),
                "Swell factor must be at least 1.0",
            ));
        }
        check_non_negative("truck_volume_m3", self.truck_volume_m3)?;
        check_count("pit_count", self.pit_count)?;
        check_non_negative("pit_length_m", self.pit_length_m)?;
        check_non_negative("pit_width_m", self.pit_width_m)
    }

    /// Plan area of all pits (m²)
    pub fn total_footprint_m2(&self) -> f64 {
        f64::from(self.pit_count) * self.pit_length_m * self.pit_width_m
    }
}

/// Spoil pit request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpoilPitInput {
    /// User label (e.g., "Pit A")
    pub label: String,
    pub site: SiteParams,
    pub pit: PitConfig,
}

/// Results from spoil pit sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpoilPitResult {
    /// Daily bulked spoil (m³)
    pub daily_loose_volume_m3: f64,

    /// Daily volume trucks can remove (m³)
    pub daily_haul_capacity_m3: f64,

    /// Daily spoil left on site, never negative (m³)
    pub buffer_needed_m3: f64,

    /// Plan area of the planned pits (m²)
    pub total_footprint_m2: f64,

    /// Depth needed to hold one day's buffer (m)
    pub required_depth: GuardedValue,

    /// Required depth exceeds the practical limit
    pub too_deep: bool,

    /// Volume dug for the planned pits (m³)
    pub excavated_volume_m3: f64,

    /// Site area × average depth (m³)
    pub total_site_volume_m3: f64,

    /// Whole days to excavate the site at the daily rate
    pub excavation_days: GuardedValue,

    pub warnings: Vec<CalcWarning>,

    pub equations_used: Vec<Equation>,
}

impl SpoilPitResult {
    /// Whether trucks keep up with production and no pit is needed
    pub fn hauling_keeps_up(&self) -> bool {
        self.buffer_needed_m3 <= 0.0
    }
}

/// Size spoil buffer pits.
pub fn calculate(input: &SpoilPitInput) -> CalcResult<SpoilPitResult> {
    input.site.validate()?;
    input.pit.validate()?;

    let pit = &input.pit;
    tracing::debug!(
        label = %input.label,
        daily_solid_m3 = pit.daily_solid_volume_m3,
        swell = pit.swell_factor,
        max_trips = pit.max_trips,
        pit_count = pit.pit_count,
        "sizing spoil pits"
    );

    let mut tracker = EquationTracker::new();
    let mut warnings = Vec::new();
    let context = input.label.as_str();

    let loose = daily_loose_volume(pit.daily_solid_volume_m3, pit.swell_factor);
    tracker.record(Equation::LooseVolume, context);

    let haul = daily_haul_capacity(pit.truck_volume_m3, pit.max_trips);
    tracker.record(Equation::HaulCapacity, context);

    let buffer = buffer_volume(loose, haul);
    tracker.record(Equation::BufferVolume, context);

    let footprint = pit.total_footprint_m2();
    let depth = uniform_depth(buffer, footprint);
    tracker.record(Equation::PitDepth, context);
    if depth.guarded {
        warnings.push(CalcWarning::division_guarded("required_depth_m", "total_footprint_m2"));
    }

    let too_deep = depth.value > PIT_DEPTH_LIMIT_M;
    if too_deep {
        warnings.push(CalcWarning::PitTooDeep {
            depth_m: depth.value,
            limit_m: PIT_DEPTH_LIMIT_M,
        });
    }

    let site_volume = input.site.total_site_volume_m3();
    let days = site_excavation_days(site_volume, pit.daily_solid_volume_m3);
    tracker.record(Equation::SiteExcavationDays, context);
    if days.guarded {
        warnings.push(CalcWarning::division_guarded("excavation_days", "daily_solid_volume_m3"));
    }

    log_warnings(context, &warnings);

    Ok(SpoilPitResult {
        daily_loose_volume_m3: loose,
        daily_haul_capacity_m3: haul,
        buffer_needed_m3: buffer,
        total_footprint_m2: footprint,
        required_depth: depth,
        too_deep,
        excavated_volume_m3: footprint * depth.value,
        total_site_volume_m3: site_volume,
        excavation_days: days,
        warnings,
        equations_used: tracker.unique_equations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> SpoilPitInput {
        SpoilPitInput {
            label: "Test Pit".to_string(),
            site: SiteParams {
                site_area_m2: 1000.0,
                avg_depth_m: 2.0,
            },
            pit: PitConfig {
                daily_solid_volume_m3: 200.0,
                swell_factor: 1.25,
                truck_volume_m3: 10.0,
                max_trips: 20,
                pit_count: 1,
                pit_length_m: 6.0,
                pit_width_m: 5.0,
            },
        }
    }

    #[test]
    fn test_spoil_scenario() {
        let result = calculate(&test_input()).unwrap();
        assert!((result.daily_loose_volume_m3 - 250.0).abs() < 1e-9);
        assert!((result.daily_haul_capacity_m3 - 200.0).abs() < 1e-9);
        assert!((result.buffer_needed_m3 - 50.0).abs() < 1e-9);
        assert!((result.required_depth.value - 1.667).abs() < 0.001);
        assert!(!result.too_deep);
        assert!((result.excavated_volume_m3 - 50.0).abs() < 1e-9);
        assert!((result.total_site_volume_m3 - 2000.0).abs() < 1e-9);
        assert_eq!(result.excavation_days.value, 10.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_hauling_keeps_up() {
        let mut input = test_input();
        input.pit.max_trips = 40;
        let result = calculate(&input).unwrap();
        assert_eq!(result.buffer_needed_m3, 0.0);
        assert_eq!(result.required_depth.value, 0.0);
        assert!(!result.required_depth.guarded);
        assert!(result.hauling_keeps_up());
    }

    #[test]
    fn test_too_deep() {
        let mut input = test_input();
        input.pit.max_trips = 10; // 150 m³ buffer over 30 m² = 5 m
        let result = calculate(&input).unwrap();
        assert!(result.too_deep);
        assert_eq!(
            result.warnings,
            vec![CalcWarning::PitTooDeep {
                depth_m: 5.0,
                limit_m: PIT_DEPTH_LIMIT_M
            }]
        );
    }

    #[test]
    fn test_zero_daily_volume_guards_days() {
        let mut input = test_input();
        input.pit.daily_solid_volume_m3 = 0.0;
        let result = calculate(&input).unwrap();
        assert!(result.excavation_days.guarded);
        assert_eq!(result.excavation_days.value, 0.0);
        assert_eq!(result.buffer_needed_m3, 0.0);
    }

    #[test]
    fn test_swell_below_one_rejected() {
        let mut input = test_input();
        input.pit.swell_factor = 0.9;
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_zero_pit_count_rejected() {
        let mut input = test_input();
        input.pit.pit_count = 0;
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_equations_recorded() {
        let result = calculate(&test_input()).unwrap();
        assert!(result.equations_used.contains(&Equation::BufferVolume));
        assert!(result.equations_used.contains(&Equation::SiteExcavationDays));
    }
}

//! # Wall Schedule
//!
//! Converts the wall run and productivity into guide wall days, panel days
//! and total duration. Guide wall construction finishes before panel
//! excavation starts; there is no overlap credit.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::method::ConstructionMethod;
//! use dwall_core::calculations::schedule::{estimate, ScheduleConfig};
//!
//! let config = ScheduleConfig {
//!     unit_standard_length_m: 6.0,
//!     days_per_unit: Some(3.0),
//!     machine_sets: 1,
//!     guide_wall_advance_rate_m_per_day: None,
//! };
//! let resolved = config.resolve(&ConstructionMethod::Standard).unwrap();
//! let est = estimate(120.0, &resolved).unwrap();
//!
//! assert_eq!(est.total_units, 20);
//! assert_eq!(est.panel_days, 60.0);
//! assert_eq!(est.guide_wall_days, 6.0);
//! assert_eq!(est.total_days, 66.0);
//! ```

use serde::{Deserialize, Serialize};

use super::method::ConstructionMethod;
use crate::equations::{average_daily_progress, guide_wall_days, panel_days, panel_unit_count, GuardedValue};
use crate::errors::{check_count, check_non_negative, count_from_f64, CalcResult, CalcWarning};

/// Standard panel length used when none is given (m)
pub const DEFAULT_UNIT_LENGTH_M: f64 = 6.0;

fn default_unit_length() -> f64 {
    DEFAULT_UNIT_LENGTH_M
}

fn default_machine_sets() -> u32 {
    1
}

/// Schedule parameters for the wall track.
///
/// Advance rate and panel cycle default to the construction method's values
/// when left as `None`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "unit_standard_length_m": 6.0,
///   "days_per_unit": null,
///   "machine_sets": 2,
///   "guide_wall_advance_rate_m_per_day": 15.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Standard panel length (m)
    #[serde(default = "default_unit_length")]
    pub unit_standard_length_m: f64,

    /// Days per panel cycle; method default when None
    #[serde(default)]
    pub days_per_unit: Option<f64>,

    /// Excavation rigs working in parallel
    #[serde(default = "default_machine_sets")]
    pub machine_sets: u32,

    /// Guide wall advance rate (m/day); method default when None
    #[serde(default)]
    pub guide_wall_advance_rate_m_per_day: Option<f64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            unit_standard_length_m: DEFAULT_UNIT_LENGTH_M,
            days_per_unit: None,
            machine_sets: 1,
            guide_wall_advance_rate_m_per_day: None,
        }
    }
}

impl ScheduleConfig {
    /// Fill method defaults and validate.
    ///
    /// Zero rates and lengths are accepted here; they are guarded in
    /// [`estimate`]. Machine sets must be at least one.
    pub fn resolve(&self, method: &ConstructionMethod) -> CalcResult<ResolvedSchedule> {
        let defaults = method.defaults();
        let resolved = ResolvedSchedule {
            unit_standard_length_m: self.unit_standard_length_m,
            days_per_unit: self.days_per_unit.unwrap_or(defaults.days_per_unit),
            machine_sets: self.machine_sets,
            advance_rate_m_per_day: self
                .guide_wall_advance_rate_m_per_day
                .unwrap_or(defaults.advance_rate_m_per_day),
        };
        resolved.validate()?;
        Ok(resolved)
    }
}

/// Schedule parameters with method defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSchedule {
    pub unit_standard_length_m: f64,
    pub days_per_unit: f64,
    pub machine_sets: u32,
    pub advance_rate_m_per_day: f64,
}

impl ResolvedSchedule {
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("unit_standard_length_m", self.unit_standard_length_m)?;
        check_non_negative("days_per_unit", self.days_per_unit)?;
        check_count("machine_sets", self.machine_sets)?;
        check_non_negative("guide_wall_advance_rate_m_per_day", self.advance_rate_m_per_day)
    }
}

/// Durations for the wall track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEstimate {
    /// Guide wall days, whole days
    pub guide_wall_days: f64,
    /// Number of standard panels
    pub total_units: u32,
    /// Panel days, fractional
    pub panel_days: f64,
    /// Guide wall plus panel days
    pub total_days: f64,
    /// Panels per day during panel works
    pub average_daily_progress: GuardedValue,
    pub warnings: Vec<CalcWarning>,
}

/// Estimate wall durations for a centerline run.
pub fn estimate(center_length_m: f64, schedule: &ResolvedSchedule) -> CalcResult<ScheduleEstimate> {
    check_non_negative("center_length_m", center_length_m)?;
    schedule.validate()?;

    let mut warnings = Vec::new();

    let guide = guide_wall_days(center_length_m, schedule.advance_rate_m_per_day);
    if guide.guarded {
        warnings.push(CalcWarning::division_guarded("guide_wall_days", "guide_wall_advance_rate_m_per_day"));
    }

    let units = panel_unit_count(center_length_m, schedule.unit_standard_length_m);
    if units.guarded {
        warnings.push(CalcWarning::division_guarded("total_units", "unit_standard_length_m"));
    }
    let total_units = count_from_f64("total_units", units.value)?;

    // machine_sets >= 1, so panel days never guard
    let panel = panel_days(f64::from(total_units), schedule.days_per_unit, schedule.machine_sets).value;

    let progress = average_daily_progress(f64::from(total_units), panel);
    if progress.guarded {
        warnings.push(CalcWarning::division_guarded("average_daily_progress", "panel_days"));
    }

    Ok(ScheduleEstimate {
        guide_wall_days: guide.value,
        total_units,
        panel_days: panel,
        total_days: guide.value + panel,
        average_daily_progress: progress,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::method::CasingDiameter;

    fn resolved(unit: f64, days: f64, sets: u32, advance: f64) -> ResolvedSchedule {
        ResolvedSchedule {
            unit_standard_length_m: unit,
            days_per_unit: days,
            machine_sets: sets,
            advance_rate_m_per_day: advance,
        }
    }

    #[test]
    fn test_scenario_schedule() {
        let est = estimate(120.0, &resolved(6.0, 3.0, 1, 20.0)).unwrap();
        assert_eq!(est.total_units, 20);
        assert!((est.panel_days - 60.0).abs() < 1e-9);
        assert!((est.average_daily_progress.value - 0.333).abs() < 0.001);
        assert!(!est.average_daily_progress.guarded);
        assert!(est.warnings.is_empty());
    }

    #[test]
    fn test_two_machine_sets_fractional() {
        // 125 m / 6 m = 21 units, × 3 days / 2 sets = 31.5
        let est = estimate(125.0, &resolved(6.0, 3.0, 2, 20.0)).unwrap();
        assert_eq!(est.total_units, 21);
        assert_eq!(est.panel_days, 31.5);
        assert_eq!(est.guide_wall_days, 7.0);
        assert_eq!(est.total_days, 38.5);
    }

    #[test]
    fn test_method_defaults_applied() {
        let casing = ConstructionMethod::AllCasing {
            casing_diameter: CasingDiameter::D1000,
            obstacle_depth_m: 2.0,
        };
        let r = ScheduleConfig::default().resolve(&casing).unwrap();
        assert_eq!(r.days_per_unit, 5.0);
        assert_eq!(r.advance_rate_m_per_day, 20.0);

        let deep = ConstructionMethod::DeepGuideWall { guide_depth_m: 2.0 };
        let r = ScheduleConfig::default().resolve(&deep).unwrap();
        assert_eq!(r.advance_rate_m_per_day, 10.0);
        assert_eq!(r.days_per_unit, 3.0);
    }

    #[test]
    fn test_overrides_win() {
        let config = ScheduleConfig {
            days_per_unit: Some(4.0),
            guide_wall_advance_rate_m_per_day: Some(12.0),
            ..Default::default()
        };
        let r = config.resolve(&ConstructionMethod::Standard).unwrap();
        assert_eq!(r.days_per_unit, 4.0);
        assert_eq!(r.advance_rate_m_per_day, 12.0);
    }

    #[test]
    fn test_zero_machine_sets_rejected() {
        let config = ScheduleConfig {
            machine_sets: 0,
            ..Default::default()
        };
        let err = config.resolve(&ConstructionMethod::Standard).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_zero_advance_rate_guarded() {
        let est = estimate(120.0, &resolved(6.0, 3.0, 1, 0.0)).unwrap();
        assert_eq!(est.guide_wall_days, 0.0);
        assert_eq!(est.panel_days, 60.0);
        assert_eq!(
            est.warnings,
            vec![CalcWarning::division_guarded("guide_wall_days", "guide_wall_advance_rate_m_per_day")]
        );
    }

    #[test]
    fn test_zero_length_progress_guarded() {
        let est = estimate(0.0, &resolved(6.0, 3.0, 1, 20.0)).unwrap();
        assert_eq!(est.total_units, 0);
        assert_eq!(est.total_days, 0.0);
        assert!(est.average_daily_progress.guarded);
        assert_eq!(est.average_daily_progress.value, 0.0);
    }

    #[test]
    fn test_unit_count_beyond_range_rejected() {
        // 1e7 m / 0.001 m = 1e10 panels
        let err = estimate(1.0e7, &resolved(0.001, 3.0, 1, 20.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RANGE");
        assert!(err.to_string().contains("total_units"));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: ScheduleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScheduleConfig::default());
    }
}

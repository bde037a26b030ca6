//! # Site Preparation Schedule
//!
//! Duration of the temporary earthworks that precede the wall: digging and
//! installing sediment pools, then digging spoil pits. Pools and pits are
//! scheduled one after the other.

use serde::{Deserialize, Serialize};

use super::log_warnings;
use super::sediment::SedimentPoolResult;
use super::spoil::SpoilPitResult;
use crate::equations::{ceil_whole, dig_days, Equation, EquationTracker};
use crate::errors::{check_count, check_non_negative, CalcResult, CalcWarning};

/// Small excavator output used for temporary works when none is given (m³/day)
pub const DEFAULT_SMALL_EXCAVATION_RATE_M3_PER_DAY: f64 = 50.0;

/// Days to install one pool when none is given
pub const DEFAULT_INSTALL_DAYS_PER_POOL: f64 = 1.0;

fn default_rate() -> f64 {
    DEFAULT_SMALL_EXCAVATION_RATE_M3_PER_DAY
}

fn default_install_days() -> f64 {
    DEFAULT_INSTALL_DAYS_PER_POOL
}

/// Productivity settings for temporary works.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrepSettings {
    /// Small excavator output (m³/day)
    #[serde(default = "default_rate")]
    pub small_excavation_rate_m3_per_day: f64,

    /// Days to install one pool
    #[serde(default = "default_install_days")]
    pub install_days_per_pool: f64,
}

impl Default for PrepSettings {
    fn default() -> Self {
        PrepSettings {
            small_excavation_rate_m3_per_day: DEFAULT_SMALL_EXCAVATION_RATE_M3_PER_DAY,
            install_days_per_pool: DEFAULT_INSTALL_DAYS_PER_POOL,
        }
    }
}

impl PrepSettings {
    /// Replace whichever values are given.
    pub fn apply_overrides(&mut self, rate_m3_per_day: Option<f64>, install_days: Option<f64>) {
        if let Some(rate) = rate_m3_per_day {
            self.small_excavation_rate_m3_per_day = rate;
        }
        if let Some(days) = install_days {
            self.install_days_per_pool = days;
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("small_excavation_rate_m3_per_day", self.small_excavation_rate_m3_per_day)?;
        check_non_negative("install_days_per_pool", self.install_days_per_pool)
    }
}

/// Input to the preparation schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SitePrepInput {
    /// Excavation for all sediment pools (m³)
    pub pool_excavated_volume_m3: f64,

    /// Number of sediment pools
    pub pool_count: u32,

    /// Excavation for all spoil pits (m³)
    pub pit_excavated_volume_m3: f64,

    #[serde(flatten)]
    pub settings: PrepSettings,
}

impl SitePrepInput {
    /// Build from sized pools and pits.
    pub fn from_results(pools: &SedimentPoolResult, pits: &SpoilPitResult, settings: PrepSettings) -> Self {
        SitePrepInput {
            pool_excavated_volume_m3: pools.excavated_volume_m3,
            pool_count: pools.pool_count,
            pit_excavated_volume_m3: pits.excavated_volume_m3,
            settings,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("pool_excavated_volume_m3", self.pool_excavated_volume_m3)?;
        check_count("pool_count", self.pool_count)?;
        check_non_negative("pit_excavated_volume_m3", self.pit_excavated_volume_m3)?;
        self.settings.validate()
    }
}

/// Preparation durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepScheduleResult {
    /// Pool digging, fractional days
    pub pool_dig_days: f64,
    /// Pool installation days
    pub pool_setup_days: f64,
    /// Pools, whole days
    pub total_pool_days: f64,
    /// Pit digging, fractional days
    pub pit_dig_days: f64,
    /// Pits, whole days
    pub total_pit_days: f64,
    /// Pools then pits, whole days
    pub total_prep_days: f64,
    pub warnings: Vec<CalcWarning>,
    pub equations_used: Vec<Equation>,
}

/// Schedule pool and pit preparation.
///
/// ## Example
///
/// ```rust
/// use dwall_core::calculations::site_prep::{calculate, PrepSettings, SitePrepInput};
///
/// let input = SitePrepInput {
///     pool_excavated_volume_m3: 60.0,
///     pool_count: 2,
///     pit_excavated_volume_m3: 50.0,
///     settings: PrepSettings::default(),
/// };
/// let result = calculate(&input).unwrap();
/// // ceil(1.2 + 2) + ceil(1.0)
/// assert_eq!(result.total_pool_days, 4.0);
/// assert_eq!(result.total_pit_days, 1.0);
/// assert_eq!(result.total_prep_days, 5.0);
/// ```
pub fn calculate(input: &SitePrepInput) -> CalcResult<PrepScheduleResult> {
    input.validate()?;

    let rate = input.settings.small_excavation_rate_m3_per_day;
    tracing::debug!(
        pool_volume_m3 = input.pool_excavated_volume_m3,
        pool_count = input.pool_count,
        pit_volume_m3 = input.pit_excavated_volume_m3,
        rate_m3_per_day = rate,
        "scheduling site preparation"
    );

    let mut tracker = EquationTracker::new();
    let mut warnings = Vec::new();
    let context = "site preparation";

    let pool_dig = dig_days(input.pool_excavated_volume_m3, rate);
    if pool_dig.guarded {
        warnings.push(CalcWarning::division_guarded("pool_dig_days", "small_excavation_rate_m3_per_day"));
    }
    let pool_setup = f64::from(input.pool_count) * input.settings.install_days_per_pool;
    let total_pool = ceil_whole(pool_dig.value + pool_setup);
    tracker.record(Equation::PoolPrepDays, context);

    let pit_dig = dig_days(input.pit_excavated_volume_m3, rate);
    if pit_dig.guarded {
        warnings.push(CalcWarning::division_guarded("pit_dig_days", "small_excavation_rate_m3_per_day"));
    }
    let total_pit = ceil_whole(pit_dig.value);
    tracker.record(Equation::PitPrepDays, context);

    tracker.record(Equation::TotalPrepDays, context);
    log_warnings(context, &warnings);

    Ok(PrepScheduleResult {
        pool_dig_days: pool_dig.value,
        pool_setup_days: pool_setup,
        total_pool_days: total_pool,
        pit_dig_days: pit_dig.value,
        total_pit_days: total_pit,
        total_prep_days: total_pool + total_pit,
        warnings,
        equations_used: tracker.unique_equations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_input() -> SitePrepInput {
        SitePrepInput {
            pool_excavated_volume_m3: 60.0,
            pool_count: 2,
            pit_excavated_volume_m3: 50.0,
            settings: PrepSettings::default(),
        }
    }

    #[test]
    fn test_sequential_total() {
        let result = calculate(&test_input()).unwrap();
        assert!((result.pool_dig_days - 1.2).abs() < 1e-9);
        assert_eq!(result.pool_setup_days, 2.0);
        assert_eq!(result.total_pool_days, 4.0);
        assert_eq!(result.pit_dig_days, 1.0);
        assert_eq!(result.total_pit_days, 1.0);
        assert_eq!(result.total_prep_days, 5.0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_pool_rounding_after_sum() {
        // ceil(0.6) + ceil(0.4) would be 2; summed first it is 1
        let input = SitePrepInput {
            pool_excavated_volume_m3: 30.0,
            pool_count: 1,
            settings: PrepSettings {
                small_excavation_rate_m3_per_day: 50.0,
                install_days_per_pool: 0.4,
            },
            ..test_input()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_pool_days, 1.0);
    }

    #[test]
    fn test_zero_rate_guarded() {
        let mut input = test_input();
        input.settings.small_excavation_rate_m3_per_day = 0.0;
        let result = calculate(&input).unwrap();
        assert_eq!(result.pool_dig_days, 0.0);
        assert_eq!(result.total_pool_days, 2.0);
        assert_eq!(result.total_pit_days, 0.0);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: PrepSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PrepSettings::default());
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut input = test_input();
        input.pit_excavated_volume_m3 = -5.0;
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_DIMENSION");
    }

    #[test]
    fn test_apply_overrides() {
        let mut settings = PrepSettings::default();
        settings.apply_overrides(None, Some(2.5));
        assert_eq!(settings.small_excavation_rate_m3_per_day, DEFAULT_SMALL_EXCAVATION_RATE_M3_PER_DAY);
        assert_eq!(settings.install_days_per_pool, 2.5);
        settings.apply_overrides(Some(75.0), None);
        assert_eq!(settings.small_excavation_rate_m3_per_day, 75.0);
    }
}

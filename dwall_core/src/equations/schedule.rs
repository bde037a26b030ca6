//! # Schedule Formulas
//!
//! Panel counts and durations for the wall track. Guide wall construction
//! completes before panel excavation starts, so durations add.

use super::{ceil_whole, guarded_ratio, GuardedValue};

/// Guide wall construction days, rounded up to whole days.
///
/// # Formula
/// T_guide = ⌈Lc / r_adv⌉
///
/// Guarded to 0 when the advance rate is zero.
#[inline]
pub fn guide_wall_days(center_length: f64, advance_rate: f64) -> GuardedValue {
    guarded_ratio(center_length, advance_rate).map(ceil_whole)
}

/// Number of standard panel units along the run.
///
/// # Formula
/// N = ⌈Lc / L_unit⌉
///
/// An exact multiple gives exactly `Lc / L_unit` units.
///
/// # Example
/// ```rust
/// use dwall_core::equations::schedule::panel_unit_count;
///
/// assert_eq!(panel_unit_count(120.0, 6.0).value, 20.0);
/// assert_eq!(panel_unit_count(121.0, 6.0).value, 21.0);
/// ```
#[inline]
pub fn panel_unit_count(center_length: f64, unit_length: f64) -> GuardedValue {
    guarded_ratio(center_length, unit_length).map(ceil_whole)
}

/// Panel excavation and concreting days. Not rounded.
///
/// # Formula
/// T_panel = N × T_cycle / sets
#[inline]
pub fn panel_days(units: f64, days_per_unit: f64, machine_sets: u32) -> GuardedValue {
    guarded_ratio(units * days_per_unit, f64::from(machine_sets))
}

/// Average panels completed per day.
///
/// # Formula
/// p = N / T_panel
#[inline]
pub fn average_daily_progress(units: f64, panel_days: f64) -> GuardedValue {
    guarded_ratio(units, panel_days)
}

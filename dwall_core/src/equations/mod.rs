//! # Takeoff Equations
//!
//! This module contains every formula used by the calculations. Having the
//! equations in one place enables:
//! - Easy verification against hand calculations
//! - Documentation of assumptions and heuristics
//! - Consistent implementation across calculation types
//!
//! ## Modules
//!
//! - [`wall`] - Wall geometry and wall-body quantities (volume, concrete, area)
//! - [`schedule`] - Panel counts and durations
//! - [`earthworks`] - Sediment pool and spoil pit sizing
//! - [`registry`] - Equation metadata and tracking for audit output
//!
//! ## Conventions
//!
//! - All lengths in meters, areas in m², volumes in m³, durations in working days
//! - Ratios with a caller-supplied denominator return a [`GuardedValue`]
//!   instead of dividing by zero

pub mod earthworks;
pub mod registry;
pub mod schedule;
pub mod wall;

use serde::{Deserialize, Serialize};

// Re-export commonly used items
pub use wall::{
    casing_aux_volume,
    concrete_volume,
    corner_adjusted_lengths,
    deep_guide_aux_volume,
    excavation_volume,
    micro_pile_total_length,
    wall_area,
};

pub use schedule::{
    average_daily_progress,
    guide_wall_days,
    panel_days,
    panel_unit_count,
};

pub use earthworks::{
    buffer_volume,
    daily_haul_capacity,
    daily_loose_volume,
    dig_days,
    pools_needed,
    rectangular_volume,
    required_retention_volume,
    site_excavation_days,
    uniform_depth,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};

/// Relative tolerance used when rounding a quotient up to whole units.
///
/// `4.35 / 1.45` evaluates to `3.0000000000000004`; without the tolerance it
/// would round up to 4 units.
const CEIL_TOLERANCE: f64 = 1e-9;

/// A ratio that may have been guarded against a zero denominator.
///
/// When `guarded` is true the denominator was zero (or not positive) and
/// `value` is 0.0 by definition, not by arithmetic.
///
/// ```rust
/// use dwall_core::equations::guarded_ratio;
///
/// let ok = guarded_ratio(60.0, 60.0);
/// assert_eq!(ok.value, 1.0);
/// assert!(!ok.guarded);
///
/// let degenerate = guarded_ratio(60.0, 0.0);
/// assert_eq!(degenerate.value, 0.0);
/// assert!(degenerate.guarded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GuardedValue {
    /// The computed value, or 0.0 when guarded
    pub value: f64,
    /// True if the denominator was zero and the value was substituted
    pub guarded: bool,
}

impl GuardedValue {
    /// A value computed normally
    pub fn computed(value: f64) -> Self {
        GuardedValue { value, guarded: false }
    }

    /// The substituted zero for a degenerate denominator
    pub fn guarded_zero() -> Self {
        GuardedValue { value: 0.0, guarded: true }
    }

    /// Apply a function to the value, keeping the guard flag
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        if self.guarded {
            self
        } else {
            GuardedValue::computed(f(self.value))
        }
    }
}

/// Divide `numerator` by `denominator`, guarding non-positive denominators.
#[inline]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> GuardedValue {
    if denominator > 0.0 && denominator.is_finite() {
        GuardedValue::computed(numerator / denominator)
    } else {
        GuardedValue::guarded_zero()
    }
}

/// Round up to the next whole number, ignoring floating-point noise.
///
/// A quotient within a relative 1e-9 of an integer is treated as that
/// integer, so an exact multiple never gains an extra unit.
#[inline]
pub fn ceil_whole(x: f64) -> f64 {
    let nearest = x.round();
    if (x - nearest).abs() <= CEIL_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        x.ceil()
    }
}

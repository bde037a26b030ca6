//! # Earthworks Formulas
//!
//! Sizing of temporary works that run alongside the wall: sediment retention
//! pools and spoil buffer pits.
//!
//! ## Notation
//!
//! - `A_site` = Disturbed site area (m²)
//! - `k` = Regulatory retention coefficient (m³ per hectare)
//! - `L`, `W`, `H` = Pool or pit length, width, depth
//! - `n` = Pool or pit count
//! - `V_s` = Daily in-situ ("solid") excavation volume
//! - `s` = Swell factor (loose / in-situ volume)

use super::{ceil_whole, guarded_ratio, GuardedValue};
use crate::units::{Hectares, SqMeters};

// =============================================================================
// SEDIMENT POOLS
// =============================================================================

/// Volume of a rectangular basin.
///
/// # Formula
/// V = L × W × H
#[inline]
pub fn rectangular_volume(length: f64, width: f64, depth: f64) -> f64 {
    length * width * depth
}

/// Required sediment retention volume for a disturbed area.
///
/// The coefficient is specified per hectare, so the site area is converted
/// from m² first.
///
/// # Formula
/// V_req = (A_site / 10,000) × k
///
/// # Example
/// ```rust
/// use dwall_core::equations::earthworks::required_retention_volume;
///
/// // 1,000 m² at 600 m³/ha
/// assert!((required_retention_volume(1000.0, 600.0) - 60.0).abs() < 1e-9);
/// ```
#[inline]
pub fn required_retention_volume(site_area_m2: f64, coefficient_m3_per_ha: f64) -> f64 {
    let site_ha: Hectares = SqMeters(site_area_m2).into();
    site_ha.value() * coefficient_m3_per_ha
}

/// Number of pools needed to hold the required volume.
///
/// # Formula
/// n = ⌈V_req / V_single⌉
///
/// The result always satisfies `n × V_single ≥ V_req`: the tolerant
/// ceiling is bumped up when it would leave the requirement uncovered.
pub fn pools_needed(required_volume: f64, single_pool_volume: f64) -> GuardedValue {
    guarded_ratio(required_volume, single_pool_volume).map(|ratio| {
        let mut n = ceil_whole(ratio);
        if n * single_pool_volume < required_volume {
            n = ratio.ceil();
        }
        if n * single_pool_volume < required_volume {
            n += 1.0;
        }
        n
    })
}

/// Uniform depth that stores a volume over a footprint.
///
/// # Formula
/// H = V / A_footprint
#[inline]
pub fn uniform_depth(volume: f64, footprint_area: f64) -> GuardedValue {
    guarded_ratio(volume, footprint_area)
}

// =============================================================================
// SPOIL PITS
// =============================================================================

/// Daily loose (bulked) spoil volume.
///
/// # Formula
/// V_loose = V_s × s
#[inline]
pub fn daily_loose_volume(daily_solid_volume: f64, swell_factor: f64) -> f64 {
    daily_solid_volume * swell_factor
}

/// Daily hauling capacity off site.
///
/// # Formula
/// V_haul = V_truck × trips
#[inline]
pub fn daily_haul_capacity(truck_volume: f64, max_trips: u32) -> f64 {
    truck_volume * f64::from(max_trips)
}

/// Daily loose volume that cannot be hauled and must be buffered.
///
/// # Formula
/// V_buf = max(0, V_loose - V_haul)
#[inline]
pub fn buffer_volume(loose_volume: f64, haul_capacity: f64) -> f64 {
    (loose_volume - haul_capacity).max(0.0)
}

/// Working days to excavate the whole site at the daily solid rate.
///
/// # Formula
/// T = ⌈V_site / V_s⌉
#[inline]
pub fn site_excavation_days(total_site_volume: f64, daily_solid_volume: f64) -> GuardedValue {
    guarded_ratio(total_site_volume, daily_solid_volume).map(ceil_whole)
}

// =============================================================================
// SITE PREPARATION
// =============================================================================

/// Days to dig a temporary basin with a small excavator. Not rounded.
///
/// # Formula
/// T_dig = V / r_small
#[inline]
pub fn dig_days(volume: f64, small_excavation_rate: f64) -> GuardedValue {
    guarded_ratio(volume, small_excavation_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_pool_depth_scenario() {
        // 1,000 m² at 600 m³/ha, two 6 × 5 pools
        let required = required_retention_volume(1000.0, 600.0);
        assert!((required - 60.0).abs() < EPS);
        let footprint = 2.0 * 6.0 * 5.0;
        assert!((uniform_depth(required, footprint).value - 1.0).abs() < EPS);
    }

    #[test]
    fn test_pools_needed_covers_requirement() {
        let single = rectangular_volume(5.0, 3.0, 2.0);
        for required in [0.0, 1.0, 29.9, 30.0, 30.1, 61.0, 1234.5] {
            let n = pools_needed(required, single);
            assert!(!n.guarded);
            assert!(n.value * single >= required);
        }
    }

    #[test]
    fn test_pools_needed_just_above_a_multiple() {
        // 30.000000015 / 30 is within the ceiling tolerance of 1
        let single = rectangular_volume(6.0, 5.0, 1.0);
        let required = required_retention_volume(500.000_000_25, 600.0);
        let n = pools_needed(required, single);
        assert_eq!(n.value, 2.0);
        assert!(n.value * single >= required);
    }

    #[test]
    fn test_pools_needed_large_ratios() {
        for (required, single) in [(6.0e7, 1.0e-6), (1.0e9 + 1.0, 3.0), (123_456_789.0, 0.7)] {
            let n = pools_needed(required, single);
            assert!(n.value * single >= required);
        }
    }

    #[test]
    fn test_spoil_scenario() {
        let loose = daily_loose_volume(200.0, 1.25);
        let haul = daily_haul_capacity(10.0, 20);
        assert!((loose - 250.0).abs() < EPS);
        assert!((haul - 200.0).abs() < EPS);
        let buffer = buffer_volume(loose, haul);
        assert!((buffer - 50.0).abs() < EPS);
        assert!((uniform_depth(buffer, 30.0).value - 1.667).abs() < 0.001);
    }

    #[test]
    fn test_buffer_never_negative() {
        for (loose, haul) in [(100.0, 400.0), (0.0, 0.0), (250.0, 250.0), (0.0, 10.0)] {
            assert!(buffer_volume(loose, haul) >= 0.0);
        }
    }

    #[test]
    fn test_site_excavation_days() {
        assert_eq!(site_excavation_days(2000.0, 200.0).value, 10.0);
        assert_eq!(site_excavation_days(2001.0, 200.0).value, 11.0);
        assert!(site_excavation_days(2000.0, 0.0).guarded);
    }
}

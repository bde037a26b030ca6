//! # Wall Geometry and Body Formulas
//!
//! Quantities for a continuous diaphragm wall built panel by panel in a
//! slurry-supported trench.
//!
//! ## Notation
//!
//! - `Lc` = Centerline run length
//! - `t` = Wall thickness
//! - `D` = Wall depth (below guide wall top)
//! - `n` = Number of right-angle corners along the run
//! - `Hg` = Guide wall depth
//! - `Ho` = Obstacle depth removed by casing
//!
//! ## Plan View
//!
//! ```text
//!   outer face  ─────────────────────┐
//!   centerline  ───────────────────┐ │
//!   inner face  ─────────────────┐ │ │
//!                                │ │ │   t = face-to-face thickness
//! ```

// =============================================================================
// RUN LENGTHS
// =============================================================================

/// Outer and inner face run lengths from the centerline.
///
/// Each right-angle corner adds one wall thickness to the outer face and
/// removes one from the inner face. This is a linear heuristic, not a true
/// miter offset.
///
/// # Formulas
/// - L_outer = Lc + n·t
/// - L_inner = Lc - n·t
///
/// The inner value may be negative when `n·t > Lc`; callers decide how to
/// report that.
///
/// # Returns
/// (outer, inner) in meters
///
/// # Example
/// ```rust
/// use dwall_core::equations::wall::corner_adjusted_lengths;
///
/// let (outer, inner) = corner_adjusted_lengths(120.0, 4, 0.8);
/// assert!((outer - 123.2).abs() < 1e-9);
/// assert!((inner - 116.8).abs() < 1e-9);
/// ```
#[inline]
pub fn corner_adjusted_lengths(center_length: f64, corner_count: u32, thickness: f64) -> (f64, f64) {
    let offset = f64::from(corner_count) * thickness;
    (center_length + offset, center_length - offset)
}

// =============================================================================
// WALL BODY
// =============================================================================

/// Theoretical trench excavation volume.
///
/// # Formula
/// V = Lc × t × D
#[inline]
pub fn excavation_volume(center_length: f64, thickness: f64, depth: f64) -> f64 {
    center_length * thickness * depth
}

/// Concrete demand including placement loss (overbreak, tremie waste).
///
/// # Formula
/// V_c = V × (1 + loss/100)
///
/// # Arguments
/// * `excavation_volume` - Theoretical volume (m³)
/// * `loss_rate_pct` - Loss allowance in percent (0–30)
#[inline]
pub fn concrete_volume(excavation_volume: f64, loss_rate_pct: f64) -> f64 {
    excavation_volume * (1.0 + loss_rate_pct / 100.0)
}

/// Vertical wall face area.
///
/// # Formula
/// A = Lc × D
#[inline]
pub fn wall_area(center_length: f64, depth: f64) -> f64 {
    center_length * depth
}

// =============================================================================
// METHOD AUXILIARY EXCAVATION
// =============================================================================

/// Total over-excavation allowance beyond wall thickness for a deep guide wall (m)
pub const DEEP_GUIDE_OVERDIG_M: f64 = 1.0;

/// Extra excavation for a deep guide wall.
///
/// The guide trench is dug wider than the wall by a 1 m total allowance
/// (0.5 m each side) down to the guide depth.
///
/// # Formula
/// V_aux = Lc × (t + 1.0) × Hg
#[inline]
pub fn deep_guide_aux_volume(center_length: f64, thickness: f64, guide_depth: f64) -> f64 {
    center_length * (thickness + DEEP_GUIDE_OVERDIG_M) * guide_depth
}

/// Obstacle removal volume for the all-casing method.
///
/// Casing bores clear buried obstructions along the wall footprint down to
/// the obstacle depth.
///
/// # Formula
/// V_aux = Lc × t × Ho
#[inline]
pub fn casing_aux_volume(center_length: f64, thickness: f64, obstacle_depth: f64) -> f64 {
    center_length * thickness * obstacle_depth
}

// =============================================================================
// AUXILIARY WORKS
// =============================================================================

/// Total micro-pile length.
///
/// # Formula
/// L_mp = N × L_pile
#[inline]
pub fn micro_pile_total_length(count: u32, length: f64) -> f64 {
    f64::from(count) * length
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_body_quantities() {
        // L=120, t=0.8, D=30, loss 10%
        let v = excavation_volume(120.0, 0.8, 30.0);
        assert!((v - 2880.0).abs() < EPS);
        assert!((concrete_volume(v, 10.0) - 3168.0).abs() < EPS);
        assert!((wall_area(120.0, 30.0) - 3600.0).abs() < EPS);
    }

    #[test]
    fn test_concrete_increases_with_loss() {
        let v = excavation_volume(50.0, 1.0, 20.0);
        let mut previous = concrete_volume(v, 0.0);
        assert_eq!(previous, v);
        for loss in 1..=30 {
            let c = concrete_volume(v, f64::from(loss));
            assert!(c > previous);
            previous = c;
        }
    }

    #[test]
    fn test_corner_difference() {
        for corners in 0..8 {
            let (outer, inner) = corner_adjusted_lengths(80.0, corners, 1.2);
            let expected = 2.0 * f64::from(corners) * 1.2;
            assert!((outer - inner - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_inner_can_go_negative() {
        let (_, inner) = corner_adjusted_lengths(2.0, 4, 1.0);
        assert!((inner + 2.0).abs() < EPS);
    }

    #[test]
    fn test_aux_volumes() {
        // 100 m of 0.8 m wall, 2.5 m deep guide: 100 × 1.8 × 2.5 = 450
        assert!((deep_guide_aux_volume(100.0, 0.8, 2.5) - 450.0).abs() < EPS);
        // 100 m of 1.0 m wall, 4 m obstacle: 400
        assert!((casing_aux_volume(100.0, 1.0, 4.0) - 400.0).abs() < EPS);
    }

    #[test]
    fn test_micro_piles() {
        assert!((micro_pile_total_length(24, 12.5) - 300.0).abs() < EPS);
        assert_eq!(micro_pile_total_length(0, 12.5), 0.0);
    }
}

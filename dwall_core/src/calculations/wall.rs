//! # Diaphragm Wall Takeoff
//!
//! The wall track: geometry → method quantities → schedule, with auxiliary
//! works reported alongside.
//!
//! ## Assumptions
//!
//! - Quantities are measured on the centerline run
//! - Prismatic trench, no overbreak beyond the concrete loss allowance
//! - Guide wall completes before panel excavation starts
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::wall::{calculate, WallInput};
//! use dwall_core::calculations::geometry::{LengthInput, WallGeometryInput};
//! use dwall_core::calculations::method::ConstructionMethod;
//!
//! let input = WallInput {
//!     label: "W-1".to_string(),
//!     geometry: WallGeometryInput {
//!         center_length_m: 120.0,
//!         thickness_m: 0.8,
//!         depth_m: 30.0,
//!         lengths: LengthInput::CenterlineWithCorners { corner_count: 4 },
//!     },
//!     method: ConstructionMethod::Standard,
//!     loss_rate_pct: 10.0,
//!     schedule: Default::default(),
//!     auxiliary: Default::default(),
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.concrete_volume_m3 - 3168.0).abs() < 1e-6);
//! assert_eq!(result.total_units, 20);
//! ```

use serde::{Deserialize, Serialize};

use super::auxiliary::{AuxiliaryWorks, AuxiliaryWorksSummary};
use super::geometry::{self, LengthInput, LengthInputMode, RawLengthInput, WallGeometryInput, WallRunLengths};
use super::log_warnings;
use super::method::{calculate_quantities, ConstructionMethod, MethodKind, RawMethod};
use super::schedule::{self, ScheduleConfig};
use crate::equations::{Equation, EquationTracker, GuardedValue};
use crate::errors::{CalcResult, CalcWarning};

/// Concrete loss allowance used when none is given (%)
pub const DEFAULT_LOSS_RATE_PCT: f64 = 10.0;

fn default_loss_rate() -> f64 {
    DEFAULT_LOSS_RATE_PCT
}

/// Input parameters for one diaphragm wall run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "North wall",
///   "geometry": {
///     "center_length_m": 120.0,
///     "thickness_m": 0.8,
///     "depth_m": 30.0,
///     "lengths": { "mode": "CenterlineWithCorners", "corner_count": 4 }
///   },
///   "method": { "method": "DeepGuideWall", "guide_depth_m": 2.5 },
///   "loss_rate_pct": 10.0,
///   "schedule": { "unit_standard_length_m": 6.0, "machine_sets": 2 },
///   "auxiliary": { "micro_pile_count": 40, "micro_pile_length_m": 9.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInput {
    /// User label for this wall (e.g., "W-1", "North wall")
    pub label: String,

    /// Run length, thickness, depth and outer/inner mode
    pub geometry: WallGeometryInput,

    /// Construction method
    #[serde(default)]
    pub method: ConstructionMethod,

    /// Concrete loss allowance, 0–30 (%)
    #[serde(default = "default_loss_rate")]
    pub loss_rate_pct: f64,

    /// Panel length, machine sets and productivity overrides
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Soil improvement and micro-piles
    #[serde(default)]
    pub auxiliary: AuxiliaryWorks,
}

impl WallInput {
    /// Parse a wall request, reporting method and length-mode problems as
    /// typed errors rather than parse failures.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        check_document(&value)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Check the method and length-mode blocks of a wall document.
pub(crate) fn check_document(value: &serde_json::Value) -> CalcResult<()> {
    if let Some(method) = value.get("method") {
        let raw: RawMethod = serde_json::from_value(method.clone())?;
        ConstructionMethod::try_from(raw)?;
    }
    if let Some(lengths) = value.get("geometry").and_then(|g| g.get("lengths")) {
        let raw: RawLengthInput = serde_json::from_value(lengths.clone())?;
        LengthInput::try_from(raw)?;
    }
    Ok(())
}

/// Results from the wall takeoff.
///
/// ## JSON Example
///
/// ```json
/// {
///   "run_lengths": { "outer_length_m": 123.2, "center_length_m": 120.0, "inner_length_m": 116.8, "mode": "CenterlineWithCorners" },
///   "method": "Standard",
///   "guide_depth_m": 1.5,
///   "excavation_volume_m3": 2880.0,
///   "concrete_volume_m3": 3168.0,
///   "wall_area_m2": 3600.0,
///   "method_aux_volume_m3": null,
///   "total_units": 20,
///   "guide_wall_days": 6.0,
///   "panel_days": 60.0,
///   "total_days": 66.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallQuantityResult {
    /// Outer, centerline and inner run lengths
    pub run_lengths: WallRunLengths,

    /// Construction method used
    pub method: MethodKind,

    /// Guide wall depth (m)
    pub guide_depth_m: f64,

    /// Theoretical trench excavation (m³)
    pub excavation_volume_m3: f64,

    /// Concrete demand including loss (m³)
    pub concrete_volume_m3: f64,

    /// Wall face area (m²)
    pub wall_area_m2: f64,

    /// Method auxiliary excavation (m³)
    pub method_aux_volume_m3: Option<f64>,

    /// Soil improvement and micro-pile totals
    pub auxiliary: AuxiliaryWorksSummary,

    /// Guide wall advance rate actually used (m/day)
    pub advance_rate_m_per_day: f64,

    /// Panel cycle actually used (days)
    pub days_per_unit: f64,

    /// Number of standard panels
    pub total_units: u32,

    /// Guide wall duration, whole days
    pub guide_wall_days: f64,

    /// Panel duration, fractional days
    pub panel_days: f64,

    /// Guide wall plus panel days
    pub total_days: f64,

    /// Panels per day during panel works
    pub average_daily_progress: GuardedValue,

    /// Non-fatal conditions
    pub warnings: Vec<CalcWarning>,

    /// Formulas applied, in first-use order
    pub equations_used: Vec<Equation>,
}

impl WallQuantityResult {
    /// Whether any guarded ratio or geometry problem was reported
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the wall takeoff.
///
/// # Returns
///
/// * `Ok(WallQuantityResult)` - Quantities and schedule
/// * `Err(CalcError)` - If a dimension, range or method field is invalid
pub fn calculate(input: &WallInput) -> CalcResult<WallQuantityResult> {
    let geo = &input.geometry;
    tracing::debug!(
        label = %input.label,
        method = %input.method.kind(),
        center_length_m = geo.center_length_m,
        thickness_m = geo.thickness_m,
        depth_m = geo.depth_m,
        "calculating wall takeoff"
    );

    let mut tracker = EquationTracker::new();
    let context = input.label.as_str();

    let resolved = geometry::resolve(geo)?;
    if resolved.lengths.mode == LengthInputMode::CenterlineWithCorners {
        tracker.record(Equation::CornerAdjustedLengths, context);
    }

    let quantities = calculate_quantities(
        &input.method,
        geo.center_length_m,
        geo.thickness_m,
        geo.depth_m,
        input.loss_rate_pct,
    )?;
    tracker.record(Equation::ExcavationVolume, context);
    tracker.record(Equation::ConcreteVolume, context);
    tracker.record(Equation::WallArea, context);
    match input.method {
        ConstructionMethod::Standard => {}
        ConstructionMethod::DeepGuideWall { .. } => tracker.record(Equation::DeepGuideAuxVolume, context),
        ConstructionMethod::AllCasing { .. } => tracker.record(Equation::CasingAuxVolume, context),
    }

    let auxiliary = input.auxiliary.summarize()?;
    if auxiliary.micro_pile_total_length_m.is_some() {
        tracker.record(Equation::MicroPileTotalLength, context);
    }

    let resolved_schedule = input.schedule.resolve(&input.method)?;
    let est = schedule::estimate(geo.center_length_m, &resolved_schedule)?;
    tracker.record(Equation::GuideWallDays, context);
    tracker.record(Equation::PanelUnitCount, context);
    tracker.record(Equation::PanelDays, context);
    tracker.record(Equation::TotalWallDays, context);
    tracker.record(Equation::AverageDailyProgress, context);

    let mut warnings = resolved.warnings;
    warnings.extend(est.warnings);
    log_warnings(context, &warnings);

    Ok(WallQuantityResult {
        run_lengths: resolved.lengths,
        method: input.method.kind(),
        guide_depth_m: input.method.guide_depth_m(),
        excavation_volume_m3: quantities.excavation_volume_m3,
        concrete_volume_m3: quantities.concrete_volume_m3,
        wall_area_m2: quantities.wall_area_m2,
        method_aux_volume_m3: quantities.aux_volume_m3,
        auxiliary,
        advance_rate_m_per_day: resolved_schedule.advance_rate_m_per_day,
        days_per_unit: resolved_schedule.days_per_unit,
        total_units: est.total_units,
        guide_wall_days: est.guide_wall_days,
        panel_days: est.panel_days,
        total_days: est.total_days,
        average_daily_progress: est.average_daily_progress,
        warnings,
        equations_used: tracker.unique_equations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::method::CasingDiameter;

    fn test_wall() -> WallInput {
        WallInput {
            label: "Test Wall".to_string(),
            geometry: WallGeometryInput {
                center_length_m: 120.0,
                thickness_m: 0.8,
                depth_m: 30.0,
                lengths: LengthInput::CenterlineWithCorners { corner_count: 4 },
            },
            method: ConstructionMethod::Standard,
            loss_rate_pct: 10.0,
            schedule: ScheduleConfig::default(),
            auxiliary: AuxiliaryWorks::default(),
        }
    }

    #[test]
    fn test_standard_wall() {
        let result = calculate(&test_wall()).unwrap();

        assert!((result.excavation_volume_m3 - 2880.0).abs() < 1e-6);
        assert!((result.concrete_volume_m3 - 3168.0).abs() < 1e-6);
        assert!((result.wall_area_m2 - 3600.0).abs() < 1e-6);
        assert!((result.run_lengths.outer_length_m - 123.2).abs() < 1e-9);
        assert!((result.run_lengths.inner_length_m - 116.8).abs() < 1e-9);
        assert_eq!(result.method_aux_volume_m3, None);
        assert_eq!(result.guide_depth_m, 1.5);

        // 120 / 20 = 6 guide days; 20 units × 3 days = 60 panel days
        assert_eq!(result.total_units, 20);
        assert_eq!(result.guide_wall_days, 6.0);
        assert_eq!(result.panel_days, 60.0);
        assert_eq!(result.total_days, 66.0);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_deep_guide_wall() {
        let mut wall = test_wall();
        wall.method = ConstructionMethod::DeepGuideWall { guide_depth_m: 2.5 };
        let result = calculate(&wall).unwrap();

        // 120 × 1.8 × 2.5 = 540
        assert!((result.method_aux_volume_m3.unwrap() - 540.0).abs() < 1e-9);
        // 10 m/day default advance
        assert_eq!(result.guide_wall_days, 12.0);
        assert_eq!(result.advance_rate_m_per_day, 10.0);
        assert!(result.equations_used.contains(&Equation::DeepGuideAuxVolume));
    }

    #[test]
    fn test_all_casing() {
        let mut wall = test_wall();
        wall.method = ConstructionMethod::AllCasing {
            casing_diameter: CasingDiameter::D1200,
            obstacle_depth_m: 5.0,
        };
        let result = calculate(&wall).unwrap();

        assert!((result.method_aux_volume_m3.unwrap() - 480.0).abs() < 1e-9);
        // 5-day cycle: 20 × 5 = 100
        assert_eq!(result.panel_days, 100.0);
        assert_eq!(result.total_days, 106.0);
    }

    #[test]
    fn test_auxiliary_works_do_not_change_wall() {
        let plain = calculate(&test_wall()).unwrap();
        let mut wall = test_wall();
        wall.auxiliary = AuxiliaryWorks {
            soil_improvement_area_m2: 300.0,
            micro_pile_count: 10,
            micro_pile_length_m: 8.0,
        };
        let with_aux = calculate(&wall).unwrap();

        assert_eq!(plain.excavation_volume_m3, with_aux.excavation_volume_m3);
        assert_eq!(plain.total_days, with_aux.total_days);
        assert_eq!(with_aux.auxiliary.micro_pile_total_length_m, Some(80.0));
        assert_eq!(with_aux.auxiliary.soil_improvement_area_m2, Some(300.0));
    }

    #[test]
    fn test_invalid_loss_rate() {
        let mut wall = test_wall();
        wall.loss_rate_pct = 35.0;
        assert_eq!(calculate(&wall).unwrap_err().error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_invalid_depth() {
        let mut wall = test_wall();
        wall.geometry.depth_m = -1.0;
        assert_eq!(calculate(&wall).unwrap_err().error_code(), "INVALID_DIMENSION");
    }

    #[test]
    fn test_guard_does_not_abort() {
        let mut wall = test_wall();
        wall.schedule.unit_standard_length_m = 0.0;
        let result = calculate(&wall).unwrap();

        assert_eq!(result.total_units, 0);
        assert!(result.average_daily_progress.guarded);
        // Body quantities still reported
        assert!((result.concrete_volume_m3 - 3168.0).abs() < 1e-6);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_manual_lengths_skip_corner_equation() {
        let mut wall = test_wall();
        wall.geometry.lengths = LengthInput::Manual {
            outer_length_m: 122.0,
            inner_length_m: 118.0,
        };
        let result = calculate(&wall).unwrap();
        assert!(!result.equations_used.contains(&Equation::CornerAdjustedLengths));
        assert_eq!(result.run_lengths.outer_length_m, 122.0);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "label": "W-2",
            "geometry": { "center_length_m": 60.0, "thickness_m": 1.0, "depth_m": 25.0 }
        }"#;
        let wall: WallInput = serde_json::from_str(json).unwrap();
        assert_eq!(wall.loss_rate_pct, DEFAULT_LOSS_RATE_PCT);
        assert_eq!(wall.method, ConstructionMethod::Standard);
        assert_eq!(wall.schedule, ScheduleConfig::default());

        let result = calculate(&wall).unwrap();
        assert_eq!(result.total_units, 10);
    }

    #[test]
    fn test_from_json_method_mismatch() {
        let json = r#"{
            "label": "W-3",
            "geometry": { "center_length_m": 60.0, "thickness_m": 1.0, "depth_m": 25.0 },
            "method": { "method": "AllCasing", "obstacle_depth_m": 3.0 }
        }"#;
        let err = WallInput::from_json(json).unwrap_err();
        assert_eq!(err.error_code(), "METHOD_CONFIG_MISMATCH");
        assert!(err.to_string().contains("casing_diameter"));
    }

    #[test]
    fn test_from_json_negative_corners() {
        let json = r#"{
            "label": "W-4",
            "geometry": {
                "center_length_m": 60.0, "thickness_m": 1.0, "depth_m": 25.0,
                "lengths": { "mode": "CenterlineWithCorners", "corner_count": -2 }
            }
        }"#;
        assert_eq!(WallInput::from_json(json).unwrap_err().error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_from_json_valid() {
        let json = r#"{
            "label": "W-5",
            "geometry": { "center_length_m": 120.0, "thickness_m": 0.8, "depth_m": 30.0 },
            "method": { "method": "DeepGuideWall", "guide_depth_m": 2.5 }
        }"#;
        let wall = WallInput::from_json(json).unwrap();
        assert_eq!(wall.method, ConstructionMethod::DeepGuideWall { guide_depth_m: 2.5 });
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate(&test_wall()).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("excavation_volume_m3"));
        assert!(json.contains("\"method\": \"Standard\""));
    }
}

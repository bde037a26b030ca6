//! # Construction Method Quantities
//!
//! Wall-body quantities shared by all methods, plus the auxiliary excavation
//! and default productivity of each construction method.
//!
//! ## Methods
//!
//! | Method | Guide depth | Advance rate | Panel cycle | Auxiliary excavation |
//! |--------|-------------|--------------|-------------|----------------------|
//! | Standard | 1.5 m | 20 m/day | 3 days | none |
//! | Deep guide wall | ≥ 1.5 m | 10 m/day | 3 days | Lc × (t + 1.0) × Hg |
//! | All-casing | 1.5 m | 20 m/day | 5 days | Lc × t × Ho |
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::method::{calculate_quantities, CasingDiameter, ConstructionMethod};
//!
//! let method = ConstructionMethod::AllCasing {
//!     casing_diameter: CasingDiameter::D1200,
//!     obstacle_depth_m: 4.0,
//! };
//!
//! let q = calculate_quantities(&method, 120.0, 0.8, 30.0, 10.0).unwrap();
//! assert!((q.excavation_volume_m3 - 2880.0).abs() < 1e-9);
//! assert_eq!(q.aux_volume_m3, Some(120.0 * 0.8 * 4.0));
//! assert_eq!(method.defaults().days_per_unit, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{casing_aux_volume, concrete_volume, deep_guide_aux_volume, excavation_volume, wall_area};
use crate::errors::{check_non_negative, CalcError, CalcResult};

/// Guide wall depth for methods without a deep guide wall (m)
pub const STANDARD_GUIDE_DEPTH_M: f64 = 1.5;

/// Largest concrete loss allowance accepted (%)
pub const MAX_LOSS_RATE_PCT: f64 = 30.0;

// ============================================================================
// Method kinds and defaults
// ============================================================================

/// Construction method without its variant data, for UI selection and lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    Standard,
    DeepGuideWall,
    AllCasing,
}

impl MethodKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodKind::Standard => "Standard",
            MethodKind::DeepGuideWall => "Deep guide wall",
            MethodKind::AllCasing => "All-casing",
        }
    }

    /// Default productivity for this method
    pub fn defaults(&self) -> MethodDefaults {
        METHOD_DEFAULTS
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, defaults)| *defaults)
            .unwrap_or(STANDARD_DEFAULTS)
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Default field productivity for a construction method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodDefaults {
    /// Guide wall advance rate (m/day)
    pub advance_rate_m_per_day: f64,
    /// Days per panel cycle (excavate, cage, concrete)
    pub days_per_unit: f64,
}

const STANDARD_DEFAULTS: MethodDefaults = MethodDefaults {
    advance_rate_m_per_day: 20.0,
    days_per_unit: 3.0,
};

/// Observed productivity by method
const METHOD_DEFAULTS: [(MethodKind, MethodDefaults); 3] = [
    (MethodKind::Standard, STANDARD_DEFAULTS),
    (
        MethodKind::DeepGuideWall,
        MethodDefaults {
            advance_rate_m_per_day: 10.0,
            days_per_unit: 3.0,
        },
    ),
    (
        MethodKind::AllCasing,
        MethodDefaults {
            advance_rate_m_per_day: 20.0,
            days_per_unit: 5.0,
        },
    ),
];

// ============================================================================
// Casing diameters
// ============================================================================

/// Casing diameters available for the all-casing method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasingDiameter {
    /// 1000 mm
    D1000,
    /// 1200 mm
    D1200,
    /// 1500 mm
    D1500,
}

impl CasingDiameter {
    /// Stock casing sizes
    pub const ALL: [CasingDiameter; 3] = [CasingDiameter::D1000, CasingDiameter::D1200, CasingDiameter::D1500];

    /// Diameter in millimeters
    pub fn diameter_mm(&self) -> u32 {
        match self {
            CasingDiameter::D1000 => 1000,
            CasingDiameter::D1200 => 1200,
            CasingDiameter::D1500 => 1500,
        }
    }

    /// Parse from a diameter in millimeters
    pub fn from_mm(mm: u32) -> CalcResult<Self> {
        CasingDiameter::ALL
            .into_iter()
            .find(|d| d.diameter_mm() == mm)
            .ok_or_else(|| {
                CalcError::invalid_range(
                    "casing_diameter",
                    mm.to_string(),
                    "Casing diameter must be 1000, 1200 or 1500 mm",
                )
            })
    }
}

impl std::fmt::Display for CasingDiameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mm", self.diameter_mm())
    }
}

// ============================================================================
// Construction method
// ============================================================================

/// Construction method with only the fields that method needs.
///
/// ## JSON Example
///
/// ```json
/// { "method": "Standard" }
/// { "method": "DeepGuideWall", "guide_depth_m": 2.5 }
/// { "method": "AllCasing", "casing_diameter": "D1200", "obstacle_depth_m": 4.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", try_from = "RawMethod")]
pub enum ConstructionMethod {
    /// Conventional 1.5 m guide wall
    Standard,
    /// Deep guide wall over weak soil or shallow obstructions
    DeepGuideWall {
        /// Guide wall depth (m), at least 1.5
        guide_depth_m: f64,
    },
    /// Steel casing bores through deep obstructions ahead of panel excavation
    AllCasing {
        casing_diameter: CasingDiameter,
        /// Depth of obstruction removal (m)
        obstacle_depth_m: f64,
    },
}

/// Construction method as flat, optional fields.
///
/// JSON requests are read through this form so that a missing
/// method-specific field is reported as [`CalcError::MethodConfigMismatch`]
/// rather than a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RawMethod {
    pub method: Option<MethodKind>,
    pub guide_depth_m: Option<f64>,
    pub casing_diameter: Option<CasingDiameter>,
    pub obstacle_depth_m: Option<f64>,
}

impl TryFrom<RawMethod> for ConstructionMethod {
    type Error = CalcError;

    fn try_from(raw: RawMethod) -> CalcResult<Self> {
        let kind = raw.method.ok_or_else(|| CalcError::missing_field("method"))?;
        ConstructionMethod::from_fields(kind, raw.guide_depth_m, raw.casing_diameter, raw.obstacle_depth_m)
    }
}

impl Default for ConstructionMethod {
    fn default() -> Self {
        ConstructionMethod::Standard
    }
}

impl ConstructionMethod {
    /// Build a method from flat, optional form fields.
    ///
    /// Fields not used by the selected method are ignored. A field the method
    /// requires but that is absent raises [`CalcError::MethodConfigMismatch`].
    ///
    /// ```rust
    /// use dwall_core::calculations::method::{ConstructionMethod, MethodKind};
    ///
    /// let err = ConstructionMethod::from_fields(MethodKind::AllCasing, None, None, Some(3.0)).unwrap_err();
    /// assert!(err.to_string().contains("casing_diameter"));
    /// ```
    pub fn from_fields(
        kind: MethodKind,
        guide_depth_m: Option<f64>,
        casing_diameter: Option<CasingDiameter>,
        obstacle_depth_m: Option<f64>,
    ) -> CalcResult<Self> {
        let method = match kind {
            MethodKind::Standard => ConstructionMethod::Standard,
            MethodKind::DeepGuideWall => ConstructionMethod::DeepGuideWall {
                guide_depth_m: guide_depth_m
                    .ok_or_else(|| CalcError::method_config_mismatch(kind.display_name(), "guide_depth_m"))?,
            },
            MethodKind::AllCasing => ConstructionMethod::AllCasing {
                casing_diameter: casing_diameter
                    .ok_or_else(|| CalcError::method_config_mismatch(kind.display_name(), "casing_diameter"))?,
                obstacle_depth_m: obstacle_depth_m
                    .ok_or_else(|| CalcError::method_config_mismatch(kind.display_name(), "obstacle_depth_m"))?,
            },
        };
        method.validate()?;
        Ok(method)
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            ConstructionMethod::Standard => MethodKind::Standard,
            ConstructionMethod::DeepGuideWall { .. } => MethodKind::DeepGuideWall,
            ConstructionMethod::AllCasing { .. } => MethodKind::AllCasing,
        }
    }

    /// Guide wall depth for this method (m)
    pub fn guide_depth_m(&self) -> f64 {
        match self {
            ConstructionMethod::DeepGuideWall { guide_depth_m } => *guide_depth_m,
            ConstructionMethod::Standard | ConstructionMethod::AllCasing { .. } => STANDARD_GUIDE_DEPTH_M,
        }
    }

    /// Default productivity for this method
    pub fn defaults(&self) -> MethodDefaults {
        self.kind().defaults()
    }

    /// Validate variant fields.
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            ConstructionMethod::Standard => Ok(()),
            ConstructionMethod::DeepGuideWall { guide_depth_m } => {
                if !guide_depth_m.is_finite() || guide_depth_m < STANDARD_GUIDE_DEPTH_M {
                    return Err(CalcError::invalid_range(
                        "guide_depth_m",
                        guide_depth_m.to_string(),
                        "Deep guide wall must be at least 1.5 m deep",
                    ));
                }
                Ok(())
            }
            ConstructionMethod::AllCasing { obstacle_depth_m, .. } => {
                check_non_negative("obstacle_depth_m", obstacle_depth_m)
            }
        }
    }

    /// Auxiliary excavation volume for this method, if any (m³)
    pub fn aux_volume_m3(&self, center_length_m: f64, thickness_m: f64) -> Option<f64> {
        match *self {
            ConstructionMethod::Standard => None,
            ConstructionMethod::DeepGuideWall { guide_depth_m } => {
                Some(deep_guide_aux_volume(center_length_m, thickness_m, guide_depth_m))
            }
            ConstructionMethod::AllCasing { obstacle_depth_m, .. } => {
                Some(casing_aux_volume(center_length_m, thickness_m, obstacle_depth_m))
            }
        }
    }
}

// ============================================================================
// Quantities
// ============================================================================

/// Wall-body and method-specific quantities.
///
/// ## JSON Example
///
/// ```json
/// {
///   "excavation_volume_m3": 2880.0,
///   "concrete_volume_m3": 3168.0,
///   "wall_area_m2": 3600.0,
///   "aux_volume_m3": null
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodQuantities {
    /// Theoretical trench excavation (m³)
    pub excavation_volume_m3: f64,
    /// Concrete demand including loss (m³)
    pub concrete_volume_m3: f64,
    /// Vertical wall face area (m²)
    pub wall_area_m2: f64,
    /// Method auxiliary excavation (m³); None for the standard method
    pub aux_volume_m3: Option<f64>,
}

/// Validate a concrete loss rate.
pub fn validate_loss_rate(loss_rate_pct: f64) -> CalcResult<()> {
    if !loss_rate_pct.is_finite() || !(0.0..=MAX_LOSS_RATE_PCT).contains(&loss_rate_pct) {
        return Err(CalcError::invalid_range(
            "loss_rate_pct",
            loss_rate_pct.to_string(),
            "Concrete loss rate must be between 0% and 30%",
        ));
    }
    Ok(())
}

/// Calculate wall-body and method auxiliary quantities.
///
/// # Arguments
///
/// * `method` - Construction method
/// * `center_length_m` - Centerline run length (m)
/// * `thickness_m` - Wall thickness (m)
/// * `depth_m` - Wall depth (m)
/// * `loss_rate_pct` - Concrete loss allowance, 0–30 (%)
pub fn calculate_quantities(
    method: &ConstructionMethod,
    center_length_m: f64,
    thickness_m: f64,
    depth_m: f64,
    loss_rate_pct: f64,
) -> CalcResult<MethodQuantities> {
    method.validate()?;
    validate_loss_rate(loss_rate_pct)?;
    check_non_negative("center_length_m", center_length_m)?;
    check_non_negative("thickness_m", thickness_m)?;
    check_non_negative("depth_m", depth_m)?;

    let excavation = excavation_volume(center_length_m, thickness_m, depth_m);

    Ok(MethodQuantities {
        excavation_volume_m3: excavation,
        concrete_volume_m3: concrete_volume(excavation, loss_rate_pct),
        wall_area_m2: wall_area(center_length_m, depth_m),
        aux_volume_m3: method.aux_volume_m3(center_length_m, thickness_m),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        assert_eq!(MethodKind::Standard.defaults().advance_rate_m_per_day, 20.0);
        assert_eq!(MethodKind::Standard.defaults().days_per_unit, 3.0);
        assert_eq!(MethodKind::DeepGuideWall.defaults().advance_rate_m_per_day, 10.0);
        assert_eq!(MethodKind::DeepGuideWall.defaults().days_per_unit, 3.0);
        assert_eq!(MethodKind::AllCasing.defaults().advance_rate_m_per_day, 20.0);
        assert_eq!(MethodKind::AllCasing.defaults().days_per_unit, 5.0);
    }

    #[test]
    fn test_standard_quantities() {
        let q = calculate_quantities(&ConstructionMethod::Standard, 120.0, 0.8, 30.0, 10.0).unwrap();
        assert!((q.excavation_volume_m3 - 2880.0).abs() < 1e-9);
        assert!((q.concrete_volume_m3 - 3168.0).abs() < 1e-9);
        assert!((q.wall_area_m2 - 3600.0).abs() < 1e-9);
        assert_eq!(q.aux_volume_m3, None);
    }

    #[test]
    fn test_deep_guide_aux() {
        let method = ConstructionMethod::DeepGuideWall { guide_depth_m: 2.0 };
        let q = calculate_quantities(&method, 100.0, 0.8, 20.0, 0.0).unwrap();
        // 100 × 1.8 × 2.0
        assert!((q.aux_volume_m3.unwrap() - 360.0).abs() < 1e-9);
        assert_eq!(method.guide_depth_m(), 2.0);
    }

    #[test]
    fn test_casing_guide_depth_is_standard() {
        let method = ConstructionMethod::AllCasing {
            casing_diameter: CasingDiameter::D1500,
            obstacle_depth_m: 0.0,
        };
        assert_eq!(method.guide_depth_m(), STANDARD_GUIDE_DEPTH_M);
        let q = calculate_quantities(&method, 50.0, 1.0, 20.0, 5.0).unwrap();
        assert_eq!(q.aux_volume_m3, Some(0.0));
    }

    #[test]
    fn test_shallow_deep_guide_rejected() {
        let method = ConstructionMethod::DeepGuideWall { guide_depth_m: 1.2 };
        let err = calculate_quantities(&method, 100.0, 0.8, 20.0, 10.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_loss_rate_range() {
        assert!(validate_loss_rate(0.0).is_ok());
        assert!(validate_loss_rate(30.0).is_ok());
        assert!(validate_loss_rate(30.5).is_err());
        assert!(validate_loss_rate(-1.0).is_err());
    }

    #[test]
    fn test_from_fields() {
        let m = ConstructionMethod::from_fields(MethodKind::DeepGuideWall, Some(2.5), None, None).unwrap();
        assert_eq!(m, ConstructionMethod::DeepGuideWall { guide_depth_m: 2.5 });

        let err = ConstructionMethod::from_fields(MethodKind::DeepGuideWall, None, None, None).unwrap_err();
        assert_eq!(err, CalcError::method_config_mismatch("Deep guide wall", "guide_depth_m"));

        let err = ConstructionMethod::from_fields(MethodKind::AllCasing, None, Some(CasingDiameter::D1000), None)
            .unwrap_err();
        assert!(err.to_string().contains("obstacle_depth_m"));

        // Extra fields are ignored for the standard method
        let m = ConstructionMethod::from_fields(MethodKind::Standard, Some(3.0), None, Some(1.0)).unwrap();
        assert_eq!(m, ConstructionMethod::Standard);
    }

    #[test]
    fn test_casing_from_mm() {
        assert_eq!(CasingDiameter::from_mm(1200).unwrap(), CasingDiameter::D1200);
        assert!(CasingDiameter::from_mm(1100).is_err());
        assert_eq!(CasingDiameter::D1500.to_string(), "1500 mm");
    }

    #[test]
    fn test_method_json() {
        let json = r#"{ "method": "AllCasing", "casing_diameter": "D1000", "obstacle_depth_m": 3.0 }"#;
        let m: ConstructionMethod = serde_json::from_str(json).unwrap();
        assert_eq!(m.kind(), MethodKind::AllCasing);

        let missing = r#"{ "method": "AllCasing", "obstacle_depth_m": 3.0 }"#;
        let err = serde_json::from_str::<ConstructionMethod>(missing).unwrap_err();
        assert!(err.to_string().contains("casing_diameter"));
    }

    #[test]
    fn test_raw_method_reports_mismatch() {
        let raw: RawMethod = serde_json::from_str(r#"{ "method": "AllCasing", "obstacle_depth_m": 3.0 }"#).unwrap();
        let err = ConstructionMethod::try_from(raw).unwrap_err();
        assert_eq!(err, CalcError::method_config_mismatch("All-casing", "casing_diameter"));

        let err = ConstructionMethod::try_from(RawMethod::default()).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_method_json_roundtrip_uses_tag() {
        for method in [
            ConstructionMethod::Standard,
            ConstructionMethod::DeepGuideWall { guide_depth_m: 2.5 },
            ConstructionMethod::AllCasing {
                casing_diameter: CasingDiameter::D1500,
                obstacle_depth_m: 4.0,
            },
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert!(json.starts_with(r#"{"method":"#));
            assert_eq!(serde_json::from_str::<ConstructionMethod>(&json).unwrap(), method);
        }
    }
}

//! # Wall Geometry
//!
//! Resolves the outer, centerline and inner run lengths of a wall.
//!
//! Two input modes are supported:
//!
//! - **Centerline with corners**: outer and inner lengths are derived from
//!   the centerline by adding/removing one wall thickness per right-angle
//!   corner (see [`corner_adjusted_lengths`]).
//! - **Manual**: outer and inner lengths are measured off the drawings and
//!   entered directly.
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::calculations::geometry::{resolve, LengthInput, WallGeometryInput};
//!
//! let input = WallGeometryInput {
//!     center_length_m: 120.0,
//!     thickness_m: 0.8,
//!     depth_m: 30.0,
//!     lengths: LengthInput::CenterlineWithCorners { corner_count: 4 },
//! };
//!
//! let resolved = resolve(&input).unwrap();
//! assert!((resolved.lengths.outer_length_m - 123.2).abs() < 1e-9);
//! assert!((resolved.lengths.inner_length_m - 116.8).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::corner_adjusted_lengths;
use crate::errors::{check_non_negative, CalcError, CalcResult, CalcWarning};

/// How outer and inner run lengths are obtained.
///
/// Exactly one mode is active per calculation.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "CenterlineWithCorners", "corner_count": 4 }
/// { "mode": "Manual", "outer_length_m": 123.0, "inner_length_m": 117.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", try_from = "RawLengthInput")]
pub enum LengthInput {
    /// Derive outer/inner from the centerline and right-angle corner count
    CenterlineWithCorners { corner_count: u32 },
    /// Outer and inner lengths entered directly
    Manual {
        outer_length_m: f64,
        inner_length_m: f64,
    },
}

impl LengthInput {
    pub fn mode(&self) -> LengthInputMode {
        match self {
            LengthInput::CenterlineWithCorners { .. } => LengthInputMode::CenterlineWithCorners,
            LengthInput::Manual { .. } => LengthInputMode::Manual,
        }
    }
}

/// Length input as flat, optional fields, the way JSON requests are read.
///
/// The corner count is read signed so a negative count is reported as
/// [`CalcError::InvalidRange`] instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct RawLengthInput {
    pub mode: Option<LengthInputMode>,
    pub corner_count: Option<i64>,
    pub outer_length_m: Option<f64>,
    pub inner_length_m: Option<f64>,
}

impl TryFrom<RawLengthInput> for LengthInput {
    type Error = CalcError;

    fn try_from(raw: RawLengthInput) -> CalcResult<Self> {
        match raw.mode.ok_or_else(|| CalcError::missing_field("mode"))? {
            LengthInputMode::CenterlineWithCorners => {
                let count = raw.corner_count.ok_or_else(|| CalcError::missing_field("corner_count"))?;
                let corner_count = u32::try_from(count).map_err(|_| {
                    CalcError::invalid_range(
                        "corner_count",
                        count.to_string(),
                        "Corner count must be a whole number of zero or more",
                    )
                })?;
                Ok(LengthInput::CenterlineWithCorners { corner_count })
            }
            LengthInputMode::Manual => Ok(LengthInput::Manual {
                outer_length_m: raw.outer_length_m.ok_or_else(|| CalcError::missing_field("outer_length_m"))?,
                inner_length_m: raw.inner_length_m.ok_or_else(|| CalcError::missing_field("inner_length_m"))?,
            }),
        }
    }
}

impl Default for LengthInput {
    fn default() -> Self {
        LengthInput::CenterlineWithCorners { corner_count: 0 }
    }
}

/// Length input mode without its data, for UI selection and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthInputMode {
    CenterlineWithCorners,
    Manual,
}

impl LengthInputMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            LengthInputMode::CenterlineWithCorners => "Centerline + corners",
            LengthInputMode::Manual => "Manual entry",
        }
    }
}

/// Wall geometry as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallGeometryInput {
    /// Centerline run length (m)
    pub center_length_m: f64,

    /// Face-to-face wall thickness (m)
    pub thickness_m: f64,

    /// Wall depth (m)
    pub depth_m: f64,

    /// Outer/inner length mode
    #[serde(default)]
    pub lengths: LengthInput,
}

impl WallGeometryInput {
    /// Validate input parameters.
    ///
    /// Zero dimensions are accepted (they give zero quantities); negative or
    /// non-finite values are rejected.
    pub fn validate(&self) -> CalcResult<()> {
        check_non_negative("center_length_m", self.center_length_m)?;
        check_non_negative("thickness_m", self.thickness_m)?;
        check_non_negative("depth_m", self.depth_m)?;
        if let LengthInput::Manual { outer_length_m, inner_length_m } = self.lengths {
            check_non_negative("outer_length_m", outer_length_m)?;
            check_non_negative("inner_length_m", inner_length_m)?;
        }
        Ok(())
    }
}

/// Resolved run lengths of the wall faces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRunLengths {
    /// Outer face run length (m)
    pub outer_length_m: f64,
    /// Centerline run length (m)
    pub center_length_m: f64,
    /// Inner face run length (m), never negative
    pub inner_length_m: f64,
    /// Mode the lengths were derived with
    pub mode: LengthInputMode,
}

/// Run lengths plus any geometry warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    pub lengths: WallRunLengths,
    pub warnings: Vec<CalcWarning>,
}

/// Resolve outer/centerline/inner run lengths.
///
/// A corner count too large for the centerline would give a negative inner
/// length; it is clamped to zero and reported as
/// [`CalcWarning::NegativeInnerLength`].
pub fn resolve(input: &WallGeometryInput) -> CalcResult<ResolvedGeometry> {
    input.validate()?;

    let mut warnings = Vec::new();

    let (outer, inner) = match input.lengths {
        LengthInput::CenterlineWithCorners { corner_count } => {
            let (outer, inner) = corner_adjusted_lengths(input.center_length_m, corner_count, input.thickness_m);
            if inner < 0.0 {
                warnings.push(CalcWarning::NegativeInnerLength { raw_inner_m: inner });
                (outer, 0.0)
            } else {
                (outer, inner)
            }
        }
        LengthInput::Manual { outer_length_m, inner_length_m } => (outer_length_m, inner_length_m),
    };

    Ok(ResolvedGeometry {
        lengths: WallRunLengths {
            outer_length_m: outer,
            center_length_m: input.center_length_m,
            inner_length_m: inner,
            mode: input.lengths.mode(),
        },
        warnings,
    })
}

//! # Equation Registry
//!
//! Central registry of every takeoff formula. Each equation has metadata
//! including its plain-text formula, variables, assumptions and the function
//! implementing it.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Metadata for audit trails and the generated equations reference
//! - Usage tracking, so each result lists the formulas that produced it
//!
//! ## Usage
//!
//! ```rust
//! use dwall_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::ExcavationVolume, "Wall W-1");
//!
//! let meta = Equation::ExcavationVolume.metadata();
//! assert_eq!(meta.formula_plain, "V = Lc * t * D");
//! assert_eq!(tracker.unique_equations(), vec![Equation::ExcavationVolume]);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Basis of an equation.
///
/// Takeoff formulas are mostly mensuration; the rest are regulatory
/// coefficients, field productivity assumptions or documented heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Plain geometric mensuration
    Mensuration,
    /// Retention coefficient set by the permitting authority or site plan
    SiteRegulation,
    /// Observed crew/equipment productivity
    FieldProductivity,
    /// Soil volume change on excavation
    SoilBulking,
    /// Linear approximation kept for consistency with past estimates
    LinearHeuristic,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Mensuration => "Mensuration (prismatic volume/area)".to_string(),
            CodeReference::SiteRegulation => {
                "Sediment control plan: retention coefficient per hectare of disturbed area".to_string()
            }
            CodeReference::FieldProductivity => "Field productivity assumption (method default or override)".to_string(),
            CodeReference::SoilBulking => "Soil bulking (loose volume = in-situ volume × swell factor)".to_string(),
            CodeReference::LinearHeuristic => "Linear corner heuristic (not a miter computation)".to_string(),
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Outer/inner run lengths
    Geometry,
    /// Excavation, concrete and area of the wall itself
    WallBody,
    /// Method-specific extra excavation
    MethodAuxiliary,
    /// Soil improvement and micro-piles
    AuxiliaryWorks,
    /// Guide wall and panel durations
    WallSchedule,
    /// Sediment retention pools
    SedimentPools,
    /// Spoil buffer pits
    SpoilPits,
    /// Temporary works preparation schedule
    SitePreparation,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Geometry => "Geometry",
            EquationCategory::WallBody => "Wall Body",
            EquationCategory::MethodAuxiliary => "Method Auxiliary Excavation",
            EquationCategory::AuxiliaryWorks => "Auxiliary Works",
            EquationCategory::WallSchedule => "Wall Schedule",
            EquationCategory::SedimentPools => "Sediment Pools",
            EquationCategory::SpoilPits => "Spoil Pits",
            EquationCategory::SitePreparation => "Site Preparation",
        }
    }

    /// Sort order for the reference (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Geometry => 1,
            EquationCategory::WallBody => 2,
            EquationCategory::MethodAuxiliary => 3,
            EquationCategory::AuxiliaryWorks => 4,
            EquationCategory::WallSchedule => 5,
            EquationCategory::SedimentPools => 6,
            EquationCategory::SpoilPits => 7,
            EquationCategory::SitePreparation => 8,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "Lc", "t", "D")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "m", "m³", "days")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for a takeoff equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Basis of the formula
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All takeoff equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    // Geometry
    /// L_outer = Lc + n·t, L_inner = Lc - n·t
    CornerAdjustedLengths,

    // Wall body
    /// V = Lc·t·D
    ExcavationVolume,
    /// V_c = V(1 + loss/100)
    ConcreteVolume,
    /// A = Lc·D
    WallArea,

    // Method auxiliary
    /// V_aux = Lc(t + 1.0)Hg
    DeepGuideAuxVolume,
    /// V_aux = Lc·t·Ho
    CasingAuxVolume,

    // Auxiliary works
    /// L_mp = N·L_pile
    MicroPileTotalLength,

    // Wall schedule
    /// ⌈Lc / r_adv⌉
    GuideWallDays,
    /// ⌈Lc / L_unit⌉
    PanelUnitCount,
    /// N·T_cycle / sets
    PanelDays,
    /// T_guide + T_panel
    TotalWallDays,
    /// N / T_panel
    AverageDailyProgress,

    // Sediment pools
    /// (A_site / 10,000)·k
    RequiredRetentionVolume,
    /// V = L·W·H, V_total = n·V
    PoolCapacity,
    /// ⌈V_req / V_single⌉
    PoolsNeeded,
    /// V_req / (n·L·W)
    PoolDepth,

    // Spoil pits
    /// V_s·s
    LooseVolume,
    /// V_truck·trips
    HaulCapacity,
    /// max(0, V_loose - V_haul)
    BufferVolume,
    /// V_buf / (n·L·W)
    PitDepth,
    /// ⌈V_site / V_s⌉
    SiteExcavationDays,

    // Site preparation
    /// ⌈V_pool / r + n·T_install⌉
    PoolPrepDays,
    /// ⌈V_pit / r⌉
    PitPrepDays,
    /// T_pool + T_pit
    TotalPrepDays,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::CornerAdjustedLengths => EquationMetadata {
                name: "Corner-Adjusted Run Lengths",
                description: "Outer and inner face run lengths derived from the centerline and corner count",
                formula_plain: "L_outer = Lc + n * t, L_inner = Lc - n * t",
                reference: CodeReference::LinearHeuristic,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("n", "Number of right-angle corners", "-"),
                    Variable::new("t", "Wall thickness", "m"),
                ],
                assumptions: vec![
                    "Each corner adds/removes one thickness to the outer/inner face",
                    "Not a true miter offset; precision unspecified",
                ],
                category: EquationCategory::Geometry,
                source_module: "equations/wall.rs",
                source_function: "corner_adjusted_lengths",
            },

            Equation::ExcavationVolume => EquationMetadata {
                name: "Trench Excavation Volume",
                description: "Theoretical in-situ volume excavated for the wall panels",
                formula_plain: "V = Lc * t * D",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("t", "Wall thickness", "m"),
                    Variable::new("D", "Wall depth", "m"),
                ],
                assumptions: vec!["Prismatic trench, no overbreak"],
                category: EquationCategory::WallBody,
                source_module: "equations/wall.rs",
                source_function: "excavation_volume",
            },

            Equation::ConcreteVolume => EquationMetadata {
                name: "Concrete Demand",
                description: "Concrete ordered for the wall including placement loss",
                formula_plain: "V_c = V * (1 + loss / 100)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("V", "Excavation volume", "m³"),
                    Variable::new("loss", "Concrete loss rate", "%"),
                ],
                assumptions: vec!["Loss rate between 0% and 30%"],
                category: EquationCategory::WallBody,
                source_module: "equations/wall.rs",
                source_function: "concrete_volume",
            },

            Equation::WallArea => EquationMetadata {
                name: "Wall Face Area",
                description: "Vertical face area of the finished wall",
                formula_plain: "A = Lc * D",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("D", "Wall depth", "m"),
                ],
                assumptions: vec!["Measured on the centerline"],
                category: EquationCategory::WallBody,
                source_module: "equations/wall.rs",
                source_function: "wall_area",
            },

            Equation::DeepGuideAuxVolume => EquationMetadata {
                name: "Deep Guide Wall Excavation",
                description: "Extra excavation for a deep guide wall over weak soil or shallow obstructions",
                formula_plain: "V_aux = Lc * (t + 1.0) * Hg",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("t", "Wall thickness", "m"),
                    Variable::new("Hg", "Guide wall depth", "m"),
                ],
                assumptions: vec!["1.0 m total over-excavation beyond wall thickness"],
                category: EquationCategory::MethodAuxiliary,
                source_module: "equations/wall.rs",
                source_function: "deep_guide_aux_volume",
            },

            Equation::CasingAuxVolume => EquationMetadata {
                name: "All-Casing Obstacle Removal",
                description: "Obstacle cutting and removal volume along the wall footprint",
                formula_plain: "V_aux = Lc * t * Ho",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("t", "Wall thickness", "m"),
                    Variable::new("Ho", "Obstacle depth", "m"),
                ],
                assumptions: vec!["Removal width equals wall thickness, independent of casing diameter"],
                category: EquationCategory::MethodAuxiliary,
                source_module: "equations/wall.rs",
                source_function: "casing_aux_volume",
            },

            Equation::MicroPileTotalLength => EquationMetadata {
                name: "Micro-Pile Total Length",
                description: "Total drilled length of micro-piles",
                formula_plain: "L_mp = N * L_pile",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("N", "Micro-pile count", "-"),
                    Variable::new("L_pile", "Length per pile", "m"),
                ],
                assumptions: vec!["Reported only; no interaction with wall quantities"],
                category: EquationCategory::AuxiliaryWorks,
                source_module: "equations/wall.rs",
                source_function: "micro_pile_total_length",
            },

            Equation::GuideWallDays => EquationMetadata {
                name: "Guide Wall Duration",
                description: "Whole days to build the guide wall along the run",
                formula_plain: "T_guide = ceil(Lc / r_adv)",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("r_adv", "Guide wall advance rate", "m/day"),
                ],
                assumptions: vec!["Guarded to 0 when the advance rate is zero"],
                category: EquationCategory::WallSchedule,
                source_module: "equations/schedule.rs",
                source_function: "guide_wall_days",
            },

            Equation::PanelUnitCount => EquationMetadata {
                name: "Panel Unit Count",
                description: "Number of standard-length panels along the run",
                formula_plain: "N = ceil(Lc / L_unit)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("Lc", "Centerline run length", "m"),
                    Variable::new("L_unit", "Standard panel length", "m"),
                ],
                assumptions: vec!["An exact multiple yields no extra unit"],
                category: EquationCategory::WallSchedule,
                source_module: "equations/schedule.rs",
                source_function: "panel_unit_count",
            },

            Equation::PanelDays => EquationMetadata {
                name: "Panel Duration",
                description: "Days of panel excavation and concreting, spread over machine sets",
                formula_plain: "T_panel = N * T_cycle / sets",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("N", "Panel unit count", "-"),
                    Variable::new("T_cycle", "Days per panel cycle", "days"),
                    Variable::new("sets", "Machine sets working in parallel", "-"),
                ],
                assumptions: vec!["Not rounded; fractional days are meaningful"],
                category: EquationCategory::WallSchedule,
                source_module: "equations/schedule.rs",
                source_function: "panel_days",
            },

            Equation::TotalWallDays => EquationMetadata {
                name: "Wall Duration",
                description: "Guide wall followed by panel works",
                formula_plain: "T_total = T_guide + T_panel",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("T_guide", "Guide wall duration", "days"),
                    Variable::new("T_panel", "Panel duration", "days"),
                ],
                assumptions: vec!["Sequential; no overlap credit"],
                category: EquationCategory::WallSchedule,
                source_module: "calculations/schedule.rs",
                source_function: "estimate",
            },

            Equation::AverageDailyProgress => EquationMetadata {
                name: "Average Daily Progress",
                description: "Panels completed per working day",
                formula_plain: "p = N / T_panel",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("N", "Panel unit count", "-"),
                    Variable::new("T_panel", "Panel duration", "days"),
                ],
                assumptions: vec!["Guarded to 0 when panel duration is zero"],
                category: EquationCategory::WallSchedule,
                source_module: "equations/schedule.rs",
                source_function: "average_daily_progress",
            },

            Equation::RequiredRetentionVolume => EquationMetadata {
                name: "Required Retention Volume",
                description: "Sediment storage required for the disturbed site area",
                formula_plain: "V_req = (A_site / 10000) * k",
                reference: CodeReference::SiteRegulation,
                variables: vec![
                    Variable::new("A_site", "Disturbed site area", "m²"),
                    Variable::new("k", "Retention coefficient", "m³/ha"),
                ],
                assumptions: vec!["Coefficient applies per hectare"],
                category: EquationCategory::SedimentPools,
                source_module: "equations/earthworks.rs",
                source_function: "required_retention_volume",
            },

            Equation::PoolCapacity => EquationMetadata {
                name: "Pool Capacity",
                description: "Effective storage of one pool and of all pools",
                formula_plain: "V = L * W * H, V_total = n * V",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("L", "Pool length", "m"),
                    Variable::new("W", "Pool width", "m"),
                    Variable::new("H", "Effective water depth (below outlet)", "m"),
                    Variable::new("n", "Pool count", "-"),
                ],
                assumptions: vec!["Rectangular vertical-sided basin"],
                category: EquationCategory::SedimentPools,
                source_module: "equations/earthworks.rs",
                source_function: "rectangular_volume",
            },

            Equation::PoolsNeeded => EquationMetadata {
                name: "Pools Needed",
                description: "Pools of the given size needed to hold the required volume",
                formula_plain: "n = ceil(V_req / V_single)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("V_req", "Required retention volume", "m³"),
                    Variable::new("V_single", "Single pool volume", "m³"),
                ],
                assumptions: vec!["Rounding up guarantees n * V_single >= V_req"],
                category: EquationCategory::SedimentPools,
                source_module: "equations/earthworks.rs",
                source_function: "pools_needed",
            },

            Equation::PoolDepth => EquationMetadata {
                name: "Required Pool Depth",
                description: "Depth giving the required volume over a fixed pool count and footprint",
                formula_plain: "H = V_req / (n * L * W)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("V_req", "Required retention volume", "m³"),
                    Variable::new("n", "Pool count", "-"),
                    Variable::new("L", "Pool length", "m"),
                    Variable::new("W", "Pool width", "m"),
                ],
                assumptions: vec!["Depths over 3.0 m are flagged", "Guarded to 0 for a zero footprint"],
                category: EquationCategory::SedimentPools,
                source_module: "equations/earthworks.rs",
                source_function: "uniform_depth",
            },

            Equation::LooseVolume => EquationMetadata {
                name: "Daily Loose Volume",
                description: "Excavated spoil volume after bulking",
                formula_plain: "V_loose = V_s * s",
                reference: CodeReference::SoilBulking,
                variables: vec![
                    Variable::new("V_s", "Daily in-situ excavation", "m³/day"),
                    Variable::new("s", "Swell factor", "-"),
                ],
                assumptions: vec!["Swell factor typically 1.25 to 1.35"],
                category: EquationCategory::SpoilPits,
                source_module: "equations/earthworks.rs",
                source_function: "daily_loose_volume",
            },

            Equation::HaulCapacity => EquationMetadata {
                name: "Daily Haul Capacity",
                description: "Loose volume trucked off site per day",
                formula_plain: "V_haul = V_truck * trips",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("V_truck", "Truck body volume", "m³"),
                    Variable::new("trips", "Maximum trips per day", "-"),
                ],
                assumptions: vec!["Trucks are loaded to their loose volume"],
                category: EquationCategory::SpoilPits,
                source_module: "equations/earthworks.rs",
                source_function: "daily_haul_capacity",
            },

            Equation::BufferVolume => EquationMetadata {
                name: "Daily Buffer Volume",
                description: "Spoil that must be stockpiled because hauling cannot keep up",
                formula_plain: "V_buf = max(0, V_loose - V_haul)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("V_loose", "Daily loose volume", "m³"),
                    Variable::new("V_haul", "Daily haul capacity", "m³"),
                ],
                assumptions: vec!["Never negative"],
                category: EquationCategory::SpoilPits,
                source_module: "equations/earthworks.rs",
                source_function: "buffer_volume",
            },

            Equation::PitDepth => EquationMetadata {
                name: "Required Pit Depth",
                description: "Pit depth that holds one day of buffer volume",
                formula_plain: "H = V_buf / (n * L * W)",
                reference: CodeReference::Mensuration,
                variables: vec![
                    Variable::new("V_buf", "Daily buffer volume", "m³"),
                    Variable::new("n", "Pit count", "-"),
                    Variable::new("L", "Pit length", "m"),
                    Variable::new("W", "Pit width", "m"),
                ],
                assumptions: vec!["Depths over 2.5 m are flagged", "0 when no buffer is needed"],
                category: EquationCategory::SpoilPits,
                source_module: "equations/earthworks.rs",
                source_function: "uniform_depth",
            },

            Equation::SiteExcavationDays => EquationMetadata {
                name: "Site Excavation Duration",
                description: "Whole days to excavate the site at the daily in-situ rate",
                formula_plain: "T = ceil(V_site / V_s)",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("V_site", "Site area times average depth", "m³"),
                    Variable::new("V_s", "Daily in-situ excavation", "m³/day"),
                ],
                assumptions: vec!["Guarded to 0 when the daily rate is zero"],
                category: EquationCategory::SpoilPits,
                source_module: "equations/earthworks.rs",
                source_function: "site_excavation_days",
            },

            Equation::PoolPrepDays => EquationMetadata {
                name: "Pool Preparation Duration",
                description: "Digging and installing all sediment pools",
                formula_plain: "T_pool = ceil(V_pool / r + n * T_install)",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("V_pool", "Total pool excavation", "m³"),
                    Variable::new("r", "Small excavator rate", "m³/day"),
                    Variable::new("n", "Pool count", "-"),
                    Variable::new("T_install", "Install days per pool", "days"),
                ],
                assumptions: vec!["Rounded up once after adding dig and setup days"],
                category: EquationCategory::SitePreparation,
                source_module: "equations/earthworks.rs",
                source_function: "dig_days",
            },

            Equation::PitPrepDays => EquationMetadata {
                name: "Pit Preparation Duration",
                description: "Digging all spoil buffer pits",
                formula_plain: "T_pit = ceil(V_pit / r)",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("V_pit", "Total pit excavation", "m³"),
                    Variable::new("r", "Small excavator rate", "m³/day"),
                ],
                assumptions: vec!["Guarded to 0 when the excavator rate is zero"],
                category: EquationCategory::SitePreparation,
                source_module: "equations/earthworks.rs",
                source_function: "dig_days",
            },

            Equation::TotalPrepDays => EquationMetadata {
                name: "Total Preparation Duration",
                description: "Pools then pits, one after the other",
                formula_plain: "T_prep = T_pool + T_pit",
                reference: CodeReference::FieldProductivity,
                variables: vec![
                    Variable::new("T_pool", "Pool preparation duration", "days"),
                    Variable::new("T_pit", "Pit preparation duration", "days"),
                ],
                assumptions: vec!["Sequential; no credit for parallel crews"],
                category: EquationCategory::SitePreparation,
                source_module: "calculations/site_prep.rs",
                source_function: "calculate",
            },
        }
    }

    /// All equations in a category, in registry order
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .copied()
            .filter(|eq| eq.metadata().category == category)
            .collect()
    }

    /// All categories sorted by display order
    pub fn all_categories() -> Vec<EquationCategory> {
        let mut cats = vec![
            EquationCategory::Geometry,
            EquationCategory::WallBody,
            EquationCategory::MethodAuxiliary,
            EquationCategory::AuxiliaryWorks,
            EquationCategory::WallSchedule,
            EquationCategory::SedimentPools,
            EquationCategory::SpoilPits,
            EquationCategory::SitePreparation,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::CornerAdjustedLengths,
    Equation::ExcavationVolume,
    Equation::ConcreteVolume,
    Equation::WallArea,
    Equation::DeepGuideAuxVolume,
    Equation::CasingAuxVolume,
    Equation::MicroPileTotalLength,
    Equation::GuideWallDays,
    Equation::PanelUnitCount,
    Equation::PanelDays,
    Equation::TotalWallDays,
    Equation::AverageDailyProgress,
    Equation::RequiredRetentionVolume,
    Equation::PoolCapacity,
    Equation::PoolsNeeded,
    Equation::PoolDepth,
    Equation::LooseVolume,
    Equation::HaulCapacity,
    Equation::BufferVolume,
    Equation::PitDepth,
    Equation::SiteExcavationDays,
    Equation::PoolPrepDays,
    Equation::PitPrepDays,
    Equation::TotalPrepDays,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where it was used (e.g., "Wall W-1")
    pub context: String,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used, in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group unique equations by category
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

// ============================================================================
// Markdown Reference Generation
// ============================================================================

/// Generate the equations reference as markdown.
///
/// ```rust
/// use dwall_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("## Wall Body"));
/// assert!(markdown.contains("V = Lc * t * D"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Slurryline Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists every formula used in Slurryline takeoffs. Each entry
gives the formula, its basis, the implementing function and its assumptions.

## Units

| Quantity | Unit |
|----------|------|
| Length | m |
| Area | m² (site coefficients per ha) |
| Volume | m³ |
| Duration | working days |

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Basis:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}

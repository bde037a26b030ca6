//! # dwall_core - Diaphragm Wall Takeoff Engine
//!
//! `dwall_core` computes quantities and durations for diaphragm wall works
//! and the temporary earthworks that go with them. All inputs and outputs are
//! JSON-serializable so scenarios can be scripted and batched.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Never abort on a ratio**: Zero denominators degrade to a flagged zero
//!
//! ## Quick Start
//!
//! ```rust
//! use dwall_core::calculations::wall::{calculate, WallInput};
//!
//! let input: WallInput = serde_json::from_str(r#"{
//!     "label": "W-1",
//!     "geometry": { "center_length_m": 120.0, "thickness_m": 0.8, "depth_m": 30.0 }
//! }"#).unwrap();
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.total_days, 66.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Wall and earthworks calculations
//! - [`equations`] - Formula functions and the equation registry
//! - [`project`] - Batch container and settings
//! - [`units`] - Site area units (m², ha)
//! - [`errors`] - Structured error and warning types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use errors::{CalcError, CalcResult, CalcWarning};
pub use project::{GlobalSettings, ItemEvaluation, Project, ProjectItem, ProjectMetadata};

//! # Batch Projects
//!
//! The `Project` struct groups many takeoff scenarios for one job so they can
//! be evaluated together. Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (temporary works productivity)
//! └── items: HashMap<Uuid, ProjectItem> (all scenarios)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dwall_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let json = project.to_json().unwrap();
//! let loaded = Project::from_json(&json).unwrap();
//! assert_eq!(loaded.meta.job_id, "25-042");
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput, PrepSettings};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for project documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map for O(1) lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Settings shared by every item
    #[serde(default)]
    pub settings: GlobalSettings,

    /// All calculation items, keyed by UUID
    #[serde(default)]
    pub items: HashMap<Uuid, ProjectItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Parse a project document and check its schema version.
    ///
    /// # Returns
    ///
    /// * `Ok(Project)` - Successfully parsed project
    /// * `Err(CalcError::VersionMismatch)` - Document version is incompatible
    /// * `Err(CalcError::SerializationError)` - Invalid JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let project: Project = serde_json::from_str(json)?;
        validate_version(&project.meta.version)?;
        Ok(project)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a calculation item to the project.
    ///
    /// Returns the UUID assigned to the item.
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, ProjectItem::Item(item));
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<ProjectItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a readable calculation item by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id).and_then(ProjectItem::as_item)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Apply preparation overrides to the project settings and to every
    /// earthworks item that carries its own settings.
    ///
    /// Returns how many items had their own settings changed.
    pub fn override_prep(&mut self, rate_m3_per_day: Option<f64>, install_days: Option<f64>) -> usize {
        if rate_m3_per_day.is_none() && install_days.is_none() {
            return 0;
        }
        self.settings.prep.apply_overrides(rate_m3_per_day, install_days);

        let mut changed = 0;
        for item in self.items.values_mut() {
            if let ProjectItem::Item(CalculationItem::Earthworks(input)) = item {
                if let Some(prep) = input.prep.as_mut() {
                    prep.apply_overrides(rate_m3_per_day, install_days);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.touch();
        }
        changed
    }

    /// Evaluate every item, ordered by label.
    ///
    /// A failing item is reported in its own entry; the rest of the batch
    /// still runs.
    pub fn evaluate_all(&self) -> Vec<ItemEvaluation> {
        let mut evaluations: Vec<ItemEvaluation> = self
            .items
            .iter()
            .map(|(id, item)| {
                let outcome = item.evaluate(&self.settings);
                if let Err(err) = &outcome {
                    tracing::warn!(label = item.label(), code = err.error_code(), "item rejected: {}", err);
                }
                ItemEvaluation {
                    id: *id,
                    label: item.label().to_owned(),
                    calc_type: item.calc_type(),
                    outcome,
                }
            })
            .collect();
        evaluations.sort_by(|a, b| a.label.cmp(&b.label).then(a.id.cmp(&b.id)));
        tracing::debug!(items = evaluations.len(), "evaluated project");
        evaluations
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// One entry of the item map.
///
/// Entries that do not parse as a [`CalculationItem`] are kept as raw JSON so
/// the rest of the document still loads. They fail individually when the
/// project is evaluated, and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectItem {
    Item(CalculationItem),
    Unreadable(serde_json::Value),
}

impl ProjectItem {
    pub fn as_item(&self) -> Option<&CalculationItem> {
        match self {
            ProjectItem::Item(item) => Some(item),
            ProjectItem::Unreadable(_) => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProjectItem::Item(item) => item.label(),
            ProjectItem::Unreadable(value) => value.get("label").and_then(|l| l.as_str()).unwrap_or(""),
        }
    }

    pub fn calc_type(&self) -> &'static str {
        match self {
            ProjectItem::Item(item) => item.calc_type(),
            ProjectItem::Unreadable(value) => match value.get("type").and_then(|t| t.as_str()) {
                Some("Wall") => "Wall",
                Some("SedimentPool") => "SedimentPool",
                Some("SpoilPit") => "SpoilPit",
                Some("Earthworks") => "Earthworks",
                _ => "Unknown",
            },
        }
    }

    /// Run the item. An unreadable entry reports why it could not be parsed.
    pub fn evaluate(&self, settings: &GlobalSettings) -> CalcResult<CalculationOutput> {
        match self {
            ProjectItem::Item(item) => item.evaluate(settings),
            ProjectItem::Unreadable(value) => CalculationItem::from_value(value.clone())?.evaluate(settings),
        }
    }
}

/// Outcome of one item in a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemEvaluation {
    pub id: Uuid,
    pub label: String,
    pub calc_type: &'static str,
    pub outcome: CalcResult<CalculationOutput>,
}

impl ItemEvaluation {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Project metadata stored in the document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Small excavator rate and pool install days for earthworks items
    #[serde(default)]
    pub prep: PrepSettings,
}

/// Check that a document version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    // Major version must match
    if file_major != current_major {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::WallGeometryInput;
    use crate::calculations::sediment::{PoolConfig, SedimentPoolInput, SiteParams};
    use crate::calculations::earthworks::EarthworksInput;
    use crate::calculations::spoil::PitConfig;
    use crate::calculations::{ConstructionMethod, WallInput};
    use serde_json::json;

    fn wall(label: &str, thickness_m: f64) -> CalculationItem {
        CalculationItem::Wall(WallInput {
            label: label.to_string(),
            geometry: WallGeometryInput {
                center_length_m: 120.0,
                thickness_m,
                depth_m: 30.0,
                lengths: Default::default(),
            },
            method: ConstructionMethod::Standard,
            loss_rate_pct: 10.0,
            schedule: Default::default(),
            auxiliary: Default::default(),
        })
    }

    fn pools(label: &str) -> CalculationItem {
        CalculationItem::SedimentPool(SedimentPoolInput {
            label: label.to_string(),
            site: SiteParams {
                site_area_m2: 1000.0,
                avg_depth_m: 0.0,
            },
            pool: PoolConfig {
                regulatory_coefficient_m3_per_ha: 600.0,
                pool_count: 2,
                pool_length_m: 6.0,
                pool_width_m: 5.0,
                pool_depth_m: None,
                target_volume_m3: None,
            },
        })
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings, GlobalSettings::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut project = Project::new("Jane Engineer", "25-042", "Test Client");
        let id = project.add_item(wall("W-1", 0.8));

        let json = project.to_json().unwrap();
        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("small_excavation_rate_m3_per_day"));

        let loaded = Project::from_json(&json).unwrap();
        assert_eq!(loaded.get_item(&id), project.get_item(&id));
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Engineer", "25-001", "Client");
        let id = project.add_item(pools("SP-1"));
        assert_eq!(project.item_count(), 1);
        assert!(project.get_item(&id).is_some());

        assert!(project.remove_item(&id).is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.remove_item(&id).is_none());
    }

    #[test]
    fn test_batch_survives_bad_item() {
        let mut project = Project::default();
        project.add_item(wall("B wall", -0.8));
        project.add_item(wall("A wall", 0.8));
        project.add_item(pools("C pools"));

        let results = project.evaluate_all();
        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["A wall", "B wall", "C pools"]);
        assert!(results[0].is_ok());
        assert_eq!(
            results[1].outcome.as_ref().unwrap_err().error_code(),
            "INVALID_DIMENSION"
        );
        assert!(results[2].is_ok());
        assert_eq!(results[2].calc_type, "SedimentPool");
    }

    /// Insert a raw JSON item under a fresh id and reload the document.
    fn with_raw_item(project: &Project, item: serde_json::Value) -> (Project, Uuid) {
        let mut doc: serde_json::Value = serde_json::from_str(&project.to_json().unwrap()).unwrap();
        let id = Uuid::new_v4();
        doc["items"][id.to_string()] = item;
        (Project::from_json(&doc.to_string()).unwrap(), id)
    }

    #[test]
    fn test_batch_reports_method_mismatch_from_json() {
        let mut project = Project::default();
        project.add_item(wall("A wall", 0.8));
        let (loaded, id) = with_raw_item(
            &project,
            json!({
                "type": "Wall",
                "label": "B casing",
                "geometry": { "center_length_m": 60.0, "thickness_m": 1.0, "depth_m": 25.0 },
                "method": { "method": "AllCasing", "obstacle_depth_m": 3.0 }
            }),
        );

        assert_eq!(loaded.item_count(), 2);
        assert!(loaded.get_item(&id).is_none());
        let results = loaded.evaluate_all();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1].id, id);
        assert_eq!(results[1].calc_type, "Wall");
        assert_eq!(
            results[1].outcome,
            Err(CalcError::method_config_mismatch("All-casing", "casing_diameter"))
        );
    }

    #[test]
    fn test_batch_reports_negative_corner_count() {
        let (loaded, _) = with_raw_item(
            &Project::default(),
            json!({
                "type": "Wall",
                "label": "corners",
                "geometry": {
                    "center_length_m": 60.0, "thickness_m": 1.0, "depth_m": 25.0,
                    "lengths": { "mode": "CenterlineWithCorners", "corner_count": -1 }
                }
            }),
        );
        let results = loaded.evaluate_all();
        assert_eq!(results[0].outcome.as_ref().unwrap_err().error_code(), "INVALID_RANGE");
    }

    #[test]
    fn test_unreadable_item_written_back() {
        let raw = json!({ "type": "Crane", "label": "tower crane", "reach_m": 60.0 });
        let (loaded, id) = with_raw_item(&Project::default(), raw.clone());
        assert_eq!(loaded.items.get(&id), Some(&ProjectItem::Unreadable(raw)));
        assert_eq!(loaded.items[&id].calc_type(), "Unknown");
        assert_eq!(loaded.items[&id].label(), "tower crane");

        let again = Project::from_json(&loaded.to_json().unwrap()).unwrap();
        assert_eq!(again.items.get(&id), loaded.items.get(&id));
        let results = again.evaluate_all();
        assert_eq!(results[0].outcome.as_ref().unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_prep_override_reaches_item_settings() {
        let earthworks = |label: &str, prep: Option<PrepSettings>| {
            let CalculationItem::SedimentPool(sediment) = pools(label) else { unreachable!() };
            CalculationItem::Earthworks(EarthworksInput {
                label: label.to_string(),
                site: sediment.site,
                pool: sediment.pool,
                pit: PitConfig {
                    daily_solid_volume_m3: 200.0,
                    swell_factor: 1.25,
                    truck_volume_m3: 10.0,
                    max_trips: 20,
                    pit_count: 1,
                    pit_length_m: 6.0,
                    pit_width_m: 5.0,
                },
                prep,
            })
        };
        let own = PrepSettings {
            small_excavation_rate_m3_per_day: 20.0,
            install_days_per_pool: 2.0,
        };

        let mut project = Project::default();
        let inherits = project.add_item(earthworks("E-1", None));
        let carries = project.add_item(earthworks("E-2", Some(own)));

        assert_eq!(project.override_prep(None, None), 0);
        assert_eq!(project.override_prep(Some(80.0), None), 1);
        assert_eq!(project.settings.prep.small_excavation_rate_m3_per_day, 80.0);

        let Some(CalculationItem::Earthworks(e1)) = project.get_item(&inherits) else { panic!() };
        assert_eq!(e1.prep, None);
        let Some(CalculationItem::Earthworks(e2)) = project.get_item(&carries) else { panic!() };
        let prep = e2.prep.unwrap();
        assert_eq!(prep.small_excavation_rate_m3_per_day, 80.0);
        assert_eq!(prep.install_days_per_pool, 2.0);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("abc").is_err());
    }

    #[test]
    fn test_from_json_rejects_newer_schema() {
        let mut project = Project::default();
        project.meta.version = "0.9.0".to_string();
        let json = project.to_json().unwrap();
        let err = Project::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_from_json_invalid() {
        let err = Project::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}

//! # Slurryline CLI
//!
//! Command-line front end for `dwall_core`: wall takeoffs, sediment pools,
//! spoil pits and batch projects. Results print as a readable report, or as
//! JSON with `--json`.

mod logging;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};

use dwall_core::calculations::auxiliary::AuxiliaryWorks;
use dwall_core::calculations::earthworks::{self, EarthworksInput, EarthworksResult};
use dwall_core::calculations::geometry::{LengthInput, WallGeometryInput};
use dwall_core::calculations::method::{CasingDiameter, ConstructionMethod, MethodKind};
use dwall_core::calculations::schedule::{ScheduleConfig, DEFAULT_UNIT_LENGTH_M};
use dwall_core::calculations::sediment::{self, Compliance, PoolConfig, PoolSizing, SedimentPoolInput, SedimentPoolResult, SiteParams};
use dwall_core::calculations::site_prep::{PrepScheduleResult, PrepSettings};
use dwall_core::calculations::spoil::{self, PitConfig, SpoilPitInput, SpoilPitResult};
use dwall_core::calculations::wall::{self, WallInput, WallQuantityResult, DEFAULT_LOSS_RATE_PCT};
use dwall_core::{CalcError, CalcResult, CalcWarning, CalculationOutput, Project};

#[derive(Parser)]
#[command(name = "dwall", version)]
#[command(about = "Diaphragm wall quantity takeoff and schedule estimator")]
struct Cli {
    /// Print results as JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging for the calculation engine
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Wall quantities and schedule from flags
    Wall(WallArgs),
    /// Sediment pool sizing from flags
    Pool(PoolArgs),
    /// Spoil pit sizing from flags
    Pit(PitArgs),
    /// Pools, pits and preparation schedule from a JSON request
    Earthworks {
        /// Path to an earthworks request (JSON)
        file: PathBuf,
        #[command(flatten)]
        prep: PrepArgs,
    },
    /// Evaluate every item in a project document (JSON)
    Project {
        /// Path to the project document
        file: PathBuf,
        #[command(flatten)]
        prep: PrepArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Standard,
    DeepGuideWall,
    AllCasing,
}

impl From<MethodArg> for MethodKind {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Standard => MethodKind::Standard,
            MethodArg::DeepGuideWall => MethodKind::DeepGuideWall,
            MethodArg::AllCasing => MethodKind::AllCasing,
        }
    }
}

#[derive(Args)]
struct WallArgs {
    #[arg(long, default_value = "W-1")]
    label: String,

    /// Centerline run length (m)
    #[arg(long)]
    center_length: f64,

    /// Wall thickness (m)
    #[arg(long)]
    thickness: f64,

    /// Wall depth (m)
    #[arg(long)]
    depth: f64,

    /// Right-angle corners along the run
    #[arg(long, default_value_t = 0, conflicts_with_all = ["outer", "inner"])]
    corners: u32,

    /// Outer face length (m), manual mode
    #[arg(long, requires = "inner")]
    outer: Option<f64>,

    /// Inner face length (m), manual mode
    #[arg(long, requires = "outer")]
    inner: Option<f64>,

    #[arg(long, value_enum, default_value_t = MethodArg::Standard)]
    method: MethodArg,

    /// Guide wall depth for deep-guide-wall (m)
    #[arg(long)]
    guide_depth: Option<f64>,

    /// Casing diameter for all-casing (mm: 1000, 1200 or 1500)
    #[arg(long)]
    casing_diameter: Option<u32>,

    /// Obstruction removal depth for all-casing (m)
    #[arg(long)]
    obstacle_depth: Option<f64>,

    /// Concrete loss allowance (%)
    #[arg(long, default_value_t = DEFAULT_LOSS_RATE_PCT)]
    loss_rate: f64,

    /// Standard panel length (m)
    #[arg(long, default_value_t = DEFAULT_UNIT_LENGTH_M)]
    unit_length: f64,

    /// Days per panel cycle (method default when omitted)
    #[arg(long)]
    days_per_unit: Option<f64>,

    #[arg(long, default_value_t = 1)]
    machine_sets: u32,

    /// Guide wall advance rate, m/day (method default when omitted)
    #[arg(long)]
    advance_rate: Option<f64>,

    /// Soil improvement area (m²)
    #[arg(long, default_value_t = 0.0)]
    soil_improvement_area: f64,

    #[arg(long, default_value_t = 0)]
    micro_piles: u32,

    /// Length of each micro-pile (m)
    #[arg(long, default_value_t = 0.0)]
    micro_pile_length: f64,
}

impl WallArgs {
    fn to_input(&self) -> CalcResult<WallInput> {
        let casing_diameter = self.casing_diameter.map(CasingDiameter::from_mm).transpose()?;
        let method = ConstructionMethod::from_fields(
            self.method.into(),
            self.guide_depth,
            casing_diameter,
            self.obstacle_depth,
        )?;

        let lengths = match (self.outer, self.inner) {
            (Some(outer_length_m), Some(inner_length_m)) => LengthInput::Manual {
                outer_length_m,
                inner_length_m,
            },
            _ => LengthInput::CenterlineWithCorners {
                corner_count: self.corners,
            },
        };

        Ok(WallInput {
            label: self.label.clone(),
            geometry: WallGeometryInput {
                center_length_m: self.center_length,
                thickness_m: self.thickness,
                depth_m: self.depth,
                lengths,
            },
            method,
            loss_rate_pct: self.loss_rate,
            schedule: ScheduleConfig {
                unit_standard_length_m: self.unit_length,
                days_per_unit: self.days_per_unit,
                machine_sets: self.machine_sets,
                guide_wall_advance_rate_m_per_day: self.advance_rate,
            },
            auxiliary: AuxiliaryWorks {
                soil_improvement_area_m2: self.soil_improvement_area,
                micro_pile_count: self.micro_piles,
                micro_pile_length_m: self.micro_pile_length,
            },
        })
    }
}

#[derive(Args)]
struct SiteArgs {
    /// Disturbed site area (m²)
    #[arg(long)]
    site_area: f64,

    /// Average excavation depth over the site (m)
    #[arg(long, default_value_t = 0.0)]
    avg_depth: f64,
}

impl SiteArgs {
    fn to_params(&self) -> SiteParams {
        SiteParams {
            site_area_m2: self.site_area,
            avg_depth_m: self.avg_depth,
        }
    }
}

#[derive(Args)]
struct PoolArgs {
    #[arg(long, default_value = "SP-1")]
    label: String,

    #[command(flatten)]
    site: SiteArgs,

    /// Required retention (m³ per hectare)
    #[arg(long)]
    coefficient: f64,

    #[arg(long, default_value_t = 1)]
    pool_count: u32,

    /// Pool length (m)
    #[arg(long)]
    length: f64,

    /// Pool width (m)
    #[arg(long)]
    width: f64,

    /// Pool depth (m); omit to back-calculate
    #[arg(long)]
    depth: Option<f64>,

    /// Explicit target capacity (m³)
    #[arg(long)]
    target: Option<f64>,
}

#[derive(Args)]
struct PitArgs {
    #[arg(long, default_value = "Pit-1")]
    label: String,

    #[command(flatten)]
    site: SiteArgs,

    /// In-situ excavation per day (m³)
    #[arg(long)]
    daily_solid: f64,

    /// Loose / in-situ volume ratio
    #[arg(long, default_value_t = 1.25)]
    swell: f64,

    /// Truck capacity (m³)
    #[arg(long)]
    truck: f64,

    /// Truck trips per day
    #[arg(long)]
    trips: u32,

    #[arg(long, default_value_t = 1)]
    pit_count: u32,

    /// Pit length (m)
    #[arg(long)]
    length: f64,

    /// Pit width (m)
    #[arg(long)]
    width: f64,
}

/// Overrides for temporary works productivity.
#[derive(Args)]
struct PrepArgs {
    /// Small excavator rate (m³/day)
    #[arg(long)]
    excavator_rate: Option<f64>,

    /// Days to install one pool
    #[arg(long)]
    install_days: Option<f64>,
}

impl PrepArgs {
    fn log(&self) {
        if let Some(rate) = self.excavator_rate {
            tracing::info!("Excavator rate overridden to {} m³/day", rate);
        }
        if let Some(days) = self.install_days {
            tracing::info!("Install days per pool overridden to {}", days);
        }
    }

    fn apply(&self, settings: &mut PrepSettings) {
        self.log();
        settings.apply_overrides(self.excavator_rate, self.install_days);
    }

    fn apply_to_project(&self, project: &mut Project) {
        self.log();
        let items = project.override_prep(self.excavator_rate, self.install_days);
        if items > 0 {
            tracing::info!(items, "Overrides also applied to items with their own prep settings");
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            if cli.json {
                if let Some(json) = e.downcast_ref::<CalcError>().and_then(|c| serde_json::to_string_pretty(c).ok()) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command. `Ok(false)` means a batch finished with failed items.
fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    match &cli.command {
        Command::Wall(args) => {
            let result = wall::calculate(&args.to_input()?)?;
            emit(cli.json, &result, print_wall)?;
        }
        Command::Pool(args) => {
            let input = SedimentPoolInput {
                label: args.label.clone(),
                site: args.site.to_params(),
                pool: PoolConfig {
                    regulatory_coefficient_m3_per_ha: args.coefficient,
                    pool_count: args.pool_count,
                    pool_length_m: args.length,
                    pool_width_m: args.width,
                    pool_depth_m: args.depth,
                    target_volume_m3: args.target,
                },
            };
            let result = sediment::calculate(&input)?;
            emit(cli.json, &result, print_pool)?;
        }
        Command::Pit(args) => {
            let input = SpoilPitInput {
                label: args.label.clone(),
                site: args.site.to_params(),
                pit: PitConfig {
                    daily_solid_volume_m3: args.daily_solid,
                    swell_factor: args.swell,
                    truck_volume_m3: args.truck,
                    max_trips: args.trips,
                    pit_count: args.pit_count,
                    pit_length_m: args.length,
                    pit_width_m: args.width,
                },
            };
            let result = spoil::calculate(&input)?;
            emit(cli.json, &result, print_pit)?;
        }
        Command::Earthworks { file, prep } => {
            tracing::info!("Loading earthworks request from {}", file.display());
            let input: EarthworksInput = serde_json::from_str(&fs::read_to_string(file)?)?;
            let mut settings = input.prep.unwrap_or_default();
            prep.apply(&mut settings);
            let result = earthworks::calculate(&EarthworksInput { prep: Some(settings), ..input }, &settings)?;
            emit(cli.json, &result, print_earthworks)?;
        }
        Command::Project { file, prep } => {
            tracing::info!("Loading project from {}", file.display());
            let mut project = Project::from_json(&fs::read_to_string(file)?)?;
            prep.apply_to_project(&mut project);
            let evaluations = project.evaluate_all();
            let all_ok = evaluations.iter().all(|e| e.is_ok());

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&evaluations)?);
            } else {
                print_banner(&format!("PROJECT {} ({})", project.meta.job_id, project.meta.client));
                for evaluation in &evaluations {
                    println!();
                    println!("── {} [{}]", evaluation.label, evaluation.calc_type);
                    match &evaluation.outcome {
                        Ok(CalculationOutput::Wall(r)) => print_wall(r),
                        Ok(CalculationOutput::SedimentPool(r)) => print_pool(r),
                        Ok(CalculationOutput::SpoilPit(r)) => print_pit(r),
                        Ok(CalculationOutput::Earthworks(r)) => print_earthworks(r),
                        Err(e) => println!("  [FAIL] {}", e),
                    }
                }
                println!();
                let failed = evaluations.iter().filter(|e| !e.is_ok()).count();
                print_banner(&format!("{} items, {} failed", evaluations.len(), failed));
            }
            return Ok(all_ok);
        }
    }
    Ok(true)
}

fn emit<T: serde::Serialize>(json: bool, result: &T, report: fn(&T)) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        report(result);
    }
    Ok(())
}

fn print_banner(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

fn print_warnings(warnings: &[CalcWarning]) {
    for warning in warnings {
        println!("  [WARN] {}", warning);
    }
}

fn print_wall(r: &WallQuantityResult) {
    println!("Method: {} (guide depth {:.2} m)", r.method, r.guide_depth_m);
    println!();
    println!("Run lengths:");
    println!("  Outer:  {:.2} m", r.run_lengths.outer_length_m);
    println!("  Center: {:.2} m", r.run_lengths.center_length_m);
    println!("  Inner:  {:.2} m", r.run_lengths.inner_length_m);
    println!();
    println!("Quantities:");
    println!("  Excavation: {:.2} m³", r.excavation_volume_m3);
    println!("  Concrete:   {:.2} m³", r.concrete_volume_m3);
    println!("  Wall area:  {:.2} m²", r.wall_area_m2);
    if let Some(aux) = r.method_aux_volume_m3 {
        println!("  Method aux: {:.2} m³", aux);
    }
    if let Some(area) = r.auxiliary.soil_improvement_area_m2 {
        println!("  Soil improvement: {:.2} m²", area);
    }
    if let Some(length) = r.auxiliary.micro_pile_total_length_m {
        println!("  Micro-piles:      {:.2} m", length);
    }
    println!();
    println!("Schedule:");
    println!("  Guide wall: {:.0} days at {:.1} m/day", r.guide_wall_days, r.advance_rate_m_per_day);
    println!("  Panels:     {} units × {:.1} days = {:.1} days", r.total_units, r.days_per_unit, r.panel_days);
    println!("  Progress:   {:.3} units/day", r.average_daily_progress.value);
    println!("  Total:      {:.1} days", r.total_days);
    print_warnings(&r.warnings);
}

fn print_pool(r: &SedimentPoolResult) {
    println!("Sediment pools:");
    println!("  Required volume: {:.2} m³", r.required_total_m3);
    println!("  Footprint:       {:.2} m² ({} pools)", r.total_footprint_m2, r.pool_count);
    match &r.sizing {
        PoolSizing::CapacityCheck {
            total_volume_m3,
            target_volume_m3,
            compliance,
            pools_needed,
            recommended_total_m3,
            ..
        } => {
            println!("  Capacity:        {:.2} m³ vs {:.2} m³ {}", total_volume_m3, target_volume_m3, compliance_icon(compliance));
            if let Compliance::Fail { shortfall_m3 } = compliance {
                println!("  Shortfall:       {:.2} m³", shortfall_m3);
            }
            println!("  Pools needed:    {} ({:.2} m³)", pools_needed, recommended_total_m3);
        }
        PoolSizing::DepthRecommendation { required_depth } => {
            println!("  Required depth:  {:.2} m", required_depth.value);
        }
    }
    println!("  Excavation:      {:.2} m³ {}", r.excavated_volume_m3, status_icon(!r.too_deep));
    print_warnings(&r.warnings);
}

fn print_pit(r: &SpoilPitResult) {
    println!("Spoil pits:");
    println!("  Loose volume:   {:.2} m³/day", r.daily_loose_volume_m3);
    println!("  Haul capacity:  {:.2} m³/day", r.daily_haul_capacity_m3);
    println!("  Buffer needed:  {:.2} m³", r.buffer_needed_m3);
    println!("  Required depth: {:.3} m {}", r.required_depth.value, status_icon(!r.too_deep));
    println!("  Site volume:    {:.2} m³ over {:.0} days", r.total_site_volume_m3, r.excavation_days.value);
    print_warnings(&r.warnings);
}

fn print_prep(r: &PrepScheduleResult) {
    println!("Site preparation:");
    println!("  Pools: {:.2} dig + {:.1} setup → {:.0} days", r.pool_dig_days, r.pool_setup_days, r.total_pool_days);
    println!("  Pits:  {:.2} dig → {:.0} days", r.pit_dig_days, r.total_pit_days);
    println!("  Total: {:.0} days", r.total_prep_days);
    print_warnings(&r.warnings);
}

fn print_earthworks(r: &EarthworksResult) {
    print_pool(&r.pool);
    println!();
    print_pit(&r.pit);
    println!();
    print_prep(&r.prep);
}

fn compliance_icon(compliance: &Compliance) -> &'static str {
    match compliance {
        Compliance::Pass { .. } => "[OK]",
        Compliance::Fail { .. } => "[FAIL]",
        Compliance::NotEvaluated => "[N/A]",
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[TOO DEEP]" }
}

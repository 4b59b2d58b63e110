use clap::{Args, Parser, Subcommand};
use ps_app::{AppError, AppResult, SelectionService, catalog_service};
use ps_engine::{
    ApplicationType, DutyPoint, Evaluation, ExclusionRecord, PumpOutcome, SelectionConfig,
    SelectionReport,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ps-cli")]
#[command(about = "PumpSelect CLI - centrifugal pump selection and ranking", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalog syntax and curve data
    Validate {
        /// Path to the catalog file (YAML or JSON)
        catalog_path: PathBuf,
    },
    /// List pumps in a catalog
    Pumps {
        /// Path to the catalog file (YAML or JSON)
        catalog_path: PathBuf,
    },
    /// Rank the catalog against a duty point
    Select {
        /// Path to the catalog file (YAML or JSON)
        catalog_path: PathBuf,
        #[command(flatten)]
        duty: DutyArgs,
        /// Show only the best N pumps
        #[arg(long)]
        top: Option<usize>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Explain how one pump performs at a duty point
    Evaluate {
        /// Path to the catalog file (YAML or JSON)
        catalog_path: PathBuf,
        /// Pump code
        code: String,
        #[command(flatten)]
        duty: DutyArgs,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct DutyArgs {
    /// Required flow in m³/h
    #[arg(long)]
    flow: f64,
    /// Required head in m
    #[arg(long)]
    head: f64,
    /// Restrict to one pump type (e.g. END_SUCTION, MULTISTAGE, any)
    #[arg(long)]
    pump_type: Option<String>,
    /// NPSH available at the installation in m
    #[arg(long)]
    npsh_available: Option<f64>,
    /// Application context (general, water, wastewater, hvac, fire, irrigation, industrial)
    #[arg(long, default_value = "general")]
    application: ApplicationType,
    /// Selection configuration file overriding defaults (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl DutyArgs {
    fn duty_point(&self) -> AppResult<DutyPoint> {
        let mut duty = DutyPoint::new(self.flow, self.head)?.with_application(self.application);
        if let Some(t) = &self.pump_type {
            duty = duty.with_pump_type(t.clone());
        }
        if let Some(npsh) = self.npsh_available {
            duty = duty.with_npsh_available(npsh);
        }
        duty.validate()?;
        Ok(duty)
    }

    fn selection_config(&self) -> AppResult<SelectionConfig> {
        match &self.config {
            Some(path) => catalog_service::load_config(path),
            None => Ok(SelectionConfig::default()),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { catalog_path } => cmd_validate(&catalog_path),
        Commands::Pumps { catalog_path } => cmd_pumps(&catalog_path),
        Commands::Select {
            catalog_path,
            duty,
            top,
            json,
        } => cmd_select(&catalog_path, &duty, top, json),
        Commands::Evaluate {
            catalog_path,
            code,
            duty,
            json,
        } => cmd_evaluate(&catalog_path, &code, &duty, json),
    }
}

fn cmd_validate(catalog_path: &Path) -> AppResult<()> {
    println!("Validating catalog: {}", catalog_path.display());
    let catalog = catalog_service::load_catalog(catalog_path)?;
    if catalog.pumps.is_empty() {
        return Err(AppError::InvalidInput("catalog contains no pumps".to_string()));
    }
    println!("✓ Catalog '{}' is valid ({} pumps)", catalog.name, catalog.pumps.len());
    Ok(())
}

fn cmd_pumps(catalog_path: &Path) -> AppResult<()> {
    let catalog = catalog_service::load_catalog(catalog_path)?;
    let pumps = catalog_service::list_pumps(&catalog);

    if pumps.is_empty() {
        println!("No pumps found in catalog");
        return Ok(());
    }
    println!("Pumps in '{}':", catalog.name);
    for p in pumps {
        let bep = match (p.bep_flow, p.bep_head) {
            (Some(q), Some(h)) => format!("BEP {:.1} m³/h @ {:.1} m", q, h),
            _ => "BEP unknown".to_string(),
        };
        let diameter = p
            .largest_diameter
            .map(|d| format!("{:.0} mm", d))
            .unwrap_or_else(|| "-".to_string());
        let mut columns = Vec::new();
        if p.has_power {
            columns.push("power");
        }
        if p.has_npsh {
            columns.push("npsh");
        }
        let extras = if columns.is_empty() {
            String::new()
        } else {
            format!(" ({})", columns.join(", "))
        };
        println!(
            "  {} - {} {} [{}] {}, {} curves, max {}{}",
            p.code, p.manufacturer, p.pump_type, p.mode, bep, p.curve_count, diameter, extras
        );
    }
    Ok(())
}

fn build_service(catalog_path: &Path, duty: &DutyArgs) -> AppResult<SelectionService> {
    let catalog = catalog_service::load_catalog(catalog_path)?;
    let config = duty.selection_config()?;
    SelectionService::new(catalog, config)
}

fn cmd_select(
    catalog_path: &Path,
    args: &DutyArgs,
    top: Option<usize>,
    json: bool,
) -> AppResult<()> {
    let duty = args.duty_point()?;
    let service = build_service(catalog_path, args)?;
    let report = service.select(&duty)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report, top);

    let metrics = service.metrics();
    tracing::debug!(
        calls = metrics.calls,
        successes = metrics.successes,
        failures = metrics.failures,
        average_s = metrics.average_seconds(),
        "evaluation metrics"
    );
    Ok(())
}

fn cmd_evaluate(catalog_path: &Path, code: &str, args: &DutyArgs, json: bool) -> AppResult<()> {
    let duty = args.duty_point()?;
    let service = build_service(catalog_path, args)?;
    let outcome = service.evaluate_one(code, &duty)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        PumpOutcome::Evaluated(e) => print_evaluation_detail(&e, &duty),
        PumpOutcome::Excluded(r) => print_exclusion(&r),
    }
    Ok(())
}

fn print_report(report: &SelectionReport, top: Option<usize>) {
    let duty = &report.duty;
    println!("Duty point: {:.2} m³/h @ {:.2} m", duty.flow, duty.head);

    let limit = top.unwrap_or(usize::MAX);
    let mut shown = 0usize;
    for group in &report.tiers {
        if group.evaluations.is_empty() || shown >= limit {
            continue;
        }
        println!(
            "\nTier {} - {} ({})",
            group.tier.number(),
            group.tier.label(),
            group.evaluations.len()
        );
        for e in group.evaluations.iter().take(limit - shown) {
            shown += 1;
            println!("  {:>3}. {}", shown, evaluation_line(e));
        }
    }

    let s = &report.summary;
    println!("\nSummary:");
    println!(
        "  Catalog: {}  Candidates: {}  Evaluated: {}",
        s.catalog_size, s.candidates, s.evaluated
    );
    match (&s.best_pump, s.best_score) {
        (Some(best), Some(score)) => println!("  Best pump: {} (top score {:.1})", best, score),
        _ => println!("  No suitable pump found"),
    }
    if let Some(eff) = s.best_efficiency {
        println!("  Best efficiency: {:.1}%", eff);
    }
    if let Some(kw) = s.min_power_kw {
        println!("  Minimum power (capable pumps): {:.2} kW", kw);
    }

    if !report.exclusions.is_empty() {
        println!("\nExclusions ({}):", report.exclusion_summary.total);
        for (stage, count) in &report.exclusion_summary.by_stage {
            println!("  {}: {}", stage, count);
        }
        for r in &report.exclusions {
            println!("  - {} [{}] {}", r.pump_code, r.stage, r.reason);
        }
    }
}

fn evaluation_line(e: &Evaluation) -> String {
    let adjustment = match (e.performance.trim_pct(), e.performance.speed_ratio()) {
        (Some(t), _) => format!("trim {:.1}%", t),
        (None, Some(n)) => format!("speed {:.1}%", n * 100.0),
        (None, None) => "rated".to_string(),
    };
    let power = e
        .performance
        .power_kw()
        .map(|kw| format!("{:.2} kW", kw))
        .unwrap_or_else(|| "- kW".to_string());
    let flag = if e.is_capable() { "" } else { "  ✗ physical limit" };
    format!(
        "{:<16} {:<12} {:<16} {:<12} eff {:>5.1}%  {:>9}  QBP {:>5.1}%  score {:>6.1}{}",
        e.pump_code,
        e.manufacturer,
        e.selection_method,
        adjustment,
        e.efficiency(),
        power,
        e.qbp,
        e.total_score(),
        flag
    )
}

fn print_evaluation_detail(e: &Evaluation, duty: &DutyPoint) {
    let p = &e.performance;
    println!("Pump {} ({} {})", e.pump_code, e.manufacturer, e.pump_type);
    println!("  Mode: {}  Method: {}", e.operation_mode, e.selection_method);
    println!(
        "  BEP: {:.1} m³/h @ {:.1} m  QBP: {:.1}%  Zone: {}  Tier: {}",
        e.bep_flow,
        e.bep_head,
        e.qbp,
        e.zone.label(),
        e.tier.label()
    );
    println!(
        "  Reference curve: {:.0} mm @ {:.0} rpm",
        p.reference_diameter, p.rated_speed
    );
    if let Some(t) = &p.trim {
        println!(
            "  Trim: {:.1}% ({:.1} mm), exponent {:.1}, required {:.1}%",
            t.trim_pct, t.diameter, t.exponent, t.required_trim_pct
        );
    }
    if let Some(s) = &p.speed {
        println!(
            "  Speed: {:.1}% ({:.0} rpm)",
            s.speed_ratio * 100.0,
            s.speed_rpm
        );
    }
    println!(
        "  Delivered: {:.2} m³/h @ {:.2} m (duty {:.2} m), efficiency {:.1}%",
        p.flow, p.head, duty.head, p.efficiency
    );
    if let Some(power) = &p.power {
        println!("  Power: {:.2} kW ({:?})", power.kw, power.source);
    }
    if let Some(npsh) = p.npsh_required {
        println!("  NPSH required: {:.2} m", npsh);
    }
    match &e.physical.reason {
        None => println!("  ✓ Physically capable"),
        Some(reason) => println!("  ✗ Physically incapable: {}", reason),
    }
    let s = &e.scores;
    println!(
        "  Score: {:.1} = BEP {:.1} + efficiency {:.1} + margin {:.1} + oversizing {:.1} + physical {:.1}",
        s.total,
        s.bep_proximity,
        s.efficiency,
        s.head_margin,
        s.oversizing_penalty,
        s.physical_penalty
    );
}

fn print_exclusion(r: &ExclusionRecord) {
    println!("Pump {} excluded at {}: {}", r.pump_code, r.stage, r.reason);
}

//! Définition et implémentation des commandes CLI
//!
//! - `build`: chaîne complète src/ -> build/
//! - `convert`: format plat -> flat / JSON / GeoJSON
//! - `regions`: JSON -> une Feature par zone et par région
//! - `labels`: JSON -> FeatureCollection des étiquettes

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use polylabel::Solver;
use tracing::info;

use postcode_areas::config::RegionsConfig;
use postcode_areas::export::OutputFormat;
use postcode_areas::pipeline;
use postcode_areas::report::RunReport;

/// Variable d'environnement pour la précision par défaut
const PRECISION_ENV: &str = "POSTCODE_LABEL_PRECISION";

/// Précision par défaut, en degrés
const DEFAULT_PRECISION: f64 = 0.001;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: clean, convert mp.js and p/*.js, generate regions
    Build {
        /// Source directory containing mp.js and p/
        #[arg(long, default_value = "src")]
        src: PathBuf,

        /// Build directory (cleaned first)
        #[arg(long, default_value = "build")]
        out: PathBuf,

        /// Region preset name (uk) or path to a JSON config
        #[arg(long, default_value = "uk")]
        config: String,
    },

    /// Convert flat postcode files to another format
    Convert {
        /// Glob pattern of source files (e.g. "src/p/*.js")
        #[arg(short, long)]
        input: String,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Union postcode areas into regions with labels
    Regions {
        /// JSON area files (`[[code, rings], ...]`), concatenated in order
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Region preset name (uk) or path to a JSON config
        #[arg(long, default_value = "uk")]
        config: String,
    },

    /// Compute one label per postcode area
    Labels {
        /// JSON area files (`[[code, rings], ...]`)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output GeoJSON FeatureCollection
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Options communes du solveur et du rapport
#[derive(Args)]
pub struct SolverArgs {
    /// Label precision in degrees (défaut : env POSTCODE_LABEL_PRECISION / 0.001)
    #[arg(long, global = true)]
    pub precision: Option<f64>,

    /// Log solver progress (debug level)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Write the run report as JSON to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,
}

/// Précision effective: argument, puis variable d'environnement, puis défaut
fn resolve_precision(arg: Option<f64>, env: Option<&str>) -> Result<f64> {
    if let Some(value) = arg {
        return Ok(value);
    }

    match env {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", PRECISION_ENV, raw)),
        None => Ok(DEFAULT_PRECISION),
    }
}

fn build_solver(args: &SolverArgs) -> Result<Solver> {
    let env = std::env::var(PRECISION_ENV).ok();
    let precision = resolve_precision(args.precision, env.as_deref())?;
    let solver = Solver::new(precision)?.with_debug(args.debug);

    info!(precision, debug = args.debug, "Solver ready");
    Ok(solver)
}

fn finish(report: &RunReport, path: Option<&Path>) -> Result<()> {
    report.display();

    if let Some(path) = path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    if report.status == postcode_areas::RunStatus::Failed {
        anyhow::bail!("{}", report.summary());
    }

    Ok(())
}

/// Exécute une commande
pub fn run(command: Commands, args: &SolverArgs) -> Result<()> {
    let report = match command {
        Commands::Build { src, out, config } => {
            info!(src = %src.display(), out = %out.display(), config = %config, "Build");
            let config = RegionsConfig::resolve(&config)?;
            pipeline::build(&src, &out, &build_solver(args)?, &config)?
        }
        Commands::Convert {
            input,
            output,
            format,
        } => {
            info!(input = %input, output = %output.display(), format = format.name(), "Convert");
            pipeline::convert(&input, &output, format)?
        }
        Commands::Regions {
            input,
            output,
            config,
        } => {
            info!(files = input.len(), output = %output.display(), config = %config, "Regions");
            let config = RegionsConfig::resolve(&config)?;
            pipeline::regions(&input, &output, &build_solver(args)?, &config)?
        }
        Commands::Labels { input, output } => {
            info!(files = input.len(), output = %output.display(), "Labels");
            pipeline::labels(&input, &output, &build_solver(args)?)?
        }
    };

    finish(&report, args.report.as_deref())
}

//! `replicate` — run one replication study end to end and print its report.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use replication_stats::{
    analysis::{AnalysisOptions, AnalysisReport, airbnb, charity, patents},
    data::loader::load_csv_with_columns,
    optimization::loglik_optimizer::{
        LineSearcher, MLEOptions, Tolerances,
        types::{DEFAULT_MAX_ITER, DEFAULT_TOL_COST, DEFAULT_TOL_GRAD},
    },
    report::{
        export::{export_coefficients, export_series, write_clt_panels},
        format::{format_clt_panels, format_series_summary, heading},
    },
    simulation::{
        SimulationOptions,
        monte_carlo::{DEFAULT_DRAWS, DEFAULT_REPS, DEFAULT_SEED, Population},
    },
};

#[derive(Parser)]
#[command(
    name = "replicate",
    about = "Replicate the matching-grant, patent-count and Airbnb studies",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    optimizer: OptimizerArgs,
}

/// L-BFGS settings shared by every likelihood fit.
#[derive(Args)]
struct OptimizerArgs {
    /// Iteration cap for the L-BFGS driver
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Gradient-norm tolerance
    #[arg(long, global = true, default_value_t = DEFAULT_TOL_GRAD)]
    tol_grad: f64,

    /// Cost-change tolerance
    #[arg(long, global = true, default_value_t = DEFAULT_TOL_COST)]
    tol_cost: f64,

    /// Line search used by L-BFGS
    #[arg(long, global = true, value_enum, default_value_t = LineSearcher::MoreThuente)]
    line_search: LineSearcher,

    /// Log a summary of every optimizer run; builds with the `obs_slog`
    /// feature also stream per-iteration progress
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Matching-grant charitable-giving experiment
    Charity {
        #[arg(long, value_name = "PATH")]
        data: PathBuf,
        /// Seed for the LLN/CLT simulations
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Patent counts and software-customer status
    Patents {
        #[arg(long, value_name = "PATH")]
        data: PathBuf,
        /// Write the MLE and GLM coefficient tables to this CSV file
        #[arg(long, value_name = "PATH")]
        export_coefficients: Option<PathBuf>,
    },
    /// Airbnb listings and review counts
    Airbnb {
        #[arg(long, value_name = "PATH")]
        data: PathBuf,
        /// Write the MLE and GLM coefficient tables to this CSV file
        #[arg(long, value_name = "PATH")]
        export_coefficients: Option<PathBuf>,
    },
    /// LLN/CLT simulations on Bernoulli response rates
    Simulate {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        /// Length of the running-average series
        #[arg(long, default_value_t = DEFAULT_DRAWS)]
        draws: usize,
        /// Repetitions per CLT sample size
        #[arg(long, default_value_t = DEFAULT_REPS)]
        reps: usize,
        /// Write the running-average series to this CSV file
        #[arg(long, value_name = "PATH")]
        export_series: Option<PathBuf>,
        /// Write the CLT mean differences to this CSV file
        #[arg(long, value_name = "PATH")]
        export_clt: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mle = mle_options(&cli.optimizer)?;

    match cli.command {
        Commands::Charity { data, seed } => {
            let mut opts = AnalysisOptions::with_mle(mle);
            opts.simulation.seed = seed;
            let table = load_csv_with_columns(&data, &charity::REQUIRED_COLUMNS)?;
            print_report(&charity::run_charity(&table, &opts)?);
        }
        Commands::Patents { data, export_coefficients: coef_path } => {
            let table = load_csv_with_columns(&data, &patents::REQUIRED_COLUMNS)?;
            let report = patents::run_patents(&table, &AnalysisOptions::with_mle(mle))?;
            print_report(&report);
            write_coefficient_export(&report, coef_path.as_deref())?;
        }
        Commands::Airbnb { data, export_coefficients: coef_path } => {
            let table = load_csv_with_columns(&data, &airbnb::REQUIRED_COLUMNS)?;
            let report = airbnb::run_airbnb(&table, &AnalysisOptions::with_mle(mle))?;
            print_report(&report);
            write_coefficient_export(&report, coef_path.as_deref())?;
        }
        Commands::Simulate { seed, draws, reps, export_series: series_path, export_clt } => {
            let defaults = SimulationOptions::default();
            let opts = SimulationOptions::new(seed, draws, reps, defaults.sample_sizes)?;
            run_simulate(&opts, series_path.as_deref(), export_clt.as_deref())?;
        }
    }
    Ok(())
}

fn mle_options(args: &OptimizerArgs) -> Result<MLEOptions> {
    let tols = Tolerances::new(Some(args.tol_grad), Some(args.tol_cost), Some(args.max_iter))?;
    Ok(MLEOptions::new(tols, args.line_search, None)?.with_verbose(args.verbose))
}

fn run_simulate(
    opts: &SimulationOptions, series_path: Option<&Path>, clt_path: Option<&Path>,
) -> Result<()> {
    let (series, panels) = charity::response_simulations(opts)?;
    let control = Population::Bernoulli(charity::CONTROL_RESPONSE_RATE);
    let treatment = Population::Bernoulli(charity::TREATMENT_RESPONSE_RATE);
    println!("{}", heading("Response-rate simulations"));
    println!("true difference = {:.6}", control.mean() - treatment.mean());
    println!(
        "{}",
        format_series_summary(
            "Cumulative average of control - treatment",
            &series,
            &charity::SERIES_CHECKPOINTS
        )
    );
    println!("{}", format_clt_panels(&panels));

    if let Some(path) = series_path {
        export_series(path, &series)?;
        info!("wrote running-average series to {}", path.display());
    }
    if let Some(path) = clt_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_clt_panels(file, &panels)?;
        info!("wrote CLT panels to {}", path.display());
    }
    Ok(())
}

fn write_coefficient_export(report: &AnalysisReport, path: Option<&Path>) -> Result<()> {
    let Some(path) = path else { return Ok(()) };
    if report.coefficients.is_empty() {
        warn!("no fitted model in '{}', skipping coefficient export", report.title);
        return Ok(());
    }
    export_coefficients(path, &report.coefficients)?;
    info!("wrote {} coefficient table(s) to {}", report.coefficients.len(), path.display());
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("{}", report.render());
    let failed = report.failures().count();
    if failed > 0 {
        info!("{failed} section(s) of '{}' failed", report.title);
    }
}

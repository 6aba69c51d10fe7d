//! QuantArena CLI — score submissions against withheld price history.
//!
//! Commands:
//! - `score` — evaluate a vectorized submission CSV against a price CSV
//! - `demo` — run the built-in moving-average callback strategy end-to-end

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quantarena_core::strategy::{MovingAverageCross, StrategyFactory};
use quantarena_runner::{
    evaluate_callback, evaluate_vectorized, write_record, EvalParams, EvaluationRecord,
    SubmissionIds,
};

#[derive(Parser)]
#[command(
    name = "quantarena",
    about = "QuantArena CLI — portfolio backtest evaluation engine"
)]
struct Cli {
    /// Log level when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a vectorized submission against a price history.
    Score {
        /// Long-format price CSV (timestamp, instrument, close[, volume]).
        #[arg(long)]
        prices: PathBuf,

        /// Long-format submission CSV (timestamp, instrument, position_size).
        #[arg(long)]
        submission: PathBuf,

        /// Optional TOML file overriding the default evaluation parameters.
        #[arg(long)]
        params: Option<PathBuf>,

        /// Participant identifier (opaque).
        #[arg(long, default_value = "local")]
        participant: String,

        /// Submission identifier (opaque).
        #[arg(long, default_value = "local")]
        submission_id: String,

        /// Output directory for the evaluation record JSON.
        #[arg(long, default_value = "records")]
        output_dir: PathBuf,
    },
    /// Run the built-in moving-average crossover through the callback path.
    Demo {
        /// Long-format price CSV (timestamp, instrument, close[, volume]).
        #[arg(long)]
        prices: PathBuf,

        /// Fast moving-average window.
        #[arg(long, default_value_t = 10)]
        fast: usize,

        /// Slow moving-average window.
        #[arg(long, default_value_t = 30)]
        slow: usize,

        /// Optional TOML file overriding the default evaluation parameters.
        #[arg(long)]
        params: Option<PathBuf>,

        /// Output directory for the evaluation record JSON.
        #[arg(long, default_value = "records")]
        output_dir: PathBuf,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
    Ok(())
}

fn load_params(path: Option<&PathBuf>) -> Result<EvalParams> {
    match path {
        Some(p) => {
            EvalParams::load(p).with_context(|| format!("loading parameters from {}", p.display()))
        }
        None => Ok(EvalParams::default()),
    }
}

fn read_file(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn report(record: &EvaluationRecord, output_dir: &PathBuf) -> Result<()> {
    println!("status:       {}", record.status);
    if let Some(metrics) = &record.metrics {
        println!("sharpe:       {:.4}", metrics.sharpe);
        println!("total return: {:.4}%", metrics.total_return * 100.0);
        println!("ann. return:  {:.4}%", metrics.annual_return * 100.0);
        println!("ann. vol:     {:.4}%", metrics.annual_volatility * 100.0);
        println!("max drawdown: {:.4}%", metrics.max_drawdown * 100.0);
        println!("turnover:     {:.4}", metrics.turnover_total);
    }
    if !record.error_log.is_empty() {
        println!("step faults:  {}", record.error_log.len());
    }
    let path = write_record(record, output_dir)?;
    println!("record:       {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Score {
            prices,
            submission,
            params,
            participant,
            submission_id,
            output_dir,
        } => {
            let eval_params = load_params(params.as_ref())?;
            let ids = SubmissionIds::new(participant, submission_id);
            let record = evaluate_vectorized(
                &read_file(&prices)?,
                &read_file(&submission)?,
                &ids,
                &eval_params,
            )?;
            report(&record, &output_dir)
        }
        Commands::Demo {
            prices,
            fast,
            slow,
            params,
            output_dir,
        } => {
            if fast == 0 || fast >= slow {
                bail!("--fast ({fast}) must be non-zero and shorter than --slow ({slow})");
            }
            let eval_params = load_params(params.as_ref())?;
            let factory: StrategyFactory = Box::new(move |universe: &[String]| {
                Box::new(
                    MovingAverageCross::new(universe.to_vec(), fast, slow)
                        .expect("windows checked before the run"),
                )
            });
            let ids = SubmissionIds::new("demo", "moving-average-cross");
            let record = evaluate_callback(&read_file(&prices)?, &factory, &ids, &eval_params)?;
            report(&record, &output_dir)
        }
    }
}

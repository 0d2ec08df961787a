use monocheck::monotone::{check, Tolerances};
use monocheck::plot::plot_samples;
use monocheck::report::{write_text, JsonReport, Outcome, EXIT_USAGE};
use monocheck::samples::{load_csv, SampleError};

use anyhow::Result;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "monocheck",
    version,
    about = "Sanity-check sample CSV for monotone Y in near-vertical runs"
)]
struct Args {
    /// Path to sample CSV (needs `x` and `y` columns)
    csv_path: String,

    /// Max |dx| to consider a segment vertical
    #[arg(long, default_value_t = 1.0e-6)]
    x_tol: f64,
    /// Min |dy| to consider a segment moving
    #[arg(long, default_value_t = 1.0e-6)]
    y_tol: f64,
    /// Allowed epsilon for monotone violations
    #[arg(long, default_value_t = 1.0e-6)]
    eps: f64,

    /// Print a JSON report on stdout instead of the OK line
    #[arg(long, action = clap::ArgAction::SetTrue)]
    json: bool,
    /// Write a PNG of the samples with violations highlighted
    #[arg(long)]
    plot: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "monocheck=debug" } else { "monocheck=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(EXIT_USAGE as u8)
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let tol = Tolerances::new(args.x_tol, args.y_tol, args.eps)?;
    let samples = load_csv(&args.csv_path).map_err(|e| match e {
        e @ SampleError::MissingColumns { .. } => anyhow::Error::new(e),
        e => anyhow::Error::new(e).context(format!("loading {}", args.csv_path)),
    })?;
    if samples.skipped > 0 {
        warn!(skipped = samples.skipped, "rows with non-numeric x/y were skipped");
    }

    let violations = check(&samples.points, tol);
    let outcome = Outcome::of(samples.points.len(), &violations);
    info!(rows = samples.points.len(), violations = violations.len(), ?outcome, "check finished");

    if args.json {
        println!("{}", JsonReport::new(&args.csv_path, &samples, tol, &violations).to_json()?);
    } else {
        write_text(outcome, &violations, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    }

    if let Some(path) = &args.plot {
        if samples.points.is_empty() {
            warn!("no samples to plot");
        } else {
            // the plot never changes the validation outcome
            match plot_samples(&samples.points, &violations, path) {
                Ok(()) => info!(path = %path, "plot written"),
                Err(e) => error!(path = %path, "plot failed: {e:#}"),
            }
        }
    }
    Ok(outcome)
}

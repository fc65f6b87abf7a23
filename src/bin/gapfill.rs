use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use gapfill::{fill_batch, BatchReport, BatchResponse, ImputeOptions, Series};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fill gaps in numeric series", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill every series in a JSON batch (an array of arrays, `null` marking a gap)
    Fill(FillArgs),
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// JSON batch to fill
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Residual budget for the smoothing spline; 0 interpolates exactly
    #[arg(short, long, default_value_t = 1.0)]
    smoothness: f64,

    /// Output JSON path (`-` for stdout)
    #[arg(short, long, default_value = "-", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Abort on the first series that cannot be filled
    #[arg(long)]
    strict: bool,

    /// Write one PNG per filled series into this directory
    #[cfg(feature = "plotting")]
    #[arg(long, value_hint = ValueHint::DirPath)]
    plot_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match &cli.command {
        Command::Fill(args) => {
            if args.verbose {
                "debug"
            } else {
                "info"
            }
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Fill(args) => handle_fill(&args),
    }
}

fn handle_fill(args: &FillArgs) -> Result<()> {
    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let batch: Vec<Series<f64>> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of series", args.input.display()))?;

    let options = ImputeOptions::default().with_smoothness(args.smoothness);
    let results = fill_batch(&batch, &options);

    #[cfg(feature = "plotting")]
    if let Some(dir) = &args.plot_dir {
        plot_results(&results, dir)?;
    }

    let json = if args.strict {
        let response =
            BatchResponse::from_results(results).context("batch could not be filled")?;
        info!(series = response.filled.len(), "filled batch");
        serde_json::to_string_pretty(&response)?
    } else {
        let report = BatchReport::from_results(results);
        info!(
            series = report.filled.len(),
            failed = report.errors.len(),
            "filled batch"
        );
        serde_json::to_string_pretty(&report)?
    };

    write_output(&args.output, &json)
}

fn write_output(path: &Path, json: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        return Ok(());
    }

    fs::write(path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "plotting")]
fn plot_results(results: &[gapfill::Result<gapfill::Imputation<f64>>], dir: &Path) -> Result<()> {
    use gapfill::plotting::{plot_imputation, PlotOptions};

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for (index, result) in results.iter().enumerate() {
        let Ok(imputation) = result else {
            continue;
        };

        let path = dir.join(format!("series_{index}.png"));
        let options = PlotOptions {
            title: format!("Series {index}"),
            ..PlotOptions::default()
        };
        plot_imputation(imputation, &path, &options)
            .map_err(|e| anyhow::anyhow!("failed to plot {}: {e}", path.display()))?;
    }

    info!("wrote plots to {}", dir.display());
    Ok(())
}

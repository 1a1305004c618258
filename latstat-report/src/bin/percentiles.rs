use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use latstat_common::{read_measurements, LatStatError};
use latstat_report::config::{OutputFormat, PercentileConfig};
use latstat_report::logging::init_logging;
use latstat_report::percentile::PercentileReport;
use latstat_report::table::{render_json, render_percentiles};
use latstat_report::{exit_code, EXIT_DATA, EXIT_USAGE};
use std::io::{self, Write};
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "latstat-percentiles",
    about = "Report connect / first byte / delta percentiles for measurements read from stdin"
)]
struct Args {
    /// Percentile rank to report, 0 to 100 (repeatable or comma-separated) [default: 50,75,90,95,99,99.9]
    #[arg(short = 'p', long = "percentile", value_name = "RANK", value_delimiter = ',')]
    ranks: Vec<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() {
    let args = parse_args();
    init_logging();

    let config = if args.ranks.is_empty() {
        PercentileConfig::default()
    } else {
        PercentileConfig::new(args.ranks).unwrap_or_else(|e| fail(&e))
    };

    let measurements = read_measurements(io::stdin().lock()).unwrap_or_else(|e| fail(&e));
    info!(count = measurements.len(), "read measurements from stdin");

    let report = PercentileReport::build(&measurements, &config).unwrap_or_else(|e| fail(&e));

    let output = match args.format {
        OutputFormat::Text => render_percentiles(&report),
        OutputFormat::Json => render_json(&report).unwrap_or_else(|e| {
            eprintln!("Failed to encode report: {e}");
            process::exit(EXIT_DATA);
        }),
    };

    if let Err(e) = io::stdout().lock().write_all(output.as_bytes()) {
        eprintln!("Failed to write report: {e}");
        process::exit(EXIT_DATA);
    }
}

/// Like `Args::parse`, but bad flag values are usage errors: help on stdout, exit status 1.
fn parse_args() -> Args {
    Args::try_parse().unwrap_or_else(|e| {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
        eprintln!("{e}");
        Args::command().print_help().ok();
        process::exit(EXIT_USAGE);
    })
}

fn fail(err: &LatStatError) -> ! {
    eprintln!("{err}");
    if err.is_usage() {
        Args::command().print_help().ok();
    }
    process::exit(exit_code(err));
}

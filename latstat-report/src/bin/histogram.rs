use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use latstat_common::LatStatError;
use latstat_report::config::{
    HistogramConfig, OutputFormat, DEFAULT_BIN_COUNT, DEFAULT_BIN_SIZE_MS,
};
use latstat_report::histogram::HistogramReport;
use latstat_report::logging::init_logging;
use latstat_report::source::{load_sources, parse_positionals};
use latstat_report::table::{render_histogram, render_json};
use latstat_report::{exit_code, EXIT_DATA, EXIT_USAGE};
use std::io::{self, Write};
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "latstat-histogram",
    override_usage = "latstat-histogram [OPTIONS] <ttfb|ttc|delta> [<name> <file>]+",
    about = "Outputs histogram data suitable for use with gnuplot"
)]
struct Args {
    /// Number of bins
    #[arg(short = 'b', value_name = "BINS", default_value_t = DEFAULT_BIN_COUNT)]
    bins: usize,

    /// Bin size (in ms)
    #[arg(short = 's', value_name = "BIN_SIZE", default_value_t = DEFAULT_BIN_SIZE_MS)]
    bin_size: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Series kind, then one or more name/file pairs
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

fn main() {
    let args = parse_args();
    init_logging();

    let (kind, sources) = parse_positionals(&args.args).unwrap_or_else(|e| fail(&e));
    let config = HistogramConfig::new(kind, args.bins, args.bin_size).unwrap_or_else(|e| fail(&e));

    let loaded = load_sources(&sources).unwrap_or_else(|e| fail(&e));
    info!(%kind, sources = loaded.len(), bins = config.bin_count(), "building histogram");

    let report = HistogramReport::build(&loaded, &config);

    let output = match args.format {
        OutputFormat::Text => render_histogram(&report),
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

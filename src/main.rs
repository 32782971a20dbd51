//! Simulation Plot - stacked time-series charts for queueing simulation output.
//!
//! Reads the CSV written by the queue simulator (queue length, latency,
//! slowdown, timeouts, drop probability, rejections over time) and shows
//! six stacked line charts sharing the time axis in the terminal, or
//! writes them to an SVG file.

mod display;
mod error;
mod figure;
mod load;
mod plot;
mod sample;

use anyhow::{Context, Result};
use clap::Parser;
use figure::Figure;
use std::path::PathBuf;

/// File read when no input path is given
const DEFAULT_INPUT: &str = "sim.csv";

/// Plot queueing simulation metrics from a CSV file
#[derive(Parser, Debug)]
#[command(name = "simplot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation output CSV (header line, then 11 numeric columns per row)
    #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
    file: PathBuf,

    /// Write the figure to this SVG file instead of opening the viewer
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long, default_value_t = plot::DEFAULT_SIZE.0)]
    width: u32,

    /// SVG height in pixels
    #[arg(long, default_value_t = plot::DEFAULT_SIZE.1)]
    height: u32,

    /// Where the viewer's save key writes the SVG
    #[arg(long, value_name = "FILE", default_value = "sim.svg")]
    save_path: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let samples = load::load_samples(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    if samples.is_empty() {
        log::warn!("{} has no data rows", args.file.display());
    }

    let figure = Figure::from_samples(&samples);
    let size = (args.width, args.height);

    match args.output {
        Some(ref path) => plot::save_svg(&figure, path, size)?,
        None => display::show(&figure, &args.save_path, size)?,
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn reads_default_file_without_arguments() {
        let args = Args::try_parse_from(["simplot"]).unwrap();
        assert_eq!(args.file, PathBuf::from("sim.csv"));
        assert!(args.output.is_none());
    }

    #[test]
    fn first_argument_is_input_path() {
        let args = Args::try_parse_from(["simplot", "runs/overload.csv"]).unwrap();
        assert_eq!(args.file, PathBuf::from("runs/overload.csv"));
    }

    #[test]
    fn output_options() {
        let args = Args::try_parse_from([
            "simplot", "-o", "out.svg", "--width", "800", "--height", "900", "-vv",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.output, Some(PathBuf::from("out.svg")));
        assert_eq!((args.width, args.height), (800, 900));
        assert_eq!(args.verbose, 2);
    }
}

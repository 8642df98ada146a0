use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use capture_log::{capture_log, CaptureConfig, BAUD_RATE, DEFAULT_OUTPUT, DEFAULT_PORT};
use clap::Parser;

/// Send LOG DUMP to a roast meter and save the CSV it answers with
#[derive(Debug, Parser)]
#[command(name = "capture_log", version)]
struct Args {
    /// Serial device path
    #[arg(default_value = DEFAULT_PORT)]
    port: String,

    /// Output CSV file, overwritten on each run
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[arg(
        short,
        long,
        default_value_t = BAUD_RATE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    baud: u32,

    /// Seconds to wait for the end of the dump
    #[arg(long, default_value_t = 300)]
    deadline: u64,

    /// Milliseconds to wait after opening the port (the board resets)
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .format_target(false)
        .init();

    let config = CaptureConfig::new(&args.port, args.output)
        .with_baud_rate(args.baud)
        .with_deadline(Duration::from_secs(args.deadline))
        .with_settle_delay(Duration::from_millis(args.settle_ms));

    let outcome =
        capture_log(&config).with_context(|| format!("capture from {} failed", config.port))?;
    println!("{outcome}");
    Ok(())
}

//! golden_sobel CLI: runs the reference pipeline on a hex stream and reports timings.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use golden_sobel::core_modules::comparison;
use golden_sobel::core_modules::hex_codec;
use golden_sobel::parallel_pipeline::ParallelPipeline;
use golden_sobel::{GoldenPipeline, Mode, PipelineConfig, RunReport, Stage};
use tracing::error;

#[derive(Parser)]
#[command(name = "golden_sobel")]
#[command(about = "Golden-model median filter + Sobel edge detector over 512x512 hex images")]
#[command(version)]
struct Cli {
    /// Path to the input hex file (262144 hex bytes, one per line).
    input: PathBuf,

    /// Compute mode. When omitted, the mode is read interactively from stdin.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Hex output of an accelerated implementation to check against the golden result.
    #[arg(long)]
    check: Option<PathBuf>,

    /// Also run the row-parallel pipeline and verify it matches the golden result.
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Sobel detection only.
    #[value(name = "unfiltered", alias = "0")]
    Unfiltered,
    /// Median filter, then Sobel detection.
    #[value(name = "filtered", alias = "1")]
    Filtered,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Unfiltered => Mode::Unfiltered,
            ModeArg::Filtered => Mode::Filtered,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the run succeeded but a requested check found differences.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mode = match cli.mode {
        Some(mode) => mode.into(),
        None => prompt_mode()?,
    };

    let pipeline = GoldenPipeline::new(PipelineConfig::default());
    let report = pipeline
        .run(&cli.input, mode)
        .with_context(|| format!("golden run failed for {}", cli.input.display()))?;

    // Every check runs before anything reaches stdout, so a failed run prints no timings.
    let checks = run_checks(&cli, pipeline.config(), &report)?;

    println!("{}", report.timings);
    for line in &checks.lines {
        println!("{line}");
    }
    Ok(checks.all_match)
}

#[derive(Debug)]
struct CheckOutcome {
    lines: Vec<String>,
    all_match: bool,
}

fn run_checks(cli: &Cli, config: &PipelineConfig, report: &RunReport) -> anyhow::Result<CheckOutcome> {
    let mut outcome = CheckOutcome {
        lines: Vec::new(),
        all_match: true,
    };

    if cli.parallel {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(num_cpus::get())
            .enable_all()
            .build()
            .context("failed to start the parallel runtime")?;
        let parallel = ParallelPipeline::with_available_parallelism();
        let input = Arc::new(report.input.clone());
        let start = Instant::now();
        let result = runtime.block_on(parallel.process(input, report.mode))?;
        let elapsed = start.elapsed();
        let diff = comparison::compare(&report.result, &result)?;
        outcome
            .lines
            .push(format!("Parallel Critical Section Time: {}", elapsed.as_nanos()));
        outcome
            .lines
            .push(format!("Parallel Check ({} workers): {diff}", parallel.workers()));
        outcome.all_match &= diff.is_identical();
    }

    if let Some(candidate_path) = &cli.check {
        let candidate = hex_codec::decode_file(
            candidate_path,
            config.grid_width,
            config.grid_height,
            Stage::Check,
        )?;
        let diff = comparison::compare(&report.result, &candidate)?;
        outcome.lines.push(format!("Check: {diff}"));
        outcome.all_match &= diff.is_identical();
    }

    Ok(outcome)
}

fn prompt_mode() -> anyhow::Result<Mode> {
    println!("choose mode:");
    println!("Unfiltered: [0]");
    println!("Filtered: [1]");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read mode from stdin")?;
    if read == 0 {
        anyhow::bail!("no mode given on stdin");
    }
    Ok(line.parse::<Mode>()?)
}

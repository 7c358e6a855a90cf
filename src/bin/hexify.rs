use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use golden_sobel::config::{GRID_HEIGHT, GRID_WIDTH};
use golden_sobel::core_modules::hex_codec;
use golden_sobel::core_modules::utils::image_helper::image_helper;

/// Converts a 512x512 raster image into a golden-model hex stream.
#[derive(Parser)]
#[command(name = "hexify")]
#[command(version)]
struct Cli {
    /// Input image (any format the `image` crate can decode).
    image: PathBuf,
    /// Destination hex file.
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let grid = image_helper::grid_from_image(&cli.image, GRID_WIDTH, GRID_HEIGHT)
        .with_context(|| format!("cannot convert {}", cli.image.display()))?;
    hex_codec::encode(&grid, &cli.output)?;
    println!("wrote {} samples to {}", grid.samples().len(), cli.output.display());
    Ok(())
}

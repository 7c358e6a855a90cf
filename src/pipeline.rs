// THEORY:
// The `pipeline` module is the top-level driver of the golden model. A run is
// three linear phases with no way back:
//
// 1.  **Load**: decode the input hex stream into a `Grid` (I/O).
// 2.  **Compute**: the critical section. `Mode::Unfiltered` runs the Sobel detector
//     alone; `Mode::Filtered` runs the median filter and then the detector.
// 3.  **Store**: encode the result as a hex stream and render it as a PNG (I/O).
//
// Two intervals are measured: `critical` spans phase 2 only and `full` spans
// phase 1 through phase 3. Any error aborts the run before timings exist, so a
// caller never sees partial timings. Everything here is single-threaded and
// deterministic; the output is the oracle other implementations are checked
// against.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::core_modules::grid::grid::Grid;
use crate::core_modules::utils::image_helper::image_helper;
use crate::core_modules::{hex_codec, median_filter, sobel_detector};
use crate::error::{GoldenError, Stage};

// Re-export key data structures for the public API.
pub use crate::config::{Mode, PipelineConfig};

/// Wall-clock durations of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimings {
    /// Filtering and detection only.
    pub critical: Duration,
    /// Load through Store inclusive.
    pub full: Duration,
}

impl RunTimings {
    pub fn critical_ns(&self) -> u128 {
        self.critical.as_nanos()
    }

    pub fn full_ns(&self) -> u128 {
        self.full.as_nanos()
    }
}

impl fmt::Display for RunTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Critical Section Time: {}", self.critical_ns())?;
        write!(f, "Total Time: {}", self.full_ns())
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: Mode,
    pub input: Grid,
    pub result: Grid,
    pub timings: RunTimings,
}

/// The sequential reference pipeline.
pub struct GoldenPipeline {
    config: PipelineConfig,
}

impl GoldenPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The critical section: grid in, binary edge map out.
    pub fn compute(&self, grid: &Grid, mode: Mode) -> Result<Grid, GoldenError> {
        match mode {
            Mode::Unfiltered => sobel_detector::apply(grid),
            Mode::Filtered => {
                let smoothed = median_filter::apply(grid)?;
                sobel_detector::apply(&smoothed)
            }
        }
    }

    /// Runs Load, Compute and Store against the configured output paths.
    pub fn run(&self, input: impl AsRef<Path>, mode: Mode) -> Result<RunReport, GoldenError> {
        let input_path = input.as_ref();
        let start = Instant::now();

        // --- 1. Load ---
        debug!(path = %input_path.display(), %mode, "loading input");
        let grid = hex_codec::decode_file(
            input_path,
            self.config.grid_width,
            self.config.grid_height,
            Stage::Load,
        )?;

        // --- 2. Compute ---
        let critical_start = Instant::now();
        let result = self.compute(&grid, mode)?;
        let critical = critical_start.elapsed();
        info!(%mode, critical_ns = critical.as_nanos() as u64, "critical section complete");

        // --- 3. Store ---
        ensure_parent_dir(&self.config.hex_output_path, Stage::Store)?;
        hex_codec::encode(&result, &self.config.hex_output_path)?;
        ensure_parent_dir(&self.config.raster_output_path, Stage::Raster)?;
        image_helper::save_grid_png(&result, &self.config.raster_output_path)?;
        let full = start.elapsed();
        info!(full_ns = full.as_nanos() as u64, "run complete");

        Ok(RunReport {
            mode,
            input: grid,
            result,
            timings: RunTimings { critical, full },
        })
    }
}

impl Default for GoldenPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

fn ensure_parent_dir(path: &Path, stage: Stage) -> Result<(), GoldenError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| GoldenError::io(stage, parent, e))
        }
        _ => Ok(()),
    }
}

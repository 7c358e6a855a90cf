// THEORY:
// Every numeric contract of the golden model lives here: the fixed grid size of
// the hex format, the two Sobel kernels, the edge threshold and the output
// locations. They are plain `const` items, so they are immutable and live for the
// whole process. `PipelineConfig` bundles them for the driver; its `Default` is the
// reference configuration, and tests only override the output paths.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::GoldenError;

/// Width of every grid carried by the hex format, in samples.
pub const GRID_WIDTH: usize = 512;
/// Height of every grid carried by the hex format, in samples.
pub const GRID_HEIGHT: usize = 512;
/// Number of hex tokens in a well-formed input stream.
pub const GRID_SAMPLES: usize = GRID_WIDTH * GRID_HEIGHT;

/// Gradient magnitudes strictly greater than this are edges.
pub const SOBEL_THRESHOLD: i32 = 150;

/// A 3x3 convolution kernel, indexed `[row][col]`.
pub type Kernel = [[i32; 3]; 3];

/// Horizontal (x) gradient kernel.
pub const KERNEL_X: Kernel = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
/// Vertical (y) gradient kernel.
pub const KERNEL_Y: Kernel = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

pub const HEX_OUTPUT_PATH: &str = "out/golden_sobel.hex";
pub const RASTER_OUTPUT_PATH: &str = "out/goldenOutput.png";

/// Selects the compute phase of a run. Fixed for the lifetime of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Sobel detection only (menu entry `0`).
    Unfiltered,
    /// Median filter followed by Sobel detection (menu entry `1`).
    Filtered,
}

impl TryFrom<u8> for Mode {
    type Error = GoldenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Unfiltered),
            1 => Ok(Mode::Filtered),
            other => Err(GoldenError::InvalidMode(other.to_string())),
        }
    }
}

impl FromStr for Mode {
    type Err = GoldenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "unfiltered" => Ok(Mode::Unfiltered),
            "1" | "filtered" => Ok(Mode::Filtered),
            _ => Err(GoldenError::InvalidMode(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Unfiltered => write!(f, "unfiltered"),
            Mode::Filtered => write!(f, "filtered"),
        }
    }
}

/// Configuration for the `GoldenPipeline`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    /// Destination of the encoded result grid.
    pub hex_output_path: PathBuf,
    /// Destination of the grayscale PNG rendering of the result grid.
    pub raster_output_path: PathBuf,
}

impl PipelineConfig {
    /// Reference configuration with both outputs placed under `dir` instead of `out/`.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            hex_output_path: dir.join("golden_sobel.hex"),
            raster_output_path: dir.join("goldenOutput.png"),
            ..Self::default()
        }
    }

    pub fn sample_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            hex_output_path: PathBuf::from(HEX_OUTPUT_PATH),
            raster_output_path: PathBuf::from(RASTER_OUTPUT_PATH),
        }
    }
}

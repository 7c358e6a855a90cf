// THEORY:
// This file is the entry point for the `golden_sobel` library crate: a
// sequential, bit-exact reference for 3x3 median filtering and Sobel edge
// detection over 512x512 grayscale grids stored as hex streams.
//
// The public surface is the `GoldenPipeline` driver in `pipeline`, the pure
// grid-to-grid stages in `core_modules`, the fixed constants in `config`, and the
// row-banded `ParallelPipeline` that exists to be compared against the reference.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use config::{Mode, PipelineConfig};
pub use core_modules::grid::grid::{Grid, Sample};
pub use error::{FormatError, GoldenError, Stage};
pub use pipeline::{GoldenPipeline, RunReport, RunTimings};

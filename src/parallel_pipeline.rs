// THEORY:
// `ParallelPipeline` is the row-partitioned counterpart of the golden pipeline.
// It exists to be checked against the reference, never to replace it.
//
// Key points:
// 1.  **Bands**: the output rows are split into contiguous bands, one per worker.
//     Each band is computed on the blocking pool from a shared, read-only `Arc<Grid>`.
// 2.  **Same kernels**: bands call `median_filter::filter_rows` and
//     `sobel_detector::detect_rows`, the row-range functions the sequential filters
//     are built on, so a correct partitioning yields bit-identical output.
// 3.  **Stage barrier**: in filtered mode every median band finishes before any Sobel
//     band starts, because Sobel windows read rows owned by neighboring bands.

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::config::Mode;
use crate::core_modules::grid::grid::{Grid, Sample};
use crate::core_modules::{median_filter, sobel_detector};
use crate::error::GoldenError;

#[derive(Debug, Clone, Copy)]
enum BandStage {
    Median,
    Sobel,
}

pub struct ParallelPipeline {
    workers: usize,
}

impl ParallelPipeline {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per logical CPU.
    pub fn with_available_parallelism() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Computes the same edge map as `GoldenPipeline::compute`, split across workers.
    pub async fn process(&self, grid: Arc<Grid>, mode: Mode) -> Result<Grid, GoldenError> {
        grid.ensure_filterable()?;
        let start = Instant::now();
        let source = match mode {
            Mode::Unfiltered => grid,
            Mode::Filtered => Arc::new(self.run_stage(grid, BandStage::Median).await?),
        };
        let edges = self.run_stage(source, BandStage::Sobel).await?;
        info!(
            %mode,
            workers = self.workers,
            elapsed_ns = start.elapsed().as_nanos() as u64,
            "parallel compute complete"
        );
        Ok(edges)
    }

    async fn run_stage(&self, input: Arc<Grid>, stage: BandStage) -> Result<Grid, GoldenError> {
        let bands = row_bands(input.height(), self.workers);
        debug!(?stage, bands = bands.len(), "dispatching row bands");

        let tasks = bands.into_iter().map(|rows| {
            let input = Arc::clone(&input);
            tokio::task::spawn_blocking(move || compute_band(&input, rows, stage))
        });
        let outputs: Vec<Vec<Sample>> = try_join_all(tasks)
            .await
            .map_err(|e| GoldenError::Worker(e.to_string()))?;

        // try_join_all preserves task order, which is band order.
        let samples: Vec<Sample> = outputs.into_iter().flatten().collect();
        Grid::from_vec(input.width(), input.height(), samples)
    }
}

fn compute_band(input: &Grid, rows: Range<usize>, stage: BandStage) -> Vec<Sample> {
    match stage {
        BandStage::Median => median_filter::filter_rows(input, rows),
        BandStage::Sobel => sobel_detector::detect_rows(input, rows),
    }
}

/// Splits `0..height` into at most `workers` contiguous, non-empty ranges of near-equal size.
pub fn row_bands(height: usize, workers: usize) -> Vec<Range<usize>> {
    let count = workers.max(1).min(height);
    if count == 0 {
        return Vec::new();
    }
    let base = height / count;
    let extra = height % count;
    let mut bands = Vec::with_capacity(count);
    let mut start = 0;
    for i in 0..count {
        let len = base + usize::from(i < extra);
        bands.push(start..start + len);
        start += len;
    }
    bands
}

// THEORY:
// The median filter is the optional smoothing stage. Each interior output sample
// is the median of the 3x3 input window around it; border samples are copied
// through unchanged. Output samples depend only on a read-only window of the
// input, so any subset of rows can be computed on its own. `filter_rows` is that
// unit of work; `apply` runs it over the whole grid and is the reference path.

use std::ops::Range;

use crate::core_modules::grid::grid::{Grid, Sample};
use crate::core_modules::neighborhood::neighborhood::Neighborhood;
use crate::error::GoldenError;

/// Median-filters `input` into a new grid of the same size.
pub fn apply(input: &Grid) -> Result<Grid, GoldenError> {
    input.ensure_filterable()?;
    let samples = filter_rows(input, 0..input.height());
    Grid::from_vec(input.width(), input.height(), samples)
}

/// Computes output rows `rows` of the median filter, row-major.
pub fn filter_rows(input: &Grid, rows: Range<usize>) -> Vec<Sample> {
    let mut output = Vec::with_capacity(rows.len() * input.width());
    for row in rows {
        for col in 0..input.width() {
            let value = if input.is_border(row, col) {
                input.row(row)[col]
            } else {
                Neighborhood::around(input, row, col).median()
            };
            output.push(value);
        }
    }
    output
}

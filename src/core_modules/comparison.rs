// THEORY:
// The comparison is the reason the golden model exists: an accelerated
// implementation's output grid is checked sample by sample against the
// reference grid. Equality is exact; there is no tolerance.

use std::fmt;

use tracing::warn;

use crate::core_modules::grid::grid::{Grid, Sample};
use crate::error::GoldenError;

/// The first differing sample in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: Sample,
    pub actual: Sample,
}

/// Result of comparing a candidate grid against the reference grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDiff {
    pub mismatches: usize,
    pub first_mismatch: Option<Mismatch>,
}

impl GridDiff {
    pub fn is_identical(&self) -> bool {
        self.mismatches == 0
    }
}

impl fmt::Display for GridDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_mismatch {
            None => write!(f, "identical"),
            Some(m) => write!(
                f,
                "{} mismatches (first at row {}, col {}: expected {}, found {})",
                self.mismatches, m.row, m.col, m.expected, m.actual
            ),
        }
    }
}

/// Compares `candidate` against `reference`. Grids of different size are a shape error.
pub fn compare(reference: &Grid, candidate: &Grid) -> Result<GridDiff, GoldenError> {
    if reference.width() != candidate.width() || reference.height() != candidate.height() {
        return Err(GoldenError::shape(format!(
            "candidate is {}x{}, reference is {}x{}",
            candidate.width(),
            candidate.height(),
            reference.width(),
            reference.height()
        )));
    }

    let width = reference.width();
    let mut diff = GridDiff {
        mismatches: 0,
        first_mismatch: None,
    };
    for (index, (&expected, &actual)) in reference
        .samples()
        .iter()
        .zip(candidate.samples())
        .enumerate()
    {
        if expected != actual {
            diff.mismatches += 1;
            diff.first_mismatch.get_or_insert(Mismatch {
                row: index / width,
                col: index % width,
                expected,
                actual,
            });
        }
    }

    if !diff.is_identical() {
        warn!(mismatches = diff.mismatches, "candidate differs from golden output");
    }
    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_grids_have_no_mismatch() {
        let grid = Grid::new_fill(4, 3, 9);
        let diff = compare(&grid, &grid.clone()).unwrap();
        assert!(diff.is_identical());
        assert_eq!(diff.to_string(), "identical");
    }

    #[test]
    fn reports_count_and_first_mismatch_in_row_major_order() {
        let reference = Grid::new_fill(4, 3, 0);
        let mut candidate = reference.clone();
        candidate.set(2, 0, 255);
        candidate.set(1, 3, 7);
        let diff = compare(&reference, &candidate).unwrap();
        assert_eq!(diff.mismatches, 2);
        assert_eq!(
            diff.first_mismatch,
            Some(Mismatch {
                row: 1,
                col: 3,
                expected: 0,
                actual: 7
            })
        );
        assert_eq!(
            diff.to_string(),
            "2 mismatches (first at row 1, col 3: expected 0, found 7)"
        );
    }

    #[test]
    fn size_mismatch_is_a_shape_error() {
        let err = compare(&Grid::new_fill(2, 2, 0), &Grid::new_fill(2, 3, 0)).unwrap_err();
        assert!(matches!(err, GoldenError::Shape { .. }));
    }
}

// THEORY:
// The Sobel detector turns a grayscale grid into a binary edge map.
//
// Key points:
// 1.  **Gradient**: for each interior sample, `gx` and `gy` are the sums of the 3x3
//     window weighted by `KERNEL_X` and `KERNEL_Y`. All arithmetic is exact `i32`.
// 2.  **Magnitude**: `|gx| + |gy|` (L1 norm), not the Euclidean norm.
// 3.  **Threshold**: strictly greater than the threshold is an edge (255), anything
//     else is 0. The output holds no other values.
// 4.  **Border**: border samples are always 0. This differs from the median filter,
//     which copies its border, and both behaviors are part of the golden output.

use std::ops::Range;

use crate::config::{KERNEL_X, KERNEL_Y, SOBEL_THRESHOLD};
use crate::core_modules::grid::grid::{Grid, Sample};
use crate::core_modules::neighborhood::neighborhood::Neighborhood;
use crate::error::GoldenError;

pub const EDGE: Sample = 255;
pub const NO_EDGE: Sample = 0;

/// Directional gradients of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub gx: i32,
    pub gy: i32,
}

impl Gradient {
    pub fn of(window: &Neighborhood) -> Self {
        Self {
            gx: window.convolve(&KERNEL_X),
            gy: window.convolve(&KERNEL_Y),
        }
    }

    /// Manhattan approximation of the gradient magnitude.
    pub fn magnitude(&self) -> i32 {
        self.gx.abs() + self.gy.abs()
    }
}

/// Maps a gradient magnitude to `EDGE` or `NO_EDGE` against `SOBEL_THRESHOLD`.
pub fn classify(magnitude: i32) -> Sample {
    if magnitude > SOBEL_THRESHOLD { EDGE } else { NO_EDGE }
}

/// Edge-detects `input` into a new binary grid of the same size.
pub fn apply(input: &Grid) -> Result<Grid, GoldenError> {
    input.ensure_filterable()?;
    let samples = detect_rows(input, 0..input.height());
    Grid::from_vec(input.width(), input.height(), samples)
}

/// Computes output rows `rows` of the edge map, row-major.
pub fn detect_rows(input: &Grid, rows: Range<usize>) -> Vec<Sample> {
    let mut output = Vec::with_capacity(rows.len() * input.width());
    for row in rows {
        for col in 0..input.width() {
            let value = if input.is_border(row, col) {
                NO_EDGE
            } else {
                let gradient = Gradient::of(&Neighborhood::around(input, row, col));
                classify(gradient.magnitude())
            };
            output.push(value);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_center_window(window: [[u8; 3]; 3]) -> Grid {
        Grid::from_rows(window.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn magnitude_is_manhattan_norm() {
        let gradient = Gradient { gx: -30, gy: 40 };
        assert_eq!(gradient.magnitude(), 70);
    }

    #[test]
    fn classify_is_strictly_greater_than() {
        assert_eq!(classify(150), NO_EDGE);
        assert_eq!(classify(151), EDGE);
        assert_eq!(classify(0), NO_EDGE);
        assert_eq!(classify(-1), NO_EDGE);
    }

    #[test]
    fn magnitude_equal_to_threshold_is_not_an_edge() {
        // Right-middle neighbor of 75: gx = 2 * 75 = 150, gy = 0.
        let grid = grid_with_center_window([[0, 0, 0], [0, 0, 75], [0, 0, 0]]);
        let window = Neighborhood::around(&grid, 1, 1);
        assert_eq!(Gradient::of(&window).magnitude(), 150);
        assert_eq!(apply(&grid).unwrap().get(1, 1), Some(NO_EDGE));
    }

    #[test]
    fn smallest_magnitude_above_threshold_is_an_edge() {
        // Kx + Ky weights are all even, so |gx| + |gy| is always even and 152 is
        // the smallest reachable magnitude above 150.
        let grid = grid_with_center_window([[0, 0, 0], [0, 0, 76], [0, 0, 0]]);
        let window = Neighborhood::around(&grid, 1, 1);
        assert_eq!(Gradient::of(&window).magnitude(), 152);
        assert_eq!(apply(&grid).unwrap().get(1, 1), Some(EDGE));
    }

    #[test]
    fn vertical_step_marks_both_adjacent_columns() {
        let rows: Vec<Vec<u8>> = (0..6)
            .map(|_| (0..8).map(|c| if c < 4 { 0 } else { 255 }).collect())
            .collect();
        let grid = Grid::from_rows(rows).unwrap();
        let edges = apply(&grid).unwrap();
        for row in 1..5 {
            let expected: Vec<u8> = (0..8)
                .map(|c| if c == 3 || c == 4 { EDGE } else { NO_EDGE })
                .collect();
            assert_eq!(edges.row(row), expected.as_slice(), "row {row}");
        }
    }

    #[test]
    fn border_is_zeroed_and_output_is_binary() {
        let samples: Vec<u8> = (0..144u32).map(|i| ((i * 53 + 11) % 256) as u8).collect();
        let grid = Grid::from_vec(12, 12, samples).unwrap();
        let edges = apply(&grid).unwrap();
        for row in 0..12 {
            for col in 0..12 {
                let value = edges.get(row, col).unwrap();
                assert!(value == EDGE || value == NO_EDGE);
                if grid.is_border(row, col) {
                    assert_eq!(value, NO_EDGE);
                }
            }
        }
    }

    #[test]
    fn white_border_is_still_zeroed() {
        let edges = apply(&Grid::new_fill(4, 4, 255)).unwrap();
        assert!(edges.samples().iter().all(|&s| s == NO_EDGE));
    }

    #[test]
    fn empty_grid_is_a_shape_error() {
        assert!(matches!(
            apply(&Grid::new_fill(3, 0, 0)),
            Err(GoldenError::Shape { .. })
        ));
    }
}

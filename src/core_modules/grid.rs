// THEORY:
// The `Grid` is the only data structure that flows between stages. It is a
// "dumb" row-major container of 8-bit samples with fixed dimensions. Every stage
// reads one `Grid` and allocates a new one, so intermediate results stay
// available for debugging and no stage mutates another stage's input.
//
// Invariants:
// 1.  `samples.len() == width * height`, enforced by every constructor.
// 2.  (0, 0) is the top-left sample; indices are `(row, col)`, 0-based.
// 3.  A grid may be empty only when built with `new_fill(0, _)`; the filters reject
//     empty grids with a shape error.

pub mod grid {
    use crate::error::GoldenError;

    /// An unsigned 8-bit intensity value.
    pub type Sample = u8;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Grid {
        width: usize,
        height: usize,
        samples: Vec<Sample>,
    }

    impl Grid {
        /// Wraps a row-major sample buffer.
        pub fn from_vec(width: usize, height: usize, samples: Vec<Sample>) -> Result<Self, GoldenError> {
            let expected = width
                .checked_mul(height)
                .ok_or_else(|| GoldenError::shape(format!("{width}x{height} overflows")))?;
            if samples.len() != expected {
                return Err(GoldenError::shape(format!(
                    "{width}x{height} grid needs {expected} samples, got {}",
                    samples.len()
                )));
            }
            Ok(Self {
                width,
                height,
                samples,
            })
        }

        /// Builds a grid from nested rows. Rows must all have the same length.
        pub fn from_rows(rows: Vec<Vec<Sample>>) -> Result<Self, GoldenError> {
            let height = rows.len();
            let width = rows.first().map_or(0, Vec::len);
            if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
                return Err(GoldenError::shape(format!(
                    "row {index} has {} samples, row 0 has {width}",
                    row.len()
                )));
            }
            let samples = rows.into_iter().flatten().collect();
            Self::from_vec(width, height, samples)
        }

        pub fn new_fill(width: usize, height: usize, value: Sample) -> Self {
            Self {
                width,
                height,
                samples: vec![value; width * height],
            }
        }

        pub fn width(&self) -> usize {
            self.width
        }

        pub fn height(&self) -> usize {
            self.height
        }

        pub fn samples(&self) -> &[Sample] {
            &self.samples
        }

        pub fn get(&self, row: usize, col: usize) -> Option<Sample> {
            if row >= self.height || col >= self.width {
                return None;
            }
            self.samples.get(row * self.width + col).copied()
        }

        pub fn set(&mut self, row: usize, col: usize, value: Sample) {
            assert!(row < self.height && col < self.width, "sample index out of bounds");
            self.samples[row * self.width + col] = value;
        }

        pub fn row(&self, row: usize) -> &[Sample] {
            assert!(row < self.height, "row index out of bounds");
            let start = row * self.width;
            &self.samples[start..start + self.width]
        }

        /// True for samples on the outermost row or column.
        pub fn is_border(&self, row: usize, col: usize) -> bool {
            row == 0 || col == 0 || row + 1 >= self.height || col + 1 >= self.width
        }

        /// Rejects grids the 3x3 filters cannot be applied to.
        pub fn ensure_filterable(&self) -> Result<(), GoldenError> {
            if self.width == 0 || self.height == 0 {
                return Err(GoldenError::shape(format!(
                    "cannot filter an empty {}x{} grid",
                    self.width, self.height
                )));
            }
            Ok(())
        }
    }
}

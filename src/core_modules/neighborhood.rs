// THEORY:
// A `Neighborhood` is the read-only 3x3 window both filters work on: the sample
// at an interior position plus its 8 neighbors. Extracting it is the only place
// that does neighbor index arithmetic, so the median filter and the Sobel
// detector share exactly the same window for the same position.

pub mod neighborhood {
    use crate::config::Kernel;
    use crate::core_modules::grid::grid::{Grid, Sample};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Neighborhood {
        /// Window samples indexed `[dy + 1][dx + 1]`.
        pub values: [[Sample; 3]; 3],
    }

    impl Neighborhood {
        /// Extracts the window centered on an interior sample.
        ///
        /// Panics if `(row, col)` lies on the border of `grid`.
        pub fn around(grid: &Grid, row: usize, col: usize) -> Self {
            assert!(!grid.is_border(row, col), "neighborhood center must be interior");
            let mut values = [[0; 3]; 3];
            for (dy, window_row) in values.iter_mut().enumerate() {
                let source = grid.row(row + dy - 1);
                window_row.copy_from_slice(&source[col - 1..=col + 1]);
            }
            Self { values }
        }

        pub fn from_rows(values: [[Sample; 3]; 3]) -> Self {
            Self { values }
        }

        /// The 5th smallest of the 9 samples, counting duplicates.
        pub fn median(&self) -> Sample {
            let mut flat = self.flatten();
            flat.sort_unstable();
            flat[4]
        }

        /// Element-wise product with `kernel`, summed in exact integer arithmetic.
        pub fn convolve(&self, kernel: &Kernel) -> i32 {
            let mut sum = 0i32;
            for (window_row, kernel_row) in self.values.iter().zip(kernel) {
                for (&sample, &weight) in window_row.iter().zip(kernel_row) {
                    sum += sample as i32 * weight;
                }
            }
            sum
        }

        fn flatten(&self) -> [Sample; 9] {
            let mut flat = [0; 9];
            for (i, value) in self.values.iter().flatten().enumerate() {
                flat[i] = *value;
            }
            flat
        }
    }
}

// THEORY:
// `image_helper` is the boundary to the `image` crate. The golden pipeline only
// ever produces 8-bit grayscale grids, so rendering is a straight L8 PNG write.
// Loading goes the other way: any raster the `image` crate understands is reduced
// to luminance with gamma-weighted Rec. 709 coefficients and packed into a `Grid`.

pub mod image_helper {
    use image::ImageEncoder;
    use std::fs::File;
    use std::io::{BufWriter, Write};
    use std::path::Path;

    use crate::core_modules::grid::grid::{Grid, Sample};
    use crate::error::{GoldenError, Stage};

    const RED_WEIGHT: f64 = 0.2126;
    const GREEN_WEIGHT: f64 = 0.7152;
    const BLUE_WEIGHT: f64 = 0.0722;
    const CHANNEL_GAMMA: f64 = 1.04;

    /// Writes `grid` as a single-channel grayscale PNG, replacing any existing file.
    pub fn save_grid_png(grid: &Grid, path: impl AsRef<Path>) -> Result<(), GoldenError> {
        let path = path.as_ref();
        let width = raster_dimension(grid.width())?;
        let height = raster_dimension(grid.height())?;

        let output = File::create(path).map_err(|e| GoldenError::io(Stage::Raster, path, e))?;
        let mut writer = BufWriter::new(output);
        let encoder = image::codecs::png::PngEncoder::new(&mut writer);
        encoder
            .write_image(grid.samples(), width, height, image::ExtendedColorType::L8)
            .map_err(|source| GoldenError::Raster {
                path: path.to_path_buf(),
                source,
            })?;
        writer
            .flush()
            .map_err(|e| GoldenError::io(Stage::Raster, path, e))?;

        Ok(())
    }

    /// Loads a raster image and converts it to a luminance grid of exactly `width` x `height`.
    pub fn grid_from_image(
        path: impl AsRef<Path>,
        width: usize,
        height: usize,
    ) -> Result<Grid, GoldenError> {
        let path = path.as_ref();
        let rgb = image::open(path)
            .map_err(|source| GoldenError::Raster {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();

        if rgb.width() as usize != width || rgb.height() as usize != height {
            return Err(GoldenError::shape(format!(
                "{} is {}x{}, expected {width}x{height}",
                path.display(),
                rgb.width(),
                rgb.height()
            )));
        }

        let samples = rgb
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect();
        Grid::from_vec(width, height, samples)
    }

    /// Gamma-weighted luminance of one RGB pixel.
    pub fn luminance(red: u8, green: u8, blue: u8) -> Sample {
        let channel = |value: u8| (value as f64 / 255.0).powf(CHANNEL_GAMMA);
        let y = RED_WEIGHT * channel(red) + GREEN_WEIGHT * channel(green) + BLUE_WEIGHT * channel(blue);
        (y * 255.0).round().clamp(0.0, 255.0) as Sample
    }

    fn raster_dimension(value: usize) -> Result<u32, GoldenError> {
        u32::try_from(value)
            .map_err(|_| GoldenError::shape(format!("dimension {value} does not fit a raster image")))
    }
}

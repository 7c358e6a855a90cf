pub mod comparison;
pub mod grid;
pub mod hex_codec;
pub mod median_filter;
pub mod neighborhood;
pub mod sobel_detector;
pub mod utils;

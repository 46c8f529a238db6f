//! Raster primitives: pixels and the RGBA buffer they live in.

pub mod buffer;
pub mod pixel;

pub use buffer::{PixelBuffer, RasterError};
pub use pixel::Pixel;

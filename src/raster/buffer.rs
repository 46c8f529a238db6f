//! RGBA pixel buffer, the unit of mutation and snapshotting.
//!
//! The buffer stores row-major RGBA bytes, the same flat layout as a
//! browser canvas `ImageData` and the `(height, width, 4)` ndarray
//! layout used at the binding boundaries.

use ndarray::{Array3, ArrayView3};
use thiserror::Error;

use super::pixel::Pixel;

/// Errors raised by raster-level buffer access and construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Coordinate access outside `[0, width) x [0, height)`.
    #[error("coordinate ({x}, {y}) out of range for {width}x{height} buffer")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Raw byte length does not match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
    /// Array input with a channel count other than RGBA.
    #[error("expected 4 channels (RGBA), got {channels}")]
    ChannelCount { channels: usize },
}

/// Row-major RGBA pixel buffer.
///
/// Invariant: `data.len() == width * height * 4` at all times. `Clone`
/// produces a fully independent copy; snapshots never alias the buffer
/// they were taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    /// Build a buffer from raw RGBA bytes in row-major order.
    ///
    /// # Errors
    /// [`RasterError::BufferSize`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from an `(height, width, channels)` array view.
    ///
    /// # Errors
    /// [`RasterError::ChannelCount`] unless the view has exactly 4 channels.
    pub fn from_array(image: ArrayView3<u8>) -> Result<Self, RasterError> {
        let (height, width, channels) = image.dim();
        if channels != 4 {
            return Err(RasterError::ChannelCount { channels });
        }
        // Iteration follows logical (y, x, channel) order, which is
        // exactly the buffer's row-major RGBA layout.
        let data: Vec<u8> = image.iter().copied().collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy the buffer out as an `(height, width, 4)` array.
    pub fn to_array(&self) -> Array3<u8> {
        Array3::from_shape_vec((self.height, self.width, 4), self.data.clone())
            .expect("buffer invariant: data.len() == width * height * 4")
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether a coordinate lies within the buffer.
    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Errors
    /// [`RasterError::OutOfRange`] when the coordinate is outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Result<Pixel, RasterError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        Ok(self.pixel_at(x, y))
    }

    /// Write the pixel at `(x, y)`.
    ///
    /// # Errors
    /// [`RasterError::OutOfRange`] when the coordinate is outside the buffer.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) -> Result<(), RasterError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_range(x, y));
        }
        let idx = self.byte_index(x, y);
        self.data[idx] = pixel.r;
        self.data[idx + 1] = pixel.g;
        self.data[idx + 2] = pixel.b;
        self.data[idx + 3] = pixel.a;
        Ok(())
    }

    /// The flat RGBA bytes, for downstream encoders.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, handing out its flat RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Unchecked pixel read used by the fill loop, which performs its
    /// own bounds filtering.
    #[inline]
    pub(crate) fn pixel_at(&self, x: usize, y: usize) -> Pixel {
        debug_assert!(self.in_bounds(x, y));
        let idx = self.byte_index(x, y);
        Pixel::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Unchecked alpha clear, the only per-pixel mutation the fill
    /// engine performs.
    #[inline]
    pub(crate) fn clear_alpha(&mut self, x: usize, y: usize) {
        debug_assert!(self.in_bounds(x, y));
        let idx = self.byte_index(x, y);
        self.data[idx + 3] = 0;
    }

    #[inline]
    fn byte_index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 4
    }

    fn out_of_range(&self, x: usize, y: usize) -> RasterError {
        RasterError::OutOfRange {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_transparent() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.as_raw().len(), 3 * 2 * 4);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(buffer.get(x, y).unwrap(), Pixel::TRANSPARENT);
            }
        }
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut buffer = PixelBuffer::new(4, 4);
        let pixel = Pixel::new(1, 2, 3, 4);
        buffer.set(2, 3, pixel).unwrap();
        assert_eq!(buffer.get(2, 3).unwrap(), pixel);
        // Neighbors untouched
        assert_eq!(buffer.get(1, 3).unwrap(), Pixel::TRANSPARENT);
        assert_eq!(buffer.get(3, 3).unwrap(), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut buffer = PixelBuffer::new(2, 2);
        assert_eq!(
            buffer.get(2, 0),
            Err(RasterError::OutOfRange {
                x: 2,
                y: 0,
                width: 2,
                height: 2
            })
        );
        assert!(buffer.get(0, 2).is_err());
        assert!(buffer.set(5, 5, Pixel::TRANSPARENT).is_err());
    }

    #[test]
    fn test_from_raw_length_check() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            PixelBuffer::from_raw(2, 2, vec![0; 15]),
            Err(RasterError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_raw_layout_is_row_major_rgba() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.set(1, 0, Pixel::new(10, 20, 30, 40)).unwrap();
        let raw = buffer.as_raw();
        assert_eq!(&raw[4..8], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_array_roundtrip() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.set(0, 1, Pixel::opaque(200, 100, 50)).unwrap();

        let array = buffer.to_array();
        assert_eq!(array.dim(), (2, 3, 4));
        assert_eq!(array[[1, 0, 0]], 200);
        assert_eq!(array[[1, 0, 3]], 255);

        let back = PixelBuffer::from_array(array.view()).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn test_from_array_rejects_rgb() {
        let rgb = Array3::<u8>::zeros((2, 2, 3));
        assert_eq!(
            PixelBuffer::from_array(rgb.view()),
            Err(RasterError::ChannelCount { channels: 3 })
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buffer = PixelBuffer::new(2, 2);
        let snapshot = buffer.clone();
        buffer.set(0, 0, Pixel::opaque(255, 0, 0)).unwrap();
        assert_eq!(snapshot.get(0, 0).unwrap(), Pixel::TRANSPARENT);
    }
}

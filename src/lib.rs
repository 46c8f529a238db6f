//! Background Eraser Rust Core
//!
//! Click-to-erase engine for raster images: tolerance-based color
//! matching, connected-region flood fill over an RGBA pixel buffer, and
//! a bounded snapshot history backing undo and full reset. Python
//! bindings via PyO3 and WASM bindings for JavaScript front ends.
//!
//! ## Image Format
//!
//! The engine works on 8-bit RGBA pixels, row-major, the layout of a
//! browser canvas `ImageData`. At the binding boundaries images travel
//! as flat byte arrays or as `(height, width, 4)` ndarrays.
//!
//! Alpha is binary in this pipeline: a pixel is either fully opaque or
//! fully erased. Decoding, file validation, zoom, and PNG encoding are
//! the driver's job; the core receives a decoded buffer and hands back
//! the mutated result.
//!
//! ## Architecture
//!
//! ```text
//! decoder -> EditorSession::load_image
//!            EditorSession::select_at -> HistoryStack::push -> flood fill
//!            EditorSession::undo / reset_to_original
//!            EditorSession::export_buffer -> encoder
//! ```

pub mod raster;
pub mod selection;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::raster::PixelBuffer;
    use crate::selection::{clamp_tolerance, erase_region, DEFAULT_TOLERANCE};
    use crate::session::{EditorSession, DEFAULT_HISTORY_CAPACITY};

    // ========================================================================
    // Stateless flood erase
    // ========================================================================

    /// Erase the connected region of similar color around a seed pixel.
    ///
    /// Returns a new array; the input is not modified. An out-of-bounds
    /// seed returns the image unchanged. Tolerance is clamped to the
    /// recognized 0-100 range.
    ///
    /// # Arguments
    /// * `image` - RGBA image of shape (height, width, 4), u8
    /// * `x`, `y` - Seed coordinate
    /// * `tolerance` - Color tolerance (0-100)
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance=DEFAULT_TOLERANCE))]
    pub fn flood_erase<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: usize,
        y: usize,
        tolerance: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        let mut buffer = PixelBuffer::from_array(input)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        if buffer.in_bounds(x, y) {
            erase_region(&mut buffer, (x, y), clamp_tolerance(tolerance));
        }
        Ok(buffer.to_array().into_pyarray(py))
    }

    // ========================================================================
    // Editing session
    // ========================================================================

    /// Stateful editing session for Python drivers (CLI, test harness).
    ///
    /// Holds the live image, the original snapshot captured at load
    /// time, and the bounded undo history.
    #[pyclass(name = "EditorSession")]
    pub struct PyEditorSession {
        inner: EditorSession,
    }

    #[pymethods]
    impl PyEditorSession {
        #[new]
        #[pyo3(signature = (history_capacity=DEFAULT_HISTORY_CAPACITY))]
        fn new(history_capacity: usize) -> Self {
            Self {
                inner: EditorSession::with_history_capacity(history_capacity),
            }
        }

        /// Load a decoded RGBA image of shape (height, width, 4).
        fn load_image(&mut self, image: PyReadonlyArray3<'_, u8>) -> PyResult<()> {
            let buffer = PixelBuffer::from_array(image.as_array())
                .map_err(|e| PyValueError::new_err(e.to_string()))?;
            self.inner.load_image(buffer);
            Ok(())
        }

        /// Erase the region around a click; returns the number of
        /// pixels cleared. Out-of-bounds clicks return 0.
        #[pyo3(signature = (x, y, tolerance=DEFAULT_TOLERANCE))]
        fn select_at(&mut self, x: usize, y: usize, tolerance: i32) -> usize {
            self.inner
                .select_at(x, y, clamp_tolerance(tolerance))
                .pixel_count
        }

        /// Restore the state before the most recent click; returns
        /// whether anything was restored.
        fn undo(&mut self) -> bool {
            self.inner.undo()
        }

        /// Restore the image as it was at load time and clear history.
        fn reset_to_original(&mut self) {
            self.inner.reset_to_original();
        }

        /// Current image as an (height, width, 4) array.
        fn export_buffer<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<u8>>> {
            let buffer = self
                .inner
                .export_buffer()
                .ok_or_else(|| PyValueError::new_err("no image loaded"))?;
            Ok(buffer.to_array().into_pyarray(py))
        }

        fn can_undo(&self) -> bool {
            self.inner.can_undo()
        }

        fn history_len(&self) -> usize {
            self.inner.history_len()
        }

        fn has_image(&self) -> bool {
            self.inner.has_image()
        }

        /// (width, height) of the loaded image, or None.
        fn dimensions(&self) -> Option<(usize, usize)> {
            self.inner.dimensions()
        }

        /// Discard the image and history, returning to the empty state.
        fn clear(&mut self) {
            self.inner.clear();
        }
    }

    /// Background eraser extension module
    #[pymodule]
    pub fn bgeraser_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(flood_erase, m)?)?;
        m.add_class::<PyEditorSession>()?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::bgeraser_rust;

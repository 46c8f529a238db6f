//! WebAssembly exports for the background eraser core.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. The
//! browser front end hands over the canvas `ImageData` bytes, drives
//! the session from click and button events, and draws whatever bytes
//! come back.

use wasm_bindgen::prelude::*;

use crate::raster::PixelBuffer;
use crate::selection::{clamp_tolerance, erase_region};
use crate::session::EditorSession;

// ============================================================================
// Stateless flood erase
// ============================================================================

/// Erase the connected region of similar color around a seed pixel.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `x`, `y` - Seed coordinate
/// * `tolerance` - Color tolerance (0-100, clamped)
///
/// # Returns
/// Flat array of RGBA bytes with the region's alpha cleared
#[wasm_bindgen]
pub fn flood_erase_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    tolerance: i32,
) -> Result<Vec<u8>, JsError> {
    let mut buffer = PixelBuffer::from_raw(width, height, data.to_vec())
        .map_err(|e| JsError::new(&e.to_string()))?;
    if buffer.in_bounds(x, y) {
        erase_region(&mut buffer, (x, y), clamp_tolerance(tolerance));
    }
    Ok(buffer.into_raw())
}

// ============================================================================
// Editing session
// ============================================================================

/// Stateful editing session driven by the browser UI.
///
/// One instance per loaded image; loading again restarts the session.
#[wasm_bindgen]
pub struct WasmEditorSession {
    inner: EditorSession,
}

#[wasm_bindgen]
impl WasmEditorSession {
    /// Create an empty session keeping at most `history_capacity` undo
    /// steps.
    #[wasm_bindgen(constructor)]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            inner: EditorSession::with_history_capacity(history_capacity),
        }
    }

    /// Load decoded `ImageData` bytes, replacing any previous image.
    pub fn load_image(
        &mut self,
        data: &[u8],
        width: usize,
        height: usize,
    ) -> Result<(), JsError> {
        let buffer = PixelBuffer::from_raw(width, height, data.to_vec())
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.inner.load_image(buffer);
        Ok(())
    }

    /// Erase the region around a click; returns the number of pixels
    /// cleared. Out-of-bounds clicks return 0 and record nothing.
    pub fn select_at(&mut self, x: usize, y: usize, tolerance: i32) -> usize {
        self.inner
            .select_at(x, y, clamp_tolerance(tolerance))
            .pixel_count
    }

    /// Restore the state before the most recent click; returns whether
    /// anything was restored.
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// Restore the image as it was at load time and clear history.
    pub fn reset_to_original(&mut self) {
        self.inner.reset_to_original();
    }

    /// Current image as flat RGBA bytes, or `None` before any load.
    pub fn export_buffer(&self) -> Option<Vec<u8>> {
        self.inner.export_buffer().map(PixelBuffer::into_raw)
    }

    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    pub fn history_len(&self) -> usize {
        self.inner.history_len()
    }

    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    /// Width of the loaded image, 0 before any load.
    pub fn width(&self) -> usize {
        self.inner.dimensions().map_or(0, |(w, _)| w)
    }

    /// Height of the loaded image, 0 before any load.
    pub fn height(&self) -> usize {
        self.inner.dimensions().map_or(0, |(_, h)| h)
    }

    /// Discard the image and history, returning to the empty state.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

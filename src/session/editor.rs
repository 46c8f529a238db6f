//! Editing session: the live buffer, its original snapshot, and undo.

use log::debug;

use crate::raster::PixelBuffer;
use crate::selection::flood_fill::{erase_region, FillReport};

use super::history::HistoryStack;

/// Image state of an active session.
#[derive(Debug, Clone)]
struct SessionImage {
    /// The only mutable buffer; every edit happens here.
    live: PixelBuffer,
    /// Untouched copy captured at load time, for full reset.
    original: PixelBuffer,
}

/// One image's editing context.
///
/// A session starts empty and becomes editable once [`load_image`] is
/// called; loading again restarts the session, discarding the previous
/// buffer and history. Every mutation of the live buffer goes through
/// the operations here - callers only ever see independent copies.
///
/// [`load_image`]: EditorSession::load_image
#[derive(Debug, Clone)]
pub struct EditorSession {
    image: Option<SessionImage>,
    history: HistoryStack,
}

impl EditorSession {
    /// Create an empty session with the default history capacity.
    pub fn new() -> Self {
        Self {
            image: None,
            history: HistoryStack::new(),
        }
    }

    /// Create an empty session keeping at most `capacity` undo steps.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            image: None,
            history: HistoryStack::with_capacity(capacity),
        }
    }

    /// Load a decoded image, replacing whatever was being edited.
    ///
    /// The buffer becomes the live editing target and an independent
    /// copy is kept as the reset target. History is cleared; undo never
    /// crosses an image load.
    pub fn load_image(&mut self, buffer: PixelBuffer) {
        debug!("load_image: {}x{}", buffer.width(), buffer.height());
        self.history.clear();
        self.image = Some(SessionImage {
            original: buffer.clone(),
            live: buffer,
        });
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Dimensions of the loaded image, if any.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.image
            .as_ref()
            .map(|image| (image.live.width(), image.live.height()))
    }

    /// Erase the connected region of similar color around a click.
    ///
    /// Out-of-bounds coordinates are absorbed as a no-op reporting zero
    /// cleared pixels - interactive clicks can land outside the canvas.
    /// For an in-bounds click a snapshot of the live buffer is pushed
    /// first, before it is known whether the fill changes anything, so
    /// the undo sequence records every click.
    pub fn select_at(&mut self, x: usize, y: usize, tolerance: i32) -> FillReport {
        let Some(image) = self.image.as_mut() else {
            return FillReport::default();
        };
        if !image.live.in_bounds(x, y) {
            return FillReport::default();
        }

        self.history.push(image.live.clone());
        let report = erase_region(&mut image.live, (x, y), tolerance);
        debug!(
            "select_at ({}, {}) tolerance {}: cleared {} pixels",
            x, y, tolerance, report.pixel_count
        );
        report
    }

    /// Restore the buffer state before the most recent click.
    ///
    /// Returns `true` if a state was restored; an empty history is a
    /// no-op returning `false`.
    pub fn undo(&mut self) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        match self.history.pop() {
            Some(snapshot) => {
                image.live = snapshot;
                debug!("undo: {} snapshots left", self.history.len());
                true
            }
            None => false,
        }
    }

    /// Restore the exact buffer passed to the most recent load and
    /// clear the history.
    pub fn reset_to_original(&mut self) {
        if let Some(image) = self.image.as_mut() {
            image.live = image.original.clone();
            self.history.clear();
            debug!("reset_to_original");
        }
    }

    /// Independent copy of the live buffer, for downstream encoding.
    pub fn export_buffer(&self) -> Option<PixelBuffer> {
        self.image.as_ref().map(|image| image.live.clone())
    }

    /// Drop the loaded image and all history, returning to the empty
    /// state.
    pub fn clear(&mut self) {
        debug!("clear session");
        self.image = None;
        self.history.clear();
    }

    /// Whether undo currently has a state to restore.
    pub fn can_undo(&self) -> bool {
        self.has_image() && !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history.capacity()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Pixel;

    /// 3x3 opaque buffer: RGB(10, 10, 10) everywhere except a
    /// (200, 200, 200) center.
    fn ring_image() -> PixelBuffer {
        let mut buffer = PixelBuffer::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                buffer.set(x, y, Pixel::opaque(10, 10, 10)).unwrap();
            }
        }
        buffer.set(1, 1, Pixel::opaque(200, 200, 200)).unwrap();
        buffer
    }

    /// Uniform opaque buffer whose red channel encodes `tag`.
    fn uniform(width: usize, height: usize, tag: u8) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.set(x, y, Pixel::opaque(tag, 0, 0)).unwrap();
            }
        }
        buffer
    }

    #[test]
    fn test_starts_without_image() {
        let session = EditorSession::new();
        assert!(!session.has_image());
        assert_eq!(session.dimensions(), None);
        assert!(session.export_buffer().is_none());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_operations_are_noops_without_image() {
        let mut session = EditorSession::new();
        assert_eq!(session.select_at(0, 0, 32), FillReport::default());
        assert!(!session.undo());
        session.reset_to_original();
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_load_image_enters_editing() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());
        assert!(session.has_image());
        assert_eq!(session.dimensions(), Some((3, 3)));
        assert_eq!(session.export_buffer().unwrap(), ring_image());
    }

    #[test]
    fn test_select_and_undo_restores_bit_for_bit() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());

        let report = session.select_at(0, 0, 5);
        assert_eq!(report.pixel_count, 8);
        assert_ne!(session.export_buffer().unwrap(), ring_image());

        assert!(session.undo());
        assert_eq!(session.export_buffer().unwrap(), ring_image());

        // Second undo has nothing to restore.
        assert!(!session.undo());
        assert_eq!(session.export_buffer().unwrap(), ring_image());
    }

    #[test]
    fn test_sequential_fills_unwind_in_order() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());
        let initial = session.export_buffer().unwrap();

        session.select_at(1, 1, 0);
        let after_center = session.export_buffer().unwrap();
        session.select_at(0, 0, 0);

        assert!(session.undo());
        assert_eq!(session.export_buffer().unwrap(), after_center);
        assert!(session.undo());
        assert_eq!(session.export_buffer().unwrap(), initial);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_eviction_loses_oldest_states() {
        let mut session = EditorSession::with_history_capacity(2);
        session.load_image(uniform(2, 2, 100));

        // Each click pushes one snapshot. The first erases the whole
        // uniform image; the next two are no-op fills on transparent
        // seeds but still record the pre-click state.
        session.select_at(0, 0, 0); // snapshot 1: untouched
        session.select_at(0, 0, 0); // snapshot 2: all transparent
        session.select_at(1, 1, 0); // snapshot 3: evicts snapshot 1

        assert_eq!(session.history_len(), 2);
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());

        // The untouched state fell off the bottom; the oldest state
        // undo can reach is already fully erased.
        let restored = session.export_buffer().unwrap();
        assert_eq!(restored.get(0, 0).unwrap().a, 0);
    }

    #[test]
    fn test_reset_restores_load_state_and_clears_history() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());

        session.select_at(0, 0, 5);
        session.select_at(1, 1, 0);
        session.undo();

        session.reset_to_original();
        assert_eq!(session.export_buffer().unwrap(), ring_image());
        assert!(!session.can_undo());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_out_of_bounds_click_is_silent() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());

        let report = session.select_at(3, 0, 32);
        assert_eq!(report, FillReport::default());
        // No snapshot was recorded for the miss.
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.export_buffer().unwrap(), ring_image());
    }

    #[test]
    fn test_transparent_click_still_pushes_history() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());

        session.select_at(0, 0, 5);
        assert_eq!(session.history_len(), 1);

        // The border is now transparent; the fill is a no-op but the
        // click is still recorded.
        let report = session.select_at(0, 0, 5);
        assert_eq!(report.pixel_count, 0);
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_reload_discards_history() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());
        session.select_at(0, 0, 5);
        assert!(session.can_undo());

        session.load_image(uniform(2, 2, 50));
        assert!(!session.can_undo());
        assert_eq!(session.dimensions(), Some((2, 2)));

        // Reset now targets the second image.
        session.select_at(0, 0, 0);
        session.reset_to_original();
        assert_eq!(session.export_buffer().unwrap(), uniform(2, 2, 50));
    }

    #[test]
    fn test_clear_returns_to_empty_state() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());
        session.select_at(0, 0, 5);

        session.clear();
        assert!(!session.has_image());
        assert!(session.export_buffer().is_none());
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn test_exported_buffer_does_not_alias_live_state() {
        let mut session = EditorSession::new();
        session.load_image(ring_image());

        let mut exported = session.export_buffer().unwrap();
        exported.set(0, 0, Pixel::opaque(1, 2, 3)).unwrap();

        assert_eq!(session.export_buffer().unwrap(), ring_image());
    }
}

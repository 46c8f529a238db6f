//! Flood-fill erase engine.
//!
//! Grows a 4-connected region of similar color from a seed pixel and
//! clears its alpha, erasing the region in place.

use crate::raster::PixelBuffer;

use super::matcher;

/// Result of a single flood-fill erase run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillReport {
    /// Number of pixels cleared by this run.
    pub pixel_count: usize,
    /// Bounding box of the cleared region as (x, y, width, height).
    pub bounds: Option<(usize, usize, usize, usize)>,
}

/// Erase the connected region of similar color around `seed`.
///
/// The region is the maximal 4-connected set of pixels reachable from
/// the seed whose color stays within `tolerance` of the seed's color at
/// the start of the run. Every pixel in the region has its alpha set to
/// 0; no other channel is touched. A seed that is already transparent
/// makes the whole run a no-op.
///
/// The caller is responsible for supplying an in-bounds seed.
///
/// # Arguments
/// * `buffer` - Buffer to mutate in place
/// * `seed` - (x, y) starting coordinate, in bounds
/// * `tolerance` - Color tolerance, compared via [`matcher::matches`]
///
/// # Returns
/// A [`FillReport`] with the cleared pixel count and bounding box.
pub fn erase_region(
    buffer: &mut PixelBuffer,
    seed: (usize, usize),
    tolerance: i32,
) -> FillReport {
    let width = buffer.width();
    let height = buffer.height();
    let (seed_x, seed_y) = seed;
    debug_assert!(seed_x < width && seed_y < height);

    // The target color is captured once; mutating pixels to transparent
    // mid-run cannot change the membership test for the rest.
    let target = buffer.pixel_at(seed_x, seed_y);
    if target.is_transparent() {
        return FillReport::default();
    }

    // Explicit work stack: a region can span the whole image, and
    // recursion depth would track region size.
    let mut stack: Vec<(i32, i32)> = vec![(seed_x as i32, seed_y as i32)];
    let mut visited = vec![false; width * height];

    let mut pixel_count = 0usize;
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;

    while let Some((x, y)) = stack.pop() {
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            continue;
        }
        let (ux, uy) = (x as usize, y as usize);
        let idx = uy * width + ux;

        if visited[idx] {
            continue;
        }
        if !matcher::matches(buffer.pixel_at(ux, uy), target, tolerance) {
            continue;
        }

        visited[idx] = true;
        buffer.clear_alpha(ux, uy);

        pixel_count += 1;
        min_x = min_x.min(ux);
        min_y = min_y.min(uy);
        max_x = max_x.max(ux);
        max_y = max_y.max(uy);

        // Neighbors are filtered when popped, not when pushed.
        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }

    let bounds = if pixel_count > 0 {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    };

    FillReport {
        pixel_count,
        bounds,
    }
}

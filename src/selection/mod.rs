//! Selection and erase algorithms.
//!
//! - **Tolerance matcher**: decides whether a pixel's color is close
//!   enough to the seed's color.
//! - **Flood fill**: grows the 4-connected region around a click and
//!   clears its alpha.

pub mod flood_fill;
pub mod matcher;

pub use flood_fill::{erase_region, FillReport};
pub use matcher::{clamp_tolerance, DEFAULT_TOLERANCE, MAX_TOLERANCE};

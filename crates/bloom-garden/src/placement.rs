#![forbid(unsafe_code)]

//! Randomized garden placement.

use std::ops::Range;

use rand::Rng;

/// Horizontal band, percent of viewport width.
pub const X_RANGE: Range<f64> = 6.0..94.0;
/// Vertical band measured from the bottom, percent of viewport height.
pub const Y_RANGE: Range<f64> = 4.0..56.0;
/// Scale draw, feeds the rendered flower size.
pub const SCALE_RANGE: Range<f64> = 0.0..1.0;

/// Where and how large a flower is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Placement {
    /// Draw a uniform placement inside the garden band.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            x: rng.random_range(X_RANGE),
            y: rng.random_range(Y_RANGE),
            scale: rng.random_range(SCALE_RANGE),
        }
    }

    /// Whether the placement lies inside the garden band.
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        (X_RANGE.start..=X_RANGE.end).contains(&self.x)
            && (Y_RANGE.start..=Y_RANGE.end).contains(&self.y)
            && SCALE_RANGE.contains(&self.scale)
    }
}

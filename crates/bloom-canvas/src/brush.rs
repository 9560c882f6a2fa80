#![forbid(unsafe_code)]

//! Brush state: palette color and stroke width.

use thiserror::Error;

use crate::color::{DEFAULT_COLOR, PALETTE, Rgba};

/// Thinnest allowed stroke, in logical units.
pub const MIN_WIDTH: u8 = 1;
/// Thickest allowed stroke, in logical units.
pub const MAX_WIDTH: u8 = 14;
/// Width selected when a surface is created.
pub const DEFAULT_WIDTH: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BrushError {
    #[error("color {0} is not in the brush palette")]
    ColorNotInPalette(Rgba),

    #[error("brush width {0} is outside {min}..={max}", min = MIN_WIDTH, max = MAX_WIDTH)]
    WidthOutOfRange(u8),
}

/// Current brush configuration.
///
/// Changes only affect strokes painted afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    color: Rgba,
    width: u8,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR,
            width: DEFAULT_WIDTH,
        }
    }
}

impl Brush {
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Stroke width as a float for rasterization.
    #[must_use]
    pub fn width_f32(&self) -> f32 {
        f32::from(self.width)
    }

    /// Select a palette color. Leaves the brush unchanged on error.
    pub fn set_color(&mut self, color: Rgba) -> Result<(), BrushError> {
        if !PALETTE.contains(&color) {
            return Err(BrushError::ColorNotInPalette(color));
        }
        self.color = color;
        Ok(())
    }

    /// Select a width in `MIN_WIDTH..=MAX_WIDTH`. Leaves the brush unchanged on error.
    pub fn set_width(&mut self, width: u8) -> Result<(), BrushError> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(BrushError::WidthOutOfRange(width));
        }
        self.width = width;
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! The drawing surface: stroke capture over a fixed logical resolution.
//!
//! # Example
//! ```
//! use bloom_canvas::{DrawingSurface, PointerInput, SurfaceBounds};
//!
//! let mut surface = DrawingSurface::new();
//! let bounds = SurfaceBounds::new(0.0, 0.0, 400.0, 400.0);
//! surface.begin_stroke(&PointerInput::mouse(100.0, 100.0), &bounds);
//! surface.continue_stroke(&PointerInput::mouse(300.0, 120.0), &bounds);
//! surface.end_stroke();
//!
//! assert!(surface.has_content());
//! let image = surface.commit().unwrap();
//! assert!(image.to_data_url().starts_with("data:image/png;base64,"));
//! ```

use thiserror::Error;

use crate::brush::{Brush, BrushError};
use crate::color::Rgba;
use crate::encode::{EncodedImage, ImageError};
use crate::pointer::{LogicalPoint, PointerInput, SurfaceBounds};
use crate::raster::Raster;

/// Logical edge length of a surface created with [`DrawingSurface::new`].
pub const DEFAULT_LOGICAL_SIZE: u32 = 200;

#[derive(Debug, Error)]
pub enum SurfaceError {
    /// `commit` was called before anything was drawn. Hosts must keep the
    /// commit action disabled while [`DrawingSurface::has_content`] is false.
    #[error("nothing has been drawn on the surface")]
    NothingDrawn,

    #[error(transparent)]
    Brush(#[from] BrushError),

    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Freehand drawing surface with one brush and one raster.
///
/// Every pointer call paints immediately; there is no deferred redraw.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    raster: Raster,
    brush: Brush,
    drawing: bool,
    anchor: Option<LogicalPoint>,
    has_content: bool,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    /// A blank 200x200 surface with the default brush.
    #[must_use]
    pub fn new() -> Self {
        Self::with_logical_size(DEFAULT_LOGICAL_SIZE)
    }

    /// A blank square surface of `size` logical units.
    #[must_use]
    pub fn with_logical_size(size: u32) -> Self {
        Self {
            raster: Raster::new(size, size),
            brush: Brush::default(),
            drawing: false,
            anchor: None,
            has_content: false,
        }
    }

    #[must_use]
    pub const fn logical_size(&self) -> u32 {
        self.raster.width()
    }

    #[must_use]
    pub const fn brush(&self) -> &Brush {
        &self.brush
    }

    #[must_use]
    pub const fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Whether a stroke has been started since creation or the last clear.
    #[must_use]
    pub const fn has_content(&self) -> bool {
        self.has_content
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<LogicalPoint> {
        self.anchor
    }

    /// Map a device position into this surface's logical space.
    #[must_use]
    pub fn to_logical(&self, input: &PointerInput, bounds: &SurfaceBounds) -> Option<LogicalPoint> {
        let size = self.logical_size();
        bounds.to_logical(input, size, size)
    }

    /// Start a stroke and paint a dot of the brush width at the contact point.
    ///
    /// Returns `false` (and changes nothing) when the input carries no
    /// usable position.
    pub fn begin_stroke(&mut self, input: &PointerInput, bounds: &SurfaceBounds) -> bool {
        let Some(point) = self.to_logical(input, bounds) else {
            return false;
        };
        self.drawing = true;
        self.has_content = true;
        self.anchor = Some(point);
        self.raster
            .fill_circle(point, self.brush.width_f32() / 2.0, self.brush.color());
        #[cfg(feature = "tracing")]
        tracing::trace!(x = point.x, y = point.y, "stroke begin");
        true
    }

    /// Extend the current stroke with a segment from the anchor to the new point.
    ///
    /// No-op unless a stroke is in progress.
    pub fn continue_stroke(&mut self, input: &PointerInput, bounds: &SurfaceBounds) -> bool {
        if !self.drawing {
            return false;
        }
        let (Some(anchor), Some(point)) = (self.anchor, self.to_logical(input, bounds)) else {
            return false;
        };
        self.raster
            .stroke_segment(anchor, point, self.brush.width_f32(), self.brush.color());
        self.anchor = Some(point);
        true
    }

    /// Finish the current stroke. Idempotent.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
        self.anchor = None;
    }

    /// The pointer left the surface; ends the stroke like a release.
    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    /// Erase the raster. Brush color and width are kept.
    pub fn clear(&mut self) {
        self.raster.clear();
        self.has_content = false;
    }

    /// Select a palette color for subsequent strokes.
    pub fn set_color(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        Ok(self.brush.set_color(color)?)
    }

    /// Select a stroke width for subsequent strokes.
    pub fn set_width(&mut self, width: u8) -> Result<(), SurfaceError> {
        Ok(self.brush.set_width(width)?)
    }

    /// Snapshot the raster as PNG. Leaves the surface untouched.
    pub fn commit(&self) -> Result<EncodedImage, SurfaceError> {
        if !self.has_content {
            return Err(SurfaceError::NothingDrawn);
        }
        let image = EncodedImage::from_raster(&self.raster)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = image.png_bytes().len(), "surface committed");
        Ok(image)
    }
}

#![forbid(unsafe_code)]

//! Device-to-logical coordinate mapping for mouse and touch input.
//!
//! The surface has a fixed square logical resolution, but the host may
//! display it at any size and aspect ratio. Each axis is scaled on its own:
//!
//! ```text
//! logical_x = (client_x - left) * logical_width  / displayed_width
//! logical_y = (client_y - top)  * logical_height / displayed_height
//! ```

use smallvec::SmallVec;

/// A position in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LogicalPoint {
    pub x: f32,
    pub y: f32,
}

impl LogicalPoint {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One contact point of a touch event, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// Pointer input as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerInput {
    /// Mouse or pen pointer at a client position.
    Mouse { client_x: f32, client_y: f32 },
    /// Touch event; only the first touch point drives the stroke.
    Touch { touches: SmallVec<[TouchPoint; 2]> },
}

impl PointerInput {
    #[must_use]
    pub const fn mouse(client_x: f32, client_y: f32) -> Self {
        Self::Mouse { client_x, client_y }
    }

    /// Touch event with the given contact points, in host order.
    #[must_use]
    pub fn touch(points: impl IntoIterator<Item = TouchPoint>) -> Self {
        Self::Touch {
            touches: points.into_iter().collect(),
        }
    }

    /// Client position that drives the stroke, if any.
    #[must_use]
    pub fn client_position(&self) -> Option<(f32, f32)> {
        match self {
            Self::Mouse { client_x, client_y } => Some((*client_x, *client_y)),
            Self::Touch { touches } => touches.first().map(|t| (t.client_x, t.client_y)),
        }
    }
}

/// Displayed rectangle of the surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether both displayed extents are finite and positive.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Map `input` into a `logical_width` x `logical_height` space.
    ///
    /// Returns `None` for degenerate bounds, touch events without contact
    /// points, or non-finite coordinates. Points outside the displayed
    /// rectangle are mapped linearly and left to the rasterizer to clip.
    #[must_use]
    pub fn to_logical(
        &self,
        input: &PointerInput,
        logical_width: u32,
        logical_height: u32,
    ) -> Option<LogicalPoint> {
        if !self.is_usable() {
            return None;
        }
        let (client_x, client_y) = input.client_position()?;
        let scale_x = logical_width as f32 / self.width;
        let scale_y = logical_height as f32 / self.height;
        let point = LogicalPoint::new(
            (client_x - self.left) * scale_x,
            (client_y - self.top) * scale_y,
        );
        (point.x.is_finite() && point.y.is_finite()).then_some(point)
    }
}

#![forbid(unsafe_code)]

//! Drawing surface: the leaf component of Bloom.
//!
//! # Role in Bloom
//! `bloom-canvas` owns a fixed-resolution RGBA raster and turns pointer and
//! touch input into anti-aliased strokes on it. When the visitor is done,
//! [`DrawingSurface::commit`] snapshots the raster into a PNG that can be
//! embedded as a data URL.
//!
//! # Primary responsibilities
//! - **Coordinate mapping**: device coordinates to logical canvas units,
//!   independently per axis, regardless of the displayed size.
//! - **Brush state**: palette-constrained color and bounded width.
//! - **Rasterization**: round-capped, round-joined segments and dots.
//! - **Commit**: deterministic PNG encoding of the current buffer.
//!
//! The crate performs no I/O and holds no clock or random source, so every
//! operation is deterministic given its inputs.

pub mod brush;
pub mod color;
pub mod encode;
pub mod pointer;
pub mod raster;
pub mod surface;

pub use brush::{Brush, BrushError, DEFAULT_WIDTH, MAX_WIDTH, MIN_WIDTH};
pub use color::{DEFAULT_COLOR, PALETTE, Rgba};
pub use encode::{EncodedImage, ImageError};
pub use pointer::{LogicalPoint, PointerInput, SurfaceBounds, TouchPoint};
pub use raster::Raster;
pub use surface::{DEFAULT_LOGICAL_SIZE, DrawingSurface, SurfaceError};

#![forbid(unsafe_code)]

//! RGBA8 raster buffer with anti-aliased dot and segment painting.
//!
//! Shapes are rasterized by distance: a pixel whose center lies at distance
//! `d` from the shape's spine receives coverage `clamp(r + 0.5 - d, 0, 1)`,
//! which is then composited source-over. A segment is painted as a capsule,
//! so its ends are round and consecutive segments meet in round joins.

use crate::color::Rgba;
use crate::pointer::LogicalPoint;

/// Row-major RGBA8 pixel buffer with straight alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent buffer.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let px: [u8; 4] = self.pixels[idx..idx + 4].try_into().ok()?;
        Some(Rgba::from_array(px))
    }

    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn painted_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Paint a filled disc.
    pub fn fill_circle(&mut self, center: LogicalPoint, radius: f32, color: Rgba) {
        self.paint_capsule(center, center, radius, color);
    }

    /// Paint a segment of the given width with round caps.
    pub fn stroke_segment(&mut self, from: LogicalPoint, to: LogicalPoint, width: f32, color: Rgba) {
        self.paint_capsule(from, to, width / 2.0, color);
    }

    fn paint_capsule(&mut self, a: LogicalPoint, b: LogicalPoint, radius: f32, color: Rgba) {
        if self.width == 0 || self.height == 0 || radius.is_nan() || radius <= 0.0 {
            return;
        }
        let reach = radius + 0.5;
        let min_x = a.x.min(b.x) - reach;
        let max_x = a.x.max(b.x) + reach;
        let min_y = a.y.min(b.y) - reach;
        let max_y = a.y.max(b.y) + reach;
        let Some((x0, x1)) = clip_span(min_x, max_x, self.width) else {
            return;
        };
        let Some((y0, y1)) = clip_span(min_y, max_y, self.height) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let center = LogicalPoint::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, a, b);
                let coverage = (reach - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    /// Source-over composite of `color` scaled by `coverage`.
    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let idx = self.index(x, y);
        let src_a = f32::from(color.a) / 255.0 * coverage;
        if src_a <= 0.0 {
            return;
        }
        let px = &mut self.pixels[idx..idx + 4];
        if src_a >= 1.0 {
            px.copy_from_slice(&color.to_array());
            return;
        }
        let dst_a = f32::from(px[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: u8, d: u8| -> u8 {
            ((f32::from(s) * src_a + f32::from(d) * dst_a * (1.0 - src_a)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        px[0] = mix(color.r, px[0]);
        px[1] = mix(color.g, px[1]);
        px[2] = mix(color.b, px[2]);
        px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

/// Clip the continuous span `[min, max]` to whole pixel indices `[start, end)`.
fn clip_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let start = min.floor().max(0.0);
    let end = max.ceil().min(limit as f32);
    if start >= end {
        return None;
    }
    Some((start as u32, end as u32))
}

fn distance_to_segment(p: LogicalPoint, a: LogicalPoint, b: LogicalPoint) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    (dx * dx + dy * dy).sqrt()
}

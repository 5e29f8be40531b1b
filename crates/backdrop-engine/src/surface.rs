//! Raster drawing surface sized to a host region.
//!
//! The backing store is physical pixels (`ceil(logical * dpr)` per axis). Every drawing
//! call takes logical coordinates; each physical pixel is shaded by mapping its center
//! back into logical space, so callers never see the device pixel ratio.

use backdrop_core::{PhysicalSize, Point, Rect, Rgba, Size};

use crate::color::{Blend, Pixel};
use crate::gradient::Paint;

/// Largest backing store a surface will allocate.
pub const MAX_SURFACE_PIXELS: usize = 4096 * 4096;

fn usable_ratio(dpr: f32) -> bool {
    dpr.is_finite() && dpr > 0.0
}

/// Physical size for `logical` bounds, or `None` when it exceeds [`MAX_SURFACE_PIXELS`].
fn backing_size(logical: Size, dpr: f32) -> Option<PhysicalSize> {
    let physical = PhysicalSize::from_logical(logical, dpr);
    (physical.area() <= MAX_SURFACE_PIXELS).then_some(physical)
}

/// A premultiplied RGBA raster surface.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: Vec<Pixel>,
    physical: PhysicalSize,
    logical: Size,
    dpr: f32,
}

impl Surface {
    /// Acquire a surface for `logical` bounds, or `None` when the ratio is unusable or
    /// the backing store would be too large.
    pub fn acquire(logical: Size, dpr: f32) -> Option<Surface> {
        if !usable_ratio(dpr) {
            return None;
        }
        let physical = backing_size(logical, dpr)?;
        Some(Surface {
            pixels: vec![Pixel::CLEAR; physical.area()],
            physical,
            logical,
            dpr,
        })
    }

    /// Resize the backing store for new bounds and return its physical size.
    ///
    /// Unchanged bounds leave the pixels untouched. Returns `None`, leaving the surface
    /// as it was, when the ratio is unusable or the store would be too large.
    pub fn configure(&mut self, logical: Size, dpr: f32) -> Option<PhysicalSize> {
        if !usable_ratio(dpr) {
            return None;
        }
        let physical = backing_size(logical, dpr)?;

        if physical != self.physical || logical != self.logical || dpr != self.dpr {
            self.pixels = vec![Pixel::CLEAR; physical.area()];
            self.physical = physical;
            self.logical = logical;
            self.dpr = dpr;
        }
        Some(self.physical)
    }

    pub fn logical(&self) -> Size {
        self.logical
    }

    pub fn physical(&self) -> PhysicalSize {
        self.physical
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at physical coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.physical.width || y >= self.physical.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.physical.width as usize + x as usize)
            .copied()
    }

    /// Pixel under a logical point.
    pub fn pixel_at(&self, p: Point) -> Option<Pixel> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        self.pixel((p.x * self.dpr) as u32, (p.y * self.dpr) as u32)
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::CLEAR);
    }

    /// Fill a rectangle, with exact partial coverage on its edges.
    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint, blend: Blend) {
        let dpr = self.dpr;
        let (x0, x1) = (rect.origin.x * dpr, (rect.origin.x + rect.size.width) * dpr);
        let (y0, y1) = (rect.origin.y * dpr, (rect.origin.y + rect.size.height) * dpr);
        let overlap = |lo: f32, hi: f32, px: u32| {
            let px = px as f32;
            (hi.min(px + 1.0) - lo.max(px)).clamp(0.0, 1.0)
        };

        self.shade(rect, paint, blend, |px, py, _| {
            overlap(x0, x1, px) * overlap(y0, y1, py)
        });
    }

    /// Fill a disc with anti-aliased edges.
    ///
    /// A disc smaller than one physical pixel is splatted onto the pixel under its
    /// center, with coverage linear in its physical diameter.
    pub fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint, blend: Blend) {
        if radius <= 0.0 {
            return;
        }
        let dpr = self.dpr;
        let radius_px = radius * dpr;

        if radius_px < 0.5 {
            let Some(index) = self.index_at(center) else {
                return;
            };
            let src = paint.at(center).scaled((radius_px * 2.0).min(1.0));
            self.pixels[index] = src.composite(self.pixels[index], blend);
            return;
        }

        let bounds = Rect::new(
            center.x - radius - 1.0 / dpr,
            center.y - radius - 1.0 / dpr,
            (radius + 1.0 / dpr) * 2.0,
            (radius + 1.0 / dpr) * 2.0,
        );
        self.shade(bounds, paint, blend, |_, _, p| {
            let edge_px = (p.distance(center) - radius) * dpr;
            (0.5 - edge_px).clamp(0.0, 1.0)
        });
    }

    /// Stroke a circle outline of `width` logical pixels.
    pub fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Rgba) {
        if radius <= 0.0 || width <= 0.0 {
            return;
        }
        let dpr = self.dpr;
        let half_px = width * dpr / 2.0;
        let reach = radius + width / 2.0 + 1.0 / dpr;
        let bounds = Rect::new(center.x - reach, center.y - reach, reach * 2.0, reach * 2.0);
        let paint = Paint::solid(color);

        self.shade(bounds, &paint, Blend::SourceOver, |_, _, p| {
            stroke_coverage((p.distance(center) - radius).abs() * dpr, half_px)
        });
    }

    /// Stroke a straight segment of `width` logical pixels with round ends.
    pub fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        if width <= 0.0 {
            return;
        }
        let dpr = self.dpr;
        let half_px = width * dpr / 2.0;
        let pad = width / 2.0 + 1.0 / dpr;
        let bounds = Rect::new(
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            (from.x - to.x).abs() + pad * 2.0,
            (from.y - to.y).abs() + pad * 2.0,
        );
        let paint = Paint::solid(color);

        self.shade(bounds, &paint, Blend::SourceOver, |_, _, p| {
            stroke_coverage(distance_to_segment(p, from, to) * dpr, half_px)
        });
    }

    /// Fill everything below a curve sampled left to right.
    ///
    /// The curve is linearly interpolated between samples and held flat past its ends.
    pub fn fill_below(&mut self, curve: &[Point], paint: &Paint, blend: Blend) {
        if curve.is_empty() {
            return;
        }
        let dpr = self.dpr;
        let top = curve.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let bounds = Rect::new(
            0.0,
            top - 1.0 / dpr,
            self.logical.width,
            self.logical.height - top + 1.0 / dpr,
        );

        self.shade(bounds, paint, blend, |_, _, p| {
            let edge = curve_y(curve, p.x);
            ((p.y - edge) * dpr + 0.5).clamp(0.0, 1.0)
        });
    }

    /// Shade physical pixels overlapping `bounds`, weighting the paint by `coverage`.
    ///
    /// `coverage` receives the physical pixel coordinates and the logical pixel center.
    fn shade(
        &mut self,
        bounds: Rect,
        paint: &Paint,
        blend: Blend,
        coverage: impl Fn(u32, u32, Point) -> f32,
    ) {
        let dpr = self.dpr;
        let width = self.physical.width;
        let height = self.physical.height;

        let x0 = ((bounds.origin.x * dpr).floor().max(0.0) as u32).min(width);
        let y0 = ((bounds.origin.y * dpr).floor().max(0.0) as u32).min(height);
        let x1 = ((bounds.origin.x + bounds.size.width) * dpr)
            .ceil()
            .clamp(0.0, width as f32) as u32;
        let y1 = ((bounds.origin.y + bounds.size.height) * dpr)
            .ceil()
            .clamp(0.0, height as f32) as u32;

        for py in y0..y1 {
            let row = py as usize * width as usize;
            for px in x0..x1 {
                let center = Point::new((px as f32 + 0.5) / dpr, (py as f32 + 0.5) / dpr);
                let k = coverage(px, py, center);
                if k <= 0.0 {
                    continue;
                }
                let src = paint.at(center).scaled(k);
                let dst = &mut self.pixels[row + px as usize];
                *dst = src.composite(*dst, blend);
            }
        }
    }

    fn index_at(&self, p: Point) -> Option<usize> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = ((p.x * self.dpr) as u32, (p.y * self.dpr) as u32);
        (x < self.physical.width && y < self.physical.height)
            .then(|| y as usize * self.physical.width as usize + x as usize)
    }
}

/// Coverage of a pixel `off_px` physical pixels from a stroke's center line.
fn stroke_coverage(off_px: f32, half_px: f32) -> f32 {
    if half_px < 0.5 {
        // Hairline: fade by distance with a one-pixel footprint.
        (1.0 - off_px).clamp(0.0, 1.0) * half_px * 2.0
    } else {
        (half_px + 0.5 - off_px).clamp(0.0, 1.0)
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    p.distance(Point::new(a.x + dx * t, a.y + dy * t))
}

/// Height of a sampled curve at `x`.
fn curve_y(curve: &[Point], x: f32) -> f32 {
    let Some(first) = curve.first() else {
        return 0.0;
    };
    if x <= first.x {
        return first.y;
    }
    for pair in curve.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x <= b.x {
            let span = b.x - a.x;
            if span <= f32::EPSILON {
                return b.y;
            }
            return a.y + (b.y - a.y) * (x - a.x) / span;
        }
    }
    curve.last().map_or(first.y, |p| p.y)
}

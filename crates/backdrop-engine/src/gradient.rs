//! Color gradients and the paints built from them.

use backdrop_core::{Point, Rgba};

use crate::color::Pixel;

/// A color at a position (0.0-1.0) along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColorStop {
    offset: f32,
    color: Pixel,
}

/// A multi-stop gradient, interpolated in premultiplied space so fading toward
/// `transparent` never darkens the color.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(stops: impl IntoIterator<Item = (f32, Rgba)>) -> Self {
        let mut stops: Vec<ColorStop> = stops
            .into_iter()
            .map(|(offset, color)| ColorStop {
                offset: offset.clamp(0.0, 1.0),
                color: Pixel::from_rgba(color),
            })
            .collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// Color at `t`, clamped to the first and last stops.
    pub fn sample(&self, t: f32) -> Pixel {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Pixel::CLEAR;
        };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.mix(b.color, (t - a.offset) / span);
            }
        }
        last.color
    }
}

/// What fills a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Pixel),
    /// Vertical gradient running from `from` to `to` (logical y).
    Linear { from: f32, to: f32, gradient: Gradient },
    /// Elliptical gradient around `center`; `rx == ry` gives a circle.
    Radial {
        center: Point,
        rx: f32,
        ry: f32,
        gradient: Gradient,
    },
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Paint::Solid(Pixel::from_rgba(color))
    }

    pub fn radial(center: Point, radius: f32, gradient: Gradient) -> Self {
        Paint::Radial {
            center,
            rx: radius,
            ry: radius,
            gradient,
        }
    }

    /// Premultiplied color at a logical point.
    pub fn at(&self, p: Point) -> Pixel {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { from, to, gradient } => {
                let span = to - from;
                let t = if span.abs() <= f32::EPSILON {
                    0.0
                } else {
                    (p.y - from) / span
                };
                gradient.sample(t)
            }
            Paint::Radial {
                center,
                rx,
                ry,
                gradient,
            } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return gradient.sample(1.0);
                }
                let dx = (p.x - center.x) / rx;
                let dy = (p.y - center.y) / ry;
                gradient.sample((dx * dx + dy * dy).sqrt())
            }
        }
    }
}

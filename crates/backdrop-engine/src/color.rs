//! Pixel compositing and terminal color conversion.

use backdrop_core::{Rgb, Rgba};
use ratatui::style::Color;

/// How a source pixel combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Standard alpha compositing.
    #[default]
    SourceOver,
    /// Additive, saturating at white.
    Lighter,
    /// `1 - (1 - src) * (1 - dst)`, never darkens.
    Screen,
}

/// A premultiplied RGBA pixel with channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Pixel {
    pub const CLEAR: Pixel = Pixel {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Premultiply a straight-alpha color.
    pub fn from_rgba(color: Rgba) -> Self {
        let a = color.a.clamp(0.0, 1.0);
        Self {
            r: color.r as f32 / 255.0 * a,
            g: color.g as f32 / 255.0 * a,
            b: color.b as f32 / 255.0 * a,
            a,
        }
    }

    /// Scale every channel, used for partial coverage.
    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a * k,
        }
    }

    /// Interpolate premultiplied channels.
    pub fn mix(self, other: Pixel, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Composite `self` (source) onto `dst`.
    pub fn composite(self, dst: Pixel, blend: Blend) -> Pixel {
        match blend {
            Blend::SourceOver => {
                let k = 1.0 - self.a;
                Pixel {
                    r: self.r + dst.r * k,
                    g: self.g + dst.g * k,
                    b: self.b + dst.b * k,
                    a: self.a + dst.a * k,
                }
            }
            Blend::Lighter => Pixel {
                r: (self.r + dst.r).min(1.0),
                g: (self.g + dst.g).min(1.0),
                b: (self.b + dst.b).min(1.0),
                a: (self.a + dst.a).min(1.0),
            },
            Blend::Screen => {
                let screen = |s: f32, d: f32| s + d - s * d;
                Pixel {
                    r: screen(self.r, dst.r),
                    g: screen(self.g, dst.g),
                    b: screen(self.b, dst.b),
                    a: screen(self.a, dst.a),
                }
            }
        }
    }

    /// Flatten onto an opaque backdrop.
    pub fn over_rgb(self, backdrop: Rgb) -> Rgb {
        let k = 1.0 - self.a.clamp(0.0, 1.0);
        let channel = |src: f32, dst: u8| {
            ((src + dst as f32 / 255.0 * k).clamp(0.0, 1.0) * 255.0).round() as u8
        };
        Rgb::new(
            channel(self.r, backdrop.r),
            channel(self.g, backdrop.g),
            channel(self.b, backdrop.b),
        )
    }
}

/// Average a set of pixels, used when a surface is supersampled.
pub fn average(pixels: impl IntoIterator<Item = Pixel>) -> Pixel {
    let mut sum = Pixel::CLEAR;
    let mut count = 0usize;
    for p in pixels {
        sum.r += p.r;
        sum.g += p.g;
        sum.b += p.b;
        sum.a += p.a;
        count += 1;
    }
    if count == 0 {
        return Pixel::CLEAR;
    }
    sum.scaled(1.0 / count as f32)
}

/// Convert to a terminal true-color value.
pub fn to_terminal(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

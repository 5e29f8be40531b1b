//! Color types and CSS-style color parsing.

use std::fmt;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blend toward `other` by `t` (0.0-1.0), rounding each channel.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Attach an alpha channel.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// An RGB color with straight (non-premultiplied) alpha in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// The RGB channels without alpha.
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Replace the alpha channel, keeping RGB untouched.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// Parse `#rrggbb`, `rgb(r, g, b)`, `rgb(r g b)`, `rgba(r, g, b, a)` or `transparent`.
    pub fn parse(s: &str) -> Option<Rgba> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Rgba::TRANSPARENT);
        }
        if let Some(rgb) = parse_hex(s) {
            return Some(rgb.with_alpha(1.0));
        }

        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;

        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }

        let channel = |p: &str| -> Option<u8> {
            let v: f32 = p.parse().ok()?;
            v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
        };
        let r = channel(parts[0])?;
        let g = channel(parts[1])?;
        let b = channel(parts[2])?;
        let a = match parts.get(3) {
            Some(p) => {
                let v: f32 = p.parse().ok()?;
                if !v.is_finite() {
                    return None;
                }
                v
            }
            None => 1.0,
        };

        Some(Rgba::new(r, g, b, a))
    }

    /// Parse a color, falling back to `fallback` (and logging) when it is malformed.
    pub fn parse_or(s: &str, fallback: Rgba) -> Rgba {
        Rgba::parse(s).unwrap_or_else(|| {
            tracing::warn!(color = s, %fallback, "malformed color, using fallback");
            fallback
        })
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Parse a `#rrggbb` (or bare `rrggbb`) hex color.
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Replace the trailing alpha argument of an `rgba(...)` string.
///
/// Only the final numeric run before `)` is rewritten, so the RGB text is preserved
/// byte for byte. Returns `None` for anything that is not an `rgba(` string.
pub fn substitute_alpha(css: &str, alpha: f32) -> Option<String> {
    let css = css.trim();
    if !css.get(..5)?.eq_ignore_ascii_case("rgba(") {
        return None;
    }
    let body = css.strip_suffix(')')?;
    let number_start = body
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, _)| i)?;

    Some(format!("{}{})", &body[..number_start], alpha))
}

//! Spotlight: soft colored glows that trail the pointer and drift when it idles.

use std::f32::consts::SQRT_2;
use std::time::Duration;

use backdrop_core::{FrameTime, Point, Rect, Rgba, Size, SpotlightOptions, TimingBasis};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::{Gradient, Paint};
use crate::host::ListenerKind;
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[
    Listen::WINDOW_RESIZE,
    Listen::section(ListenerKind::MouseMove),
    Listen::section(ListenerKind::TouchMove),
];

/// Resting spread between neighbouring spotlights.
const FAN_SPACING: f32 = 50.0;
/// Spread around the pointer.
const POINTER_FAN: (f32, f32) = (30.0, 20.0);
/// Fraction of the gradient radius where a spotlight fades out.
const FADE_AT: f32 = 0.7;

const FALLBACK_COLOR: Rgba = Rgba {
    r: 120,
    g: 119,
    b: 198,
    a: 0.3,
};
const BASE_TINT: Rgba = Rgba {
    r: 30,
    g: 30,
    b: 50,
    a: 0.15,
};
const VIGNETTE: Rgba = Rgba {
    r: 10,
    g: 10,
    b: 10,
    a: 0.8,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub pos: Point,
    pub target: Point,
    pub color: Rgba,
}

#[derive(Debug, Clone)]
pub struct Spotlight {
    options: SpotlightOptions,
    colors: Vec<Rgba>,
    spots: EntityBatch<Spot>,
    bounds: Size,
}

impl Spotlight {
    pub fn new(options: &SpotlightOptions) -> Self {
        let mut colors: Vec<Rgba> = options
            .colors
            .iter()
            .map(|c| Rgba::parse_or(c, FALLBACK_COLOR))
            .collect();
        if colors.is_empty() {
            colors.push(FALLBACK_COLOR);
        }

        Self {
            options: options.clone(),
            colors,
            spots: EntityBatch::new(),
            bounds: Size::default(),
        }
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// Offset of spotlight `i` from the middle of the fan, in fan steps.
    fn fan_index(&self, i: usize) -> f32 {
        i as f32 - (self.colors.len() as f32 - 1.0) / 2.0
    }

    /// Lerp factor for this frame.
    fn smoothing(&self, time: &FrameTime) -> f32 {
        let s = self.options.smoothing.clamp(0.0, 1.0);
        match self.options.timing {
            TimingBasis::Tick => s,
            TimingBasis::Elapsed => 1.0 - (1.0 - s).powf(time.step(TimingBasis::Elapsed)),
        }
    }

    /// Whether the pointer has been idle long enough to drift on its own.
    fn is_ambient(&self, ctx: &StepContext<'_>) -> bool {
        if !self.options.ambient {
            return false;
        }
        let idle = match ctx.pointer.moved_at() {
            Some(at) => ctx.now.saturating_sub(at),
            None => ctx.time.elapsed,
        };
        idle > Duration::from_millis(self.options.ambient_delay_ms)
    }
}

impl Default for Spotlight {
    fn default() -> Self {
        Self::new(&SpotlightOptions::default())
    }
}

impl Effect for Spotlight {
    fn name(&self) -> &'static str {
        "spotlight"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rescale
    }

    fn build(&mut self, bounds: Size, _sampler: &mut Sampler) {
        self.bounds = bounds;
        let center = bounds.center();
        let spots: Vec<Spot> = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let pos = Point::new(center.x + self.fan_index(i) * FAN_SPACING, center.y);
                Spot {
                    pos,
                    target: pos,
                    color,
                }
            })
            .collect();
        self.spots.rebuild(spots);
    }

    fn on_pointer(&mut self, point: Point, _time: FrameTime, _sampler: &mut Sampler) {
        let (fx, fy) = POINTER_FAN;
        let offsets: Vec<f32> = (0..self.spots.len()).map(|i| self.fan_index(i)).collect();
        for (spot, k) in self.spots.iter_mut().zip(offsets) {
            spot.target = Point::new(point.x + k * fx, point.y + k * fy);
        }
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        let Size { width, height } = ctx.bounds;
        let ambient = self.is_ambient(ctx);
        let factor = self.smoothing(&ctx.time);
        let clock = ctx.time.clock(self.options.timing);

        for (i, spot) in self.spots.iter_mut().enumerate() {
            if ambient {
                let offset = i as f32 * 0.5;
                spot.target = Point::new(
                    width / 2.0 + (clock * 0.005 + offset).sin() * width * 0.2,
                    height / 2.0 + (clock * 0.003 + offset).cos() * height * 0.15,
                );
            }
            spot.pos.x += (spot.target.x - spot.pos.x) * factor;
            spot.pos.y += (spot.target.y - spot.pos.y) * factor;
        }
    }

    fn render(&self, surface: &mut Surface) {
        let Size { width, height } = self.bounds;
        let full = Rect::new(0.0, 0.0, width, height);
        surface.clear();

        let size = self.options.size;
        let blur = self.options.blur.max(0.0);
        let reach = size * FADE_AT + blur;
        let solid_until = ((size * FADE_AT - blur) / reach).max(0.0);
        for spot in self.spots.iter() {
            let color = spot.color.with_alpha(spot.color.a * self.options.opacity);
            let gradient = Gradient::new([
                (0.0, color),
                (solid_until * 0.5, color),
                (1.0, color.with_alpha(0.0)),
            ]);
            surface.fill_rect(full, &Paint::radial(spot.pos, reach, gradient), Blend::Screen);
        }

        // Ellipses reach the far corners.
        let center = self.bounds.center();
        let (rx, ry) = (width / 2.0 * SQRT_2, height / 2.0 * SQRT_2);
        let base = Paint::Radial {
            center,
            rx,
            ry,
            gradient: Gradient::new([(0.0, BASE_TINT), (FADE_AT, BASE_TINT.with_alpha(0.0))]),
        };
        surface.fill_rect(full, &base, Blend::SourceOver);

        let vignette = Paint::Radial {
            center,
            rx,
            ry,
            gradient: Gradient::new([
                (0.0, VIGNETTE.with_alpha(0.0)),
                (0.4, VIGNETTE.with_alpha(0.0)),
                (1.0, VIGNETTE),
            ]),
        };
        surface.fill_rect(full, &vignette, Blend::SourceOver);
    }

    fn entity_count(&self) -> usize {
        self.spots.len()
    }
}

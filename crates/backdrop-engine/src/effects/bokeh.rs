//! Bokeh: large soft orbs drifting and pulsing behind the content.

use backdrop_core::{BokehOptions, Point, Rgba, Size, substitute_alpha};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::{Gradient, Paint};
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[Listen::WINDOW_RESIZE];

/// Used when a palette entry is not an `rgba(...)` string.
const FALLBACK_COLOR: &str = "rgba(255, 200, 120, 0.3)";

/// A single orb.
#[derive(Debug, Clone, PartialEq)]
pub struct Orb {
    pub pos: Point,
    pub vx: f32,
    pub vy: f32,
    /// Diameter; doubles as depth (larger is nearer).
    pub size: f32,
    /// Diameter after this frame's pulse.
    pub current_size: f32,
    pub color: String,
    pub opacity: f32,
    pub pulse_offset: f32,
    pub pulse_speed: f32,
}

#[derive(Debug, Clone)]
pub struct Bokeh {
    options: BokehOptions,
    palette: Vec<String>,
    orbs: EntityBatch<Orb>,
}

impl Bokeh {
    pub fn new(options: &BokehOptions) -> Self {
        let mut palette: Vec<String> = options
            .colors
            .iter()
            .filter(|c| {
                let ok = substitute_alpha(c, 1.0).is_some_and(|s| Rgba::parse(&s).is_some());
                if !ok {
                    tracing::warn!(color = %c, "bokeh colors must be rgba(...), skipping");
                }
                ok
            })
            .cloned()
            .collect();
        if palette.is_empty() {
            palette.push(FALLBACK_COLOR.to_string());
        }

        Self {
            options: options.clone(),
            palette,
            orbs: EntityBatch::new(),
        }
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    fn spawn(&self, bounds: Size, sampler: &mut Sampler) -> Orb {
        let opts = &self.options;
        let size = sampler.range(opts.min_size, opts.max_size);
        let color = sampler
            .pick(&self.palette)
            .cloned()
            .unwrap_or_else(|| FALLBACK_COLOR.to_string());

        Orb {
            pos: Point::new(
                sampler.range(0.0, bounds.width),
                sampler.range(0.0, bounds.height),
            ),
            vx: sampler.signed(0.15) * opts.speed,
            vy: sampler.signed(0.15) * opts.speed,
            size,
            current_size: size,
            color,
            opacity: sampler.range(0.15, 0.35),
            pulse_offset: sampler.angle(),
            pulse_speed: sampler.range(0.005, 0.015),
        }
    }
}

/// `color` with its alpha replaced, falling back to transparent.
fn stop_color(color: &str, alpha: f32) -> Rgba {
    substitute_alpha(color, alpha)
        .and_then(|s| Rgba::parse(&s))
        .unwrap_or(Rgba::TRANSPARENT)
}

/// Wrap `v` into `[-margin, bound + margin]`, re-entering from the opposite edge.
fn wrap(v: f32, bound: f32, margin: f32) -> f32 {
    if v < -margin {
        bound + margin
    } else if v > bound + margin {
        -margin
    } else {
        v
    }
}

impl Effect for Bokeh {
    fn name(&self) -> &'static str {
        "bokeh"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rescale
    }

    fn build(&mut self, bounds: Size, sampler: &mut Sampler) {
        let orbs: Vec<Orb> = (0..self.options.count)
            .map(|_| self.spawn(bounds, sampler))
            .collect();
        self.orbs.rebuild(orbs);
        self.orbs.sort_by_depth(|orb| orb.size);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let basis = self.options.timing;
        let step = ctx.time.step(basis);
        let clock = ctx.time.clock(basis);
        let Size { width, height } = ctx.bounds;

        for orb in self.orbs.iter_mut() {
            orb.pos.x += orb.vx * step;
            orb.pos.y += orb.vy * step;

            let margin = orb.size / 2.0;
            orb.pos.x = wrap(orb.pos.x, width, margin);
            orb.pos.y = wrap(orb.pos.y, height, margin);

            let pulse = (clock * orb.pulse_speed + orb.pulse_offset).sin() * 0.1 + 1.0;
            orb.current_size = orb.size * pulse;
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.clear();

        for orb in self.orbs.iter() {
            let radius = orb.current_size / 2.0;
            let gradient = Gradient::new([
                (0.0, stop_color(&orb.color, orb.opacity * 1.2)),
                (0.4, stop_color(&orb.color, orb.opacity)),
                (0.7, stop_color(&orb.color, orb.opacity * 0.5)),
                (1.0, stop_color(&orb.color, 0.0)),
            ]);
            let paint = Paint::radial(orb.pos, radius, gradient);
            surface.fill_circle(orb.pos, radius, &paint, Blend::SourceOver);

            // Rim highlight.
            surface.stroke_circle(
                orb.pos,
                radius - 2.0,
                1.0,
                stop_color(&orb.color, orb.opacity * 0.3),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.orbs.len()
    }
}

impl Default for Bokeh {
    fn default() -> Self {
        Self::new(&BokehOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use backdrop_core::FrameTime;

    use super::*;
    use crate::interaction::InteractionTracker;

    fn stepped(bokeh: &mut Bokeh, bounds: Size, frames: u64, sampler: &mut Sampler) {
        let tracker = InteractionTracker::new();
        for tick in 1..=frames {
            let mut ctx = StepContext {
                bounds,
                pointer: &tracker,
                time: FrameTime {
                    tick,
                    elapsed: Duration::from_millis(tick * 16),
                    delta: Duration::from_millis(16),
                },
                now: Duration::from_millis(tick * 16),
                sampler: &mut *sampler,
            };
            bokeh.step(&mut ctx);
        }
    }

    #[test]
    fn test_build_sorts_by_size() {
        let mut bokeh = Bokeh::default();
        let mut sampler = Sampler::seeded(11);
        bokeh.build(Size::new(800.0, 600.0), &mut sampler);

        assert_eq!(bokeh.entity_count(), 25);
        assert!(bokeh.orbs().windows(2).all(|w| w[0].size <= w[1].size));
        for orb in bokeh.orbs() {
            assert!((50.0..200.0).contains(&orb.size));
            assert!((0.15..0.35).contains(&orb.opacity));
        }
    }

    #[test]
    fn test_wrap_keeps_orbs_bounded() {
        let options = BokehOptions {
            speed: 400.0,
            ..BokehOptions::default()
        };
        let mut bokeh = Bokeh::new(&options);
        let mut sampler = Sampler::seeded(5);
        let bounds = Size::new(300.0, 200.0);
        bokeh.build(bounds, &mut sampler);

        for _ in 0..50 {
            stepped(&mut bokeh, bounds, 10, &mut sampler);
            for orb in bokeh.orbs() {
                let m = orb.size / 2.0;
                assert!(orb.pos.x >= -m && orb.pos.x <= bounds.width + m);
                assert!(orb.pos.y >= -m && orb.pos.y <= bounds.height + m);
            }
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(-31.0, 100.0, 30.0), 130.0);
        assert_eq!(wrap(131.0, 100.0, 30.0), -30.0);
        assert_eq!(wrap(50.0, 100.0, 30.0), 50.0);
    }

    #[test]
    fn test_pulse_stays_within_ten_percent() {
        let mut bokeh = Bokeh::default();
        let mut sampler = Sampler::seeded(9);
        let bounds = Size::new(800.0, 600.0);
        bokeh.build(bounds, &mut sampler);
        stepped(&mut bokeh, bounds, 120, &mut sampler);
        for orb in bokeh.orbs() {
            let ratio = orb.current_size / orb.size;
            assert!((0.9 - 1e-4..=1.1 + 1e-4).contains(&ratio));
        }
    }

    #[test]
    fn test_invalid_palette_falls_back() {
        let options = BokehOptions {
            colors: vec!["#ffffff".into(), "nonsense".into()],
            ..BokehOptions::default()
        };
        let bokeh = Bokeh::new(&options);
        assert_eq!(bokeh.palette, vec![FALLBACK_COLOR.to_string()]);
    }

    #[test]
    fn test_render_draws_orbs() {
        let mut bokeh = Bokeh::default();
        let mut sampler = Sampler::seeded(2);
        let bounds = Size::new(400.0, 300.0);
        bokeh.build(bounds, &mut sampler);
        let mut surface = Surface::acquire(bounds, 0.25).unwrap();
        bokeh.render(&mut surface);
        assert!(surface.pixels().iter().any(|p| p.a > 0.0));
    }
}

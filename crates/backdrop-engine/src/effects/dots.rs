//! Dot pattern: a grid of dots with a slow diagonal wave that light up near the pointer.

use backdrop_core::{DotPatternOptions, Point, Proximity, Rgb, Rgba, Size, parse_hex};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::{Gradient, Paint};
use crate::host::ListenerKind;
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[
    Listen::REGION_RESIZE,
    Listen::section(ListenerKind::MouseMove),
    Listen::section(ListenerKind::MouseLeave),
];

/// Used for colors that are not `#rrggbb`.
const FALLBACK_COLOR: Rgb = Rgb::BLACK;

/// Opacity added at full proximity.
const OPACITY_BOOST: f32 = 0.7;
/// Scale added at full proximity.
const SCALE_BOOST: f32 = 0.8;
/// Halo radius relative to the dot.
const HALO_SCALE: f32 = 4.0;

/// One grid dot and its state for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub pos: Point,
    pub base_opacity: f32,
    pub color: Rgb,
    pub opacity: f32,
    pub scale: f32,
    pub glow: f32,
}

#[derive(Debug, Clone)]
pub struct DotPattern {
    options: DotPatternOptions,
    base: Rgb,
    highlight: Rgb,
    proximity: Proximity,
    dots: EntityBatch<Dot>,
}

fn hex_or_fallback(s: &str) -> Rgb {
    parse_hex(s).unwrap_or_else(|| {
        tracing::warn!(color = s, "expected #rrggbb, using black");
        FALLBACK_COLOR
    })
}

impl DotPattern {
    pub fn new(options: &DotPatternOptions) -> Self {
        Self {
            options: options.clone(),
            base: hex_or_fallback(&options.base_color),
            highlight: hex_or_fallback(&options.glow_color),
            proximity: Proximity::new(options.proximity),
            dots: EntityBatch::new(),
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }
}

impl Default for DotPattern {
    fn default() -> Self {
        Self::new(&DotPatternOptions::default())
    }
}

impl Effect for DotPattern {
    fn name(&self) -> &'static str {
        "dot_pattern"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rebuild
    }

    fn build(&mut self, bounds: Size, sampler: &mut Sampler) {
        let cell = (self.options.dot_size + self.options.gap).max(1.0);
        let cols = (bounds.width / cell).ceil().max(0.0) as usize + 1;
        let rows = (bounds.height / cell).ceil().max(0.0) as usize + 1;
        let offset_x = (bounds.width - (cols - 1) as f32 * cell) / 2.0;
        let offset_y = (bounds.height - (rows - 1) as f32 * cell) / 2.0;

        let base = self.base;
        let dots = (0..rows).flat_map(|row| (0..cols).map(move |col| (row, col)));
        let dots: Vec<Dot> = dots
            .map(|(row, col)| {
                let base_opacity = sampler.range(0.3, 0.5);
                Dot {
                    pos: Point::new(offset_x + col as f32 * cell, offset_y + row as f32 * cell),
                    base_opacity,
                    color: base,
                    opacity: base_opacity,
                    scale: 1.0,
                    glow: 0.0,
                }
            })
            .collect();
        self.dots.rebuild(dots);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let time = ctx.time.seconds(self.options.timing) * self.options.wave_speed;
        let pointer = ctx.pointer.point();

        for dot in self.dots.iter_mut() {
            let wave = (dot.pos.x * 0.02 + dot.pos.y * 0.02 + time).sin() * 0.5 + 0.5;
            let wave_opacity = dot.base_opacity + wave * 0.15;
            let wave_scale = 1.0 + wave * 0.2;

            let eased = self.proximity.eased_between(dot.pos, pointer);
            if eased > 0.0 {
                dot.color = self.base.lerp(self.highlight, eased);
                dot.opacity = (wave_opacity + eased * OPACITY_BOOST).min(1.0);
                dot.scale = wave_scale + eased * SCALE_BOOST;
                dot.glow = eased * self.options.glow_intensity;
            } else {
                dot.color = self.base;
                dot.opacity = wave_opacity;
                dot.scale = wave_scale;
                dot.glow = 0.0;
            }
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.clear();
        let hl = self.highlight;

        for dot in self.dots.iter() {
            let radius = self.options.dot_size / 2.0 * dot.scale;

            if dot.glow > 0.0 {
                let halo = radius * HALO_SCALE;
                let gradient = Gradient::new([
                    (0.0, hl.with_alpha(dot.glow * 0.4)),
                    (0.5, hl.with_alpha(dot.glow * 0.1)),
                    (1.0, hl.with_alpha(0.0)),
                ]);
                surface.fill_circle(
                    dot.pos,
                    halo,
                    &Paint::radial(dot.pos, halo, gradient),
                    Blend::SourceOver,
                );
            }

            let gradient = Gradient::new([
                (0.0, dot.color.with_alpha(dot.opacity)),
                (0.6, dot.color.with_alpha(dot.opacity)),
                (1.0, Rgba::new(dot.color.r, dot.color.g, dot.color.b, 0.0)),
            ]);
            surface.fill_circle(
                dot.pos,
                radius,
                &Paint::radial(dot.pos, radius, gradient),
                Blend::SourceOver,
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.dots.len()
    }

    fn glow(&self) -> Vec<f32> {
        self.dots.iter().map(|d| d.glow).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use backdrop_core::FrameTime;

    use super::*;
    use crate::interaction::InteractionTracker;

    fn step_with(dots: &mut DotPattern, bounds: Size, tracker: &InteractionTracker) {
        let mut sampler = Sampler::seeded(0);
        let mut ctx = StepContext {
            bounds,
            pointer: tracker,
            time: FrameTime {
                tick: 1,
                elapsed: Duration::from_millis(500),
                delta: Duration::from_millis(16),
            },
            now: Duration::from_millis(500),
            sampler: &mut sampler,
        };
        dots.step(&mut ctx);
    }

    fn pointer_at(p: Point) -> InteractionTracker {
        let mut tracker = InteractionTracker::new();
        tracker.on_move(p, Point::default(), Duration::ZERO);
        tracker
    }

    #[test]
    fn test_grid_is_centered() {
        let mut dots = DotPattern::default();
        dots.build(Size::new(800.0, 600.0), &mut Sampler::seeded(1));

        // cell = 26: 32 columns, 25 rows.
        assert_eq!(dots.entity_count(), 32 * 25);
        let first = dots.dots()[0].pos;
        let last = dots.dots()[dots.entity_count() - 1].pos;
        assert!((first.x + last.x - 800.0).abs() < 1e-3);
        assert!((first.y + last.y - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_on_dot_gives_full_glow() {
        let options = DotPatternOptions {
            glow_intensity: 0.75,
            ..DotPatternOptions::default()
        };
        let mut dots = DotPattern::new(&options);
        let bounds = Size::new(800.0, 600.0);
        dots.build(bounds, &mut Sampler::seeded(1));

        let center = bounds.center();
        let target = dots
            .dots()
            .iter()
            .map(|d| d.pos)
            .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)))
            .unwrap();

        step_with(&mut dots, bounds, &pointer_at(target));
        let hit = dots.dots().iter().find(|d| d.pos == target).unwrap();
        assert_eq!(hit.glow, 0.75);
        assert_eq!(hit.color, parse_hex("#22d3ee").unwrap());
        assert_eq!(hit.opacity, 1.0);
    }

    #[test]
    fn test_glow_limited_to_radius() {
        let mut dots = DotPattern::default();
        let bounds = Size::new(800.0, 600.0);
        dots.build(bounds, &mut Sampler::seeded(1));
        let pointer = Point::new(400.0, 300.0);

        step_with(&mut dots, bounds, &pointer_at(pointer));
        for dot in dots.dots() {
            if dot.pos.distance(pointer) >= 120.0 {
                assert_eq!(dot.glow, 0.0);
                assert_eq!(dot.color, Rgb::new(64, 64, 64));
            }
        }
    }

    #[test]
    fn test_far_away_gives_no_glow() {
        let mut dots = DotPattern::default();
        let bounds = Size::new(800.0, 600.0);
        dots.build(bounds, &mut Sampler::seeded(1));
        step_with(&mut dots, bounds, &InteractionTracker::new());
        assert!(dots.dots().iter().all(|d| d.glow == 0.0));
    }

    #[test]
    fn test_rebuild_uses_new_bounds() {
        let mut dots = DotPattern::default();
        let mut sampler = Sampler::seeded(1);
        dots.build(Size::new(800.0, 600.0), &mut sampler);
        dots.build(Size::new(400.0, 300.0), &mut sampler);

        let cell = 26.0;
        for dot in dots.dots() {
            assert!(dot.pos.x >= -cell && dot.pos.x <= 400.0 + cell);
            assert!(dot.pos.y >= -cell && dot.pos.y <= 300.0 + cell);
        }
    }

    #[test]
    fn test_malformed_color_falls_back() {
        let options = DotPatternOptions {
            base_color: "grey".into(),
            ..DotPatternOptions::default()
        };
        assert_eq!(DotPattern::new(&options).base, FALLBACK_COLOR);
    }

    #[test]
    fn test_glow_paints_halo() {
        let mut dots = DotPattern::default();
        let bounds = Size::new(200.0, 200.0);
        dots.build(bounds, &mut Sampler::seeded(1));
        let target = dots.dots()[0].pos;
        step_with(&mut dots, bounds, &pointer_at(target));

        let mut surface = Surface::acquire(bounds, 1.0).unwrap();
        dots.render(&mut surface);
        assert!(surface.pixels().iter().any(|p| p.a > 0.0));
    }
}

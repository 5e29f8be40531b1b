//! Snow: flakes in three depth layers falling with wobble and wind.

use backdrop_core::{Point, Rgb, Rgba, Size, SnowOptions};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::{Gradient, Paint};
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[Listen::REGION_RESIZE];

/// Horizontal spawn and wrap margin.
const EDGE_MARGIN: f32 = 50.0;
/// Distance below the region before a flake respawns at the top.
const RESPAWN_BELOW: f32 = 20.0;

const HALO_COLOR: Rgba = Rgba {
    r: 255,
    g: 255,
    b: 255,
    a: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Layer {
    speed: f32,
    min_size: f32,
    max_size: f32,
    opacity: f32,
}

/// Far to near.
const LAYERS: [Layer; 3] = [
    Layer {
        speed: 0.3,
        min_size: 1.0,
        max_size: 2.5,
        opacity: 0.4,
    },
    Layer {
        speed: 0.6,
        min_size: 2.0,
        max_size: 4.0,
        opacity: 0.6,
    },
    Layer {
        speed: 1.0,
        min_size: 3.0,
        max_size: 6.0,
        opacity: 0.9,
    },
];

/// Layer of the `i`th flake out of `total`: 40% far, 35% middle, 25% near.
fn layer_for(i: usize, total: usize) -> usize {
    let i = i as f32;
    let total = total as f32;
    if i < total * 0.4 {
        0
    } else if i < total * 0.75 {
        1
    } else {
        2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flake {
    pub pos: Point,
    /// Radius.
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub wobble_offset: f32,
    pub wobble_speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub layer: usize,
}

#[derive(Debug, Clone)]
pub struct Snow {
    options: SnowOptions,
    color: Rgba,
    flakes: EntityBatch<Flake>,
}

impl Snow {
    pub fn new(options: &SnowOptions) -> Self {
        Self {
            options: options.clone(),
            color: Rgba::parse_or(&options.color, Rgb::WHITE.with_alpha(0.9)),
            flakes: EntityBatch::new(),
        }
    }

    pub fn flakes(&self) -> &[Flake] {
        &self.flakes
    }

    fn spawn(layer: usize, bounds: Size, sampler: &mut Sampler) -> Flake {
        let config = LAYERS[layer];
        Flake {
            pos: Point::new(
                sampler.range(-EDGE_MARGIN, bounds.width + EDGE_MARGIN),
                sampler.range(0.0, bounds.height),
            ),
            size: sampler.range(config.min_size, config.max_size),
            speed: config.speed * sampler.range(0.8, 1.2),
            opacity: config.opacity * sampler.range(0.8, 1.0),
            wobble_offset: sampler.angle(),
            wobble_speed: sampler.range(0.02, 0.04),
            rotation: sampler.angle(),
            rotation_speed: sampler.signed(0.01),
            layer,
        }
    }
}

impl Default for Snow {
    fn default() -> Self {
        Self::new(&SnowOptions::default())
    }
}

impl Effect for Snow {
    fn name(&self) -> &'static str {
        "snow"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rescale
    }

    fn build(&mut self, bounds: Size, sampler: &mut Sampler) {
        let total = (self.options.count as f32 * self.options.intensity).max(0.0) as usize;
        let flakes: Vec<Flake> = (0..total)
            .map(|i| Self::spawn(layer_for(i, total), bounds, sampler))
            .collect();
        self.flakes.rebuild(flakes);
        self.flakes
            .sort_by_depth(|f| f.layer as f32 * 100.0 + f.size);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let basis = self.options.timing;
        let step = ctx.time.step(basis);
        let clock = ctx.time.clock(basis);
        let global = self.options.speed;
        let Size { width, height } = ctx.bounds;

        for flake in self.flakes.iter_mut() {
            flake.pos.y += flake.speed * global * 1.5 * step;
            let wobble = (clock * flake.wobble_speed + flake.wobble_offset).sin() * 0.5;
            flake.pos.x += (wobble + self.options.wind * flake.speed * global) * step;
            flake.rotation += flake.rotation_speed * global * step;

            if flake.pos.y > height + RESPAWN_BELOW {
                flake.pos.y = -10.0 - ctx.sampler.unit() * 50.0;
                flake.pos.x = ctx.sampler.range(-EDGE_MARGIN, width + EDGE_MARGIN);
            }
            if flake.pos.x < -EDGE_MARGIN {
                flake.pos.x = width + EDGE_MARGIN;
            } else if flake.pos.x > width + EDGE_MARGIN {
                flake.pos.x = -EDGE_MARGIN;
            }
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.clear();

        for flake in self.flakes.iter() {
            let halo = flake.size * 2.0;
            let shadow = Gradient::new([
                (0.0, HALO_COLOR.with_alpha(HALO_COLOR.a * flake.opacity)),
                (1.0, HALO_COLOR.with_alpha(0.0)),
            ]);
            surface.fill_circle(
                flake.pos,
                halo,
                &Paint::radial(flake.pos, halo, shadow),
                Blend::SourceOver,
            );

            let body = self.color.with_alpha(self.color.a * flake.opacity);
            surface.fill_circle(flake.pos, flake.size, &Paint::solid(body), Blend::SourceOver);

            // Highlight offset up-left in the flake's rotated frame.
            let (sin, cos) = flake.rotation.sin_cos();
            let (dx, dy) = (-flake.size * 0.2, -flake.size * 0.2);
            let center = Point::new(
                flake.pos.x + dx * cos - dy * sin,
                flake.pos.y + dx * sin + dy * cos,
            );
            let highlight = Rgb::WHITE.with_alpha(flake.opacity * 0.5);
            surface.fill_circle(
                center,
                flake.size * 0.4,
                &Paint::solid(highlight),
                Blend::SourceOver,
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.flakes.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use backdrop_core::FrameTime;

    use super::*;
    use crate::interaction::InteractionTracker;

    fn run(snow: &mut Snow, bounds: Size, frames: u64, sampler: &mut Sampler) {
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
            snow.step(&mut ctx);
        }
    }

    #[test]
    fn test_layer_split() {
        let layers: Vec<usize> = (0..20).map(|i| layer_for(i, 20)).collect();
        assert_eq!(layers.iter().filter(|&&l| l == 0).count(), 8);
        assert_eq!(layers.iter().filter(|&&l| l == 1).count(), 7);
        assert_eq!(layers.iter().filter(|&&l| l == 2).count(), 5);
    }

    #[test]
    fn test_build_sorted_by_layer_then_size() {
        let options = SnowOptions {
            intensity: 0.5,
            ..SnowOptions::default()
        };
        let mut snow = Snow::new(&options);
        snow.build(Size::new(800.0, 600.0), &mut Sampler::seeded(4));

        assert_eq!(snow.entity_count(), 75);
        assert!(snow.flakes().windows(2).all(|w| {
            (w[0].layer, w[0].size) <= (w[1].layer, w[1].size)
        }));
        for flake in snow.flakes() {
            let layer = LAYERS[flake.layer];
            assert!(flake.size >= layer.min_size && flake.size < layer.max_size);
            assert!(flake.pos.x >= -EDGE_MARGIN && flake.pos.x <= 850.0);
        }
    }

    #[test]
    fn test_flakes_fall_and_respawn() {
        let mut snow = Snow::default();
        let mut sampler = Sampler::seeded(8);
        let bounds = Size::new(400.0, 200.0);
        snow.build(bounds, &mut sampler);
        let before: f32 = snow.flakes().iter().map(|f| f.pos.y).sum();

        run(&mut snow, bounds, 1, &mut sampler);
        let after: f32 = snow.flakes().iter().map(|f| f.pos.y).sum();
        assert!(after > before);

        run(&mut snow, bounds, 600, &mut sampler);
        for flake in snow.flakes() {
            assert!(flake.pos.y <= bounds.height + RESPAWN_BELOW + 10.0);
            assert!(flake.pos.x >= -EDGE_MARGIN && flake.pos.x <= bounds.width + EDGE_MARGIN);
        }
    }

    #[test]
    fn test_strong_wind_wraps() {
        let options = SnowOptions {
            wind: -40.0,
            ..SnowOptions::default()
        };
        let mut snow = Snow::new(&options);
        let mut sampler = Sampler::seeded(3);
        let bounds = Size::new(300.0, 300.0);
        snow.build(bounds, &mut sampler);
        run(&mut snow, bounds, 30, &mut sampler);
        for flake in snow.flakes() {
            assert!(flake.pos.x >= -EDGE_MARGIN && flake.pos.x <= bounds.width + EDGE_MARGIN);
        }
    }

    #[test]
    fn test_render_draws_flakes() {
        let mut snow = Snow::default();
        let bounds = Size::new(200.0, 200.0);
        snow.build(bounds, &mut Sampler::seeded(1));
        let mut surface = Surface::acquire(bounds, 1.0).unwrap();
        snow.render(&mut surface);
        assert!(surface.pixels().iter().any(|p| p.a > 0.0));
    }
}

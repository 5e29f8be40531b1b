//! Light waves: layered translucent sine bands over a dark gradient.

use backdrop_core::{LightWavesOptions, Point, Rect, Rgb, Rgba, Size, parse_hex};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::{Gradient, Paint};
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[Listen::WINDOW_RESIZE];

/// Horizontal distance between curve samples.
const SAMPLE_STEP: f32 = 5.0;

const BACKGROUND: [(f32, Rgb); 3] = [
    (0.0, Rgb::new(0x03, 0x07, 0x12)),
    (0.5, Rgb::new(0x0a, 0x0f, 0x1a)),
    (1.0, Rgb::new(0x03, 0x07, 0x12)),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    /// Resting height of the crest line.
    pub y: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Signed; alternating waves travel in opposite directions.
    pub speed: f32,
    pub phase: f32,
    pub color: Rgb,
    pub opacity: f32,
}

impl Wave {
    /// Crest height at `x` for animation time `time`.
    pub fn height_at(&self, x: f32, time: f32) -> f32 {
        let primary = (x * self.frequency + time * self.speed + self.phase).sin() * self.amplitude;
        let secondary = (x * self.frequency * 0.5 + time * self.speed * 0.7 + self.phase * 1.3)
            .sin()
            * self.amplitude
            * 0.5;
        self.y + primary + secondary
    }
}

#[derive(Debug, Clone)]
pub struct LightWaves {
    options: LightWavesOptions,
    palette: Vec<Rgb>,
    waves: EntityBatch<Wave>,
    bounds: Size,
    /// Scaled animation time in seconds.
    time: f32,
}

impl LightWaves {
    pub fn new(options: &LightWavesOptions) -> Self {
        let mut palette: Vec<Rgb> = options
            .colors
            .iter()
            .map(|c| {
                parse_hex(c).unwrap_or_else(|| {
                    tracing::warn!(color = %c, "expected #rrggbb, using white");
                    Rgb::WHITE
                })
            })
            .collect();
        if palette.is_empty() {
            palette = LightWavesOptions::default()
                .colors
                .iter()
                .filter_map(|c| parse_hex(c))
                .collect();
        }

        Self {
            options: options.clone(),
            palette,
            waves: EntityBatch::new(),
            bounds: Size::default(),
            time: 0.0,
        }
    }

    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    fn color(&self, i: usize) -> Rgb {
        self.palette
            .get(i % self.palette.len().max(1))
            .copied()
            .unwrap_or(Rgb::WHITE)
    }

    fn draw_glow_spots(&self, surface: &mut Surface) {
        let Size { width, height } = self.bounds;
        let min = self.bounds.min_side();
        let drift = Point::new((self.time * 0.3).sin() * 50.0, (self.time * 0.2).cos() * 30.0);
        let spots = [
            (Point::new(width * 0.2, height * 0.3), min * 0.4, self.color(0)),
            (Point::new(width * 0.8, height * 0.6), min * 0.35, self.color(1)),
            (Point::new(width * 0.5, height * 0.8), min * 0.3, self.color(2)),
        ];

        let intensity = self.options.intensity;
        for (center, radius, color) in spots {
            let center = Point::new(center.x + drift.x, center.y + drift.y);
            let gradient = Gradient::new([
                (0.0, color.with_alpha(0.08 * intensity)),
                (0.5, color.with_alpha(0.03 * intensity)),
                (1.0, Rgba::TRANSPARENT),
            ]);
            surface.fill_rect(
                Rect::new(0.0, 0.0, width, height),
                &Paint::radial(center, radius, gradient),
                Blend::Lighter,
            );
        }
    }

    fn draw_wave(&self, wave: &Wave, surface: &mut Surface) {
        let width = self.bounds.width;
        let samples = (width / SAMPLE_STEP).floor() as usize + 1;
        let curve: Vec<Point> = (0..samples)
            .map(|i| {
                let x = i as f32 * SAMPLE_STEP;
                Point::new(x, wave.height_at(x, self.time))
            })
            .collect();

        let alpha = wave.opacity * self.options.intensity;
        let paint = Paint::Linear {
            from: wave.y - wave.amplitude,
            to: self.bounds.height,
            gradient: Gradient::new([
                (0.0, wave.color.with_alpha(alpha)),
                (0.3, wave.color.with_alpha(alpha * 0.5)),
                (1.0, Rgba::TRANSPARENT),
            ]),
        };
        surface.fill_below(&curve, &paint, Blend::Lighter);
    }
}

impl Default for LightWaves {
    fn default() -> Self {
        Self::new(&LightWavesOptions::default())
    }
}

impl Effect for LightWaves {
    fn name(&self) -> &'static str {
        "light_waves"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rebuild
    }

    fn build(&mut self, bounds: Size, sampler: &mut Sampler) {
        self.bounds = bounds;
        let n = self.options.wave_count;
        let h = bounds.height;

        let waves: Vec<Wave> = (0..n)
            .map(|i| {
                let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
                Wave {
                    y: h * (0.3 + i as f32 / n as f32 * 0.5),
                    amplitude: h * sampler.range(0.15, 0.3),
                    frequency: sampler.range(0.002, 0.004),
                    speed: sampler.range(0.2, 0.5) * direction,
                    phase: sampler.angle(),
                    color: self.color(i),
                    opacity: sampler.range(0.15, 0.25),
                }
            })
            .collect();
        self.waves.rebuild(waves);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        self.time = ctx.time.seconds(self.options.timing) * self.options.speed;
    }

    fn render(&self, surface: &mut Surface) {
        let Size { width, height } = self.bounds;
        let full = Rect::new(0.0, 0.0, width, height);

        surface.clear();
        let background = Paint::Linear {
            from: 0.0,
            to: height,
            gradient: Gradient::new(BACKGROUND.map(|(t, c)| (t, c.with_alpha(1.0)))),
        };
        surface.fill_rect(full, &background, Blend::SourceOver);

        self.draw_glow_spots(surface);
        for wave in self.waves.iter() {
            self.draw_wave(wave, surface);
        }

        let top = self.color(0);
        let glow = Paint::Linear {
            from: 0.0,
            to: height * 0.4,
            gradient: Gradient::new([
                (0.0, top.with_alpha(0.05 * self.options.intensity)),
                (1.0, Rgba::TRANSPARENT),
            ]),
        };
        surface.fill_rect(Rect::new(0.0, 0.0, width, height * 0.4), &glow, Blend::SourceOver);
    }

    fn entity_count(&self) -> usize {
        self.waves.len()
    }
}

//! Wave grid: a perspective wireframe of rolling waves, drawn back to front.

use backdrop_core::{Point, Rect, Rgb, Size, WaveGridOptions, parse_hex};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::Paint;
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[Listen::REGION_RESIZE];

const PERSPECTIVE: f32 = 180.0;
const CAMERA_Y: f32 = 30.0;
const CAMERA_Z: f32 = -40.0;
/// Screen height of the camera line, as a fraction of the region height.
const HORIZON: f32 = 0.68;
/// Columns added beyond the region width so the receding rows still reach the edges.
const EXTRA_COLS: usize = 6;
/// Wave phase advanced per nominal tick at unit speed.
const PHASE_PER_TICK: f32 = 0.02;

/// One grid vertex in world space and where it lands on screen this frame.
#[derive(Debug, Clone, PartialEq)]
struct Node {
    x: f32,
    z: f32,
    height: f32,
    screen: Point,
}

/// Wave height at world `(x, z)` for phase `t`: three sines, peaking at `1.6 * amplitude`.
fn wave_height(x: f32, z: f32, t: f32, amplitude: f32) -> f32 {
    (x * 0.05 + t).sin() * (z * 0.04 + t * 0.8).cos() * amplitude
        + (x * 0.03 - t * 0.5 + z * 0.04).sin() * amplitude * 0.4
        + ((x + z) * 0.03 + t * 1.2).sin() * amplitude * 0.2
}

/// Project a world point onto a region of `bounds`, centered horizontally.
fn project(x: f32, y: f32, z: f32, bounds: Size) -> Point {
    let scale = PERSPECTIVE / (PERSPECTIVE + z - CAMERA_Z);
    Point::new(
        bounds.width / 2.0 + x * scale,
        bounds.height * HORIZON + (y - CAMERA_Y) * scale,
    )
}

fn hex_or(s: &str, fallback: Rgb) -> Rgb {
    parse_hex(s).unwrap_or_else(|| {
        tracing::warn!(color = s, "expected #rrggbb, using fallback");
        fallback
    })
}

#[derive(Debug, Clone)]
pub struct WaveGrid {
    options: WaveGridOptions,
    color: Rgb,
    background: Rgb,
    nodes: EntityBatch<Node>,
    rows: usize,
    per_row: usize,
    bounds: Size,
    phase: f32,
}

impl WaveGrid {
    pub fn new(options: &WaveGridOptions) -> Self {
        let defaults = WaveGridOptions::default();
        Self {
            options: options.clone(),
            color: hex_or(&options.color, parse_hex(&defaults.color).unwrap_or(Rgb::WHITE)),
            background: hex_or(&options.background, Rgb::BLACK),
            nodes: EntityBatch::new(),
            rows: 0,
            per_row: 0,
            bounds: Size::default(),
            phase: 0.0,
        }
    }

    fn row(&self, row: usize) -> &[Node] {
        let start = row * self.per_row;
        self.nodes.get(start..start + self.per_row).unwrap_or(&[])
    }

    /// Nearer rows are brighter and thicker.
    fn nearness(&self, row: usize) -> f32 {
        1.0 - row as f32 / self.rows.max(1) as f32
    }
}

impl Default for WaveGrid {
    fn default() -> Self {
        Self::new(&WaveGridOptions::default())
    }
}

impl Effect for WaveGrid {
    fn name(&self) -> &'static str {
        "wave_grid"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rebuild
    }

    fn build(&mut self, bounds: Size, _sampler: &mut Sampler) {
        let grid = self.options.grid_size.max(1.0);
        let cols = (bounds.width / grid).ceil().max(0.0) as usize + EXTRA_COLS;
        let start_x = -(cols as f32) * grid / 2.0;

        self.bounds = bounds;
        self.rows = self.options.rows.max(1);
        self.per_row = cols + 1;

        let per_row = self.per_row;
        let nodes = (0..self.rows).flat_map(|row| {
            (0..per_row).map(move |col| {
                let (x, z) = (start_x + col as f32 * grid, row as f32 * grid);
                Node {
                    x,
                    z,
                    height: 0.0,
                    screen: project(x, 0.0, z, bounds),
                }
            })
        });
        self.nodes.rebuild(nodes);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        self.bounds = ctx.bounds;
        self.phase =
            ctx.time.clock(self.options.timing) * PHASE_PER_TICK * self.options.wave_speed;

        let (t, amplitude, bounds) = (self.phase, self.options.wave_height, self.bounds);
        for node in self.nodes.iter_mut() {
            node.height = wave_height(node.x, node.z, t, amplitude);
            node.screen = project(node.x, node.height, node.z, bounds);
        }
    }

    fn render(&self, surface: &mut Surface) {
        let Size { width, height } = self.bounds;
        surface.clear();
        surface.fill_rect(
            Rect::new(0.0, 0.0, width, height),
            &Paint::solid(self.background.with_alpha(1.0)),
            Blend::SourceOver,
        );

        for row in (0..self.rows).rev() {
            let near = self.nearness(row);

            let line = self.color.with_alpha(0.15 + near * 0.5);
            let line_width = (near * 1.1).max(0.4);
            for pair in self.row(row).windows(2) {
                surface.stroke_line(pair[0].screen, pair[1].screen, line_width, line);
            }

            if row + 1 < self.rows {
                let rung = self.color.with_alpha(0.12 + near * 0.45);
                let rung_width = (near * 0.9).max(0.35);
                for (a, b) in self.row(row).iter().zip(self.row(row + 1)) {
                    surface.stroke_line(a.screen, b.screen, rung_width, rung);
                }
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use backdrop_core::FrameTime;

    use super::*;
    use crate::interaction::InteractionTracker;

    fn step_to(grid: &mut WaveGrid, bounds: Size, tick: u64) {
        let tracker = InteractionTracker::new();
        let mut sampler = Sampler::seeded(0);
        let mut ctx = StepContext {
            bounds,
            pointer: &tracker,
            time: FrameTime {
                tick,
                elapsed: Duration::from_millis(tick * 16),
                delta: Duration::from_millis(16),
            },
            now: Duration::from_millis(tick * 16),
            sampler: &mut sampler,
        };
        grid.step(&mut ctx);
    }

    #[test]
    fn test_grid_is_centered_and_padded() {
        let mut grid = WaveGrid::default();
        grid.build(Size::new(280.0, 80.0), &mut Sampler::seeded(0));

        assert_eq!((grid.rows, grid.per_row), (8, 27));
        assert_eq!(grid.entity_count(), 8 * 27);
        let first = &grid.nodes[0];
        let last = &grid.nodes[26];
        assert_eq!(first.x, -182.0);
        assert_eq!(last.x, 182.0);
        assert_eq!(grid.nodes[27].z, 14.0);
    }

    #[test]
    fn test_projection() {
        let bounds = Size::new(200.0, 100.0);
        assert_eq!(project(0.0, CAMERA_Y, CAMERA_Z, bounds), Point::new(100.0, 68.0));

        // Farther rows shrink toward the center.
        let near = project(50.0, 0.0, 0.0, bounds);
        let far = project(50.0, 0.0, 98.0, bounds);
        assert!(near.x > far.x && far.x > 100.0);
        assert!(near.y < far.y && far.y < 68.0);
    }

    #[test]
    fn test_wave_height_bounded() {
        for x in (-200..200).step_by(7) {
            for z in (0..112).step_by(14) {
                let h = wave_height(x as f32, z as f32, 3.7, 8.0);
                assert!(h.abs() <= 8.0 * 1.6 + 1e-4);
            }
        }
    }

    #[test]
    fn test_phase_advances_per_tick() {
        let mut grid = WaveGrid::default();
        let bounds = Size::new(280.0, 80.0);
        grid.build(bounds, &mut Sampler::seeded(0));
        step_to(&mut grid, bounds, 50);

        assert!((grid.phase - 50.0 * 0.02 * 0.9).abs() < 1e-4);
        let node = &grid.nodes[30];
        assert_eq!(node.height, wave_height(node.x, node.z, grid.phase, 8.0));
        assert_eq!(node.screen, project(node.x, node.height, node.z, bounds));
    }

    #[test]
    fn test_rebuild_follows_width() {
        let mut grid = WaveGrid::default();
        grid.build(Size::new(280.0, 80.0), &mut Sampler::seeded(0));
        grid.build(Size::new(560.0, 80.0), &mut Sampler::seeded(0));
        assert_eq!((grid.rows, grid.per_row), (8, 47));
    }

    #[test]
    fn test_render_draws_lines_over_opaque_fill() {
        let mut grid = WaveGrid::default();
        let bounds = Size::new(280.0, 80.0);
        grid.build(bounds, &mut Sampler::seeded(0));
        step_to(&mut grid, bounds, 10);

        let mut surface = Surface::acquire(bounds, 1.0).unwrap();
        grid.render(&mut surface);
        assert!(surface.pixels().iter().all(|p| p.a > 0.99));
        assert!(surface.pixels().iter().any(|p| p.b > 0.3));
    }

    #[test]
    fn test_bad_colors_fall_back() {
        let options = WaveGridOptions {
            color: "cyan".into(),
            background: "".into(),
            ..WaveGridOptions::default()
        };
        let grid = WaveGrid::new(&options);
        assert_eq!(grid.color, Rgb::new(6, 182, 212));
        assert_eq!(grid.background, Rgb::BLACK);
    }
}

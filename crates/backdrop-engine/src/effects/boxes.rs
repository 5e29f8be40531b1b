//! Boxes: a grid whose cells flash a random color under the pointer and fade out.

use backdrop_core::{BoxesOptions, FrameTime, Point, Rect, Rgba, Size, smoothstep};

use crate::color::Blend;
use crate::effect::{Effect, Listen, StepContext};
use crate::gradient::Paint;
use crate::host::ListenerKind;
use crate::store::{EntityBatch, ResizePolicy, Sampler};
use crate::surface::Surface;

const LISTENS: &[Listen] = &[
    Listen::WINDOW_RESIZE,
    Listen::section(ListenerKind::PointerMove),
];

const LINE_COLOR: Rgba = Rgba {
    r: 51,
    g: 65,
    b: 85,
    a: 0.6,
};
const PLUS_COLOR: Rgba = Rgba {
    r: 71,
    g: 85,
    b: 105,
    a: 0.9,
};
const LINE_WIDTH: f32 = 1.0;
/// Half the length of a plus arm.
const PLUS_ARM: f32 = 6.0;

/// Where a cell's flash came from and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flash {
    pub color: Rgba,
    /// Animation time in seconds.
    pub lit_at: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub flash: Option<Flash>,
    /// Remaining flash strength for the current frame, 0.0-1.0.
    pub strength: f32,
}

#[derive(Debug, Clone)]
pub struct Boxes {
    options: BoxesOptions,
    palette: Vec<Rgba>,
    cells: EntityBatch<Cell>,
    rows: usize,
    cols: usize,
}

impl Boxes {
    pub fn new(options: &BoxesOptions) -> Self {
        let mut palette: Vec<Rgba> = options
            .colors
            .iter()
            .filter_map(|c| {
                let parsed = Rgba::parse(c);
                if parsed.is_none() {
                    tracing::warn!(color = %c, "unrecognised box color, skipping");
                }
                parsed
            })
            .collect();
        if palette.is_empty() {
            palette = BoxesOptions::default()
                .colors
                .iter()
                .filter_map(|c| Rgba::parse(c))
                .collect();
        }

        Self {
            options: options.clone(),
            palette,
            cells: EntityBatch::new(),
            rows: 0,
            cols: 0,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Grid dimensions as `(rows, cols)`.
    pub fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn cell_size(&self) -> Size {
        Size::new(
            self.options.cell_width.max(1.0),
            self.options.cell_height.max(1.0),
        )
    }

    /// Index of the cell under a region-local point.
    fn cell_at(&self, point: Point) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let size = self.cell_size();
        let col = (point.x / size.width) as usize;
        let row = (point.y / size.height) as usize;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    fn fade_secs(&self) -> f32 {
        self.options.fade_ms as f32 / 1000.0
    }

    fn cell_rect(&self, cell: &Cell) -> Rect {
        let size = self.cell_size();
        Rect::new(
            cell.col as f32 * size.width,
            cell.row as f32 * size.height,
            size.width,
            size.height,
        )
    }

    fn draw_plus(surface: &mut Surface, at: Point) {
        let paint = Paint::solid(PLUS_COLOR);
        let half = LINE_WIDTH / 2.0;
        surface.fill_rect(
            Rect::new(at.x - PLUS_ARM, at.y - half, PLUS_ARM * 2.0, LINE_WIDTH),
            &paint,
            Blend::SourceOver,
        );
        surface.fill_rect(
            Rect::new(at.x - half, at.y - PLUS_ARM, LINE_WIDTH, PLUS_ARM * 2.0),
            &paint,
            Blend::SourceOver,
        );
    }
}

impl Default for Boxes {
    fn default() -> Self {
        Self::new(&BoxesOptions::default())
    }
}

impl Effect for Boxes {
    fn name(&self) -> &'static str {
        "boxes"
    }

    fn listens(&self) -> &'static [Listen] {
        LISTENS
    }

    fn resize_policy(&self) -> ResizePolicy {
        ResizePolicy::Rebuild
    }

    fn build(&mut self, bounds: Size, _sampler: &mut Sampler) {
        let size = self.cell_size();
        let fit = |extent: f32, cell: f32| (extent / cell).ceil().max(0.0) as usize;
        self.cols = fit(bounds.width, size.width).min(self.options.max_cols);
        self.rows = fit(bounds.height, size.height).min(self.options.max_rows);

        let cols = self.cols;
        let cells = (0..self.rows).flat_map(|row| {
            (0..cols).map(move |col| Cell {
                row,
                col,
                flash: None,
                strength: 0.0,
            })
        });
        self.cells.rebuild(cells);
    }

    fn on_pointer(&mut self, point: Point, time: FrameTime, sampler: &mut Sampler) {
        let Some(index) = self.cell_at(point) else {
            return;
        };
        let Some(&color) = sampler.pick(&self.palette) else {
            return;
        };
        let lit_at = time.seconds(self.options.timing);
        let cell = &mut self.cells[index];
        cell.flash = Some(Flash { color, lit_at });
        cell.strength = 1.0;
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) {
        let now = ctx.time.seconds(self.options.timing);
        let fade = self.fade_secs();

        for cell in self.cells.iter_mut() {
            let Some(flash) = cell.flash else {
                continue;
            };
            let progress = if fade <= 0.0 {
                1.0
            } else {
                (now - flash.lit_at) / fade
            };
            if progress >= 1.0 {
                cell.flash = None;
                cell.strength = 0.0;
            } else {
                cell.strength = 1.0 - smoothstep(progress.max(0.0));
            }
        }
    }

    fn render(&self, surface: &mut Surface) {
        surface.clear();

        for cell in self.cells.iter() {
            if let Some(flash) = cell.flash {
                let color = flash.color.with_alpha(flash.color.a * cell.strength);
                surface.fill_rect(self.cell_rect(cell), &Paint::solid(color), Blend::SourceOver);
            }
        }

        let size = self.cell_size();
        let width = self.cols as f32 * size.width;
        let height = self.rows as f32 * size.height;
        let line = Paint::solid(LINE_COLOR);
        for col in 1..self.cols {
            let x = col as f32 * size.width;
            surface.fill_rect(
                Rect::new(x - LINE_WIDTH / 2.0, 0.0, LINE_WIDTH, height),
                &line,
                Blend::SourceOver,
            );
        }
        for row in 1..self.rows {
            let y = row as f32 * size.height;
            surface.fill_rect(
                Rect::new(0.0, y - LINE_WIDTH / 2.0, width, LINE_WIDTH),
                &line,
                Blend::SourceOver,
            );
        }

        for cell in self.cells.iter().filter(|c| c.row % 2 == 0 && c.col % 2 == 0) {
            Self::draw_plus(surface, self.cell_rect(cell).origin);
        }
    }

    fn entity_count(&self) -> usize {
        self.cells.len()
    }

    /// Remaining flash strength per cell.
    fn glow(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.strength).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::interaction::InteractionTracker;

    fn at_ms(ms: u64) -> FrameTime {
        FrameTime {
            tick: ms / 16,
            elapsed: Duration::from_millis(ms),
            delta: Duration::from_millis(16),
        }
    }

    fn step_at(boxes: &mut Boxes, ms: u64) {
        let tracker = InteractionTracker::new();
        let mut sampler = Sampler::seeded(0);
        let mut ctx = StepContext {
            bounds: Size::new(640.0, 320.0),
            pointer: &tracker,
            time: at_ms(ms),
            now: Duration::from_millis(ms),
            sampler: &mut sampler,
        };
        boxes.step(&mut ctx);
    }

    #[test]
    fn test_grid_dimensions() {
        let mut boxes = Boxes::default();
        boxes.build(Size::new(650.0, 320.0), &mut Sampler::seeded(0));
        assert_eq!(boxes.grid(), (10, 11));
        assert_eq!(boxes.entity_count(), 110);
    }

    #[test]
    fn test_grid_capped() {
        let options = BoxesOptions {
            max_rows: 3,
            max_cols: 4,
            ..BoxesOptions::default()
        };
        let mut boxes = Boxes::new(&options);
        boxes.build(Size::new(2000.0, 2000.0), &mut Sampler::seeded(0));
        assert_eq!(boxes.grid(), (3, 4));
    }

    #[test]
    fn test_pointer_lights_cell_under_it() {
        let mut boxes = Boxes::default();
        boxes.build(Size::new(640.0, 320.0), &mut Sampler::seeded(0));
        boxes.on_pointer(Point::new(130.0, 40.0), at_ms(0), &mut Sampler::seeded(3));

        let lit: Vec<&Cell> = boxes.cells().iter().filter(|c| c.flash.is_some()).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!((lit[0].row, lit[0].col), (1, 2));
        let color = lit[0].flash.map(|f| f.color).unwrap();
        assert!(boxes.palette.contains(&color));
    }

    #[test]
    fn test_pointer_outside_grid_is_ignored() {
        let mut boxes = Boxes::default();
        boxes.build(Size::new(640.0, 320.0), &mut Sampler::seeded(0));
        boxes.on_pointer(Point::FAR_AWAY, at_ms(0), &mut Sampler::seeded(3));
        boxes.on_pointer(Point::new(700.0, 10.0), at_ms(0), &mut Sampler::seeded(3));
        assert!(boxes.cells().iter().all(|c| c.flash.is_none()));
    }

    #[test]
    fn test_flash_fades_over_duration() {
        let mut boxes = Boxes::default();
        boxes.build(Size::new(640.0, 320.0), &mut Sampler::seeded(0));
        boxes.on_pointer(Point::new(10.0, 10.0), at_ms(1000), &mut Sampler::seeded(3));

        step_at(&mut boxes, 1500);
        let early = boxes.cells()[0].strength;
        step_at(&mut boxes, 2500);
        let late = boxes.cells()[0].strength;
        assert!(early > late && late > 0.0);

        step_at(&mut boxes, 3000);
        assert!(boxes.cells()[0].flash.is_none());
        assert_eq!(boxes.cells()[0].strength, 0.0);
    }

    #[test]
    fn test_render_draws_lines_and_flash() {
        let mut boxes = Boxes::default();
        let bounds = Size::new(256.0, 128.0);
        boxes.build(bounds, &mut Sampler::seeded(0));
        boxes.on_pointer(Point::new(100.0, 50.0), at_ms(0), &mut Sampler::seeded(1));
        let mut surface = Surface::acquire(bounds, 1.0).unwrap();
        boxes.render(&mut surface);

        assert!(surface.pixel_at(Point::new(64.2, 100.0)).unwrap().a > 0.0);
        assert!(surface.pixel_at(Point::new(90.0, 50.0)).unwrap().a > 0.5);
    }
}

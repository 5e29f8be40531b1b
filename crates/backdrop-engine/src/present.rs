//! Presenting a surface in the terminal with half-block characters.
//!
//! Each terminal cell covers [`CELL_WIDTH`] x [`CELL_HEIGHT`] logical pixels and shows two
//! stacked colors: the top half as the foreground of `▀`, the bottom half as its background.

use backdrop_core::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::Rect as Area,
    style::{Color, Style},
    widgets::Widget,
};

use crate::color::{Blend, Pixel, average, to_terminal};
use crate::surface::Surface;

/// Logical width of one terminal cell.
pub const CELL_WIDTH: f32 = 8.0;
/// Logical height of one terminal cell.
pub const CELL_HEIGHT: f32 = 16.0;

const UPPER_HALF: char = '▀';

/// Surfaces stacked bottom to top and flattened onto an opaque backdrop color.
#[derive(Debug, Clone)]
pub struct SurfaceView<'a> {
    layers: Vec<&'a Surface>,
    backdrop: Rgb,
}

impl<'a> SurfaceView<'a> {
    pub fn new(backdrop: Rgb) -> Self {
        Self {
            layers: Vec::new(),
            backdrop,
        }
    }

    /// Stack `surface` above the layers added so far.
    pub fn layer(mut self, surface: &'a Surface) -> Self {
        self.layers.push(surface);
        self
    }

    /// Color of the half cell spanning logical rows `[y0, y1)` in column `col`.
    fn sample(&self, col: u16, y0: f32, y1: f32) -> Color {
        let x0 = col as f32 * CELL_WIDTH;
        let pixel = self
            .layers
            .iter()
            .map(|surface| covered(surface, x0, x0 + CELL_WIDTH, y0, y1))
            .fold(Pixel::CLEAR, |below, above| {
                above.composite(below, Blend::SourceOver)
            });
        to_terminal(pixel.over_rgb(self.backdrop))
    }
}

/// Average of the physical pixels under a logical box.
fn covered(surface: &Surface, x0: f32, x1: f32, y0: f32, y1: f32) -> Pixel {
    let dpr = surface.dpr();
    let physical = surface.physical();
    let span = |lo: f32, hi: f32, limit: u32| {
        let start = ((lo * dpr).floor().max(0.0) as u32).min(limit);
        let end = ((hi * dpr).ceil() as u32).max(start + 1).min(limit);
        start..end
    };
    let xs = span(x0, x1, physical.width);
    let ys = span(y0, y1, physical.height);
    average(ys.flat_map(|y| xs.clone().filter_map(move |x| surface.pixel(x, y))))
}

impl Widget for SurfaceView<'_> {
    fn render(self, area: Area, buf: &mut Buffer) {
        let half = CELL_HEIGHT / 2.0;
        for row in 0..area.height {
            let top = row as f32 * CELL_HEIGHT;
            for col in 0..area.width {
                let fg = self.sample(col, top, top + half);
                let bg = self.sample(col, top + half, top + CELL_HEIGHT);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(UPPER_HALF)
                        .set_style(Style::new().fg(fg).bg(bg));
                }
            }
        }
    }
}

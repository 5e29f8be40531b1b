//! Mapping the configured sections onto terminal cells and logical pixels.

use backdrop_config::SectionConfig;
use backdrop_core::{Point, Rect as LogicalRect};
use backdrop_engine::{CELL_HEIGHT, CELL_WIDTH, PageLayout, RegionBox, SectionBox};
use ratatui::layout::{Constraint, Layout, Rect};

/// A section and the terminal cells it occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSection {
    pub config: SectionConfig,
    pub area: Rect,
}

/// Split `area` into stacked sections sized by weight.
pub fn place(sections: &[SectionConfig], area: Rect) -> Vec<PlacedSection> {
    let constraints = sections.iter().map(|s| Constraint::Fill(s.weight.max(1)));
    let areas = Layout::vertical(constraints).split(area);
    sections
        .iter()
        .zip(areas.iter())
        .map(|(config, &area)| PlacedSection {
            config: config.clone(),
            area,
        })
        .collect()
}

/// Logical pixel box covered by a block of cells.
pub fn to_logical(area: Rect) -> LogicalRect {
    LogicalRect::new(
        area.x as f32 * CELL_WIDTH,
        area.y as f32 * CELL_HEIGHT,
        area.width as f32 * CELL_WIDTH,
        area.height as f32 * CELL_HEIGHT,
    )
}

/// Logical position of the center of the cell at `(column, row)`.
pub fn cell_center(column: u16, row: u16) -> Point {
    Point::new(
        (column as f32 + 0.5) * CELL_WIDTH,
        (row as f32 + 0.5) * CELL_HEIGHT,
    )
}

/// Host layout for placed sections: each section holds one full-size `<id>-bg` region.
pub fn layout(placed: &[PlacedSection]) -> PageLayout {
    let mut page = PageLayout::default();
    for section in placed {
        let rect = to_logical(section.area);
        page.sections.push(SectionBox {
            id: section.config.id.clone(),
            rect,
        });
        page.regions.push(RegionBox {
            id: section.config.region_id(),
            section: section.config.id.clone(),
            rect,
        });
    }
    page
}

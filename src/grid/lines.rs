//! Grid lines drawn on the base canvas of a frame.

use image::{ImageBuffer, Rgba};

use crate::colour::parse::Colour;
use crate::foundation::core::Point;
use crate::grid::context::FrameContext;
use crate::render::canvas::{Canvas, Rgba16Image};

/// Draw `lineColor` along the top and left edge of every grid cell.
///
/// Each line starts on the cell edge and runs `lineWidth` pixels into the
/// cell. Fractional widths give partially covered pixels, whose alpha is
/// scaled by the covered fraction. Nothing is drawn for a non-positive width
/// or an unset colour.
pub fn draw_grid_lines(canvas: &mut Canvas, ctx: &FrameContext) {
    let width = ctx.config.line_width;
    if !(width.is_finite() && width > 0.0) || ctx.config.line_color.trim().is_empty() {
        return;
    }
    let colour = ctx.config.line_colour();
    if colour.is_transparent() {
        return;
    }

    let (w, h) = canvas.dimensions();
    let grid = ctx.grid();
    let (cw, ch) = ctx.cell_size();
    let columns = coverage(w, cw, grid.cols, width);
    let rows = coverage(h, ch, grid.rows, width);
    let overlay = line_overlay(colour, &columns, &rows);
    tracing::debug!(line_width = width, cells_x = grid.cols, cells_y = grid.rows, "grid lines drawn");
    canvas.draw_over(&Canvas::Nrgba64(overlay), Point::ZERO);
}

/// Fraction of each pixel along one axis covered by a line.
fn coverage(len: u32, cell: u32, cells: u32, width: f64) -> Vec<f64> {
    let mut cover = vec![0.0f64; len as usize];
    for edge in (0..cells).map(|c| f64::from(c * cell)) {
        let end = (edge + width).min(f64::from(len));
        let mut px = edge;
        while px < end {
            let i = px as usize;
            let covered = (end.min(px + 1.0) - px).clamp(0.0, 1.0);
            cover[i] = (cover[i] + covered).min(1.0);
            px += 1.0;
        }
    }
    cover
}

fn line_overlay(colour: Colour, columns: &[f64], rows: &[f64]) -> Rgba16Image {
    let [r, g, b, a] = colour.to_rgba16();
    ImageBuffer::from_fn(columns.len() as u32, rows.len() as u32, |x, y| {
        let cover = columns[x as usize].max(rows[y as usize]);
        let alpha = (f64::from(a) * cover).round() as u16;
        Rgba([r, g, b, alpha])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/grid/lines.rs"]
mod tests;

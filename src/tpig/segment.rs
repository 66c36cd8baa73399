use std::collections::HashSet;

use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{CardError, CardResult};
use crate::grid::context::FrameContext;
use crate::grid::locate::locate;
use crate::tpig::flatmap::SegmentMap;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Named rectangular region of the canvas.
pub struct Segment {
    pub name: String,
    pub shape: PixelRect,
    pub tags: Vec<String>,
    /// Declaration or creation order; compositing order.
    pub import_position: usize,
}

impl Segment {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Cut a `size` canvas into `cell_w` x `cell_h` cells, row-major.
///
/// Cells are named `A000`, `A001`, ... in creation order. Cells on the right
/// and bottom edges are clipped so the cells tile the canvas exactly.
pub fn splice(cell_w: u32, cell_h: u32, size: (u32, u32)) -> CardResult<Vec<Segment>> {
    let (width, height) = size;
    if cell_w == 0 || cell_h == 0 {
        return Err(CardError::Splice(format!(
            "cell size {cell_w}x{cell_h} is empty"
        )));
    }
    if width == 0 || height == 0 {
        return Err(CardError::Splice(format!(
            "canvas size {width}x{height} is empty"
        )));
    }

    let cols = width.div_ceil(cell_w);
    let rows = height.div_ceil(cell_h);
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);
    for row in 0..rows {
        for col in 0..cols {
            let min = Point::new(col * cell_w, row * cell_h);
            let max = Point::new(
                min.x.saturating_add(cell_w).min(width),
                min.y.saturating_add(cell_h).min(height),
            );
            let import_position = cells.len();
            cells.push(Segment {
                name: format!("A{import_position:03}"),
                shape: PixelRect { min, max },
                tags: Vec::new(),
                import_position,
            });
        }
    }
    Ok(cells)
}

/// Grid cells with the segments overlapping each of them.
#[derive(Clone, Debug)]
pub struct SplicedGeometry {
    cells: Vec<Segment>,
    segments: Vec<Segment>,
    /// Per cell, indices into `segments`.
    index: Vec<Vec<usize>>,
}

impl SplicedGeometry {
    /// Splice the canvas and index `map` against the cells.
    ///
    /// Without a map the cells themselves are the segments.
    pub fn new(map: Option<SegmentMap>, cell_w: u32, cell_h: u32, size: (u32, u32)) -> CardResult<Self> {
        let cells = splice(cell_w, cell_h, size)?;
        let segments = match map {
            Some(map) => map.segments,
            None => cells.clone(),
        };
        let index = cells
            .iter()
            .map(|cell| {
                segments
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.shape.intersects(cell.shape))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        Ok(Self {
            cells,
            segments,
            index,
        })
    }

    pub fn cells(&self) -> &[Segment] {
        &self.cells
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// Segments carrying `tag`, in import order.
    pub fn tagged(&self, tag: &str) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| s.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Segments overlapping `rect`, deduplicated, in import order.
    pub fn covering(&self, rect: PixelRect) -> Vec<Segment> {
        let mut seen = HashSet::new();
        let mut found: Vec<&Segment> = Vec::new();
        for (cell, hits) in self.cells.iter().zip(&self.index) {
            if !cell.shape.intersects(rect) {
                continue;
            }
            for &i in hits {
                let seg = &self.segments[i];
                if seg.shape.intersects(rect) && seen.insert(i) {
                    found.push(seg);
                }
            }
        }
        found.sort_by_key(|s| s.import_position);
        found.into_iter().cloned().collect()
    }
}

/// Segments under the grid expression `expr`.
///
/// Uses the frame's spliced geometry, or splices its grid on demand.
pub fn get_grid_geometry(ctx: &FrameContext, expr: &str) -> CardResult<Vec<Segment>> {
    let rect = locate(expr, "", ctx)?.placement();
    match &ctx.geometry {
        Some(geometry) => Ok(geometry.covering(rect)),
        None => {
            let (cw, ch) = ctx.cell_size();
            Ok(SplicedGeometry::new(None, cw, ch, ctx.size())?.covering(rect))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tpig/segment.rs"]
mod tests;

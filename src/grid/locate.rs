//! Grid expressions to pixel rectangles.
//!
//! Accepted notations (letters case-insensitive):
//! - `b3`: column letters (bijective base 26, `a` = 0) then a 0-based row
//! - `b3:d5`: inclusive cell range
//! - `R4C2`, `R4C2:R6C4`: 1-based row and column
//! - `(x1,y1)-(x2,y2)`: pixel rectangle, end exclusive
//! - `key:<colour>`: marker block in the background art
//! - anything else: a registered alias, followed one level

use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{CardError, CardResult};
use crate::grid::context::FrameContext;
use crate::render::artkey::{art_to_canvas, is_art_key};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Resolved widget area.
pub struct GridArea {
    /// Widget-local rectangle, always at the origin.
    pub mask: PixelRect,
    /// Top-left of the area on the canvas.
    pub origin: Point,
    /// Alias the area was located for, empty when none.
    pub alias: String,
}

impl GridArea {
    /// Area covering `rect` on the canvas.
    pub fn new(rect: PixelRect, alias: impl Into<String>) -> Self {
        Self {
            mask: rect.at_origin(),
            origin: rect.min,
            alias: alias.into(),
        }
    }

    /// Absolute rectangle on the canvas.
    pub fn placement(&self) -> PixelRect {
        self.mask.translate(self.origin)
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    /// Column and row of the first and last cell.
    Cells { start: (u64, u64), end: (u64, u64) },
    /// Pixel corners, end exclusive.
    Pixels { start: (u64, u64), end: (u64, u64) },
}

#[tracing::instrument(skip(ctx))]
/// Resolve `expr` against the frame's canvas and grid.
///
/// On success a non-empty `alias` is bound to `expr`; binding it again to the
/// same expression is accepted.
pub fn locate(expr: &str, alias: &str, ctx: &FrameContext) -> CardResult<GridArea> {
    let rect = resolve_rect(expr, ctx, true)?;
    register(alias, expr, ctx)?;
    Ok(GridArea::new(rect, alias))
}

fn resolve_rect(expr: &str, ctx: &FrameContext, follow_alias: bool) -> CardResult<PixelRect> {
    let trimmed = expr.trim();
    if is_art_key(trimmed) {
        return Ok(art_to_canvas(trimmed, ctx)?.area.placement());
    }

    match parse_notation(trimmed)? {
        Some(Notation::Cells { start, end }) => cell_rect(expr, start, end, ctx),
        Some(Notation::Pixels { start, end }) => pixel_rect(expr, start, end, ctx),
        None if follow_alias && !trimmed.is_empty() => {
            let location = ctx
                .aliases
                .get(trimmed)
                .ok_or_else(|| CardError::invalid_grid_alias(expr))?;
            resolve_rect(&location, ctx, false)
        }
        None => Err(CardError::invalid_grid_alias(expr)),
    }
}

fn register(alias: &str, expr: &str, ctx: &FrameContext) -> CardResult<()> {
    if alias.trim().is_empty() || ctx.aliases.try_insert(alias, expr) {
        return Ok(());
    }
    if ctx.aliases.get(alias).as_deref() == Some(expr) {
        Ok(())
    } else {
        Err(CardError::duplicate_alias(alias))
    }
}

fn cell_rect(
    expr: &str,
    (c1, r1): (u64, u64),
    (c2, r2): (u64, u64),
    ctx: &FrameContext,
) -> CardResult<PixelRect> {
    if c2 < c1 || r2 < r1 {
        return Err(CardError::InvalidRange {
            expr: expr.to_string(),
            coords: (c1, r1, c2, r2),
        });
    }
    let (cw, ch) = ctx.cell_size();
    let (cw, ch) = (u64::from(cw), u64::from(ch));
    bounded(
        ctx,
        (c1.saturating_mul(cw), r1.saturating_mul(ch)),
        (
            c2.saturating_add(1).saturating_mul(cw),
            r2.saturating_add(1).saturating_mul(ch),
        ),
    )
}

fn pixel_rect(
    expr: &str,
    (x1, y1): (u64, u64),
    (x2, y2): (u64, u64),
    ctx: &FrameContext,
) -> CardResult<PixelRect> {
    if x2 <= x1 || y2 <= y1 {
        return Err(CardError::InvalidRange {
            expr: expr.to_string(),
            coords: (x1, y1, x2, y2),
        });
    }
    bounded(ctx, (x1, y1), (x2, y2))
}

fn bounded(ctx: &FrameContext, min: (u64, u64), max: (u64, u64)) -> CardResult<PixelRect> {
    let (width, height) = ctx.size();
    if max.0 > u64::from(width) || max.1 > u64::from(height) {
        return Err(CardError::OutOfBounds {
            width,
            height,
            x: max.0,
            y: max.1,
        });
    }
    // Both corners are now within u32 range.
    Ok(PixelRect::new(
        min.0 as u32,
        min.1 as u32,
        max.0 as u32,
        max.1 as u32,
    ))
}

/// `Ok(None)` when `s` is not grid notation and may be an alias.
fn parse_notation(s: &str) -> CardResult<Option<Notation>> {
    if let Some((start, end)) = parse_pixels(s) {
        return Ok(Some(Notation::Pixels { start, end }));
    }

    let (first, second) = match s.split_once(':') {
        Some((a, b)) => (a, Some(b)),
        None => (s, None),
    };
    let Some(start) = parse_coord(first) else {
        return Ok(None);
    };
    let end = match second {
        None => start,
        Some(b) => match parse_coord(b) {
            Some(end) => end,
            None => return Ok(None),
        },
    };

    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(Notation::Cells { start, end })),
        _ => Err(CardError::invalid_grid_alias(s)),
    }
}

/// Column and row of one cell. `Some(None)` for a recognised but invalid `R0`/`C0`.
fn parse_coord(s: &str) -> Option<Option<(u64, u64)>> {
    if let Some((row, col)) = parse_rc(s) {
        if row == 0 || col == 0 {
            return Some(None);
        }
        return Some(Some((col - 1, row - 1)));
    }
    parse_cell(s).map(Some)
}

fn parse_rc(s: &str) -> Option<(u64, u64)> {
    let rest = s.strip_prefix(['R', 'r'])?;
    let split = rest.find(['C', 'c'])?;
    Some((digits(&rest[..split])?, digits(&rest[split + 1..])?))
}

fn parse_cell(s: &str) -> Option<(u64, u64)> {
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, row) = s.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters.bytes().try_fold(0u64, |acc, b| {
        acc.checked_mul(26)?
            .checked_add(u64::from(b.to_ascii_lowercase() - b'a') + 1)
    })?;
    Some((col - 1, digits(row)?))
}

fn parse_pixels(s: &str) -> Option<((u64, u64), (u64, u64))> {
    let inner = s.strip_prefix('(')?.strip_suffix(')')?;
    let (a, b) = inner.split_once(")-(")?;
    let pair = |p: &str| {
        let (x, y) = p.split_once(',')?;
        Some((digits(x)?, digits(y)?))
    };
    Some((pair(a)?, pair(b)?))
}

fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
#[path = "../../tests/unit/grid/locate.rs"]
mod tests;

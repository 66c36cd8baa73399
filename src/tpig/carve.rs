use crate::foundation::error::{CardError, CardResult};
use crate::foundation::core::{PixelRect, Point};
use crate::grid::context::FrameContext;
use crate::render::canvas::Canvas;
use crate::tpig::segment::{Segment, SplicedGeometry, get_grid_geometry};

/// One carved target.
#[derive(Clone, Debug)]
pub struct Carved {
    /// Union of the target's segments, transparent outside them.
    pub image: Canvas,
    /// Top-left of `image` on the source canvas.
    pub origin: Point,
    /// The target, then the names of the segments used.
    pub location: Vec<String>,
}

/// Cut each target out of `source`.
///
/// A target is a segment name, `tag:<name>`, or a grid expression. Targets
/// matching no segment are skipped; failures of independent targets are
/// reported together.
#[tracing::instrument(skip(ctx, source))]
pub fn carve(ctx: &FrameContext, source: &Canvas, targets: &[&str]) -> CardResult<Vec<Carved>> {
    let spliced;
    let geometry = match &ctx.geometry {
        Some(geometry) => geometry,
        None => {
            let (cw, ch) = ctx.cell_size();
            spliced = SplicedGeometry::new(None, cw, ch, ctx.size())?;
            &spliced
        }
    };

    let mut carved = Vec::new();
    let mut errors = Vec::new();
    for &target in targets {
        let segments = match segments_for(ctx, geometry, target) {
            Ok(segments) => segments,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };
        if segments.is_empty() {
            tracing::debug!(target, "no segments to carve");
            continue;
        }
        match carve_one(source, target, &segments) {
            Ok(c) => carved.push(c),
            Err(e) => errors.push(e),
        }
    }

    match CardError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(carved),
    }
}

fn segments_for(
    ctx: &FrameContext,
    geometry: &SplicedGeometry,
    target: &str,
) -> CardResult<Vec<Segment>> {
    if let Some(seg) = geometry.segment(target) {
        return Ok(vec![seg.clone()]);
    }
    if let Some(tag) = target.strip_prefix("tag:") {
        return Ok(geometry.tagged(tag.trim()));
    }
    get_grid_geometry(ctx, target)
}

fn carve_one(source: &Canvas, target: &str, segments: &[Segment]) -> CardResult<Carved> {
    let bbox = segments
        .iter()
        .map(|s| s.shape)
        .reduce(PixelRect::union)
        .unwrap_or_default();

    let mut image = Canvas::transparent(source.format(), bbox.width(), bbox.height());
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.import_position);
    for seg in &ordered {
        let piece = source.crop(seg.shape)?;
        image.draw_over(&piece, seg.shape.relative_to(bbox.min).min);
    }

    let mut location = Vec::with_capacity(ordered.len() + 1);
    location.push(target.to_string());
    location.extend(ordered.iter().map(|s| s.name.clone()));
    Ok(Carved {
        image,
        origin: bbox.min,
        location,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tpig/carve.rs"]
mod tests;

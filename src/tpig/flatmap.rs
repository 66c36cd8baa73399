use std::collections::HashSet;

use crate::config::canvas::ImageType;
use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{CardError, CardResult};
use crate::render::canvas::Canvas;
use crate::tpig::segment::Segment;

#[derive(Debug, serde::Deserialize)]
struct RawMap {
    dimensions: RawSize,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, serde::Deserialize)]
struct RawSize {
    w: u32,
    h: u32,
}

#[derive(Debug, serde::Deserialize)]
struct RawSegment {
    #[serde(default)]
    name: String,
    shape: RawShape,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct RawShape {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Parsed segment map: canvas size plus segments in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentMap {
    pub width: u32,
    pub height: u32,
    pub segments: Vec<Segment>,
}

/// Segment map plus the empty canvas it describes.
#[derive(Clone, Debug)]
pub struct Destination {
    /// Transparent canvas of the map's dimensions.
    pub canvas: Canvas,
    pub map: SegmentMap,
}

/// Parse a segment map file.
pub fn flatmap(bytes: &[u8], path: &str) -> CardResult<Destination> {
    let raw: RawMap =
        serde_json::from_slice(bytes).map_err(|e| CardError::flatmap(path, e.to_string()))?;
    let RawSize { w, h } = raw.dimensions;
    if w == 0 || h == 0 {
        return Err(CardError::flatmap(path, format!("dimensions {w}x{h} are empty")));
    }

    let bounds = PixelRect::from_origin_size(Point::ZERO, w, h);
    let mut seen = HashSet::new();
    let mut segments = Vec::with_capacity(raw.segments.len());
    for (import_position, seg) in raw.segments.into_iter().enumerate() {
        if seg.name.trim().is_empty() {
            return Err(CardError::segment(
                format!("#{import_position}"),
                "segment has no name",
            ));
        }
        if !seen.insert(seg.name.clone()) {
            return Err(CardError::segment(&seg.name, "name is declared twice"));
        }

        let RawShape { x, y, w: sw, h: sh } = seg.shape;
        let shape = PixelRect::from_origin_size(Point::new(x, y), sw, sh);
        if shape.is_empty() {
            return Err(CardError::segment(&seg.name, format!("shape {sw}x{sh} is empty")));
        }
        if shape.intersection(bounds) != shape {
            return Err(CardError::segment(
                &seg.name,
                format!("shape ({x},{y}) {sw}x{sh} is outside the {w}x{h} canvas"),
            ));
        }

        segments.push(Segment {
            name: seg.name,
            shape,
            tags: seg.tags,
            import_position,
        });
    }

    Ok(Destination {
        canvas: Canvas::transparent(ImageType::Nrgba64, w, h),
        map: SegmentMap {
            width: w,
            height: h,
            segments,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tpig/flatmap.rs"]
mod tests;

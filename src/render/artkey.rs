//! Background art and colour-keyed marker blocks.

use image::imageops::FilterType;

use crate::colour::parse::named_colour;
use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{CardError, CardResult};
use crate::grid::context::FrameContext;
use crate::grid::locate::GridArea;
use crate::render::canvas::{Canvas, Rgba16Image};
use crate::render::decode::decode_image;

const KEY_PREFIX: &str = "key:";

/// Base image scaled to the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtBackground {
    image: Rgba16Image,
}

impl ArtBackground {
    pub fn image(&self) -> &Rgba16Image {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::Nrgba64(self.image.clone())
    }
}

/// A located marker block.
#[derive(Clone, Debug)]
pub struct ArtKeyMatch {
    /// The block's bounding box cut from the background.
    pub image: Canvas,
    pub area: GridArea,
}

/// Decode `bytes` and scale to exactly `size` with nearest-neighbour sampling.
pub fn art_key_gen(bytes: &[u8], size: (u32, u32)) -> CardResult<ArtBackground> {
    let decoded = decode_image(bytes)?.to_rgba16();
    let image = if decoded.dimensions() == size {
        decoded
    } else {
        image::imageops::resize(&decoded, size.0, size.1, FilterType::Nearest)
    };
    Ok(ArtBackground { image })
}

/// True for `key:<colour>` expressions.
pub fn is_art_key(expr: &str) -> bool {
    expr.trim()
        .get(..KEY_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(KEY_PREFIX))
}

/// Find the first opaque block of the keyed colour in the background art.
///
/// Pixels are scanned row-major; the 4-connected block around the first hit
/// gives the bounding box.
pub fn art_to_canvas(expr: &str, ctx: &FrameContext) -> CardResult<ArtKeyMatch> {
    let trimmed = expr.trim();
    if !is_art_key(trimmed) {
        return Err(CardError::art_key(expr, "expected key:<colour>"));
    }
    let name = trimmed[KEY_PREFIX.len()..].trim();
    let [r, g, b, _] =
        named_colour(name).ok_or_else(|| CardError::art_key(expr, format!("unknown colour {name}")))?;
    let background = ctx
        .background
        .as_ref()
        .ok_or_else(|| CardError::art_key(expr, "no base image is loaded"))?;

    let img = background.image();
    let matches = |x: u32, y: u32| {
        let px = img.get_pixel(x, y).0;
        px[3] >> 8 == 0xff && [px[0] >> 8, px[1] >> 8, px[2] >> 8] == [r, g, b].map(u16::from)
    };
    let (width, height) = img.dimensions();
    let seed = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .find(|&(x, y)| matches(x, y))
        .ok_or_else(|| CardError::art_key(expr, format!("no {name} block in the base image")))?;

    let rect = flood_bounds(seed, (width, height), matches);
    let image = Canvas::Nrgba64(img.clone())
        .crop(rect)?
        .to_format(ctx.format());
    Ok(ArtKeyMatch {
        image,
        area: GridArea::new(rect, ""),
    })
}

/// Bounding box of the 4-connected region around `seed`.
fn flood_bounds(
    seed: (u32, u32),
    (width, height): (u32, u32),
    matches: impl Fn(u32, u32) -> bool,
) -> PixelRect {
    let idx = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut visited = vec![false; width as usize * height as usize];
    let mut stack = vec![seed];
    visited[idx(seed.0, seed.1)] = true;
    let (mut min, mut max) = (Point::new(seed.0, seed.1), Point::new(seed.0, seed.1));

    while let Some((x, y)) = stack.pop() {
        min = Point::new(min.x.min(x), min.y.min(y));
        max = Point::new(max.x.max(x), max.y.max(y));

        let neighbours = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1).filter(|&v| v < width), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1).filter(|&v| v < height)),
        ];
        for (nx, ny) in neighbours {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if !visited[idx(nx, ny)] && matches(nx, ny) {
                visited[idx(nx, ny)] = true;
                stack.push((nx, ny));
            }
        }
    }
    PixelRect::new(min.x, min.y, max.x + 1, max.y + 1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/artkey.rs"]
mod tests;

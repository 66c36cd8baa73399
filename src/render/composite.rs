//! Straight-alpha source-over compositing for canvas pixels.

use image::{ImageBuffer, Pixel, Rgba};

use crate::foundation::core::{PixelRect, Point};

/// Pixel types the compositor can blend.
pub trait BlendPixel: Pixel {
    /// `src` over `dst`, both non-premultiplied.
    fn over(dst: Self, src: Self) -> Self;
}

const MAX16: u64 = u16::MAX as u64;

impl BlendPixel for Rgba<u16> {
    fn over(dst: Self, src: Self) -> Self {
        let sa = u64::from(src[3]);
        if sa == 0 {
            return dst;
        }
        if sa == MAX16 {
            return src;
        }

        let dw = mul_div_max(u64::from(dst[3]), MAX16 - sa);
        let oa = sa + dw;
        if oa == 0 {
            return Rgba([0; 4]);
        }

        let mut out = [0u16; 4];
        for i in 0..3 {
            let c = u64::from(src[i]) * sa + u64::from(dst[i]) * dw;
            out[i] = ((c + oa / 2) / oa).min(MAX16) as u16;
        }
        out[3] = oa.min(MAX16) as u16;
        Rgba(out)
    }
}

impl BlendPixel for Rgba<f32> {
    fn over(dst: Self, src: Self) -> Self {
        let sa = src[3].clamp(0.0, 1.0);
        if sa <= 0.0 {
            return dst;
        }
        if sa >= 1.0 {
            return src;
        }

        let dw = dst[3].clamp(0.0, 1.0) * (1.0 - sa);
        let oa = sa + dw;
        if oa <= 0.0 {
            return Rgba([0.0; 4]);
        }
        let mut out = [0.0f32; 4];
        for i in 0..3 {
            out[i] = (src[i] * sa + dst[i] * dw) / oa;
        }
        out[3] = oa;
        Rgba(out)
    }
}

/// Composite `src` over `dst` with its top-left at `at`, clipped to `dst`.
pub fn over_at<P>(
    dst: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    at: Point,
) where
    P: BlendPixel,
{
    let bounds = PixelRect::from_origin_size(Point::ZERO, dst.width(), dst.height());
    let clip = PixelRect::from_origin_size(at, src.width(), src.height()).intersection(bounds);
    for y in clip.min.y..clip.max.y {
        for x in clip.min.x..clip.max.x {
            let s = *src.get_pixel(x - at.x, y - at.y);
            let d = dst.get_pixel_mut(x, y);
            *d = P::over(*d, s);
        }
    }
}

fn mul_div_max(x: u64, y: u64) -> u64 {
    (x * y + MAX16 / 2) / MAX16
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

use image::{DynamicImage, ImageBuffer, Rgba, Rgba32FImage};

use crate::colour::parse::Colour;
use crate::config::canvas::ImageType;
use crate::foundation::core::{PixelRect, Point};
use crate::foundation::error::{CardError, CardResult};
use crate::render::composite::over_at;

/// 16-bit straight-alpha RGBA buffer.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Pixel buffer of a frame, widget or segment.
#[derive(Clone, Debug, PartialEq)]
pub enum Canvas {
    /// 16-bit non-premultiplied RGBA.
    Nrgba64(Rgba16Image),
    /// Normalised float RGBA for ACES output.
    Aces(Rgba32FImage),
}

impl Canvas {
    /// Canvas of `format` filled with `fill`.
    pub fn new(format: ImageType, width: u32, height: u32, fill: Colour) -> Self {
        let px = fill.to_rgba16();
        match format {
            ImageType::Nrgba64 => Canvas::Nrgba64(ImageBuffer::from_pixel(width, height, Rgba(px))),
            ImageType::Aces => Canvas::Aces(ImageBuffer::from_pixel(
                width,
                height,
                Rgba(px.map(|c| f32::from(c) / f32::from(u16::MAX))),
            )),
        }
    }

    /// Fully transparent canvas.
    pub fn transparent(format: ImageType, width: u32, height: u32) -> Self {
        Self::new(format, width, height, Colour::TRANSPARENT)
    }

    pub fn format(&self) -> ImageType {
        match self {
            Canvas::Nrgba64(_) => ImageType::Nrgba64,
            Canvas::Aces(_) => ImageType::Aces,
        }
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Canvas::Nrgba64(img) => img.dimensions(),
            Canvas::Aces(img) => img.dimensions(),
        }
    }

    /// The whole canvas as a rectangle at the origin.
    pub fn bounds(&self) -> PixelRect {
        let (w, h) = self.dimensions();
        PixelRect::from_origin_size(Point::ZERO, w, h)
    }

    /// Copy of `rect`, which must lie inside the canvas.
    pub fn crop(&self, rect: PixelRect) -> CardResult<Canvas> {
        let (w, h) = self.dimensions();
        if rect.max.x > w || rect.max.y > h {
            return Err(CardError::OutOfBounds {
                width: w,
                height: h,
                x: u64::from(rect.max.x),
                y: u64::from(rect.max.y),
            });
        }

        let (x, y, cw, ch) = (rect.min.x, rect.min.y, rect.width(), rect.height());
        Ok(match self {
            Canvas::Nrgba64(img) => {
                Canvas::Nrgba64(image::imageops::crop_imm(img, x, y, cw, ch).to_image())
            }
            Canvas::Aces(img) => Canvas::Aces(image::imageops::crop_imm(img, x, y, cw, ch).to_image()),
        })
    }

    /// Source-over `src` with its top-left at `at`, clipped to this canvas.
    pub fn draw_over(&mut self, src: &Canvas, at: Point) {
        match (self, src) {
            (Canvas::Nrgba64(dst), Canvas::Nrgba64(src)) => over_at(dst, src, at),
            (Canvas::Aces(dst), Canvas::Aces(src)) => over_at(dst, src, at),
            (Canvas::Nrgba64(dst), other) => over_at(dst, &other.to_rgba16(), at),
            (Canvas::Aces(dst), other) => over_at(dst, &other.to_rgba32f(), at),
        }
    }

    /// Same pixels in another format.
    pub fn to_format(&self, format: ImageType) -> Canvas {
        match format {
            ImageType::Nrgba64 => Canvas::Nrgba64(self.to_rgba16()),
            ImageType::Aces => Canvas::Aces(self.to_rgba32f()),
        }
    }

    pub fn to_rgba16(&self) -> Rgba16Image {
        match self {
            Canvas::Nrgba64(img) => img.clone(),
            Canvas::Aces(img) => DynamicImage::ImageRgba32F(img.clone()).to_rgba16(),
        }
    }

    pub fn to_rgba32f(&self) -> Rgba32FImage {
        match self {
            Canvas::Nrgba64(img) => DynamicImage::ImageRgba16(img.clone()).to_rgba32f(),
            Canvas::Aces(img) => img.clone(),
        }
    }

    /// One pixel as 16-bit RGBA.
    pub fn pixel16(&self, x: u32, y: u32) -> Option<[u16; 4]> {
        let (w, h) = self.dimensions();
        if x >= w || y >= h {
            return None;
        }
        Some(match self {
            Canvas::Nrgba64(img) => img.get_pixel(x, y).0,
            Canvas::Aces(img) => img
                .get_pixel(x, y)
                .0
                .map(|c| (c.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;

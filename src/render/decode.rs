use anyhow::Context;

use crate::foundation::error::CardResult;

/// Decode encoded image bytes.
pub fn decode_image(bytes: &[u8]) -> CardResult<image::DynamicImage> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(img)
}

/// Encode as 16-bit PNG.
pub fn encode_png16(image: &image::ImageBuffer<image::Rgba<u16>, Vec<u16>>) -> CardResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba16(image.clone())
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/decode.rs"]
mod tests;

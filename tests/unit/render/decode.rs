use super::*;

#[test]
fn png16_round_trip() {
    let img = image::ImageBuffer::from_fn(3, 2, |x, y| image::Rgba([x as u16 * 1000, y as u16 * 2000, 7, 65535]));
    let bytes = encode_png16(&img).unwrap();
    let back = decode_image(&bytes).unwrap().to_rgba16();
    assert_eq!(back, img);
}

#[test]
fn garbage_is_wrapped_with_context() {
    let err = decode_image(b"not an image").unwrap_err();
    assert_eq!(err.code(), "0100");
    assert!(err.to_string().starts_with("0100 decode image from memory"), "{err}");
}

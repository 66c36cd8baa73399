use super::*;

const RED: Colour = Colour::Rgba8([255, 0, 0, 255]);

#[test]
fn new_fills_in_either_format() {
    let c = Canvas::new(ImageType::Nrgba64, 4, 3, RED);
    assert_eq!(c.dimensions(), (4, 3));
    assert_eq!(c.pixel16(3, 2), Some([65280, 0, 0, 65535]));
    assert_eq!(c.pixel16(4, 0), None);

    let aces = Canvas::new(ImageType::Aces, 2, 2, RED);
    assert_eq!(aces.format(), ImageType::Aces);
    assert_eq!(aces.pixel16(0, 0), Some([65280, 0, 0, 65535]));
}

#[test]
fn crop_checks_bounds() {
    let c = Canvas::new(ImageType::Nrgba64, 10, 10, RED);
    let part = c.crop(PixelRect::new(2, 3, 6, 8)).unwrap();
    assert_eq!(part.dimensions(), (4, 5));

    let err = c.crop(PixelRect::new(5, 5, 11, 9)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "0047 Area outside of image bounds of (10,10), received an x value of 11 and a y value of 9"
    );
}

#[test]
fn draw_over_converts_formats() {
    let mut dst = Canvas::transparent(ImageType::Aces, 4, 4);
    let src = Canvas::new(ImageType::Nrgba64, 2, 2, Colour::Rgba16([0, 65535, 0, 65535]));
    dst.draw_over(&src, Point::new(1, 1));
    assert_eq!(dst.pixel16(1, 1), Some([0, 65535, 0, 65535]));
    assert_eq!(dst.pixel16(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(dst.pixel16(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn format_round_trip_keeps_sixteen_bit_values() {
    let c = Canvas::new(ImageType::Nrgba64, 1, 1, Colour::Rgba16([65520, 16368, 4080, 65535]));
    let back = c.to_format(ImageType::Aces).to_format(ImageType::Nrgba64);
    assert_eq!(back.pixel16(0, 0), Some([65520, 16368, 4080, 65535]));
    assert_eq!(back.bounds(), PixelRect::new(0, 0, 1, 1));
}

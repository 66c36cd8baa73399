use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = Rgba([10u16, 20, 30, 40]);
    assert_eq!(Rgba::over(dst, Rgba([65535, 65535, 65535, 0])), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = Rgba([65535u16, 0, 0, 65535]);
    assert_eq!(Rgba::over(Rgba([0, 0, 0, 65535]), src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = Rgba([1000u16, 2000, 3000, 30000]);
    assert_eq!(Rgba::over(Rgba([0u16; 4]), src), src);
}

#[test]
fn half_alpha_mixes_channels() {
    let out = Rgba::over(Rgba([0u16, 0, 0, 65535]), Rgba([65535u16, 0, 0, 32768]));
    assert_eq!(out[3], 65535);
    assert!((32700..=32800).contains(&out[0]), "{out:?}");
}

#[test]
fn float_over_matches_integer_rules() {
    let dst = Rgba([0.0f32, 0.0, 1.0, 1.0]);
    assert_eq!(Rgba::over(dst, Rgba([1.0, 0.0, 0.0, 0.0])), dst);
    let out = Rgba::over(dst, Rgba([1.0, 0.0, 0.0, 0.5]));
    assert!((out[0] - 0.5).abs() < 1e-6);
    assert!((out[2] - 0.5).abs() < 1e-6);
    assert!((out[3] - 1.0).abs() < 1e-6);
}

#[test]
fn over_at_clips_to_destination() {
    let mut dst = ImageBuffer::from_pixel(4, 4, Rgba([0u16, 0, 0, 65535]));
    let src = ImageBuffer::from_pixel(3, 3, Rgba([65535u16, 65535, 65535, 65535]));
    over_at(&mut dst, &src, Point::new(2, 2));
    assert_eq!(dst.get_pixel(3, 3)[0], 65535);
    assert_eq!(dst.get_pixel(1, 1)[0], 0);
    assert_eq!(dst.get_pixel(2, 1)[0], 0);

    over_at(&mut dst, &src, Point::new(10, 10));
    assert_eq!(dst.get_pixel(0, 0)[0], 0);
}

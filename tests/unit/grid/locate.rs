use super::*;
use crate::config::canvas::CanvasConfig;

fn ctx() -> FrameContext {
    FrameContext::new(CanvasConfig::new(1600, 900, 9, 16))
}

#[test]
fn single_cell() {
    let area = locate("a1", "", &ctx()).unwrap();
    assert_eq!(area.mask, PixelRect::new(0, 0, 100, 100));
    assert_eq!(area.origin, Point::new(0, 100));
    assert_eq!(area.placement(), PixelRect::new(0, 100, 100, 200));
}

#[test]
fn cell_range_is_inclusive() {
    let area = locate("a1:b2", "", &ctx()).unwrap();
    assert_eq!(area.mask, PixelRect::new(0, 0, 200, 200));
    assert_eq!(area.origin, Point::new(0, 100));
}

#[test]
fn notation_is_case_and_space_insensitive() {
    let c = ctx();
    assert_eq!(locate(" B3 ", "", &c).unwrap(), locate("b3", "", &c).unwrap());
}

#[test]
fn multi_letter_columns() {
    let c = FrameContext::new(CanvasConfig::new(3000, 10, 1, 30));
    let area = locate("aa0", "", &c).unwrap();
    assert_eq!(area.origin, Point::new(2600, 0));
    assert_eq!(area.width(), 100);
}

#[test]
fn unparseable_is_invalid_alias() {
    let err = locate("a19:", "test", &ctx()).unwrap_err();
    assert_eq!(err.to_string(), "0046 a19: is not a valid grid alias");
    assert!(locate("", "", &ctx()).is_err());
    // A failed lookup binds nothing.
    let c = ctx();
    let _ = locate("nowhere", "test", &c);
    assert!(c.aliases.is_empty());
}

#[test]
fn inverted_range_reports_raw_coordinates() {
    let err = locate("b2:a1", "", &ctx()).unwrap_err();
    assert_eq!(err.code(), "0045");
    assert!(err.to_string().contains("(1,2)-(0,1)"), "{err}");
}

#[test]
fn out_of_bounds_reports_far_corner() {
    let err = locate("a5:q6", "", &ctx()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "0047 Area outside of image bounds of (1600,900), received an x value of 1700 and a y value of 700"
    );
    assert_eq!(locate("a9", "", &ctx()).unwrap_err().code(), "0047");
}

#[test]
fn row_column_notation_is_one_based() {
    let c = ctx();
    assert_eq!(
        locate("R1C1", "", &c).unwrap(),
        locate("a0", "", &c).unwrap()
    );
    let area = locate("r2c3:R3C4", "", &c).unwrap();
    assert_eq!(area.origin, Point::new(200, 100));
    assert_eq!(area.mask, PixelRect::new(0, 0, 200, 200));
    assert_eq!(locate("R0C1", "", &c).unwrap_err().code(), "0046");
    assert_eq!(locate("R1C1:R1C0", "", &c).unwrap_err().code(), "0046");
}

#[test]
fn pixel_rectangles_are_end_exclusive() {
    let c = ctx();
    let area = locate("(10,20)-(110,70)", "", &c).unwrap();
    assert_eq!(area.origin, Point::new(10, 20));
    assert_eq!(area.mask, PixelRect::new(0, 0, 100, 50));
    assert_eq!(locate("(5,5)-(5,9)", "", &c).unwrap_err().code(), "0045");
    assert_eq!(locate("(0,0)-(1601,10)", "", &c).unwrap_err().code(), "0047");
}

#[test]
fn aliases_resolve_one_level() {
    let c = ctx();
    assert!(c.aliases.try_insert("robocorner", "b1"));
    assert!(c.aliases.try_insert("chained", "robocorner"));

    let area = locate("robocorner", "", &c).unwrap();
    assert_eq!(area.origin, Point::new(100, 100));
    assert_eq!(locate("chained", "", &c).unwrap_err().code(), "0046");
}

#[test]
fn located_aliases_are_registered_once() {
    let c = ctx();
    let area = locate("c2", "swatch", &c).unwrap();
    assert_eq!(area.alias, "swatch");
    assert_eq!(c.aliases.get("swatch").as_deref(), Some("c2"));

    locate("c2", "swatch", &c).unwrap();
    let err = locate("c3", "swatch", &c).unwrap_err();
    assert_eq!(
        err.to_string(),
        "0006 the alias swatch is repeated, every alias is required to be unique"
    );
}

use super::*;

#[test]
fn display_starts_with_code() {
    let cases = [
        CardError::invalid_grid_alias("fake"),
        CardError::duplicate_alias("robocorner"),
        CardError::IncludeDepth { max: 30 },
        CardError::NoFrames {
            path: "f.json".to_string(),
        },
        CardError::canvas("zero size"),
        CardError::Splice("zero cell".to_string()),
    ];
    for err in cases {
        assert!(
            err.to_string().starts_with(err.code()),
            "{err} should start with {}",
            err.code()
        );
    }
}

#[test]
fn catalogue_messages_are_stable() {
    assert_eq!(
        CardError::invalid_grid_alias("a19:").to_string(),
        "0046 a19: is not a valid grid alias"
    );
    assert_eq!(
        CardError::InvalidRange {
            expr: "b2:a1".to_string(),
            coords: (1, 2, 0, 1),
        }
        .to_string(),
        "0045 The grid dimensions of b2:a1 are invalid, received coordinates of (1,2)-(0,1)"
    );
    assert_eq!(
        CardError::OutOfBounds {
            width: 1600,
            height: 900,
            x: 1700,
            y: 700,
        }
        .to_string(),
        "0047 Area outside of image bounds of (1600,900), received an x value of 1700 and a y value of 700"
    );
    assert_eq!(
        CardError::duplicate_alias("robocorner").to_string(),
        "0006 the alias robocorner is repeated, every alias is required to be unique"
    );
    assert_eq!(
        CardError::IncludeDepth { max: 30 }.to_string(),
        "0004 recursive set initialisation file detected, the maximum dotpath depth of 30 has been reached"
    );
}

#[test]
fn io_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::io("open", "x.json", base);
    assert_eq!(err.code(), "0001");
    assert!(err.to_string().contains("open x.json: boom"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_wraps_anyhow_with_context() {
    let err: CardError = anyhow::anyhow!("bad png").context("decode image").into();
    assert_eq!(err.code(), "0100");
    assert!(err.to_string().contains("decode image"));
    assert!(err.to_string().contains("bad png"));
}

#[test]
fn collect_flattens_single_and_joins_many() {
    assert!(CardError::collect(vec![]).is_none());

    let single = CardError::collect(vec![CardError::invalid_grid_alias("x")]).unwrap();
    assert!(matches!(single, CardError::InvalidGridAlias { .. }));

    let many = CardError::collect(vec![
        CardError::invalid_grid_alias("x"),
        CardError::duplicate_alias("y"),
    ])
    .unwrap();
    assert_eq!(many.code(), "0046");
    assert_eq!(many.to_string().lines().count(), 2);
}

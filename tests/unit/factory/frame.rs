use serde_json::json;

use super::*;

fn widget(key: &str, position: usize, array_position: Vec<usize>) -> WidgetInstruction {
    WidgetInstruction {
        key: key.to_string(),
        data: json!({"type": "builtin.fill", "grid": {"location": "a0", "alias": key}})
            .as_object()
            .cloned()
            .unwrap(),
        position,
        array_position,
        tag: "builtin.fill".to_string(),
    }
}

#[test]
fn ranges_accept_integer_spans_and_lists() {
    assert_eq!(parse_range("[0:2]").unwrap(), ["0", "1", "2"]);
    assert_eq!(parse_range("[-1:1]").unwrap(), ["-1", "0", "1"]);
    assert_eq!(parse_range("red, green ,blue").unwrap(), ["red", "green", "blue"]);
    assert_eq!(parse_range("[a,b]").unwrap(), ["a", "b"]);
    assert!(parse_range("[3:1]").is_err());
    assert!(parse_range("[x:2]").is_err());
    assert!(parse_range(" , ").is_err());
}

#[test]
fn combinations_run_first_dimension_outermost() {
    let ranges = vec![
        vec!["0".to_string(), "1".to_string()],
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
    ];
    let combos = combinations(&ranges).unwrap();
    assert_eq!(combos.len(), 6);
    assert_eq!(combos[0], [0, 0]);
    assert_eq!(combos[1], [0, 1]);
    assert_eq!(combos[3], [1, 0]);
    assert_eq!(combos[5], [1, 2]);
}

#[test]
fn oversized_products_are_rejected() {
    let big: Vec<String> = (0..300).map(|v| v.to_string()).collect();
    assert!(combinations(&[big.clone(), big]).is_err());
}

#[test]
fn frame_widgets_sort_by_position_then_array_position() {
    let widgets = FrameWidgets::new(
        0,
        vec![
            widget("b[1]", 1, vec![1]),
            widget("c", 2, vec![]),
            widget("b[0]", 1, vec![0]),
            widget("a", 0, vec![]),
        ],
    );
    assert_eq!(widgets.keys().collect::<Vec<_>>(), ["a", "b[0]", "b[1]", "c"]);
    assert_eq!(widgets.get("c").unwrap().position, 2);
    assert!(widgets.get("missing").is_none());
    assert_eq!(widgets.with_tag("builtin.fill").count(), 4);
}

#[test]
fn dotted_field_lookup() {
    let w = widget("robocorner", 3, vec![]);
    assert_eq!(w.grid_location(), Some("a0"));
    assert_eq!(w.field_str("grid.missing"), None);
    assert_eq!(w.field("type"), Some(&json!("builtin.fill")));
    assert_eq!(
        w.alias_identity(),
        Some(AliasIdentity {
            alias: "robocorner".to_string(),
            z_position: 3
        })
    );
}

use std::collections::HashMap;

use serde_json::json;

use super::*;

struct MapLoader(HashMap<String, Vec<u8>>);

impl ByteLoader for MapLoader {
    fn load_bytes(&self, uri: &str) -> CardResult<Vec<u8>> {
        self.0.get(uri).cloned().ok_or_else(|| {
            CardError::io("open", uri, std::io::Error::from(std::io::ErrorKind::NotFound))
        })
    }
}

fn loader(files: &[(&str, &str)]) -> MapLoader {
    MapLoader(
        files
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect(),
    )
}

const FILL: &str = "type: builtin.fill\ncolour: \"{{colour}}\"\ngrid:\n  location: a0\n";

const BARS: &str = r#"
args:
  - name: colour
    type: string
include:
  - uri: fill.yaml
    name: left
  - uri: fill.yaml
    name: right
create:
  - right:
      grid.location: b0
"#;

fn resolve(files: &[(&str, &str)]) -> CardResult<ResolvedConfig> {
    resolve_factory("root.yaml", None, &loader(files))
}

fn frame(config: &ResolvedConfig, n: usize) -> FrameWidgets {
    config.frame_widgets(n, &AliasRegistry::new()).unwrap()
}

#[test]
fn includes_flatten_depth_first() {
    let root = r#"
include:
  - uri: fill.yaml
    name: top
  - uri: bars.yaml
    name: bars
create:
  - bars:
      colour: red
  - top:
      colour: green
"#;
    let config = resolve(&[("root.yaml", root), ("bars.yaml", BARS), ("fill.yaml", FILL)]).unwrap();
    assert_eq!(config.frame_count(), 2);
    // fill.yaml is shared by three includes but recorded once.
    assert_eq!(config.sources().len(), 3);

    let widgets = frame(&config, 0);
    assert_eq!(
        widgets.keys().collect::<Vec<_>>(),
        ["top", "bars.left", "bars.right"]
    );
    let positions: Vec<usize> = widgets.iter().map(|w| w.position).collect();
    assert_eq!(positions, [0, 1, 2]);

    let right = widgets.get("bars.right").unwrap();
    assert_eq!(right.data["colour"], "red");
    assert_eq!(right.grid_location(), Some("b0"));
    assert_eq!(right.tag, "builtin.fill");
    assert_eq!(widgets.get("top").unwrap().data["colour"], "{{colour}}");

    let second = frame(&config, 1);
    assert_eq!(second.get("top").unwrap().data["colour"], "green");
    assert_eq!(second.get("bars.left").unwrap().data["colour"], "{{colour}}");
}

#[test]
fn ancestor_updates_apply_last() {
    let root = r#"
include:
  - uri: bars.yaml
    name: bars
create:
  - bars.right:
      grid.location: c4
      grid.alias: rhs
"#;
    let config = resolve(&[("root.yaml", root), ("bars.yaml", BARS), ("fill.yaml", FILL)]).unwrap();
    let right = frame(&config, 0).get("bars.right").cloned().unwrap();
    assert_eq!(right.grid_location(), Some("c4"));
    assert_eq!(right.grid_alias(), Some("rhs"));
}

#[test]
fn nested_create_cycles_with_frame() {
    let root = r#"
include:
  - uri: bars.yaml
    name: bars
create: [{}, {}, {}]
"#;
    let bars = r#"
include:
  - uri: fill.yaml
    name: left
create:
  - left: {grid.location: a0}
  - left: {grid.location: a1}
"#;
    let config = resolve(&[("root.yaml", root), ("bars.yaml", bars), ("fill.yaml", FILL)]).unwrap();
    let locations: Vec<String> = (0..3)
        .map(|f| frame(&config, f).get("bars.left").unwrap().grid_location().unwrap().to_string())
        .collect();
    assert_eq!(locations, ["a0", "a1", "a0"]);
}

#[test]
fn undeclared_argument_is_rejected() {
    let root = r#"
include:
  - uri: bars.yaml
    name: bars
create:
  - bars:
      shade: red
"#;
    let err = resolve(&[("root.yaml", root), ("bars.yaml", BARS), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0105");
    assert!(err.to_string().contains("shade"));
}

#[test]
fn unknown_targets_are_rejected() {
    let root = "include:\n  - uri: fill.yaml\n    name: top\ncreate:\n  - nope:\n      colour: red\n";
    let err = resolve(&[("root.yaml", root), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0104");
    assert!(err.to_string().contains("root.yaml:5"), "{err}");

    let dotted = "include:\n  - uri: fill.yaml\n    name: top\ncreate:\n  - top.inner:\n      colour: red\n";
    let err = resolve(&[("root.yaml", dotted), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0104");
}

#[test]
fn repeated_aliases_fail_at_resolve() {
    let aliased = "type: builtin.fill\ngrid:\n  location: a0\n  alias: robocorner\n";
    let root = "include:\n  - uri: w.yaml\n    name: one\n  - uri: w.yaml\n    name: two\ncreate: [{}]\n";
    let err = resolve(&[("root.yaml", root), ("w.yaml", aliased)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "0006 the alias robocorner is repeated, every alias is required to be unique"
    );
}

#[test]
fn repeated_include_names_fail() {
    let root = "include:\n  - uri: fill.yaml\n    name: a\n  - uri: fill.yaml\n    name: a\ncreate: [{}]\n";
    let err = resolve(&[("root.yaml", root), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0006");
}

#[test]
fn include_names_must_be_plain() {
    for name in ["\"\"", "a.b", "a[0]"] {
        let root = format!("include:\n  - uri: fill.yaml\n    name: {name}\ncreate: [{{}}]\n");
        let err = resolve(&[("root.yaml", root.as_str()), ("fill.yaml", FILL)]).unwrap_err();
        assert_eq!(err.code(), "0101", "{name}: {err}");
    }
    let root = "include:\n  - name: a\ncreate: [{}]\n";
    assert_eq!(resolve(&[("root.yaml", root)]).unwrap_err().code(), "0101");
}

#[test]
fn root_without_create_has_no_frames() {
    let err = resolve(&[("root.yaml", "include: []\n")]).unwrap_err();
    assert_eq!(err.to_string(), "0003 No frames declared in root.yaml");
    let err = resolve(&[("root.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0003");
}

#[test]
fn self_include_hits_the_depth_limit() {
    let root = "include:\n  - uri: root.yaml\n    name: again\ncreate: [{}]\n";
    let err = resolve(&[("root.yaml", root)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "0004 recursive set initialisation file detected, the maximum dotpath depth of 30 has been reached"
    );
}

#[test]
fn missing_include_is_an_io_error() {
    let root = "include:\n  - uri: gone.yaml\n    name: a\ncreate: [{}]\n";
    let err = resolve(&[("root.yaml", root)]).unwrap_err();
    assert!(err.to_string().starts_with("0001 open gone.yaml"), "{err}");
}

#[test]
fn base_dir_overrides_root_directory() {
    let files = loader(&[
        ("cards/root.yaml", "include:\n  - uri: fill.yaml\n    name: a\ncreate: [{}]\n"),
        ("shared/fill.yaml", FILL),
    ]);
    let config = resolve_factory("cards/root.yaml", Some(Path::new("shared")), &files).unwrap();
    assert_eq!(config.path(), "cards/root.yaml");
    assert!(resolve_factory("cards/root.yaml", None, &files).is_err());
}

#[test]
fn frame_index_is_bounded() {
    let config = resolve(&[("root.yaml", "include:\n  - uri: fill.yaml\n    name: a\ncreate: [{}]\n"), ("fill.yaml", FILL)]).unwrap();
    let err = config.frame_widgets(1, &AliasRegistry::new()).unwrap_err();
    assert_eq!(err.code(), "0102");
}

#[test]
fn frame_generation_registers_aliases() {
    let aliased = "type: builtin.fill\ngrid:\n  location: a0\n  alias: robocorner\n";
    let root = "include:\n  - uri: w.yaml\n    name: one\ncreate: [{}]\n";
    let config = resolve(&[("root.yaml", root), ("w.yaml", aliased)]).unwrap();
    let registry = AliasRegistry::new();
    config.frame_widgets(0, &registry).unwrap();
    assert_eq!(registry.get("robocorner").as_deref(), Some("a0"));
    // The same registry cannot take the frame twice.
    assert_eq!(config.frame_widgets(0, &registry).unwrap_err().code(), "0006");
}

#[test]
fn generate_expands_targets() {
    let root = r#"
args:
  - name: last
include:
  - uri: fill.yaml
    name: swatch
  - uri: fill.yaml
    name: after
create: [{}]
generate:
  - name:
      - i: row
      - c: colour
    range: ["[0:1]", "red,blue"]
    action:
      swatch:
        grid.location: ["a{{i}}", "b{{i}}"]
        grid.alias: ["sw{{i}}{{c}}"]
        colour: ["{{c}}"]
"#;
    let config = resolve(&[("root.yaml", root), ("fill.yaml", FILL)]).unwrap();
    let widgets = frame(&config, 0);
    assert_eq!(
        widgets.keys().collect::<Vec<_>>(),
        ["swatch[0,0]", "swatch[0,1]", "swatch[1,0]", "swatch[1,1]", "after"]
    );

    let w = widgets.get("swatch[1,0]").unwrap();
    assert_eq!(w.position, 0);
    assert_eq!(w.array_position, [1, 0]);
    assert_eq!(w.grid_location(), Some("a1"));
    assert_eq!(w.grid_alias(), Some("sw1red"));
    assert_eq!(w.data["colour"], json!("red"));
    assert_eq!(widgets.get("swatch[0,1]").unwrap().grid_location(), Some("b0"));
    assert_eq!(widgets.get("after").unwrap().position, 1);
}

#[test]
fn generate_uses_factory_arguments_in_ranges() {
    let root = r#"
include:
  - uri: grid.yaml
    name: g
create:
  - g:
      last: 2
"#;
    let grid = r#"
args:
  - name: last
include:
  - uri: fill.yaml
    name: cell
create: [{}]
generate:
  - name: [{i: index}]
    range: ["[0:{{last}}]"]
    action:
      cell:
        grid.alias: ["cell{{i}}"]
"#;
    let config = resolve(&[("root.yaml", root), ("grid.yaml", grid), ("fill.yaml", FILL)]).unwrap();
    let widgets = frame(&config, 0);
    assert_eq!(
        widgets.keys().collect::<Vec<_>>(),
        ["g.cell[0]", "g.cell[1]", "g.cell[2]"]
    );
}

#[test]
fn malformed_generate_rules_are_rejected() {
    let root = r#"
include:
  - uri: fill.yaml
    name: swatch
create: [{}]
generate:
  - name: [{i: row}]
    range: ["[0:1]", "a,b"]
    action:
      swatch:
        colour: ["x"]
"#;
    let err = resolve(&[("root.yaml", root), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0103");

    let unknown = root
        .replace("range: [\"[0:1]\", \"a,b\"]", "range: [\"[0:1]\"]")
        .replace("      swatch:", "      nothing:");
    let err = resolve(&[("root.yaml", unknown.as_str()), ("fill.yaml", FILL)]).unwrap_err();
    assert_eq!(err.code(), "0104");
}

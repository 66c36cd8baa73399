//! `{{arg}}` placeholders and dotted-path field updates.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Argument values visible to one factory.
pub type Args = BTreeMap<String, Value>;

/// Replace every `{{name}}` whose name is in `args`. Unknown placeholders stay as written.
pub fn substitute(template: &str, args: &Args) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let name = rest[open + 2..open + 2 + close].trim();
        out.push_str(&rest[..open]);
        match args.get(name) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => out.push_str(&rest[open..open + close + 4]),
        }
        rest = &rest[open + close + 4..];
    }
    out.push_str(rest);
    out
}

/// [`substitute`] applied to every string inside `value`.
pub fn substitute_value(value: &Value, args: &Args) -> Value {
    if args.is_empty() {
        return value.clone();
    }
    match value {
        Value::String(s) => Value::String(substitute(s, args)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute_value(v, args)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, args)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// One field write from a `create` entry or generate action.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    /// String field, placeholders filled on [`Update::bind`].
    Text { path: Vec<String>, template: String },
    /// Object merged key by key into the existing field.
    Merge {
        path: Vec<String>,
        fields: Map<String, Value>,
    },
    /// Any other value, written unchanged.
    Raw { path: Vec<String>, value: Value },
}

impl Update {
    /// Classify a field. `key` is a dotted path such as `grid.location`.
    pub fn parse(key: &str, value: Value) -> Self {
        let path = key.split('.').map(str::to_string).collect();
        match value {
            Value::String(template) => Update::Text { path, template },
            Value::Object(fields) => Update::Merge { path, fields },
            value => Update::Raw { path, value },
        }
    }

    /// Updates for a whole field map, in key order.
    pub fn parse_fields(fields: &Map<String, Value>) -> Vec<Update> {
        fields
            .iter()
            .map(|(k, v)| Update::parse(k, v.clone()))
            .collect()
    }

    pub fn path(&self) -> &[String] {
        match self {
            Update::Text { path, .. } | Update::Merge { path, .. } | Update::Raw { path, .. } => {
                path
            }
        }
    }

    /// The value this update writes.
    pub fn into_value(self) -> Value {
        match self {
            Update::Text { template, .. } => Value::String(template),
            Update::Merge { fields, .. } => Value::Object(fields),
            Update::Raw { value, .. } => value,
        }
    }

    /// Fill placeholders from `args`.
    pub fn bind(&self, args: &Args) -> Update {
        match self {
            Update::Text { path, template } => Update::Text {
                path: path.clone(),
                template: substitute(template, args),
            },
            Update::Merge { path, fields } => Update::Merge {
                path: path.clone(),
                fields: fields
                    .iter()
                    .map(|(k, v)| (k.clone(), substitute_value(v, args)))
                    .collect(),
            },
            Update::Raw { .. } => self.clone(),
        }
    }

    /// Write into `target`, creating intermediate objects along the path.
    pub fn apply(&self, target: &mut Map<String, Value>) {
        let path = self.path();
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut node = target;
        for key in parents {
            let slot = node
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                return;
            };
            node = next;
        }

        match self {
            Update::Text { template, .. } => {
                node.insert(last.clone(), Value::String(template.clone()));
            }
            Update::Raw { value, .. } => {
                node.insert(last.clone(), value.clone());
            }
            Update::Merge { fields, .. } => match node.get_mut(last) {
                Some(Value::Object(existing)) => {
                    for (k, v) in fields {
                        existing.insert(k.clone(), v.clone());
                    }
                }
                _ => {
                    node.insert(last.clone(), Value::Object(fields.clone()));
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/template.rs"]
mod tests;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::foundation::error::{CardError, CardResult};

/// Top-level keys that make a document a factory.
const FACTORY_KEYS: [&str; 4] = ["include", "args", "create", "generate"];

/// One parsed configuration document.
#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    /// Includes, arguments, create updates and generate rules.
    Factory(Factory),
    /// A widget payload, kept as written.
    Widget(Map<String, Value>),
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// Factory document.
pub struct Factory {
    /// Child documents in compositing order.
    #[serde(default)]
    pub include: Vec<Include>,
    /// Arguments the factory accepts from its parent.
    #[serde(default)]
    pub args: Vec<ArgDecl>,
    /// One entry per frame: target dotpath to field map.
    #[serde(default)]
    pub create: Vec<BTreeMap<String, Map<String, Value>>>,
    /// Widget generation rules.
    #[serde(default)]
    pub generate: Vec<GenerateRule>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// Reference to a child document.
pub struct Include {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// Declared factory argument.
pub struct ArgDecl {
    pub name: String,
    /// Informational type name; values are not checked against it.
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// Cartesian widget generation.
pub struct GenerateRule {
    /// One `{variable: description}` map per dimension.
    #[serde(default)]
    pub name: Vec<Map<String, Value>>,
    /// One range expression per dimension.
    #[serde(default)]
    pub range: Vec<String>,
    /// Target to field to template list.
    #[serde(default)]
    pub action: BTreeMap<String, BTreeMap<String, Vec<Value>>>,
}

impl Factory {
    /// True when `name` is a declared argument.
    pub fn declares(&self, name: &str) -> bool {
        self.args.iter().any(|a| a.name == name)
    }
}

impl GenerateRule {
    /// Variable names, one per dimension.
    pub fn variables(&self) -> Result<Vec<String>, String> {
        self.name
            .iter()
            .map(|entry| {
                let mut keys = entry.keys();
                match (keys.next(), keys.next()) {
                    (Some(k), None) if !k.is_empty() => Ok(k.clone()),
                    _ => Err(format!(
                        "each name entry needs exactly one variable, found {}",
                        entry.len()
                    )),
                }
            })
            .collect()
    }
}

/// Decode document bytes. JSON is accepted as YAML.
pub fn decode_document(path: &str, bytes: &[u8]) -> CardResult<Document> {
    let text = std::str::from_utf8(bytes).map_err(|e| CardError::NonUtf8 {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    let value: Value =
        serde_yaml::from_str(text).map_err(|e| CardError::unmarshal(path, e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(CardError::unmarshal(
            path,
            format!("expected a mapping at the document root, found {}", kind_of(&value)),
        ));
    };

    if !FACTORY_KEYS.iter().any(|k| map.contains_key(*k)) {
        return Ok(Document::Widget(map));
    }
    let factory: Factory = serde_json::from_value(Value::Object(map))
        .map_err(|e| CardError::unmarshal(path, e.to_string()))?;
    Ok(Document::Factory(factory))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/factory/model.rs"]
mod tests;

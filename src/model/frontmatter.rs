use indexmap::IndexMap;
use serde_yaml_ng::{Mapping, Number, Value};

/// A decoded document header, in source key order.
///
/// Key order is kept so that rewriting a header only moves the lines that
/// actually changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: IndexMap<String, Value>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Frontmatter::default()
    }

    /// Build from a decoded YAML mapping. Non-string keys are stringified.
    pub fn from_mapping(mapping: Mapping) -> Self {
        let entries = mapping
            .into_iter()
            .map(|(key, value)| (key_text(&key), value))
            .collect();
        Frontmatter { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set a field. Existing keys keep their position; new keys are appended.
    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.set(key, Value::String(value.to_string()));
    }

    pub fn set_number(&mut self, key: &str, value: f64) {
        self.set(key, Value::Number(Number::from(value)));
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scalar field as text; blank and null values read as absent.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(scalar_text)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// The `order:` key, or `0` when missing or not a finite number.
    pub fn order(&self) -> f64 {
        let parsed = match self.get("order") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// The `tags:` field as a list. A bare scalar counts as a single tag.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

/// Text of a scalar value; `None` for null, sequences and mappings.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::Null => "null".to_string(),
        other => scalar_text(other).unwrap_or_else(|| format!("{:?}", other)),
    }
}

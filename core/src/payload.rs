//! Outbound payload shapes.
//!
//! # Design
//! The event-triggered path sends an arbitrary key-to-value mapping, modelled
//! as a JSON object so callers can hand over whatever structure they already
//! have. It is URL-encoded the way browser form helpers do it: nested objects
//! become `key[sub]`, scalar arrays become `key[]`.
//!
//! The form path sends either a `FieldSet` (the structured, multipart-capable
//! view of a form) or the form's URL-encoded serialization as a plain string.

use serde_json::{Map, Value};

use crate::error::AjaxError;

/// Arbitrary key-to-value payload for the event-triggered path.
pub type Payload = Map<String, Value>;

/// URL-encode a payload into a request body.
pub fn encode_payload(payload: &Payload) -> Result<String, AjaxError> {
    let mut pairs = Vec::new();
    for (key, value) in payload {
        flatten(key, value, &mut pairs);
    }
    serde_urlencoded::to_string(&pairs).map_err(|e| AjaxError::Serialization(e.to_string()))
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => out.push((prefix.to_string(), String::new())),
        Value::Bool(b) => out.push((prefix.to_string(), b.to_string())),
        Value::Number(n) => out.push((prefix.to_string(), n.to_string())),
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let key = if item.is_object() || item.is_array() {
                    format!("{prefix}[{index}]")
                } else {
                    format!("{prefix}[]")
                };
                flatten(&key, item, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten(&format!("{prefix}[{key}]"), item, out);
            }
        }
    }
}

/// A single value in a `FieldSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File {
        filename: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Ordered multipart field set built from a form's current values.
///
/// Duplicate names are allowed, as in a real form (checkbox groups,
/// multi-selects). `set` collapses duplicates of one name into a single entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<(String, FieldValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field after all existing ones.
    pub fn append(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.push((name.to_string(), value.into()));
    }

    /// Replace the first field named `name` in place and drop any later
    /// duplicates. Appends when the name is not present.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter().position(|(n, _)| n == name) {
            Some(first) => {
                self.fields[first].1 = value;
                let mut index = 0;
                self.fields.retain(|(n, _)| {
                    let keep = index <= first || n != name;
                    index += 1;
                    keep
                });
            }
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Text value of the first field named `name`; `None` for files.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn count(&self, name: &str) -> usize {
        self.fields.iter().filter(|(n, _)| n == name).count()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Encode as a `multipart/form-data` body delimited by `boundary`.
    pub fn encode_multipart(&self, boundary: &str) -> Vec<u8> {
        let mut out = Vec::new();
        for (name, value) in &self.fields {
            let name = escape_quoted(name);
            out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match value {
                FieldValue::Text(text) => {
                    out.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    out.extend_from_slice(text.as_bytes());
                }
                FieldValue::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    let filename = escape_quoted(filename);
                    out.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    out.extend_from_slice(bytes);
                }
            }
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
        out
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Browsers percent-escape quotes and line breaks inside disposition params.
fn escape_quoted(raw: &str) -> String {
    raw.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

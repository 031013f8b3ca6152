//! JSON codec for notes.
//!
//! Encoding writes an explicit field whitelist (`id`, `title`, `content`), so
//! schema changes never leak into the wire format. Decoding validates a
//! request body against the writable fields and collects every violation.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Note, NoteDraft, TITLE_MAX_CHARS};

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_NOT_A_STRING: &str = "Not a valid string.";
pub const MSG_BLANK: &str = "This field may not be blank.";

/// Wire representation of a note.
#[derive(Debug, Serialize)]
pub struct NoteBody<'a> {
    pub id: i64,
    pub title: &'a str,
    pub content: &'a str,
}

pub fn encode(note: &Note) -> NoteBody<'_> {
    NoteBody {
        id: note.id,
        title: &note.title,
        content: &note.content,
    }
}

pub fn encode_all(notes: &[Note]) -> Vec<NoteBody<'_>> {
    notes.iter().map(encode).collect()
}

/// Per-field validation messages, kept in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, Vec<String>)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.0.push((field, vec![message])),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("JSON parse error - {0}")]
    Malformed(String),
    #[error("Invalid data. Expected a dictionary, but got {0}.")]
    NotAnObject(&'static str),
    #[error("{0}")]
    Invalid(FieldErrors),
}

/// Parse a raw request body. An empty body reads as an empty object.
pub fn parse_body(bytes: &[u8]) -> Result<Value, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Validate a full set of writable note fields. `id` and unknown keys are ignored.
pub fn decode_draft(body: &Value) -> Result<NoteDraft, CodecError> {
    let object = match body {
        Value::Object(object) => object,
        other => return Err(CodecError::NotAnObject(json_type_name(other))),
    };

    let mut errors = FieldErrors::default();
    let title = text_field(object, "title", Some(TITLE_MAX_CHARS), &mut errors);
    let content = text_field(object, "content", None, &mut errors);

    match (title, content) {
        (Some(title), Some(content)) => Ok(NoteDraft::new(title, content)),
        _ => Err(CodecError::Invalid(errors)),
    }
}

/// Surrounding whitespace is trimmed before the blank and length checks, and in the stored value.
fn text_field(
    object: &Map<String, Value>,
    name: &'static str,
    max_chars: Option<usize>,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = match object.get(name) {
        None => {
            errors.add(name, MSG_REQUIRED);
            return None;
        }
        Some(Value::Null) => {
            errors.add(name, MSG_NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errors.add(name, MSG_NOT_A_STRING);
            return None;
        }
    };

    if value.is_empty() {
        errors.add(name, MSG_BLANK);
        return None;
    }

    if let Some(max) = max_chars {
        if value.chars().count() > max {
            errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }

    Some(value.to_string())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Field paths over Move object content.
//!
//! Nested Move structs are rendered by the node as `{type, fields: {...}}`.
//! Path segments name logical Move fields, so a wrapped struct is entered
//! through its `fields` map without the caller spelling it out.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for an empty path or an empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field path '{0}'")]
pub struct FieldPathError(pub String);

/// Ordered field names leading from an object's content to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Result<Self, FieldPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(FieldPathError(segments.join(".")));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split('.'))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Field map of a struct value, unwrapping the `{type, fields}` rendering.
fn struct_fields(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    match map.get("fields") {
        Some(Value::Object(inner)) if map.contains_key("type") => Some(inner),
        _ => Some(map),
    }
}

/// Identifier carried by a value: a plain string, or a UID/ID wrapper `{id: ...}`.
fn leaf_identifier(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(_) => struct_fields(value)?.get("id").and_then(leaf_identifier),
        _ => None,
    }
}

/// Outcome of walking a path that did not end on an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMiss {
    /// The segment at this depth is absent.
    MissingSegment(String),
    /// Every segment exists but the leaf is not identifier-shaped.
    NotAnIdentifier,
}

/// Walk `path` from the root content `fields` and return the identifier at its end.
pub fn resolve_identifier<'a>(fields: &'a Value, path: &FieldPath) -> Result<&'a str, PathMiss> {
    let mut current = fields;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = struct_fields(current)
            .and_then(|map| map.get(segment))
            .ok_or_else(|| PathMiss::MissingSegment(path.segments()[..=depth].join(".")))?;
    }
    leaf_identifier(current).ok_or(PathMiss::NotAnIdentifier)
}

//! Dotted/indexed path access into JSON values.
//!
//! A `PathSpec` names one location inside a `serde_json::Value` using dot and
//! bracket notation (`user.name`, `items[2].id`). Reading walks the value;
//! writing creates the intermediate objects and arrays the path implies.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while parsing or applying a path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string is empty
    #[error("empty path")]
    Empty,

    /// A segment is empty (leading, trailing, or doubled separator)
    #[error("empty path segment at byte {0}")]
    EmptySegment(usize),

    /// A bracket index is not an unsigned integer
    #[error("invalid index '{0}'")]
    InvalidIndex(String),

    /// A `[` has no matching `]`
    #[error("unclosed '[' in path")]
    UnclosedBracket,

    /// A write descended into a value that cannot hold the segment
    #[error("cannot write segment '{segment}' through a {found} value")]
    Incompatible {
        segment: String,
        found: &'static str,
    },
}

/// One parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access by key
    Key(String),
    /// Array element access by index
    Index(usize),
}

/// A parsed output path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct PathSpec {
    raw: String,
    segments: Vec<Segment>,
}

impl PathSpec {
    /// Parse a path from dot/bracket notation.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        let bytes = s.as_bytes();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < s.len() {
            match bytes[i] {
                // A '.' at the start of a segment means the segment is missing.
                b'.' => return Err(PathError::EmptySegment(i)),
                b'[' => {
                    let close = s[i + 1..].find(']').ok_or(PathError::UnclosedBracket)? + i + 1;
                    let digits = &s[i + 1..close];
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| PathError::InvalidIndex(digits.to_string()))?;
                    segments.push(Segment::Index(index));
                    i = close + 1;
                    i = Self::skip_separator(s, i)?;
                }
                _ => {
                    let start = i;
                    while i < s.len() && bytes[i] != b'.' && bytes[i] != b'[' {
                        i += 1;
                    }
                    segments.push(Segment::Key(s[start..i].to_string()));
                    if i < s.len() && bytes[i] == b'.' {
                        i = Self::skip_separator(s, i)?;
                    }
                }
            }
        }

        Ok(Self {
            raw: s.to_string(),
            segments,
        })
    }

    fn skip_separator(s: &str, i: usize) -> Result<usize, PathError> {
        if i < s.len() && s.as_bytes()[i] == b'.' {
            if i + 1 == s.len() {
                return Err(PathError::EmptySegment(i + 1));
            }
            return Ok(i + 1);
        }
        Ok(i)
    }

    /// The original path string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Read the value at this path, if present.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.get(key.as_str())?,
                Segment::Index(index) => current.get(*index)?,
            };
        }
        Some(current)
    }

    /// Write `value` at this path, creating intermediate objects and arrays
    /// as the segments imply. Arrays are padded with nulls up to the written
    /// index. Writing through an incompatible existing value is an error.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        let Some((last, init)) = self.segments.split_last() else {
            return Err(PathError::Empty);
        };

        let mut current = root;
        for segment in init {
            current = descend(current, segment)?;
        }

        match last {
            Segment::Key(key) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Object(map) => {
                        map.insert(key.clone(), value);
                        Ok(())
                    }
                    other => Err(PathError::Incompatible {
                        segment: key.clone(),
                        found: json_kind(other),
                    }),
                }
            }
            Segment::Index(index) => {
                if current.is_null() {
                    *current = Value::Array(Vec::new());
                }
                match current {
                    Value::Array(items) => {
                        if items.len() <= *index {
                            items.resize(*index + 1, Value::Null);
                        }
                        items[*index] = value;
                        Ok(())
                    }
                    other => Err(PathError::Incompatible {
                        segment: index.to_string(),
                        found: json_kind(other),
                    }),
                }
            }
        }
    }
}

/// Walk one segment down, materializing the container the segment implies
/// when the slot is still null.
fn descend<'a>(current: &'a mut Value, segment: &Segment) -> Result<&'a mut Value, PathError> {
    match segment {
        Segment::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => Ok(map.entry(key.as_str()).or_insert(Value::Null)),
                other => Err(PathError::Incompatible {
                    segment: key.clone(),
                    found: json_kind(other),
                }),
            }
        }
        Segment::Index(index) => {
            if current.is_null() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(items) => {
                    if items.len() <= *index {
                        items.resize(*index + 1, Value::Null);
                    }
                    Ok(&mut items[*index])
                }
                other => Err(PathError::Incompatible {
                    segment: index.to_string(),
                    found: json_kind(other),
                }),
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FromStr for PathSpec {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathSpec::parse(s)
    }
}

impl TryFrom<String> for PathSpec {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PathSpec::parse(&s)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

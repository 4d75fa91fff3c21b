//! Request body validation.
//!
//! Inbound bodies are parsed to a [`serde_json::Value`] first and then read
//! field by field, so a malformed body reports *every* violated field in one
//! response instead of stopping at the first bad one the way a plain
//! `serde` derive would.
//!
//! Resource types opt in by implementing [`FromBody`] with an
//! [`ObjectReader`]:
//!
//! ```
//! use pet_store_core::validation::{FromBody, Loc, ObjectReader};
//! use pet_store_core::FieldError;
//! use serde_json::{Value, json};
//!
//! struct Tag {
//!     label: String,
//! }
//!
//! impl FromBody for Tag {
//!     fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
//!         let mut reader = ObjectReader::new(value, loc);
//!         let label = reader.string("label");
//!         match label {
//!             Some(label) if reader.is_clean() => Ok(Self { label }),
//!             _ => Err(reader.into_errors()),
//!         }
//!     }
//! }
//!
//! assert!(Tag::from_body(&json!({"label": "x"}), &Loc::body()).is_ok());
//! assert!(Tag::from_body(&json!({"label": 1}), &Loc::body()).is_err());
//! ```

use core::fmt;

use chrono::DateTime;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// One segment of an error location: a field name or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for LocSegment {
    fn from(field: &str) -> Self {
        Self::Field(field.to_owned())
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside a request, e.g. `body.3.username`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Loc(Vec<LocSegment>);

impl Loc {
    /// Root of a request body.
    #[must_use]
    pub fn body() -> Self {
        Self(vec![LocSegment::from("body")])
    }

    /// Root of the query string.
    #[must_use]
    pub fn query_string() -> Self {
        Self(vec![LocSegment::from("query")])
    }

    /// A named query-string parameter.
    #[must_use]
    pub fn query(name: &str) -> Self {
        Self(vec![LocSegment::from("query"), LocSegment::from(name)])
    }

    /// A named path parameter.
    #[must_use]
    pub fn path(name: &str) -> Self {
        Self(vec![LocSegment::from("path"), LocSegment::from(name)])
    }

    /// This location extended by one more segment.
    #[must_use]
    pub fn join(&self, segment: impl Into<LocSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The segments making up this location.
    #[must_use]
    pub fn segments(&self) -> &[LocSegment] {
        &self.0
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Category of a validation failure, serialized in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    StringType,
    IntType,
    BoolType,
    DictType,
    ListType,
    DatetimeType,
    JsonInvalid,
    ValueError,
}

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Loc,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

impl FieldError {
    /// Create a field error at `loc`.
    #[must_use]
    pub fn new(loc: Loc, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind,
        }
    }

    /// A required value that was not supplied.
    #[must_use]
    pub fn missing(loc: Loc) -> Self {
        Self::new(loc, ErrorKind::Missing, "Field required")
    }
}

/// Every field error collected while validating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{} validation error(s), first at {}", .0.len(), first_loc(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn first_loc(errors: &[FieldError]) -> String {
    errors
        .first()
        .map_or_else(String::new, |error| error.loc.to_string())
}

impl ValidationErrors {
    /// Wrap a list of field errors.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// A single field error.
    #[must_use]
    pub fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    /// The collected errors, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no errors were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self::single(error)
    }
}

/// A type that can be built from an untyped JSON body.
pub trait FromBody: Sized {
    /// Validate `value` (located at `loc`) and build `Self`.
    ///
    /// # Errors
    ///
    /// Returns every violated field found under `loc`.
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>>;
}

impl<T: FromBody> FromBody for Vec<T> {
    fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
        let Value::Array(items) = value else {
            return Err(vec![FieldError::new(
                loc.clone(),
                ErrorKind::ListType,
                "Input should be a valid list",
            )]);
        };

        let mut parsed = Self::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match T::from_body(item, &loc.join(index)) {
                Ok(value) => parsed.push(value),
                Err(mut item_errors) => errors.append(&mut item_errors),
            }
        }

        if errors.is_empty() {
            Ok(parsed)
        } else {
            Err(errors)
        }
    }
}

/// Parse raw body bytes as JSON and validate them into `T`.
///
/// An empty body is reported as a missing body; anything that is not JSON is
/// reported as `json_invalid` at the body root.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every violation.
pub fn parse_body<T: FromBody>(bytes: &[u8]) -> Result<T, ValidationErrors> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FieldError::missing(Loc::body()).into());
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|e| {
        FieldError::new(
            Loc::body(),
            ErrorKind::JsonInvalid,
            format!("JSON decode error: {e}"),
        )
    })?;

    T::from_body(&value, &Loc::body()).map_err(ValidationErrors::new)
}

/// Reads typed fields out of a JSON object, recording a [`FieldError`] for
/// each field that is missing or has the wrong type.
///
/// Every accessor returns `None` on failure so that callers can keep reading
/// the remaining fields and report them all together.
pub struct ObjectReader<'a> {
    object: Option<&'a Map<String, Value>>,
    loc: Loc,
    errors: Vec<FieldError>,
}

impl<'a> ObjectReader<'a> {
    /// Start reading `value`, which must be a JSON object.
    #[must_use]
    pub fn new(value: &'a Value, loc: &Loc) -> Self {
        let mut errors = Vec::new();
        let object = value.as_object();
        if object.is_none() {
            errors.push(FieldError::new(
                loc.clone(),
                ErrorKind::DictType,
                "Input should be a valid dictionary or object",
            ));
        }
        Self {
            object,
            loc: loc.clone(),
            errors,
        }
    }

    /// Whether no field errors have been recorded so far.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The recorded field errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    fn lookup(&self, names: &[&str]) -> Option<&'a Value> {
        let object = self.object?;
        names.iter().find_map(|name| object.get(*name))
    }

    fn require(&mut self, names: &[&str]) -> Option<&'a Value> {
        // Not an object: the dict_type error already covers every field.
        self.object?;
        let value = self.lookup(names);
        if value.is_none() {
            let field = names.first().copied().unwrap_or_default();
            self.errors.push(FieldError::missing(self.loc.join(field)));
        }
        value
    }

    fn reject(&mut self, field: &str, kind: ErrorKind, msg: &str) {
        self.errors
            .push(FieldError::new(self.loc.join(field), kind, msg));
    }

    /// A required string field.
    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.require(&[field])? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.reject(field, ErrorKind::StringType, "Input should be a valid string");
                None
            }
        }
    }

    /// A required integer field.
    pub fn integer(&mut self, field: &str) -> Option<i64> {
        self.integer_aliased(&[field])
    }

    /// A required integer field that may arrive under any of `names`; errors
    /// are reported under the first name.
    pub fn integer_aliased(&mut self, names: &[&str]) -> Option<i64> {
        let field = names.first().copied().unwrap_or_default();
        let value = self.require(names)?;
        let parsed = value.as_i64();
        if parsed.is_none() {
            self.reject(field, ErrorKind::IntType, "Input should be a valid integer");
        }
        parsed
    }

    /// An optional integer field falling back to `default` when absent.
    pub fn integer_or(&mut self, field: &str, default: i64) -> Option<i64> {
        match self.lookup(&[field]) {
            None => self.object.map(|_| default),
            Some(value) => {
                let parsed = value.as_i64();
                if parsed.is_none() {
                    self.reject(field, ErrorKind::IntType, "Input should be a valid integer");
                }
                parsed
            }
        }
    }

    /// A required boolean field.
    pub fn boolean(&mut self, field: &str) -> Option<bool> {
        let value = self.require(&[field])?;
        let parsed = value.as_bool();
        if parsed.is_none() {
            self.reject(field, ErrorKind::BoolType, "Input should be a valid boolean");
        }
        parsed
    }

    /// A required RFC 3339 timestamp, kept verbatim as submitted.
    pub fn timestamp(&mut self, field: &str) -> Option<String> {
        let raw = self.string(field)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(_) => Some(raw),
            Err(e) => {
                self.reject(
                    field,
                    ErrorKind::DatetimeType,
                    &format!("Input should be a valid datetime, {e}"),
                );
                None
            }
        }
    }

    /// A required object whose values are each an integer or a string.
    ///
    /// Key order is preserved.
    pub fn scalar_map<V>(
        &mut self,
        field: &str,
        convert: impl Fn(&Value) -> Option<V>,
    ) -> Option<IndexMap<String, V>> {
        let value = self.require(&[field])?;
        let Value::Object(entries) = value else {
            self.reject(
                field,
                ErrorKind::DictType,
                "Input should be a valid dictionary",
            );
            return None;
        };

        let mut map = IndexMap::with_capacity(entries.len());
        let mut clean = true;
        for (key, entry) in entries {
            if let Some(converted) = convert(entry) {
                map.insert(key.clone(), converted);
            } else {
                clean = false;
                self.errors.push(FieldError::new(
                    self.loc.join(field).join(key.as_str()),
                    ErrorKind::IntType,
                    "Input should be a valid integer or string",
                ));
            }
        }
        clean.then_some(map)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug)]
    struct Animal {
        name: String,
        age: i64,
    }

    impl FromBody for Animal {
        fn from_body(value: &Value, loc: &Loc) -> Result<Self, Vec<FieldError>> {
            let mut reader = ObjectReader::new(value, loc);
            let name = reader.string("name");
            let age = reader.integer("age");
            match (name, age) {
                (Some(name), Some(age)) if reader.is_clean() => Ok(Self { name, age }),
                _ => Err(reader.into_errors()),
            }
        }
    }

    #[test]
    fn test_parse_body_valid() {
        let animal: Animal = parse_body(br#"{"name": "Rex", "age": 4}"#).unwrap();
        assert_eq!(animal.name, "Rex");
        assert_eq!(animal.age, 4);
    }

    #[test]
    fn test_parse_body_not_json() {
        let err = parse_body::<Animal>(b"Not a JSON").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::JsonInvalid);
        assert_eq!(err.errors()[0].loc, Loc::body());
    }

    #[test]
    fn test_parse_body_empty_is_missing() {
        let err = parse_body::<Animal>(b"  ").unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::Missing);
    }

    #[test]
    fn test_reports_every_bad_field() {
        let err = parse_body::<Animal>(br#"{"age": "old"}"#).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.errors()[0].loc.to_string(), "body.name");
        assert_eq!(err.errors()[0].kind, ErrorKind::Missing);
        assert_eq!(err.errors()[1].loc.to_string(), "body.age");
        assert_eq!(err.errors()[1].kind, ErrorKind::IntType);
    }

    #[test]
    fn test_non_object_reports_once() {
        let err = parse_body::<Animal>(b"[1, 2]").unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].kind, ErrorKind::DictType);
    }

    #[test]
    fn test_list_errors_carry_index() {
        let err =
            parse_body::<Vec<Animal>>(br#"[{"name": "a", "age": 1}, {"name": 2, "age": 1}]"#)
                .unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].loc.to_string(), "body.1.name");
    }

    #[test]
    fn test_list_body_must_be_array() {
        let err = parse_body::<Vec<Animal>>(br#"{"name": "a"}"#).unwrap_err();
        assert_eq!(err.errors()[0].kind, ErrorKind::ListType);
    }

    #[test]
    fn test_integer_or_defaults_when_absent() {
        let value = json!({});
        let mut reader = ObjectReader::new(&value, &Loc::body());
        assert_eq!(reader.integer_or("level", 0), Some(0));
        assert!(reader.is_clean());
    }

    #[test]
    fn test_integer_aliased_accepts_second_name() {
        let value = json!({"petId": 5});
        let mut reader = ObjectReader::new(&value, &Loc::body());
        assert_eq!(reader.integer_aliased(&["pet_id", "petId"]), Some(5));
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let value = json!({"when": "tomorrow"});
        let mut reader = ObjectReader::new(&value, &Loc::body());
        assert!(reader.timestamp("when").is_none());
        assert_eq!(reader.into_errors()[0].kind, ErrorKind::DatetimeType);
    }

    #[test]
    fn test_field_error_serializes_like_detail_entry() {
        let error = FieldError::missing(Loc::body().join("name"));
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            json!({"loc": ["body", "name"], "msg": "Field required", "type": "missing"})
        );
    }

    #[test]
    fn test_loc_serializes_indices_as_numbers() {
        let loc = Loc::body().join(2_usize).join("email");
        assert_eq!(serde_json::to_value(&loc).unwrap(), json!(["body", 2, "email"]));
    }
}

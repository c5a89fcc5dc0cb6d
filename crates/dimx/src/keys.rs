//! 🔑 Key normalizer: because `appName`, `AppName` and `APPNAME` are the same field
//! and nobody told the people writing the configs.
//!
//! 🎬 COLD OPEN. INT. CONFIG REPO. SOMEONE'S THIRD RENAME OF `resQuotasDev`
//!
//! The configs were hand written. By many hands. Over many years. Some of them
//! had caps lock on. This module builds a lowercase index over an object's own
//! keys once, then answers lookups from it. No fixed casing is assumed; whatever
//! the object actually contains is what we match against.
//!
//! 🧠 Knowledge graph:
//! - [`ConfigBlock`] owns the decoded `config` object of a microservice. The block
//!   may arrive as an object or as a JSON string that needs a second parse.
//! - [`ConfigAccessor`] borrows any JSON object and does the case-insensitive reads.
//! - List-typed fields (`secrets`, `configMaps`, `volumes`) default to an empty
//!   list when absent. Everything else defaults to null. 🦆

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::warn;

/// 📋 Fields that are sequences by contract. Absent means "empty list", not "null".
pub const LIST_FIELDS: [&str; 3] = ["secrets", "configMaps", "volumes"];

const EMPTY_LIST: &[Value] = &[];

/// 🔍 Case-insensitive, read-only view over a JSON object.
///
/// The index is built once in [`ConfigAccessor::new`]. When two keys collide after
/// lowercasing, the first one in document order wins.
#[derive(Debug, Clone, Default)]
pub struct ConfigAccessor<'a> {
    index: HashMap<String, &'a Value>,
}

impl<'a> ConfigAccessor<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        let mut index = HashMap::with_capacity(object.len());
        for (key, value) in object {
            index.entry(key.to_lowercase()).or_insert(value);
        }
        Self { index }
    }

    /// 🫥 Accessor over nothing. Every lookup misses, every list is empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 🪞 Accessor over `value` if it is an object, otherwise the empty accessor.
    pub fn of(value: &'a Value) -> Self {
        match value.as_object() {
            Some(object) => Self::new(object),
            None => Self::empty(),
        }
    }

    /// 🎯 Raw hit, or `None` when the object has no such key in any casing.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.index.get(&key.to_lowercase()).copied()
    }

    /// 📦 Lookup with defaults applied: an empty list for [`LIST_FIELDS`], null otherwise.
    pub fn lookup(&self, key: &str) -> Cow<'a, Value> {
        match self.get(key) {
            Some(value) => Cow::Borrowed(value),
            None if is_list_field(key) => Cow::Owned(Value::Array(Vec::new())),
            None => Cow::Owned(Value::Null),
        }
    }

    /// 📚 The value as a slice of elements. Missing or non-list values read as empty.
    pub fn list(&self, key: &str) -> &'a [Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => EMPTY_LIST,
        }
    }

    /// 🔤 Rendered text of a present, non-null value.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_text(value)),
        }
    }

    /// ✅ A strict boolean. Strings like `"true"` do not count.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }
}

fn is_list_field(key: &str) -> bool {
    LIST_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(key))
}

/// 🧱 The decoded `config` block of one microservice.
///
/// Owns its object so a config that arrived as an embedded JSON string can be
/// parsed once and then borrowed by a [`ConfigAccessor`] like any other object.
#[derive(Debug, Clone, Default)]
pub struct ConfigBlock {
    object: Map<String, Value>,
}

impl ConfigBlock {
    /// 🔧 Decode a raw `config` value.
    ///
    /// - object → used as is
    /// - string → parsed as JSON; parse failures and non-object payloads are
    ///   logged and the block is treated as empty
    /// - absent, null or anything else → empty
    pub fn decode(raw: Option<&Value>, origin: &str) -> Self {
        let object = match raw {
            Some(Value::Object(object)) => object.clone(),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(object)) => object,
                Ok(other) => {
                    warn!(
                        "⚠️ config of {} decoded to {} instead of an object, treating it as empty",
                        origin,
                        json_kind(&other)
                    );
                    Map::new()
                }
                Err(err) => {
                    warn!(
                        "⚠️ config of {} is a string that refuses to be JSON ({}), treating it as empty",
                        origin, err
                    );
                    Map::new()
                }
            },
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                warn!(
                    "⚠️ config of {} is {} instead of an object, treating it as empty",
                    origin,
                    json_kind(other)
                );
                Map::new()
            }
        };
        Self { object }
    }

    pub fn accessor(&self) -> ConfigAccessor<'_> {
        ConfigAccessor::new(&self.object)
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }
}

/// 🖨️ How a JSON scalar lands in a CSV cell. Null is an empty cell, booleans are
/// `True`/`False`, strings go in verbatim, containers are re-serialized.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => bool_text(*flag).to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

pub fn bool_text(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// 🤔 Loose truthiness: null, false, zero, and empty strings or containers are all "nothing here".
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// src/collector/json.rs
//! Normalization of raw smartctl output into a queryable document.

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// One normalized diagnostic snapshot for a device.
///
/// The document is immutable and shared, so handing a cached reading to
/// several callers never copies the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Reading(Arc<Value>);

/// Typed view of one entry in `smartctl.messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub severity: &'a str,
    pub text: &'a str,
}

/// Function to turn arbitrary bytes into a reading.
///
/// Input that is not valid JSON yields the empty object; this never fails.
/// Invalid UTF-8 inside strings is replaced rather than rejecting the
/// whole document.
pub fn normalize(raw: impl AsRef<[u8]>) -> Reading {
    let text = String::from_utf8_lossy(raw.as_ref());
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Reading::from(value),
        Err(_) => Reading::empty(),
    }
}

impl Reading {
    /// The empty object `{}`.
    pub fn empty() -> Self {
        Reading(Arc::new(Value::Object(Map::new())))
    }

    /// True iff the document is an empty object.
    pub fn is_empty(&self) -> bool {
        matches!(self.0.as_ref(), Value::Object(map) if map.is_empty())
    }

    /// JSON-pointer lookup, e.g. `/smartctl/exit_status`.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        self.0.pointer(path)
    }

    /// `smartctl.exit_status` as an integer.
    ///
    /// Numeric strings are parsed and `true` reads as 1; a missing or
    /// otherwise non-numeric field reads as 0.
    pub fn exit_status(&self) -> i64 {
        match self.pointer("/smartctl/exit_status") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(0)
            }
            Some(Value::Bool(true)) => 1,
            _ => 0,
        }
    }

    /// Entries of `smartctl.messages`, in document order.
    pub fn messages(&self) -> impl Iterator<Item = Message<'_>> {
        self.pointer("/smartctl/messages")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|m| Message {
                severity: m.get("severity").and_then(Value::as_str).unwrap_or(""),
                text: m.get("string").and_then(Value::as_str).unwrap_or(""),
            })
    }

    /// Device names listed by a `--scan` reading.
    pub fn device_names(&self) -> Vec<String> {
        self.pointer("/devices")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|d| d.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

impl From<Value> for Reading {
    fn from(value: Value) -> Self {
        Reading(Arc::new(value))
    }
}

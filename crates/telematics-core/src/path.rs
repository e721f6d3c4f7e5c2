//! Key-path extraction over telemetry trees.
//!
//! Backend status documents are deeply nested and sparsely populated. Every
//! read goes through [`extract`], which walks a key sequence through nested
//! objects and coerces the terminal value, so a missing branch, a `null` or
//! an unexpected scalar type all come back as `None`.

use serde_json::Value;

use crate::error::{kind_name, CoreError, CoreResult};

/// Typed coercion applied to the terminal node of a path.
///
/// Implementations return `None` instead of failing when the value has the
/// wrong shape.
pub trait FromTelemetry: Sized {
    /// Convert a non-null terminal value
    fn from_telemetry(value: &Value) -> Option<Self>;
}

impl FromTelemetry for f64 {
    fn from_telemetry(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromTelemetry for i64 {
    fn from_telemetry(value: &Value) -> Option<Self> {
        let number = value.as_number()?;
        number.as_i64().or_else(|| {
            // Backends occasionally send whole numbers as `45.0`
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        })
    }
}

impl FromTelemetry for bool {
    fn from_telemetry(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            _ => None,
        }
    }
}

impl FromTelemetry for String {
    fn from_telemetry(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

/// Walk `path` through nested objects and return the terminal node.
///
/// Returns `None` when any step is missing, not an object, or `null`.
/// An empty path returns the tree itself.
///
/// ```
/// # use telematics_core::path::node;
/// # use serde_json::json;
/// let tree = json!({"a": {"b": {"c": 1}}, "n": null});
/// assert_eq!(node(&tree, &["a", "b", "c"]), Some(&json!(1)));
/// assert_eq!(node(&tree, &["a", "x", "c"]), None);
/// assert_eq!(node(&tree, &["n", "c"]), None);
/// ```
pub fn node<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(tree, |current, key| current.as_object()?.get(*key))
        .filter(|value| !value.is_null())
}

/// Walk `path` and coerce the terminal value to `T`.
///
/// ```
/// # use telematics_core::path::extract;
/// # use serde_json::json;
/// let tree = json!({"evStatus": {"batteryStatus": 81, "batteryPlugin": 1}});
/// assert_eq!(extract::<f64>(&tree, &["evStatus", "batteryStatus"]), Some(81.0));
/// assert_eq!(extract::<bool>(&tree, &["evStatus", "batteryPlugin"]), Some(true));
/// assert_eq!(extract::<String>(&tree, &["evStatus", "batteryStatus"]), None);
/// ```
pub fn extract<T: FromTelemetry>(tree: &Value, path: &[&str]) -> Option<T> {
    node(tree, path).and_then(T::from_telemetry)
}

/// Parse raw telemetry text into a tree, requiring an object at the root.
pub fn parse_telemetry(text: &str) -> CoreResult<Value> {
    let tree: Value = serde_json::from_str(text)?;
    if tree.is_object() {
        Ok(tree)
    } else {
        Err(CoreError::NotAnObject(kind_name(&tree)))
    }
}

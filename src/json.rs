//! JSON text checks and parsing without serde_json's nesting limit
//!
//! Stored documents may nest deeper than the default 128 levels, so both the
//! write-side detection and the read-side parse lift the limit. Value parsing
//! grows the stack on demand through `serde_stacker`.

use serde::de::{Deserialize, IgnoredAny};
use serde_json::Value;

/// Whether `text` is a complete JSON document.
///
/// Only the syntax is checked: numbers outside the `f64` range and lone
/// surrogate escapes are accepted, as no value is built.
pub fn is_json_text(text: &str) -> bool {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    IgnoredAny::deserialize(&mut de).is_ok() && de.end().is_ok()
}

/// Parse `body` into a value at any nesting depth
pub fn parse_value(body: &[u8]) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

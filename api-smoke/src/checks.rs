//! Response checks. Each one either holds or fails with what it expected and what it got.

use crate::{data::ResponseData, error::Error};
use serde_json::Value;

pub fn expect_status(response: &ResponseData, expected: u16) -> Result<(), Error> {
    if response.status_code == expected {
        Ok(())
    } else {
        Err(Error::assertion("status code", expected, response.status_code))
    }
}

pub fn expect_non_empty_body(response: &ResponseData) -> Result<(), Error> {
    if response.body.is_empty() {
        Err(Error::assertion("body", "a non-empty body", "an empty body"))
    } else {
        Ok(())
    }
}

pub fn expect_body_contains<S: AsRef<str>>(response: &ResponseData, needle: S) -> Result<(), Error> {
    let needle = needle.as_ref();

    if response.body.contains(needle) {
        Ok(())
    } else {
        Err(Error::assertion(
            "body",
            format!("a body containing {}", needle),
            excerpt(&response.body),
        ))
    }
}

/// The header value must match exactly; the name is looked up case-insensitively.
pub fn expect_header<N: AsRef<str>, V: AsRef<str>>(
    response: &ResponseData,
    name: N,
    expected: V,
) -> Result<(), Error> {
    let name = name.as_ref();
    let expected = expected.as_ref();

    match response.header(name) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Error::assertion(format!("{} header", name), expected, actual)),
        None => Err(Error::assertion(
            format!("{} header", name),
            expected,
            "<missing>",
        )),
    }
}

/// The body must be a JSON array with at least one element. Returns its length.
pub fn expect_non_empty_array(response: &ResponseData) -> Result<usize, Error> {
    match response.json::<Value>()? {
        Value::Array(items) if !items.is_empty() => Ok(items.len()),
        Value::Array(_) => Err(Error::assertion("array length", "more than 0", 0)),
        other => Err(Error::assertion(
            "body",
            "a JSON array",
            format!("a JSON {}", kind(&other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 120;

    if body.chars().count() > MAX_CHARS {
        format!("{}...", body.chars().take(MAX_CHARS).collect::<String>())
    } else {
        body.to_string()
    }
}

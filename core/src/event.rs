use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::fmt;

use crate::errors::GreeterError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const NAME_FIELD: &str = "name";

/// The request body the caller sends: `{"name": "..."}`.
/// Any other fields in the body are ignored.
///
/// The key matches case-insensitively and the last occurrence wins. A `null`
/// value leaves the previous one in place; lone surrogate escapes decode to
/// U+FFFD instead of failing the whole body.
#[derive(Debug, Clone, Default)]
pub struct IncomingEvent {
    pub name: Option<String>,
}

impl<'de> Deserialize<'de> for IncomingEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(IncomingEventVisitor)
    }
}

struct IncomingEventVisitor;

impl<'de> Visitor<'de> for IncomingEventVisitor {
    type Value = IncomingEvent;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<IncomingEvent, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut name = None;

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(NAME_FIELD) {
                let raw: Box<RawValue> = map.next_value()?;
                if let Some(value) = decode_name(raw.get()).map_err(<A::Error as de::Error>::custom)? {
                    name = Some(value);
                }
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(IncomingEvent { name })
    }
}

/// `Ok(None)` for `null`, which keeps whatever an earlier key set.
fn decode_name(raw: &str) -> Result<Option<String>, String> {
    let raw = raw.trim();
    if raw == "null" {
        return Ok(None);
    }
    if !raw.starts_with('"') {
        return Err(format!("invalid type for `{}`: expected a string, found {}", NAME_FIELD, raw));
    }

    // The raw value is already a syntactically valid string literal, so the
    // only strict-decode failure left is an unpaired surrogate escape.
    Ok(Some(
        serde_json::from_str::<String>(raw).unwrap_or_else(|_| unescape_lossy(raw)),
    ))
}

fn unescape_lossy(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    // consecutive `\uXXXX` escapes, so surrogate pairs decode together
    let mut units: Vec<u16> = Vec::new();
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_utf16(&mut out, &mut units);
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u16::from_str_radix(&hex, 16) {
                    Ok(unit) => units.push(unit),
                    Err(_) => {
                        flush_utf16(&mut out, &mut units);
                        out.push(char::REPLACEMENT_CHARACTER);
                    }
                }
            }
            Some(escaped) => {
                flush_utf16(&mut out, &mut units);
                out.push(match escaped {
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
            }
            None => {}
        }
    }
    flush_utf16(&mut out, &mut units);

    out
}

fn flush_utf16(out: &mut String, units: &mut Vec<u16>) {
    if !units.is_empty() {
        out.push_str(&String::from_utf16_lossy(units));
        units.clear();
    }
}

/// The envelope handed back to the platform, which serializes it as
/// `{"statusCode": .., "headers": {..}, "body": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingResponse {
    pub status_code: u16,
    /// Always exactly one entry declaring a JSON content type.
    pub headers: HashMap<String, String>,
    /// Bare message text, not a nested JSON document.
    pub body: String,
}

impl OutgoingResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        let mut headers = HashMap::with_capacity(1);
        headers.insert(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string());

        Self {
            status_code,
            headers,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(400, body)
    }
}

impl From<&GreeterError> for OutgoingResponse {
    fn from(err: &GreeterError) -> Self {
        OutgoingResponse::new(err.status_code(), err.to_string())
    }
}

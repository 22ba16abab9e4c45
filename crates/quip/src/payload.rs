use std::borrow::Cow;

use bytes::Bytes;
use serde::Serialize;

use crate::error::Result;

/// Data handed to a terminal call.
///
/// The variant decides how finalize infers `Content-Type` and computes
/// `Content-Length`. An absent body is modelled as `None` at the finalize
/// boundary, never as an empty variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Text, measured in UTF-8 bytes.
    Text(String),
    /// Raw bytes, passed through unchanged.
    Binary(Bytes),
    /// Structured data, serialized to JSON at finalize.
    Structured(serde_json::Value),
}

impl Payload {
    /// Build a structured payload from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Payload::Structured(serde_json::to_value(value)?))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Payload::Structured(_))
    }

    /// Render to wire bytes. Text stays text; structured values become JSON text.
    pub(crate) fn into_bytes(self) -> Result<Bytes> {
        match self {
            Payload::Text(text) => Ok(Bytes::from(text)),
            Payload::Binary(bytes) => Ok(bytes),
            Payload::Structured(value) => Ok(Bytes::from(serde_json::to_string(&value)?)),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<Cow<'_, str>> for Payload {
    fn from(text: Cow<'_, str>) -> Self {
        Payload::Text(text.into_owned())
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for Payload {
    fn from(bytes: &'static [u8]) -> Self {
        Payload::Binary(Bytes::from_static(bytes))
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Structured(value)
    }
}

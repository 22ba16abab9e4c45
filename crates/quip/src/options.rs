//! Decorator configuration.

use serde::{Deserialize, Serialize};

pub const TEXT_HTML: &str = "text/html";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub const APPLICATION_JAVASCRIPT: &str = "application/javascript";

/// Defaults applied during finalize.
///
/// Deserializable so hosts can embed it in their own config files; every
/// field is optional and falls back to [`Options::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// `Content-Type` for text or absent bodies with no explicit type.
    pub default_type: String,
    /// `Content-Type` for binary bodies with no explicit type.
    pub binary_type: String,
    /// `Content-Type` used by `javascript` and `jsonp`.
    pub javascript_type: String,
    /// Reject JSONP callback names that are not dotted JS identifiers.
    pub validate_jsonp_callback: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_type: TEXT_HTML.to_string(),
            binary_type: APPLICATION_OCTET_STREAM.to_string(),
            javascript_type: APPLICATION_JAVASCRIPT.to_string(),
            validate_jsonp_callback: true,
        }
    }
}

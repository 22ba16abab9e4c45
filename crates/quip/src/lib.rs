//! quip — fluent helpers for finishing HTTP responses.
//!
//! Wraps a host response sink so request handlers can say what they mean
//! (`not_found`, `json_with`, `moved`) instead of juggling status codes,
//! header maps and body termination order by hand.
//!
//! # Lifecycle
//!
//! ```text
//! decorate(sink)
//!   │
//!   ├── configuration: status / headers / mime / shortcuts (chainable)
//!   │
//!   ▼
//! terminal call: send / end / *_with / moved / json_value / jsonp
//!   │
//!   ├── infer Content-Type, compute Content-Length
//!   ├── commit head once
//!   ├── write body (unless HEAD)
//!   └── close
//! ```
//!
//! # Content-Type inference
//!
//! When no `Content-Type` has been set, finalize picks one from the
//! payload: structured values become `application/json`, binary buffers
//! [`Options::binary_type`], and text or absent bodies
//! [`Options::default_type`]. `Content-Length` is the UTF-8 byte length
//! of the rendered body and is omitted entirely when there is no body.
//!
//! # Example
//!
//! ```
//! use quip::{MemorySink, decorate};
//! use serde_json::json;
//!
//! let sent = decorate(MemorySink::new()).json_with(json!({"a": 1}))?;
//! let sink = sent.into_sink();
//! assert_eq!(sink.body(), br#"{"a":1}"#);
//! assert_eq!(sink.headers().unwrap().get("content-length"), Some("7"));
//! # Ok::<(), quip::Error>(())
//! ```

mod decorate;
mod error;
mod header;
pub mod options;
mod payload;
mod request;
mod response;
pub mod shortcut;
mod sink;

pub use decorate::{Decorator, decorate};
pub use error::{Error, Result};
pub use header::{Header, HeaderMap};
pub use options::Options;
pub use payload::Payload;
pub use request::Request;
pub use response::{Outcome, Response, ResponseState, Sent};
pub use shortcut::Shortcut;
pub use sink::{MemorySink, ResponseSink};

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::header::HeaderMap;
use crate::options::{APPLICATION_JSON, Options};
use crate::payload::Payload;
use crate::shortcut::{self, Class, Shortcut};
use crate::sink::ResponseSink;

/// Status and headers accumulated before the head is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseState {
    status: u16,
    headers: HeaderMap,
}

impl Default for ResponseState {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
        }
    }
}

impl ResponseState {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn default_header(&mut self, name: &str, value: &str) {
        if !self.headers.contains(name) {
            self.headers.set(name, value);
        }
    }
}

/// A response sink decorated with status, header and body helpers.
///
/// Configuration methods take `self` and hand it back, so calls chain by
/// moving the same response along. Terminal methods consume the response
/// and return [`Sent`]; because the response is gone afterwards, finalize
/// can run at most once.
///
/// ```
/// use quip::{MemorySink, decorate};
///
/// let sent = decorate(MemorySink::new()).not_found().text_with("nothing here")?;
/// let sink = sent.into_sink();
/// assert_eq!(sink.status(), Some(404));
/// assert_eq!(sink.headers().unwrap().get("Content-Type"), Some("text/plain"));
/// # Ok::<(), quip::Error>(())
/// ```
#[derive(Debug)]
pub struct Response<S> {
    sink: S,
    state: ResponseState,
    head: bool,
    options: Arc<Options>,
}

/// The terminal sentinel: the response has been committed and closed.
///
/// Offers no decorator methods. The closed sink can be recovered with
/// [`into_sink`](Sent::into_sink) for hosts that buffer the response.
#[derive(Debug)]
#[must_use = "the closed sink may still hold the buffered response"]
pub struct Sent<S> {
    sink: S,
    status: u16,
    content_length: Option<usize>,
}

impl<S> Sent<S> {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// `Content-Length` computed at finalize, `None` when there was no body.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Result of a dynamically dispatched shortcut: either the response is
/// still open for chaining or it has been finalized.
#[derive(Debug)]
pub enum Outcome<S> {
    Continue(Response<S>),
    Sent(Sent<S>),
}

impl<S> Outcome<S> {
    pub fn is_sent(&self) -> bool {
        matches!(self, Outcome::Sent(_))
    }

    pub fn into_response(self) -> Option<Response<S>> {
        match self {
            Outcome::Continue(res) => Some(res),
            Outcome::Sent(_) => None,
        }
    }

    pub fn into_sent(self) -> Option<Sent<S>> {
        match self {
            Outcome::Continue(_) => None,
            Outcome::Sent(sent) => Some(sent),
        }
    }
}

impl<S: ResponseSink> Response<S> {
    pub(crate) fn new(sink: S, options: Arc<Options>, head: bool) -> Self {
        Self {
            sink,
            state: ResponseState::default(),
            head,
            options,
        }
    }

    // ── Configuration ──────────────────────────────────────────────

    pub fn status(mut self, code: u16) -> Self {
        self.state.status = code;
        self
    }

    /// Merge `headers` into the accumulated headers. Conflicting names
    /// (compared case-insensitively) are overwritten.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.state.headers.extend(headers);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.state.headers.set(name, value);
        self
    }

    /// Set `Content-Type` to an arbitrary mime type.
    pub fn mime(self, content_type: impl Into<String>) -> Self {
        self.header("Content-Type", content_type)
    }

    /// Set `Content-Type` and finalize with `payload`.
    pub fn mime_with(
        self,
        content_type: impl Into<String>,
        payload: impl Into<Payload>,
    ) -> Result<Sent<S>> {
        self.mime(content_type).send(payload)
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn status_code(&self) -> u16 {
        self.state.status
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.state.headers.get(name)
    }

    pub fn state(&self) -> &ResponseState {
        &self.state
    }

    /// Whether body writes are suppressed because the request was `HEAD`.
    pub fn is_head(&self) -> bool {
        self.head
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Shortcuts ──────────────────────────────────────────────────

    /// Apply the configuration half of a shortcut: its status code or
    /// its `Content-Type`. Never finalizes.
    fn configure(self, shortcut: Shortcut) -> Self {
        match shortcut.class() {
            Class::Status(code) | Class::NoBody(code) | Class::Redirection { code, .. } => {
                self.status(code)
            }
            Class::Mime(content_type) => self.mime(content_type),
            Class::Script => {
                let content_type = self.options.javascript_type.clone();
                self.mime(content_type)
            }
        }
    }

    /// Invoke a shortcut looked up at runtime.
    ///
    /// Status and mime shortcuts continue the chain when `payload` is
    /// `None` and finalize otherwise. No-body shortcuts always finalize
    /// and drop the payload. Redirections need a text payload holding the
    /// location.
    pub fn apply(self, shortcut: Shortcut, payload: Option<Payload>) -> Result<Outcome<S>> {
        match shortcut.class() {
            Class::Status(_) | Class::Mime(_) | Class::Script => {
                let res = self.configure(shortcut);
                match payload {
                    None => Ok(Outcome::Continue(res)),
                    Some(payload) => res.finalize(Some(payload)).map(Outcome::Sent),
                }
            }
            Class::NoBody(code) => self.status(code).finalize(None).map(Outcome::Sent),
            Class::Redirection { code, reason } => match payload {
                Some(Payload::Text(location)) => self
                    .redirection(code, reason, &location)
                    .map(Outcome::Sent),
                _ => {
                    warn!(shortcut = %shortcut, "redirect without a text location");
                    Err(Error::MissingLocation { code })
                }
            },
        }
    }

    fn redirection(self, code: u16, reason: &str, location: &str) -> Result<Sent<S>> {
        if location.is_empty() {
            warn!(code, "redirect without a location");
            return Err(Error::MissingLocation { code });
        }
        let body = shortcut::redirect_body(code, reason, location);
        self.status(code)
            .header("Location", location)
            .finalize(Some(Payload::Text(body)))
    }

    fn redirect_via(self, shortcut: Shortcut, location: &str) -> Result<Sent<S>> {
        let Class::Redirection { code, reason } = shortcut.class() else {
            unreachable!("{shortcut} is not a redirection");
        };
        self.redirection(code, reason, location)
    }

    /// 301 Moved Permanently to `location`.
    pub fn moved(self, location: &str) -> Result<Sent<S>> {
        self.redirect_via(Shortcut::Moved, location)
    }

    /// 302 Found to `location`.
    pub fn redirect(self, location: &str) -> Result<Sent<S>> {
        self.redirect_via(Shortcut::Redirect, location)
    }

    /// Alias of [`redirect`](Response::redirect).
    pub fn found(self, location: &str) -> Result<Sent<S>> {
        self.redirect_via(Shortcut::Found, location)
    }

    /// 204 with no body.
    pub fn no_content(self) -> Result<Sent<S>> {
        self.configure(Shortcut::NoContent).finalize(None)
    }

    /// 204 with no body; `payload` is discarded.
    pub fn no_content_with(self, payload: impl Into<Payload>) -> Result<Sent<S>> {
        drop(payload.into());
        self.no_content()
    }

    /// 304 with no body.
    pub fn not_modified(self) -> Result<Sent<S>> {
        self.configure(Shortcut::NotModified).finalize(None)
    }

    /// 304 with no body; `payload` is discarded.
    pub fn not_modified_with(self, payload: impl Into<Payload>) -> Result<Sent<S>> {
        drop(payload.into());
        self.not_modified()
    }

    // ── JSON ───────────────────────────────────────────────────────

    /// Serialize `value` and finalize as `application/json`.
    pub fn json_value<T: Serialize + ?Sized>(self, value: &T) -> Result<Sent<S>> {
        let payload = Payload::json(value)?;
        self.json_with(payload)
    }

    /// Finalize as a JSONP script: `callback(json);` with status forced to 200.
    ///
    /// Script-tag loaders cannot observe the HTTP status, so any earlier
    /// status is overridden and errors have to travel inside the payload.
    /// Text payloads are taken to be JSON already.
    pub fn jsonp(self, callback: &str, payload: impl Into<Payload>) -> Result<Sent<S>> {
        if self.options.validate_jsonp_callback && !is_valid_callback(callback) {
            warn!(callback, "rejected JSONP callback");
            return Err(Error::InvalidCallback(callback.to_string()));
        }
        let json = payload.into().into_bytes()?;

        let mut body = BytesMut::with_capacity(callback.len() + json.len() + 3);
        body.extend_from_slice(callback.as_bytes());
        body.extend_from_slice(b"(");
        body.extend_from_slice(&json);
        body.extend_from_slice(b");");

        self.ok()
            .javascript()
            .finalize(Some(Payload::Binary(body.freeze())))
    }

    // ── Finalize ───────────────────────────────────────────────────

    /// Finalize with `payload`.
    pub fn send(self, payload: impl Into<Payload>) -> Result<Sent<S>> {
        self.finalize(Some(payload.into()))
    }

    /// Finalize with no body.
    pub fn end(self) -> Result<Sent<S>> {
        self.finalize(None)
    }

    fn finalize(mut self, payload: Option<Payload>) -> Result<Sent<S>> {
        let options = Arc::clone(&self.options);

        match &payload {
            Some(Payload::Binary(_)) => {
                self.state.default_header("Content-Type", &options.binary_type);
            }
            Some(Payload::Structured(_)) => {
                self.state.default_header("Content-Type", APPLICATION_JSON);
            }
            Some(Payload::Text(_)) | None => {}
        }

        let body: Option<Bytes> = payload.map(Payload::into_bytes).transpose()?;
        let content_length = body.as_ref().map(Bytes::len);
        if let Some(len) = content_length {
            self.state.headers.set("Content-Length", len.to_string());
        }
        self.state.default_header("Content-Type", &options.default_type);

        debug!(
            status = self.state.status,
            content_type = self.state.headers.get("Content-Type"),
            content_length,
            head = self.head,
            "finalizing response"
        );

        self.sink.commit_head(self.state.status, &self.state.headers)?;
        if let Some(body) = body.filter(|b| !b.is_empty() && !self.head) {
            self.sink.write_body(&body)?;
        }
        self.sink.close()?;

        Ok(Sent {
            sink: self.sink,
            status: self.state.status,
            content_length,
        })
    }
}

/// Generates the chainable and terminal forms of the status and mime
/// shortcuts from their table rows.
macro_rules! shortcut_methods {
    ($($shortcut:ident => $chain:ident, $with:ident;)*) => {
        impl<S: ResponseSink> Response<S> {
            $(
                #[doc = concat!("Apply the `", stringify!($chain), "` shortcut and keep chaining.")]
                pub fn $chain(self) -> Self {
                    self.configure(Shortcut::$shortcut)
                }

                #[doc = concat!("Apply the `", stringify!($chain), "` shortcut and finalize with `payload`.")]
                pub fn $with(self, payload: impl Into<Payload>) -> Result<Sent<S>> {
                    self.configure(Shortcut::$shortcut).send(payload)
                }
            )*
        }
    };
}

shortcut_methods! {
    Ok => ok, ok_with;
    Created => created, created_with;
    Accepted => accepted, accepted_with;
    BadRequest => bad_request, bad_request_with;
    Unauthorized => unauthorized, unauthorized_with;
    Forbidden => forbidden, forbidden_with;
    NotFound => not_found, not_found_with;
    NotAllowed => not_allowed, not_allowed_with;
    Conflict => conflict, conflict_with;
    Gone => gone, gone_with;
    Error => error, error_with;
    Text => text, text_with;
    Plain => plain, plain_with;
    Html => html, html_with;
    Xhtml => xhtml, xhtml_with;
    Css => css, css_with;
    Xml => xml, xml_with;
    Atom => atom, atom_with;
    Rss => rss, rss_with;
    Javascript => javascript, javascript_with;
    Json => json, json_with;
}

/// Dotted JavaScript identifier, e.g. `cb` or `jQuery.handlers.cb_1`.
fn is_valid_callback(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

//! Named shortcut table.
//!
//! Every convenience method on [`Response`](crate::Response) is backed by
//! one row of [`TABLE`]: a method name bound to a status code or a mime
//! type plus a behavior class. The typed methods and the dynamic
//! [`Response::apply`](crate::Response::apply) dispatcher both read from
//! here, so the two cannot drift apart.

use std::fmt;

/// How a shortcut behaves when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Sets the status. Chainable without a payload, terminal with one.
    Status(u16),
    /// Sets the status and always finalizes with no body.
    NoBody(u16),
    /// Sets the status and `Location`, then finalizes with an HTML body.
    Redirection { code: u16, reason: &'static str },
    /// Sets `Content-Type`. Chainable without a payload, terminal with one.
    Mime(&'static str),
    /// Like [`Class::Mime`], with the type taken from
    /// [`Options::javascript_type`](crate::Options::javascript_type).
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Ok,
    Created,
    Accepted,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    NotAllowed,
    Conflict,
    Gone,
    Error,
    NoContent,
    NotModified,
    Moved,
    Redirect,
    Found,
    Text,
    Plain,
    Html,
    Xhtml,
    Css,
    Xml,
    Atom,
    Rss,
    Javascript,
    Json,
}

/// One row of the shortcut table.
#[derive(Debug)]
pub struct Entry {
    pub name: &'static str,
    pub shortcut: Shortcut,
    pub class: Class,
}

const fn entry(name: &'static str, shortcut: Shortcut, class: Class) -> Entry {
    Entry {
        name,
        shortcut,
        class,
    }
}

/// Rows are in [`Shortcut`] declaration order.
pub static TABLE: &[Entry] = &[
    // success
    entry("ok", Shortcut::Ok, Class::Status(200)),
    entry("created", Shortcut::Created, Class::Status(201)),
    entry("accepted", Shortcut::Accepted, Class::Status(202)),
    // client error
    entry("badRequest", Shortcut::BadRequest, Class::Status(400)),
    entry("unauthorized", Shortcut::Unauthorized, Class::Status(401)),
    entry("forbidden", Shortcut::Forbidden, Class::Status(403)),
    entry("notFound", Shortcut::NotFound, Class::Status(404)),
    entry("notAllowed", Shortcut::NotAllowed, Class::Status(405)),
    entry("conflict", Shortcut::Conflict, Class::Status(409)),
    entry("gone", Shortcut::Gone, Class::Status(410)),
    // server error
    entry("error", Shortcut::Error, Class::Status(500)),
    // no body
    entry("noContent", Shortcut::NoContent, Class::NoBody(204)),
    entry("notModified", Shortcut::NotModified, Class::NoBody(304)),
    // redirection
    entry(
        "moved",
        Shortcut::Moved,
        Class::Redirection {
            code: 301,
            reason: "Moved Permanently",
        },
    ),
    entry(
        "redirect",
        Shortcut::Redirect,
        Class::Redirection {
            code: 302,
            reason: "Found",
        },
    ),
    entry(
        "found",
        Shortcut::Found,
        Class::Redirection {
            code: 302,
            reason: "Found",
        },
    ),
    // mime types
    entry("text", Shortcut::Text, Class::Mime("text/plain")),
    entry("plain", Shortcut::Plain, Class::Mime("text/plain")),
    entry("html", Shortcut::Html, Class::Mime("text/html")),
    entry("xhtml", Shortcut::Xhtml, Class::Mime("application/xhtml+xml")),
    entry("css", Shortcut::Css, Class::Mime("text/css")),
    entry("xml", Shortcut::Xml, Class::Mime("text/xml")),
    entry("atom", Shortcut::Atom, Class::Mime("application/atom+xml")),
    entry("rss", Shortcut::Rss, Class::Mime("application/rss+xml")),
    entry("javascript", Shortcut::Javascript, Class::Script),
    entry("json", Shortcut::Json, Class::Mime("application/json")),
];

impl Shortcut {
    fn entry(self) -> &'static Entry {
        &TABLE[self as usize]
    }

    /// Method name as exposed on the decorated response (`notFound`, `xhtml`, ...).
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn class(self) -> Class {
        self.entry().class
    }

    /// Look up a shortcut by method name.
    ///
    /// Matching ignores ASCII case and underscores, so `notFound`,
    /// `not_found` and `NOTFOUND` all resolve to [`Shortcut::NotFound`].
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.chars().filter(|c| *c != '_');
        TABLE
            .iter()
            .find(|e| {
                e.name
                    .chars()
                    .map(|c| c.to_ascii_lowercase())
                    .eq(wanted.clone().map(|c| c.to_ascii_lowercase()))
            })
            .map(|e| e.shortcut)
    }

    /// Bound status code, for the status, no-body and redirection classes.
    pub fn code(self) -> Option<u16> {
        match self.class() {
            Class::Status(code) | Class::NoBody(code) | Class::Redirection { code, .. } => {
                Some(code)
            }
            Class::Mime(_) | Class::Script => None,
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTML body sent with a redirection.
pub(crate) fn redirect_body(code: u16, reason: &str, location: &str) -> String {
    format!(
        "<html><head><title>{code} {reason}</title></head>\
         <body><p>{reason}: <a href=\"{location}\">{location}</a></p></body></html>"
    )
}

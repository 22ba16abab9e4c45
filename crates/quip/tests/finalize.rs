//! Finalize contract tests.
//!
//! Drives every shortcut row through a `MemorySink` and checks what ends
//! up committed: status, inferred headers, body and the write sequence.

use quip::shortcut::{Class, TABLE};
use quip::{MemorySink, Outcome, Payload, Response, Sent, Shortcut, decorate};
use serde_json::json;

fn finished(sent: Sent<MemorySink>) -> MemorySink {
    let sink = sent.into_sink();
    assert!(sink.is_committed(), "head never committed");
    assert!(sink.is_closed(), "stream never closed");
    sink
}

// ── Status-only shortcuts ───────────────────────────────────────────

#[test]
fn status_shortcuts_chain_without_payload() {
    for row in TABLE {
        let Class::Status(code) = row.class else { continue };

        let outcome = decorate(MemorySink::new()).apply(row.shortcut, None).unwrap();
        let res: Response<MemorySink> = outcome.into_response().expect("chainable");
        assert_eq!(res.status_code(), code, "{}", row.name);
        assert!(!res.sink().is_committed(), "{} committed early", row.name);
    }
}

#[test]
fn status_shortcuts_finalize_with_payload() {
    for row in TABLE {
        let Class::Status(code) = row.class else { continue };

        let outcome = decorate(MemorySink::new())
            .apply(row.shortcut, Some(Payload::from("content")))
            .unwrap();
        let Outcome::Sent(sent) = outcome else {
            panic!("{} did not finalize", row.name);
        };
        let sink = finished(sent);
        assert_eq!(sink.status(), Some(code), "{}", row.name);
        let headers = sink.headers().unwrap();
        assert_eq!(headers.get("Content-Type"), Some("text/html"), "{}", row.name);
        assert_eq!(headers.get("Content-Length"), Some("7"), "{}", row.name);
        assert_eq!(sink.body(), b"content", "{}", row.name);
    }
}

// ── Mime shortcuts ──────────────────────────────────────────────────

#[test]
fn mime_shortcuts_set_type_and_finalize() {
    for row in TABLE {
        let expected = match row.class {
            Class::Mime(content_type) => content_type,
            Class::Script => "application/javascript",
            _ => continue,
        };

        let outcome = decorate(MemorySink::new())
            .apply(row.shortcut, Some(Payload::from("content")))
            .unwrap();
        let sink = finished(outcome.into_sent().expect("terminal"));
        assert_eq!(
            sink.headers().unwrap().get("Content-Type"),
            Some(expected),
            "{}",
            row.name
        );
        assert_eq!(sink.body(), b"content");
    }
}

#[test]
fn mime_shortcut_without_payload_defers() {
    let res = decorate(MemorySink::new())
        .apply(Shortcut::Xml, None)
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(res.header_value("content-type"), Some("text/xml"));

    let sink = finished(res.created_with("<a/>").unwrap());
    assert_eq!(sink.status(), Some(201));
    assert_eq!(sink.headers().unwrap().get("Content-Type"), Some("text/xml"));
}

// ── No-body and redirection ─────────────────────────────────────────

#[test]
fn no_body_shortcuts_ignore_payload() {
    for shortcut in [Shortcut::NoContent, Shortcut::NotModified] {
        for payload in [None, Some(Payload::from("content"))] {
            let outcome = decorate(MemorySink::new()).apply(shortcut, payload).unwrap();
            let sent = outcome.into_sent().expect("always terminal");
            assert_eq!(sent.content_length(), None);

            let sink = finished(sent);
            assert_eq!(sink.status(), shortcut.code());
            assert_eq!(sink.body_writes(), 0);
            assert!(!sink.headers().unwrap().contains("Content-Length"));
        }
    }
}

#[test]
fn redirections_set_location_and_body() {
    for (shortcut, code, reason) in [
        (Shortcut::Moved, 301, "Moved Permanently"),
        (Shortcut::Redirect, 302, "Found"),
        (Shortcut::Found, 302, "Found"),
    ] {
        let outcome = decorate(MemorySink::new())
            .apply(shortcut, Some(Payload::from("/next")))
            .unwrap();
        let sink = finished(outcome.into_sent().unwrap());
        let expected = format!(
            "<html><head><title>{code} {reason}</title></head><body><p>{reason}: \
             <a href=\"/next\">/next</a></p></body></html>"
        );
        assert_eq!(sink.status(), Some(code));
        assert_eq!(sink.headers().unwrap().get("Location"), Some("/next"));
        assert_eq!(sink.body(), expected.as_bytes());
    }
}

// ── Write sequence ──────────────────────────────────────────────────

#[test]
fn single_commit_single_write() {
    let sink = finished(decorate(MemorySink::new()).send("abc").unwrap());
    assert_eq!(sink.body_writes(), 1);
}

#[test]
fn caller_headers_survive_finalize() {
    let sink = finished(
        decorate(MemorySink::new())
            .headers([("Cache-Control", "no-store"), ("X-Request-Id", "r-1")])
            .json_with(json!({"ok": true}))
            .unwrap(),
    );
    let headers = sink.headers().unwrap();
    assert_eq!(headers.get("cache-control"), Some("no-store"));
    assert_eq!(headers.get("x-request-id"), Some("r-1"));
    assert_eq!(headers.get("content-type"), Some("application/json"));
    assert_eq!(headers.get("content-length"), Some("11"));
}

#[test]
fn content_length_is_byte_length_for_multibyte_text() {
    for text in ["ascii", "日本語", "emoji 🎉", "ünïcödé"] {
        let sent = decorate(MemorySink::new()).text_with(text).unwrap();
        assert_eq!(sent.content_length(), Some(text.len()));
        let sink = finished(sent);
        assert_eq!(
            sink.headers().unwrap().get("Content-Length"),
            Some(text.len().to_string().as_str())
        );
        assert_eq!(sink.body(), text.as_bytes());
    }
}

#[test]
fn jsonp_overrides_any_prior_status() {
    for prior in [Shortcut::Error, Shortcut::NotFound, Shortcut::Unauthorized] {
        let res = decorate(MemorySink::new())
            .apply(prior, None)
            .unwrap()
            .into_response()
            .unwrap();
        let sink = finished(res.jsonp("cb", json!({"a": 1})).unwrap());
        assert_eq!(sink.status(), Some(200));
        assert_eq!(sink.body(), br#"cb({"a":1});"#);
    }
}

//! End-to-end tests over a bound listener.
//!
//! Starts the demo routes on an ephemeral port and speaks raw HTTP/1.1
//! to them, so what is checked is exactly what a client sees.

use quip::{Decorator, Options};
use quip_server::{HttpServer, demo};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

struct Running {
    addr: std::net::SocketAddr,
    _shutdown: watch::Sender<bool>,
}

async fn start(options: Options) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(addr, Decorator::new(options), demo::handler());

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move { server.serve_listener(listener, rx).await });

    Running {
        addr,
        _shutdown: tx,
    }
}

/// Send one request with `Connection: close` and return the raw response.
async fn roundtrip(addr: std::net::SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

fn split(raw: &str) -> (&str, &str) {
    raw.split_once("\r\n\r\n").expect("head/body separator")
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

#[tokio::test]
async fn serves_text() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "GET", "/hello.txt").await;
    let (head, body) = split(&raw);

    assert!(head.starts_with("HTTP/1.1 200 OK"), "{head}");
    assert_eq!(header(head, "content-type"), Some("text/plain"));
    assert_eq!(header(head, "content-length"), Some("13"));
    assert_eq!(body, "hello, world\n");
}

#[tokio::test]
async fn serves_json_with_inferred_type() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "GET", "/data.json").await;
    let (head, body) = split(&raw);

    assert_eq!(header(head, "content-type"), Some("application/json"));
    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(value["name"], "quip");
}

#[tokio::test]
async fn moved_sends_location() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "GET", "/old").await;
    let (head, body) = split(&raw);

    assert!(head.starts_with("HTTP/1.1 301"), "{head}");
    assert_eq!(header(head, "location"), Some("/"));
    assert!(body.contains("<title>301 Moved Permanently</title>"));
}

#[tokio::test]
async fn head_request_has_length_but_no_body() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "HEAD", "/hello.txt").await;
    let (head, body) = split(&raw);

    assert_eq!(header(head, "content-length"), Some("13"));
    assert!(body.is_empty());
}

#[tokio::test]
async fn jsonp_uses_configured_script_type() {
    let options = Options {
        javascript_type: "text/javascript".into(),
        ..Options::default()
    };
    let server = start(options).await;
    let raw = roundtrip(server.addr, "GET", "/jsonp?callback=cb").await;
    let (head, body) = split(&raw);

    assert!(head.starts_with("HTTP/1.1 200"), "{head}");
    assert_eq!(header(head, "content-type"), Some("text/javascript"));
    assert_eq!(body, r#"cb({"ok":true});"#);
}

#[tokio::test]
async fn invalid_callback_is_500() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "GET", "/jsonp?callback=a;b").await;
    let (head, body) = split(&raw);

    assert!(head.starts_with("HTTP/1.1 500"), "{head}");
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn unknown_path_is_404() {
    let server = start(Options::default()).await;
    let raw = roundtrip(server.addr, "GET", "/missing").await;
    let (head, body) = split(&raw);

    assert!(head.starts_with("HTTP/1.1 404"), "{head}");
    assert_eq!(body, "not found\n");
}

//! Demo routes exercising each shortcut family.
//!
//! | Path | Response |
//! |---|---|
//! | `/` | HTML page |
//! | `/hello.txt` | `text/plain` |
//! | `/data.json` | structured JSON |
//! | `/jsonp?callback=` | JSONP script, always 200 |
//! | `/old` | 301 to `/` |
//! | `/elsewhere` | 302 to `/hello.txt` |
//! | `/empty` | 204 |
//! | `/cached` | 304 |
//! | anything else | 404 |

use quip::{MemorySink, Request, Response, Sent};
use serde_json::json;

use crate::server::{Handler, handler_fn};

const INDEX: &str = "<!doctype html><html><head><title>quip</title></head>\
<body><h1>quip</h1><ul>\
<li><a href=\"/hello.txt\">text</a></li>\
<li><a href=\"/data.json\">json</a></li>\
<li><a href=\"/jsonp?callback=show\">jsonp</a></li>\
<li><a href=\"/old\">moved</a></li>\
</ul></body></html>";

pub fn handler() -> Handler {
    handler_fn(route)
}

fn route(req: &Request, res: Response<MemorySink>) -> anyhow::Result<Sent<MemorySink>> {
    let sent = match req.path() {
        "/" => res.html_with(INDEX)?,
        "/hello.txt" => res.text_with("hello, world\n")?,
        "/data.json" => res.send(json!({
            "name": "quip",
            "shortcuts": quip::shortcut::TABLE.len(),
        }))?,
        "/jsonp" => match req.query_param("callback") {
            Some(callback) if !callback.is_empty() => {
                res.jsonp(callback, json!({"ok": true}))?
            }
            _ => res.bad_request().json_with(json!({"error": "missing callback"}))?,
        },
        "/old" => res.moved("/")?,
        "/elsewhere" => res.redirect("/hello.txt")?,
        "/empty" => res.no_content()?,
        "/cached" => res.not_modified()?,
        _ => res.not_found().text_with("not found\n")?,
    };
    Ok(sent)
}

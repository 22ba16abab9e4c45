//! Conversions between hyper/http types and quip types.
//!
//! Inbound, only the method, URI and headers of a request are carried
//! over. Outbound, a finalized [`MemorySink`] becomes an
//! `http::Response` with a fully buffered body.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderName, HeaderValue, StatusCode, Uri};
use http_body_util::Full;
use quip::{HeaderMap, MemorySink, Request};
use tracing::warn;

/// Convert a status code from u16.
pub fn status_from_u16(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Extract the path and query from a URI.
pub fn uri_path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// Build a quip [`Request`] from the head of a hyper request.
///
/// Header values that are not visible ASCII are dropped.
pub fn request_from_parts(parts: &Parts) -> Request {
    let headers: HeaderMap = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Request::new(parts.method.as_str(), uri_path_and_query(&parts.uri), headers)
}

/// Turn a finalized sink into an `http::Response`.
///
/// A sink whose head was never committed yields an empty 500. Headers
/// that are not valid HTTP are skipped with a warning.
pub fn into_http_response(sink: MemorySink) -> http::Response<Full<Bytes>> {
    let Some((status, headers, body)) = sink.into_parts() else {
        warn!("response finished without committing a head");
        let mut resp = http::Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        return resp;
    };

    let mut resp = http::Response::new(Full::new(body));
    *resp.status_mut() = status_from_u16(status);
    for header in headers.iter() {
        match (
            HeaderName::from_bytes(header.name.as_bytes()),
            HeaderValue::from_str(&header.value),
        ) {
            (Ok(name), Ok(value)) => {
                resp.headers_mut().append(name, value);
            }
            _ => warn!(name = %header.name, "skipping invalid response header"),
        }
    }
    resp
}

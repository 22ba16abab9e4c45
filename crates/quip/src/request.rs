use crate::header::HeaderMap;

/// The parts of an incoming request the decorator cares about.
///
/// Only the method is consulted today: a `HEAD` request suppresses body
/// writes during finalize while still reporting `Content-Length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    uri: String,
    headers: HeaderMap,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            headers,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path component of the URI, without the query string.
    pub fn path(&self) -> &str {
        match self.uri.split_once('?') {
            Some((path, _)) => path,
            None => &self.uri,
        }
    }

    /// Value of the first query parameter named `name`, undecoded.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        let (_, query) = self.uri.split_once('?')?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_head(&self) -> bool {
        self.method.eq_ignore_ascii_case("HEAD")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accessors() {
        let headers: HeaderMap = [("Host", "example.com")].into_iter().collect();

        let req = Request::new("GET", "/users?page=1", headers);
        assert_eq!(req.method(), "GET");
        assert_eq!(req.uri(), "/users?page=1");
        assert_eq!(req.path(), "/users");
        assert_eq!(req.headers().get("host"), Some("example.com"));
        assert!(!req.is_head());
    }

    #[test]
    fn head_detection_ignores_case() {
        assert!(Request::new("HEAD", "/", HeaderMap::new()).is_head());
        assert!(Request::new("head", "/", HeaderMap::new()).is_head());
        assert!(!Request::new("GET", "/", HeaderMap::new()).is_head());
    }

    #[test]
    fn query_param_lookup() {
        let req = Request::new("GET", "/jsonp?x=1&callback=cb&flag", HeaderMap::new());
        assert_eq!(req.query_param("callback"), Some("cb"));
        assert_eq!(req.query_param("x"), Some("1"));
        assert_eq!(req.query_param("flag"), Some(""));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn query_param_without_query() {
        let req = Request::new("GET", "/plain", HeaderMap::new());
        assert_eq!(req.path(), "/plain");
        assert_eq!(req.query_param("callback"), None);
    }
}

//! Decoration entry points.

use std::sync::Arc;

use crate::options::Options;
use crate::request::Request;
use crate::response::Response;
use crate::sink::ResponseSink;

/// Decorate `sink` with default [`Options`] and return it.
///
/// Never invokes a continuation; see [`Decorator::middleware`] for that.
pub fn decorate<S: ResponseSink>(sink: S) -> Response<S> {
    Decorator::default().decorate(sink)
}

/// Attaches the response helpers to host sinks.
///
/// Cheap to clone; the options are shared between every response the
/// decorator produces.
#[derive(Debug, Clone, Default)]
pub struct Decorator {
    options: Arc<Options>,
}

impl Decorator {
    pub fn new(options: Options) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn decorate<S: ResponseSink>(&self, sink: S) -> Response<S> {
        Response::new(sink, Arc::clone(&self.options), false)
    }

    /// Decorate `sink` for `request`. A `HEAD` request suppresses body writes.
    pub fn decorate_request<S: ResponseSink>(&self, request: &Request, sink: S) -> Response<S> {
        Response::new(sink, Arc::clone(&self.options), request.is_head())
    }

    /// Middleware form: decorate, then hand the decorated response to `next`.
    ///
    /// The continuation receives the response itself and its return value
    /// is passed back to the caller. There is no error slot; a stage that
    /// fails returns its error through `R`.
    pub fn middleware<S, R>(
        &self,
        request: Option<&Request>,
        sink: S,
        next: impl FnOnce(Response<S>) -> R,
    ) -> R
    where
        S: ResponseSink,
    {
        let res = match request {
            Some(request) => self.decorate_request(request, sink),
            None => self.decorate(sink),
        };
        next(res)
    }

    /// Package [`middleware`](Decorator::middleware) as a reusable stage.
    pub fn filter<S, N, R>(&self) -> impl Fn(Option<&Request>, S, N) -> R + Clone + use<S, N, R>
    where
        S: ResponseSink,
        N: FnOnce(Response<S>) -> R,
    {
        let decorator = self.clone();
        move |request, sink, next| decorator.middleware(request, sink, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HeaderMap;
    use crate::sink::MemorySink;

    #[test]
    fn decorate_returns_fresh_state() {
        let res = decorate(MemorySink::new());
        assert_eq!(res.status_code(), 200);
        assert!(!res.sink().is_committed());
    }

    #[test]
    fn decorator_shares_options() {
        let decorator = Decorator::new(Options {
            default_type: "text/plain".into(),
            ..Options::default()
        });
        let res = decorator.decorate(MemorySink::new());
        assert_eq!(res.options().default_type, "text/plain");

        let sent = res.send("x").unwrap();
        let headers = sent.sink().headers().unwrap();
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn middleware_invokes_next_with_decorated_response() {
        let decorator = Decorator::default();
        let req = Request::new("GET", "/", HeaderMap::new());

        let status = decorator.middleware(Some(&req), MemorySink::new(), |res| {
            assert!(!res.is_head());
            res.not_found().status_code()
        });
        assert_eq!(status, 404);
    }

    #[test]
    fn middleware_without_request() {
        let sent = Decorator::default()
            .middleware(None, MemorySink::new(), |res| res.ok_with("done"))
            .unwrap();
        assert_eq!(sent.sink().body(), b"done");
    }

    #[test]
    fn filter_is_reusable() {
        type Next = fn(Response<MemorySink>) -> u16;
        let stage = Decorator::default().filter::<MemorySink, Next, u16>();
        let head = Request::new("HEAD", "/", HeaderMap::new());

        let a = stage(None, MemorySink::new(), |res| res.gone().status_code());
        let b = stage(Some(&head), MemorySink::new(), |res| {
            assert!(res.is_head());
            res.status_code()
        });
        assert_eq!((a, b), (410, 200));
    }
}

//! HTTP server.
//!
//! `HttpServer` runs a hyper HTTP/1.1 accept loop. Each request gets a
//! freshly decorated [`MemorySink`]; once the handler finalizes it, the
//! buffered sink is converted into the hyper response.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use http::request::Parts;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use quip::{Decorator, MemorySink, Request, Response, Sent};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::convert::{into_http_response, request_from_parts};

/// Callback type for handling HTTP requests.
///
/// The handler receives the request view and a decorated response and
/// must finalize it. Returning an error turns the response into a 500.
pub type Handler = Arc<
    dyn Fn(&Request, Response<MemorySink>) -> anyhow::Result<Sent<MemorySink>> + Send + Sync,
>;

/// Wrap a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&Request, Response<MemorySink>) -> anyhow::Result<Sent<MemorySink>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Run one request through `handler` and build the hyper response.
pub fn dispatch(
    decorator: &Decorator,
    handler: &Handler,
    parts: &Parts,
) -> http::Response<Full<Bytes>> {
    let request = request_from_parts(parts);
    let res = decorator.decorate_request(&request, MemorySink::new());

    let sink = match handler(&request, res) {
        Ok(sent) => sent.into_sink(),
        Err(e) => {
            error!(method = request.method(), uri = request.uri(), error = %e, "request handler failed");
            match decorator
                .decorate_request(&request, MemorySink::new())
                .error_with("Internal Server Error")
            {
                Ok(sent) => sent.into_sink(),
                Err(e) => {
                    error!(error = %e, "failed to build error response");
                    MemorySink::new()
                }
            }
        }
    };

    let resp = into_http_response(sink);
    debug!(
        method = request.method(),
        uri = request.uri(),
        status = resp.status().as_u16(),
        "request served"
    );
    resp
}

/// HTTP server for decorated handlers.
pub struct HttpServer {
    bind_addr: SocketAddr,
    decorator: Decorator,
    handler: Handler,
}

impl HttpServer {
    pub fn new(bind_addr: SocketAddr, decorator: Decorator, handler: Handler) -> Self {
        Self {
            bind_addr,
            decorator,
            handler,
        }
    }

    /// Bind and serve until the shutdown signal is received.
    pub async fn serve(self, shutdown: tokio::sync::watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", self.bind_addr))?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    ///
    /// Spawns a tokio task per connection using HTTP/1.1.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        let addr = listener.local_addr().context("listener has no local address")?;
        info!(%addr, "HTTP server listening");

        let decorator = self.decorator;
        let handler = self.handler;

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    let (stream, peer_addr) = accept_result.context("accept failed")?;
                    let decorator = decorator.clone();
                    let handler = handler.clone();

                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);
                        let svc = service_fn(move |req: hyper::Request<Incoming>| {
                            let (parts, _body) = req.into_parts();
                            let resp = dispatch(&decorator, &handler, &parts);
                            async move { Ok::<_, hyper::Error>(resp) }
                        });

                        if let Err(e) = http1::Builder::new()
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(%peer_addr, error = %e, "connection error");
                        }
                    });
                }
                _ = shutdown.changed() => {
                    info!("HTTP server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

//! quip-server — hyper host for quip-decorated handlers.
//!
//! Serves HTTP/1.1 by handing every request a decorated in-memory sink
//! and converting the finalized sink back into a hyper response.
//!
//! # Architecture
//!
//! ```text
//! HTTP client
//!   │
//!   ▼
//! hyper server
//!   │
//!   ├── Convert request head → quip::Request
//!   ├── Decorate a MemorySink (HEAD suppresses body writes)
//!   ├── Call handler(&Request, Response<MemorySink>) → Sent
//!   ├── Convert MemorySink → http::Response
//!   │
//!   ▼
//! HTTP response
//! ```

pub mod config;
pub mod convert;
pub mod demo;
pub mod server;

pub use config::ServerConfig;
pub use server::{Handler, HttpServer, handler_fn};

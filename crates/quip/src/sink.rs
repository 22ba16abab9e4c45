//! Host response capability.
//!
//! A [`ResponseSink`] is whatever actually puts bytes on the wire. The
//! decorator drives it through exactly one sequence per response:
//!
//! ```text
//! commit_head(status, headers)
//!   └── write_body(chunk)   (skipped for HEAD or when there is no body)
//!         └── close()
//! ```

use std::io;

use bytes::{Bytes, BytesMut};

use crate::header::HeaderMap;

/// Write primitives supplied by the host response object.
pub trait ResponseSink {
    /// Write the status line and headers. Called once per response.
    fn commit_head(&mut self, status: u16, headers: &HeaderMap) -> io::Result<()>;

    /// Write a chunk of body bytes after the head has been committed.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Terminate the response.
    fn close(&mut self) -> io::Result<()>;
}

impl<T: ResponseSink + ?Sized> ResponseSink for &mut T {
    fn commit_head(&mut self, status: u16, headers: &HeaderMap) -> io::Result<()> {
        (**self).commit_head(status, headers)
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        (**self).write_body(chunk)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// A sink that buffers the whole response in memory.
///
/// Rejects a second head commit, body writes before the head, and any
/// write after close, so misuse surfaces as an `io::Error` rather than
/// silently producing a garbled response.
#[derive(Debug, Default)]
pub struct MemorySink {
    head: Option<(u16, HeaderMap)>,
    body: BytesMut,
    writes: usize,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed status code, if the head has been written.
    pub fn status(&self) -> Option<u16> {
        self.head.as_ref().map(|(status, _)| *status)
    }

    /// Committed headers, if the head has been written.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.head.as_ref().map(|(_, headers)| headers)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Number of `write_body` calls received.
    pub fn body_writes(&self) -> usize {
        self.writes
    }

    pub fn is_committed(&self) -> bool {
        self.head.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Split into committed status, headers and body.
    ///
    /// An uncommitted sink yields `None`.
    pub fn into_parts(self) -> Option<(u16, HeaderMap, Bytes)> {
        let (status, headers) = self.head?;
        Some((status, headers, self.body.freeze()))
    }
}

impl ResponseSink for MemorySink {
    fn commit_head(&mut self, status: u16, headers: &HeaderMap) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "head commit after close",
            ));
        }
        if self.head.is_some() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "response head already committed",
            ));
        }
        self.head = Some((status, headers.clone()));
        Ok(())
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write after close"));
        }
        if self.head.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "body write before head commit",
            ));
        }
        self.body.extend_from_slice(chunk);
        self.writes += 1;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "already closed"));
        }
        self.closed = true;
        Ok(())
    }
}

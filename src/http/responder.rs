//! Writer-style response surface and the status-capturing decorator.
//!
//! # Responsibilities
//! - Define the `ResponseWriter` capability handed to writer-style handlers
//! - Record the final status code while passing every call through
//! - Buffer a handler's output into an `http::Response` for the runtime
//!
//! # Design Decisions
//! - The first status sent wins; later `write_header` calls are forwarded
//!   but do not overwrite the record
//! - A body write before any `write_header` finalizes with `200 OK`, the
//!   same implicit status the runtime would send
//! - Bytes are forwarded untouched, never buffered by the decorator

use std::io;

use axum::{
    body::Body,
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
};

use crate::observability::STATUS_UNSET;

/// Response capability exposed to writer-style handlers.
pub trait ResponseWriter {
    /// Headers to send with the response head.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Finalize the response head with `status`.
    fn write_header(&mut self, status: StatusCode);

    /// Write body bytes.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        (**self).headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        (**self).write_header(status)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Decorator that records the status code a handler sends.
#[derive(Debug)]
pub struct StatusRecorder<W> {
    inner: W,
    status: u16,
}

impl<W: ResponseWriter> StatusRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            status: STATUS_UNSET,
        }
    }

    /// Recorded status, or [`STATUS_UNSET`] if the handler sent nothing.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter> ResponseWriter for StatusRecorder<W> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.status == STATUS_UNSET {
            self.status = status.as_u16();
        }
        self.inner.write_header(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status == STATUS_UNSET {
            self.write_header(StatusCode::OK);
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// In-memory response assembled from writer-style calls.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status sent so far, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl ResponseWriter for ResponseBuffer {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        match self.status {
            None => self.status = Some(status),
            Some(sent) => {
                tracing::warn!(sent = %sent, ignored = %status, "Superfluous write_header call");
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

impl IntoResponse for ResponseBuffer {
    fn into_response(self) -> Response<Body> {
        // A handler that wrote nothing still produces 200, as a server would.
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

//! Writer-style handlers and their adapter into the tower/axum stack.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::{Request, Response, StatusCode},
    response::IntoResponse,
};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::config::HttpLogConfig;
use crate::http::responder::{ResponseBuffer, ResponseWriter};

/// A synchronous handler that writes its response through a [`ResponseWriter`].
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>);
}

impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request<Bytes>) {
        self(w, req)
    }
}

/// Pin a closure to the [`Handler`] signature so its arguments infer.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut dyn ResponseWriter, &Request<Bytes>) + Send + Sync + 'static,
{
    f
}

/// Serves a [`Handler`] as a tower service.
///
/// The request body is buffered (up to `max_body_bytes`) and the handler
/// runs on the blocking pool, since it may do ordinary synchronous I/O.
pub struct HandlerService<H> {
    handler: Arc<H>,
    max_body_bytes: usize,
}

impl<H> Clone for HandlerService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

impl<H: Handler> HandlerService<H> {
    pub fn new(handler: H, config: &HttpLogConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl<H: Handler> Service<Request<Body>> for HandlerService<H> {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.handler.clone();
        let limit = self.max_body_bytes;
        let span = tracing::Span::current();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let bytes = match axum::body::to_bytes(body, limit).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, limit, "Failed to read request body");
                    let response = (StatusCode::BAD_REQUEST, "Failed to read request body");
                    return Ok(response.into_response());
                }
            };
            let req = Request::from_parts(parts, bytes);

            let result = tokio::task::spawn_blocking(move || {
                let _entered = span.enter();
                let mut buffer = ResponseBuffer::new();
                handler.serve(&mut buffer, &req);
                buffer
            })
            .await;

            match result {
                Ok(buffer) => Ok(buffer.into_response()),
                // Handler panics are not ours to recover.
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => {
                    tracing::error!(error = %e, "Handler task cancelled");
                    Ok(StatusCode::SERVICE_UNAVAILABLE.into_response())
                }
            }
        })
    }
}

//! Request logging as a tower layer.
//!
//! # Responsibilities
//! - Time each request through the inner service
//! - Read the status from the response head the inner service produces
//! - Hand (request, elapsed, status) to the selected emission function
//!
//! # Design Decisions
//! - The emission function is chosen once, when the layer is built
//! - Elapsed time ends when the response head is ready; body streaming
//!   afterwards is not included
//! - Errors from the inner service propagate unlogged

use std::fmt;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};

use crate::observability::emit::{select, LogFn, RequestInfo};

/// Layer that logs every request passing through the wrapped service.
#[derive(Clone)]
pub struct HttpLogLayer {
    log: LogFn,
}

impl HttpLogLayer {
    /// Same selection rules as [`wrap`](crate::http::wrap::wrap).
    pub fn new(log_fns: Vec<LogFn>) -> Self {
        Self {
            log: select(log_fns),
        }
    }
}

impl fmt::Debug for HttpLogLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpLogLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for HttpLogLayer {
    type Service = HttpLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpLog {
            inner,
            log: self.log.clone(),
        }
    }
}

/// Service produced by [`HttpLogLayer`].
#[derive(Clone)]
pub struct HttpLog<S> {
    inner: S,
    log: LogFn,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HttpLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let info = RequestInfo::from_request(&req);
        let log = self.log.clone();

        let start = Instant::now();
        let future = self.inner.call(req);

        Box::pin(async move {
            let response = future.await?;
            log(&info, start.elapsed(), response.status().as_u16());
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::json;
    use crate::test_util::SharedBuffer;
    use axum::{
        body::Body,
        http::StatusCode,
        routing::{delete, get},
        Router,
    };
    use tower::ServiceExt;

    fn app(out: &SharedBuffer, err: &SharedBuffer) -> Router {
        Router::new()
            .route("/greeting", get(|| async { "Hello, world!" }))
            .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/gone", delete(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .layer(HttpLogLayer::new(vec![json(out.clone(), err.clone())]))
    }

    #[tokio::test]
    async fn test_layer_logs_success() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();

        let response = app(&out, &err)
            .oneshot(Request::builder().uri("/greeting").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let line: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(line["method"], "GET");
        assert_eq!(line["path"], "/greeting");
        assert_eq!(line["status"], 200);
        assert!(err.contents().is_empty());
    }

    #[tokio::test]
    async fn test_layer_logs_server_error_twice() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();

        app(&out, &err)
            .oneshot(Request::builder().uri("/down").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(out.lines().len(), 1);
        assert_eq!(out.lines(), err.lines());
    }

    #[tokio::test]
    async fn test_client_error_goes_to_stdout_only() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();

        let response = app(&out, &err)
            .oneshot(Request::builder().method("DELETE").uri("/gone").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(out.contents().contains("\"method\": \"DELETE\", \"path\": \"/gone\""));
        assert!(out.contents().contains("\"status\": 404}"));
        assert!(err.contents().is_empty());
    }
}

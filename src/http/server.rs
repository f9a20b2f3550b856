//! HTTP server setup for the demo service.
//!
//! # Responsibilities
//! - Create the Axum router with a writer-style and a tower-style route
//! - Wire up middleware (request ID, tracing, request logging)
//! - Serve on a listener until shutdown
//!
//! Both routes share one emission function, so a request is logged once
//! whichever form served it.

use std::future::Future;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, get_service},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::HttpLogConfig;
use crate::http::handler::HandlerService;
use crate::http::layer::HttpLogLayer;
use crate::http::request::{propagate_request_id, set_request_id};
use crate::http::responder::ResponseWriter;
use crate::http::wrap::wrap;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::emit::{select, LogFn};

/// HTTP server with request logging on every route.
pub struct HttpServer {
    router: Router,
    config: HttpLogConfig,
}

impl HttpServer {
    /// Create a server logging through `log_fns` (JSON on stdio when empty).
    pub fn new(config: HttpLogConfig, log_fns: Vec<LogFn>) -> Self {
        let log = select(log_fns);
        let router = Self::build_router(&config, log);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &HttpLogConfig, log: LogFn) -> Router {
        let greeting_service = HandlerService::new(wrap(greeting, vec![log.clone()]), config);

        Router::new()
            .route("/greeting", get_service(greeting_service))
            .route(
                "/status/{code}",
                get(status_handler).layer(HttpLogLayer::new(vec![log])),
            )
            .layer(propagate_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id())
    }

    /// Router with all layers applied, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run until `signal` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &HttpLogConfig {
        &self.config
    }
}

/// Writer-style greeting.
fn greeting(w: &mut dyn ResponseWriter, _req: &Request<Bytes>) {
    w.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    w.write_header(StatusCode::OK);
    if let Err(e) = w.write(b"Hello, world!") {
        tracing::warn!(error = %e, "Failed to write greeting");
    }
}

/// Respond with the status code named in the path.
async fn status_handler(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, status.canonical_reason().unwrap_or_default()).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "Invalid status code").into_response(),
    }
}

//! HTTP integration of the request logger.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → request.rs (request ID assigned)
//!     → layer.rs (tower services: time, await response head, log)
//!       or wrap.rs (writer-style handlers: time, capture status, log)
//!           → responder.rs (StatusRecorder over the real writer)
//!           → handler.rs (HandlerService bridges into axum)
//!     → observability (selected emission function)
//! ```

pub mod handler;
pub mod layer;
pub mod request;
pub mod responder;
pub mod server;
pub mod wrap;

pub use handler::{handler_fn, Handler, HandlerService};
pub use layer::{HttpLog, HttpLogLayer};
pub use request::X_REQUEST_ID;
pub use responder::{ResponseBuffer, ResponseWriter, StatusRecorder};
pub use server::HttpServer;
pub use wrap::{wrap, Logged};

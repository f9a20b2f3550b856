//! Configuration for the request logger.
//!
//! # Data Flow
//! ```text
//! HttpLogConfig (Default, or embedded in a service's own config file)
//!     → level_env_var + default_level → observability::level (resolved once)
//!     → max_body_bytes → http::handler::HandlerService
//! ```
//!
//! # Design Decisions
//! - Configuration is passed explicitly at construction; nothing reads
//!   process-wide logger state behind the caller's back
//! - All fields have defaults to allow minimal configs
//! - The only environment lookup is the log level variable

pub mod schema;

pub use schema::HttpLogConfig;

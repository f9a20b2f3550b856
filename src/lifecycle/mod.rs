//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Init tracing → Build log functions → Bind
//!     (the level is resolved, fatally, only for the structured format)
//!
//! Shutdown (signals.rs):
//!     Ctrl+C → axum stops accepting → in-flight requests drain → Exit
//! ```

pub mod signals;

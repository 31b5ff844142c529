//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, tower-http layers)
//!     → SetRequestIdLayer (x-request-id) → TraceLayer → TimeoutLayer
//!     → routing adapter for the addressed controller
//!     → Context rendered as the response
//! ```

pub mod server;

pub use server::HttpServer;

//! Convention-based dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Route::registry::<UserController>()
//!     → methods.rs (collect exported methods, index by "<Verb>/<name>")
//!     → controller.rs (derive path segment "user")
//!     → router.rs (install /user and /user/{*path_params} on axum)
//!
//! Incoming Request (verb, raw path params):
//!     → router.rs adapter (normalize verb, resolve provisional method)
//!     → Context::init
//!     → ancestor scope handlers (root-first), then own scope handlers
//!     → controller handlers
//!     → Context::before
//!     → controller method on a fresh receiver
//!     → Context::set_result
//!     → Context into HTTP response
//! ```
//!
//! # Design Decisions
//! - No route declarations: verb + path segments + method names decide the target
//! - Any stage may return `Flow::Stop`; later stages never run after that
//! - Method tables are built once and read-only while serving

pub mod context;
pub mod controller;
pub mod error;
pub mod json;
pub mod methods;
pub mod naming;
pub mod request;
pub mod router;

pub use context::{handler, Context, DispatchResult, Handler, Reply};
pub use controller::{BoundController, DispatchOutcome};
pub use error::{DispatchError, RegistryError};
pub use json::JsonContext;
pub use methods::{Controller, MethodTable, Methods};
pub use request::{Flow, ReqArg};
pub use router::Route;

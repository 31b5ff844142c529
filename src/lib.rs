//! Convention-driven request dispatcher on top of axum.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{
    handler, Context, Controller, DispatchError, Flow, Handler, JsonContext, Methods, RegistryError,
    ReqArg, Route,
};

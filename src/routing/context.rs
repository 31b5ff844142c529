//! Request context capability and middleware handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::IntoResponse;

use crate::routing::error::DispatchError;
use crate::routing::request::{Flow, ReqArg};

/// Outcome handed to [`Context::set_result`].
pub type DispatchResult<V> = Result<Option<V>, DispatchError>;

/// Application-supplied per-request object.
///
/// A fresh `Default` instance is created for every request. Once the pipeline has
/// finished (or stopped), the context is turned into the HTTP response, so a stage
/// that returns [`Flow::Stop`] is expected to have recorded its own response first.
pub trait Context: Default + IntoResponse + Send + 'static {
    /// Value returned by controller methods.
    type Value: Send + 'static;

    /// Called right after construction, before any routing logic runs.
    fn init(&mut self, request: Request<Body>, arg: &mut ReqArg) -> Flow {
        let _ = (request, arg);
        Flow::Continue
    }

    /// Called after every middleware layer, right before the controller method.
    fn before(&mut self, arg: &mut ReqArg) -> Flow {
        let _ = arg;
        Flow::Continue
    }

    /// Receives the method's return value, `Ok(None)` when it returned nothing, or
    /// the resolution error.
    fn set_result(&mut self, result: DispatchResult<Self::Value>);
}

/// Middleware callback run on route and controller scopes.
pub type Handler<C> = Arc<dyn Fn(&mut C, &mut ReqArg) -> Flow + Send + Sync>;

/// Box a closure as a [`Handler`].
pub fn handler<C, F>(f: F) -> Handler<C>
where
    F: Fn(&mut C, &mut ReqArg) -> Flow + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Run handlers in order, stopping at the first [`Flow::Stop`].
pub(crate) fn run_handlers<C>(handlers: &[Handler<C>], ctx: &mut C, arg: &mut ReqArg) -> Flow {
    for handler in handlers {
        let flow = handler(ctx, arg);
        if arg.record(flow).is_stop() {
            return Flow::Stop;
        }
    }
    Flow::Continue
}

/// Conversion from a controller method's return type to at most one value.
pub trait Reply<V> {
    fn into_reply(self) -> Option<V>;
}

impl<V> Reply<V> for () {
    fn into_reply(self) -> Option<V> {
        None
    }
}

impl<V> Reply<V> for Option<V> {
    fn into_reply(self) -> Option<V> {
        self
    }
}

impl Reply<serde_json::Value> for serde_json::Value {
    fn into_reply(self) -> Option<serde_json::Value> {
        Some(self)
    }
}

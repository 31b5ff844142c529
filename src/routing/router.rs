//! Route tree and the axum adapter.
//!
//! # Responsibilities
//! - Group controllers and middleware under a URL prefix
//! - Create child scopes that run their ancestors' middleware first
//! - Install two axum routes per controller and drive the dispatch pipeline
//!
//! # Design Decisions
//! - All scopes of one tree share a single `axum::Router`
//! - Middleware lists live in `ArcSwap`, so handlers added to a parent after a
//!   child was created are still seen by the child at dispatch time
//! - A child scope keeps its parent alive; parents never point at children

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::any;
use axum::Router;

use crate::observability::metrics;
use crate::routing::context::{run_handlers, Context, Handler};
use crate::routing::controller::{BoundController, DispatchOutcome};
use crate::routing::error::RegistryError;
use crate::routing::methods::Controller;
use crate::routing::naming::normalize_verb;
use crate::routing::request::{Flow, ReqArg};

/// Name of the catch-all segment in the installed route pattern.
pub const PATH_PARAMS_FIELD: &str = "path_params";

/// Middleware chain of one scope.
struct Scope<C> {
    parent: Option<Arc<Scope<C>>>,
    handlers: ArcSwap<Vec<Handler<C>>>,
}

impl<C> Scope<C> {
    fn new(parent: Option<Arc<Scope<C>>>, handlers: Vec<Handler<C>>) -> Self {
        Self {
            parent,
            handlers: ArcSwap::from_pointee(handlers),
        }
    }

    /// Run ancestor handlers root-first, then this scope's own.
    fn handle(&self, ctx: &mut C, arg: &mut ReqArg) -> Flow {
        if let Some(parent) = &self.parent {
            if parent.handle(ctx, arg).is_stop() {
                return Flow::Stop;
            }
        }
        let handlers = self.handlers.load();
        run_handlers(&handlers, ctx, arg)
    }
}

#[derive(Default)]
struct RouteTable {
    router: Router,
    paths: HashSet<String>,
}

/// A routing scope holding controllers and middleware.
pub struct Route<C: Context> {
    scope: Arc<Scope<C>>,
    path: String,
    table: Arc<Mutex<RouteTable>>,
    controllers: HashMap<String, Arc<BoundController<C>>>,
}

impl<C: Context> Route<C> {
    /// Create a root route mounted at `/`.
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Create a root route mounted under `prefix`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            scope: Arc::new(Scope::new(None, Vec::new())),
            path: join_path("", prefix),
            table: Arc::new(Mutex::new(RouteTable::default())),
            controllers: HashMap::new(),
        }
    }

    /// Relative path of this scope, without trailing slash (empty for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a handler to this scope.
    pub fn use_handler(&self, handler: Handler<C>) {
        self.use_handlers([handler]);
    }

    pub fn use_handlers(&self, handlers: impl IntoIterator<Item = Handler<C>>) {
        let added: Vec<Handler<C>> = handlers.into_iter().collect();
        self.scope.handlers.rcu(|current| {
            let mut next = current.to_vec();
            next.extend(added.iter().cloned());
            next
        });
    }

    /// Create a child scope under `path` with its own handlers.
    pub fn party(&self, path: &str, handlers: Vec<Handler<C>>) -> Route<C> {
        Route {
            scope: Arc::new(Scope::new(Some(self.scope.clone()), handlers)),
            path: join_path(&self.path, path),
            table: self.table.clone(),
            controllers: HashMap::new(),
        }
    }

    /// Register controller type `T` under this scope.
    ///
    /// Installs `{path}/{name}`, `{path}/{name}/` and `{path}/{name}/{*path_params}`
    /// on the shared router, all dispatching through the same adapter.
    pub fn registry<T: Controller<C>>(
        &mut self,
        handlers: Vec<Handler<C>>,
    ) -> Result<Arc<BoundController<C>>, RegistryError> {
        let controller = Arc::new(BoundController::new::<T>(&self.path, handlers)?);
        let base = format!("{}/{}", controller.parent_path(), controller.path_name());

        let mut table = self.table.lock().expect("route table mutex poisoned");
        if !table.paths.insert(base.clone()) {
            return Err(RegistryError::DuplicateController { path: base });
        }

        let adapter = Adapter {
            scope: self.scope.clone(),
            controller: controller.clone(),
            base: base.clone(),
        };
        let rest = format!("{}/{{*{}}}", base, PATH_PARAMS_FIELD);

        let mut router = std::mem::take(&mut table.router);
        for pattern in [base.clone(), format!("{}/", base), rest] {
            let adapter = adapter.clone();
            router = router.route(
                &pattern,
                any(move |request: Request<Body>| async move { adapter.handle(request) }),
            );
        }
        table.router = router;
        drop(table);

        tracing::info!(
            controller = controller.name(),
            path = %base,
            methods = ?controller.methods().keys(),
            "Controller registered"
        );

        self.controllers
            .insert(controller.path_name().to_string(), controller.clone());
        Ok(controller)
    }

    /// Look up a controller registered on this scope by its path segment.
    pub fn controller(&self, path_name: &str) -> Option<&Arc<BoundController<C>>> {
        self.controllers.get(path_name)
    }

    /// The axum router holding every controller of this tree.
    pub fn router(&self) -> Router {
        self.table
            .lock()
            .expect("route table mutex poisoned")
            .router
            .clone()
    }
}

impl<C: Context> Default for Route<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> fmt::Debug for Route<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("handlers", &self.scope.handlers.load().len())
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Per-controller request entry point installed on axum.
struct Adapter<C: Context> {
    scope: Arc<Scope<C>>,
    controller: Arc<BoundController<C>>,
    /// Route path of the controller (`/api/user`).
    base: String,
}

impl<C: Context> Clone for Adapter<C> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            controller: self.controller.clone(),
            base: self.base.clone(),
        }
    }
}

impl<C: Context> Adapter<C> {
    fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let verb = normalize_verb(request.method().as_str());
        let raw_params = self.path_params(request.uri().path());
        let (control_method, path_params) = self
            .controller
            .search_exec_method(&verb, raw_params.trim_matches('/'));

        let mut arg = ReqArg::new(verb, self.controller.name(), control_method, path_params);
        tracing::debug!(
            verb = arg.req_method(),
            controller = arg.control_name(),
            method = arg.control_method(),
            params = arg.path_params(),
            "Dispatching request"
        );

        let mut ctx = C::default();
        let outcome = self.run(&mut ctx, &mut arg, request);
        if outcome == DispatchOutcome::Stopped {
            tracing::debug!(
                controller = arg.control_name(),
                method = arg.control_method(),
                "Pipeline stopped"
            );
        }
        metrics::record_dispatch(self.controller.name(), outcome, start);

        ctx.into_response()
    }

    /// Percent-decoded remainder of `path` after the controller's route path.
    /// Invalid UTF-8 is replaced rather than rejected, so every request reaches the context.
    fn path_params(&self, path: &str) -> String {
        let raw = path.strip_prefix(self.base.as_str()).unwrap_or_default();
        String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
    }

    fn run(&self, ctx: &mut C, arg: &mut ReqArg, request: Request<Body>) -> DispatchOutcome {
        let flow = ctx.init(request, arg);
        if arg.record(flow).is_stop() {
            return DispatchOutcome::Stopped;
        }
        if self.scope.handle(ctx, arg).is_stop() {
            return DispatchOutcome::Stopped;
        }
        self.controller.dispatch(ctx, arg)
    }
}

fn join_path(base: &str, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

//! Registered controllers: method resolution and terminal dispatch.
//!
//! # Responsibilities
//! - Derive the URL path segment from the controller type name
//! - Split raw path parameters into a method name and residual parameters
//! - Run controller middleware, the `before` hook and the target method
//!
//! # Design Decisions
//! - Named methods are preferred over the catch-all method for a verb
//! - The method key is rebuilt at dispatch time from whatever verb and method
//!   name the handlers left in [`ReqArg`]
//! - Exactly one result is delivered per dispatched request

use std::fmt;

use crate::routing::context::{run_handlers, Context, Handler};
use crate::routing::error::{DispatchError, RegistryError};
use crate::routing::methods::{Controller, MethodTable};
use crate::routing::naming::{method_key, snake_case};
use crate::routing::request::ReqArg;

/// Suffix removed from controller type names to form the path segment.
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// What happened to a request once it reached a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The target method ran and its result was delivered.
    Dispatched,
    /// A handler or hook stopped the pipeline.
    Stopped,
    /// No method matched; an error result was delivered.
    Undefined,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Dispatched => "dispatched",
            DispatchOutcome::Stopped => "stopped",
            DispatchOutcome::Undefined => "undefined",
        }
    }
}

/// A controller bound to a route.
pub struct BoundController<C: Context> {
    name: String,
    path_name: String,
    parent_path: String,
    methods: MethodTable<C>,
    handlers: Vec<Handler<C>>,
}

impl<C: Context> BoundController<C> {
    /// Bind controller type `T` under `parent_path`.
    pub fn new<T: Controller<C>>(
        parent_path: &str,
        handlers: Vec<Handler<C>>,
    ) -> Result<Self, RegistryError> {
        let name = short_type_name(std::any::type_name::<T>()).to_string();
        let path_name = controller_path_name(&name)?;

        Ok(Self {
            name,
            path_name,
            parent_path: parent_path.trim_end_matches('/').to_string(),
            methods: MethodTable::build::<T>(),
            handlers,
        })
    }

    /// Raw type name (`UserController`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL path segment (`user`).
    pub fn path_name(&self) -> &str {
        &self.path_name
    }

    /// Path of the owning route, without trailing slash.
    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    pub fn methods(&self) -> &MethodTable<C> {
        &self.methods
    }

    /// Resolve the method to run from the verb and the raw path parameters.
    ///
    /// Returns the method name and the residual path parameters. When nothing
    /// matches, the first path segment is returned as-is so dispatch can report it.
    pub fn search_exec_method(&self, verb: &str, raw_params: &str) -> (String, String) {
        let (candidate, params) = raw_params.split_once('/').unwrap_or((raw_params, ""));

        let key = format!("{}/{}", verb, snake_case(candidate));
        if let Some(method) = self.methods.get(&key) {
            return (method.name().to_string(), params.to_string());
        }

        // Catch-all method for the verb consumes the whole string
        if !candidate.is_empty() {
            if let Some(method) = self.methods.get(&format!("{}/", verb)) {
                return (method.name().to_string(), raw_params.to_string());
            }
        }

        (candidate.to_string(), params.to_string())
    }

    /// Run controller middleware, the `before` hook and the target method.
    pub fn dispatch(&self, ctx: &mut C, arg: &mut ReqArg) -> DispatchOutcome {
        if run_handlers(&self.handlers, ctx, arg).is_stop() {
            return DispatchOutcome::Stopped;
        }

        let flow = ctx.before(arg);
        if arg.record(flow).is_stop() {
            return DispatchOutcome::Stopped;
        }

        let verb = arg.req_method();
        let control_method = arg.control_method();
        let method = self
            .methods
            .get(&method_key(control_method, verb))
            .filter(|m| m.name() == control_method);

        match method {
            Some(method) => {
                let value = method.invoke(ctx);
                ctx.set_result(Ok(value));
                DispatchOutcome::Dispatched
            }
            None => {
                let err = self.undefined(verb, control_method);
                tracing::warn!(error = %err, "Unresolved controller method");
                ctx.set_result(Err(err));
                DispatchOutcome::Undefined
            }
        }
    }

    fn undefined(&self, verb: &str, control_method: &str) -> DispatchError {
        if control_method.is_empty() {
            DispatchError::UndefinedController {
                verb: verb.to_string(),
                parent_path: self.parent_path.clone(),
                controller: self.name.clone(),
            }
        } else {
            DispatchError::UndefinedMethod {
                verb: verb.to_string(),
                parent_path: self.parent_path.clone(),
                controller: self.name.clone(),
                method: control_method.to_string(),
            }
        }
    }
}

impl<C: Context> fmt::Debug for BoundController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundController")
            .field("name", &self.name)
            .field("path_name", &self.path_name)
            .field("parent_path", &self.parent_path)
            .field("methods", &self.methods)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Derive the path segment for a controller type name.
pub fn controller_path_name(name: &str) -> Result<String, RegistryError> {
    let stripped = name.strip_suffix(CONTROLLER_SUFFIX).unwrap_or(name);
    if stripped.is_empty() {
        return Err(RegistryError::EmptyControllerName {
            type_name: name.to_string(),
        });
    }
    Ok(snake_case(stripped))
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::context::{handler, DispatchResult};
    use crate::routing::methods::Methods;
    use crate::routing::request::Flow;
    use axum::response::{IntoResponse, Response};

    #[derive(Default)]
    struct TestCtx {
        log: Vec<String>,
        result: Option<DispatchResult<String>>,
        results_delivered: usize,
        stop_before: bool,
    }

    impl IntoResponse for TestCtx {
        fn into_response(self) -> Response {
            ().into_response()
        }
    }

    impl Context for TestCtx {
        type Value = String;

        fn before(&mut self, _arg: &mut ReqArg) -> Flow {
            self.log.push("before".into());
            if self.stop_before {
                Flow::Stop
            } else {
                Flow::Continue
            }
        }

        fn set_result(&mut self, result: DispatchResult<String>) {
            self.results_delivered += 1;
            self.result = Some(result);
        }
    }

    #[derive(Default)]
    struct UserController;

    impl UserController {
        fn show(&self, ctx: &mut TestCtx) -> Option<String> {
            ctx.log.push("show".into());
            Some("show".into())
        }

        fn delete(&self, ctx: &mut TestCtx) -> Option<String> {
            ctx.log.push("delete".into());
            Some("delete".into())
        }

        fn remove_user(&self, ctx: &mut TestCtx) {
            ctx.log.push("remove_user".into());
        }
    }

    impl Controller<TestCtx> for UserController {
        fn methods(m: &mut Methods<Self, TestCtx>) {
            m.add("Get", Self::show)
                .add("GetDelete", Self::delete)
                .add("DeleteUser", Self::remove_user);
        }
    }

    #[derive(Default)]
    struct Profile;

    impl Controller<TestCtx> for Profile {
        fn methods(m: &mut Methods<Self, TestCtx>) {
            m.add("Avatar", |_: &Self, _: &mut TestCtx| Some("avatar".to_string()));
        }
    }

    mod bare {
        use super::TestCtx;
        use crate::routing::methods::Methods;

        #[derive(Default)]
        pub struct Controller;

        impl crate::routing::methods::Controller<TestCtx> for Controller {
            fn methods(_: &mut Methods<Self, TestCtx>) {}
        }
    }

    #[test]
    fn test_path_name_derivation() {
        let c = BoundController::<TestCtx>::new::<UserController>("/api/", vec![]).unwrap();
        assert_eq!(c.name(), "UserController");
        assert_eq!(c.path_name(), "user");
        assert_eq!(c.parent_path(), "/api");

        let c = BoundController::<TestCtx>::new::<Profile>("", vec![]).unwrap();
        assert_eq!(c.name(), "Profile");
        assert_eq!(c.path_name(), "profile");

        let err = BoundController::<TestCtx>::new::<bare::Controller>("", vec![]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::EmptyControllerName {
                type_name: "Controller".into()
            }
        );
    }

    #[test]
    fn test_controller_path_name() {
        assert_eq!(controller_path_name("UserController").unwrap(), "user");
        assert_eq!(controller_path_name("User").unwrap(), "user");
        assert_eq!(controller_path_name("OrderItemController").unwrap(), "order_item");
        assert!(controller_path_name("Controller").is_err());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("my_app::controllers::UserController"), "UserController");
        assert_eq!(short_type_name("Wrapper<my_app::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_search_prefers_named_method() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();

        assert_eq!(
            c.search_exec_method("Get", "delete/5"),
            ("GetDelete".to_string(), "5".to_string())
        );
        assert_eq!(
            c.search_exec_method("Get", "42"),
            ("Get".to_string(), "42".to_string())
        );
        assert_eq!(
            c.search_exec_method("Get", "42/extra"),
            ("Get".to_string(), "42/extra".to_string())
        );
        assert_eq!(
            c.search_exec_method("Get", ""),
            ("Get".to_string(), "".to_string())
        );
        assert_eq!(
            c.search_exec_method("Delete", "user/7"),
            ("DeleteUser".to_string(), "7".to_string())
        );
    }

    #[test]
    fn test_search_without_match_returns_candidate() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();
        // No Post catch-all, so the candidate is handed back for dispatch to report
        assert_eq!(
            c.search_exec_method("Post", "create/1/2"),
            ("create".to_string(), "1/2".to_string())
        );
        // No cross-verb fallback to the Get catch-all
        assert_eq!(
            c.search_exec_method("Delete", "42"),
            ("42".to_string(), "".to_string())
        );
    }

    #[test]
    fn test_dispatch_invokes_resolved_method() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();
        let (method, params) = c.search_exec_method("Get", "5");
        let mut arg = ReqArg::new("Get", c.name(), method, params);
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Dispatched);
        assert_eq!(ctx.log, vec!["before", "show"]);
        assert_eq!(ctx.results_delivered, 1);
        assert_eq!(ctx.result, Some(Ok(Some("show".to_string()))));
        assert_eq!(arg.path_params(), "5");
    }

    #[test]
    fn test_dispatch_method_without_value() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();
        let (method, params) = c.search_exec_method("Delete", "user/7");
        let mut arg = ReqArg::new("Delete", c.name(), method, params);
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Dispatched);
        assert_eq!(ctx.result, Some(Ok(None)));
        assert_eq!(ctx.results_delivered, 1);
    }

    #[test]
    fn test_dispatch_undefined_method() {
        let c = BoundController::<TestCtx>::new::<UserController>("/api", vec![]).unwrap();
        let (method, params) = c.search_exec_method("Post", "delete/5");
        let mut arg = ReqArg::new("Post", c.name(), method, params);
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Undefined);
        assert_eq!(ctx.results_delivered, 1);
        let err = ctx.result.unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "undefined controller: [Post] </api/UserController.delete>"
        );
    }

    #[test]
    fn test_dispatch_undefined_controller() {
        let c = BoundController::<TestCtx>::new::<Profile>("", vec![]).unwrap();
        let (method, params) = c.search_exec_method("Get", "");
        let mut arg = ReqArg::new("Get", c.name(), method, params);
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Undefined);
        let err = ctx.result.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "undefined controller: [Get] </Profile>");
    }

    #[test]
    fn test_dispatch_rejects_name_mismatch() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();
        // "delete" maps to key Get/delete, but the registered name is GetDelete
        let mut arg = ReqArg::new("Get", c.name(), "delete", "5");
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Undefined);
        assert!(ctx.log.iter().all(|entry| entry != "delete"));
    }

    #[test]
    fn test_handler_can_override_method() {
        let rewrite = handler(|_: &mut TestCtx, arg: &mut ReqArg| {
            arg.set_control_method("GetDelete");
            Flow::Continue
        });
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![rewrite]).unwrap();
        let mut arg = ReqArg::new("Get", c.name(), "Get", "9");
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Dispatched);
        assert_eq!(ctx.result, Some(Ok(Some("delete".to_string()))));
    }

    #[test]
    fn test_stop_in_controller_handler() {
        let stop = handler(|ctx: &mut TestCtx, _: &mut ReqArg| {
            ctx.log.push("guard".into());
            Flow::Stop
        });
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![stop]).unwrap();
        let mut arg = ReqArg::new("Get", c.name(), "Get", "1");
        let mut ctx = TestCtx::default();

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Stopped);
        assert_eq!(ctx.log, vec!["guard"]);
        assert_eq!(ctx.results_delivered, 0);
        assert!(arg.is_stopped());
    }

    #[test]
    fn test_stop_in_before_hook() {
        let c = BoundController::<TestCtx>::new::<UserController>("", vec![]).unwrap();
        let mut arg = ReqArg::new("Get", c.name(), "Get", "1");
        let mut ctx = TestCtx {
            stop_before: true,
            ..TestCtx::default()
        };

        assert_eq!(c.dispatch(&mut ctx, &mut arg), DispatchOutcome::Stopped);
        assert_eq!(ctx.log, vec!["before"]);
        assert_eq!(ctx.results_delivered, 0);
    }
}

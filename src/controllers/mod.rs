//! Demo controllers served by the binary.

mod admin;
mod health;
mod user;

use axum::http::StatusCode;
use serde_json::json;

use convention_router::routing::RegistryError;
use convention_router::{handler, Flow, JsonContext, ReqArg, Route};

pub use admin::StatsController;
pub use health::HealthController;
pub use user::UserController;

/// Header carrying the admin token checked on `/admin`.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Build the demo route tree under `prefix`.
///
/// The `/admin` scope is only mounted when an admin token is configured.
pub fn build_routes(
    prefix: &str,
    admin_token: Option<String>,
) -> Result<Route<JsonContext>, RegistryError> {
    let mut root = Route::with_prefix(prefix);
    root.use_handler(handler(log_request));
    root.registry::<HealthController>(vec![])?;
    root.registry::<UserController>(vec![])?;

    let Some(admin_token) = admin_token.filter(|t| !t.is_empty()) else {
        tracing::warn!("No admin token configured, /admin is disabled");
        return Ok(root);
    };

    let guard = handler(move |ctx: &mut JsonContext, _: &mut ReqArg| {
        if ctx.header(ADMIN_TOKEN_HEADER) == Some(admin_token.as_str()) {
            return Flow::Continue;
        }
        ctx.respond(StatusCode::UNAUTHORIZED, json!({ "error": "missing or invalid admin token" }));
        Flow::Stop
    });
    let mut admin = root.party("/admin", vec![guard]);
    admin.registry::<StatsController>(vec![])?;

    Ok(root)
}

fn log_request(_: &mut JsonContext, arg: &mut ReqArg) -> Flow {
    tracing::debug!(
        verb = arg.req_method(),
        controller = arg.control_name(),
        method = arg.control_method(),
        "Request accepted"
    );
    Flow::Continue
}

use serde_json::{json, Value};

use convention_router::{Controller, JsonContext, Methods};

/// `/admin/stats`, reachable only through the admin guard.
#[derive(Default)]
pub struct StatsController;

impl StatsController {
    fn summary(&self, ctx: &mut JsonContext) -> Value {
        json!({
            "path": ctx.uri().map(|u| u.path().to_string()),
            "controllers": ["health", "user", "admin/stats"],
        })
    }
}

impl Controller<JsonContext> for StatsController {
    fn methods(m: &mut Methods<Self, JsonContext>) {
        m.add("Get", Self::summary);
    }
}

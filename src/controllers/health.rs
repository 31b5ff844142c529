use serde_json::{json, Value};

use convention_router::{Controller, JsonContext, Methods};

#[derive(Default)]
pub struct HealthController;

impl HealthController {
    fn status(&self, _: &mut JsonContext) -> Value {
        json!({
            "status": "operational",
            "version": env!("CARGO_PKG_VERSION"),
        })
    }
}

impl Controller<JsonContext> for HealthController {
    fn methods(m: &mut Methods<Self, JsonContext>) {
        m.add("Get", Self::status).add("Head", |_: &Self, _: &mut JsonContext| ());
    }
}

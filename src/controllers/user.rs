use axum::http::StatusCode;
use serde_json::{json, Value};

use convention_router::{Controller, JsonContext, Methods};

const USERS: [(u64, &str); 3] = [(1, "alice"), (2, "bob"), (3, "carol")];

/// `/user` endpoints backed by a fixed user list.
#[derive(Default)]
pub struct UserController;

impl UserController {
    /// `GET /user` lists users, `GET /user/{id}` shows one.
    fn show(&self, ctx: &mut JsonContext) -> Option<Value> {
        if ctx.path_params().is_empty() {
            let users: Vec<Value> = USERS.iter().map(|&(id, name)| user_json(id, name)).collect();
            return Some(Value::Array(users));
        }
        let (id, name) = self.find(ctx)?;
        Some(user_json(id, name))
    }

    /// `GET /user/profile/{id}`
    fn profile(&self, ctx: &mut JsonContext) -> Option<Value> {
        let (id, name) = self.find(ctx)?;
        Some(json!({
            "id": id,
            "name": name,
            "profile_url": format!("/user/{}", id),
        }))
    }

    /// `PATCH /user/rename/{id}/{name}`
    fn rename(&self, ctx: &mut JsonContext) -> Option<Value> {
        let new_name = ctx.path_segments().get(1).map(|s| s.to_string());
        let Some(new_name) = new_name else {
            ctx.respond(StatusCode::BAD_REQUEST, json!({ "error": "missing new name" }));
            return None;
        };
        let (id, _) = self.find(ctx)?;
        Some(user_json(id, &new_name))
    }

    /// `DELETE /user/{id}`
    fn remove(&self, ctx: &mut JsonContext) {
        if self.find(ctx).is_some() {
            tracing::info!(params = ctx.path_params(), "User removed");
        }
    }

    fn find(&self, ctx: &mut JsonContext) -> Option<(u64, &'static str)> {
        let found = ctx
            .path_segments()
            .first()
            .and_then(|id| id.parse::<u64>().ok())
            .and_then(|id| USERS.iter().copied().find(|&(uid, _)| uid == id));
        if found.is_none() {
            ctx.respond(StatusCode::NOT_FOUND, json!({ "error": "user not found" }));
        }
        found
    }
}

impl Controller<JsonContext> for UserController {
    fn methods(m: &mut Methods<Self, JsonContext>) {
        m.add("Get", Self::show)
            .add("Profile", Self::profile)
            .add("PatchRename", Self::rename)
            .add("Delete", Self::remove);
    }
}

fn user_json(id: u64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use convention_router::routing::DispatchResult;
use convention_router::{handler, Context, Flow, Handler, ReqArg};

/// Header that makes `init` stop the pipeline.
pub const STOP_INIT: &str = "x-stop-init";
/// Header that makes `before` stop the pipeline.
pub const STOP_BEFORE: &str = "x-stop-before";

/// Context recording every pipeline stage it observes.
///
/// Rendered as `{"log": [...], "method": ..., "params": ..., "result": ..., "error": ...}`.
#[derive(Debug, Default)]
pub struct TraceContext {
    pub log: Vec<String>,
    pub headers: Vec<String>,
    pub method: String,
    pub params: String,
    pub result: Option<DispatchResult<Value>>,
}

impl TraceContext {
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

impl Context for TraceContext {
    type Value = Value;

    fn init(&mut self, request: Request<Body>, _arg: &mut ReqArg) -> Flow {
        self.log.push("init".into());
        self.headers = request
            .headers()
            .keys()
            .map(|k| k.as_str().to_string())
            .collect();
        if self.has_header(STOP_INIT) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn before(&mut self, arg: &mut ReqArg) -> Flow {
        self.log.push("before".into());
        self.method = arg.control_method().to_string();
        self.params = arg.path_params().to_string();
        if self.has_header(STOP_BEFORE) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn set_result(&mut self, result: DispatchResult<Value>) {
        self.log.push("result".into());
        self.result = Some(result);
    }
}

impl IntoResponse for TraceContext {
    fn into_response(self) -> Response {
        let (result, error) = match self.result {
            Some(Ok(value)) => (value.unwrap_or(Value::Null), Value::Null),
            Some(Err(err)) => (Value::Null, Value::String(err.to_string())),
            None => (Value::Null, Value::Null),
        };
        Json(json!({
            "log": self.log,
            "method": self.method,
            "params": self.params,
            "result": result,
            "error": error,
        }))
        .into_response()
    }
}

/// Handler appending `name` to the context log.
pub fn mark(name: &'static str) -> Handler<TraceContext> {
    handler(move |ctx: &mut TraceContext, _: &mut ReqArg| {
        ctx.log.push(name.to_string());
        Flow::Continue
    })
}

/// Handler appending `name` and stopping when `header` is present.
pub fn stop_on(name: &'static str, header: &'static str) -> Handler<TraceContext> {
    handler(move |ctx: &mut TraceContext, _: &mut ReqArg| {
        ctx.log.push(name.to_string());
        if ctx.has_header(header) {
            Flow::Stop
        } else {
            Flow::Continue
        }
    })
}

/// Send one request through `router` in-process and decode the JSON body.
pub async fn send(router: Router, method: &str, uri: &str, headers: &[&str]) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for name in headers {
        builder = builder.header(*name, "1");
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Log entries of a rendered [`TraceContext`].
pub fn log_of(body: &Value) -> Vec<String> {
    body["log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

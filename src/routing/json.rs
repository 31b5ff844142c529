//! JSON request context.
//!
//! A ready-made [`Context`] for JSON APIs: method values are serialized as the
//! response body, resolution errors become `404 {"error": ...}`, and handlers that
//! stop the pipeline can set their own response with [`JsonContext::respond`].

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::routing::context::{Context, DispatchResult};
use crate::routing::request::{Flow, ReqArg};

/// Per-request context rendering results as JSON.
#[derive(Debug, Default)]
pub struct JsonContext {
    parts: Option<Parts>,
    path_params: String,
    result: Option<DispatchResult<Value>>,
    response: Option<(StatusCode, Value)>,
}

impl JsonContext {
    pub fn method(&self) -> Option<&Method> {
        self.parts.as_ref().map(|p| &p.method)
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.parts.as_ref().map(|p| &p.uri)
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.parts.as_ref().map(|p| &p.headers)
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()?.get(name)?.to_str().ok()
    }

    /// Residual path parameters, as resolved when the `before` hook ran.
    pub fn path_params(&self) -> &str {
        &self.path_params
    }

    /// Path parameters split on `/`, skipping empty segments.
    pub fn path_segments(&self) -> Vec<&str> {
        self.path_params.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Set an explicit response. Takes precedence over any method result.
    pub fn respond(&mut self, status: StatusCode, body: Value) {
        self.response = Some((status, body));
    }

    pub fn result(&self) -> Option<&DispatchResult<Value>> {
        self.result.as_ref()
    }
}

impl Context for JsonContext {
    type Value = Value;

    fn init(&mut self, request: Request<Body>, _arg: &mut ReqArg) -> Flow {
        let (parts, _body) = request.into_parts();
        self.parts = Some(parts);
        Flow::Continue
    }

    fn before(&mut self, arg: &mut ReqArg) -> Flow {
        self.path_params = arg.path_params().to_string();
        Flow::Continue
    }

    fn set_result(&mut self, result: DispatchResult<Value>) {
        self.result = Some(result);
    }
}

impl IntoResponse for JsonContext {
    fn into_response(self) -> Response {
        if let Some((status, body)) = self.response {
            return (status, Json(body)).into_response();
        }
        match self.result {
            Some(Ok(Some(value))) => (StatusCode::OK, Json(value)).into_response(),
            Some(Ok(None)) | None => StatusCode::NO_CONTENT.into_response(),
            Some(Err(err)) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
        }
    }
}

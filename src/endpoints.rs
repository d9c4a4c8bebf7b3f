//! The HTTP invoke API.
//!
//! `POST /2015-03-31/functions/{function_name}/invocations` runs a configured function with the
//! request body as its event and answers with the function's output. `GET /2015-03-31/functions`
//! lists the configured functions.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Response, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use base64::prelude::*;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::context::InvokeContext;
use crate::error::InvokeError;
use crate::invoker::{self, Invocation};
use crate::registry::Registry;

pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-bce-request-id");
pub const LOG_TYPE: HeaderName = HeaderName::from_static("x-bce-log-type");
pub const LOG_RESULT: HeaderName = HeaderName::from_static("x-bce-log-result");

pub struct AppState {
    pub registry: Registry,
    pub config: Config,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_type: &'static str,
    error_message: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    // Callers read the request id and log tail from response headers, so expose them
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, REQUEST_ID, LOG_TYPE])
        .allow_origin(AllowOrigin::any())
        .expose_headers([CONTENT_TYPE, REQUEST_ID, LOG_RESULT]);

    let body_limit = state.config.max_payload_bytes;

    Router::new()
        .route("/2015-03-31/functions", get(list_functions))
        .route(
            "/2015-03-31/functions/{function_name}/invocations",
            post(invoke_function),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Runs the named function.
///
/// A caller-supplied `X-Bce-Request-Id` is reused as the invocation's request id. With
/// `X-Bce-Log-Type: Tail` the captured function log is returned base64 encoded in `X-Bce-Log-Result`,
/// for failed invocations as well.
pub async fn invoke_function(
    State(state): State<Arc<AppState>>,
    Path(function_name): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Response<Body> {
    let Some(function_config) = state.config.function(&function_name) else {
        return error_response(&InvokeError::FunctionNotFound(function_name));
    };

    // Handlers are checked against the registry at startup
    let Some(function) = state.registry.get(&function_config.handler) else {
        return error_response(&InvokeError::FunctionNotFound(
            function_config.handler.clone(),
        ));
    };

    let request_id = headers
        .get(&REQUEST_ID)
        .and_then(|f| f.to_str().ok())
        .map(|f| f.to_owned());
    let context = InvokeContext::new(&state.config, function_config, request_id);
    let content_type = function.content_type();

    let Invocation {
        context,
        log,
        result,
    } = invoker::invoke(function, function_config, context, payload.to_vec()).await;

    let mut response = match result {
        Ok(output) => {
            (StatusCode::OK, [(CONTENT_TYPE, content_type)], output).into_response()
        }
        Err(e) => error_response(&e),
    };

    if let Ok(value) = HeaderValue::from_str(context.request_id()) {
        response.headers_mut().insert(REQUEST_ID, value);
    }

    if wants_log_tail(&headers) {
        if let Ok(value) = HeaderValue::from_str(&BASE64_STANDARD.encode(log.tail())) {
            response.headers_mut().insert(LOG_RESULT, value);
        }
    }

    response
}

pub async fn list_functions(State(state): State<Arc<AppState>>) -> Response<Body> {
    Json(state.config.functions.clone()).into_response()
}

fn wants_log_tail(headers: &HeaderMap) -> bool {
    headers
        .get(&LOG_TYPE)
        .and_then(|f| f.to_str().ok())
        .is_some_and(|f| f.eq_ignore_ascii_case("tail"))
}

fn status_code(err: &InvokeError) -> StatusCode {
    match err {
        InvokeError::FunctionNotFound(_) => StatusCode::NOT_FOUND,
        InvokeError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        InvokeError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
        InvokeError::Serialize(_)
        | InvokeError::Handler(_)
        | InvokeError::Io(_)
        | InvokeError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &InvokeError) -> Response<Body> {
    let body = ErrorBody {
        error_type: err.error_type(),
        error_message: err.to_string(),
    };

    (status_code(err), Json(body)).into_response()
}

// http.rs — The harvest HTTP surface.
//
// One route carries the protocol: POST /v1/harvest takes an identity
// assertion and returns the aggregated policy output. Error contract:
// a structured {"error": ...} body in every failure case — 400 for an
// undecodable request, 500 when a probe or producer fails. A failed
// request never affects other in-flight requests.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, post};
use axum::{Json, Router};

use rampart_api::{Environment, ErrorBody, Request};
use rampart_policy::{harvest, Policy};

/// Shared read-only handler state: the compiled policy set, fixed for the
/// server's lifetime.
#[derive(Clone)]
struct AppState {
    policies: Arc<[Policy]>,
}

/// Build the harvest router over a compiled policy set.
pub fn router(policies: Vec<Policy>) -> Router {
    let state = AppState {
        policies: policies.into(),
    };
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/harvest", post(harvest_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn harvest_handler(
    State(state): State<AppState>,
    request: Result<Json<Request>, JsonRejection>,
) -> HttpResponse {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::warn!(%rejection, "bad harvest request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "bad request body".to_string(),
                }),
            )
                .into_response();
        }
    };

    let env = Environment::from(request);
    tracing::debug!(machine = %env.machine.name, user = %env.user.name, "harvest");

    match harvest(&state.policies, &env) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            tracing::error!(machine = %env.machine.name, error = %err, "harvest failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

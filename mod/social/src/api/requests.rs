use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};

use burrow_core::{ListParams, Principal, ServiceError};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests))
        .route("/requests/{requester_id}/accept", post(accept_request))
        .route("/requests/{requester_id}/deny", post(deny_request))
}

/// GET /social/requests
///
/// Pending follow requests received by the caller.
async fn list_requests(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let result = state.svc
        .list_pending_requests(actor, &params)
        .map_err(ServiceError::from)?;
    let items: Vec<_> = result.items.iter().map(|a| a.public_card()).collect();
    Ok(Json(serde_json::json!({"items": items, "total": result.total})))
}

async fn accept_request(
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let edge = state.svc
        .accept_follow_request(actor, &requester_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(edge).unwrap()))
}

async fn deny_request(
    State(state): State<AppState>,
    Path(requester_id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let denied = state.svc
        .deny_follow_request(actor, &requester_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"denied": denied})))
}

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Extension, Json, Router};

use burrow_core::{Principal, ServiceError};

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{id}/follow", post(follow))
        .route("/accounts/{id}/unfollow", post(unfollow))
        .route("/accounts/{id}/block", post(block))
        .route("/accounts/{id}/unblock", post(unblock))
        .route("/accounts/{id}/mute", post(mute))
        .route("/accounts/{id}/unmute", post(unmute))
}

/// Optional body for positive transitions: `{"reason": "..."}`.
#[derive(Debug, Default, serde::Deserialize)]
struct ReasonBody {
    #[serde(default)]
    reason: Option<String>,
}

async fn follow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
    body: Option<Json<ReasonBody>>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = principal.require_account()?;
    let reason = body.map(|Json(b)| b.reason).unwrap_or_default();
    let edge = state.svc.follow(actor, &id, reason).map_err(ServiceError::from)?;
    Ok((axum::http::StatusCode::CREATED, Json(serde_json::to_value(edge).unwrap())))
}

async fn unfollow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let edge = state.svc.unfollow(actor, &id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(edge).unwrap()))
}

async fn block(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
    body: Option<Json<ReasonBody>>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = principal.require_account()?;
    let reason = body.map(|Json(b)| b.reason).unwrap_or_default();
    let edge = state.svc.block(actor, &id, reason).map_err(ServiceError::from)?;
    Ok((axum::http::StatusCode::CREATED, Json(serde_json::to_value(edge).unwrap())))
}

async fn unblock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let edge = state.svc.unblock(actor, &id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(edge).unwrap()))
}

async fn mute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
    body: Option<Json<ReasonBody>>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let actor = principal.require_account()?;
    let reason = body.map(|Json(b)| b.reason).unwrap_or_default();
    let edge = state.svc.mute(actor, &id, reason).map_err(ServiceError::from)?;
    Ok((axum::http::StatusCode::CREATED, Json(serde_json::to_value(edge).unwrap())))
}

async fn unmute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let actor = principal.require_account()?;
    let edge = state.svc.unmute(actor, &id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(edge).unwrap()))
}

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};

use burrow_core::{ListParams, Principal, ServiceError};

use crate::api::AppState;
use crate::model::CreateAccount;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/followers", get(get_followers))
        .route("/accounts/{id}/following", get(get_following))
        .route("/accounts/{id}/stats", get(get_stats))
        .route("/accounts/{id}/visibility", get(get_visibility))
}

async fn list_accounts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state.svc.list_accounts(&params).map_err(ServiceError::from)?;
    // Listings expose only the public card; full profiles go through the
    // guardian on the detail endpoint.
    let items: Vec<_> = result.items.iter().map(|a| a.public_card()).collect();
    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
    })))
}

async fn create_account(
    State(state): State<AppState>,
    Json(input): Json<CreateAccount>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let account = state.svc.create_account(input).map_err(ServiceError::from)?;
    Ok((axum::http::StatusCode::CREATED, Json(serde_json::to_value(account).unwrap())))
}

async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let account = state.svc.get_account(&id).map_err(ServiceError::from)?;

    let visible = state.svc
        .can_view(&account.id, Some(account.visibility), &principal)
        .map_err(ServiceError::from)?;

    if visible {
        Ok(Json(serde_json::to_value(&account).unwrap()))
    } else {
        Ok(Json(serde_json::to_value(account.public_card()).unwrap()))
    }
}

async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    require_self(&principal, &id)?;
    let account = state.svc.update_account(&id, patch).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(account).unwrap()))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<axum::http::StatusCode, ServiceError> {
    require_self(&principal, &id)?;
    state.svc.delete_account(&id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

async fn get_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    require_viewable(&state, &id, &principal)?;
    let result = state.svc
        .list_followers(&id, &params)
        .map_err(ServiceError::from)?;
    let items: Vec<_> = result.items.iter().map(|a| a.public_card()).collect();
    Ok(Json(serde_json::json!({"items": items, "total": result.total})))
}

async fn get_following(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    require_viewable(&state, &id, &principal)?;
    let result = state.svc
        .list_following(&id, &params)
        .map_err(ServiceError::from)?;
    let items: Vec<_> = result.items.iter().map(|a| a.public_card()).collect();
    Ok(Json(serde_json::json!({"items": items, "total": result.total})))
}

/// GET /social/accounts/{id}/stats
///
/// Counts are public; flags are relative to the caller.
async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let stats = state.svc
        .relationship_stats(&id, &principal)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(stats).unwrap()))
}

/// GET /social/accounts/{id}/visibility
///
/// The guardian's decision for the calling principal, exposed for other
/// layers that gate their own payloads.
async fn get_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let visible = state.svc
        .can_view(&id, None, &principal)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"visible": visible})))
}

/// Only the account itself may change or remove it.
fn require_self(principal: &Principal, id: &str) -> Result<(), ServiceError> {
    if principal.require_account()? != id {
        return Err(ServiceError::PermissionDenied(
            "only the account owner may do this".into(),
        ));
    }
    Ok(())
}

/// Relationship listings are account-owned data: the guardian decides.
fn require_viewable(
    state: &AppState,
    subject_id: &str,
    principal: &Principal,
) -> Result<(), ServiceError> {
    let visible = state.svc
        .can_view(subject_id, None, principal)
        .map_err(ServiceError::from)?;
    if !visible {
        return Err(ServiceError::PermissionDenied(
            "account is not visible to you".into(),
        ));
    }
    Ok(())
}

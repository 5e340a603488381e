mod accounts;
mod middleware;
mod relationships;
mod requests;

use std::sync::Arc;

use axum::Router;

use burrow_core::PrincipalResolver;

use crate::service::SocialService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub svc: Arc<SocialService>,
    pub resolver: Arc<dyn PrincipalResolver>,
}

/// Build the complete social API router.
///
/// All routes are relative — the caller nests them under `/social`.
/// Every request passes through the principal middleware, which resolves
/// the caller into a [`burrow_core::Principal`] request extension.
pub fn build_router(
    svc: Arc<SocialService>,
    resolver: Arc<dyn PrincipalResolver>,
) -> Router {
    let state = AppState { svc, resolver };

    Router::new()
        .merge(accounts::routes())
        .merge(relationships::routes())
        .merge(requests::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::principal_middleware,
        ))
        .with_state(state)
}

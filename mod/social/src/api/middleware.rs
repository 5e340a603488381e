use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::AppState;

/// Principal resolution middleware.
///
/// Runs the configured [`burrow_core::PrincipalResolver`] against the
/// request headers and stores the result as an Extension for handlers to
/// access via `Extension<Principal>`. Malformed credentials short-circuit
/// with the resolver's error; an absent principal flows through as
/// `Principal::Anonymous` and each handler decides whether that is enough.
pub async fn principal_middleware(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match state.resolver.resolve(req.headers()) {
        Ok(principal) => {
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

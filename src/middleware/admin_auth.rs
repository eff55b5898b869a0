//! Bearer-token gate for the admin surface.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::db::AppState;
use crate::error::AppError;

/// Require `Authorization: Bearer <ADMIN_TOKEN>` on every admin route.
///
/// With no token configured the whole admin surface is disabled rather
/// than left open.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = &state.admin_token else {
        tracing::warn!("Admin request rejected: no ADMIN_TOKEN configured");
        return Err(AppError::Unauthorized);
    };

    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token)
            if token.len() == expected.len()
                && bool::from(token.as_bytes().ct_eq(expected.as_bytes())) =>
        {
            Ok(next.run(req).await)
        }
        _ => Err(AppError::Unauthorized),
    }
}

use axum::extract::State;
use axum::http::StatusCode;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreateSignup, Signup, SocialClick};

/// Secret-drop mailing list signup. Duplicate email is a 409.
pub async fn create_signup(
    State(state): State<AppState>,
    Json(body): Json<CreateSignup>,
) -> Result<(StatusCode, Json<Signup>)> {
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }

    let conn = state.db.get()?;
    let signup = queries::create_signup(&conn, email)?;
    Ok((StatusCode::CREATED, Json(signup)))
}

/// Count one click on a social platform link.
pub async fn social_click(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<SocialClick>> {
    let platform = platform.trim().to_lowercase();
    if platform.is_empty()
        || platform.len() > 32
        || !platform.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::BadRequest("Invalid platform name".to_string()));
    }

    let conn = state.db.get()?;
    let click = queries::record_social_click(&conn, &platform)?;
    Ok(Json(click))
}

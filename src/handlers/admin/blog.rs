use axum::extract::State;
use axum::http::StatusCode;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{BlogPost, CreateBlogPost};

pub async fn create_post(
    State(state): State<AppState>,
    Json(body): Json<CreateBlogPost>,
) -> Result<(StatusCode, Json<BlogPost>)> {
    if body.slug.trim().is_empty() || body.title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Slug and title are required".to_string(),
        ));
    }

    let conn = state.db.get()?;
    let post = queries::create_blog_post(&conn, &body)?;
    tracing::info!(post_id = %post.id, slug = %post.slug, "Blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

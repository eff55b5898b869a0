use axum::extract::State;
use serde::Serialize;

use crate::db::{queries, AppState};
use crate::error::{msg, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::BlogPost;

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<BlogPost>,
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostsResponse>> {
    let conn = state.db.get()?;
    let posts = queries::list_published_posts(&conn)?;
    Ok(Json(PostsResponse { posts }))
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: BlogPost,
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>> {
    let conn = state.db.get()?;
    let post = queries::get_blog_post_by_slug(&conn, &slug)?.or_not_found(msg::POST_NOT_FOUND)?;
    Ok(Json(PostResponse { post }))
}

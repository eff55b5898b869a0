use axum::extract::State;
use axum::http::StatusCode;

use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreatePoll, Poll, PollWithOptions, UpdatePoll};

pub async fn create_poll(
    State(state): State<AppState>,
    Json(body): Json<CreatePoll>,
) -> Result<(StatusCode, Json<PollWithOptions>)> {
    let mut conn = state.db.get()?;
    queries::get_episode_by_id(&conn, &body.episode_id)?.or_not_found(msg::EPISODE_NOT_FOUND)?;

    let poll = queries::create_poll(&mut conn, &body)?;
    tracing::info!(poll_id = %poll.poll.id, episode_id = %poll.poll.episode_id,
        options = poll.options.len(), "Poll created");
    Ok((StatusCode::CREATED, Json(poll)))
}

pub async fn update_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePoll>,
) -> Result<Json<Poll>> {
    let conn = state.db.get()?;
    let poll = match queries::update_poll(&conn, &id, &body)? {
        Some(poll) => poll,
        None => queries::get_poll_by_id(&conn, &id)?.or_not_found(msg::POLL_NOT_FOUND)?,
    };
    Ok(Json(poll))
}

pub async fn delete_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let conn = state.db.get()?;
    if !queries::delete_poll(&conn, &id)? {
        return Err(AppError::NotFound(msg::POLL_NOT_FOUND.to_string()));
    }
    tracing::info!(poll_id = %id, "Poll deleted");
    Ok(StatusCode::NO_CONTENT)
}

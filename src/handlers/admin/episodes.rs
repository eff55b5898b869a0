use axum::extract::State;
use axum::http::StatusCode;

use crate::db::{queries, AppState};
use crate::error::{msg, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreateEpisode, Episode, UpdateEpisode};

pub async fn create_episode(
    State(state): State<AppState>,
    Json(body): Json<CreateEpisode>,
) -> Result<(StatusCode, Json<Episode>)> {
    let conn = state.db.get()?;
    let episode = queries::create_episode(&conn, &body)?;
    tracing::info!(episode_id = %episode.id, external_id = %episode.external_id,
        "Episode created");
    Ok((StatusCode::CREATED, Json(episode)))
}

pub async fn update_episode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateEpisode>,
) -> Result<Json<Episode>> {
    let conn = state.db.get()?;
    // An empty patch is a no-op read.
    let episode = match queries::update_episode(&conn, &id, &body)? {
        Some(episode) => episode,
        None => queries::get_episode_by_id(&conn, &id)?.or_not_found(msg::EPISODE_NOT_FOUND)?,
    };
    Ok(Json(episode))
}

pub async fn delete_episode(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let conn = state.db.get()?;
    if !queries::delete_episode(&conn, &id)? {
        return Err(crate::error::AppError::NotFound(
            msg::EPISODE_NOT_FOUND.to_string(),
        ));
    }
    tracing::info!(episode_id = %id, "Episode deleted");
    Ok(StatusCode::NO_CONTENT)
}

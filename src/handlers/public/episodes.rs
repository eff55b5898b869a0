use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{msg, OptionExt, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Episode, EpisodeStatus, Visibility};

#[derive(Debug, Default, Deserialize)]
pub struct ListEpisodesQuery {
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Serialize)]
pub struct EpisodesResponse {
    pub episodes: Vec<Episode>,
}

/// Published episodes, optionally narrowed to one visibility bucket.
/// Passphrases never serialize, so no post-filtering is needed.
pub async fn list_episodes(
    State(state): State<AppState>,
    Query(query): Query<ListEpisodesQuery>,
) -> Result<Json<EpisodesResponse>> {
    let conn = state.db.get()?;
    let episodes =
        queries::list_episodes(&conn, Some(EpisodeStatus::Published), query.visibility)?;
    Ok(Json(EpisodesResponse { episodes }))
}

#[derive(Debug, Serialize)]
pub struct EpisodeResponse {
    pub episode: Episode,
}

pub async fn get_episode(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EpisodeResponse>> {
    let conn = state.db.get()?;
    let episode = queries::get_episode_by_id(&conn, &id)?.or_not_found(msg::EPISODE_NOT_FOUND)?;
    Ok(Json(EpisodeResponse { episode }))
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub passphrase: String,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

/// Check a premiere passphrase. Purely a presentation gate: the response
/// tells the client whether to reveal the page, nothing is stored.
pub async fn unlock_episode(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>> {
    let conn = state.db.get()?;
    let unlocked = queries::verify_episode_passphrase(&conn, &id, &body.passphrase)?
        .or_not_found(msg::EPISODE_NOT_FOUND)?;
    Ok(Json(UnlockResponse { unlocked }))
}

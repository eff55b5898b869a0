use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{msg, AppError, OptionExt, Result};
use crate::extractors::{Json, Path};
use crate::models::{PollStatus, PollWithOptions};

#[derive(Debug, Serialize)]
pub struct PollsResponse {
    pub polls: Vec<PollWithOptions>,
}

/// Live polls for an episode, each with its options in display order.
pub async fn list_episode_polls(
    State(state): State<AppState>,
    Path(episode_id): Path<String>,
) -> Result<Json<PollsResponse>> {
    let conn = state.db.get()?;
    queries::get_episode_by_id(&conn, &episode_id)?.or_not_found(msg::EPISODE_NOT_FOUND)?;

    let polls = queries::list_polls_by_episode(&conn, &episode_id, Some(PollStatus::Live))?;
    let mut with_options = Vec::with_capacity(polls.len());
    for poll in polls {
        let options = queries::get_poll_options(&conn, &poll.id)?;
        with_options.push(PollWithOptions { poll, options });
    }
    Ok(Json(PollsResponse {
        polls: with_options,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_id: String,
}

/// Cast a vote on the episode's current live poll.
///
/// The increment happens in one UPDATE statement, so concurrent votes all
/// land. Returns the poll with refreshed counts.
pub async fn vote(
    State(state): State<AppState>,
    Path(episode_id): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Result<Json<PollWithOptions>> {
    let conn = state.db.get()?;
    queries::get_episode_by_id(&conn, &episode_id)?.or_not_found(msg::EPISODE_NOT_FOUND)?;

    let poll =
        queries::get_latest_live_poll(&conn, &episode_id)?.or_not_found(msg::NO_LIVE_POLL)?;

    let updated = queries::increment_vote(&conn, &poll.id, &body.option_id)?;
    if updated.is_none() {
        return Err(AppError::BadRequest(msg::OPTION_NOT_IN_POLL.to_string()));
    }

    let options = queries::get_poll_options(&conn, &poll.id)?;
    Ok(Json(PollWithOptions { poll, options }))
}

//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_status(
  State(state): State<Arc<AppState>>,
  Query(q): Query<DateQuery>,
) -> impl IntoResponse {
  Json(logic::status(&state, q.date).await)
}

#[instrument(level = "info", skip(state), fields(preview = q.preview.unwrap_or(0)))]
pub async fn http_get_headline(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HeadlineQuery>,
) -> Result<Json<HeadlineOut>, ApiError> {
  let h = logic::fetch_headline(&state, q.date, q.preview.unwrap_or(0) != 0).await?;
  Ok(Json(h.into()))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_puzzle(
  State(state): State<Arc<AppState>>,
  body: Option<Json<NewPuzzleIn>>,
) -> Result<impl IntoResponse, ApiError> {
  let date = body.and_then(|Json(b)| b.date);
  let view = logic::new_puzzle(&state, date).await?;
  Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_puzzle(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PuzzleView>, ApiError> {
  Ok(Json(logic::puzzle_view(&state, id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id, letter = %body.letter))]
pub async fn http_post_guess(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GuessIn>,
) -> Result<Json<PuzzleView>, ApiError> {
  let view = logic::apply_guess(&state, id, &body.letter).await?;
  info!(target: "puzzle", %id, status = ?view.status, wrong = view.wrong_guesses, "HTTP guess applied");
  Ok(Json(view))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_delete_puzzle(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  logic::discard_puzzle(&state, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[instrument(level = "info", skip(state, body), fields(date = %body.date, score = body.score))]
pub async fn http_post_play(
  State(state): State<Arc<AppState>>,
  Json(body): Json<PlayIn>,
) -> Result<Json<PlayOut>, ApiError> {
  let streak = logic::record_play(&state, body).await?;
  Ok(Json(PlayOut { streak }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_history(
  State(state): State<Arc<AppState>>,
  Query(q): Query<HistoryQuery>,
) -> impl IntoResponse {
  Json(logic::history(&state, &q).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_history(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(ClearedOut { cleared: logic::clear_history(&state).await })
}

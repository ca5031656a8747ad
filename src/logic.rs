//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Status (gate + streak) for the player's day
//!   - Headline retrieval behind the daily gate
//!   - Starting, guessing on and discarding server-side puzzles
//!   - Recording finished plays and querying history

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Headline, PlayRecord};
use crate::error::ApiError;
use crate::protocol::{to_view, HistoryQuery, PuzzleView, StatusOut};
use crate::puzzle::{GuessOutcome, Puzzle};
use crate::state::{AppState, Session};
use crate::util::{key_to_letter, local_today, trunc_for_log};

#[instrument(level = "info", skip(state))]
pub async fn status(state: &AppState, date: Option<NaiveDate>) -> StatusOut {
  let date = date.unwrap_or_else(local_today);
  let h = state.history.read().await;
  let plays_today = h.plays_on(date);
  StatusOut {
    can_play: state.gate.allows(plays_today),
    plays_today,
    max_daily: state.gate.max_daily(),
    streak: h.streak(date),
    first_play_date: h.first_play_date(),
  }
}

/// Headline for a client that runs the puzzle itself. A preview skips the gate so the
/// "come back tomorrow" screen can still show an image.
#[instrument(level = "info", skip(state))]
pub async fn fetch_headline(state: &AppState, date: Option<NaiveDate>, preview: bool) -> Result<Headline, ApiError> {
  let date = date.unwrap_or_else(local_today);
  if !preview && !state.can_play(date).await {
    return Err(ApiError::LimitReached);
  }
  let (h, origin) = state.choose_headline().await.ok_or(ApiError::NoHeadline)?;
  info!(target: "puzzle", %origin, preview, "Headline served");
  Ok(h)
}

#[instrument(level = "info", skip(state))]
pub async fn new_puzzle(state: &AppState, date: Option<NaiveDate>) -> Result<PuzzleView, ApiError> {
  let date = date.unwrap_or_else(local_today);
  if !state.can_play(date).await {
    info!(target: "puzzle", %date, "Daily limit reached; puzzle not created");
    return Err(ApiError::LimitReached);
  }
  let (headline, origin) = state.choose_headline().await.ok_or(ApiError::NoHeadline)?;
  let puzzle = Puzzle::new(&headline.headline, state.rules.max_wrong).ok_or(ApiError::NoHeadline)?;

  let now = Instant::now();
  let id = Uuid::new_v4();
  let mut session = Session { puzzle, headline, date, result: None };
  // a headline with no letters to guess is already won
  finalize(state, id, &mut session, now).await;

  let view = to_view(id, &session, now);
  let words = session.puzzle.word_count();
  let answer = trunc_for_log(session.puzzle.headline(), 80);
  let replaced = state.replace_session(id, session).await;
  info!(target: "puzzle", %id, %origin, replaced, words, "Puzzle created");
  debug!(target: "puzzle", %id, %answer, "Puzzle answer");
  Ok(view)
}

#[instrument(level = "debug", skip(state))]
pub async fn puzzle_view(state: &AppState, id: Uuid) -> Result<PuzzleView, ApiError> {
  let s = state.get_session(id).await.ok_or(ApiError::UnknownPuzzle(id))?;
  Ok(to_view(id, &s, Instant::now()))
}

/// Apply one key press. Noise keys and repeats are accepted and change nothing.
/// When the guess ends the puzzle it is finished and recorded exactly once.
#[instrument(level = "info", skip(state), fields(%id))]
pub async fn apply_guess(state: &AppState, id: Uuid, key: &str) -> Result<PuzzleView, ApiError> {
  let now = Instant::now();
  let mut sessions = state.sessions.write().await;
  let s = sessions.get_mut(&id).ok_or(ApiError::UnknownPuzzle(id))?;

  let outcome = match key_to_letter(key) {
    Some(letter) => s.puzzle.guess_letter(letter, now),
    None => GuessOutcome::Ignored,
  };
  debug!(target: "puzzle", %id, ?outcome, status = ?s.puzzle.status(), wrong = s.puzzle.wrong_guesses(), "Guess applied");

  finalize(state, id, s, now).await;
  Ok(to_view(id, s, now))
}

/// Finish a terminal puzzle and record it in history. Runs at most once per session.
async fn finalize(state: &AppState, id: Uuid, s: &mut Session, now: Instant) {
  if s.result.is_some() {
    return;
  }
  let Some(finished) = s.puzzle.finish(now) else { return };
  let record = PlayRecord {
    headline: finished.headline.clone(),
    score: finished.score,
    time_taken: finished.time_taken,
    date: s.date,
    won: finished.won,
    url: s.headline.url.clone(),
    source_name: s.headline.source_name.clone(),
    published_at: s.headline.published_at.clone(),
  };
  let streak = state.history.write().await.record(record);
  info!(target: "history", %id, won = finished.won, score = %format!("{:.1}", finished.score), time_taken = %format!("{:.1}", finished.time_taken), streak, "Puzzle finished");
  s.result = Some((finished, streak));
}

pub async fn discard_puzzle(state: &AppState, id: Uuid) -> Result<(), ApiError> {
  if state.discard_session(id).await {
    Ok(())
  } else {
    Err(ApiError::UnknownPuzzle(id))
  }
}

/// Record a play finished client-side. Subject to the daily gate.
#[instrument(level = "info", skip(state, record), fields(date = %record.date, won = record.won))]
pub async fn record_play(state: &AppState, record: PlayRecord) -> Result<u32, ApiError> {
  if record.headline.trim().is_empty() {
    return Err(ApiError::BadRequest("headline must not be empty".into()));
  }
  if !record.score.is_finite() || record.score < 0.0 || !record.time_taken.is_finite() || record.time_taken < 0.0 {
    return Err(ApiError::BadRequest("score and timeTaken must be non-negative numbers".into()));
  }
  let mut h = state.history.write().await;
  if !state.gate.allows(h.plays_on(record.date)) {
    warn!(target: "history", date = %record.date, "Play rejected: daily cap reached");
    return Err(ApiError::LimitReached);
  }
  let streak = h.record(record);
  info!(target: "history", streak, "Play recorded");
  Ok(streak)
}

pub async fn history(state: &AppState, q: &HistoryQuery) -> Vec<PlayRecord> {
  let h = state.history.read().await;
  match (q.q.as_deref().map(str::trim).filter(|s| !s.is_empty()), q.date) {
    (Some(needle), date) => {
      let mut out = h.search(needle);
      if let Some(d) = date {
        out.retain(|e| e.date == d);
      }
      out
    }
    (None, Some(d)) => h.on_date(d),
    (None, None) => h.entries().to_vec(),
  }
}

#[instrument(level = "info", skip(state))]
pub async fn clear_history(state: &AppState) -> usize {
  let n = state.history.write().await.clear();
  info!(target: "history", cleared = n, "History cleared");
  n
}

//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Headline, PlayRecord};
use crate::puzzle::{LetterState, PuzzleStatus};
use crate::state::Session;
use crate::util::title_case;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Status {
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    NewPuzzle {
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    Guess {
        #[serde(rename = "puzzleId")]
        puzzle_id: Uuid,
        letter: String,
    },
    Discard {
        #[serde(rename = "puzzleId")]
        puzzle_id: Uuid,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Status {
        status: StatusOut,
    },
    Puzzle {
        puzzle: PuzzleView,
    },
    Discarded {
        #[serde(rename = "puzzleId")]
        puzzle_id: Uuid,
    },
    LimitReached {
        message: String,
    },
    NoHeadline,
    Error {
        message: String,
    },
}

/// One key of the on-screen alphabet.
#[derive(Debug, Serialize, PartialEq)]
pub struct LetterOut {
    pub letter: char,
    pub state: LetterState,
}

/// Result block attached to a view once the puzzle is over and recorded.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayResultOut {
    pub won: bool,
    pub score: f64,
    pub time_taken: f64,
    pub streak: u32,
}

/// Revealed article details; only sent once the puzzle is over.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleOut {
    pub headline: String,
    pub display_headline: String,
    pub description: String,
    pub url: String,
    pub source_name: String,
    pub published_at: Option<String>,
}

/// DTO used by both WS and HTTP for puzzle delivery. The headline text stays hidden
/// until the puzzle is over.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleView {
    pub id: Uuid,
    pub status: PuzzleStatus,
    pub words: Vec<String>,
    pub completed_words: Vec<bool>,
    pub alphabet: Vec<LetterOut>,
    pub wrong_guesses: u32,
    pub max_wrong: u32,
    pub remaining_wrong: u32,
    /// True once the first letter is accepted; the client starts its clock display then.
    pub started: bool,
    pub elapsed: f64,
    pub url_to_image: String,
    pub date: NaiveDate,
    pub article: Option<ArticleOut>,
    pub result: Option<PlayResultOut>,
}

/// Convert an internal `Session` to the public DTO as of `now`.
pub fn to_view(id: Uuid, s: &Session, now: Instant) -> PuzzleView {
    let p = &s.puzzle;
    let article = p.status().is_terminal().then(|| ArticleOut {
        headline: s.headline.headline.clone(),
        display_headline: title_case(&s.headline.headline),
        description: s.headline.description.clone(),
        url: s.headline.url.clone(),
        source_name: s.headline.source_name.clone(),
        published_at: s.headline.published_at.clone(),
    });
    PuzzleView {
        id,
        status: p.status(),
        words: p.masked_words(),
        completed_words: (0..p.word_count()).map(|i| p.word_completed(i)).collect(),
        alphabet: p
            .letter_board()
            .into_iter()
            .map(|(letter, state)| LetterOut { letter, state })
            .collect(),
        wrong_guesses: p.wrong_guesses(),
        max_wrong: p.max_wrong(),
        remaining_wrong: p.remaining_wrong(),
        started: p.started_at().is_some(),
        elapsed: (p.elapsed(now).as_secs_f64() * 10.0).round() / 10.0,
        url_to_image: s.headline.url_to_image.clone(),
        date: s.date,
        article,
        result: s.result.as_ref().map(|(f, streak)| PlayResultOut {
            won: f.won,
            score: f.score,
            time_taken: f.time_taken,
            streak: *streak,
        }),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOut {
    pub can_play: bool,
    pub plays_today: usize,
    pub max_daily: Option<usize>,
    pub streak: u32,
    pub first_play_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HeadlineQuery {
    #[serde(default)]
    pub preview: Option<u8>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineOut {
    pub headline: String,
    pub description: String,
    pub url: String,
    pub url_to_image: String,
    pub source_name: String,
    pub published_at: Option<String>,
}

impl From<Headline> for HeadlineOut {
    fn from(h: Headline) -> Self {
        Self {
            headline: h.headline,
            description: h.description,
            url: h.url,
            url_to_image: h.url_to_image,
            source_name: h.source_name,
            published_at: h.published_at,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct NewPuzzleIn {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct GuessIn {
    pub letter: String,
}

/// A play finished in the browser (client-side engine).
pub type PlayIn = PlayRecord;

#[derive(Debug, Serialize)]
pub struct PlayOut {
    pub streak: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ClearedOut {
    pub cleared: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

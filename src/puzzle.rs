//! Headline puzzle engine.
//!
//! A `Puzzle` owns the masked headline: which letters are revealed in which word,
//! which letters were classified correct/incorrect, the wrong-guess budget and the clock.
//! It performs no I/O; callers pass the current `Instant` so the clock is testable.
//!
//! Lifecycle:
//!   InProgress --(all words completed)--> Won
//!   InProgress --(wrong guesses == max)--> Lost
//! Both terminal states ignore further guesses.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Wrong guesses allowed before the puzzle is lost.
pub const DEFAULT_MAX_WRONG: u32 = 2;

/// Elapsed time is clamped to this floor when scoring so an instant win stays finite.
const MIN_SCORED_SECS: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleStatus {
  InProgress,
  Won,
  Lost,
}

impl PuzzleStatus {
  pub fn is_terminal(self) -> bool {
    !matches!(self, PuzzleStatus::InProgress)
  }
}

/// Classification of a single key on the letter board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterState {
  Unguessed,
  Correct,
  Incorrect,
}

/// What a call to `guess_letter` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
  /// Not A–Z, already classified, or the puzzle is over.
  Ignored,
  Correct,
  Incorrect,
}

/// Summary handed to the history recorder once a puzzle is over.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedPuzzle {
  pub headline: String,
  pub score: f64,
  pub time_taken: f64,
  pub won: bool,
}

#[derive(Clone, Debug)]
struct Word {
  text: String,
  revealed: BTreeSet<char>,
  completed: bool,
}

impl Word {
  fn new(text: &str) -> Self {
    let mut w = Word { text: text.to_string(), revealed: BTreeSet::new(), completed: false };
    w.completed = w.all_revealed();
    w
  }

  fn all_revealed(&self) -> bool {
    self.text.chars().filter(|c| is_puzzle_letter(*c)).all(|c| self.revealed.contains(&c))
  }

  fn masked(&self) -> String {
    self
      .text
      .chars()
      .map(|c| if !is_puzzle_letter(c) || self.revealed.contains(&c) { c } else { '_' })
      .collect()
  }
}

/// True for the only characters a player can guess (and that ever need guessing).
pub fn is_puzzle_letter(c: char) -> bool {
  c.is_ascii_uppercase()
}

#[derive(Clone, Debug)]
pub struct Puzzle {
  headline: String,
  words: Vec<Word>,
  guessed_correct: BTreeSet<char>,
  guessed_incorrect: BTreeSet<char>,
  wrong_guesses: u32,
  max_wrong: u32,
  started_at: Option<Instant>,
  finished_at: Option<Instant>,
  status: PuzzleStatus,
  score: f64,
}

impl Puzzle {
  /// Build a puzzle from headline text. Returns `None` for an empty headline.
  ///
  /// Words are split on single spaces; a token with no A–Z characters (punctuation,
  /// digits, or the empty token between doubled spaces) starts completed, so a headline
  /// made only of such tokens is won immediately.
  pub fn new(headline: &str, max_wrong: u32) -> Option<Self> {
    if headline.is_empty() {
      return None;
    }
    let words: Vec<Word> = headline.split(' ').map(Word::new).collect();
    let mut p = Puzzle {
      headline: headline.to_string(),
      words,
      guessed_correct: BTreeSet::new(),
      guessed_incorrect: BTreeSet::new(),
      wrong_guesses: 0,
      max_wrong: max_wrong.max(1),
      started_at: None,
      finished_at: None,
      status: PuzzleStatus::InProgress,
      score: 0.0,
    };
    if p.all_completed() {
      p.status = PuzzleStatus::Won;
    }
    Some(p)
  }

  pub fn headline(&self) -> &str { &self.headline }
  pub fn status(&self) -> PuzzleStatus { self.status }
  pub fn wrong_guesses(&self) -> u32 { self.wrong_guesses }
  pub fn max_wrong(&self) -> u32 { self.max_wrong }
  pub fn remaining_wrong(&self) -> u32 { self.max_wrong.saturating_sub(self.wrong_guesses) }
  pub fn started_at(&self) -> Option<Instant> { self.started_at }

  pub fn word_count(&self) -> usize { self.words.len() }

  pub fn word_completed(&self, index: usize) -> bool {
    self.words.get(index).map(|w| w.completed).unwrap_or(false)
  }

  /// Apply a guess at time `now`.
  pub fn guess_letter(&mut self, letter: char, now: Instant) -> GuessOutcome {
    if !is_puzzle_letter(letter) || self.status.is_terminal() {
      return GuessOutcome::Ignored;
    }
    if self.guessed_correct.contains(&letter) || self.guessed_incorrect.contains(&letter) {
      return GuessOutcome::Ignored;
    }
    if self.started_at.is_none() {
      self.started_at = Some(now);
    }

    let mut found = false;
    for word in self.words.iter_mut().filter(|w| w.text.contains(letter)) {
      word.revealed.insert(letter);
      word.completed = word.all_revealed();
      found = true;
    }

    let outcome = if found {
      self.guessed_correct.insert(letter);
      GuessOutcome::Correct
    } else {
      self.guessed_incorrect.insert(letter);
      self.wrong_guesses += 1;
      GuessOutcome::Incorrect
    };

    if self.all_completed() {
      self.status = PuzzleStatus::Won;
    } else if self.wrong_guesses >= self.max_wrong {
      self.status = PuzzleStatus::Lost;
    }
    outcome
  }

  /// Time since the first guess; frozen once `finish` has run.
  pub fn elapsed(&self, now: Instant) -> Duration {
    match (self.started_at, self.finished_at) {
      (Some(start), Some(end)) => end.saturating_duration_since(start),
      (Some(start), None) => now.saturating_duration_since(start),
      _ => Duration::ZERO,
    }
  }

  /// Stop the clock and compute the score. Returns `None` while the puzzle is still
  /// in progress; repeated calls return the same summary.
  pub fn finish(&mut self, now: Instant) -> Option<FinishedPuzzle> {
    if !self.status.is_terminal() {
      return None;
    }
    if self.finished_at.is_none() {
      self.finished_at = Some(now);
      self.score = match self.status {
        PuzzleStatus::Won => score_for(self.elapsed(now)),
        _ => 0.0,
      };
    }
    Some(FinishedPuzzle {
      headline: self.headline.clone(),
      score: self.score,
      time_taken: self.elapsed(now).as_secs_f64(),
      won: self.status == PuzzleStatus::Won,
    })
  }

  /// Per-word view with hidden letters shown as `_`.
  pub fn masked_words(&self) -> Vec<String> {
    self.words.iter().map(Word::masked).collect()
  }

  /// Board state for each letter A–Z, in order.
  pub fn letter_board(&self) -> Vec<(char, LetterState)> {
    ('A'..='Z')
      .map(|c| {
        let st = if self.guessed_correct.contains(&c) {
          LetterState::Correct
        } else if self.guessed_incorrect.contains(&c) {
          LetterState::Incorrect
        } else {
          LetterState::Unguessed
        };
        (c, st)
      })
      .collect()
  }

  fn all_completed(&self) -> bool {
    self.words.iter().all(|w| w.completed)
  }
}

/// `1000 / seconds`, rounded to one decimal.
pub fn score_for(elapsed: Duration) -> f64 {
  let secs = elapsed.as_secs_f64().max(MIN_SCORED_SECS);
  (1000.0 / secs * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guess_all(p: &mut Puzzle, letters: &str, now: Instant) -> Vec<GuessOutcome> {
    letters.chars().map(|c| p.guess_letter(c, now)).collect()
  }

  #[test]
  fn cat_sat_is_won_after_covering_letters() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("CAT SAT", 2).expect("puzzle");
    let outcomes = guess_all(&mut p, "CAT", t0);
    assert!(outcomes.iter().all(|o| *o == GuessOutcome::Correct));
    assert_eq!(p.status(), PuzzleStatus::InProgress);
    assert!(p.word_completed(0));
    assert!(!p.word_completed(1));

    p.guess_letter('S', t0 + Duration::from_secs(4));
    assert_eq!(p.status(), PuzzleStatus::Won);

    let done = p.finish(t0 + Duration::from_secs(4)).expect("finished");
    assert!(done.won);
    assert_eq!(done.score, 250.0);
    assert_eq!(done.headline, "CAT SAT");
  }

  #[test]
  fn cat_sat_is_lost_after_two_misses() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("CAT SAT", 2).expect("puzzle");
    assert_eq!(p.guess_letter('Z', t0), GuessOutcome::Incorrect);
    assert_eq!(p.wrong_guesses(), 1);
    assert_eq!(p.status(), PuzzleStatus::InProgress);

    assert_eq!(p.guess_letter('Q', t0), GuessOutcome::Incorrect);
    assert_eq!(p.wrong_guesses(), 2);
    assert_eq!(p.status(), PuzzleStatus::Lost);

    let done = p.finish(t0 + Duration::from_millis(500)).expect("finished");
    assert!(!done.won);
    assert_eq!(done.score, 0.0);
  }

  #[test]
  fn repeated_guess_is_a_noop() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("HELLO WORLD", 2).expect("puzzle");
    p.guess_letter('Z', t0);
    let masked = p.masked_words();
    let board = p.letter_board();

    assert_eq!(p.guess_letter('Z', t0 + Duration::from_secs(1)), GuessOutcome::Ignored);
    assert_eq!(p.wrong_guesses(), 1);
    assert_eq!(p.status(), PuzzleStatus::InProgress);
    assert_eq!(p.masked_words(), masked);
    assert_eq!(p.letter_board(), board);
    assert_eq!(p.started_at(), Some(t0));

    p.guess_letter('L', t0);
    assert_eq!(p.guess_letter('L', t0), GuessOutcome::Ignored);
    assert_eq!(p.masked_words(), vec!["__LL_".to_string(), "___L_".to_string()]);
  }

  #[test]
  fn invalid_input_is_ignored() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("RUST", 2).expect("puzzle");
    for c in ['r', '1', '!', ' ', 'É'] {
      assert_eq!(p.guess_letter(c, t0), GuessOutcome::Ignored);
    }
    assert_eq!(p.wrong_guesses(), 0);
    assert!(p.started_at().is_none(), "clock starts on the first accepted guess");
  }

  #[test]
  fn no_mutation_after_loss() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("CAT", 2).expect("puzzle");
    guess_all(&mut p, "XY", t0);
    assert_eq!(p.status(), PuzzleStatus::Lost);
    assert_eq!(p.guess_letter('C', t0), GuessOutcome::Ignored);
    assert_eq!(p.guess_letter('Q', t0), GuessOutcome::Ignored);
    assert_eq!(p.wrong_guesses(), 2);
    assert_eq!(p.masked_words(), vec!["___".to_string()]);
  }

  #[test]
  fn punctuation_never_blocks_completion() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("WOW!", 2).expect("puzzle");
    assert_eq!(p.masked_words(), vec!["___!".to_string()]);
    p.guess_letter('W', t0);
    assert!(!p.word_completed(0));
    p.guess_letter('O', t0);
    assert!(p.word_completed(0));
    assert_eq!(p.status(), PuzzleStatus::Won);
  }

  #[test]
  fn single_letter_headline() {
    let mut p = Puzzle::new("A", 2).expect("puzzle");
    p.guess_letter('A', Instant::now());
    assert_eq!(p.status(), PuzzleStatus::Won);
  }

  #[test]
  fn punctuation_only_headline_starts_won() {
    let mut p = Puzzle::new("... 2024 !?", 2).expect("puzzle");
    assert_eq!(p.status(), PuzzleStatus::Won);
    assert_eq!(p.guess_letter('A', Instant::now()), GuessOutcome::Ignored);
    let done = p.finish(Instant::now()).expect("finished");
    assert!(done.won);
    assert_eq!(done.time_taken, 0.0);
    assert!(done.score.is_finite());
  }

  #[test]
  fn empty_headline_is_rejected() {
    assert!(Puzzle::new("", 2).is_none());
  }

  #[test]
  fn doubled_spaces_yield_completed_empty_token() {
    let p = Puzzle::new("GO  NOW", 2).expect("puzzle");
    assert_eq!(p.word_count(), 3);
    assert!(p.word_completed(1));
    assert_eq!(p.status(), PuzzleStatus::InProgress);
  }

  #[test]
  fn guessing_every_letter_wins_despite_misses() {
    let headline = "FED HOLDS RATES STEADY, SIGNALS CUTS";
    let t0 = Instant::now();
    let mut p = Puzzle::new(headline, 2).expect("puzzle");
    p.guess_letter('Q', t0);
    let letters: BTreeSet<char> = headline.chars().filter(|c| is_puzzle_letter(*c)).collect();
    for c in letters.iter().rev() {
      p.guess_letter(*c, t0);
    }
    assert_eq!(p.status(), PuzzleStatus::Won);
    assert_eq!(p.wrong_guesses(), 1);
    assert_eq!(p.masked_words().join(" "), headline);
  }

  #[test]
  fn letter_board_tracks_classification() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("DOG", 3).expect("puzzle");
    p.guess_letter('D', t0);
    p.guess_letter('Z', t0);
    let board = p.letter_board();
    assert_eq!(board.len(), 26);
    assert_eq!(board[3], ('D', LetterState::Correct));
    assert_eq!(board[25], ('Z', LetterState::Incorrect));
    assert_eq!(board[0], ('A', LetterState::Unguessed));
    assert_eq!(p.remaining_wrong(), 2);
    assert_eq!(p.masked_words(), vec!["D__".to_string()]);
  }

  #[test]
  fn elapsed_is_frozen_after_finish() {
    let t0 = Instant::now();
    let mut p = Puzzle::new("A", 2).expect("puzzle");
    assert_eq!(p.finish(t0), None, "still in progress");
    p.guess_letter('A', t0);
    let first = p.finish(t0 + Duration::from_secs(2)).expect("finished");
    let again = p.finish(t0 + Duration::from_secs(60)).expect("finished");
    assert_eq!(first, again);
    assert_eq!(p.elapsed(t0 + Duration::from_secs(90)), Duration::from_secs(2));
    assert_eq!(first.score, 500.0);
  }

  #[test]
  fn score_decreases_with_time() {
    let mut last = f64::INFINITY;
    for ms in [250u64, 1_000, 3_300, 10_000, 61_000] {
      let s = score_for(Duration::from_millis(ms));
      assert!(s < last, "score {s} at {ms}ms not below {last}");
      last = s;
    }
    assert_eq!(score_for(Duration::from_secs(3)), 333.3);
  }
}

//! Play history: the log of finished puzzles keyed by the player's local calendar date.
//!
//! The streak is the number of consecutive days with at least one won puzzle, counted
//! back from the reference day. A day that has no win yet does not break the streak,
//! so counting starts from the day before in that case.

use chrono::{Days, NaiveDate};

use crate::domain::PlayRecord;

#[derive(Clone, Debug, Default)]
pub struct History {
  entries: Vec<PlayRecord>,
}

impl History {
  pub fn new() -> Self { Self::default() }

  /// Append a finished play and return the streak as of that play's date.
  pub fn record(&mut self, entry: PlayRecord) -> u32 {
    let date = entry.date;
    self.entries.push(entry);
    self.streak(date)
  }

  pub fn entries(&self) -> &[PlayRecord] { &self.entries }

  pub fn plays_on(&self, date: NaiveDate) -> usize {
    self.entries.iter().filter(|e| e.date == date).count()
  }

  pub fn first_play_date(&self) -> Option<NaiveDate> {
    self.entries.iter().map(|e| e.date).min()
  }

  pub fn on_date(&self, date: NaiveDate) -> Vec<PlayRecord> {
    self.entries.iter().filter(|e| e.date == date).cloned().collect()
  }

  /// Case-insensitive substring match on the headline.
  pub fn search(&self, needle: &str) -> Vec<PlayRecord> {
    let needle = needle.to_lowercase();
    self
      .entries
      .iter()
      .filter(|e| e.headline.to_lowercase().contains(&needle))
      .cloned()
      .collect()
  }

  pub fn contains_headline(&self, headline: &str) -> bool {
    self.entries.iter().any(|e| e.headline == headline)
  }

  pub fn streak(&self, today: NaiveDate) -> u32 {
    let won_on = |d: NaiveDate| self.entries.iter().any(|e| e.won && e.date == d);

    let mut day = if won_on(today) {
      today
    } else {
      match today.checked_sub_days(Days::new(1)) {
        Some(d) => d,
        None => return 0,
      }
    };

    let mut streak = 0;
    while won_on(day) {
      streak += 1;
      day = match day.checked_sub_days(Days::new(1)) {
        Some(d) => d,
        None => break,
      };
    }
    streak
  }

  pub fn clear(&mut self) -> usize {
    let n = self.entries.len();
    self.entries.clear();
    n
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
  }

  fn play(headline: &str, date: &str, won: bool) -> PlayRecord {
    PlayRecord {
      headline: headline.into(),
      score: if won { 120.5 } else { 0.0 },
      time_taken: 8.3,
      date: day(date),
      won,
      url: String::new(),
      source_name: "Wire".into(),
      published_at: None,
    }
  }

  #[test]
  fn streak_counts_consecutive_winning_days() {
    let mut h = History::new();
    assert_eq!(h.record(play("ONE", "2024-03-01", true)), 1);
    assert_eq!(h.record(play("TWO", "2024-03-02", true)), 2);
    assert_eq!(h.record(play("TWO AGAIN", "2024-03-02", true)), 2);
    assert_eq!(h.record(play("THREE", "2024-03-03", true)), 3);
    // gap on the 4th
    assert_eq!(h.record(play("FIVE", "2024-03-05", true)), 1);
  }

  #[test]
  fn streak_survives_until_today_is_played() {
    let mut h = History::new();
    h.record(play("A", "2024-03-01", true));
    h.record(play("B", "2024-03-02", true));
    assert_eq!(h.streak(day("2024-03-03")), 2);
    assert_eq!(h.streak(day("2024-03-04")), 0);
  }

  #[test]
  fn losses_do_not_extend_streak() {
    let mut h = History::new();
    h.record(play("A", "2024-03-01", true));
    assert_eq!(h.record(play("B", "2024-03-02", false)), 1);
    assert_eq!(h.streak(day("2024-03-03")), 0);
  }

  #[test]
  fn month_boundary_is_consecutive() {
    let mut h = History::new();
    h.record(play("A", "2024-02-28", true));
    h.record(play("B", "2024-02-29", true));
    assert_eq!(h.record(play("C", "2024-03-01", true)), 3);
  }

  #[test]
  fn counts_search_and_clear() {
    let mut h = History::new();
    h.record(play("Markets Rally On Rate Hopes", "2024-03-01", true));
    h.record(play("STORM HITS COAST", "2024-03-02", false));
    h.record(play("RATE CUT DELAYED", "2024-03-02", true));

    assert_eq!(h.plays_on(day("2024-03-02")), 2);
    assert_eq!(h.first_play_date(), Some(day("2024-03-01")));
    assert_eq!(h.search("rate").len(), 2);
    assert_eq!(h.on_date(day("2024-03-01"))[0].headline, "Markets Rally On Rate Hopes");
    assert!(h.contains_headline("STORM HITS COAST"));

    assert_eq!(h.clear(), 3);
    assert!(h.entries().is_empty());
    assert_eq!(h.first_play_date(), None);
  }
}

//! Small utility helpers used across modules.

use chrono::{Local, NaiveDate};

/// "FED HOLDS RATES" -> "Fed Holds Rates". Used for the revealed headline.
pub fn title_case(s: &str) -> String {
  s.to_lowercase()
    .split(' ')
    .map(|w| {
      let mut cs = w.chars();
      match cs.next() {
        Some(first) => first.to_uppercase().chain(cs).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

/// Server-local calendar date, used when the client does not send its own.
pub fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

/// Map a keyboard key to a guess: a single character is upper-cased, anything else
/// (e.g. "Shift", "") is dropped.
pub fn key_to_letter(key: &str) -> Option<char> {
  let mut cs = key.chars();
  match (cs.next(), cs.next()) {
    (Some(c), None) => Some(c.to_ascii_uppercase()),
    _ => None,
  }
}

/// Log-safe truncation for large strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    format!("{}… ({} bytes total)", s.chars().take(max).collect::<String>(), s.len())
  }
}

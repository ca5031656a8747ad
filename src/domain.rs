//! Domain models shared by the supplier, the recorder and the transport layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where did we get the headline from?
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineSource {
  NewsApi,   // live top-headlines
  LocalBank, // from user-provided TOML bank
  Seed,      // built-in seeds (last resort)
}

/// Headline payload plus the metadata shown once the puzzle is over.
/// Only `headline` matters to the puzzle; everything else is passed through.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
  pub headline: String,
  pub description: String,
  pub url: String,
  pub url_to_image: String,
  pub source_name: String,
  pub published_at: Option<String>,
  pub source: HeadlineSource,
}

/// One finished puzzle as kept by the history recorder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecord {
  pub headline: String,
  pub score: f64,
  pub time_taken: f64,
  pub date: NaiveDate,
  #[serde(default = "default_won")]
  pub won: bool,
  #[serde(default)] pub url: String,
  #[serde(default)] pub source_name: String,
  #[serde(default)] pub published_at: Option<String>,
}

fn default_won() -> bool { true }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headline_serializes_camel_case_with_source_tag() {
    let h = Headline {
      headline: "CAT SAT".into(),
      description: String::new(),
      url: "#".into(),
      url_to_image: String::new(),
      source_name: "Example".into(),
      published_at: None,
      source: HeadlineSource::LocalBank,
    };
    let v = serde_json::to_value(&h).expect("json");
    assert_eq!(v["urlToImage"], "");
    assert_eq!(v["sourceName"], "Example");
    assert_eq!(v["source"], "local_bank");
  }
}

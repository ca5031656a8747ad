//! Minimal NewsAPI client: fetch top headlines and turn one into a puzzle headline.
//!
//! We only call `top-headlines`. Calls are instrumented and log status, article counts
//! and latencies. The API key is sent as a header and never logged.

use std::time::Duration;

use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::{Headline, HeadlineSource};

const PAGE_SIZE: u32 = 30;

#[derive(Clone)]
pub struct NewsApi {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
}

#[derive(Deserialize)]
struct TopHeadlines {
  #[serde(default)] articles: Vec<Article>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
  #[serde(default)] title: Option<String>,
  #[serde(default)] url: Option<String>,
  #[serde(default)] description: Option<String>,
  #[serde(default)] url_to_image: Option<String>,
  #[serde(default)] published_at: Option<String>,
  #[serde(default)] source: Option<ArticleSource>,
}

#[derive(Deserialize)]
struct ArticleSource {
  #[serde(default)] name: Option<String>,
}

impl NewsApi {
  /// Construct the client if we find NEWS_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("NEWS_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("NEWS_API_BASE_URL").unwrap_or_else(|_| "https://newsapi.org/v2".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url })
  }

  /// Fetch the current top headlines and pick one at random whose cleaned title is not
  /// rejected by `already_played`. `Ok(None)` means the feed had nothing new.
  #[instrument(level = "info", skip(self, already_played))]
  pub async fn random_headline<F>(&self, already_played: F) -> Result<Option<Headline>, String>
  where
    F: Fn(&str) -> bool,
  {
    let url = format!("{}/top-headlines", self.base_url);
    let start = std::time::Instant::now();
    let res = self.client.get(&url)
      .header(USER_AGENT, "newslesle-backend/0.1")
      .header("X-Api-Key", &self.api_key)
      .query(&[("language", "en".to_string()), ("pageSize", PAGE_SIZE.to_string())])
      .send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_news_error(&body).unwrap_or(body);
      return Err(format!("NewsAPI HTTP {}: {}", status, msg));
    }

    let body: TopHeadlines = res.json().await.map_err(|e| e.to_string())?;
    let candidates: Vec<Headline> = body
      .articles
      .into_iter()
      .filter_map(to_headline)
      .filter(|h| !already_played(&h.headline))
      .collect();
    info!(target: "news", elapsed = ?start.elapsed(), candidates = candidates.len(), "Top headlines fetched");

    Ok(candidates.choose(&mut rand::thread_rng()).cloned())
  }
}

/// Articles need both a title and a url to be playable.
fn to_headline(a: Article) -> Option<Headline> {
  let title = a.title.filter(|t| !t.trim().is_empty())?;
  let url = a.url.filter(|u| !u.trim().is_empty())?;
  let headline = clean_headline(&title);
  if headline.is_empty() {
    return None;
  }
  let description = a
    .description
    .map(|d| d.trim().to_string())
    .filter(|d| !d.is_empty())
    .unwrap_or_else(|| "No summary available.".into());
  Some(Headline {
    headline,
    description,
    url,
    url_to_image: a.url_to_image.unwrap_or_default(),
    source_name: a
      .source
      .and_then(|s| s.name)
      .unwrap_or_else(|| "Unknown Source".into()),
    published_at: a.published_at,
    source: HeadlineSource::NewsApi,
  })
}

/// Upper-case a title and drop a trailing attribution such as `" - REUTERS"`,
/// `": LIVE UPDATES"` or `" (VIDEO)"`.
pub fn clean_headline(title: &str) -> String {
  let upper = title.trim().to_uppercase();
  let cut = [attribution_start(&upper), parenthetical_start(&upper)]
    .into_iter()
    .flatten()
    .min();
  match cut {
    Some(i) => {
      let kept = upper[..i].trim_end();
      if kept.is_empty() { upper } else { kept.to_string() }
    }
    None => upper,
  }
}

/// Earliest `-`/`:` separator followed only by words and spaces up to the end.
/// A dash glued to words on both sides (`COVID-19`) is not a separator.
fn attribution_start(s: &str) -> Option<usize> {
  let chars: Vec<(usize, char)> = s.char_indices().collect();
  for (pos, &(i, c)) in chars.iter().enumerate() {
    if c != '-' && c != ':' {
      continue;
    }
    let before_space = pos > 0 && chars[pos - 1].1.is_whitespace();
    let after_space = chars.get(pos + 1).map(|(_, n)| n.is_whitespace()).unwrap_or(false);
    if c == '-' && !before_space && !after_space {
      continue;
    }
    let tail = &s[i + c.len_utf8()..];
    let wordy = tail.chars().all(|t| t.is_alphanumeric() || t == '_' || t.is_whitespace());
    if wordy && tail.chars().any(|t| !t.is_whitespace()) {
      return Some(i);
    }
  }
  None
}

fn parenthetical_start(s: &str) -> Option<usize> {
  if !s.ends_with(')') {
    return None;
  }
  s.find('(')
}

/// Try to extract a clean error message from a NewsAPI error body.
fn extract_news_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EObj>(body).ok().map(|e| e.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_trailing_source() {
    assert_eq!(clean_headline("Fed holds rates steady - Reuters"), "FED HOLDS RATES STEADY");
    assert_eq!(clean_headline("Storm nears coast: live updates"), "STORM NEARS COAST");
    assert_eq!(clean_headline("Mayor speaks (video)"), "MAYOR SPEAKS");
  }

  #[test]
  fn keeps_inner_punctuation() {
    assert_eq!(clean_headline("COVID-19 cases fall"), "COVID-19 CASES FALL");
    assert_eq!(clean_headline("What's next? Experts weigh in"), "WHAT'S NEXT? EXPERTS WEIGH IN");
    // the tail after the colon is not plain words, so only the source goes
    assert_eq!(
      clean_headline("Budget: what's in it - BBC News"),
      "BUDGET: WHAT'S IN IT"
    );
  }

  #[test]
  fn never_strips_everything() {
    assert_eq!(clean_headline("(Breaking)"), "(BREAKING)");
    assert_eq!(clean_headline(": only tail"), ": ONLY TAIL");
  }

  #[test]
  fn article_without_url_is_skipped() {
    let a = Article {
      title: Some("Something happened".into()),
      url: None,
      description: None,
      url_to_image: None,
      published_at: None,
      source: None,
    };
    assert!(to_headline(a).is_none());
  }

  #[test]
  fn article_defaults_fill_metadata() {
    let a = Article {
      title: Some("Rover finds water ice - NASA".into()),
      url: Some("https://example.com/rover".into()),
      description: Some("   ".into()),
      url_to_image: None,
      published_at: Some("2024-05-01T10:00:00Z".into()),
      source: None,
    };
    let h = to_headline(a).expect("headline");
    assert_eq!(h.headline, "ROVER FINDS WATER ICE");
    assert_eq!(h.description, "No summary available.");
    assert_eq!(h.source_name, "Unknown Source");
    assert_eq!(h.source, HeadlineSource::NewsApi);
  }
}

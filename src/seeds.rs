//! Seed headlines that guarantee the game is playable without a news API key.

use crate::config::HeadlineCfg;
use crate::domain::{Headline, HeadlineSource};

fn seed(headline: &str, description: &str, source_name: &str) -> Headline {
  Headline {
    headline: headline.into(),
    description: description.into(),
    url: "#".into(),
    url_to_image: String::new(),
    source_name: source_name.into(),
    published_at: None,
    source: HeadlineSource::Seed,
  }
}

pub fn seed_headlines() -> Vec<Headline> {
  vec![
    seed(
      "SCIENTISTS MAP THE DEEPEST OCEAN TRENCH IN NEW DETAIL",
      "Sonar surveys reveal ridges and vents never seen before.",
      "Newslesle Seeds",
    ),
    seed(
      "CITY OPENS ITS FIRST NIGHT MARKET IN A DECADE",
      "Food stalls and live music return to the old harbour district.",
      "Newslesle Seeds",
    ),
    seed(
      "RARE COMET VISIBLE TO THE NAKED EYE THIS WEEKEND",
      "Astronomers say clear skies will give the best view in years.",
      "Newslesle Seeds",
    ),
    seed(
      "VOLUNTEERS PLANT TEN THOUSAND TREES ALONG RIVER BANKS",
      "The project aims to stop erosion and shade spawning fish.",
      "Newslesle Seeds",
    ),
    seed(
      "LIBRARY RETURNS BOOK BORROWED SEVENTY YEARS AGO",
      "An anonymous note apologised for the delay.",
      "Newslesle Seeds",
    ),
  ]
}

/// Convert configured bank entries, skipping blank headlines.
pub fn bank_headlines(cfg: &[HeadlineCfg]) -> Vec<Headline> {
  cfg
    .iter()
    .filter(|h| !h.headline.trim().is_empty())
    .map(|h| Headline {
      headline: h.headline.trim().to_uppercase(),
      description: h.description.clone().unwrap_or_else(|| "No summary available.".into()),
      url: h.url.clone().unwrap_or_else(|| "#".into()),
      url_to_image: h.url_to_image.clone().unwrap_or_default(),
      source_name: h.source_name.clone().unwrap_or_else(|| "Unknown Source".into()),
      published_at: h.published_at.clone(),
      source: HeadlineSource::LocalBank,
    })
    .collect()
}

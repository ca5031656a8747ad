//! Loading game configuration (rules, daily cap, optional headline bank) from TOML.
//!
//! Example:
//! ```toml
//! [game]
//! max_wrong = 2
//!
//! [limits]
//! daily_cap = 5
//!
//! [[headlines]]
//! headline = "LOCAL TEAM WINS TITLE"
//! description = "A long season ends in celebration."
//! url = "https://example.com/story"
//! source_name = "Example Gazette"
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::puzzle::DEFAULT_MAX_WRONG;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub game: Rules,
  #[serde(default)]
  pub limits: Limits,
  #[serde(default)]
  pub headlines: Vec<HeadlineCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Rules {
  #[serde(default = "default_max_wrong")]
  pub max_wrong: u32,
}

impl Default for Rules {
  fn default() -> Self { Self { max_wrong: DEFAULT_MAX_WRONG } }
}

fn default_max_wrong() -> u32 { DEFAULT_MAX_WRONG }

/// Absent `daily_cap` means unlimited play.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct Limits {
  #[serde(default)] pub daily_cap: Option<usize>,
}

/// Headline entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct HeadlineCfg {
  pub headline: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub url: Option<String>,
  #[serde(default)] pub url_to_image: Option<String>,
  #[serde(default)] pub source_name: Option<String>,
  #[serde(default)] pub published_at: Option<String>,
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => {
        info!(target: "newslesle_backend", %path, headlines = cfg.headlines.len(), "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "newslesle_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "newslesle_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

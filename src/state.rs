//! Application state: puzzle sessions, play history, headline sources and the daily gate.
//!
//! This module owns:
//!   - the active puzzle keyed by id (discarding it is how a player abandons it; starting
//!     a new one replaces whatever was there, finished or not)
//!   - the in-memory play history
//!   - the headline bank (TOML bank + built-in seeds) and the optional NewsAPI client
//!   - the limit gate and game rules from config
//!
//! Headline selection prefers live news, then the local bank, skipping anything already
//! in history. If nothing new is left the caller gets `None`.

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::{load_game_config_from_env, GameConfig, Rules};
use crate::domain::{Headline, HeadlineSource};
use crate::history::History;
use crate::limits::{gate_from_config, LimitGate};
use crate::news::NewsApi;
use crate::puzzle::{FinishedPuzzle, Puzzle};
use crate::seeds::{bank_headlines, seed_headlines};

/// One active puzzle plus everything needed to report it when it ends.
#[derive(Clone, Debug)]
pub struct Session {
    pub puzzle: Puzzle,
    pub headline: Headline,
    pub date: NaiveDate,
    /// Set once the puzzle is finished and recorded.
    pub result: Option<(FinishedPuzzle, u32)>,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    pub history: Arc<RwLock<History>>,
    pub bank: Vec<Headline>,
    pub news: Option<NewsApi>,
    pub gate: Arc<dyn LimitGate>,
    pub rules: Rules,
}

impl AppState {
    /// Build state from env: load config, build the headline bank, init NewsAPI.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_game_config_from_env().unwrap_or_default();

        let news = NewsApi::from_env();
        if let Some(n) = &news {
            info!(target: "newslesle_backend", base_url = %n.base_url, "NewsAPI enabled.");
        } else {
            info!(target: "newslesle_backend", "NewsAPI disabled (no NEWS_API_KEY). Using local headlines.");
        }

        Self::with_parts(cfg, news)
    }

    pub fn with_parts(cfg: GameConfig, news: Option<NewsApi>) -> Self {
        let mut bank = bank_headlines(&cfg.headlines);
        let bank_len = bank.len();
        bank.extend(seed_headlines());
        info!(
            target: "newslesle_backend",
            local_bank = bank_len,
            seed = bank.len() - bank_len,
            max_wrong = cfg.game.max_wrong,
            daily_cap = ?cfg.limits.daily_cap,
            "Startup headline inventory"
        );

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(History::new())),
            bank,
            news,
            gate: Arc::from(gate_from_config(cfg.limits.daily_cap)),
            rules: cfg.game,
        }
    }

    /// Selection policy:
    /// 1) a random unplayed NewsAPI headline when available,
    /// 2) otherwise a random unplayed bank/seed headline,
    /// 3) otherwise nothing.
    #[instrument(level = "info", skip(self))]
    pub async fn choose_headline(&self) -> Option<(Headline, &'static str)> {
        // snapshot so the lock is not held across the upstream call
        let played = self.history.read().await.clone();
        let is_played = |s: &str| played.contains_headline(s);

        if let Some(news) = &self.news {
            match news.random_headline(is_played).await {
                Ok(Some(h)) => {
                    info!(target: "news", headline = %h.headline, url = %h.url, "Serving live headline");
                    return Some((h, "news_api"));
                }
                Ok(None) => warn!(target: "news", "No unplayed live headlines; trying local bank"),
                Err(e) => error!(target: "news", error = %e, "NewsAPI fetch failed; trying local bank"),
            }
        }

        let fresh: Vec<&Headline> = self.bank.iter().filter(|h| !is_played(&h.headline)).collect();
        let chosen = fresh.choose(&mut rand::thread_rng()).map(|h| (*h).clone())?;
        let origin = match chosen.source {
            HeadlineSource::LocalBank => "local_bank",
            _ => "seed",
        };
        warn!(target: "news", headline = %chosen.headline, %origin, "Serving local headline");
        Some((chosen, origin))
    }

    /// Finished plays on `date`, as seen by the gate.
    pub async fn plays_on(&self, date: NaiveDate) -> usize {
        self.history.read().await.plays_on(date)
    }

    pub async fn can_play(&self, date: NaiveDate) -> bool {
        self.gate.allows(self.plays_on(date).await)
    }

    /// Store `session` as the only live puzzle. Play is single-player, so any previous
    /// puzzle is dropped here. Returns how many sessions were replaced.
    #[instrument(level = "debug", skip(self, session), fields(%id))]
    pub async fn replace_session(&self, id: Uuid, session: Session) -> usize {
        let mut sessions = self.sessions.write().await;
        let replaced = sessions.len();
        sessions.clear();
        sessions.insert(id, session);
        replaced
    }

    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_session(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drop a puzzle. Returns whether it existed.
    #[instrument(level = "info", skip(self), fields(%id))]
    pub async fn discard_session(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }
}

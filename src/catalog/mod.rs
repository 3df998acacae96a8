//! Client for the public catalog.
//!
//! Mirrors what the public site does with the API: poll the game list on a fixed
//! interval, resolve a landing slug, and find out where its download lives.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dto::GameResponse;
use crate::utils::landing_token;

/// How often the public catalog refreshes its list.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("game not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// `base_url` is the API origin, e.g. `https://games.example.com`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// All games, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with an error status.
    pub async fn list_games(&self) -> Result<Vec<GameResponse>, CatalogError> {
        let games = self
            .http
            .get(format!("{}/api/games", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(games)
    }

    /// Resolve a landing slug (`/game/<token>` or the bare token) to its game.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the API does not know the slug.
    pub async fn game_by_slug(&self, slug: &str) -> Result<GameResponse, CatalogError> {
        let token = landing_token(slug);
        let response = self
            .http
            .get(format!("{}/api/games/{token}", self.base_url))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(slug.to_string()));
        }

        Ok(response.error_for_status()?.json().await?)
    }

    /// Where the browser should be sent to download the game, or `None` while the admin
    /// has not set a link yet.
    ///
    /// # Errors
    ///
    /// Same as [`Self::game_by_slug`].
    pub async fn download_url(&self, slug: &str) -> Result<Option<String>, CatalogError> {
        let game = self.game_by_slug(slug).await?;
        Ok(Some(game.game_url).filter(|url| !url.trim().is_empty()))
    }

    /// Start polling the game list every `interval`.
    ///
    /// Must be called from within a Tokio runtime. The first poll happens immediately.
    /// A failed poll is logged and the previous snapshot stays current.
    #[must_use]
    pub fn watch(&self, interval: Duration) -> CatalogWatch {
        let (tx, rx) = watch::channel(Vec::new());
        let client = self.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match client.list_games().await {
                    Ok(games) => {
                        tracing::debug!(count = games.len(), "Catalog refreshed");
                        if tx.send(games).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "Catalog refresh failed"),
                }
            }
        });

        CatalogWatch { rx, handle }
    }
}

/// Handle to a running catalog poller. Dropping it stops the polling task.
#[derive(Debug)]
pub struct CatalogWatch {
    rx: watch::Receiver<Vec<GameResponse>>,
    handle: JoinHandle<()>,
}

impl CatalogWatch {
    /// A receiver that is notified on every successful refresh.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<GameResponse>> {
        self.rx.clone()
    }

    /// The most recent snapshot (empty until the first successful poll).
    #[must_use]
    pub fn latest(&self) -> Vec<GameResponse> {
        self.rx.borrow().clone()
    }
}

impl Drop for CatalogWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::pointing::{FeedLoader, Observer};

use super::config::{Config, ConfigError};

/// Shared by every request: the config, the resolved station and the feed.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub station: Observer,
    pub feed: Option<Arc<RwLock<FeedLoader>>>,
}

impl AppState {
    /// Resolves the station and loads the feed snapshot if one is configured.
    /// A snapshot that fails to load is kept unloaded so it can be reloaded later.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let station = config.station.observer()?;

        let feed = config.pointing.feed_file.as_ref().map(|feed_file| {
            let mut loader =
                FeedLoader::new(feed_file.clone(), config.pointing.default_height_km);
            if let Err(e) = loader.load() {
                log::warn!("Failed to load object feed: {}", e);
            }
            Arc::new(RwLock::new(loader))
        });

        Ok(Self {
            config: Arc::new(config),
            station,
            feed,
        })
    }
}

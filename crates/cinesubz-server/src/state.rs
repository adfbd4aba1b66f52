use cinesubz_core::CinesubzScraper;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    config: Config,
    scraper: CinesubzScraper,
}

impl AppState {
    pub fn new(config: Config, scraper: CinesubzScraper) -> Self {
        Self { config, scraper }
    }

    /// Build the scraper from the `[scraper]` section
    pub fn from_config(config: Config) -> cinesubz_core::Result<Self> {
        let scraper = CinesubzScraper::with_config(config.scraper.to_scraper_config())?;
        Ok(Self::new(config, scraper))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scraper(&self) -> &CinesubzScraper {
        &self.scraper
    }
}

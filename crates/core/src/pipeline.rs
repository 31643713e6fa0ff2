//! Main scraping API.
//!
//! [`Scraper`] ties the pieces together: build the page URL, fetch it, parse
//! it, run the matching extractor and wrap the result in a record. Each call
//! performs exactly one fetch and one extraction pass.
//!
//! # Example
//!
//! ```rust
//! use peloton_core::{Race, Scraper, Year};
//!
//! let html = r#"<ul class="startlist_v4"><li><div class="ridersCont">
//!     <a class="team" href="team/lidl-trek-2024">Lidl - Trek</a>
//!     <ul><li><span class="bib">61</span><span class="flag dk"></span>
//!         <a href="rider/mads-pedersen">PEDERSEN Mads</a></li></ul>
//! </div></li></ul>"#;
//!
//! let scraper = Scraper::new();
//! let year = Year::new(2024).unwrap();
//! let source = scraper.startlist_url(Race::ParisRoubaix, year);
//! let record = scraper.startlist_from_html(html, Race::ParisRoubaix, year, &source).unwrap();
//! assert_eq!(record.count, 1);
//! assert_eq!(record.teams[0].riders[0].country.as_deref(), Some("dk"));
//! ```

#[cfg(feature = "fetch")]
use tracing::info;
use url::Url;

#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;
use crate::fetch::FetchConfig;
use crate::parse::Document;
use crate::race::{self, DEFAULT_BASE_URL, Race, Stage, Year};
use crate::record::{StageRecord, StartlistRecord};
use crate::selectors::FieldReader;
use crate::stage::extract_stage;
use crate::startlist::extract_startlist;
use crate::{PelotonError, Result};

/// Configuration for the [`Scraper`].
///
/// # Example
///
/// ```rust
/// use peloton_core::ScraperConfig;
///
/// let config = ScraperConfig::builder()
///     .base_url("http://localhost:8080")
///     .strict(true)
///     .timeout(10)
///     .build()
///     .unwrap();
/// assert!(config.strict);
/// ```
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Origin of the results site (default: the public site).
    pub base_url: String,

    /// Abort the page on any missing attribute lookup instead of emitting `null` (default: false).
    pub strict: bool,

    /// HTTP settings.
    pub fetch: FetchConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), strict: false, fetch: FetchConfig::default() }
    }
}

impl ScraperConfig {
    /// Creates a new builder for ScraperConfig.
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::new()
    }

    fn reader(&self) -> FieldReader {
        FieldReader { strict: self.strict }
    }
}

/// Builder for ScraperConfig.
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ScraperConfig::default() }
    }

    /// Sets the site origin.
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.config.base_url = value.into();
        self
    }

    /// Sets strict extraction.
    pub fn strict(mut self, value: bool) -> Self {
        self.config.strict = value;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.fetch.timeout = secs;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config, validating the base URL.
    pub fn build(self) -> Result<ScraperConfig> {
        let base = Url::parse(&self.config.base_url).map_err(|e| PelotonError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(PelotonError::InvalidUrl(self.config.base_url));
        }
        Ok(self.config)
    }
}

impl Default for ScraperConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for scraping startlists and stage results.
#[derive(Debug, Clone, Default)]
pub struct Scraper {
    config: ScraperConfig,
}

impl Scraper {
    /// Creates a scraper with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scraper with a custom configuration.
    pub fn with_config(config: ScraperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn startlist_url(&self, race: Race, year: Year) -> String {
        race::startlist_url(&self.config.base_url, race, year)
    }

    pub fn stage_url(&self, race: Race, year: Year, stage: &Stage) -> String {
        race::stage_url(&self.config.base_url, race, year, stage)
    }

    /// Extracts a startlist record from page HTML.
    pub fn startlist_from_html(&self, html: &str, race: Race, year: Year, source: &str) -> Result<StartlistRecord> {
        let doc = Document::parse(html)?;
        let teams = extract_startlist(&doc, self.config.reader())?;
        Ok(StartlistRecord::new(race, year, source, teams))
    }

    /// Extracts a stage record from page HTML.
    pub fn stage_from_html(
        &self, html: &str, race: Race, year: Year, stage: Stage, source: &str,
    ) -> Result<StageRecord> {
        let doc = Document::parse(html)?;
        let extraction = extract_stage(&doc, self.config.reader())?;
        Ok(StageRecord::new(race, year, stage, source, extraction))
    }

    /// Fetches and extracts a startlist.
    #[cfg(feature = "fetch")]
    pub async fn fetch_startlist(&self, race: Race, year: Year) -> Result<StartlistRecord> {
        let url = self.startlist_url(race, year);
        info!(%race, %year, "scraping startlist");
        let html = fetch_url(&url, &self.config.fetch).await?;
        self.startlist_from_html(&html, race, year, &url)
    }

    /// Fetches and extracts a stage result.
    #[cfg(feature = "fetch")]
    pub async fn fetch_stage(&self, race: Race, year: Year, stage: Stage) -> Result<StageRecord> {
        let url = self.stage_url(race, year, &stage);
        info!(%race, %year, %stage, "scraping stage result");
        let html = fetch_url(&url, &self.config.fetch).await?;
        self.stage_from_html(&html, race, year, stage, &url)
    }
}

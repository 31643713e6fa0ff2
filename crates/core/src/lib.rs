pub mod error;
pub mod fetch;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod race;
pub mod record;
pub mod selectors;
pub mod stage;
pub mod startlist;
pub mod text;

pub use error::{PelotonError, Result};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use model::{
    ClassificationEntry, ResultRow, Rider, Team, TeamClassificationEntry, TeamTimeTrialEntry, TeamTimeTrialRider,
};
pub use parse::{Document, Element};
pub use pipeline::{Scraper, ScraperConfig, ScraperConfigBuilder};
pub use race::{DEFAULT_BASE_URL, Race, Stage, Year, stage_url, startlist_url};
pub use record::{DEFAULT_OUTPUT_DIR, StageRecord, StartlistRecord, stage_path, startlist_path, to_json, write_json};
pub use selectors::{FieldReader, SplitName, split_name};
pub use stage::{Classifications, Layout, StageExtraction, StageResults, detect_layout, extract_stage};
pub use startlist::{extract_startlist, rider_count};

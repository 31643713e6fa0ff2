//! Output records and their on-disk locations.
//!
//! A record wraps the extracted data with the request that produced it:
//! race, year, source URL, the number of primary rows and the time of the
//! scrape.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::{ClassificationEntry, ResultRow, Team, TeamClassificationEntry};
use crate::race::{Race, Stage, Year};
use crate::stage::{StageExtraction, StageResults};
use crate::Result;

/// Default directory records are written under.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// A scraped startlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartlistRecord {
    pub race: Race,
    pub year: Year,
    pub source: String,
    /// Number of team blocks.
    pub count: usize,
    pub teams: Vec<Team>,
    #[serde(with = "time::serde::rfc3339")]
    pub scraped_at: OffsetDateTime,
}

impl StartlistRecord {
    pub fn new(race: Race, year: Year, source: impl Into<String>, teams: Vec<Team>) -> Self {
        Self { race, year, source: source.into(), count: teams.len(), teams, scraped_at: now() }
    }
}

/// A scraped stage result with the standings after the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    pub race: Race,
    pub year: Year,
    pub stage: Stage,
    pub source: String,
    /// Number of primary rows: riders, or teams for a team time trial.
    pub count: usize,
    pub results: StageResults,
    pub gc: Vec<ResultRow>,
    pub points: Vec<ClassificationEntry>,
    pub mountains: Vec<ClassificationEntry>,
    pub youth: Vec<ResultRow>,
    pub teams: Vec<TeamClassificationEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub scraped_at: OffsetDateTime,
}

impl StageRecord {
    pub fn new(race: Race, year: Year, stage: Stage, source: impl Into<String>, extraction: StageExtraction) -> Self {
        let StageExtraction { results, classifications } = extraction;
        Self {
            race,
            year,
            stage,
            source: source.into(),
            count: results.len(),
            results,
            gc: classifications.gc,
            points: classifications.points,
            mountains: classifications.mountains,
            youth: classifications.youth,
            teams: classifications.teams,
            scraped_at: now(),
        }
    }
}

/// Serializes a record, pretty-printed or compact.
pub fn to_json<T: Serialize>(record: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(record)? } else { serde_json::to_string(record)? };
    Ok(json)
}

/// `<dir>/startlist-<slug>-<year>.json`
pub fn startlist_path(dir: &Path, race: Race, year: Year) -> PathBuf {
    dir.join(format!("startlist-{}-{}.json", race, year))
}

/// `<dir>/<year>/<slug>/<stage>/results.json`
pub fn stage_path(dir: &Path, race: Race, year: Year, stage: &Stage) -> PathBuf {
    dir.join(year.to_string()).join(race.slug()).join(stage.as_str()).join("results.json")
}

/// Writes `json` to `path`, creating parent directories first.
pub fn write_json(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;
    Ok(())
}

// Whole seconds keep the RFC 3339 text stable across a round-trip.
fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

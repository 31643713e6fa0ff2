//! Row-level records produced by the extractors.
//!
//! All records are built once from a parsed page and never mutated
//! afterwards. Places and points that cannot be parsed as integers are
//! `None` and serialize as JSON `null`.

use serde::{Deserialize, Serialize};

/// A team block on a startlist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Team jersey/logo image URL.
    pub image: Option<String>,
    pub name: String,
    /// Second path segment of the team link.
    pub short_name: Option<String>,
    pub riders: Vec<Rider>,
}

/// A rider on a startlist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub name: String,
    pub country: Option<String>,
    /// Bib number as printed; empty before numbers are assigned.
    pub start_number: String,
    /// Rider has abandoned or was withdrawn.
    pub dropout: bool,
}

/// One row of a standard stage result (also used for GC and youth tables).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub country: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub start_number: String,
    pub gc: String,
    pub place: Option<i64>,
    pub time_difference: String,
    pub team: String,
    /// Second path segment of the team link.
    pub short_name: Option<String>,
    pub uci_points: String,
    pub points: String,
    pub qualification_time: String,
}

/// A team on a team time trial result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTimeTrialEntry {
    pub place: Option<i64>,
    pub team: String,
    pub short_name: Option<String>,
    pub riders: Vec<TeamTimeTrialRider>,
}

/// A rider inside a team time trial entry. The place is the team's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTimeTrialRider {
    pub place: Option<i64>,
    pub first_name: String,
    pub last_name: String,
}

/// A row of the points or mountains classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationEntry {
    pub place: Option<i64>,
    pub rider: String,
    pub team: String,
    pub points_total: Option<i64>,
    /// Points gained on this stage.
    pub points: Option<i64>,
}

/// A row of the team classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamClassificationEntry {
    pub place: Option<i64>,
    pub team: String,
    pub short_name: Option<String>,
    /// Team category label (`WT`, `PRT`, ...).
    #[serde(rename = "class")]
    pub category: String,
}

//! Stage result extraction.
//!
//! A stage page comes in two layouts. Team time trials list whole teams with
//! their riders nested inside; every other stage has a flat results table.
//! The layout is chosen from the page title. Independently of the layout,
//! the page carries up to five classification tables that are picked by
//! position among the results containers.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{
    ClassificationEntry, ResultRow, TeamClassificationEntry, TeamTimeTrialEntry, TeamTimeTrialRider,
};
use crate::parse::{Document, Element};
use crate::selectors::{FieldReader, GENERAL_CLASS, SplitName, css, number_of, split_name, text_of, visible_text_of};
use crate::Result;

/// Title substring that marks a team time trial page.
pub const TTT_MARKER: &str = "TTT";

/// Page layout of a stage result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    Standard,
    TeamTimeTrial,
}

/// Primary results of a stage, shaped by its layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "rows", rename_all = "kebab-case")]
pub enum StageResults {
    Standard(Vec<ResultRow>),
    TeamTimeTrial(Vec<TeamTimeTrialEntry>),
}

impl StageResults {
    pub fn layout(&self) -> Layout {
        match self {
            StageResults::Standard(_) => Layout::Standard,
            StageResults::TeamTimeTrial(_) => Layout::TeamTimeTrial,
        }
    }

    /// Number of primary rows (riders for standard stages, teams for TTTs).
    pub fn len(&self) -> usize {
        match self {
            StageResults::Standard(rows) => rows.len(),
            StageResults::TeamTimeTrial(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The auxiliary tables, each addressed by its ordinal position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    General,
    Points,
    Mountains,
    Youth,
    Team,
}

impl Classification {
    /// Zero-based position of the table among the results containers.
    pub fn index(self) -> usize {
        match self {
            Classification::General => 1,
            Classification::Points => 2,
            Classification::Mountains => 3,
            Classification::Youth => 4,
            Classification::Team => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Classification::General => "general classification",
            Classification::Points => "points classification",
            Classification::Mountains => "mountains classification",
            Classification::Youth => "youth classification",
            Classification::Team => "team classification",
        }
    }
}

/// Standings after the stage. Missing tables are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifications {
    pub gc: Vec<ResultRow>,
    pub points: Vec<ClassificationEntry>,
    pub mountains: Vec<ClassificationEntry>,
    pub youth: Vec<ResultRow>,
    pub teams: Vec<TeamClassificationEntry>,
}

/// Everything extracted from one stage page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageExtraction {
    pub results: StageResults,
    pub classifications: Classifications,
}

/// Picks the layout from the page title.
pub fn detect_layout(doc: &Document) -> Layout {
    match doc.title() {
        Some(title) if title.contains(TTT_MARKER) => Layout::TeamTimeTrial,
        _ => Layout::Standard,
    }
}

/// Extracts the primary results and all classification tables.
pub fn extract_stage(doc: &Document, reader: FieldReader) -> Result<StageExtraction> {
    let layout = detect_layout(doc);
    debug!(?layout, "detected stage layout");

    let results = match layout {
        Layout::TeamTimeTrial => StageResults::TeamTimeTrial(extract_team_time_trial(doc, reader)?),
        Layout::Standard => StageResults::Standard(extract_standard(doc, reader)?),
    };

    if results.is_empty() {
        warn!(?layout, "no result rows found on stage page");
    } else {
        debug!(rows = results.len(), "extracted stage results");
    }

    let classifications = extract_classifications(doc, reader)?;
    Ok(StageExtraction { results, classifications })
}

/// Reads the flat results table.
pub fn extract_standard(doc: &Document, reader: FieldReader) -> Result<Vec<ResultRow>> {
    let rows = match doc.select_nth(css::RESULTS_TABLE, 0)? {
        Some(table) => table.select(css::BODY_ROW)?,
        None => Vec::new(),
    };

    rows.iter()
        .enumerate()
        .map(|(index, row)| result_row(row, reader, &format!("stage result row {}", index + 1)))
        .collect()
}

/// Reads the team list of a team time trial, skipping the mobile duplicate.
pub fn extract_team_time_trial(doc: &Document, reader: FieldReader) -> Result<Vec<TeamTimeTrialEntry>> {
    let items = match doc.select_nth(css::RESULTS_CONTAINER, 0)? {
        Some(container) => container.select(css::TTT_TEAM)?,
        None => Vec::new(),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| team_time_trial_entry(item, reader, index))
        .collect()
}

/// Reads the five classification tables.
pub fn extract_classifications(doc: &Document, reader: FieldReader) -> Result<Classifications> {
    Ok(Classifications {
        gc: classification_rows(doc, Classification::General, reader, result_row)?,
        points: classification_rows(doc, Classification::Points, reader, classification_entry)?,
        mountains: classification_rows(doc, Classification::Mountains, reader, classification_entry)?,
        youth: classification_rows(doc, Classification::Youth, reader, result_row)?,
        teams: team_classification(doc, reader)?,
    })
}

/// Body rows of the table in the `index`-th results container.
///
/// An index past the last container yields no rows.
pub fn rows_at(doc: &Document, index: usize) -> Result<Vec<Element<'_>>> {
    let Some(container) = doc.select_nth(css::RESULTS_CONTAINER, index)? else {
        return Ok(Vec::new());
    };
    match container.select_first(css::RESULTS_TABLE)? {
        Some(table) => table.select(css::BODY_ROW),
        None => Ok(Vec::new()),
    }
}

fn classification_rows<T>(
    doc: &Document, table: Classification, reader: FieldReader, parse_row: RowParser<T>,
) -> Result<Vec<T>> {
    let parsed = rows_at(doc, table.index())?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_row(row, reader, &format!("{} row {}", table.label(), index + 1)))
        .collect::<Result<Vec<_>>>()?;
    debug!(table = table.label(), rows = parsed.len(), "extracted classification");
    Ok(parsed)
}

fn team_classification(doc: &Document, reader: FieldReader) -> Result<Vec<TeamClassificationEntry>> {
    let table = Classification::Team;
    rows_at(doc, table.index())?
        .iter()
        .filter(|row| row.has_class(GENERAL_CLASS))
        .enumerate()
        .map(|(index, row)| {
            let short_name = reader.short_name(row, css::TEAM_LINK, || format!("{} row {}", table.label(), index + 1))?;
            Ok(TeamClassificationEntry {
                place: number_of(row, css::PLACE_CELL)?,
                team: text_of(row, css::TEAM_LINK)?,
                short_name,
                category: text_of(row, css::TEAM_CLASS_CELL)?,
            })
        })
        .collect()
}

type RowParser<T> = fn(&Element<'_>, FieldReader, &str) -> Result<T>;

fn rider_name(row: &Element<'_>, reader: FieldReader, context: &str) -> Result<SplitName> {
    match reader.require(row.select_first(css::RIDER_LINK)?, "rider link", || context.to_string())? {
        Some(anchor) => split_name(&anchor),
        None => Ok(SplitName::default()),
    }
}

fn result_row(row: &Element<'_>, reader: FieldReader, context: &str) -> Result<ResultRow> {
    let country = reader.country(row, || context.to_string())?;
    let name = rider_name(row, reader, context)?;
    let short_name = reader.short_name(row, css::TEAM_LINK, || context.to_string())?;

    Ok(ResultRow {
        country,
        last_name: name.last_name,
        first_name: name.first_name,
        start_number: text_of(row, css::BIB_CELL)?,
        gc: text_of(row, css::GC_CELL)?,
        place: number_of(row, css::PLACE_CELL)?,
        time_difference: visible_text_of(row, css::TIME_CELL)?,
        team: text_of(row, css::TEAM_LINK)?,
        short_name,
        uci_points: text_of(row, css::UCI_POINTS_CELL)?,
        points: text_of(row, css::POINTS_CELL)?,
        qualification_time: text_of(row, css::QUALIFICATION_CELL)?,
    })
}

fn classification_entry(row: &Element<'_>, _reader: FieldReader, _context: &str) -> Result<ClassificationEntry> {
    Ok(ClassificationEntry {
        place: number_of(row, css::PLACE_CELL)?,
        rider: text_of(row, css::RIDER_LINK)?,
        team: text_of(row, css::TEAM_LINK)?,
        points_total: number_of(row, css::POINTS_CELL)?,
        points: number_of(row, css::TODAY_CELL)?,
    })
}

fn team_time_trial_entry(item: &Element<'_>, reader: FieldReader, index: usize) -> Result<TeamTimeTrialEntry> {
    let place = number_of(item, css::TTT_RANK)?;
    let context = || format!("team time trial entry {}", index + 1);

    // header rows carry no rider link and are skipped
    let riders = item
        .select(css::TTT_RIDER_ROW)?
        .iter()
        .filter_map(|row| row.select_first(css::RIDER_LINK).transpose())
        .map(|anchor| {
            let name = split_name(&anchor?)?;
            Ok(TeamTimeTrialRider { place, first_name: name.first_name, last_name: name.last_name })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TeamTimeTrialEntry {
        place,
        team: text_of(item, css::TEAM_LINK)?,
        short_name: reader.short_name(item, css::TEAM_LINK, context)?,
        riders,
    })
}

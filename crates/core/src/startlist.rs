//! Startlist extraction.
//!
//! A startlist page is a list of team blocks, each holding a nested list of
//! riders. Rider sequences are built first and then folded into their team.

use tracing::{debug, warn};

use crate::model::{Rider, Team};
use crate::parse::{Document, Element};
use crate::selectors::{FieldReader, attr_of, css, is_dropout, text_of};
use crate::Result;

/// Extracts every team block, in document order.
///
/// An empty page is not an error: a warning is logged and an empty vector
/// returned.
pub fn extract_startlist(doc: &Document, reader: FieldReader) -> Result<Vec<Team>> {
    let teams = doc
        .select(css::STARTLIST_TEAM)?
        .iter()
        .enumerate()
        .map(|(index, block)| extract_team(block, index, reader))
        .collect::<Result<Vec<_>>>()?;

    if teams.is_empty() {
        warn!("no team blocks found on startlist page");
    } else {
        debug!(teams = teams.len(), riders = rider_count(&teams), "extracted startlist");
    }

    Ok(teams)
}

/// Total riders across all teams.
pub fn rider_count(teams: &[Team]) -> usize {
    teams.iter().map(|team| team.riders.len()).sum()
}

fn extract_team(block: &Element<'_>, index: usize, reader: FieldReader) -> Result<Team> {
    let riders = block
        .select(css::STARTLIST_RIDER)?
        .iter()
        .enumerate()
        .map(|(position, item)| extract_rider(item, reader, index, position))
        .collect::<Result<Vec<_>>>()?;

    let short_name =
        reader.short_name(block, css::STARTLIST_TEAM_LINK, || format!("startlist team block {}", index + 1))?;

    Ok(Team {
        image: attr_of(block, css::STARTLIST_TEAM_IMAGE, "src")?,
        name: text_of(block, css::STARTLIST_TEAM_LINK)?,
        short_name,
        riders,
    })
}

fn extract_rider(item: &Element<'_>, reader: FieldReader, team: usize, position: usize) -> Result<Rider> {
    let country = reader.country(item, || format!("startlist team block {} rider {}", team + 1, position + 1))?;

    Ok(Rider {
        name: text_of(item, css::RIDER_LINK)?,
        country,
        start_number: text_of(item, css::STARTLIST_BIB)?,
        dropout: is_dropout(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PelotonError;

    const STARTLIST_HTML: &str = r#"
        <html><head><title>Paris-Nice 2024 Startlist</title></head><body>
        <ul class="startlist_v4">
            <li>
                <div class="shirtCont"><img src="images/shirts/visma.png"></div>
                <div class="ridersCont">
                    <a class="team" href="team/team-visma-lease-a-bike-2024">Team Visma | Lease a Bike (WT)</a>
                    <ul>
                        <li><span class="bib">1</span><span class="flag us"></span><a href="rider/matteo-jorgenson">JORGENSON Matteo</a></li>
                        <li class="dropout"><span class="bib">2</span><span class="flag be"></span><a href="rider/wout-van-aert">VAN AERT Wout</a></li>
                    </ul>
                </div>
            </li>
            <li class="dropout">
                <div class="ridersCont">
                    <a class="team" href="team/ineos-grenadiers-2024">INEOS Grenadiers (WT)</a>
                    <ul>
                        <li><span class="flag gb"></span><a href="rider/tom-pidcock">PIDCOCK Thomas</a></li>
                    </ul>
                </div>
            </li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn test_extracts_teams_and_riders_in_order() {
        let doc = Document::parse(STARTLIST_HTML).unwrap();
        let teams = extract_startlist(&doc, FieldReader::lenient()).unwrap();

        assert_eq!(teams.len(), 2);
        assert_eq!(rider_count(&teams), 3);
        assert_eq!(teams[0].name, "Team Visma | Lease a Bike (WT)");
        assert_eq!(teams[0].short_name.as_deref(), Some("team-visma-lease-a-bike-2024"));
        assert_eq!(teams[0].image.as_deref(), Some("images/shirts/visma.png"));
        assert_eq!(teams[0].riders[0].name, "JORGENSON Matteo");
        assert_eq!(teams[0].riders[0].country.as_deref(), Some("us"));
        assert_eq!(teams[0].riders[0].start_number, "1");
        assert_eq!(teams[1].image, None);
    }

    #[test]
    fn test_dropout_is_own_class_only() {
        let doc = Document::parse(STARTLIST_HTML).unwrap();
        let teams = extract_startlist(&doc, FieldReader::lenient()).unwrap();

        assert!(!teams[0].riders[0].dropout);
        assert!(teams[0].riders[1].dropout);
        // the team block carries the class, the rider does not
        assert!(!teams[1].riders[0].dropout);
    }

    #[test]
    fn test_missing_bib_is_empty_string() {
        let doc = Document::parse(STARTLIST_HTML).unwrap();
        let teams = extract_startlist(&doc, FieldReader::lenient()).unwrap();
        assert_eq!(teams[1].riders[0].start_number, "");
    }

    #[test]
    fn test_empty_page_gives_no_teams() {
        let doc = Document::parse("<html><body><p>Startlist not yet available</p></body></html>").unwrap();
        let teams = extract_startlist(&doc, FieldReader::strict()).unwrap();
        assert!(teams.is_empty());
    }

    #[test]
    fn test_missing_flag_lenient_vs_strict() {
        let html = r#"<ul class="startlist_v4"><li><div class="ridersCont">
            <a class="team" href="team/x-2024">X</a>
            <ul><li><a href="rider/a-b">B A</a></li></ul>
        </div></li></ul>"#;
        let doc = Document::parse(html).unwrap();

        let teams = extract_startlist(&doc, FieldReader::lenient()).unwrap();
        assert_eq!(teams[0].riders[0].country, None);

        let err = extract_startlist(&doc, FieldReader::strict()).unwrap_err();
        assert!(matches!(err, PelotonError::MissingField { field: "country flag", .. }));
    }
}

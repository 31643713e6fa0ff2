//! Field extractors over single document nodes.
//!
//! Every extractor takes one node (a team block, a table row or a list item)
//! and returns one typed value. They are pure: the same markup always gives
//! the same output.
//!
//! Three families exist:
//!
//! - text extractors trim and collapse whitespace, and give an empty string
//!   when the target element is absent;
//! - attribute-token extractors (country code, short name) split an
//!   attribute and pick a positional token, returning `None` when the
//!   attribute or the token is missing;
//! - numeric extractors parse the leading integer of the text, returning
//!   `None` for text such as `DNF`.
//!
//! Whether a missing attribute token is tolerated or aborts the page is
//! decided by [`FieldReader`].

use crate::parse::Element;
use crate::text;
use crate::{PelotonError, Result};

/// CSS selectors describing the results site markup.
pub mod css {
    pub const STARTLIST_TEAM: &str = "ul.startlist_v4 > li";
    pub const STARTLIST_TEAM_LINK: &str = "a.team";
    pub const STARTLIST_TEAM_IMAGE: &str = "img";
    pub const STARTLIST_RIDER: &str = ".ridersCont ul > li";
    pub const STARTLIST_BIB: &str = "span.bib";

    pub const RESULTS_CONTAINER: &str = "div.result-cont";
    pub const RESULTS_TABLE: &str = "table.results";
    pub const BODY_ROW: &str = "tbody > tr";
    pub const PLACE_CELL: &str = "td";
    pub const BIB_CELL: &str = "td.bibs";
    pub const GC_CELL: &str = "td.fs11";
    pub const TIME_CELL: &str = "td.time";
    pub const HIDDEN: &str = ".hide";
    pub const UCI_POINTS_CELL: &str = "td.uci_pnt";
    pub const POINTS_CELL: &str = "td.pnt";
    pub const TODAY_CELL: &str = "td.today";
    pub const QUALIFICATION_CELL: &str = "td.qualification";
    pub const TEAM_CLASS_CELL: &str = "td.class";

    pub const TTT_TEAM: &str = "ul.ttt-results > li:not(.mobile)";
    pub const TTT_RANK: &str = "span.rank";
    pub const TTT_RIDER_ROW: &str = "table tr";

    pub const FLAG: &str = "span.flag";
    pub const RIDER_LINK: &str = r#"a[href^="rider/"]"#;
    pub const TEAM_LINK: &str = r#"a[href^="team/"]"#;
    pub const SURNAME: &str = "span.uppercase";
}

/// Class carried by a startlist rider item when the rider left the race.
pub const DROPOUT_CLASS: &str = "dropout";

/// Class carried by the overall rows of the team classification table.
pub const GENERAL_CLASS: &str = "general";

/// Decides what happens when an attribute-token lookup finds nothing.
///
/// Lenient readers turn the absence into `None`. Strict readers fail with
/// [`PelotonError::MissingField`], which aborts extraction of the whole page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldReader {
    pub strict: bool,
}

impl FieldReader {
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Applies the strictness policy to an optional lookup.
    pub fn require<T>(&self, value: Option<T>, field: &'static str, context: impl FnOnce() -> String) -> Result<Option<T>> {
        match value {
            None if self.strict => Err(PelotonError::MissingField { field, context: context() }),
            other => Ok(other),
        }
    }

    /// Country code from the node's flag span (`class="flag si"` gives `si`).
    pub fn country(&self, node: &Element<'_>, context: impl FnOnce() -> String) -> Result<Option<String>> {
        self.require(country(node)?, "country flag", context)
    }

    /// Short name from the node's first link matching `link_css`.
    pub fn short_name(
        &self, node: &Element<'_>, link_css: &str, context: impl FnOnce() -> String,
    ) -> Result<Option<String>> {
        let href = node.select_first(link_css)?.and_then(|link| link.attr("href"));
        self.require(href.and_then(short_name), "short name link", context)
    }
}

/// Trimmed text of the first descendant matching `selector`, empty when absent.
pub fn text_of(node: &Element<'_>, selector: &str) -> Result<String> {
    Ok(node.select_first(selector)?.map(|el| text::clean(&el.text())).unwrap_or_default())
}

/// Trimmed text of the first descendant matching `selector`, skipping hidden duplicates.
pub fn visible_text_of(node: &Element<'_>, selector: &str) -> Result<String> {
    match node.select_first(selector)? {
        Some(el) => Ok(text::clean(&el.text_excluding(css::HIDDEN)?)),
        None => Ok(String::new()),
    }
}

/// Attribute of the first descendant matching `selector`.
pub fn attr_of(node: &Element<'_>, selector: &str, attr: &str) -> Result<Option<String>> {
    Ok(node
        .select_first(selector)?
        .and_then(|el| el.attr(attr))
        .map(|value| value.trim().to_string()))
}

/// Leading integer of the first descendant matching `selector`.
pub fn number_of(node: &Element<'_>, selector: &str) -> Result<Option<i64>> {
    Ok(text::parse_place(&text_of(node, selector)?))
}

/// Country code: second token of the flag span's class list.
pub fn country(node: &Element<'_>) -> Result<Option<String>> {
    Ok(node
        .select_first(css::FLAG)?
        .and_then(|flag| flag.attr("class"))
        .and_then(|classes| text::class_token(classes, 1))
        .map(str::to_string))
}

/// Short name: second `/`-delimited segment of a profile or team link.
pub fn short_name(href: &str) -> Option<String> {
    text::path_segment(href, 1).map(str::to_string)
}

/// True when the node itself carries the dropout class.
pub fn is_dropout(node: &Element<'_>) -> bool {
    node.has_class(DROPOUT_CLASS)
}

/// A rider name split by the surname-capitals rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitName {
    pub first_name: String,
    pub last_name: String,
}

/// Splits a rider anchor into first and last name.
///
/// The site renders surnames in capitals inside an uppercase span, so the
/// last name is that span's text and the first name is the last whitespace
/// token of the anchor text once the surname is taken out. This is a
/// best-effort rule, not a name parser: a two-word first name keeps only its
/// final word, and an anchor holding only the surname gives an empty first
/// name. Without an uppercase span the last name is empty and the first name
/// is the last token of the whole anchor.
pub fn split_name(anchor: &Element<'_>) -> Result<SplitName> {
    let last_name = text_of(anchor, css::SURNAME)?;
    let full = text::clean(&anchor.text());
    let rest = if last_name.is_empty() { full.clone() } else { full.replacen(&last_name, " ", 1) };
    let first_name = text::last_token(&rest).to_string();
    Ok(SplitName { first_name, last_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;

    fn first<'a>(doc: &'a Document, selector: &str) -> Element<'a> {
        doc.select(selector).unwrap()[0]
    }

    #[test]
    fn test_text_of_missing_is_empty() {
        let doc = Document::parse(r#"<div id="row"><span class="bib"> 11 </span></div>"#).unwrap();
        let row = first(&doc, "#row");
        assert_eq!(text_of(&row, "span.bib").unwrap(), "11");
        assert_eq!(text_of(&row, "span.missing").unwrap(), "");
    }

    #[test]
    fn test_visible_text_skips_hidden_copy() {
        let html = r#"<table><tr id="row"><td class="time"> 0:15 <span class="hide">0:15</span></td></tr></table>"#;
        let doc = Document::parse(html).unwrap();
        let row = first(&doc, "#row");
        assert_eq!(visible_text_of(&row, "td.time").unwrap(), "0:15");
    }

    #[test]
    fn test_country_from_flag_class() {
        let doc = Document::parse(r#"<div id="row"><span class="flag dk"></span></div>"#).unwrap();
        assert_eq!(country(&first(&doc, "#row")).unwrap().as_deref(), Some("dk"));

        let doc = Document::parse(r#"<div id="row"><span class="flag"></span></div>"#).unwrap();
        assert_eq!(country(&first(&doc, "#row")).unwrap(), None);
    }

    #[test]
    fn test_short_name_second_segment() {
        assert_eq!(short_name("team/visma-lease-a-bike-2024").as_deref(), Some("visma-lease-a-bike-2024"));
        assert_eq!(short_name("rider/jonas-vingegaard").as_deref(), Some("jonas-vingegaard"));
        assert_eq!(short_name("team"), None);
    }

    #[test]
    fn test_split_name_surname_first() {
        let html = r#"<a id="a" href="rider/jonas-vingegaard"><span class="uppercase">VINGEGAARD</span> Jonas</a>"#;
        let doc = Document::parse(html).unwrap();
        let name = split_name(&first(&doc, "#a")).unwrap();
        assert_eq!(name, SplitName { first_name: "Jonas".into(), last_name: "VINGEGAARD".into() });
    }

    #[test]
    fn test_split_name_first_name_first() {
        let html = r#"<a id="a" href="rider/jonas-vingegaard">Jonas <span class="uppercase">VINGEGAARD</span></a>"#;
        let doc = Document::parse(html).unwrap();
        let name = split_name(&first(&doc, "#a")).unwrap();
        assert_eq!(name.first_name, "Jonas");
        assert_eq!(name.last_name, "VINGEGAARD");
    }

    #[test]
    fn test_split_name_keeps_only_last_word_of_first_name() {
        let html = r#"<a id="a"><span class="uppercase">VAN SCHIP</span> Jan Willem</a>"#;
        let doc = Document::parse(html).unwrap();
        let name = split_name(&first(&doc, "#a")).unwrap();
        assert_eq!(name.first_name, "Willem");
        assert_eq!(name.last_name, "VAN SCHIP");
    }

    #[test]
    fn test_split_name_surname_only_has_empty_first_name() {
        let html = r#"<a id="a" href="rider/tadej-pogacar"><span class="uppercase">POGACAR</span></a>"#;
        let doc = Document::parse(html).unwrap();
        let name = split_name(&first(&doc, "#a")).unwrap();
        assert_eq!(name.first_name, "");
        assert_eq!(name.last_name, "POGACAR");
    }

    #[test]
    fn test_split_name_without_surname_span() {
        let html = r#"<a id="a" href="rider/tadej-pogacar">Tadej Pogacar</a>"#;
        let doc = Document::parse(html).unwrap();
        let name = split_name(&first(&doc, "#a")).unwrap();
        assert_eq!(name.first_name, "Pogacar");
        assert_eq!(name.last_name, "");
    }

    #[test]
    fn test_lenient_reader_returns_none() {
        let doc = Document::parse(r#"<div id="row"><a href="team">Team</a></div>"#).unwrap();
        let row = first(&doc, "#row");
        let reader = FieldReader::lenient();
        assert_eq!(reader.short_name(&row, "a", || "row".into()).unwrap(), None);
        assert_eq!(reader.country(&row, || "row".into()).unwrap(), None);
    }

    #[test]
    fn test_strict_reader_faults() {
        let doc = Document::parse(r#"<div id="row"><a href="team">Team</a></div>"#).unwrap();
        let row = first(&doc, "#row");
        let reader = FieldReader::strict();
        let err = reader.country(&row, || "row 1".into()).unwrap_err();
        assert!(matches!(err, PelotonError::MissingField { field: "country flag", .. }));
        assert!(reader.short_name(&row, "a", || "row 1".into()).is_err());
    }

    #[test]
    fn test_number_of() {
        let doc = Document::parse(r#"<table><tr id="r"><td class="pnt">120</td><td class="today">DNF</td></tr></table>"#)
            .unwrap();
        let row = first(&doc, "#r");
        assert_eq!(number_of(&row, "td.pnt").unwrap(), Some(120));
        assert_eq!(number_of(&row, "td.today").unwrap(), None);
    }
}

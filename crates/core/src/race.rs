//! Race catalogue, season validation and page URL construction.
//!
//! Every request is identified by a [`Race`], a [`Year`] and, for stage
//! pages, a [`Stage`]. The URL builders turn those into the page addresses
//! of the results site.
//!
//! # Example
//!
//! ```rust
//! use peloton_core::race::{Race, Stage, Year, stage_url};
//!
//! let race: Race = "tour-de-france".parse().unwrap();
//! let year = Year::new(2024).unwrap();
//! let stage: Stage = "7".parse().unwrap();
//!
//! let url = stage_url("https://www.procyclingstats.com", race, year, &stage);
//! assert_eq!(url, "https://www.procyclingstats.com/race/tour-de-france/2024/stage-7");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PelotonError, Result};

/// Default origin of the results site.
pub const DEFAULT_BASE_URL: &str = "https://www.procyclingstats.com";

/// A race the scraper knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Race {
    TourDeFrance,
    GiroDItalia,
    VueltaAEspana,
    ParisNice,
    TirrenoAdriatico,
    MilanoSanremo,
    StradeBianche,
    RondeVanVlaanderen,
    ParisRoubaix,
    AmstelGoldRace,
    LiegeBastogneLiege,
    IlLombardia,
    UaeTour,
    VoltaACatalunya,
    ItzuliaBasqueCountry,
    Dauphine,
    TourDeSuisse,
}

impl Race {
    /// All supported races, in catalogue order.
    pub const ALL: [Race; 17] = [
        Race::TourDeFrance,
        Race::GiroDItalia,
        Race::VueltaAEspana,
        Race::ParisNice,
        Race::TirrenoAdriatico,
        Race::MilanoSanremo,
        Race::StradeBianche,
        Race::RondeVanVlaanderen,
        Race::ParisRoubaix,
        Race::AmstelGoldRace,
        Race::LiegeBastogneLiege,
        Race::IlLombardia,
        Race::UaeTour,
        Race::VoltaACatalunya,
        Race::ItzuliaBasqueCountry,
        Race::Dauphine,
        Race::TourDeSuisse,
    ];

    /// The URL slug of this race.
    pub fn slug(self) -> &'static str {
        match self {
            Race::TourDeFrance => "tour-de-france",
            Race::GiroDItalia => "giro-d-italia",
            Race::VueltaAEspana => "vuelta-a-espana",
            Race::ParisNice => "paris-nice",
            Race::TirrenoAdriatico => "tirreno-adriatico",
            Race::MilanoSanremo => "milano-sanremo",
            Race::StradeBianche => "strade-bianche",
            Race::RondeVanVlaanderen => "ronde-van-vlaanderen",
            Race::ParisRoubaix => "paris-roubaix",
            Race::AmstelGoldRace => "amstel-gold-race",
            Race::LiegeBastogneLiege => "liege-bastogne-liege",
            Race::IlLombardia => "il-lombardia",
            Race::UaeTour => "uae-tour",
            Race::VoltaACatalunya => "volta-a-catalunya",
            Race::ItzuliaBasqueCountry => "itzulia-basque-country",
            Race::Dauphine => "dauphine",
            Race::TourDeSuisse => "tour-de-suisse",
        }
    }

    /// Comma-separated list of every slug, for usage messages.
    pub fn known_slugs() -> String {
        Race::ALL.iter().map(|race| race.slug()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Race {
    type Err = PelotonError;

    fn from_str(s: &str) -> Result<Self> {
        let slug = s.trim();
        Race::ALL
            .into_iter()
            .find(|race| race.slug() == slug)
            .ok_or_else(|| PelotonError::UnknownRace(slug.to_string()))
    }
}

/// A season in the accepted range 1900..=3000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    pub const MIN: i32 = 1900;
    pub const MAX: i32 = 3000;

    /// Validates a calendar year.
    pub fn new(value: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PelotonError::InvalidYear(value.to_string()))
        }
    }

    /// The current UTC calendar year.
    pub fn current() -> Self {
        let year = time::OffsetDateTime::now_utc().year();
        Self(year.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = PelotonError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i32 = s.trim().parse().map_err(|_| PelotonError::InvalidYear(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i32> for Year {
    type Error = PelotonError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

/// Identifier of a stage within a race (`1`, `21`, `prologue`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Stage(String);

impl Stage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Stage {
    type Err = PelotonError;

    fn from_str(s: &str) -> Result<Self> {
        let id = s.trim();
        if id.is_empty() || id.contains('/') || id.chars().any(char::is_whitespace) || id == "." || id == ".." {
            return Err(PelotonError::InvalidStage(s.to_string()));
        }
        Ok(Self(id.to_string()))
    }
}

impl TryFrom<String> for Stage {
    type Error = PelotonError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.0
    }
}

/// Builds `<base>/race/<slug>/<year>/startlist`.
pub fn startlist_url(base: &str, race: Race, year: Year) -> String {
    format!("{}/race/{}/{}/startlist", base.trim_end_matches('/'), race, year)
}

/// Builds `<base>/race/<slug>/<year>/stage-<stage>`.
pub fn stage_url(base: &str, race: Race, year: Year, stage: &Stage) -> String {
    format!("{}/race/{}/{}/stage-{}", base.trim_end_matches('/'), race, year, stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_catalogue_has_seventeen_unique_slugs() {
        let mut slugs: Vec<_> = Race::ALL.iter().map(|r| r.slug()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 17);
    }

    #[test]
    fn test_every_slug_round_trips() {
        for race in Race::ALL {
            assert_eq!(race.slug().parse::<Race>().unwrap(), race);
            assert_eq!(race.to_string(), race.slug());
        }
    }

    #[test]
    fn test_unknown_race() {
        let result = "tour-of-nowhere".parse::<Race>();
        assert!(matches!(result, Err(PelotonError::UnknownRace(ref s)) if s == "tour-of-nowhere"));
    }

    #[test]
    fn test_race_serde_uses_slug() {
        let json = serde_json::to_string(&Race::LiegeBastogneLiege).unwrap();
        assert_eq!(json, "\"liege-bastogne-liege\"");
    }

    #[rstest]
    #[case("1900", true)]
    #[case("3000", true)]
    #[case("2024", true)]
    #[case("1899", false)]
    #[case("3001", false)]
    #[case("twenty", false)]
    #[case("", false)]
    fn test_year_bounds(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(raw.parse::<Year>().is_ok(), ok);
    }

    #[test]
    fn test_year_rejects_through_serde() {
        assert!(serde_json::from_str::<Year>("1899").is_err());
        assert_eq!(serde_json::from_str::<Year>("1900").unwrap().get(), 1900);
    }

    #[test]
    fn test_current_year_is_in_range() {
        let year = Year::current().get();
        assert!((Year::MIN..=Year::MAX).contains(&year));
    }

    #[rstest]
    #[case("1")]
    #[case("21")]
    #[case("prologue")]
    fn test_stage_accepts(#[case] raw: &str) {
        assert_eq!(raw.parse::<Stage>().unwrap().as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("1/2")]
    #[case("stage 1")]
    #[case("..")]
    fn test_stage_rejects(#[case] raw: &str) {
        assert!(matches!(raw.parse::<Stage>(), Err(PelotonError::InvalidStage(_))));
    }

    #[test]
    fn test_url_templates_for_every_race() {
        let year = Year::new(2023).unwrap();
        let stage: Stage = "4".parse().unwrap();
        for race in Race::ALL {
            assert_eq!(
                startlist_url(DEFAULT_BASE_URL, race, year),
                format!("https://www.procyclingstats.com/race/{}/2023/startlist", race.slug())
            );
            assert_eq!(
                stage_url(DEFAULT_BASE_URL, race, year, &stage),
                format!("https://www.procyclingstats.com/race/{}/2023/stage-4", race.slug())
            );
        }
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let year = Year::new(2024).unwrap();
        assert_eq!(
            startlist_url("http://localhost:8080/", Race::ParisNice, year),
            "http://localhost:8080/race/paris-nice/2024/startlist"
        );
    }
}

//! Category → color lookup shared by every chart.
//!
//! A single [`Palette`] is built at startup and passed into each chart
//! builder; no builder carries its own color literals.

use cvd_core::metric::CaseMetric;
use cvd_core::region::compact_region_name;
use std::collections::BTreeMap;

/// Qualitative sequence used for multi-series charts (Dark2).
const DARK2: [&str; 8] = [
    "rgb(27,158,119)",
    "rgb(217,95,2)",
    "rgb(117,112,179)",
    "rgb(231,41,138)",
    "rgb(102,166,30)",
    "rgb(230,171,2)",
    "rgb(166,118,29)",
    "rgb(102,102,102)",
];

const CASE_COLORS: [(&str, &str); 10] = [
    ("Confirmed", "rgb(231,41,138)"),
    ("Recovered", "rgb(27,158,119)"),
    ("New recovered", "rgb(27,158,119)"),
    ("Deaths", "rgb(117,112,179)"),
    ("New deaths", "rgb(117,112,179)"),
    ("Active", "rgb(217,95,2)"),
    ("New cases", "rgb(217,95,2)"),
    ("Deaths / 100 Cases", "rgb(102,166,30)"),
    ("Recovered / 100 Cases", "rgb(102,166,30)"),
    ("Deaths / 100 Recovered", "rgb(230,171,2)"),
];

const REGION_COLORS: [(&str, &str); 6] = [
    ("Africa", "rgb(57, 105, 172)"),
    ("Americas", "rgb(17, 165, 121)"),
    ("Eastern Mediterranean", "rgb(128, 186, 90)"),
    ("Europe", "rgb(127, 60, 141)"),
    ("South-East Asia", "rgb(231, 63, 116)"),
    ("Western Pacific", "rgb(242, 183, 1)"),
];

const COUNTRY_COLORS: [(&str, &str); 10] = [
    ("US", "rgb(127, 60, 141)"),
    ("Brazil", "rgb(17, 165, 121)"),
    ("India", "rgb(57, 105, 172)"),
    ("Russia", "rgb(242, 183, 1)"),
    ("South Africa", "rgb(231, 63, 116)"),
    ("Mexico", "rgb(128, 186, 90)"),
    ("Peru", "rgb(230, 131, 16)"),
    ("Chile", "rgb(0, 134, 149)"),
    ("United Kingdom", "rgb(207, 28, 144)"),
    ("Iran", "rgb(249, 123, 114)"),
];

pub type ColorMap = BTreeMap<String, String>;

fn to_map(pairs: &[(&str, &str)]) -> ColorMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    cases: ColorMap,
    regions: ColorMap,
    compact_regions: ColorMap,
    countries: ColorMap,
    qualitative: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            cases: to_map(&CASE_COLORS),
            regions: to_map(&REGION_COLORS),
            compact_regions: REGION_COLORS
                .iter()
                .map(|(region, color)| (compact_region_name(region), color.to_string()))
                .collect(),
            countries: to_map(&COUNTRY_COLORS),
            qualitative: DARK2.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    /// Color of a case column by its label (`Confirmed`, `New cases`, ...).
    pub fn case_color(&self, label: &str) -> Option<&str> {
        self.cases.get(label).map(String::as_str)
    }

    /// `case_color` as a one-element sequence, empty for unknown labels.
    pub fn case_sequence(&self, label: &str) -> Vec<String> {
        self.case_color(label)
            .map(|c| vec![c.to_string()])
            .unwrap_or_default()
    }

    /// Subset of the case colors for `labels`.
    pub fn case_map(&self, labels: &[&str]) -> ColorMap {
        labels
            .iter()
            .filter_map(|l| self.case_color(l).map(|c| (l.to_string(), c.to_string())))
            .collect()
    }

    /// Region colors, spelled as in the daily and latest tables.
    pub fn region_map(&self) -> &ColorMap {
        &self.regions
    }

    /// Region colors, spelled as in the demographic snapshot.
    pub fn compact_region_map(&self) -> &ColorMap {
        &self.compact_regions
    }

    pub fn country_map(&self) -> &ColorMap {
        &self.countries
    }

    pub fn qualitative(&self) -> &[String] {
        &self.qualitative
    }

    /// Continuous color scale name for maps and share bars of `metric`.
    pub fn continuous_scale(&self, metric: CaseMetric) -> &'static str {
        match metric {
            CaseMetric::Confirmed => "Burg",
            CaseMetric::Recovered => "algae",
            CaseMetric::Deaths => "Purp",
            CaseMetric::Active => "Oranges",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_colors() {
        let palette = Palette::default();
        assert_eq!(palette.case_color("Confirmed"), Some("rgb(231,41,138)"));
        assert_eq!(palette.case_color("New cases"), Some("rgb(217,95,2)"));
        assert_eq!(palette.case_color("Bogus"), None);
        assert!(palette.case_sequence("Bogus").is_empty());
    }

    #[test]
    fn region_spellings_kept_apart() {
        let palette = Palette::default();
        assert!(palette.region_map().contains_key("South-East Asia"));
        assert!(!palette.region_map().contains_key("South-EastAsia"));
        assert!(palette.compact_region_map().contains_key("South-EastAsia"));
        assert_eq!(
            palette.region_map().get("Western Pacific"),
            palette.compact_region_map().get("WesternPacific")
        );
    }

    #[test]
    fn compact_map_matches_demographic_spellings() {
        let palette = Palette::default();
        let keys: Vec<&str> = palette.compact_region_map().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Africa",
                "Americas",
                "EasternMediterranean",
                "Europe",
                "South-EastAsia",
                "WesternPacific"
            ]
        );
        assert_eq!(
            palette.compact_region_map().get("EasternMediterranean").map(String::as_str),
            Some("rgb(128, 186, 90)")
        );
    }

    #[test]
    fn case_map_subset() {
        let palette = Palette::default();
        let map = palette.case_map(&["Deaths", "Active"]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["Active"], "rgb(217,95,2)");
    }

    #[test]
    fn qualitative_and_scales() {
        let palette = Palette::default();
        assert_eq!(palette.qualitative().len(), 8);
        assert_eq!(palette.continuous_scale(CaseMetric::Recovered), "algae");
    }
}

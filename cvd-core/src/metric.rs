//! Enumerated choices offered to the user and used to pick table columns.
//!
//! Every user-facing dropdown or radio group is backed by one of these enums.
//! The label is the exact text shown to the user and the exact value the
//! selector accepts.

use serde::Serialize;

/// A finite, labelled set of values a selector can offer.
pub trait Choice: Copy + Sized + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];

    /// The display label, which is also the accepted input value.
    fn label(&self) -> &'static str;

    /// Alternate spellings accepted on input, never displayed.
    fn aliases() -> &'static [(&'static str, Self)] {
        &[]
    }

    /// Look a value up by its exact label or one of its aliases.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == label)
            .or_else(|| Self::aliases().iter().find(|(a, _)| *a == label).map(|(_, c)| *c))
    }

    /// All labels in display order.
    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

/// The four cumulative case counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CaseMetric {
    Confirmed,
    Deaths,
    Recovered,
    Active,
}

impl CaseMetric {
    /// SQL column name in the in-memory database.
    pub fn column(&self) -> &'static str {
        match self {
            CaseMetric::Confirmed => "confirmed",
            CaseMetric::Deaths => "deaths",
            CaseMetric::Recovered => "recovered",
            CaseMetric::Active => "active",
        }
    }
}

impl Choice for CaseMetric {
    const ALL: &'static [Self] = &[
        CaseMetric::Confirmed,
        CaseMetric::Recovered,
        CaseMetric::Deaths,
        CaseMetric::Active,
    ];

    fn label(&self) -> &'static str {
        match self {
            CaseMetric::Confirmed => "Confirmed",
            CaseMetric::Deaths => "Deaths",
            CaseMetric::Recovered => "Recovered",
            CaseMetric::Active => "Active",
        }
    }
}

/// Daily increments reported alongside the cumulative counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NewCaseMetric {
    NewCases,
    NewRecovered,
    NewDeaths,
}

impl Choice for NewCaseMetric {
    const ALL: &'static [Self] = &[
        NewCaseMetric::NewCases,
        NewCaseMetric::NewRecovered,
        NewCaseMetric::NewDeaths,
    ];

    fn label(&self) -> &'static str {
        match self {
            NewCaseMetric::NewCases => "New cases",
            NewCaseMetric::NewRecovered => "New recovered",
            NewCaseMetric::NewDeaths => "New deaths",
        }
    }
}

/// Columns of the worldometer-style demographic snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DemographicMetric {
    TotalCases,
    TotalDeaths,
    TotalRecovered,
    Population,
}

impl Choice for DemographicMetric {
    const ALL: &'static [Self] = &[
        DemographicMetric::TotalCases,
        DemographicMetric::TotalDeaths,
        DemographicMetric::TotalRecovered,
        DemographicMetric::Population,
    ];

    fn label(&self) -> &'static str {
        match self {
            DemographicMetric::TotalCases => "TotalCases",
            DemographicMetric::TotalDeaths => "TotalDeaths",
            DemographicMetric::TotalRecovered => "TotalRecovered",
            DemographicMetric::Population => "Population",
        }
    }
}

/// A column of the per-region summary: one of the summed counts or a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegionColumn {
    Metric(CaseMetric),
    FatalityRate,
    RecoveryRate,
}

impl Choice for RegionColumn {
    const ALL: &'static [Self] = &[
        RegionColumn::Metric(CaseMetric::Confirmed),
        RegionColumn::Metric(CaseMetric::Deaths),
        RegionColumn::Metric(CaseMetric::Recovered),
        RegionColumn::Metric(CaseMetric::Active),
        RegionColumn::FatalityRate,
        RegionColumn::RecoveryRate,
    ];

    fn label(&self) -> &'static str {
        match self {
            RegionColumn::Metric(m) => m.label(),
            RegionColumn::FatalityRate => "Fatality Rate in %",
            RegionColumn::RecoveryRate => "Recovery Rate in %",
        }
    }
}

/// Linear or logarithmic axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

impl Choice for AxisScale {
    const ALL: &'static [Self] = &[AxisScale::Linear, AxisScale::Log];

    fn label(&self) -> &'static str {
        match self {
            AxisScale::Linear => "Linear",
            AxisScale::Log => "Log",
        }
    }

    fn aliases() -> &'static [(&'static str, Self)] {
        &[("Linear ", AxisScale::Linear)]
    }
}

/// Every plottable column of the daily global table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DailyColumn {
    Confirmed,
    Recovered,
    NewRecovered,
    Active,
    NewCases,
    Deaths,
    NewDeaths,
    DeathsPer100Cases,
    RecoveredPer100Cases,
    DeathsPer100Recovered,
}

impl Choice for DailyColumn {
    const ALL: &'static [Self] = &[
        DailyColumn::Confirmed,
        DailyColumn::Recovered,
        DailyColumn::NewRecovered,
        DailyColumn::Active,
        DailyColumn::NewCases,
        DailyColumn::Deaths,
        DailyColumn::NewDeaths,
        DailyColumn::DeathsPer100Cases,
        DailyColumn::RecoveredPer100Cases,
        DailyColumn::DeathsPer100Recovered,
    ];

    fn label(&self) -> &'static str {
        match self {
            DailyColumn::Confirmed => "Confirmed",
            DailyColumn::Recovered => "Recovered",
            DailyColumn::NewRecovered => "New recovered",
            DailyColumn::Active => "Active",
            DailyColumn::NewCases => "New cases",
            DailyColumn::Deaths => "Deaths",
            DailyColumn::NewDeaths => "New deaths",
            DailyColumn::DeathsPer100Cases => "Deaths / 100 Cases",
            DailyColumn::RecoveredPer100Cases => "Recovered / 100 Cases",
            DailyColumn::DeathsPer100Recovered => "Deaths / 100 Recovered",
        }
    }
}

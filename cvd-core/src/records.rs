//! Typed rows of the four source tables.
//!
//! All dates are `YYYY-MM-DD` strings; the loader normalizes them before a
//! row is ever constructed.

use crate::error::{CovidError, Result};
use crate::metric::{CaseMetric, DailyColumn, DemographicMetric, NewCaseMetric};
use cvd_utils::rounding::percent_half_up;
use serde::{Serialize, Serializer};

/// A percentage that may be undefined because its denominator was zero.
///
/// `Undefined` serializes as JSON `null` so it can never end up on a
/// numeric chart axis as NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Defined(f64),
    Undefined,
}

impl Rate {
    /// `100 * part / whole`, half-up rounded to two decimals.
    pub fn percent(part: i64, whole: i64) -> Rate {
        percent_half_up(part, whole, 2).map_or(Rate::Undefined, Rate::Defined)
    }

    /// Wrap a value read from a file. Non-finite values (`inf`, `NaN`) are undefined.
    pub fn from_f64(value: f64) -> Rate {
        if value.is_finite() {
            Rate::Defined(value)
        } else {
            Rate::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Rate::Defined(v) => Some(*v),
            Rate::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Rate::Defined(_))
    }

    /// The numeric value, or `UndefinedRate` naming `what` was being computed.
    pub fn try_value(&self, what: &str) -> Result<f64> {
        self.value().ok_or_else(|| CovidError::UndefinedRate {
            what: what.to_string(),
        })
    }
}

impl From<Option<f64>> for Rate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Rate::Undefined, Rate::from_f64)
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Rate::Defined(v) => serializer.serialize_f64(*v),
            Rate::Undefined => serializer.serialize_none(),
        }
    }
}

/// A value of the daily global table: a count or a rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Count(i64),
    Rate(Rate),
}

/// One row per calendar day of worldwide totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGlobal {
    pub date: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
    pub new_cases: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
    pub deaths_per_100_cases: Rate,
    pub recovered_per_100_cases: Rate,
    pub deaths_per_100_recovered: Rate,
}

impl DailyGlobal {
    pub fn column(&self, column: DailyColumn) -> Measure {
        match column {
            DailyColumn::Confirmed => Measure::Count(self.confirmed),
            DailyColumn::Recovered => Measure::Count(self.recovered),
            DailyColumn::NewRecovered => Measure::Count(self.new_recovered),
            DailyColumn::Active => Measure::Count(self.active),
            DailyColumn::NewCases => Measure::Count(self.new_cases),
            DailyColumn::Deaths => Measure::Count(self.deaths),
            DailyColumn::NewDeaths => Measure::Count(self.new_deaths),
            DailyColumn::DeathsPer100Cases => Measure::Rate(self.deaths_per_100_cases),
            DailyColumn::RecoveredPer100Cases => Measure::Rate(self.recovered_per_100_cases),
            DailyColumn::DeathsPer100Recovered => Measure::Rate(self.deaths_per_100_recovered),
        }
    }
}

/// One row per country per day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDaily {
    pub date: String,
    pub country: String,
    pub who_region: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
    pub new_cases: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
}

impl CountryDaily {
    pub fn metric(&self, metric: CaseMetric) -> i64 {
        match metric {
            CaseMetric::Confirmed => self.confirmed,
            CaseMetric::Deaths => self.deaths,
            CaseMetric::Recovered => self.recovered,
            CaseMetric::Active => self.active,
        }
    }

    pub fn new_metric(&self, metric: NewCaseMetric) -> i64 {
        match metric {
            NewCaseMetric::NewCases => self.new_cases,
            NewCaseMetric::NewRecovered => self.new_recovered,
            NewCaseMetric::NewDeaths => self.new_deaths,
        }
    }
}

/// Most recent snapshot, one row per country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryLatest {
    pub country: String,
    pub who_region: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
    pub deaths_per_100_cases: Rate,
    pub recovered_per_100_cases: Rate,
    pub deaths_per_100_recovered: Rate,
}

impl CountryLatest {
    pub fn metric(&self, metric: CaseMetric) -> i64 {
        match metric {
            CaseMetric::Confirmed => self.confirmed,
            CaseMetric::Deaths => self.deaths,
            CaseMetric::Recovered => self.recovered,
            CaseMetric::Active => self.active,
        }
    }
}

/// External population snapshot. Any count may be missing in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDemographic {
    pub country: String,
    pub who_region: String,
    pub population: Option<i64>,
    pub total_cases: Option<i64>,
    pub total_deaths: Option<i64>,
    pub total_recovered: Option<i64>,
}

impl CountryDemographic {
    pub fn metric(&self, metric: DemographicMetric) -> Option<i64> {
        match metric {
            DemographicMetric::TotalCases => self.total_cases,
            DemographicMetric::TotalDeaths => self.total_deaths,
            DemographicMetric::TotalRecovered => self.total_recovered,
            DemographicMetric::Population => self.population,
        }
    }
}

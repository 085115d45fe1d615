//! Query result model structs for derived COVID-19 tables.
//!
//! All structs derive `Serialize` so they can be embedded in chart
//! descriptions as JSON.

use serde::Serialize;

/// Sums of the four case metrics for one WHO region.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionTotals {
    pub who_region: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
}

/// Sums of the four case metrics for one (region, country) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegionCountryTotals {
    pub who_region: String,
    pub country: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
}

/// A country's value for one metric next to the global total of the same date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryGlobalValue {
    pub date: String,
    pub country: String,
    pub value: i64,
    pub global: i64,
}

/// First and last date of a table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

/// A latest-snapshot row that disagrees with the country's last daily row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StaleLatest {
    pub country: String,
    /// Confirmed count in the latest snapshot.
    pub latest_confirmed: i64,
    /// Confirmed count on the country's last daily row, if it has any.
    pub daily_confirmed: Option<i64>,
}

/// Findings of the post-load data-quality checks.
///
/// None of these fail the load; they are logged as warnings.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct QualityReport {
    /// Consecutive global dates that are not exactly one day apart,
    /// as `(earlier, later)` pairs.
    pub date_gaps: Vec<(String, String)>,
    /// Global rows, in file order, whose date was not after the latest
    /// date read before them, as `(latest so far, row date)` pairs.
    pub non_increasing_dates: Vec<(String, String)>,
    pub stale_latest: Vec<StaleLatest>,
    /// Demographic regions outside the six canonical names, with the
    /// number of countries using each spelling.
    pub noncanonical_regions: Vec<(String, i64)>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.date_gaps.is_empty()
            && self.non_increasing_dates.is_empty()
            && self.stale_latest.is_empty()
            && self.noncanonical_regions.is_empty()
    }

    pub fn log_warnings(&self) {
        for (earlier, later) in &self.date_gaps {
            log::warn!(
                "[CVD] loader: daily global dates not consecutive: {} -> {}",
                earlier,
                later
            );
        }
        for (previous, date) in &self.non_increasing_dates {
            log::warn!(
                "[CVD] loader: daily global date {} does not follow {}",
                date,
                previous
            );
        }
        for stale in &self.stale_latest {
            log::warn!(
                "[CVD] loader: latest snapshot for {} has Confirmed={} but last daily row has {:?}",
                stale.country,
                stale.latest_confirmed,
                stale.daily_confirmed
            );
        }
        for (region, countries) in &self.noncanonical_regions {
            log::warn!(
                "[CVD] loader: demographic region '{}' ({} countries) is not a canonical WHO region name",
                region,
                countries
            );
        }
    }
}

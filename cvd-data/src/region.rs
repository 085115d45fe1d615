//! Per-region totals and the region → country breakdown.

use crate::table::{Cell, Table};
use cvd_core::metric::{CaseMetric, Choice, RegionColumn};
use cvd_core::records::{Measure, Rate};
use cvd_core::Result;
use cvd_db::models::RegionCountryTotals;
use cvd_db::Database;
use serde::Serialize;
use std::cmp::Ordering;

pub const WHO_REGION_COLUMN: &str = "WHO Region";
pub const COUNTRY_COLUMN: &str = "Country/Region";
/// Label and value column names of the long-form breakdown.
pub const CASE_COLUMN: &str = "Case";
pub const COUNT_COLUMN: &str = "Count";

/// Case kinds unpivoted into the hierarchical breakdown, in output order.
pub const BREAKDOWN_CASES: [CaseMetric; 3] =
    [CaseMetric::Recovered, CaseMetric::Active, CaseMetric::Deaths];

/// Case totals of one WHO region plus fatality and recovery rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub who_region: String,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
    /// `100 * deaths / confirmed`, two decimals.
    pub fatality_rate: Rate,
    /// `100 * recovered / confirmed`, two decimals.
    pub recovery_rate: Rate,
}

impl RegionSummary {
    pub fn metric(&self, metric: CaseMetric) -> i64 {
        match metric {
            CaseMetric::Confirmed => self.confirmed,
            CaseMetric::Deaths => self.deaths,
            CaseMetric::Recovered => self.recovered,
            CaseMetric::Active => self.active,
        }
    }

    pub fn column(&self, column: RegionColumn) -> Measure {
        match column {
            RegionColumn::Metric(m) => Measure::Count(self.metric(m)),
            RegionColumn::FatalityRate => Measure::Rate(self.fatality_rate),
            RegionColumn::RecoveryRate => Measure::Rate(self.recovery_rate),
        }
    }
}

/// Sum the four case metrics of every country's latest daily row by WHO
/// region, ordered by region name.
///
/// A region with zero confirmed cases gets `Rate::Undefined` rates.
pub fn region_summary(db: &Database) -> Result<Vec<RegionSummary>> {
    let rows = db
        .query_region_totals()?
        .into_iter()
        .map(|t| RegionSummary {
            fatality_rate: Rate::percent(t.deaths, t.confirmed),
            recovery_rate: Rate::percent(t.recovered, t.confirmed),
            who_region: t.who_region,
            confirmed: t.confirmed,
            deaths: t.deaths,
            recovered: t.recovered,
            active: t.active,
        })
        .collect::<Vec<_>>();
    let undefined = rows.iter().filter(|r| !r.fatality_rate.is_defined()).count();
    if undefined > 0 {
        log::info!(
            "[CVD] query: region_summary has {} regions without confirmed cases",
            undefined
        );
    }
    Ok(rows)
}

fn measure_cmp(a: Measure, b: Measure) -> Ordering {
    match (a, b) {
        (Measure::Count(x), Measure::Count(y)) => x.cmp(&y),
        (Measure::Rate(x), Measure::Rate(y)) => match (x, y) {
            (Rate::Undefined, Rate::Undefined) => Ordering::Equal,
            (Rate::Undefined, Rate::Defined(_)) => Ordering::Less,
            (Rate::Defined(_), Rate::Undefined) => Ordering::Greater,
            (Rate::Defined(x), Rate::Defined(y)) => x.total_cmp(&y),
        },
        (Measure::Count(_), Measure::Rate(_)) => Ordering::Less,
        (Measure::Rate(_), Measure::Count(_)) => Ordering::Greater,
    }
}

/// Sort ascending by `column`. Undefined rates sort first; ties keep
/// region order.
pub fn sort_region_summary(rows: &mut [RegionSummary], column: RegionColumn) {
    rows.sort_by(|a, b| measure_cmp(a.column(column), b.column(column)));
}

/// Region summary as a table: `WHO Region` then every [`RegionColumn`].
pub fn region_summary_table(rows: &[RegionSummary]) -> Result<Table> {
    let mut table = Table::new(
        std::iter::once(WHO_REGION_COLUMN).chain(RegionColumn::labels()),
    );
    for row in rows {
        let mut cells = vec![Cell::from(row.who_region.as_str())];
        cells.extend(RegionColumn::ALL.iter().map(|c| Cell::from(row.column(*c))));
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Wide and long forms of the (region, country) totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCountryBreakdown {
    pub wide: Vec<RegionCountryTotals>,
    /// `WHO Region, Country/Region, Case, Count`, one row per country and
    /// case kind in [`BREAKDOWN_CASES`] order.
    pub long: Table,
}

/// Wide table of `WHO Region, Country/Region` and the four case metrics.
pub fn region_country_table(rows: &[RegionCountryTotals]) -> Result<Table> {
    let mut table = Table::new(
        [WHO_REGION_COLUMN, COUNTRY_COLUMN]
            .into_iter()
            .chain(CaseMetric::labels()),
    );
    for row in rows {
        let mut cells = vec![
            Cell::from(row.who_region.as_str()),
            Cell::from(row.country.as_str()),
        ];
        cells.extend(CaseMetric::ALL.iter().map(|m| {
            Cell::Int(match m {
                CaseMetric::Confirmed => row.confirmed,
                CaseMetric::Deaths => row.deaths,
                CaseMetric::Recovered => row.recovered,
                CaseMetric::Active => row.active,
            })
        }));
        table.push_row(cells)?;
    }
    Ok(table)
}

/// Sum the latest snapshot by (region, country), then unpivot the case
/// kinds for a region → country → case hierarchy.
///
/// With `Some(region)` only that region's countries are included.
pub fn region_country_breakdown(
    db: &Database,
    region: Option<&str>,
) -> Result<RegionCountryBreakdown> {
    let wide = db.query_region_country_totals(region)?;
    let cases: Vec<&str> = BREAKDOWN_CASES.iter().map(|m| m.label()).collect();
    let long = region_country_table(&wide)?.reshape_wide_to_long(
        &[WHO_REGION_COLUMN, COUNTRY_COLUMN],
        &cases,
        CASE_COLUMN,
        COUNT_COLUMN,
    )?;
    Ok(RegionCountryBreakdown { wide, long })
}

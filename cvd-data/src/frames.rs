//! Source records as [`Table`]s, with the column names of the source files.

use crate::region::{COUNTRY_COLUMN, WHO_REGION_COLUMN};
use crate::share::DATE_COLUMN;
use crate::table::{Cell, Table};
use cvd_core::metric::{CaseMetric, Choice, DailyColumn, DemographicMetric, NewCaseMetric};
use cvd_core::records::{CountryDaily, CountryDemographic, CountryLatest, DailyGlobal};
use cvd_core::Result;

/// `Date` followed by the chosen daily global columns.
pub fn daily_global_table(rows: &[DailyGlobal], columns: &[DailyColumn]) -> Result<Table> {
    let mut table = Table::new(
        std::iter::once(DATE_COLUMN).chain(columns.iter().map(|c| c.label())),
    );
    for row in rows {
        let mut cells = vec![Cell::from(row.date.as_str())];
        cells.extend(columns.iter().map(|c| Cell::from(row.column(*c))));
        table.push_row(cells)?;
    }
    Ok(table)
}

/// `Date, Country/Region, WHO Region`, the four case metrics and the three
/// daily increments.
pub fn country_daily_table(rows: &[CountryDaily]) -> Result<Table> {
    let mut table = Table::new(
        [DATE_COLUMN, COUNTRY_COLUMN, WHO_REGION_COLUMN]
            .into_iter()
            .chain(CaseMetric::labels())
            .chain(NewCaseMetric::labels()),
    );
    for row in rows {
        let mut cells = vec![
            Cell::from(row.date.as_str()),
            Cell::from(row.country.as_str()),
            Cell::from(row.who_region.as_str()),
        ];
        cells.extend(CaseMetric::ALL.iter().map(|m| Cell::Int(row.metric(*m))));
        cells.extend(NewCaseMetric::ALL.iter().map(|m| Cell::Int(row.new_metric(*m))));
        table.push_row(cells)?;
    }
    Ok(table)
}

/// `Country/Region, WHO Region` and the four case metrics.
pub fn country_latest_table(rows: &[CountryLatest]) -> Result<Table> {
    let mut table = Table::new(
        [COUNTRY_COLUMN, WHO_REGION_COLUMN]
            .into_iter()
            .chain(CaseMetric::labels()),
    );
    for row in rows {
        let mut cells = vec![
            Cell::from(row.country.as_str()),
            Cell::from(row.who_region.as_str()),
        ];
        cells.extend(CaseMetric::ALL.iter().map(|m| Cell::Int(row.metric(*m))));
        table.push_row(cells)?;
    }
    Ok(table)
}

/// `Country/Region, WHO Region` and the demographic counts. Missing
/// counts are `Undefined`.
pub fn demographic_table(rows: &[CountryDemographic]) -> Result<Table> {
    let mut table = Table::new(
        [COUNTRY_COLUMN, WHO_REGION_COLUMN]
            .into_iter()
            .chain(DemographicMetric::labels()),
    );
    for row in rows {
        let mut cells = vec![
            Cell::from(row.country.as_str()),
            Cell::from(row.who_region.as_str()),
        ];
        cells.extend(DemographicMetric::ALL.iter().map(|m| Cell::from(row.metric(*m))));
        table.push_row(cells)?;
    }
    Ok(table)
}

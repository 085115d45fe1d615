//! CSV data loading for populating the in-memory SQLite database.
//!
//! Each loader parses CSV text and inserts rows into the corresponding
//! table inside one transaction. Columns are located by header name, so
//! column order and extra columns in the source files do not matter.
//!
//! # CSV Formats (all with headers)
//!
//! - **Daily global**: `Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered[,Deaths / 100 Cases,Recovered / 100 Cases,Deaths / 100 Recovered]`
//! - **Country daily**: `Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region[,New cases,New deaths,New recovered]`
//! - **Country latest**: `Country/Region,Confirmed,Deaths,Recovered,Active[,WHO Region,<rate columns>]`
//! - **Country demographic**: `Country/Region,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region`

use crate::Database;
use cvd_core::records::Rate;
use cvd_core::{CovidError, Result};
use cvd_utils::dates::normalize_date;
use csv::StringRecord;
use rusqlite::params;
use std::collections::HashMap;

pub(crate) const DATE: &str = "Date";
pub(crate) const COUNTRY: &str = "Country/Region";
pub(crate) const WHO_REGION: &str = "WHO Region";
pub(crate) const CONFIRMED: &str = "Confirmed";
pub(crate) const DEATHS: &str = "Deaths";
pub(crate) const RECOVERED: &str = "Recovered";
pub(crate) const ACTIVE: &str = "Active";
pub(crate) const NEW_CASES: &str = "New cases";
pub(crate) const NEW_DEATHS: &str = "New deaths";
pub(crate) const NEW_RECOVERED: &str = "New recovered";
pub(crate) const DEATHS_PER_100_CASES: &str = "Deaths / 100 Cases";
pub(crate) const RECOVERED_PER_100_CASES: &str = "Recovered / 100 Cases";
pub(crate) const DEATHS_PER_100_RECOVERED: &str = "Deaths / 100 Recovered";
pub(crate) const POPULATION: &str = "Population";
pub(crate) const TOTAL_CASES: &str = "TotalCases";
pub(crate) const TOTAL_DEATHS: &str = "TotalDeaths";
pub(crate) const TOTAL_RECOVERED: &str = "TotalRecovered";

const DAILY_GLOBAL_REQUIRED: [&str; 8] = [
    DATE,
    CONFIRMED,
    DEATHS,
    RECOVERED,
    ACTIVE,
    NEW_CASES,
    NEW_DEATHS,
    NEW_RECOVERED,
];
const COUNTRY_DAILY_REQUIRED: [&str; 7] = [
    DATE, COUNTRY, WHO_REGION, CONFIRMED, DEATHS, RECOVERED, ACTIVE,
];
const COUNTRY_LATEST_REQUIRED: [&str; 5] = [COUNTRY, CONFIRMED, DEATHS, RECOVERED, ACTIVE];
const COUNTRY_DEMOGRAPHIC_REQUIRED: [&str; 6] = [
    COUNTRY,
    WHO_REGION,
    POPULATION,
    TOTAL_CASES,
    TOTAL_DEATHS,
    TOTAL_RECOVERED,
];

/// Header-name to column-position lookup for one source table.
pub(crate) struct HeaderIndex {
    table: &'static str,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Index `headers`, failing with `SchemaMismatch` on the first required
    /// column that is absent.
    pub(crate) fn new(
        table: &'static str,
        headers: &StringRecord,
        required: &[&str],
    ) -> Result<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        if let Some(missing) = required.iter().find(|c| !positions.contains_key(**c)) {
            return Err(CovidError::SchemaMismatch {
                table: table.to_string(),
                column: missing.to_string(),
            });
        }
        Ok(Self { table, positions })
    }

    pub(crate) fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    fn raw<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.positions
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
    }

    fn malformed(&self, column: &str, value: &str) -> CovidError {
        CovidError::MalformedValue {
            table: self.table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn text(&self, record: &StringRecord, column: &str) -> String {
        self.raw(record, column).unwrap_or("").to_string()
    }

    /// A required non-empty date cell, normalized to `YYYY-MM-DD`.
    pub(crate) fn date(&self, record: &StringRecord, column: &str) -> Result<String> {
        let value = self.raw(record, column).unwrap_or("");
        normalize_date(value).map_err(|_| self.malformed(column, value))
    }

    /// A required integer cell. Float spellings (`331002651.0`) are truncated.
    pub(crate) fn count(&self, record: &StringRecord, column: &str) -> Result<i64> {
        let value = self.raw(record, column).unwrap_or("");
        parse_count(value).ok_or_else(|| self.malformed(column, value))
    }

    /// An optional integer cell: absent column or blank cell is `None`.
    pub(crate) fn optional_count(&self, record: &StringRecord, column: &str) -> Result<Option<i64>> {
        match self.raw(record, column) {
            None | Some("") => Ok(None),
            Some(value) => parse_count(value)
                .map(Some)
                .ok_or_else(|| self.malformed(column, value)),
        }
    }

    /// A rate cell. `None` when the column is absent (the caller derives it),
    /// `Rate::Undefined` when the cell is blank or non-finite.
    pub(crate) fn rate(&self, record: &StringRecord, column: &str) -> Result<Option<Rate>> {
        if !self.has(column) {
            return Ok(None);
        }
        match self.raw(record, column) {
            None | Some("") => Ok(Some(Rate::Undefined)),
            Some(value) => value
                .parse::<f64>()
                .map(|v| Some(Rate::from_f64(v)))
                .map_err(|_| self.malformed(column, value)),
        }
    }
}

fn parse_count(value: &str) -> Option<i64> {
    if let Ok(v) = value.parse::<i64>() {
        return Some(v);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v.trunc() as i64),
        _ => None,
    }
}

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes())
}

fn unreadable(table: &str, err: csv::Error) -> CovidError {
    CovidError::DataUnavailable {
        path: table.to_string(),
        reason: err.to_string(),
    }
}

/// Rates stored as `NULL` when undefined.
fn rate_cell(rate: Rate) -> Option<f64> {
    rate.value()
}

impl Database {
    /// Load the daily global table.
    ///
    /// Missing rate columns are derived from the counts:
    /// deaths/100 cases, recovered/100 cases and deaths/100 recovered.
    ///
    /// A row whose date is not after the latest date already read replaces
    /// the stored row for that date and is recorded in
    /// `daily_global_out_of_order` for the quality report.
    pub(crate) fn load_daily_global(&self, csv_data: &str) -> Result<()> {
        const TABLE: &str = "daily_global";
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| unreadable(TABLE, e))?.clone();
        let idx = HeaderIndex::new(TABLE, &headers, &DAILY_GLOBAL_REQUIRED)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO daily_global
                 (date, confirmed, deaths, recovered, active, new_cases, new_deaths, new_recovered,
                  deaths_per_100_cases, recovered_per_100_cases, deaths_per_100_recovered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            let mut out_of_order = tx.prepare(
                "INSERT INTO daily_global_out_of_order (line, previous, date) VALUES (?1, ?2, ?3)",
            )?;
            let mut latest: Option<String> = None;
            for (line, result) in rdr.records().enumerate() {
                let r = result.map_err(|e| unreadable(TABLE, e))?;
                let date = idx.date(&r, DATE)?;
                let repeated = matches!(&latest, Some(previous) if date.as_str() <= previous.as_str());
                if repeated {
                    out_of_order.execute(params![line as i64 + 2, latest, date])?;
                } else {
                    latest = Some(date.clone());
                }
                let confirmed = idx.count(&r, CONFIRMED)?;
                let deaths = idx.count(&r, DEATHS)?;
                let recovered = idx.count(&r, RECOVERED)?;
                let active = idx.count(&r, ACTIVE)?;
                let new_cases = idx.count(&r, NEW_CASES)?;
                let new_deaths = idx.count(&r, NEW_DEATHS)?;
                let new_recovered = idx.count(&r, NEW_RECOVERED)?;
                let dpc = idx
                    .rate(&r, DEATHS_PER_100_CASES)?
                    .unwrap_or_else(|| Rate::percent(deaths, confirmed));
                let rpc = idx
                    .rate(&r, RECOVERED_PER_100_CASES)?
                    .unwrap_or_else(|| Rate::percent(recovered, confirmed));
                let dpr = idx
                    .rate(&r, DEATHS_PER_100_RECOVERED)?
                    .unwrap_or_else(|| Rate::percent(deaths, recovered));

                stmt.execute(params![
                    date,
                    confirmed,
                    deaths,
                    recovered,
                    active,
                    new_cases,
                    new_deaths,
                    new_recovered,
                    rate_cell(dpc),
                    rate_cell(rpc),
                    rate_cell(dpr),
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!("[CVD] loader: Loaded {} daily global rows", count);
        Ok(())
    }

    /// Load the per-country daily table.
    ///
    /// A repeated (date, country) pair replaces the earlier row. The
    /// `New *` columns are optional and default to zero.
    pub(crate) fn load_country_daily(&self, csv_data: &str) -> Result<()> {
        const TABLE: &str = "country_daily";
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| unreadable(TABLE, e))?.clone();
        let idx = HeaderIndex::new(TABLE, &headers, &COUNTRY_DAILY_REQUIRED)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        let mut skipped = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO country_daily
                 (date, country, who_region, confirmed, deaths, recovered, active,
                  new_cases, new_deaths, new_recovered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for result in rdr.records() {
                let r = result.map_err(|e| unreadable(TABLE, e))?;
                let country = idx.text(&r, COUNTRY);
                if country.is_empty() {
                    skipped += 1;
                    continue;
                }
                let date = idx.date(&r, DATE)?;
                let who_region = idx.text(&r, WHO_REGION);
                let confirmed = idx.count(&r, CONFIRMED)?;
                let deaths = idx.count(&r, DEATHS)?;
                let recovered = idx.count(&r, RECOVERED)?;
                let active = idx.count(&r, ACTIVE)?;
                let new_cases = idx.optional_count(&r, NEW_CASES)?.unwrap_or(0);
                let new_deaths = idx.optional_count(&r, NEW_DEATHS)?.unwrap_or(0);
                let new_recovered = idx.optional_count(&r, NEW_RECOVERED)?.unwrap_or(0);

                stmt.execute(params![
                    date,
                    country,
                    who_region,
                    confirmed,
                    deaths,
                    recovered,
                    active,
                    new_cases,
                    new_deaths,
                    new_recovered,
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!(
            "[CVD] loader: Loaded {} country daily rows, skipped {} without a country",
            count,
            skipped
        );
        Ok(())
    }

    /// Load the latest per-country snapshot.
    pub(crate) fn load_country_latest(&self, csv_data: &str) -> Result<()> {
        const TABLE: &str = "country_latest";
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| unreadable(TABLE, e))?.clone();
        let idx = HeaderIndex::new(TABLE, &headers, &COUNTRY_LATEST_REQUIRED)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO country_latest
                 (country, who_region, confirmed, deaths, recovered, active,
                  deaths_per_100_cases, recovered_per_100_cases, deaths_per_100_recovered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for result in rdr.records() {
                let r = result.map_err(|e| unreadable(TABLE, e))?;
                let country = idx.text(&r, COUNTRY);
                if country.is_empty() {
                    continue;
                }
                let who_region = idx.text(&r, WHO_REGION);
                let confirmed = idx.count(&r, CONFIRMED)?;
                let deaths = idx.count(&r, DEATHS)?;
                let recovered = idx.count(&r, RECOVERED)?;
                let active = idx.count(&r, ACTIVE)?;
                let dpc = idx
                    .rate(&r, DEATHS_PER_100_CASES)?
                    .unwrap_or_else(|| Rate::percent(deaths, confirmed));
                let rpc = idx
                    .rate(&r, RECOVERED_PER_100_CASES)?
                    .unwrap_or_else(|| Rate::percent(recovered, confirmed));
                let dpr = idx
                    .rate(&r, DEATHS_PER_100_RECOVERED)?
                    .unwrap_or_else(|| Rate::percent(deaths, recovered));

                stmt.execute(params![
                    country,
                    who_region,
                    confirmed,
                    deaths,
                    recovered,
                    active,
                    rate_cell(dpc),
                    rate_cell(rpc),
                    rate_cell(dpr),
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!("[CVD] loader: Loaded {} latest country rows", count);
        Ok(())
    }

    /// Load the demographic snapshot. Blank counts are stored as NULL.
    pub(crate) fn load_country_demographic(&self, csv_data: &str) -> Result<()> {
        const TABLE: &str = "country_demographic";
        let mut rdr = reader(csv_data);
        let headers = rdr.headers().map_err(|e| unreadable(TABLE, e))?.clone();
        let idx = HeaderIndex::new(TABLE, &headers, &COUNTRY_DEMOGRAPHIC_REQUIRED)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut count = 0u32;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO country_demographic
                 (country, who_region, population, total_cases, total_deaths, total_recovered)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for result in rdr.records() {
                let r = result.map_err(|e| unreadable(TABLE, e))?;
                let country = idx.text(&r, COUNTRY);
                if country.is_empty() {
                    continue;
                }
                stmt.execute(params![
                    country,
                    idx.text(&r, WHO_REGION),
                    idx.optional_count(&r, POPULATION)?,
                    idx.optional_count(&r, TOTAL_CASES)?,
                    idx.optional_count(&r, TOTAL_DEATHS)?,
                    idx.optional_count(&r, TOTAL_RECOVERED)?,
                ])?;
                count += 1;
            }
        }
        tx.commit()?;
        log::info!("[CVD] loader: Loaded {} demographic rows", count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::fixture_csv;
    use crate::{Database, DatasetCsv};
    use cvd_core::records::Rate;
    use cvd_core::CovidError;

    const DAILY: &str = "\
Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered
2020-07-27,1000,100,400,500,10,1,4
";
    const COUNTRY_DAILY: &str = "\
Date,Country/Region,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered,WHO Region
2020-07-27,Poland,1000,100,400,500,10,1,4,Europe
";
    const LATEST: &str = "\
Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region
Poland,1000,100,400,500,Europe
";
    const DEMOGRAPHIC: &str = "\
Country/Region,Continent,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region
Poland,Europe,37846605.0,1000,100,,Europe
";

    fn csv_with<'a>(f: impl FnOnce(&mut DatasetCsv<'a>)) -> DatasetCsv<'a> {
        let mut csv = DatasetCsv {
            daily_global: DAILY,
            country_daily: COUNTRY_DAILY,
            country_latest: LATEST,
            country_demographic: DEMOGRAPHIC,
        };
        f(&mut csv);
        csv
    }

    fn load_err(csv: &DatasetCsv<'_>) -> CovidError {
        match Database::from_csv(csv) {
            Err(e) => e,
            Ok(_) => panic!("expected the load to fail"),
        }
    }

    #[test]
    fn load_fixture_tables() {
        let db = Database::from_csv(&fixture_csv()).unwrap();
        assert_eq!(db.query_daily_global().unwrap().len(), 3);
        assert_eq!(db.query_country_daily(None).unwrap().len(), 36);
        assert_eq!(db.query_country_latest().unwrap().len(), 12);
        assert_eq!(db.query_country_demographic().unwrap().len(), 12);
    }

    #[test]
    fn missing_required_column_is_schema_mismatch() {
        let csv = csv_with(|c| {
            c.country_daily = "Date,Country/Region,Confirmed,Deaths,Recovered,Active\n2020-07-27,Poland,1,0,0,1\n"
        });
        match load_err(&csv) {
            CovidError::SchemaMismatch { table, column } => {
                assert_eq!(table, "country_daily");
                assert_eq!(column, "WHO Region");
            }
            other => panic!("expected SchemaMismatch, got {other}"),
        }
    }

    #[test]
    fn columns_are_located_by_name() {
        let csv = csv_with(|c| {
            c.country_latest = "Active,WHO Region,Recovered,Deaths,Confirmed,Country/Region\n500,Europe,400,100,1000,Poland\n"
        });
        let db = Database::from_csv(&csv).unwrap();
        let latest = db.query_country_latest().unwrap();
        assert_eq!(latest[0].country, "Poland");
        assert_eq!(latest[0].confirmed, 1000);
        assert_eq!(latest[0].active, 500);
    }

    #[test]
    fn dates_are_normalized() {
        let csv = csv_with(|c| {
            c.daily_global = "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n7/27/2020,1000,100,400,500,10,1,4\n";
            c.country_daily = "Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region\n07/27/20,Poland,1000,100,400,500,Europe\n";
        });
        let db = Database::from_csv(&csv).unwrap();
        assert_eq!(db.query_daily_global().unwrap()[0].date, "2020-07-27");
        assert_eq!(db.query_country_daily(None).unwrap()[0].date, "2020-07-27");
    }

    #[test]
    fn malformed_date_fails_the_load() {
        let csv = csv_with(|c| {
            c.daily_global = "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\nyesterday,1,0,0,1,0,0,0\n"
        });
        assert!(matches!(load_err(&csv), CovidError::MalformedValue { .. }));
    }

    #[test]
    fn missing_rate_columns_are_derived() {
        let db = Database::from_csv(&csv_with(|_| {})).unwrap();
        let day = &db.query_daily_global().unwrap()[0];
        assert_eq!(day.deaths_per_100_cases, Rate::Defined(10.0));
        assert_eq!(day.recovered_per_100_cases, Rate::Defined(40.0));
        assert_eq!(day.deaths_per_100_recovered, Rate::Defined(25.0));
    }

    #[test]
    fn infinite_rate_is_undefined() {
        let csv = csv_with(|c| {
            c.country_latest = "Country/Region,Confirmed,Deaths,Recovered,Active,Deaths / 100 Cases,Recovered / 100 Cases,Deaths / 100 Recovered\nPoland,1000,100,0,900,10.0,0.0,inf\n"
        });
        let db = Database::from_csv(&csv).unwrap();
        let latest = &db.query_country_latest().unwrap()[0];
        assert_eq!(latest.deaths_per_100_recovered, Rate::Undefined);
        assert_eq!(latest.deaths_per_100_cases, Rate::Defined(10.0));
    }

    #[test]
    fn out_of_order_daily_dates_are_reported() {
        let csv = csv_with(|c| {
            c.daily_global = "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n2020-07-26,2,0,0,2,1,0,0\n2020-07-25,1,0,0,1,0,0,0\n2020-07-26,3,0,0,3,1,0,0\n"
        });
        let db = Database::from_csv(&csv).unwrap();
        let days = db.query_daily_global().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].confirmed, 3, "Later duplicate replaces the earlier row");

        let report = db.quality_report().unwrap();
        assert_eq!(
            report.non_increasing_dates,
            vec![
                ("2020-07-26".to_string(), "2020-07-25".to_string()),
                ("2020-07-26".to_string(), "2020-07-26".to_string()),
            ]
        );
        assert!(report.date_gaps.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn demographic_blanks_and_float_counts() {
        let db = Database::from_csv(&csv_with(|_| {})).unwrap();
        let row = &db.query_country_demographic().unwrap()[0];
        assert_eq!(row.population, Some(37846605));
        assert_eq!(row.total_recovered, None);
    }

    #[test]
    fn duplicate_country_day_replaces_earlier_row() {
        let csv = csv_with(|c| {
            c.country_daily = "\
Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region
2020-07-27,Poland,900,90,300,510,Europe
2020-07-27,Poland,1000,100,400,500,Europe
"
        });
        let db = Database::from_csv(&csv).unwrap();
        let rows = db.query_country_daily(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].confirmed, 1000);
        assert_eq!(rows[0].new_cases, 0, "Missing New cases column defaults to 0");
    }
}

//! Typed query methods over the loaded tables.
//!
//! All queries return typed structs from [`cvd_core::records`] or
//! [`crate::models`] that serialize to JSON for chart descriptions.
//!
//! # Latest snapshot
//!
//! Several derived tables are computed over each country's *last*
//! `country_daily` row rather than over every date. Summing every date
//! would add cumulative counts together, so the snapshot is taken first
//! with a `MAX(date)` join and the grouping runs on top of it.

use crate::models::{
    CountryGlobalValue, DateRange, QualityReport, RegionCountryTotals, RegionTotals, StaleLatest,
};
use crate::Database;
use cvd_core::metric::CaseMetric;
use cvd_core::records::{CountryDaily, CountryDemographic, CountryLatest, DailyGlobal, Rate};
use cvd_core::region::is_canonical_region;
use cvd_core::Result;
use cvd_utils::dates::days_between;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const LATEST_SNAPSHOT: &str = "
    SELECT c.date, c.country, c.who_region, c.confirmed, c.deaths, c.recovered, c.active,
           c.new_cases, c.new_deaths, c.new_recovered
    FROM country_daily c
    INNER JOIN (SELECT country, MAX(date) AS last_date FROM country_daily GROUP BY country) m
        ON c.country = m.country AND c.date = m.last_date";

const DAILY_GLOBAL_COLUMNS: &str = "date, confirmed, deaths, recovered, active,
    new_cases, new_deaths, new_recovered,
    deaths_per_100_cases, recovered_per_100_cases, deaths_per_100_recovered";

const COUNTRY_DAILY_COLUMNS: &str = "date, country, who_region, confirmed, deaths, recovered, active,
    new_cases, new_deaths, new_recovered";

fn daily_global_row(row: &Row<'_>) -> rusqlite::Result<DailyGlobal> {
    Ok(DailyGlobal {
        date: row.get(0)?,
        confirmed: row.get(1)?,
        deaths: row.get(2)?,
        recovered: row.get(3)?,
        active: row.get(4)?,
        new_cases: row.get(5)?,
        new_deaths: row.get(6)?,
        new_recovered: row.get(7)?,
        deaths_per_100_cases: Rate::from(row.get::<_, Option<f64>>(8)?),
        recovered_per_100_cases: Rate::from(row.get::<_, Option<f64>>(9)?),
        deaths_per_100_recovered: Rate::from(row.get::<_, Option<f64>>(10)?),
    })
}

fn country_daily_row(row: &Row<'_>) -> rusqlite::Result<CountryDaily> {
    Ok(CountryDaily {
        date: row.get(0)?,
        country: row.get(1)?,
        who_region: row.get(2)?,
        confirmed: row.get(3)?,
        deaths: row.get(4)?,
        recovered: row.get(5)?,
        active: row.get(6)?,
        new_cases: row.get(7)?,
        new_deaths: row.get(8)?,
        new_recovered: row.get(9)?,
    })
}

fn country_latest_row(row: &Row<'_>) -> rusqlite::Result<CountryLatest> {
    Ok(CountryLatest {
        country: row.get(0)?,
        who_region: row.get(1)?,
        confirmed: row.get(2)?,
        deaths: row.get(3)?,
        recovered: row.get(4)?,
        active: row.get(5)?,
        deaths_per_100_cases: Rate::from(row.get::<_, Option<f64>>(6)?),
        recovered_per_100_cases: Rate::from(row.get::<_, Option<f64>>(7)?),
        deaths_per_100_recovered: Rate::from(row.get::<_, Option<f64>>(8)?),
    })
}

impl Database {
    // ───────────────────── Source tables ─────────────────────

    /// Every daily global row, ordered chronologically.
    pub fn query_daily_global(&self) -> Result<Vec<DailyGlobal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DAILY_GLOBAL_COLUMNS} FROM daily_global ORDER BY date"
        ))?;
        let rows = stmt
            .query_map([], daily_global_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_daily_global returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// The most recent daily global row, if the table is non-empty.
    pub fn query_latest_daily_global(&self) -> Result<Option<DailyGlobal>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {DAILY_GLOBAL_COLUMNS} FROM daily_global ORDER BY date DESC LIMIT 1"
                ),
                [],
                daily_global_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Per-country daily rows, ordered by date then country.
    ///
    /// With `Some(country)` only that country's rows are returned.
    pub fn query_country_daily(&self, country: Option<&str>) -> Result<Vec<CountryDaily>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COUNTRY_DAILY_COLUMNS} FROM country_daily
             WHERE ?1 IS NULL OR country = ?1
             ORDER BY date, country"
        ))?;
        let rows = stmt
            .query_map(params![country], country_daily_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_country_daily({:?}) returned {} records",
            country,
            rows.len()
        );
        Ok(rows)
    }

    /// Per-country daily rows restricted to `countries`, ordered by date then country.
    pub fn query_country_daily_for(&self, countries: &[String]) -> Result<Vec<CountryDaily>> {
        if countries.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (1..=countries.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COUNTRY_DAILY_COLUMNS} FROM country_daily
             WHERE country IN ({placeholders})
             ORDER BY date, country"
        ))?;
        let rows = stmt
            .query_map(params_from_iter(countries.iter()), country_daily_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_country_daily_for {} countries returned {} records",
            countries.len(),
            rows.len()
        );
        Ok(rows)
    }

    /// The latest per-country snapshot, ordered by country.
    pub fn query_country_latest(&self) -> Result<Vec<CountryLatest>> {
        let mut stmt = self.conn.prepare(
            "SELECT country, who_region, confirmed, deaths, recovered, active,
                    deaths_per_100_cases, recovered_per_100_cases, deaths_per_100_recovered
             FROM country_latest
             ORDER BY country",
        )?;
        let rows = stmt
            .query_map([], country_latest_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_country_latest returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// The demographic snapshot, ordered by country.
    pub fn query_country_demographic(&self) -> Result<Vec<CountryDemographic>> {
        let mut stmt = self.conn.prepare(
            "SELECT country, who_region, population, total_cases, total_deaths, total_recovered
             FROM country_demographic
             ORDER BY country",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CountryDemographic {
                    country: row.get(0)?,
                    who_region: row.get(1)?,
                    population: row.get(2)?,
                    total_cases: row.get(3)?,
                    total_deaths: row.get(4)?,
                    total_recovered: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_country_demographic returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    // ───────────────────── Derived tables ─────────────────────

    /// Each country's last daily row, ordered by country.
    pub fn query_latest_country_snapshot(&self) -> Result<Vec<CountryDaily>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LATEST_SNAPSHOT} ORDER BY c.country"))?;
        let rows = stmt
            .query_map([], country_daily_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_latest_country_snapshot returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Case totals per WHO region over the latest snapshot, ordered by region.
    pub fn query_region_totals(&self) -> Result<Vec<RegionTotals>> {
        let mut stmt = self.conn.prepare(&format!(
            "WITH latest AS ({LATEST_SNAPSHOT})
             SELECT who_region, SUM(confirmed), SUM(deaths), SUM(recovered), SUM(active)
             FROM latest
             GROUP BY who_region
             ORDER BY who_region"
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RegionTotals {
                    who_region: row.get(0)?,
                    confirmed: row.get(1)?,
                    deaths: row.get(2)?,
                    recovered: row.get(3)?,
                    active: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_region_totals returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Case totals per (region, country) over the latest snapshot, ordered by
    /// region then country. With `Some(region)` only that region is returned.
    pub fn query_region_country_totals(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<RegionCountryTotals>> {
        let mut stmt = self.conn.prepare(&format!(
            "WITH latest AS ({LATEST_SNAPSHOT})
             SELECT who_region, country, SUM(confirmed), SUM(deaths), SUM(recovered), SUM(active)
             FROM latest
             WHERE ?1 IS NULL OR who_region = ?1
             GROUP BY who_region, country
             ORDER BY who_region, country"
        ))?;
        let rows = stmt
            .query_map(params![region], |row| {
                Ok(RegionCountryTotals {
                    who_region: row.get(0)?,
                    country: row.get(1)?,
                    confirmed: row.get(2)?,
                    deaths: row.get(3)?,
                    recovered: row.get(4)?,
                    active: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_region_country_totals({:?}) returned {} records",
            region,
            rows.len()
        );
        Ok(rows)
    }

    /// Each country's `metric` next to the global total of the same date,
    /// ordered by date then country. With `Some(date)` only that date.
    ///
    /// Country rows whose date has no global row are dropped by the join.
    pub fn query_country_global_pairs(
        &self,
        metric: CaseMetric,
        date: Option<&str>,
    ) -> Result<Vec<CountryGlobalValue>> {
        let column = metric.column();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT c.date, c.country, c.{column}, g.{column}
             FROM country_daily c
             INNER JOIN daily_global g ON g.date = c.date
             WHERE ?1 IS NULL OR c.date = ?1
             ORDER BY c.date, c.country"
        ))?;
        let rows = stmt
            .query_map(params![date], |row| {
                Ok(CountryGlobalValue {
                    date: row.get(0)?,
                    country: row.get(1)?,
                    value: row.get(2)?,
                    global: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_country_global_pairs({:?}, {:?}) returned {} records",
            metric,
            date,
            rows.len()
        );
        Ok(rows)
    }

    /// The first `n` latest-snapshot rows by `metric` descending, ties broken
    /// by country name ascending.
    pub fn query_ranked_countries(&self, metric: CaseMetric, n: usize) -> Result<Vec<CountryLatest>> {
        let column = metric.column();
        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT country, who_region, confirmed, deaths, recovered, active,
                    deaths_per_100_cases, recovered_per_100_cases, deaths_per_100_recovered
             FROM country_latest
             ORDER BY {column} DESC, country ASC
             LIMIT ?1"
        ))?;
        let rows = stmt
            .query_map(params![limit], country_latest_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        log::info!(
            "[CVD] query: query_ranked_countries({:?}, {}) returned {} records",
            metric,
            n,
            rows.len()
        );
        Ok(rows)
    }

    /// First and last date of the daily global table.
    pub fn query_date_range(&self) -> Result<Option<DateRange>> {
        let range = self.conn.query_row(
            "SELECT MIN(date), MAX(date) FROM daily_global",
            [],
            |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?)),
        )?;
        Ok(match range {
            (Some(first), Some(last)) => Some(DateRange { first, last }),
            _ => None,
        })
    }

    // ───────────────────── Data quality ─────────────────────

    /// Run the post-load consistency checks.
    pub fn quality_report(&self) -> Result<QualityReport> {
        let mut report = QualityReport::default();

        let mut stmt = self
            .conn
            .prepare("SELECT date FROM daily_global ORDER BY date")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for pair in dates.windows(2) {
            if !matches!(days_between(&pair[0], &pair[1]), Ok(1)) {
                report.date_gaps.push((pair[0].clone(), pair[1].clone()));
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT previous, date FROM daily_global_out_of_order ORDER BY line",
        )?;
        report.non_increasing_dates = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(&format!(
            "WITH latest AS ({LATEST_SNAPSHOT})
             SELECT l.country, l.confirmed, s.confirmed
             FROM country_latest l
             LEFT JOIN latest s ON s.country = l.country
             WHERE s.country IS NULL
                OR s.confirmed != l.confirmed
                OR s.deaths != l.deaths
                OR s.recovered != l.recovered
                OR s.active != l.active
             ORDER BY l.country"
        ))?;
        report.stale_latest = stmt
            .query_map([], |row| {
                Ok(StaleLatest {
                    country: row.get(0)?,
                    latest_confirmed: row.get(1)?,
                    daily_confirmed: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT who_region, COUNT(*) FROM country_demographic
             GROUP BY who_region
             ORDER BY who_region",
        )?;
        report.noncanonical_regions = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter(|(region, _)| !is_canonical_region(region))
            .collect();

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::fixture_db;
    use crate::{Database, DatasetCsv};
    use cvd_core::metric::CaseMetric;

    const LATEST_DATE: &str = "2020-07-27";
    const LATEST_GLOBAL_CONFIRMED: i64 = 11386080;

    #[test]
    fn daily_global_is_chronological() {
        let db = fixture_db();
        let rows = db.query_daily_global().unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2020-07-25", "2020-07-26", "2020-07-27"]);
    }

    #[test]
    fn latest_daily_global() {
        let db = fixture_db();
        let latest = db.query_latest_daily_global().unwrap().unwrap();
        assert_eq!(latest.date, LATEST_DATE);
        assert_eq!(latest.confirmed, LATEST_GLOBAL_CONFIRMED);
    }

    #[test]
    fn country_daily_filter() {
        let db = fixture_db();
        let poland = db.query_country_daily(Some("Poland")).unwrap();
        assert_eq!(poland.len(), 3);
        assert!(poland.iter().all(|r| r.country == "Poland"));
        assert_eq!(poland[2].confirmed, 43400);

        assert!(db.query_country_daily(Some("Atlantis")).unwrap().is_empty());
    }

    #[test]
    fn country_daily_for_list() {
        let db = fixture_db();
        let names = vec!["US".to_string(), "China".to_string()];
        let rows = db.query_country_daily_for(&names).unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].country, "China");
        assert_eq!(rows[1].country, "US");
        assert!(db.query_country_daily_for(&[]).unwrap().is_empty());
    }

    #[test]
    fn latest_snapshot_takes_last_date_per_country() {
        let db = fixture_db();
        let snapshot = db.query_latest_country_snapshot().unwrap();
        assert_eq!(snapshot.len(), 12);
        assert!(snapshot.iter().all(|r| r.date == LATEST_DATE));
    }

    #[test]
    fn region_totals_sum_to_latest_global() {
        let db = fixture_db();
        let totals = db.query_region_totals().unwrap();
        assert_eq!(totals.len(), 6);
        let confirmed: i64 = totals.iter().map(|t| t.confirmed).sum();
        assert_eq!(confirmed, LATEST_GLOBAL_CONFIRMED);

        let europe = totals.iter().find(|t| t.who_region == "Europe").unwrap();
        assert_eq!(europe.confirmed, 816000 + 301700 + 43400);
    }

    #[test]
    fn region_country_totals_filter() {
        let db = fixture_db();
        let europe = db.query_region_country_totals(Some("Europe")).unwrap();
        let names: Vec<&str> = europe.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Poland", "Russia", "United Kingdom"]);
        assert_eq!(db.query_region_country_totals(None).unwrap().len(), 12);
    }

    #[test]
    fn country_global_pairs_join_on_date() {
        let db = fixture_db();
        let day = db
            .query_country_global_pairs(CaseMetric::Confirmed, Some(LATEST_DATE))
            .unwrap();
        assert_eq!(day.len(), 12);
        assert!(day.iter().all(|p| p.global == LATEST_GLOBAL_CONFIRMED));
        let all = db
            .query_country_global_pairs(CaseMetric::Deaths, None)
            .unwrap();
        assert_eq!(all.len(), 36);
        assert_eq!(all[0].date, "2020-07-25");
    }

    #[test]
    fn ranked_countries_desc_with_name_tiebreak() {
        let db = fixture_db();
        let top = db.query_ranked_countries(CaseMetric::Confirmed, 3).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["US", "Brazil", "India"]);
        assert!(db.query_ranked_countries(CaseMetric::Confirmed, 0).unwrap().is_empty());
        assert_eq!(db.query_ranked_countries(CaseMetric::Active, 100).unwrap().len(), 12);
    }

    #[test]
    fn ranked_countries_ties_sorted_by_name() {
        let db = Database::from_csv(&DatasetCsv {
            daily_global: "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n",
            country_daily: "Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region\n",
            country_latest: "Country/Region,Confirmed,Deaths,Recovered,Active\nZambia,10,0,0,10\nAngola,10,0,0,10\nChad,20,0,0,20\n",
            country_demographic: "Country/Region,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region\n",
        })
        .unwrap();
        let top = db.query_ranked_countries(CaseMetric::Confirmed, 3).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Chad", "Angola", "Zambia"]);
    }

    #[test]
    fn date_range() {
        let db = fixture_db();
        let range = db.query_date_range().unwrap().unwrap();
        assert_eq!(range.first, "2020-07-25");
        assert_eq!(range.last, LATEST_DATE);
    }

    #[test]
    fn fixture_quality_report() {
        let db = fixture_db();
        let report = db.quality_report().unwrap();
        assert!(report.date_gaps.is_empty());
        assert!(report.non_increasing_dates.is_empty());
        assert!(report.stale_latest.is_empty());
        let regions: Vec<&str> = report
            .noncanonical_regions
            .iter()
            .map(|(r, _)| r.as_str())
            .collect();
        assert_eq!(
            regions,
            vec!["EasternMediterranean", "South-EastAsia", "WesternPacific"]
        );
    }

    #[test]
    fn quality_report_finds_gaps_and_stale_rows() {
        let db = Database::from_csv(&DatasetCsv {
            daily_global: "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n2020-07-25,1,0,0,1,0,0,0\n2020-07-27,2,0,0,2,1,0,0\n",
            country_daily: "Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region\n2020-07-27,Poland,2,0,0,2,Europe\n",
            country_latest: "Country/Region,Confirmed,Deaths,Recovered,Active\nPoland,5,0,0,5\nChad,1,0,0,1\n",
            country_demographic: "Country/Region,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region\n",
        })
        .unwrap();
        let report = db.quality_report().unwrap();
        assert_eq!(
            report.date_gaps,
            vec![("2020-07-25".to_string(), "2020-07-27".to_string())]
        );
        assert_eq!(report.stale_latest.len(), 2);
        assert_eq!(report.stale_latest[0].country, "Chad");
        assert_eq!(report.stale_latest[0].daily_confirmed, None);
        assert_eq!(report.stale_latest[1].daily_confirmed, Some(2));
        assert!(!report.is_clean());
    }
}

//! In-memory SQLite dataset for COVID-19 case data.
//!
//! The four source CSV files are parsed once, validated against their
//! declared columns and loaded into an in-memory SQLite database. After
//! construction the [`Database`] handle is read-only: there is no public
//! method that inserts, updates or reloads data. Refreshing the dataset
//! means constructing a new handle (in practice, restarting the process).
//!
//! # Architecture
//!
//! - `Rc<Connection>` handle, cheap to clone and pass by reference into
//!   every aggregation call
//! - CSV loading via the `csv` crate, columns located by header name
//! - Typed query methods returning serializable structs
//! - Derived totals (per-region sums, latest-per-country snapshots, joins
//!   against the global daily totals) computed on the fly with SQL
//!   `GROUP BY` / `JOIN` queries against the base tables
//!
//! # Usage
//!
//! ```rust
//! use cvd_db::{Database, DatasetCsv};
//!
//! let db = Database::from_csv(&DatasetCsv {
//!     daily_global: "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n2020-07-27,100,5,40,55,10,1,4\n",
//!     country_daily: "Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region\n2020-07-27,Poland,100,5,40,55,Europe\n",
//!     country_latest: "Country/Region,Confirmed,Deaths,Recovered,Active\nPoland,100,5,40,55\n",
//!     country_demographic: "Country/Region,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region\nPoland,37846605,100,5,40,Europe\n",
//! })
//! .unwrap();
//!
//! let totals = db.query_region_totals().unwrap();
//! assert_eq!(totals[0].who_region, "Europe");
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `daily_global` - worldwide totals per day
//! - `country_daily` - per-country totals per day
//! - `country_latest` - most recent per-country snapshot
//! - `country_demographic` - population snapshot

pub mod schema;
mod loader;
mod queries;
pub mod models;

use cvd_core::{CovidError, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Canonical file names of the four source tables inside a data directory.
pub const DAILY_GLOBAL_FILE: &str = "day_wise.csv";
pub const COUNTRY_DAILY_FILE: &str = "full_grouped.csv";
pub const COUNTRY_LATEST_FILE: &str = "country_wise_latest.csv";
pub const COUNTRY_DEMOGRAPHIC_FILE: &str = "worldometer_data.csv";

/// Locations of the four source files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetConfig {
    pub daily_global: PathBuf,
    pub country_daily: PathBuf,
    pub country_latest: PathBuf,
    pub country_demographic: PathBuf,
}

impl DatasetConfig {
    /// All four files under `dir`, using the canonical file names.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            daily_global: dir.join(DAILY_GLOBAL_FILE),
            country_daily: dir.join(COUNTRY_DAILY_FILE),
            country_latest: dir.join(COUNTRY_LATEST_FILE),
            country_demographic: dir.join(COUNTRY_DEMOGRAPHIC_FILE),
        }
    }

    /// Read the four locations from a JSON file with one field per table.
    ///
    /// Relative paths are taken relative to the directory of `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_source(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| CovidError::DataUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            daily_global: base.join(config.daily_global),
            country_daily: base.join(config.country_daily),
            country_latest: base.join(config.country_latest),
            country_demographic: base.join(config.country_demographic),
        })
    }
}

/// The raw CSV text of the four source tables.
#[derive(Debug, Clone, Copy)]
pub struct DatasetCsv<'a> {
    pub daily_global: &'a str,
    pub country_daily: &'a str,
    pub country_latest: &'a str,
    pub country_demographic: &'a str,
}

/// Read-only, in-memory dataset handle.
///
/// Cloning is cheap (via `Rc`) and every clone sees the same data.
#[derive(Clone)]
pub struct Database {
    conn: Rc<Connection>,
}

impl Database {
    /// Read the four files named by `config` and load them.
    ///
    /// Fails with `DataUnavailable` if a file is missing or unreadable and
    /// with `SchemaMismatch` if a required column is absent.
    pub fn open(config: &DatasetConfig) -> Result<Self> {
        let daily_global = read_source(&config.daily_global)?;
        let country_daily = read_source(&config.country_daily)?;
        let country_latest = read_source(&config.country_latest)?;
        let country_demographic = read_source(&config.country_demographic)?;
        Self::from_csv(&DatasetCsv {
            daily_global: &daily_global,
            country_daily: &country_daily,
            country_latest: &country_latest,
            country_demographic: &country_demographic,
        })
    }

    /// Load the four tables from CSV text.
    pub fn from_csv(csv: &DatasetCsv<'_>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        let db = Self {
            conn: Rc::new(conn),
        };
        db.load_daily_global(csv.daily_global)?;
        db.load_country_daily(csv.country_daily)?;
        db.load_country_latest(csv.country_latest)?;
        db.load_country_demographic(csv.country_demographic)?;
        db.quality_report()?.log_warnings();
        Ok(db)
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CovidError::DataUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const DAILY_GLOBAL_CSV: &str = include_str!("../../fixtures/day_wise.csv");
    pub const COUNTRY_DAILY_CSV: &str = include_str!("../../fixtures/full_grouped.csv");
    pub const COUNTRY_LATEST_CSV: &str = include_str!("../../fixtures/country_wise_latest.csv");
    pub const COUNTRY_DEMOGRAPHIC_CSV: &str = include_str!("../../fixtures/worldometer_data.csv");

    pub fn fixture_csv() -> DatasetCsv<'static> {
        DatasetCsv {
            daily_global: DAILY_GLOBAL_CSV,
            country_daily: COUNTRY_DAILY_CSV,
            country_latest: COUNTRY_LATEST_CSV,
            country_demographic: COUNTRY_DEMOGRAPHIC_CSV,
        }
    }

    pub fn fixture_db() -> Database {
        Database::from_csv(&fixture_csv()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn database_loads_fixtures() {
        let db = Database::from_csv(&fixture_csv());
        assert!(db.is_ok(), "Fixture dataset should load without errors");
    }

    #[test]
    fn database_is_cloneable() {
        let db = fixture_db();
        let db2 = db.clone();
        assert_eq!(
            db.query_country_latest().unwrap(),
            db2.query_country_latest().unwrap(),
            "Clone should see same data via shared Rc"
        );
    }

    #[test]
    fn open_missing_file_is_data_unavailable() {
        let config = DatasetConfig::from_dir("/definitely/not/a/data/dir");
        match Database::open(&config) {
            Err(CovidError::DataUnavailable { path, .. }) => {
                assert!(path.ends_with(DAILY_GLOBAL_FILE));
            }
            Err(other) => panic!("expected DataUnavailable, got {other}"),
            Ok(_) => panic!("expected DataUnavailable, got a database"),
        }
    }

    #[test]
    fn open_reads_fixture_directory() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures");
        let db = Database::open(&DatasetConfig::from_dir(dir)).unwrap();
        assert_eq!(db.query_daily_global().unwrap().len(), 3);
    }

    #[test]
    fn config_reads_json_relative_to_its_directory() {
        let dir = std::env::temp_dir().join(format!("cvd-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dataset.json");
        std::fs::write(
            &path,
            r#"{
                "daily_global": "day_wise.csv",
                "country_daily": "/srv/covid/full_grouped.csv",
                "country_latest": "latest/country_wise_latest.csv",
                "country_demographic": "worldometer_data.csv"
            }"#,
        )
        .unwrap();

        let config = DatasetConfig::from_json_file(&path).unwrap();
        assert_eq!(config.daily_global, dir.join("day_wise.csv"));
        assert_eq!(config.country_daily, Path::new("/srv/covid/full_grouped.csv"));
        assert_eq!(config.country_latest, dir.join("latest/country_wise_latest.csv"));

        std::fs::write(&path, r#"{"daily_global": "day_wise.csv"}"#).unwrap();
        match DatasetConfig::from_json_file(&path) {
            Err(CovidError::DataUnavailable { reason, .. }) => {
                assert!(reason.contains("country_daily"), "{reason}");
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn config_uses_canonical_file_names() {
        let config = DatasetConfig::from_dir("data");
        assert_eq!(config.daily_global, Path::new("data/day_wise.csv"));
        assert_eq!(config.country_daily, Path::new("data/full_grouped.csv"));
        assert_eq!(config.country_latest, Path::new("data/country_wise_latest.csv"));
        assert_eq!(
            config.country_demographic,
            Path::new("data/worldometer_data.csv")
        );
    }
}

//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is created.

/// Returns the full SQL schema as a single batch string.
///
/// - `daily_global` - worldwide totals, one row per date
/// - `country_daily` - per-country totals keyed by (date, country)
/// - `country_latest` - most recent snapshot, one row per country
/// - `country_demographic` - population snapshot, one row per country
/// - `daily_global_out_of_order` - daily global rows whose date did not
///   move past every earlier date in the file, in file order
///
/// Rate columns are nullable: `NULL` is an undefined rate.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS daily_global (
        date TEXT PRIMARY KEY,
        confirmed INTEGER NOT NULL,
        deaths INTEGER NOT NULL,
        recovered INTEGER NOT NULL,
        active INTEGER NOT NULL,
        new_cases INTEGER NOT NULL,
        new_deaths INTEGER NOT NULL,
        new_recovered INTEGER NOT NULL,
        deaths_per_100_cases REAL,
        recovered_per_100_cases REAL,
        deaths_per_100_recovered REAL
    );

    CREATE TABLE IF NOT EXISTS country_daily (
        date TEXT NOT NULL,
        country TEXT NOT NULL,
        who_region TEXT NOT NULL,
        confirmed INTEGER NOT NULL,
        deaths INTEGER NOT NULL,
        recovered INTEGER NOT NULL,
        active INTEGER NOT NULL,
        new_cases INTEGER NOT NULL,
        new_deaths INTEGER NOT NULL,
        new_recovered INTEGER NOT NULL,
        PRIMARY KEY (date, country)
    );
    CREATE INDEX IF NOT EXISTS idx_country_daily_country ON country_daily(country);
    CREATE INDEX IF NOT EXISTS idx_country_daily_region ON country_daily(who_region);

    CREATE TABLE IF NOT EXISTS country_latest (
        country TEXT PRIMARY KEY,
        who_region TEXT NOT NULL,
        confirmed INTEGER NOT NULL,
        deaths INTEGER NOT NULL,
        recovered INTEGER NOT NULL,
        active INTEGER NOT NULL,
        deaths_per_100_cases REAL,
        recovered_per_100_cases REAL,
        deaths_per_100_recovered REAL
    );

    CREATE TABLE IF NOT EXISTS country_demographic (
        country TEXT PRIMARY KEY,
        who_region TEXT NOT NULL,
        population INTEGER,
        total_cases INTEGER,
        total_deaths INTEGER,
        total_recovered INTEGER
    );

    CREATE TABLE IF NOT EXISTS daily_global_out_of_order (
        line INTEGER PRIMARY KEY,
        previous TEXT NOT NULL,
        date TEXT NOT NULL
    );
    "#
}

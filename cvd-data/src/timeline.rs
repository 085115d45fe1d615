//! Per-country time series and the latest-per-country snapshot.

use cvd_core::records::CountryDaily;
use cvd_core::Result;
use cvd_db::Database;

/// Each country's last daily row, ordered by country.
pub fn latest_country_snapshot(db: &Database) -> Result<Vec<CountryDaily>> {
    db.query_latest_country_snapshot()
}

/// One country's daily rows in date order.
///
/// With `skip_before_first_case` the rows before the first day with a
/// positive confirmed count are dropped. An unknown country yields no rows.
pub fn country_timeline(
    db: &Database,
    country: &str,
    skip_before_first_case: bool,
) -> Result<Vec<CountryDaily>> {
    let mut rows = db.query_country_daily(Some(country))?;
    if skip_before_first_case {
        let first = rows
            .iter()
            .position(|r| r.confirmed > 0)
            .unwrap_or(rows.len());
        rows.drain(..first);
    }
    Ok(rows)
}

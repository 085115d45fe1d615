//! Each country's share of the global total.

use crate::region::COUNTRY_COLUMN;
use crate::table::{Cell, Table};
use cvd_core::metric::{CaseMetric, Choice};
use cvd_core::Result;
use cvd_db::Database;
use cvd_utils::rounding::scaled_half_up;
use serde::Serialize;

pub const DATE_COLUMN: &str = "Date";

/// One country's percentage of the global `metric` total on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldShare {
    pub date: String,
    pub country: String,
    pub percent: f64,
}

/// Column name of the share for `metric`, e.g. `% Confirmed`.
pub fn share_column(metric: CaseMetric) -> String {
    format!("% {}", metric.label())
}

/// Percentage of the same-date global `metric` total held by each country.
///
/// The ratio is rounded half-up to three decimals and then expressed in
/// percent, so the result carries one decimal (`0.12345 -> 12.3`). Dates
/// whose global total is zero are skipped. With `Some(date)` only that
/// date is computed. Rows are ordered by date then country.
pub fn world_share_percent(
    db: &Database,
    metric: CaseMetric,
    date: Option<&str>,
) -> Result<Vec<WorldShare>> {
    let pairs = db.query_country_global_pairs(metric, date)?;
    let total = pairs.len();
    let shares: Vec<WorldShare> = pairs
        .into_iter()
        .filter_map(|p| {
            let thousandths = scaled_half_up(p.value, p.global, 3)?;
            Some(WorldShare {
                date: p.date,
                country: p.country,
                percent: thousandths as f64 / 10.0,
            })
        })
        .collect();
    if shares.len() < total {
        log::info!(
            "[CVD] query: world_share_percent skipped {} rows with a zero global {}",
            total - shares.len(),
            metric.label()
        );
    }
    Ok(shares)
}

/// `Date, Country/Region, % <metric>` table of the shares.
pub fn world_share_table(metric: CaseMetric, shares: &[WorldShare]) -> Result<Table> {
    let mut table = Table::new([
        DATE_COLUMN.to_string(),
        COUNTRY_COLUMN.to_string(),
        share_column(metric),
    ]);
    for share in shares {
        table.push_row(vec![
            Cell::from(share.date.as_str()),
            Cell::from(share.country.as_str()),
            Cell::Float(share.percent),
        ])?;
    }
    Ok(table)
}

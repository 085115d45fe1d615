//! Tabular summaries printed as CSV.

use cvd_core::metric::{CaseMetric, Choice};
use cvd_data::frames::country_latest_table;
use cvd_data::region::region_summary_table;
use cvd_data::{region_summary, top_n, Cell, Table};
use cvd_db::Database;
use log::info;
use std::io::Write;

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Int(v) => v.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Undefined => String::new(),
    }
}

/// Write `table` as CSV with a header row. Undefined cells are empty.
pub fn write_table<W: Write>(table: &Table, out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(cell_text))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Print the per-region totals with fatality and recovery rates.
pub fn run_summary<W: Write>(db: &Database, out: W) -> anyhow::Result<()> {
    let rows = region_summary(db)?;
    info!("Summarizing {} WHO regions", rows.len());
    write_table(&region_summary_table(&rows)?, out)
}

/// Print the `n` countries with the highest latest `metric`.
pub fn run_top<W: Write>(db: &Database, n: usize, metric: &str, out: W) -> anyhow::Result<()> {
    let metric = CaseMetric::from_label(metric).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown metric {:?}, expected one of {:?}",
            metric,
            CaseMetric::labels()
        )
    })?;
    let top = top_n(db, n, metric)?;
    write_table(&country_latest_table(&top.ranked)?, out)
}

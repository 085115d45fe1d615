//! Writing dashboard views and the daily report as chart JSON.

use cvd_chart_ui::chart::{ChartKind, ChartSpec};
use cvd_chart_ui::{ChartSink, JsonFileSink, Palette, View, ViewBinder};
use cvd_core::metric::{Choice, DailyColumn};
use cvd_data::frames::daily_global_table;
use cvd_data::share::DATE_COLUMN;
use cvd_db::Database;
use log::{info, warn};
use std::path::Path;

/// Parse an `input=value` selection. The value may itself contain `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (input, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected input=value, got {s:?}"))?;
    if input.is_empty() {
        return Err(format!("missing input id in {s:?}"));
    }
    Ok((input.to_string(), value.to_string()))
}

/// Render `view`, apply each selection in order and write every chart.
///
/// A rejected selection is reported and skipped; the remaining ones are
/// still applied.
pub fn render_view<S: ChartSink>(
    db: &Database,
    palette: &Palette,
    view: View,
    selections: &[(String, String)],
    sink: &mut S,
) -> anyhow::Result<usize> {
    let mut binder = ViewBinder::new(db, palette, view);
    binder.initial_render();
    for (input, value) in selections {
        match binder.select(input, Some(value.as_str())) {
            Ok(updated) => info!("{}={} updated {} charts", input, value, updated.len()),
            Err(e) => warn!("Skipping selection {}={}: {}", input, value, e),
        }
    }
    Ok(sink.render_all(binder.charts())?)
}

pub fn run_render(
    db: &Database,
    view: &str,
    out_dir: &Path,
    selections: &[(String, String)],
) -> anyhow::Result<()> {
    let view = View::from_name(view)
        .ok_or_else(|| anyhow::anyhow!("Unknown view {:?}, expected world, who or others", view))?;
    let palette = Palette::default();
    let mut sink = JsonFileSink::new(out_dir)?;
    let written = render_view(db, &palette, view, selections, &mut sink)?;
    info!(
        "Rendered {} charts for {} into {}",
        written,
        view.title(),
        out_dir.display()
    );
    Ok(())
}

/// `Deaths / 100 Cases` -> `deaths_100_cases`.
fn slug(label: &str) -> String {
    label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// One global line chart per daily column.
pub fn report_charts(db: &Database, palette: &Palette) -> anyhow::Result<Vec<ChartSpec>> {
    let rows = db.query_daily_global()?;
    DailyColumn::ALL
        .iter()
        .map(|column| -> anyhow::Result<ChartSpec> {
            let label = column.label();
            let data = daily_global_table(&rows, &[*column])?;
            Ok(
                ChartSpec::new(&format!("report_{}", slug(label)), ChartKind::Line, data)
                    .title(label)
                    .x(DATE_COLUMN)
                    .y(&[label])
                    .color_sequence(palette.case_sequence(label)),
            )
        })
        .collect()
}

pub fn run_report(db: &Database, out_dir: &Path) -> anyhow::Result<()> {
    let charts = report_charts(db, &Palette::default())?;
    let mut sink = JsonFileSink::new(out_dir)?;
    let written = sink.render_all(&charts)?;
    info!("Wrote {} report charts into {}", written, out_dir.display());
    Ok(())
}

//! World view: global totals over time and per-country maps.

use super::{Binding, StaticChart, View, ViewDef};
use crate::chart::{ChartKind, ChartSpec};
use crate::palette::Palette;
use crate::selectors::{self, USER_CHOICE_WORLD};
use crate::state::Selection;
use cvd_core::metric::{CaseMetric, Choice, DailyColumn};
use cvd_core::Result;
use cvd_data::frames::{country_daily_table, daily_global_table};
use cvd_data::region::{COUNTRY_COLUMN, WHO_REGION_COLUMN};
use cvd_data::share::{share_column, world_share_table, DATE_COLUMN};
use cvd_data::world_share_percent;
use cvd_db::Database;

const TREEMAP_CASES: [DailyColumn; 3] = [DailyColumn::Active, DailyColumn::Deaths, DailyColumn::Recovered];
const AREA_CASES: [DailyColumn; 3] = [DailyColumn::Recovered, DailyColumn::Active, DailyColumn::Deaths];

pub(super) fn definition() -> ViewDef {
    ViewDef {
        view: View::World,
        selectors: vec![selectors::user_choice_world()],
        statics: vec![
            StaticChart {
                output: "fig1_1",
                render: latest_cases_treemap,
            },
            StaticChart {
                output: "fig1_2",
                render: cases_area,
            },
            StaticChart {
                output: "fig1_3",
                render: spread_map,
            },
        ],
        bindings: vec![
            Binding {
                output: "fig1_4",
                inputs: &[USER_CHOICE_WORLD],
                render: cases_choropleth,
            },
            Binding {
                output: "fig1_5",
                inputs: &[USER_CHOICE_WORLD],
                render: global_line,
            },
            Binding {
                output: "fig1_6",
                inputs: &[USER_CHOICE_WORLD],
                render: share_of_world_bar,
            },
        ],
    }
}

/// Latest global Active / Deaths / Recovered as one treemap tile each.
fn latest_cases_treemap(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let latest: Vec<_> = db.query_latest_daily_global()?.into_iter().collect();
    let labels: Vec<&str> = TREEMAP_CASES.iter().map(|c| c.label()).collect();
    let data = daily_global_table(&latest, &TREEMAP_CASES)?.reshape_wide_to_long(
        &[],
        &labels,
        "variable",
        "value",
    )?;
    Ok(ChartSpec::new("fig1_1", ChartKind::Treemap, data)
        .path(&["variable"])
        .values("value")
        .color_sequence(palette.qualitative().to_vec()))
}

fn cases_area(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let rows = db.query_daily_global()?;
    let data = daily_global_table(&rows, &AREA_CASES)?;
    let labels: Vec<&str> = AREA_CASES.iter().map(|c| c.label()).collect();
    Ok(ChartSpec::new("fig1_2", ChartKind::Area, data)
        .x(DATE_COLUMN)
        .y(&labels)
        .color_sequence(palette.qualitative().to_vec()))
}

/// Confirmed cases per country as animated bubbles, colored by region.
fn spread_map(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let data = country_daily_table(&db.query_country_daily(None)?)?;
    Ok(ChartSpec::new("fig1_3", ChartKind::ScatterGeo, data)
        .locations(COUNTRY_COLUMN)
        .color(WHO_REGION_COLUMN)
        .size(CaseMetric::Confirmed.label())
        .animation_frame(DATE_COLUMN)
        .hover_name(COUNTRY_COLUMN)
        .color_sequence(palette.qualitative().to_vec()))
}

fn cases_choropleth(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: CaseMetric = selection.choice(USER_CHOICE_WORLD)?;
    let data = country_daily_table(&db.query_country_daily(None)?)?;
    Ok(ChartSpec::new("fig1_4", ChartKind::Choropleth, data)
        .title("Cases over time by country")
        .locations(COUNTRY_COLUMN)
        .color(metric.label())
        .animation_frame(DATE_COLUMN)
        .hover_name(COUNTRY_COLUMN)
        .color_scale(palette.continuous_scale(metric)))
}

fn global_line(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: CaseMetric = selection.choice(USER_CHOICE_WORLD)?;
    let column = match metric {
        CaseMetric::Confirmed => DailyColumn::Confirmed,
        CaseMetric::Recovered => DailyColumn::Recovered,
        CaseMetric::Deaths => DailyColumn::Deaths,
        CaseMetric::Active => DailyColumn::Active,
    };
    let data = daily_global_table(&db.query_daily_global()?, &[column])?;
    Ok(ChartSpec::new("fig1_5", ChartKind::Line, data)
        .title("Cases over time")
        .x(DATE_COLUMN)
        .y(&[metric.label()])
        .color_sequence(palette.case_sequence(metric.label())))
}

/// Each country's share of the global total per date, stacked to 100%.
fn share_of_world_bar(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: CaseMetric = selection.choice(USER_CHOICE_WORLD)?;
    let shares = world_share_percent(db, metric, None)?;
    let data = world_share_table(metric, &shares)?;
    Ok(ChartSpec::new("fig1_6", ChartKind::Bar, data)
        .title("% Cases over time by country")
        .x(DATE_COLUMN)
        .y(&[share_column(metric)])
        .color(COUNTRY_COLUMN)
        .y_range(0.0, 100.0)
        .color_scale(palette.continuous_scale(metric)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_db;
    use cvd_data::Cell;

    #[test]
    fn treemap_melts_latest_row() {
        let db = sample_db();
        let chart = latest_cases_treemap(&db, &Palette::default()).unwrap();
        assert_eq!(chart.data.columns(), &["variable", "value"]);
        assert_eq!(chart.data.len(), 3);
        assert_eq!(chart.data.get(0, "variable"), Some(&Cell::from("Active")));
        assert_eq!(chart.data.get(0, "value"), Some(&Cell::Int(4654010)));
        assert_eq!(chart.data.get(1, "value"), Some(&Cell::Int(429830)));
        assert_eq!(chart.data.get(2, "value"), Some(&Cell::Int(6302240)));
    }

    #[test]
    fn bound_charts_follow_the_metric() {
        let db = sample_db();
        let palette = Palette::default();
        let selection = Selection::new().with(USER_CHOICE_WORLD, "Recovered");

        let line = global_line(&db, &palette, &selection).unwrap();
        assert_eq!(line.encoding.y, vec!["Recovered".to_string()]);
        assert_eq!(line.color_sequence, vec!["rgb(27,158,119)".to_string()]);

        let map = cases_choropleth(&db, &palette, &selection).unwrap();
        assert_eq!(map.color_scale.as_deref(), Some("algae"));
        assert_eq!(map.data.len(), 36);

        let bar = share_of_world_bar(&db, &palette, &selection).unwrap();
        assert_eq!(bar.encoding.y, vec!["% Recovered".to_string()]);
        assert_eq!(bar.y_axis.range, Some((0.0, 100.0)));
        assert_eq!(bar.data.len(), 36);
    }
}

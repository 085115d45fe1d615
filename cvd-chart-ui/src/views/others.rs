//! Top countries, the European distribution and the Polish timeline.

use super::{Binding, StaticChart, View, ViewDef};
use crate::chart::{ChartKind, ChartSpec, Marginal};
use crate::palette::Palette;
use crate::selectors::{self, USER_CHOICE_EUROPE, USER_CHOICE_POLAND, USER_CHOICE_TOP};
use crate::state::Selection;
use cvd_core::metric::{AxisScale, CaseMetric, Choice, NewCaseMetric};
use cvd_core::region::EUROPE;
use cvd_core::Result;
use cvd_data::frames::{country_daily_table, country_latest_table};
use cvd_data::region::{region_country_table, COUNTRY_COLUMN};
use cvd_data::share::DATE_COLUMN;
use cvd_data::{country_timeline, region_country_breakdown, top_n};
use cvd_db::Database;

const TOP_COUNTRIES: usize = 10;
const TOP_RANKED_BY: CaseMetric = CaseMetric::Confirmed;
const HISTOGRAM_BINS: u32 = 50;
const POLAND: &str = "Poland";

/// Government measures marked on the Polish timelines.
const POLAND_MEASURES: [(&str, &str); 7] = [
    ("2020-03-16", "School closures"),
    ("2020-03-20", "Epidemic State of Emergency"),
    ("2020-03-25", "Movement restrictions"),
    ("2020-04-20", "Defrosting of the Polish economy - Stage I"),
    ("2020-05-04", "Defrosting of the Polish economy - Stage II"),
    ("2020-05-18", "Defrosting of the Polish economy - Stage III"),
    ("2020-05-30", "Defrosting of the Polish economy - Stage IV"),
];

pub(super) fn definition() -> ViewDef {
    ViewDef {
        view: View::Others,
        selectors: vec![
            selectors::user_choice_top(),
            selectors::user_choice_europe(),
            selectors::user_choice_poland(),
        ],
        statics: vec![
            StaticChart {
                output: "fig3_2",
                render: top_scatter,
            },
            StaticChart {
                output: "fig3_3",
                render: top_scatter_3d,
            },
            StaticChart {
                output: "fig3_5",
                render: poland_cases_line,
            },
        ],
        bindings: vec![
            Binding {
                output: "fig3_1",
                inputs: &[USER_CHOICE_TOP],
                render: top_countries_line,
            },
            Binding {
                output: "fig3_4",
                inputs: &[USER_CHOICE_EUROPE],
                render: europe_histogram,
            },
            Binding {
                output: "fig3_6",
                inputs: &[USER_CHOICE_POLAND],
                render: poland_new_cases_bar,
            },
        ],
    }
}

fn with_poland_measures(chart: ChartSpec) -> ChartSpec {
    POLAND_MEASURES
        .iter()
        .fold(chart, |chart, (date, label)| chart.vline(date, label))
}

fn top_scatter(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let top = top_n(db, TOP_COUNTRIES, TOP_RANKED_BY)?;
    let data = country_latest_table(&top.ranked)?;
    Ok(ChartSpec::new("fig3_2", ChartKind::Scatter, data)
        .title(" 2D Plot of Confirmed, Deaths and Recovered Cases")
        .x(CaseMetric::Confirmed.label())
        .y(&[CaseMetric::Deaths.label()])
        .size(CaseMetric::Recovered.label())
        .color(COUNTRY_COLUMN)
        .color_map(palette.country_map().clone()))
}

fn top_scatter_3d(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let top = top_n(db, TOP_COUNTRIES, TOP_RANKED_BY)?;
    let data = country_latest_table(&top.ranked)?;
    Ok(ChartSpec::new("fig3_3", ChartKind::Scatter3d, data)
        .title("3D Plot of Confirmed, Deaths and Recovered Cases")
        .x(CaseMetric::Confirmed.label())
        .y(&[CaseMetric::Recovered.label()])
        .z(CaseMetric::Deaths.label())
        .x_scale(AxisScale::Log)
        .color(COUNTRY_COLUMN)
        .color_map(palette.country_map().clone()))
}

fn poland_cases_line(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let data = country_daily_table(&country_timeline(db, POLAND, true)?)?;
    let cases = [
        CaseMetric::Confirmed.label(),
        CaseMetric::Deaths.label(),
        CaseMetric::Recovered.label(),
        CaseMetric::Active.label(),
    ];
    let chart = ChartSpec::new("fig3_5", ChartKind::Line, data)
        .title("Basic Statistics of Covid 19 in Poland")
        .x(DATE_COLUMN)
        .y(&cases)
        .color_map(palette.case_map(&cases));
    Ok(with_poland_measures(chart))
}

/// Daily series of the ten countries with the most confirmed cases.
fn top_countries_line(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: CaseMetric = selection.choice(USER_CHOICE_TOP)?;
    let top = top_n(db, TOP_COUNTRIES, TOP_RANKED_BY)?;
    let data = country_daily_table(&top.daily)?;
    Ok(ChartSpec::new("fig3_1", ChartKind::Line, data)
        .x(DATE_COLUMN)
        .y(&[metric.label()])
        .color(COUNTRY_COLUMN)
        .color_map(palette.country_map().clone())
        .scale_toggle())
}

fn europe_histogram(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: CaseMetric = selection.choice(USER_CHOICE_EUROPE)?;
    let breakdown = region_country_breakdown(db, Some(EUROPE))?;
    let data = region_country_table(&breakdown.wide)?;
    Ok(ChartSpec::new("fig3_4", ChartKind::Histogram, data)
        .title(format!("{} cases distribution in Europe", metric.label()))
        .x(metric.label())
        .histogram(HISTOGRAM_BINS, Some(Marginal::Box))
        .color_sequence(palette.case_sequence(metric.label())))
}

fn poland_new_cases_bar(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let metric: NewCaseMetric = selection.choice(USER_CHOICE_POLAND)?;
    let data = country_daily_table(&country_timeline(db, POLAND, true)?)?;
    let chart = ChartSpec::new("fig3_6", ChartKind::Bar, data)
        .title(format!("{} in Poland over time", metric.label()))
        .x(DATE_COLUMN)
        .y(&[metric.label()])
        .color_sequence(palette.case_sequence(metric.label()));
    Ok(with_poland_measures(chart))
}

//! WHO-region view: regional totals, rates and the demographic scatter.

use super::{Binding, StaticChart, View, ViewDef};
use crate::chart::{ChartKind, ChartSpec};
use crate::palette::Palette;
use crate::selectors::{self, USER_CHOICE_WHO, VALUE_X, VALUE_Y, XAXIS_TYPE, YAXIS_TYPE};
use crate::state::Selection;
use cvd_core::metric::{AxisScale, CaseMetric, Choice, DemographicMetric, RegionColumn};
use cvd_core::Result;
use cvd_data::frames::demographic_table;
use cvd_data::region::{
    region_summary_table, BREAKDOWN_CASES, CASE_COLUMN, COUNTRY_COLUMN, COUNT_COLUMN,
    WHO_REGION_COLUMN,
};
use cvd_data::{region_country_breakdown, region_summary, sort_region_summary};
use cvd_db::Database;

pub(super) fn definition() -> ViewDef {
    ViewDef {
        view: View::WhoRegion,
        selectors: vec![
            selectors::value_x(),
            selectors::value_y(),
            selectors::xaxis_type(),
            selectors::yaxis_type(),
            selectors::user_choice_who(),
        ],
        statics: vec![
            StaticChart {
                output: "fig2_1",
                render: region_cases_bar,
            },
            StaticChart {
                output: "fig2_4",
                render: region_pies,
            },
            StaticChart {
                output: "fig2_5",
                render: region_country_sunburst,
            },
        ],
        bindings: vec![
            Binding {
                output: "fig2_2",
                inputs: &[VALUE_X, VALUE_Y, XAXIS_TYPE, YAXIS_TYPE],
                render: demographic_scatter,
            },
            Binding {
                output: "fig2_3",
                inputs: &[USER_CHOICE_WHO],
                render: ranked_region_bar,
            },
        ],
    }
}

/// Recovered, active and death counts stacked per region.
fn region_cases_bar(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let data = region_summary_table(&region_summary(db)?)?;
    let cases: Vec<&str> = BREAKDOWN_CASES.iter().map(|m| m.label()).collect();
    Ok(ChartSpec::new("fig2_1", ChartKind::Bar, data)
        .x(WHO_REGION_COLUMN)
        .y(&cases)
        .color_sequence(palette.qualitative().to_vec()))
}

/// One pie per case metric, sliced by region.
fn region_pies(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let data = region_summary_table(&region_summary(db)?)?.reshape_wide_to_long(
        &[WHO_REGION_COLUMN],
        &[
            CaseMetric::Confirmed.label(),
            CaseMetric::Recovered.label(),
            CaseMetric::Deaths.label(),
            CaseMetric::Active.label(),
        ],
        CASE_COLUMN,
        COUNT_COLUMN,
    )?;
    Ok(ChartSpec::new("fig2_4", ChartKind::Pie, data)
        .color(WHO_REGION_COLUMN)
        .values(COUNT_COLUMN)
        .facet(CASE_COLUMN)
        .color_map(palette.region_map().clone()))
}

fn region_country_sunburst(db: &Database, palette: &Palette) -> Result<ChartSpec> {
    let breakdown = region_country_breakdown(db, None)?;
    Ok(ChartSpec::new("fig2_5", ChartKind::Sunburst, breakdown.long)
        .title("Basic Statistics for WHO Region and country")
        .path(&[WHO_REGION_COLUMN, COUNTRY_COLUMN, CASE_COLUMN])
        .values(COUNT_COLUMN)
        .color_map(palette.region_map().clone()))
}

/// Two demographic measures against each other, one point per country.
///
/// The snapshot spells regions without spaces, so points are colored from
/// the compact region map.
fn demographic_scatter(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let x: DemographicMetric = selection.choice(VALUE_X)?;
    let y: DemographicMetric = selection.choice(VALUE_Y)?;
    let x_scale: AxisScale = selection.choice(XAXIS_TYPE)?;
    let y_scale: AxisScale = selection.choice(YAXIS_TYPE)?;
    let data = demographic_table(&db.query_country_demographic()?)?;
    Ok(ChartSpec::new("fig2_2", ChartKind::Scatter, data)
        .x(x.label())
        .y(&[y.label()])
        .color(WHO_REGION_COLUMN)
        .hover_name(COUNTRY_COLUMN)
        .x_scale(x_scale)
        .y_scale(y_scale)
        .color_map(palette.compact_region_map().clone()))
}

/// Regions ordered by the chosen column, smallest first.
fn ranked_region_bar(db: &Database, palette: &Palette, selection: &Selection) -> Result<ChartSpec> {
    let column: RegionColumn = selection.choice(USER_CHOICE_WHO)?;
    let mut rows = region_summary(db)?;
    sort_region_summary(&mut rows, column);
    let data = region_summary_table(&rows)?;
    Ok(ChartSpec::new("fig2_3", ChartKind::Bar, data)
        .x(WHO_REGION_COLUMN)
        .y(&[column.label()])
        .text(column.label())
        .color(WHO_REGION_COLUMN)
        .color_map(palette.region_map().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_db;
    use cvd_data::Cell;

    #[test]
    fn ranked_bar_sorts_ascending() {
        let db = sample_db();
        let selection = Selection::new().with(USER_CHOICE_WHO, "Confirmed");
        let chart = ranked_region_bar(&db, &Palette::default(), &selection).unwrap();
        let regions: Vec<&str> = chart
            .data
            .column(WHO_REGION_COLUMN)
            .unwrap()
            .into_iter()
            .filter_map(Cell::as_text)
            .collect();
        assert_eq!(
            regions,
            vec![
                "Western Pacific",
                "Eastern Mediterranean",
                "Africa",
                "Europe",
                "South-East Asia",
                "Americas",
            ]
        );
        assert_eq!(chart.encoding.text.as_deref(), Some("Confirmed"));
    }

    #[test]
    fn ranked_bar_by_rate() {
        let db = sample_db();
        let selection = Selection::new().with(USER_CHOICE_WHO, "Fatality Rate in %");
        let chart = ranked_region_bar(&db, &Palette::default(), &selection).unwrap();
        let rates: Vec<f64> = chart
            .data
            .column("Fatality Rate in %")
            .unwrap()
            .into_iter()
            .filter_map(Cell::as_f64)
            .collect();
        assert_eq!(rates.len(), 6);
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
        let europe = chart
            .data
            .rows()
            .iter()
            .position(|r| r[0].as_text() == Some("Europe"))
            .unwrap();
        assert_eq!(chart.data.get(europe, "Fatality Rate in %"), Some(&Cell::Float(5.24)));
    }

    #[test]
    fn scatter_uses_compact_region_colors() {
        let db = sample_db();
        let selection = Selection::new()
            .with(VALUE_X, "Population")
            .with(VALUE_Y, "TotalRecovered")
            .with(XAXIS_TYPE, "Log")
            .with(YAXIS_TYPE, "Log");
        let chart = demographic_scatter(&db, &Palette::default(), &selection).unwrap();
        assert_eq!(chart.data.len(), 12);
        assert_eq!(chart.encoding.x.as_deref(), Some("Population"));
        assert!(chart.color_map.contains_key("EasternMediterranean"));
        let uk = chart
            .data
            .rows()
            .iter()
            .position(|r| r[0].as_text() == Some("United Kingdom"))
            .unwrap();
        assert_eq!(chart.data.get(uk, "TotalRecovered"), Some(&Cell::Undefined));
    }

    #[test]
    fn pies_and_sunburst() {
        let db = sample_db();
        let palette = Palette::default();
        let pies = region_pies(&db, &palette).unwrap();
        assert_eq!(pies.data.len(), 24);
        assert_eq!(pies.encoding.facet.as_deref(), Some(CASE_COLUMN));

        let sunburst = region_country_sunburst(&db, &palette).unwrap();
        assert_eq!(sunburst.data.len(), 36);
        assert_eq!(
            sunburst.encoding.path,
            vec![WHO_REGION_COLUMN, COUNTRY_COLUMN, CASE_COLUMN]
        );
    }
}

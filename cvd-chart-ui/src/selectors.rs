//! User-facing selectors: an input id, its finite domain and a default.

use cvd_core::metric::{AxisScale, CaseMetric, Choice, DemographicMetric, NewCaseMetric, RegionColumn};
use cvd_core::{CovidError, Result};
use serde::Serialize;

pub const USER_CHOICE_WORLD: &str = "user_choice_world";
pub const VALUE_X: &str = "value_x";
pub const VALUE_Y: &str = "value_y";
pub const XAXIS_TYPE: &str = "xaxis_type";
pub const YAXIS_TYPE: &str = "yaxis_type";
pub const USER_CHOICE_WHO: &str = "user_choice_who";
pub const USER_CHOICE_TOP: &str = "user_choice_top";
pub const USER_CHOICE_EUROPE: &str = "user_choice_europe";
pub const USER_CHOICE_POLAND: &str = "user_choice_poland";

/// A dropdown or radio group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selector {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
    pub default: &'static str,
    /// Accepted spellings that resolve to an option.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<(&'static str, &'static str)>,
}

impl Selector {
    /// A selector offering `options` (display order kept) with `default` preselected.
    pub fn of<C: Choice>(id: &'static str, label: &'static str, options: &[C], default: C) -> Self {
        Self {
            id,
            label,
            options: options.iter().map(|c| c.label()).collect(),
            default: default.label(),
            aliases: C::aliases()
                .iter()
                .filter(|(_, c)| options.iter().any(|o| o.label() == c.label()))
                .map(|(alias, c)| (*alias, c.label()))
                .collect(),
        }
    }

    /// Check `value` against the domain and return the matching option.
    /// An alias resolves to the option it spells.
    ///
    /// A missing value or one outside the domain is `InvalidSelection`.
    pub fn validate(&self, value: Option<&str>) -> Result<&'static str> {
        value
            .and_then(|v| {
                self.options.iter().copied().find(|o| *o == v).or_else(|| {
                    self.aliases
                        .iter()
                        .find(|(alias, _)| *alias == v)
                        .map(|(_, option)| *option)
                })
            })
            .ok_or_else(|| CovidError::InvalidSelection {
                input: self.id.to_string(),
                value: value.map(str::to_string),
            })
    }
}

const WORLD_METRICS: [CaseMetric; 3] = [
    CaseMetric::Confirmed,
    CaseMetric::Recovered,
    CaseMetric::Deaths,
];

pub fn user_choice_world() -> Selector {
    Selector::of(USER_CHOICE_WORLD, "Cases", &WORLD_METRICS, CaseMetric::Confirmed)
}

pub fn value_x() -> Selector {
    Selector::of(
        VALUE_X,
        "X-axis",
        DemographicMetric::ALL,
        DemographicMetric::Population,
    )
}

pub fn value_y() -> Selector {
    Selector::of(
        VALUE_Y,
        "Y-axis",
        DemographicMetric::ALL,
        DemographicMetric::TotalCases,
    )
}

pub fn xaxis_type() -> Selector {
    Selector::of(XAXIS_TYPE, "X-axis scale", AxisScale::ALL, AxisScale::Log)
}

pub fn yaxis_type() -> Selector {
    Selector::of(YAXIS_TYPE, "Y-axis scale", AxisScale::ALL, AxisScale::Log)
}

pub fn user_choice_who() -> Selector {
    Selector::of(
        USER_CHOICE_WHO,
        "Region column",
        RegionColumn::ALL,
        RegionColumn::Metric(CaseMetric::Confirmed),
    )
}

pub fn user_choice_top() -> Selector {
    Selector::of(USER_CHOICE_TOP, "Cases", CaseMetric::ALL, CaseMetric::Confirmed)
}

pub fn user_choice_europe() -> Selector {
    Selector::of(USER_CHOICE_EUROPE, "Cases", CaseMetric::ALL, CaseMetric::Confirmed)
}

pub fn user_choice_poland() -> Selector {
    Selector::of(
        USER_CHOICE_POLAND,
        "New cases",
        NewCaseMetric::ALL,
        NewCaseMetric::NewCases,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_selector_excludes_active() {
        let s = user_choice_world();
        assert_eq!(s.options, vec!["Confirmed", "Recovered", "Deaths"]);
        assert_eq!(s.default, "Confirmed");
        assert!(s.validate(Some("Active")).is_err());
    }

    #[test]
    fn validate_returns_option() {
        let s = yaxis_type();
        assert_eq!(s.default, "Log");
        assert_eq!(s.validate(Some("Linear")).unwrap(), "Linear");
    }

    #[test]
    fn axis_radio_accepts_trailing_space_linear() {
        let s = xaxis_type();
        assert_eq!(s.options, vec!["Linear", "Log"]);
        assert_eq!(s.validate(Some("Linear ")).unwrap(), "Linear");
        assert!(s.validate(Some("Log ")).is_err());
        assert!(user_choice_world().aliases.is_empty());
    }

    #[test]
    fn missing_or_unknown_value_is_invalid() {
        let s = user_choice_poland();
        match s.validate(None) {
            Err(CovidError::InvalidSelection { input, value }) => {
                assert_eq!(input, USER_CHOICE_POLAND);
                assert_eq!(value, None);
            }
            other => panic!("expected InvalidSelection, got {other:?}"),
        }
        match s.validate(Some("new cases")) {
            Err(CovidError::InvalidSelection { value, .. }) => {
                assert_eq!(value.as_deref(), Some("new cases"));
            }
            other => panic!("expected InvalidSelection, got {other:?}"),
        }
    }

    #[test]
    fn who_selector_offers_rates() {
        let s = user_choice_who();
        assert_eq!(s.options.len(), 6);
        assert!(s.validate(Some("Recovery Rate in %")).is_ok());
    }
}

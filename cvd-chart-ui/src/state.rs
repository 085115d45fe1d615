//! Current selections and the reactive view binder.
//!
//! [`ViewBinder`] holds one view's selections and its most recently
//! rendered charts. Selecting a value recomputes only the bindings that
//! declare that input; every other chart is left as it was. A rejected
//! selection changes nothing.

use crate::chart::ChartSpec;
use crate::palette::Palette;
use crate::views::{View, ViewDef};
use cvd_core::metric::Choice;
use cvd_core::{CovidError, Result};
use cvd_db::Database;
use std::collections::BTreeMap;

/// Selected value per input id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    values: BTreeMap<String, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, input: &str, value: &str) -> Self {
        self.values.insert(input.to_string(), value.to_string());
        self
    }

    pub fn get(&self, input: &str) -> Option<&str> {
        self.values.get(input).map(String::as_str)
    }

    pub fn contains(&self, input: &str) -> bool {
        self.values.contains_key(input)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The typed value of `input`, or `InvalidSelection` when it is absent
    /// or not a label of `C`.
    pub fn choice<C: Choice>(&self, input: &str) -> Result<C> {
        let value = self.get(input);
        value
            .and_then(C::from_label)
            .ok_or_else(|| CovidError::InvalidSelection {
                input: input.to_string(),
                value: value.map(str::to_string),
            })
    }

    fn set(&mut self, input: &str, value: &str) {
        self.values.insert(input.to_string(), value.to_string());
    }
}

/// Binds one view's selectors to its chart render functions.
pub struct ViewBinder<'a> {
    db: &'a Database,
    palette: &'a Palette,
    def: ViewDef,
    selection: Selection,
    charts: BTreeMap<&'static str, ChartSpec>,
}

impl<'a> ViewBinder<'a> {
    /// A binder with every selector at its default value.
    pub fn new(db: &'a Database, palette: &'a Palette, view: View) -> Self {
        let def = view.definition();
        let selection = def
            .selectors
            .iter()
            .fold(Selection::new(), |s, sel| s.with(sel.id, sel.default));
        Self {
            db,
            palette,
            def,
            selection,
            charts: BTreeMap::new(),
        }
    }

    /// A binder starting from `selection`, which may leave inputs unset.
    ///
    /// Every given value must belong to one of the view's selectors.
    pub fn with_selection(
        db: &'a Database,
        palette: &'a Palette,
        view: View,
        selection: Selection,
    ) -> Result<Self> {
        let def = view.definition();
        for (input, value) in selection.iter() {
            def.selector(input)
                .ok_or_else(|| CovidError::InvalidSelection {
                    input: input.to_string(),
                    value: Some(value.to_string()),
                })?
                .validate(Some(value))?;
        }
        Ok(Self {
            db,
            palette,
            def,
            selection,
            charts: BTreeMap::new(),
        })
    }

    pub fn view(&self) -> View {
        self.def.view
    }

    pub fn definition(&self) -> &ViewDef {
        &self.def
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The last chart rendered for `output`, if any.
    pub fn chart(&self, output: &str) -> Option<&ChartSpec> {
        self.charts.get(output)
    }

    /// Every rendered chart, ordered by output id.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.charts.values()
    }

    /// Render every static chart and every binding whose inputs are all
    /// selected. A chart whose render fails is logged and left out.
    pub fn initial_render(&mut self) -> Vec<ChartSpec> {
        let mut rendered = Vec::new();
        for chart in &self.def.statics {
            match (chart.render)(self.db, self.palette) {
                Ok(spec) => {
                    self.charts.insert(chart.output, spec.clone());
                    rendered.push(spec);
                }
                Err(e) => log::error!("[CVD] binder: {} failed to render: {}", chart.output, e),
            }
        }
        for binding in &self.def.bindings {
            if !binding.inputs.iter().all(|i| self.selection.contains(i)) {
                log::debug!(
                    "[CVD] binder: {} waits for inputs {:?}",
                    binding.output,
                    binding.inputs
                );
                continue;
            }
            match (binding.render)(self.db, self.palette, &self.selection) {
                Ok(spec) => {
                    self.charts.insert(binding.output, spec.clone());
                    rendered.push(spec);
                }
                Err(e) => log::error!("[CVD] binder: {} failed to render: {}", binding.output, e),
            }
        }
        log::info!(
            "[CVD] binder: initial render of {:?} produced {} charts",
            self.def.view,
            rendered.len()
        );
        rendered
    }

    /// Select `value` for `input` and recompute the bindings that declare it.
    ///
    /// Returns the recomputed charts. A binding still missing one of its
    /// inputs is skipped. An unknown input, a missing value or a value
    /// outside the domain fails with `InvalidSelection` and leaves the
    /// selection and every chart unchanged. A binding whose render fails
    /// keeps its previous chart.
    pub fn select(&mut self, input: &str, value: Option<&str>) -> Result<Vec<ChartSpec>> {
        let selector = self
            .def
            .selector(input)
            .ok_or_else(|| CovidError::InvalidSelection {
                input: input.to_string(),
                value: value.map(str::to_string),
            })?;
        let value = selector.validate(value).inspect_err(|e| {
            log::warn!("[CVD] binder: rejected selection: {}", e);
        })?;
        self.selection.set(input, value);

        let mut updated = Vec::new();
        for binding in self.def.bindings.iter().filter(|b| b.inputs.iter().any(|i| *i == input)) {
            if !binding.inputs.iter().all(|i| self.selection.contains(i)) {
                log::debug!(
                    "[CVD] binder: {} waits for inputs {:?}",
                    binding.output,
                    binding.inputs
                );
                continue;
            }
            log::debug!("[CVD] binder: {}={} recomputes {}", input, value, binding.output);
            match (binding.render)(self.db, self.palette, &self.selection) {
                Ok(spec) => {
                    self.charts.insert(binding.output, spec.clone());
                    updated.push(spec);
                }
                Err(e) => log::error!(
                    "[CVD] binder: {} failed to render, keeping previous chart: {}",
                    binding.output,
                    e
                ),
            }
        }
        Ok(updated)
    }
}

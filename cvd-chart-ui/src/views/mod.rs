//! The three dashboard views and their chart wiring.
//!
//! A view is a list of selectors, a list of static charts (rendered once
//! from the dataset alone) and a list of bindings (rendered from the
//! dataset plus the selectors they declare).

mod others;
mod who;
mod world;

use crate::chart::ChartSpec;
use crate::palette::Palette;
use crate::selectors::Selector;
use crate::state::Selection;
use cvd_core::Result;
use cvd_db::Database;
use serde::Serialize;

pub type StaticRenderFn = fn(&Database, &Palette) -> Result<ChartSpec>;
pub type BoundRenderFn = fn(&Database, &Palette, &Selection) -> Result<ChartSpec>;

/// A chart that depends on no selector.
pub struct StaticChart {
    pub output: &'static str,
    pub render: StaticRenderFn,
}

/// A chart recomputed whenever one of `inputs` changes.
pub struct Binding {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    pub render: BoundRenderFn,
}

pub struct ViewDef {
    pub view: View,
    pub selectors: Vec<Selector>,
    pub statics: Vec<StaticChart>,
    pub bindings: Vec<Binding>,
}

impl ViewDef {
    pub fn selector(&self, id: &str) -> Option<&Selector> {
        self.selectors.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    World,
    #[serde(rename = "who")]
    WhoRegion,
    Others,
}

impl View {
    pub const ALL: [View; 3] = [View::World, View::WhoRegion, View::Others];

    pub fn path(&self) -> &'static str {
        match self {
            View::World => "/apps/world",
            View::WhoRegion => "/apps/who",
            View::Others => "/apps/others",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::World => "World",
            View::WhoRegion => "WHO Region",
            View::Others => "Others",
        }
    }

    /// Route a path to its view. Unknown paths show the world view.
    pub fn from_path(path: &str) -> View {
        View::ALL
            .into_iter()
            .find(|v| v.path() == path)
            .unwrap_or(View::World)
    }

    /// Parse a short view name (`world`, `who`, `others`).
    pub fn from_name(name: &str) -> Option<View> {
        match name {
            "world" => Some(View::World),
            "who" => Some(View::WhoRegion),
            "others" => Some(View::Others),
            _ => None,
        }
    }

    pub fn definition(&self) -> ViewDef {
        match self {
            View::World => world::definition(),
            View::WhoRegion => who::definition(),
            View::Others => others::definition(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn routing() {
        assert_eq!(View::from_path("/apps/who"), View::WhoRegion);
        assert_eq!(View::from_path("/apps/others"), View::Others);
        assert_eq!(View::from_path("/apps/world"), View::World);
        assert_eq!(View::from_path("/"), View::World);
        assert_eq!(View::from_path("/apps/nope"), View::World);
    }

    #[test]
    fn names() {
        assert_eq!(View::from_name("who"), Some(View::WhoRegion));
        assert_eq!(View::from_name("WHO"), None);
    }

    #[test]
    fn binding_inputs_are_declared_selectors() {
        for view in View::ALL {
            let def = view.definition();
            for binding in &def.bindings {
                for input in binding.inputs {
                    assert!(
                        def.selector(input).is_some(),
                        "{:?}: {} uses undeclared input {}",
                        view,
                        binding.output,
                        input
                    );
                }
            }
        }
    }

    #[test]
    fn output_ids_are_unique() {
        let mut seen = HashSet::new();
        for view in View::ALL {
            let def = view.definition();
            let outputs = def
                .statics
                .iter()
                .map(|s| s.output)
                .chain(def.bindings.iter().map(|b| b.output));
            for output in outputs {
                assert!(seen.insert(output), "duplicate output {output}");
            }
        }
    }
}

//! Chart descriptions, selectors and the reactive view binder for the
//! COVID-19 dashboards.
//!
//! This crate provides:
//! - `chart`: declarative [`ChartSpec`] descriptions handed to a renderer
//! - `palette`: the shared category → color [`Palette`]
//! - `selectors`: every input id with its domain and default
//! - `state`: the current [`Selection`] and the [`ViewBinder`]
//! - `views`: the World, WHO Region and Others views
//! - `render`: [`ChartSink`] implementations

pub mod chart;
pub mod palette;
pub mod render;
pub mod selectors;
pub mod state;
pub mod views;

pub use chart::{ChartKind, ChartSpec};
pub use palette::Palette;
pub use render::{ChartSink, JsonFileSink, MemorySink};
pub use selectors::Selector;
pub use state::{Selection, ViewBinder};
pub use views::View;

//! Aggregation engine for COVID-19 chart data.
//!
//! Every operation takes the read-only [`cvd_db::Database`] handle plus a
//! few scalar parameters and returns a freshly computed derived table. No
//! result is cached; each call re-runs its query.
//!
//! - [`region`]: per-region totals with fatality/recovery rates, and the
//!   region → country → case breakdown
//! - [`share`]: each country's percentage of the same-date global total
//! - [`ranking`]: top-N countries by a cumulative metric
//! - [`timeline`]: latest-per-country snapshot and single-country series
//! - [`table`]: the generic [`Table`](table::Table) every chart carries,
//!   with wide/long reshaping
//! - [`frames`]: source records converted to tables

pub mod frames;
pub mod ranking;
pub mod region;
pub mod share;
pub mod table;
pub mod timeline;

pub use ranking::{top_n, TopN};
pub use region::{
    region_country_breakdown, region_summary, sort_region_summary, RegionCountryBreakdown,
    RegionSummary,
};
pub use share::{world_share_percent, WorldShare};
pub use table::{Cell, Table};
pub use timeline::{country_timeline, latest_country_snapshot};

//! Core types shared by every CVD crate.
//!
//! - `records`: typed rows of the four source tables and the [`records::Rate`] marker type
//! - `metric`: enumerated user choices (case metrics, axis scales, ...)
//! - `region`: WHO region naming
//! - `error`: the [`error::CovidError`] taxonomy

pub mod error;
pub mod metric;
pub mod records;
pub mod region;

pub use error::{CovidError, Result};

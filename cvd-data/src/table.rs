//! A small column-named table used as the data payload of every chart.
//!
//! Aggregations produce typed rows; charts want a uniform grid of cells
//! with named columns so the same description can carry a region summary,
//! a long-form melt or a per-country time series.

use cvd_core::records::{Measure, Rate};
use cvd_core::{CovidError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// One table cell. `Undefined` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Undefined,
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the cell; text and undefined cells have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Undefined => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from(Rate::from_f64(value))
    }
}

impl From<Rate> for Cell {
    fn from(value: Rate) -> Self {
        match value {
            Rate::Defined(v) => Cell::Float(v),
            Rate::Undefined => Cell::Undefined,
        }
    }
}

impl From<Measure> for Cell {
    fn from(value: Measure) -> Self {
        match value {
            Measure::Count(v) => Cell::Int(v),
            Measure::Rate(r) => Cell::from(r),
        }
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Cell::Undefined, Cell::Int)
    }
}

/// Rows of cells under named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. It must have exactly one cell per column.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CovidError::SchemaMismatch {
                table: format!("row {}", self.rows.len()),
                column: format!("{} cells for {} columns", row.len(), self.columns.len()),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of `name`, or `SchemaMismatch` if the table has no such column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CovidError::SchemaMismatch {
                table: "table".to_string(),
                column: name.to_string(),
            })
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>> {
        let i = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| &r[i]).collect())
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let i = self.column_index(column).ok()?;
        self.rows.get(row).map(|r| &r[i])
    }

    /// Unpivot `value_columns` into (`label_name`, `value_name`) pairs.
    ///
    /// The output has `id_columns` followed by the label and value columns,
    /// and `len() * value_columns.len()` rows: input row order first, then
    /// `value_columns` order.
    pub fn reshape_wide_to_long(
        &self,
        id_columns: &[&str],
        value_columns: &[&str],
        label_name: &str,
        value_name: &str,
    ) -> Result<Table> {
        let ids = id_columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;
        let values = value_columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;

        let mut columns: Vec<String> = id_columns.iter().map(|c| c.to_string()).collect();
        columns.push(label_name.to_string());
        columns.push(value_name.to_string());

        let mut rows = Vec::with_capacity(self.rows.len() * values.len());
        for row in &self.rows {
            for (label, &vi) in value_columns.iter().zip(&values) {
                let mut out: Vec<Cell> = ids.iter().map(|&i| row[i].clone()).collect();
                out.push(Cell::from(*label));
                out.push(row[vi].clone());
                rows.push(out);
            }
        }
        Ok(Table { columns, rows })
    }

    /// Inverse of [`reshape_wide_to_long`](Self::reshape_wide_to_long).
    ///
    /// Rows sharing the same `id_columns` cells become one output row,
    /// in first-seen order. Each distinct label becomes a column, in
    /// first-seen order. A label missing for some id is `Undefined`.
    ///
    /// Labels become column names, so a non-text label is a
    /// `SchemaMismatch` on `label_name`.
    pub fn pivot_long_to_wide(
        &self,
        id_columns: &[&str],
        label_name: &str,
        value_name: &str,
    ) -> Result<Table> {
        let ids = id_columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;
        let label_i = self.column_index(label_name)?;
        let value_i = self.column_index(value_name)?;

        let mut labels: Vec<&str> = Vec::new();
        let mut keyed: Vec<(Vec<Cell>, HashMap<usize, Cell>)> = Vec::new();

        for row in &self.rows {
            let label = row[label_i]
                .as_text()
                .ok_or_else(|| CovidError::SchemaMismatch {
                    table: "pivot".to_string(),
                    column: label_name.to_string(),
                })?;
            let li = match labels.iter().position(|l| *l == label) {
                Some(i) => i,
                None => {
                    labels.push(label);
                    labels.len() - 1
                }
            };
            let key: Vec<Cell> = ids.iter().map(|&i| row[i].clone()).collect();
            let ki = match keyed.iter().position(|(k, _)| *k == key) {
                Some(i) => i,
                None => {
                    keyed.push((key, HashMap::new()));
                    keyed.len() - 1
                }
            };
            keyed[ki].1.insert(li, row[value_i].clone());
        }

        let mut columns: Vec<String> = id_columns.iter().map(|c| c.to_string()).collect();
        columns.extend(labels.iter().map(|l| l.to_string()));

        let rows = keyed
            .into_iter()
            .map(|(mut key, mut by_label)| {
                for li in 0..labels.len() {
                    key.push(by_label.remove(&li).unwrap_or(Cell::Undefined));
                }
                key
            })
            .collect();
        Ok(Table { columns, rows })
    }
}

//! Date-indexed wide tables.
//!
//! [`TimeSeriesTable`] holds one column per series and one row per date, with
//! dates strictly ascending. [`DerivedMetricTable`] is the same shape with named
//! metric columns, produced by the analytics module.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Observation, SeriesId};
use crate::error::AppError;

/// A single named column of optional values, aligned to its table's dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub id: SeriesId,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeSeriesTable {
    /// Build a two-column `(date, value)` table from raw observations.
    ///
    /// Observations are sorted by date; if a date repeats, the last one wins.
    pub fn from_observations(id: SeriesId, mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(observations.len());
        let mut values: Vec<Option<f64>> = Vec::with_capacity(observations.len());
        for obs in observations {
            if dates.last() == Some(&obs.date) {
                if let Some(last) = values.last_mut() {
                    *last = obs.value;
                }
                continue;
            }
            dates.push(obs.date);
            values.push(obs.value);
        }

        Self {
            dates,
            columns: vec![Column { id, values }],
        }
    }

    /// Build a table from pre-aligned columns.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self, AppError> {
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AppError::invalid("table dates must be strictly ascending"));
        }
        for (i, col) in columns.iter().enumerate() {
            if col.values.len() != dates.len() {
                return Err(AppError::invalid(format!(
                    "column {} has {} values for {} dates",
                    col.id,
                    col.values.len(),
                    dates.len()
                )));
            }
            if columns[..i].iter().any(|c| c.id == col.id) {
                return Err(AppError::invalid(format!("duplicate column {}", col.id)));
            }
        }
        Ok(Self { dates, columns })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.columns.iter().map(|c| &c.id)
    }

    pub fn column(&self, id: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.id.as_str() == id)
            .map(|c| c.values.as_slice())
    }

    /// Like [`column`](Self::column), but an unknown id is an `InvalidArgument`.
    pub fn require_column(&self, id: &str) -> Result<&[Option<f64>], AppError> {
        self.column(id)
            .ok_or_else(|| AppError::invalid(format!("table has no column {id}")))
    }

    /// Value of column `id` on `date`, if both exist and the value is reported.
    pub fn value_on(&self, id: &str, date: NaiveDate) -> Option<f64> {
        let row = self.dates.binary_search(&date).ok()?;
        self.column(id)?.get(row).copied().flatten()
    }

    /// Left join on date with `self` as the left side.
    ///
    /// The row set of `self` is kept as is: dates only present in `right` are
    /// dropped, and right-hand columns get `None` where `right` has no row.
    pub fn left_join(mut self, right: &TimeSeriesTable) -> Result<Self, AppError> {
        let index: HashMap<NaiveDate, usize> = right
            .dates
            .iter()
            .enumerate()
            .map(|(row, date)| (*date, row))
            .collect();

        for col in &right.columns {
            if self.column(col.id.as_str()).is_some() {
                return Err(AppError::invalid(format!(
                    "column {} is present on both sides of the join",
                    col.id
                )));
            }
            let values = self
                .dates
                .iter()
                .map(|date| index.get(date).and_then(|&row| col.values[row]))
                .collect();
            self.columns.push(Column {
                id: col.id.clone(),
                values,
            });
        }

        Ok(self)
    }
}

/// A named output column of an analytics operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricColumn {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetricTable {
    dates: Vec<NaiveDate>,
    columns: Vec<MetricColumn>,
}

impl DerivedMetricTable {
    /// Callers guarantee every column has one value per date.
    pub(crate) fn new(dates: Vec<NaiveDate>, columns: Vec<MetricColumn>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == dates.len()));
        Self { dates, columns }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}

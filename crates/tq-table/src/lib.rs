#![forbid(unsafe_code)]

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tq_expr::{AggregateExpr, FilterExpr};
use tq_types::{AggregateKind, ComparisonOp};

/// One record: column name to raw text value. Every field stays text;
/// numeric meaning is decided per operation, not at load time.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("column {column:?} not found")]
    UnknownColumn { column: String },
    #[error("non-numeric value {value:?} in column {column:?}")]
    NonNumericColumn { column: String, value: String },
    #[error("no rows to aggregate")]
    EmptyAggregate,
}

/// Header order plus rows. The header defines display order; row key sets
/// are assumed to match it but are not validated up front — a row missing
/// a referenced column surfaces as `UnknownColumn` at filter/aggregate
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

/// Result of one aggregation pass over a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub column: String,
    pub kind: AggregateKind,
    pub value: f64,
}

impl Table {
    #[must_use]
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|header| header == name)
    }

    /// Keep the rows matching `expr`, preserving input order.
    ///
    /// A row without the filter column is an error for the whole pass,
    /// never silently skipped.
    pub fn filter(&self, expr: &FilterExpr) -> Result<Self, TableError> {
        let mut kept = Vec::new();
        for row in &self.rows {
            let cell = row.get(&expr.column).ok_or_else(|| TableError::UnknownColumn {
                column: expr.column.clone(),
            })?;
            if cell_matches(cell, expr.op, &expr.value) {
                kept.push(row.clone());
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            column = %expr.column,
            op = expr.op.label(),
            input_rows = self.rows.len(),
            kept_rows = kept.len(),
            "filtered rows"
        );

        Ok(Self {
            headers: self.headers.clone(),
            rows: kept,
        })
    }

    /// Reduce one column to a single statistic.
    ///
    /// Every value must parse as a float; one bad cell fails the whole
    /// operation rather than aggregating the parseable subset.
    pub fn aggregate(&self, expr: &AggregateExpr) -> Result<AggregateSummary, TableError> {
        let mut values = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let cell = row.get(&expr.column).ok_or_else(|| TableError::UnknownColumn {
                column: expr.column.clone(),
            })?;
            let parsed =
                parse_numeric(cell).ok_or_else(|| TableError::NonNumericColumn {
                    column: expr.column.clone(),
                    value: cell.clone(),
                })?;
            values.push(parsed);
        }

        if values.is_empty() {
            return Err(TableError::EmptyAggregate);
        }

        let value = match expr.kind {
            AggregateKind::Average => values.iter().sum::<f64>() / values.len() as f64,
            AggregateKind::Minimum => values.iter().copied().fold(f64::INFINITY, f64::min),
            AggregateKind::Maximum => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            column = %expr.column,
            kind = expr.kind.label(),
            rows = values.len(),
            value,
            "aggregated column"
        );

        Ok(AggregateSummary {
            column: expr.column.clone(),
            kind: expr.kind,
            value,
        })
    }
}

fn cell_matches(cell: &str, op: ComparisonOp, value: &str) -> bool {
    match op {
        ComparisonOp::Eq => cell == value,
        ComparisonOp::Gt => ordering_of(cell, value) == Ordering::Greater,
        ComparisonOp::Lt => ordering_of(cell, value) == Ordering::Less,
    }
}

/// Ordering for `<` / `>` comparisons: numeric when both sides parse as
/// floats, lexicographic on the raw strings otherwise. The text fallback
/// on mixed-type columns is compatibility behavior, kept as-is rather
/// than tightened to numeric-only.
fn ordering_of(cell: &str, value: &str) -> Ordering {
    match (parse_numeric(cell), parse_numeric(value)) {
        (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        _ => cell.cmp(value),
    }
}

/// Float parse with surrounding whitespace tolerated, matching how the
/// values were compared before the rewrite.
fn parse_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

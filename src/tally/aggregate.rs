use std::{collections::BTreeMap, sync::Arc};

use polars::prelude::*;
use thiserror::Error;

const KEY: &str = "__group";
const TOTAL: &str = "__total";

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("column {column:?} not found in records (available: {available})")]
    MissingColumn { column: String, available: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Per-group totals of one count column, keyed by group code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    totals: BTreeMap<Arc<str>, i64>,
}

impl Aggregate {
    #[inline] pub fn len(&self) -> usize { self.totals.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.totals.is_empty() }

    /// Total for `code`, or `None` if no record carried that code.
    #[inline]
    pub fn get(&self, code: &str) -> Option<i64> {
        self.totals.get(code).copied()
    }

    #[inline]
    pub fn contains(&self, code: &str) -> bool { self.totals.contains_key(code) }

    /// Sum over all groups.
    pub fn total(&self) -> i64 { self.totals.values().sum() }

    /// (code, total) pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.totals.iter().map(|(code, &total)| (code.as_ref(), total))
    }

    /// Two-column frame `[key_name, "total"]` in code order.
    pub fn to_frame(&self, key_name: &str) -> PolarsResult<DataFrame> {
        let codes = self.totals.keys().map(|c| c.as_ref()).collect::<Vec<_>>();
        let totals = self.totals.values().copied().collect::<Vec<_>>();
        DataFrame::new(vec![
            Column::new(key_name.into(), codes),
            Column::new("total".into(), totals),
        ])
    }
}

impl<K: Into<Arc<str>>> FromIterator<(K, i64)> for Aggregate {
    /// Repeated codes are summed.
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        let mut totals = BTreeMap::new();
        for (code, total) in iter {
            *totals.entry(code.into()).or_insert(0) += total;
        }
        Self { totals }
    }
}

fn require_column(records: &DataFrame, column: &str) -> Result<(), AggregateError> {
    if records.get_column_names().iter().any(|c| c.as_str() == column) {
        return Ok(());
    }
    Err(AggregateError::MissingColumn {
        column: column.to_string(),
        available: records.get_column_names().iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Sum `count_column` over the rows of `records` sharing a `group_key` value.
///
/// Counts are whole numbers; text such as "5.0" is accepted and fractions
/// are truncated. Missing, NaN and non-numeric counts contribute zero. Rows with a null
/// group key cannot be attributed and are dropped. Groups with no rows are
/// absent from the result; the boundary join is responsible for zero-filling.
pub fn aggregate(records: &DataFrame, group_key: &str, count_column: &str) -> Result<Aggregate, AggregateError> {
    require_column(records, group_key)?;
    require_column(records, count_column)?;

    let grouped = records.clone().lazy()
        .select([
            col(group_key).cast(DataType::String).alias(KEY),
            // Non-strict cast: text that is not a number becomes null.
            col(count_column).cast(DataType::Float64).alias(TOTAL),
        ])
        .with_column(col(TOTAL).fill_nan(lit(0.0)).fill_null(lit(0.0)).cast(DataType::Int64).alias(TOTAL))
        .filter(col(KEY).is_not_null())
        .group_by([col(KEY)])
        .agg([col(TOTAL).sum().alias(TOTAL)])
        .collect()?;

    let codes = grouped.column(KEY)?.str()?;
    let totals = grouped.column(TOTAL)?.i64()?;

    Ok(codes.into_iter()
        .zip(totals.into_iter())
        .filter_map(|(code, total)| Some((code?, total.unwrap_or(0))))
        .collect())
}

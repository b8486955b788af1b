//! Data Processor Module
//! Grouping, pivoting and frequency counts derived from the Table.

use super::table::{Table, TableError};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Mean of a target column per observed (first key, second key) combination.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedMean {
    pub keys: [String; 2],
    pub target: String,
    /// One entry per combination, sorted by first key then second key.
    pub rows: Vec<(String, String, f64)>,
}

impl GroupedMean {
    #[cfg(test)]
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|(a, b, _)| a == first && b == second)
            .map(|(_, _, mean)| *mean)
    }

    /// Long-format DataFrame: [first key, second key, target].
    pub fn to_dataframe(&self) -> Result<DataFrame, TableError> {
        let firsts: Vec<&str> = self.rows.iter().map(|(a, _, _)| a.as_str()).collect();
        let seconds: Vec<&str> = self.rows.iter().map(|(_, b, _)| b.as_str()).collect();
        let means: Vec<f64> = self.rows.iter().map(|(_, _, m)| *m).collect();

        let df = DataFrame::new(vec![
            Column::new(self.keys[0].as_str().into(), firsts),
            Column::new(self.keys[1].as_str().into(), seconds),
            Column::new(self.target.as_str().into(), means),
        ])?;
        Ok(df)
    }
}

/// Rectangular two-way table; absent combinations hold the fill value.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index_name: String,
    pub columns_name: String,
    pub value_name: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `values[row][col]`
    pub values: Vec<Vec<f64>>,
}

#[cfg(test)]
impl PivotTable {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.col_labels.iter().position(|l| l == col)?;
        Some(self.values[r][c])
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    /// Smallest and largest cell, `None` for an empty pivot.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Frequency of each distinct value, most frequent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCounts {
    pub column: String,
    pub counts: Vec<(String, usize)>,
}

impl ValueCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Handles grouping and reshaping operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Mean of `target` grouped jointly by two categorical columns.
    ///
    /// Rows where either key or the target is missing are dropped.
    pub fn group_mean(
        table: &Table,
        first: &str,
        second: &str,
        target: &str,
    ) -> Result<GroupedMean, TableError> {
        let first_values = table.categorical(first)?;
        let second_values = table.categorical(second)?;
        let target_values = table.numeric(target)?;

        let mut sums: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
        for ((a, b), v) in first_values
            .into_iter()
            .zip(second_values)
            .zip(target_values)
        {
            if let (Some(a), Some(b), Some(v)) = (a, b, v) {
                let entry = sums.entry((a, b)).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        let rows = sums
            .into_iter()
            .map(|((a, b), (sum, n))| (a, b, sum / n as f64))
            .collect();

        Ok(GroupedMean {
            keys: [first.to_string(), second.to_string()],
            target: target.to_string(),
            rows,
        })
    }

    /// Spread a grouped mean into a first-key by second-key grid.
    pub fn pivot(grouped: &GroupedMean, fill: f64) -> PivotTable {
        let row_labels: Vec<String> = grouped
            .rows
            .iter()
            .map(|(a, _, _)| a.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let col_labels: Vec<String> = grouped
            .rows
            .iter()
            .map(|(_, b, _)| b.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut values = vec![vec![fill; col_labels.len()]; row_labels.len()];
        for (a, b, mean) in &grouped.rows {
            let r = row_labels.iter().position(|l| l == a);
            let c = col_labels.iter().position(|l| l == b);
            if let (Some(r), Some(c)) = (r, c) {
                values[r][c] = *mean;
            }
        }

        PivotTable {
            index_name: grouped.keys[0].clone(),
            columns_name: grouped.keys[1].clone(),
            value_name: grouped.target.clone(),
            row_labels,
            col_labels,
            values,
        }
    }

    /// Count distinct non-missing values of a column.
    pub fn value_counts(table: &Table, column: &str) -> Result<ValueCounts, TableError> {
        let values = table.categorical(column)?;
        Ok(Self::count_values(column, values.into_iter().flatten()))
    }

    /// Descending by count; ties keep first-appearance order.
    pub fn count_values(column: &str, values: impl IntoIterator<Item = String>) -> ValueCounts {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for value in values {
            let count = counts.entry(value.clone()).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        let mut counts: Vec<(String, usize)> = order
            .into_iter()
            .map(|value| {
                let n = counts.get(&value).copied().unwrap_or(0);
                (value, n)
            })
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        ValueCounts {
            column: column.to_string(),
            counts,
        }
    }
}

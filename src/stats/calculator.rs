//! Statistics Calculator Module
//! Descriptive statistics, Pearson correlation with significance, OLS line fits
//! and box-plot summaries.

use crate::data::{DataProcessor, Table, TableError};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::cmp::Ordering;
use thiserror::Error;

/// Confidence level of the band drawn around regression lines.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Box whiskers reach at most this many IQRs past the quartiles.
pub const WHISKER_IQR: f64 = 1.5;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("need at least {needed} complete observations, got {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("input is constant, correlation is undefined")]
    ConstantInput,
}

/// Summary of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for NumericSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl NumericSummary {
    /// Row labels in display order, matching [`NumericSummary::values`].
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summary of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

impl CategoricalSummary {
    pub const LABELS: [&'static str; 4] = ["count", "unique", "top", "freq"];
}

/// Pearson coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

/// Square matrix of pairwise Pearson coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient of columns `i` and `j`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    #[cfg(test)]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Ordinary least squares fit of `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
    /// Residual standard error, `sqrt(SSE / (n - 2))`.
    pub residual_std: f64,
    x_mean: f64,
    sxx: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Confidence interval of the mean prediction at each `x`: `(x, low, high)`.
    ///
    /// Empty when the fit has no residual degrees of freedom.
    pub fn confidence_band(&self, xs: &[f64], level: f64) -> Vec<(f64, f64, f64)> {
        if self.n < 3 {
            return Vec::new();
        }
        let Ok(dist) = StudentsT::new(0.0, 1.0, (self.n - 2) as f64) else {
            return Vec::new();
        };
        let t = dist.inverse_cdf(0.5 + level / 2.0);

        xs.iter()
            .map(|&x| {
                let se = self.residual_std
                    * (1.0 / self.n as f64 + (x - self.x_mean).powi(2) / self.sxx).sqrt();
                let y = self.predict(x);
                (x, y - t * se, y + t * se)
            })
            .collect()
    }
}

/// Five-number box summary of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Handles statistical calculations over table columns.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> NumericSummary {
        let n = values.len();
        if n == 0 {
            return NumericSummary::default();
        }

        let sorted = Self::sorted(values);
        let mean = values.iter().sum::<f64>() / n as f64;

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        NumericSummary {
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Describe a numeric column, ignoring missing values.
    pub fn describe_numeric(table: &Table, column: &str) -> Result<NumericSummary, StatsError> {
        let values: Vec<f64> = table.numeric(column)?.into_iter().flatten().collect();
        Ok(Self::compute_descriptive_stats(&values))
    }

    /// Describe a categorical column, ignoring missing values.
    pub fn describe_categorical(
        table: &Table,
        column: &str,
    ) -> Result<CategoricalSummary, StatsError> {
        let counts = DataProcessor::value_counts(table, column)?;
        let top = counts.counts.first().cloned();

        Ok(CategoricalSummary {
            count: counts.total(),
            unique: counts.counts.len(),
            freq: top.as_ref().map(|(_, n)| *n).unwrap_or(0),
            top: top.map(|(value, _)| value),
        })
    }

    /// Percentile of already sorted values, interpolating linearly between the
    /// two closest ranks. Drives the 25%/50%/75% rows of `describe` and the box quartiles.
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pairs where both sides are present.
    pub fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<(f64, f64)> {
        x.iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .collect()
    }

    /// Pearson correlation and two-sided p-value over complete pairs.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Result<Correlation, StatsError> {
        Self::pearson_pairs(&Self::complete_pairs(x, y))
    }

    pub fn pearson_pairs(pairs: &[(f64, f64)]) -> Result<Correlation, StatsError> {
        let n = pairs.len();
        if n < 2 {
            return Err(StatsError::InsufficientData { needed: 2, got: n });
        }

        if Self::is_constant(pairs.iter().map(|p| p.0))
            || Self::is_constant(pairs.iter().map(|p| p.1))
        {
            return Err(StatsError::ConstantInput);
        }

        let nf = n as f64;
        let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in pairs {
            let dx = x - x_mean;
            let dy = y - y_mean;
            sxy += dx * dy;
            sxx += dx * dx;
            syy += dy * dy;
        }

        let r = (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0);

        Ok(Correlation {
            coefficient: r,
            p_value: Self::pearson_p_value(r, n),
            n,
        })
    }

    /// Two-sided p-value of `r` under the null of no correlation.
    fn pearson_p_value(r: f64, n: usize) -> f64 {
        if n <= 2 {
            return 1.0;
        }
        if r.abs() >= 1.0 {
            return 0.0;
        }

        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
            Err(_) => f64::NAN,
        }
    }

    #[cfg(test)]
    pub fn pearson_columns(table: &Table, x: &str, y: &str) -> Result<Correlation, StatsError> {
        Self::pearson(&table.numeric(x)?, &table.numeric(y)?)
    }

    /// Pairwise correlation matrix; undefined pairs are NaN, the diagonal is 1.
    pub fn correlation_matrix(
        table: &Table,
        columns: &[&str],
    ) -> Result<CorrelationMatrix, StatsError> {
        let data = columns
            .iter()
            .map(|c| table.numeric(c))
            .collect::<Result<Vec<_>, _>>()?;

        let k = columns.len();
        let mut values = vec![vec![1.0; k]; k];
        for i in 0..k {
            for j in (i + 1)..k {
                let r = Self::pearson(&data[i], &data[j])
                    .map(|c| c.coefficient)
                    .unwrap_or(f64::NAN);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Ok(CorrelationMatrix {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            values,
        })
    }

    /// Least-squares line through the given points.
    pub fn fit_line(pairs: &[(f64, f64)]) -> Result<LinearFit, StatsError> {
        let n = pairs.len();
        if n < 2 {
            return Err(StatsError::InsufficientData { needed: 2, got: n });
        }
        if Self::is_constant(pairs.iter().map(|p| p.0)) {
            return Err(StatsError::ConstantInput);
        }

        let nf = n as f64;
        let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
        let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

        let sxx: f64 = pairs.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
        let sxy: f64 = pairs
            .iter()
            .map(|(x, y)| (x - x_mean) * (y - y_mean))
            .sum();

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let sse: f64 = pairs
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let residual_std = if n > 2 {
            (sse / (n - 2) as f64).sqrt()
        } else {
            0.0
        };

        Ok(LinearFit {
            slope,
            intercept,
            n,
            residual_std,
            x_mean,
            sxx,
        })
    }

    /// Box summary of a set of values.
    pub fn box_summary(label: &str, values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(BoxSummary {
            label: label.to_string(),
            count: sorted.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// One box per category of `category`, in first-appearance order.
    pub fn box_summaries_by(
        table: &Table,
        category: &str,
        value: &str,
    ) -> Result<Vec<BoxSummary>, StatsError> {
        let categories = table.categorical(category)?;
        let values = table.numeric(value)?;

        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        for (c, v) in categories.into_iter().zip(values) {
            let (Some(c), Some(v)) = (c, v) else {
                continue;
            };
            match groups.iter_mut().find(|(label, _)| *label == c) {
                Some((_, members)) => members.push(v),
                None => groups.push((c, vec![v])),
            }
        }

        Ok(groups
            .iter()
            .filter_map(|(label, members)| Self::box_summary(label, members))
            .collect())
    }

    /// Every value equal to the first; exact comparison, not a variance threshold.
    fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
        match values.next() {
            Some(first) => values.all(|v| v == first),
            None => true,
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_descriptive_stats_ordering() {
        let table = fixtures::sample_table();
        for column in table.numeric_columns() {
            let s = StatsCalculator::describe_numeric(&table, &column).unwrap();
            assert!(s.min <= s.q25, "{column}");
            assert!(s.q25 <= s.median, "{column}");
            assert!(s.median <= s.q75, "{column}");
            assert!(s.q75 <= s.max, "{column}");
        }
    }

    #[test]
    fn test_descriptive_count_excludes_missing() {
        let table = fixtures::sample_table();
        let price = StatsCalculator::describe_numeric(&table, "price").unwrap();
        assert_eq!(price.count, 9);
        let stroke = StatsCalculator::describe_numeric(&table, "stroke").unwrap();
        assert_eq!(stroke.count, 9);
    }

    #[test]
    fn test_descriptive_known_values() {
        let s = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < EPS);
        assert!((s.median - 2.5).abs() < EPS);
        assert!((s.q25 - 1.75).abs() < EPS);
        assert!((s.q75 - 3.25).abs() < EPS);
        assert!((s.std - (5.0_f64 / 3.0).sqrt()).abs() < EPS);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn test_describe_categorical() {
        let table = fixtures::sample_table();
        let s = StatsCalculator::describe_categorical(&table, "body-style").unwrap();
        assert_eq!(s.count, 10);
        assert_eq!(s.unique, 5);
        assert_eq!(s.top.as_deref(), Some("sedan"));
        assert_eq!(s.freq, 4);
    }

    #[test]
    fn test_pearson_self_is_one() {
        let table = fixtures::sample_table();
        let c = StatsCalculator::pearson_columns(&table, "horsepower", "horsepower").unwrap();
        assert!((c.coefficient - 1.0).abs() < 1e-12);
        assert!(c.p_value.abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let y = [Some(2.0), Some(4.0), Some(5.0), Some(4.0), Some(5.0)];
        let c = StatsCalculator::pearson(&x, &y).unwrap();
        // r = 6 / sqrt(10 * 6)
        assert!((c.coefficient - 0.7745966692414834).abs() < 1e-12);
        // scipy.stats.pearsonr reports 0.1240270...
        assert!((c.p_value - 0.124027).abs() < 1e-4);
        assert_eq!(c.n, 5);
    }

    #[test]
    fn test_pearson_skips_missing_pairs() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(1.0), Some(100.0), None, Some(4.0)];
        let c = StatsCalculator::pearson(&x, &y).unwrap();
        assert_eq!(c.n, 2);
        assert!((c.coefficient - 1.0).abs() < EPS);
        assert_eq!(c.p_value, 1.0);
    }

    #[test]
    fn test_pearson_bounds_on_dataset() {
        let table = fixtures::sample_table();
        for column in ["wheel-base", "horsepower", "bore", "city-mpg", "stroke"] {
            let c = StatsCalculator::pearson_columns(&table, column, "price").unwrap();
            assert!((-1.0..=1.0).contains(&c.coefficient), "{column}");
            assert!((0.0..=1.0).contains(&c.p_value), "{column}");
        }
    }

    #[test]
    fn test_pearson_errors() {
        let constant = [Some(1.0), Some(1.0), Some(1.0)];
        let varying = [Some(1.0), Some(2.0), Some(3.0)];
        assert!(matches!(
            StatsCalculator::pearson(&constant, &varying),
            Err(StatsError::ConstantInput)
        ));
        assert!(matches!(
            StatsCalculator::pearson(&[Some(1.0)], &[Some(2.0)]),
            Err(StatsError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let table = fixtures::sample_table();
        let m = StatsCalculator::correlation_matrix(
            &table,
            &["bore", "stroke", "compression-ratio", "horsepower"],
        )
        .unwrap();

        for i in 0..4 {
            assert!((m.values[i][i] - 1.0).abs() < EPS);
            for j in 0..4 {
                assert!((m.values[i][j] - m.values[j][i]).abs() < EPS);
            }
        }
        let direct = StatsCalculator::pearson_columns(&table, "bore", "horsepower").unwrap();
        assert!((m.get("bore", "horsepower").unwrap() - direct.coefficient).abs() < EPS);
    }

    #[test]
    fn test_constant_fraction_column_is_constant_input() {
        let pairs = [(0.1, 1.0), (0.1, 2.0), (0.1, 4.0)];
        assert!(matches!(
            StatsCalculator::pearson_pairs(&pairs),
            Err(StatsError::ConstantInput)
        ));
        assert!(matches!(
            StatsCalculator::fit_line(&pairs),
            Err(StatsError::ConstantInput)
        ));

        let flipped: Vec<(f64, f64)> = pairs.iter().map(|&(x, y)| (y, x)).collect();
        assert!(matches!(
            StatsCalculator::pearson_pairs(&flipped),
            Err(StatsError::ConstantInput)
        ));
    }

    #[test]
    fn test_p_value_keeps_tiny_probabilities() {
        // Strong correlations over a full-size dataset are far below f64 epsilon.
        let p = StatsCalculator::pearson_p_value(0.8723, 201);
        assert!(p > 0.0, "p-value underflowed to {p}");
        assert!(p < 1e-50);

        let weaker = StatsCalculator::pearson_p_value(0.5846, 201);
        assert!(weaker > 1e-21 && weaker < 1e-18, "{weaker}");
        assert!(weaker > p);
    }

    #[test]
    fn test_fit_line_recovers_exact_line() {
        let pairs: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 3.0 + 2.0 * i as f64)).collect();
        let fit = StatsCalculator::fit_line(&pairs).unwrap();
        assert!((fit.slope - 2.0).abs() < EPS);
        assert!((fit.intercept - 3.0).abs() < EPS);
        assert!(fit.residual_std.abs() < EPS);
        assert!((fit.predict(20.0) - 43.0).abs() < EPS);
    }

    #[test]
    fn test_confidence_band_contains_fit() {
        let pairs = [(1.0, 1.2), (2.0, 1.9), (3.0, 3.4), (4.0, 3.9), (5.0, 5.3)];
        let fit = StatsCalculator::fit_line(&pairs).unwrap();
        let band = fit.confidence_band(&[0.0, 3.0, 6.0], CONFIDENCE_LEVEL);
        assert_eq!(band.len(), 3);
        for (x, low, high) in band {
            let y = fit.predict(x);
            assert!(low < y && y < high);
        }
    }

    #[test]
    fn test_box_summary_whiskers_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let b = StatsCalculator::box_summary("x", &values).unwrap();
        assert_eq!(b.median, 5.0);
        assert_eq!(b.q1, 3.0);
        assert_eq!(b.q3, 7.0);
        assert_eq!(b.whisker_low, 1.0);
        assert_eq!(b.whisker_high, 8.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn test_box_summaries_by_category_order() {
        let table = fixtures::sample_table();
        let boxes = StatsCalculator::box_summaries_by(&table, "drive-wheels", "price").unwrap();
        let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["rwd", "fwd", "4wd"]);
        // peugot has no price
        assert_eq!(boxes[0].count, 5);
    }
}

//! Stats module - descriptive statistics, correlation and regression

mod calculator;

pub use calculator::{
    BoxSummary, CategoricalSummary, Correlation, CorrelationMatrix, LinearFit, NumericSummary,
    StatsCalculator, StatsError, CONFIDENCE_LEVEL,
};

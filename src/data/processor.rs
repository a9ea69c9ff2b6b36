//! Data Processor Module
//! Reshapes long-form observations into a Duration x Feature matrix (pivot).

use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::collections::BTreeSet;
use thiserror::Error;

pub const TYPE_COL: &str = "Type";
pub const DURATION_COL: &str = "Duration";
pub const FEATURE_COL: &str = "Feature";
pub const VALUE_COL: &str = "Normalized_ATE";

const REQUIRED_COLUMNS: [&str; 4] = [TYPE_COL, DURATION_COL, FEATURE_COL, VALUE_COL];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' not found in input table")]
    MissingColumn(&'static str),
}

/// Row key of the matrix.
///
/// Numeric `Duration` columns give `Numeric` keys. Any other dtype is read as
/// text and gives `Label` keys ordered lexicographically.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DurationKey {
    Numeric(f64),
    Label(String),
}

impl DurationKey {
    /// Numeric key, or `None` for NaN. `-0.0` is folded into `0.0`.
    pub fn numeric(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        Some(Self::Numeric(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl From<f64> for DurationKey {
    fn from(value: f64) -> Self {
        Self::Numeric(if value == 0.0 { 0.0 } else { value })
    }
}

impl From<&str> for DurationKey {
    fn from(value: &str) -> Self {
        Self::Label(value.to_string())
    }
}

impl Ord for DurationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.total_cmp(b),
            (Self::Label(a), Self::Label(b)) => a.cmp(b),
            (Self::Numeric(_), Self::Label(_)) => Ordering::Less,
            (Self::Label(_), Self::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for DurationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DurationKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DurationKey {}

impl fmt::Display for DurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{}", v),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// One feature's summed values, aligned with [`PivotTable::durations`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl FeatureColumn {
    /// Total across all durations. NaN cells make the total NaN.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Reshaped matrix for one category: rows are durations (ascending),
/// columns are features ordered by descending total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    durations: Vec<DurationKey>,
    columns: Vec<FeatureColumn>,
}

impl PivotTable {
    pub fn durations(&self) -> &[DurationKey] {
        &self.durations
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.durations.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty() && self.columns.is_empty()
    }
}

/// Summed cell under construction.
#[derive(Clone, Copy, Default)]
struct Cell {
    sum: f64,
    observed: bool,
}

/// Handles filtering and pivoting of the observation table.
pub struct DataProcessor;

impl DataProcessor {
    /// Fail with a data-shape error if any required column is absent.
    pub fn check_columns(df: &DataFrame) -> Result<(), ProcessorError> {
        for name in REQUIRED_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(ProcessorError::MissingColumn(name));
            }
        }
        Ok(())
    }

    /// Filter DataFrame for a specific category code.
    pub fn filter_by_type(df: &DataFrame, type_code: &str) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(TYPE_COL).cast(DataType::String).eq(lit(type_code)))
            .collect()?;
        Ok(filtered)
    }

    /// Pivot the rows of one category into a Duration x Feature matrix.
    ///
    /// Duplicate (Duration, Feature) pairs are summed and missing pairs read
    /// as 0. Columns that are zero everywhere are dropped, together with any
    /// duration that only had observations in dropped columns. Remaining
    /// columns are ordered by descending total; equal totals keep
    /// lexicographic feature order.
    pub fn prepare_data(df: &DataFrame, type_code: &str) -> Result<PivotTable, ProcessorError> {
        Self::check_columns(df)?;

        let filtered = Self::filter_by_type(df, type_code)?;
        if filtered.height() == 0 {
            return Ok(PivotTable::default());
        }

        let durations = Self::duration_keys(filtered.column(DURATION_COL)?)?;
        let features = filtered.column(FEATURE_COL)?.cast(&DataType::String)?;
        let features = features.str()?;
        let values = filtered.column(VALUE_COL)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        // Rows without a usable key cannot land in the matrix.
        let mut observations: Vec<(DurationKey, &str, f64)> =
            Vec::with_capacity(filtered.height());
        for ((duration, feature), value) in durations
            .into_iter()
            .zip(features.into_iter())
            .zip(values.into_iter())
        {
            let (Some(duration), Some(feature)) = (duration, feature) else {
                continue;
            };
            observations.push((duration, feature, value.unwrap_or(f64::NAN)));
        }

        let mut row_keys: Vec<DurationKey> =
            observations.iter().map(|(d, _, _)| d.clone()).collect();
        row_keys.sort();
        row_keys.dedup();

        let column_keys: Vec<&str> = observations
            .iter()
            .map(|&(_, f, _)| f)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut grid = vec![vec![Cell::default(); row_keys.len()]; column_keys.len()];
        for (duration, feature, value) in &observations {
            let Ok(row) = row_keys.binary_search(duration) else {
                continue;
            };
            let Ok(column) = column_keys.binary_search(feature) else {
                continue;
            };
            let cell = &mut grid[column][row];
            cell.sum += *value;
            cell.observed = true;
        }

        let kept: Vec<(&str, Vec<Cell>)> = column_keys
            .into_iter()
            .zip(grid)
            .filter(|(_, cells)| cells.iter().any(|c| c.sum != 0.0))
            .collect();

        let kept_rows: Vec<usize> = (0..row_keys.len())
            .filter(|&row| kept.iter().any(|(_, cells)| cells[row].observed))
            .collect();

        let mut columns: Vec<FeatureColumn> = kept
            .into_iter()
            .map(|(name, cells)| FeatureColumn {
                name: name.to_string(),
                values: kept_rows.iter().map(|&row| cells[row].sum).collect(),
            })
            .collect();

        // Vec::sort_by is stable, so equal totals keep their current order.
        columns.sort_by(|a, b| descending_total(a.total(), b.total()));

        Ok(PivotTable {
            durations: kept_rows.iter().map(|&row| row_keys[row].clone()).collect(),
            columns,
        })
    }

    /// Row keys for every input row; `None` where no key can be formed.
    fn duration_keys(column: &Column) -> Result<Vec<Option<DurationKey>>, ProcessorError> {
        let dtype = column.dtype();
        if dtype.is_integer() || dtype.is_float() {
            let numeric = column.cast(&DataType::Float64)?;
            return Ok(numeric
                .f64()?
                .into_iter()
                .map(|d| d.and_then(DurationKey::numeric))
                .collect());
        }

        tracing::debug!(dtype = %dtype, "reading durations as ordinal labels");
        let labels = column.cast(&DataType::String)?;
        Ok(labels
            .str()?
            .into_iter()
            .map(|d| d.map(DurationKey::from))
            .collect())
    }
}

/// Descending order with NaN totals last.
fn descending_total(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

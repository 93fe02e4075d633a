use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Condition – one wide-table column header
// ---------------------------------------------------------------------------

/// A recording condition, parsed from a `task+emotion` column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub task: String,
    pub emotion: String,
}

/// Raised when a condition column header does not contain the `+` separator.
#[derive(Debug, thiserror::Error)]
#[error("condition header '{0}' is not of the form task+emotion")]
pub struct ConditionParseError(pub String);

impl FromStr for Condition {
    type Err = ConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (task, emotion) = s
            .split_once('+')
            .ok_or_else(|| ConditionParseError(s.to_string()))?;
        if task.is_empty() || emotion.is_empty() {
            return Err(ConditionParseError(s.to_string()));
        }
        Ok(Condition {
            task: task.to_string(),
            emotion: emotion.to_string(),
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.task, self.emotion)
    }
}

// ---------------------------------------------------------------------------
// WideTable – the grand-averages table as stored on disk
// ---------------------------------------------------------------------------

/// The wide-format input table: rows are time bins, columns are conditions.
///
/// Missing cells are carried as NaN so the artifact filter can drop them
/// later; `values` is row-major and every row has `conditions.len()` cells.
#[derive(Debug, Clone)]
pub struct WideTable {
    /// Raw time-bin indices from the first column (not yet in milliseconds).
    pub time_bins: Vec<f64>,
    /// Condition columns in file order.
    pub conditions: Vec<Condition>,
    /// Pupil values, one row per time bin.
    pub values: Vec<Vec<f64>>,
}

impl WideTable {
    /// Number of time-bin rows.
    pub fn len(&self) -> usize {
        self.time_bins.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.time_bins.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the long-format table
// ---------------------------------------------------------------------------

/// A single long-format row (one time bin of one condition).
///
/// Field order matches the long-format CSV schema.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    /// Time in milliseconds.
    pub time_bin: f64,
    /// Full condition label (`task+emotion`).
    pub condition: String,
    pub pupil_value: f64,
    pub task: String,
    pub emotion: String,
}

// ---------------------------------------------------------------------------
// LongTable – the melted dataset with pre-computed indices
// ---------------------------------------------------------------------------

/// The long-format dataset with the unique-value indices the analysis and
/// the plot both consume.
#[derive(Debug, Clone)]
pub struct LongTable {
    /// All observations (rows).
    pub rows: Vec<Observation>,
    /// Unique emotion labels, in first-appearance order.
    pub emotions: Vec<String>,
    /// Sorted set of unique condition labels.
    pub condition_labels: BTreeSet<String>,
}

impl LongTable {
    /// Build the unique-value indices from melted rows.
    pub fn from_rows(rows: Vec<Observation>) -> Self {
        let mut emotions: Vec<String> = Vec::new();
        let mut condition_labels: BTreeSet<String> = BTreeSet::new();

        for row in &rows {
            if !emotions.iter().any(|e| e == &row.emotion) {
                emotions.push(row.emotion.clone());
            }
            condition_labels.insert(row.condition.clone());
        }

        LongTable {
            rows,
            emotions,
            condition_labels,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

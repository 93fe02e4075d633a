use super::model::{LongTable, Observation, WideTable};

// ---------------------------------------------------------------------------
// Wide → long transformation
// ---------------------------------------------------------------------------

/// Melt a wide table into long-format observations.
///
/// Output is column-major: all time bins of the first condition, then the
/// second, and so on.  Time-bin indices are converted to milliseconds with
/// `bin_ms`.
pub fn melt(wide: &WideTable, bin_ms: f64) -> Vec<Observation> {
    let mut rows = Vec::with_capacity(wide.len() * wide.conditions.len());

    for (col, cond) in wide.conditions.iter().enumerate() {
        let label = cond.to_string();
        for (row, &bin) in wide.time_bins.iter().enumerate() {
            rows.push(Observation {
                time_bin: bin * bin_ms,
                condition: label.clone(),
                pupil_value: wide.values[row][col],
                task: cond.task.clone(),
                emotion: cond.emotion.clone(),
            });
        }
    }
    rows
}

/// Drop artifact samples: keep only finite values strictly inside
/// (-limit, +limit).  NaN (missing) samples fail the comparison and are
/// dropped with the artifacts.
pub fn clean(rows: Vec<Observation>, limit: f64) -> Vec<Observation> {
    rows.into_iter()
        .filter(|r| r.pupil_value > -limit && r.pupil_value < limit)
        .collect()
}

/// Melt, clean, and index a wide table in one step.
pub fn melt_and_clean(wide: &WideTable, bin_ms: f64, limit: f64) -> LongTable {
    LongTable::from_rows(clean(melt(wide, bin_ms), limit))
}

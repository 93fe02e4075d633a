use std::path::Path;

use anyhow::{Context, Result};

use super::model::LongTable;
use crate::stats::{SignificantTime, TTestRow};

// ---------------------------------------------------------------------------
// Tabular artifact writers
// ---------------------------------------------------------------------------

/// Write the long-format table as a comma-separated CSV with the header
/// `time_bin,condition,pupil_value,task,emotion`.
pub fn write_long_csv(path: &Path, table: &LongTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in &table.rows {
        writer.serialize(row).context("writing long-format row")?;
    }
    writer.flush().context("flushing long-format CSV")?;
    Ok(())
}

/// Write the significant t-test rows tab-separated (a `.txt` artifact, but a
/// regular delimited table with a header).
pub fn write_ttest_results(path: &Path, rows: &[TTestRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing t-test row")?;
    }
    writer.flush().context("flushing t-test results")?;
    Ok(())
}

/// Write the significant-times table as a comma-separated CSV.
pub fn write_significant_times(path: &Path, rows: &[SignificantTime]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing significant-time row")?;
    }
    writer.flush().context("flushing significant times")?;
    Ok(())
}

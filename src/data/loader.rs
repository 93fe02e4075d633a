use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{Condition, WideTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wide-format grand-averages table from a file.  Dispatch by
/// extension.
///
/// Supported formats:
/// * `.csv`  – semicolon-delimited table; first column is the time-bin index,
///             every other column header is a `task+emotion` condition
/// * `.json` – `[{ "time_bin": 0, "task+emotion": 0.41, ... }, ...]`
pub fn load_file(path: &Path) -> Result<WideTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: semicolon-delimited, header row with column names.  The first
/// column holds the time-bin index; its header is ignored.  Empty cells are
/// missing samples and parse as NaN.
fn load_csv(path: &Path) -> Result<WideTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_wide_csv(file)
}

/// Parse a semicolon-delimited wide table from any reader.
pub fn read_wide_csv<R: Read>(rdr: R) -> Result<WideTable> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b';').from_reader(rdr);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.len() < 2 {
        bail!("CSV needs a time column and at least one condition column");
    }

    let conditions: Vec<Condition> = headers[1..]
        .iter()
        .map(|h| h.parse::<Condition>().map_err(anyhow::Error::from))
        .collect::<Result<_>>()
        .context("parsing condition headers")?;

    let mut time_bins = Vec::new();
    let mut values = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }

        time_bins.push(
            parse_cell(record.get(0).unwrap_or(""))
                .with_context(|| format!("CSV row {row_no}, time column"))?,
        );

        let row: Vec<f64> = record
            .iter()
            .enumerate()
            .skip(1)
            .map(|(col, cell)| {
                parse_cell(cell)
                    .with_context(|| format!("CSV row {row_no}, column '{}'", headers[col]))
            })
            .collect::<Result<_>>()?;
        values.push(row);
    }

    Ok(WideTable {
        time_bins,
        conditions,
        values,
    })
}

/// An empty cell is a missing sample; anything else must be a float.
fn parse_cell(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "time_bin": 0, "listen+happy": 0.41, "listen+sad": -0.12 },
///   { "time_bin": 1, "listen+happy": 0.44, "listen+sad": null }
/// ]
/// ```
///
/// Condition keys are taken from the first record (in sorted order); `null`
/// or absent values are missing samples.
fn load_json(path: &Path) -> Result<WideTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;
    if records.is_empty() {
        bail!("JSON table has no records");
    }

    let first = records[0]
        .as_object()
        .context("Row 0 is not a JSON object")?;
    let conditions: Vec<Condition> = first
        .keys()
        .filter(|k| k.as_str() != "time_bin")
        .map(|k| k.parse::<Condition>().map_err(anyhow::Error::from))
        .collect::<Result<_>>()
        .context("parsing condition keys")?;

    if conditions.is_empty() {
        bail!("JSON table has no condition keys");
    }

    let mut time_bins = Vec::with_capacity(records.len());
    let mut values = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let t = obj
            .get("time_bin")
            .and_then(|v| v.as_f64())
            .with_context(|| format!("Row {i}: missing or non-numeric 'time_bin'"))?;
        time_bins.push(t);

        let row: Vec<f64> = conditions
            .iter()
            .map(|c| json_cell(obj.get(&c.to_string()), i, c))
            .collect::<Result<_>>()?;
        values.push(row);
    }

    Ok(WideTable {
        time_bins,
        conditions,
        values,
    })
}

fn json_cell(val: Option<&JsonValue>, row: usize, cond: &Condition) -> Result<f64> {
    match val {
        None | Some(JsonValue::Null) => Ok(f64::NAN),
        Some(v) => v
            .as_f64()
            .with_context(|| format!("Row {row}, '{cond}': not a number")),
    }
}

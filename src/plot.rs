use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::color::ColorMap;
use crate::data::model::LongTable;
use crate::stats::SignificantTime;

/// Plot x-axis range in milliseconds.
const X_MIN_MS: f64 = -200.0;
const X_MAX_MS: f64 = 3000.0;

/// Shaded stimulus-onset span.
const ONSET_SPAN_MS: (f64, f64) = (0.0, 200.0);

// ---------------------------------------------------------------------------
// Pupil-size figure
// ---------------------------------------------------------------------------

/// Render the per-condition pupil traces to a PNG.
///
/// One line per condition at half opacity, the onset span shaded gray, the
/// test window shaded red, and a dashed red vertical line at every
/// significant time bin.
pub fn render_pupil_plot(
    path: &Path,
    table: &LongTable,
    significant: &[SignificantTime],
    window_start_ms: f64,
    window_end_ms: f64,
) -> Result<()> {
    let (y_min, y_max) = y_range(table);

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("filling {}", path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Pupil Size change", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(X_MIN_MS..X_MAX_MS, y_min..y_max)
        .context("building chart")?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Pupil Size")
        .x_labels(8)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()
        .context("drawing axes")?;

    // Shaded spans go in first so the traces draw on top.
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(ONSET_SPAN_MS.0, y_min), (ONSET_SPAN_MS.1, y_max)],
            RGBColor(128, 128, 128).mix(0.3).filled(),
        )))
        .context("drawing onset span")?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(window_start_ms, y_min), (window_end_ms, y_max)],
            RED.mix(0.2).filled(),
        )))
        .context("drawing test-window span")?;

    let color_map = ColorMap::new(&table.condition_labels);
    for label in &table.condition_labels {
        let points: Vec<(f64, f64)> = table
            .rows
            .iter()
            .filter(|r| &r.condition == label)
            .map(|r| (r.time_bin, r.pupil_value))
            .collect();

        let color = color_map.color_for(label);
        chart
            .draw_series(LineSeries::new(points, color.mix(0.5).stroke_width(1)))
            .with_context(|| format!("drawing series '{label}'"))?
            .label(format!("Condition {label}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    for sig in significant {
        chart
            .draw_series(DashedLineSeries::new(
                [(sig.time_bin, y_min), (sig.time_bin, y_max)],
                5,
                5,
                RED.mix(0.5).stroke_width(1),
            ))
            .context("drawing significant-time marker")?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .context("drawing legend")?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Y range from the data with a little padding; a fixed fallback keeps an
/// empty table plottable.
fn y_range(table: &LongTable) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in &table.rows {
        if row.pupil_value.is_finite() {
            min = min.min(row.pupil_value);
            max = max.max(row.pupil_value);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.1);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LongTable, Observation};

    #[test]
    fn y_range_pads_the_data() {
        let table = LongTable::from_rows(vec![
            obs(0.0, 0.5),
            obs(20.0, -0.5),
        ]);
        let (lo, hi) = y_range(&table);
        assert!(lo < -0.5 && hi > 0.5);
    }

    #[test]
    fn y_range_of_empty_table_is_fallback() {
        let table = LongTable::from_rows(Vec::new());
        assert_eq!(y_range(&table), (-1.0, 1.0));
    }

    #[test]
    fn renders_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");

        let rows = (0..150)
            .flat_map(|i| {
                let t = i as f64 * 20.0;
                [obs_cond(t, "view+calm", (t / 1000.0).sin()),
                 obs_cond(t, "view+fear", (t / 1000.0).cos())]
            })
            .collect();
        let table = LongTable::from_rows(rows);
        let significant = vec![SignificantTime {
            time_bin: 800.0,
            emotion1: "calm".to_string(),
            emotion2: "fear".to_string(),
            p_value: 1e-5,
        }];

        render_pupil_plot(&path, &table, &significant, 750.0, 2500.0).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    fn obs(time_bin: f64, value: f64) -> Observation {
        obs_cond(time_bin, "view+calm", value)
    }

    fn obs_cond(time_bin: f64, label: &str, value: f64) -> Observation {
        let (task, emotion) = label.split_once('+').unwrap();
        Observation {
            time_bin,
            condition: label.to_string(),
            pupil_value: value,
            task: task.to_string(),
            emotion: emotion.to_string(),
        }
    }
}

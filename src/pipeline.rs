use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::data::loader;
use crate::data::melt::melt_and_clean;
use crate::data::writer;
use crate::plot;
use crate::stats;

// ---------------------------------------------------------------------------
// Analysis parameters
// ---------------------------------------------------------------------------

/// Tunable analysis parameters; defaults reproduce the standard protocol.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisParams {
    /// Milliseconds per time bin.
    pub bin_ms: f64,
    /// Samples with |value| at or beyond this are dropped as artifacts.
    pub artifact_limit: f64,
    /// Test window start, in milliseconds.
    pub window_start_ms: f64,
    /// Test window end, in milliseconds.
    pub window_end_ms: f64,
    /// Significance level before Bonferroni correction.
    pub alpha: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            bin_ms: 20.0,
            artifact_limit: 3.0,
            window_start_ms: 750.0,
            window_end_ms: 2500.0,
            alpha: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-subject artifact paths
// ---------------------------------------------------------------------------

/// The input file and the four output artifacts of one subject, all under
/// `<data_root>/<subject>/averages/`.
#[derive(Debug, Clone)]
pub struct SubjectPaths {
    pub input: PathBuf,
    pub long_csv: PathBuf,
    pub ttest_results: PathBuf,
    pub significant_csv: PathBuf,
    pub plot_png: PathBuf,
}

impl SubjectPaths {
    pub fn new(data_root: &Path, subject: &str) -> Self {
        let base = data_root.join(subject).join("averages");
        SubjectPaths {
            input: base.join(format!("grand_averages_{subject}.csv")),
            long_csv: base.join(format!("long_format_{subject}.csv")),
            ttest_results: base.join(format!("ttest_results_{subject}.txt")),
            significant_csv: base.join(format!("significant_times_{subject}.csv")),
            plot_png: base.join(format!("pupil_size_plot_{subject}.png")),
        }
    }
}

// ---------------------------------------------------------------------------
// The per-subject run
// ---------------------------------------------------------------------------

/// What one subject's run produced, for the end-of-run log line.
#[derive(Debug, Clone)]
pub struct SubjectSummary {
    pub subject: String,
    pub long_rows: usize,
    pub n_comparisons: usize,
    pub n_significant: usize,
}

/// Load, reshape, test, and render one subject's data.
pub fn process_subject(
    data_root: &Path,
    subject: &str,
    params: &AnalysisParams,
) -> Result<SubjectSummary> {
    let paths = SubjectPaths::new(data_root, subject);
    info!("Processing {subject}...");

    let wide = loader::load_file(&paths.input)
        .with_context(|| format!("loading data for subject {subject}"))?;
    let table = melt_and_clean(&wide, params.bin_ms, params.artifact_limit);
    if table.is_empty() {
        warn!("{subject}: no samples survived the artifact filter");
    }

    writer::write_long_csv(&paths.long_csv, &table)?;
    info!("Long-format table saved to {}", paths.long_csv.display());

    let outcome = stats::pairwise_emotion_tests(
        &table,
        params.window_start_ms,
        params.window_end_ms,
        params.alpha,
    );
    if outcome.n_comparisons == 0 {
        warn!(
            "{subject}: nothing to test inside the {}-{} ms window",
            params.window_start_ms, params.window_end_ms
        );
    }

    writer::write_ttest_results(&paths.ttest_results, &outcome.results)?;
    info!("T-test results saved to {}", paths.ttest_results.display());

    writer::write_significant_times(&paths.significant_csv, &outcome.significant)?;
    info!(
        "Significant times saved to {}",
        paths.significant_csv.display()
    );

    plot::render_pupil_plot(
        &paths.plot_png,
        &table,
        &outcome.significant,
        params.window_start_ms,
        params.window_end_ms,
    )?;
    info!("Plot saved to {}", paths.plot_png.display());

    Ok(SubjectSummary {
        subject: subject.to_string(),
        long_rows: table.len(),
        n_comparisons: outcome.n_comparisons,
        n_significant: outcome.significant.len(),
    })
}

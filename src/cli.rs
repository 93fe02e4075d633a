use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::AnalysisParams;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Root directory holding <subject>/averages/grand_averages_<subject>.csv
    #[arg(long, value_name = "DIR")]
    pub data_root: PathBuf,

    /// Subjects to process, in order
    #[arg(value_name = "SUBJECT", required = true)]
    pub subjects: Vec<String>,

    /// Milliseconds per time bin
    #[arg(long, default_value_t = 20.0)]
    pub bin_ms: f64,

    /// Drop samples with |value| at or beyond this limit
    #[arg(long, default_value_t = 3.0)]
    pub artifact_limit: f64,

    /// Test window start, milliseconds
    #[arg(long, default_value_t = 750.0)]
    pub window_start: f64,

    /// Test window end, milliseconds
    #[arg(long, default_value_t = 2500.0)]
    pub window_end: f64,

    /// Significance level before Bonferroni correction
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
}

impl Args {
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            bin_ms: self.bin_ms,
            artifact_limit: self.artifact_limit,
            window_start_ms: self.window_start,
            window_end_ms: self.window_end,
            alpha: self.alpha,
        }
    }
}

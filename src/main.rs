use anyhow::Result;
use clap::Parser;
use log::info;

use pupilstat::cli::Args;
use pupilstat::pipeline::process_subject;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = args.params();

    for subject in &args.subjects {
        let summary = process_subject(&args.data_root, subject, &params)?;
        info!(
            "{}: {} long rows, {} of {} comparisons significant",
            summary.subject, summary.long_rows, summary.n_significant, summary.n_comparisons
        );
    }
    Ok(())
}

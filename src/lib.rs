//! Batch statistical analysis of eye-tracking pupil-size recordings.
//!
//! For each subject: load the wide-format grand-averages table, melt it to
//! long format, drop artifact samples, run Bonferroni-corrected pairwise
//! t-tests across emotions inside a time window, and write the long CSV,
//! t-test results, significant times, and a PNG figure.

pub mod cli;
pub mod color;
pub mod data;
pub mod pipeline;
pub mod plot;
pub mod stats;

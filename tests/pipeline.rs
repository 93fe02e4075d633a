use std::fs;

use pupilstat::pipeline::{process_subject, AnalysisParams, SubjectPaths};
use tempfile::TempDir;

/// 51 bins (0..=50) of two emotions across three tasks.  The emotions agree
/// everywhere except bin 40 (800 ms), which sits inside the test window and
/// is separated far beyond the corrected alpha.  Bin 0 carries one artifact
/// and one missing cell.
fn wide_csv() -> String {
    let mut out = String::from("bin;t1+calm;t2+calm;t3+calm;t1+fear;t2+fear;t3+fear\n");
    for bin in 0..=50 {
        let calm_base = 0.1;
        let fear_base = if bin == 40 { 2.0 } else { calm_base };

        let mut fields = vec![bin.to_string()];
        for i in 0..3 {
            fields.push(format!("{:.3}", calm_base + 0.01 * i as f64));
        }
        for i in 0..3 {
            fields.push(format!("{:.3}", fear_base + 0.01 * i as f64));
        }
        if bin == 0 {
            fields[1] = "9.9".to_string();
            fields[4] = String::new();
        }
        out.push_str(&fields.join(";"));
        out.push('\n');
    }
    out
}

fn write_subject_data(root: &std::path::Path, subject: &str) -> SubjectPaths {
    let paths = SubjectPaths::new(root, subject);
    fs::create_dir_all(paths.input.parent().unwrap()).unwrap();
    fs::write(&paths.input, wide_csv()).unwrap();
    paths
}

#[test]
fn full_pipeline_produces_all_artifacts() {
    let tmp = TempDir::new().unwrap();
    let paths = write_subject_data(tmp.path(), "SubjT");

    let summary = process_subject(tmp.path(), "SubjT", &AnalysisParams::default()).unwrap();

    // 51 bins x 6 conditions, minus the artifact and the missing cell.
    assert_eq!(summary.long_rows, 304);
    // One emotion pair x 13 in-window bins (760..=1000 ms).
    assert_eq!(summary.n_comparisons, 13);
    assert_eq!(summary.n_significant, 1);

    assert!(paths.long_csv.is_file());
    assert!(paths.ttest_results.is_file());
    assert!(paths.significant_csv.is_file());
    assert!(paths.plot_png.is_file());
    assert!(fs::metadata(&paths.plot_png).unwrap().len() > 0);
}

#[test]
fn long_format_csv_is_cleaned_and_in_milliseconds() {
    let tmp = TempDir::new().unwrap();
    let paths = write_subject_data(tmp.path(), "SubjT");

    process_subject(tmp.path(), "SubjT", &AnalysisParams::default()).unwrap();

    let text = fs::read_to_string(&paths.long_csv).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "time_bin,condition,pupil_value,task,emotion"
    );
    // Bin 0 of t1+calm was an artifact, so the first surviving row is bin 1.
    assert_eq!(lines.next().unwrap(), "20.0,t1+calm,0.1,t1,calm");
    assert!(!text.contains("9.9"));
}

#[test]
fn significant_times_name_the_separated_bin() {
    let tmp = TempDir::new().unwrap();
    let paths = write_subject_data(tmp.path(), "SubjT");

    process_subject(tmp.path(), "SubjT", &AnalysisParams::default()).unwrap();

    let text = fs::read_to_string(&paths.significant_csv).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), "time_bin,emotion1,emotion2,p_value");
    let row = lines.next().unwrap();
    assert!(row.starts_with("800.0,calm,fear,"));
    assert!(lines.next().is_none());

    let ttest = fs::read_to_string(&paths.ttest_results).unwrap();
    let mut ttest_lines = ttest.lines();
    assert_eq!(
        ttest_lines.next().unwrap(),
        "time_bin\temotion1\temotion2\tt_stat\tp_value"
    );
    assert!(ttest_lines.next().unwrap().starts_with("800.0\tcalm\tfear\t"));
    assert!(ttest_lines.next().is_none());
}

#[test]
fn missing_input_fails_with_context() {
    let tmp = TempDir::new().unwrap();
    let err = process_subject(tmp.path(), "Nobody", &AnalysisParams::default()).unwrap_err();
    assert!(err.to_string().contains("Nobody"));
}

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::model::{LongTable, Observation};

// ---------------------------------------------------------------------------
// Two-sample t-test
// ---------------------------------------------------------------------------

/// Outcome of an independent two-sample t-test.
#[derive(Debug, Clone, Copy)]
pub struct TTest {
    pub t_stat: f64,
    pub p_value: f64,
    pub df: f64,
}

impl TTest {
    fn undefined() -> Self {
        TTest {
            t_stat: f64::NAN,
            p_value: f64::NAN,
            df: f64::NAN,
        }
    }
}

/// Independent two-sample Student's t-test with pooled variance and a
/// two-sided p-value.  NaN samples are omitted.
///
/// With fewer than two usable samples on either side the statistics are NaN
/// (and therefore never significant).  Zero pooled variance with distinct
/// means gives an infinite t and p = 0.
pub fn t_test_ind(a: &[f64], b: &[f64]) -> TTest {
    let a: Vec<f64> = a.iter().copied().filter(|v| !v.is_nan()).collect();
    let b: Vec<f64> = b.iter().copied().filter(|v| !v.is_nan()).collect();

    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return TTest::undefined();
    }

    let mean1 = a.iter().sum::<f64>() / n1 as f64;
    let mean2 = b.iter().sum::<f64>() / n2 as f64;
    let var1 = sample_variance(&a, mean1);
    let var2 = sample_variance(&b, mean2);

    let df = (n1 + n2 - 2) as f64;
    let pooled = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / df;
    let se = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();

    let diff = mean1 - mean2;
    if se == 0.0 {
        if diff == 0.0 {
            return TTest::undefined();
        }
        return TTest {
            t_stat: diff.signum() * f64::INFINITY,
            p_value: 0.0,
            df,
        };
    }

    let t_stat = diff / se;
    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * dist.sf(t_stat.abs()),
        Err(_) => f64::NAN,
    };

    TTest {
        t_stat,
        p_value,
        df,
    }
}

/// Unbiased (ddof = 1) sample variance.
fn sample_variance(xs: &[f64], mean: f64) -> f64 {
    xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (xs.len() - 1) as f64
}

// ---------------------------------------------------------------------------
// Pairwise emotion comparisons over a time window
// ---------------------------------------------------------------------------

/// One significant comparison, as written to the t-test results file.
#[derive(Debug, Clone, Serialize)]
pub struct TTestRow {
    pub time_bin: f64,
    pub emotion1: String,
    pub emotion2: String,
    pub t_stat: f64,
    pub p_value: f64,
}

/// One significant comparison, as written to the significant-times file.
#[derive(Debug, Clone, Serialize)]
pub struct SignificantTime {
    pub time_bin: f64,
    pub emotion1: String,
    pub emotion2: String,
    pub p_value: f64,
}

/// Result of the pairwise sweep.
#[derive(Debug, Clone)]
pub struct PairwiseOutcome {
    pub results: Vec<TTestRow>,
    pub significant: Vec<SignificantTime>,
    /// Comparisons entering the Bonferroni correction (pairs × time bins).
    pub n_comparisons: usize,
    pub adjusted_alpha: f64,
}

/// All unordered emotion pairs, in combination order.
pub fn emotion_pairs(emotions: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for i in 0..emotions.len() {
        for j in (i + 1)..emotions.len() {
            pairs.push((emotions[i].clone(), emotions[j].clone()));
        }
    }
    pairs
}

/// Run every emotion-pair comparison at every time bin inside the window,
/// against a Bonferroni-corrected alpha.
///
/// Only comparisons beating the corrected alpha are recorded.  With zero
/// comparisons (no pairs or no in-window bins) the outcome is empty and
/// `adjusted_alpha` is left at the uncorrected level.
pub fn pairwise_emotion_tests(
    table: &LongTable,
    window_start_ms: f64,
    window_end_ms: f64,
    alpha: f64,
) -> PairwiseOutcome {
    let in_window: Vec<_> = table
        .rows
        .iter()
        .filter(|r| r.time_bin >= window_start_ms && r.time_bin <= window_end_ms)
        .collect();

    // Unique in-window time bins, first-appearance order.
    let mut time_bins: Vec<f64> = Vec::new();
    for row in &in_window {
        if !time_bins.contains(&row.time_bin) {
            time_bins.push(row.time_bin);
        }
    }

    let pairs = emotion_pairs(&table.emotions);
    let n_comparisons = pairs.len() * time_bins.len();
    if n_comparisons == 0 {
        return PairwiseOutcome {
            results: Vec::new(),
            significant: Vec::new(),
            n_comparisons,
            adjusted_alpha: alpha,
        };
    }
    let adjusted_alpha = alpha / n_comparisons as f64;

    let mut results = Vec::new();
    let mut significant = Vec::new();

    for (emotion1, emotion2) in &pairs {
        for &time_bin in &time_bins {
            let values1 = values_at(&in_window, emotion1, time_bin);
            let values2 = values_at(&in_window, emotion2, time_bin);

            let test = t_test_ind(&values1, &values2);
            if test.p_value < adjusted_alpha {
                results.push(TTestRow {
                    time_bin,
                    emotion1: emotion1.clone(),
                    emotion2: emotion2.clone(),
                    t_stat: test.t_stat,
                    p_value: test.p_value,
                });
                significant.push(SignificantTime {
                    time_bin,
                    emotion1: emotion1.clone(),
                    emotion2: emotion2.clone(),
                    p_value: test.p_value,
                });
            }
        }
    }

    PairwiseOutcome {
        results,
        significant,
        n_comparisons,
        adjusted_alpha,
    }
}

fn values_at(rows: &[&Observation], emotion: &str, time_bin: f64) -> Vec<f64> {
    rows.iter()
        .filter(|r| r.emotion == emotion && r.time_bin == time_bin)
        .map(|r| r.pupil_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LongTable, Observation};

    #[test]
    fn t_test_matches_reference_values() {
        // t = -1.224745, p = 0.287864 for these samples (df = 4).
        let test = t_test_ind(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]);
        assert!((test.t_stat + 1.224_744_871).abs() < 1e-6);
        assert!((test.p_value - 0.287_864).abs() < 1e-4);
        assert_eq!(test.df, 4.0);
    }

    #[test]
    fn t_test_omits_nan_samples() {
        let with_nan = t_test_ind(&[1.0, 2.0, f64::NAN, 3.0], &[2.0, 3.0, 4.0]);
        let without = t_test_ind(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]);
        assert_eq!(with_nan.t_stat, without.t_stat);
        assert_eq!(with_nan.p_value, without.p_value);
    }

    #[test]
    fn identical_samples_are_not_significant() {
        let test = t_test_ind(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(test.t_stat, 0.0);
        assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_samples_give_nan() {
        assert!(t_test_ind(&[1.0], &[1.0, 2.0]).p_value.is_nan());
        assert!(t_test_ind(&[], &[1.0, 2.0]).t_stat.is_nan());
        // All-NaN side collapses below two samples.
        assert!(t_test_ind(&[f64::NAN, f64::NAN], &[1.0, 2.0]).p_value.is_nan());
    }

    #[test]
    fn zero_variance_distinct_means_is_infinitely_significant() {
        let test = t_test_ind(&[1.0, 1.0], &[2.0, 2.0]);
        assert!(test.t_stat.is_infinite());
        assert_eq!(test.p_value, 0.0);
    }

    #[test]
    fn emotion_pairs_are_in_combination_order() {
        let emotions = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let pairs = emotion_pairs(&emotions);
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn pairwise_sweep_finds_separated_emotions() {
        // Two emotions, three tasks each, well separated at 800 ms and
        // overlapping at 1000 ms.
        let mut rows = Vec::new();
        for (task, offset) in [("t1", 0.0), ("t2", 0.01), ("t3", 0.02)] {
            rows.push(obs(800.0, task, "calm", 0.1 + offset));
            rows.push(obs(800.0, task, "fear", 2.0 + offset));
            rows.push(obs(1000.0, task, "calm", 0.5 + offset));
            rows.push(obs(1000.0, task, "fear", 0.5 + offset));
        }
        let table = LongTable::from_rows(rows);

        let outcome = pairwise_emotion_tests(&table, 750.0, 2500.0, 0.05);
        // One pair × two bins.
        assert_eq!(outcome.n_comparisons, 2);
        assert!((outcome.adjusted_alpha - 0.025).abs() < 1e-12);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.significant.len(), 1);
        assert_eq!(outcome.significant[0].time_bin, 800.0);
        assert_eq!(outcome.significant[0].emotion1, "calm");
        assert_eq!(outcome.significant[0].emotion2, "fear");
    }

    #[test]
    fn empty_window_yields_empty_outcome() {
        let table = LongTable::from_rows(vec![obs(100.0, "t1", "calm", 0.2)]);
        let outcome = pairwise_emotion_tests(&table, 750.0, 2500.0, 0.05);
        assert_eq!(outcome.n_comparisons, 0);
        assert!(outcome.results.is_empty());
        assert!(outcome.significant.is_empty());
    }

    fn obs(time_bin: f64, task: &str, emotion: &str, value: f64) -> Observation {
        Observation {
            time_bin,
            condition: format!("{task}+{emotion}"),
            pupil_value: value,
            task: task.to_string(),
            emotion: emotion.to_string(),
        }
    }
}

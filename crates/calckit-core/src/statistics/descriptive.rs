use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata_f64, ComputationOutput};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsInput {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsOutput {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent values; empty when every value occurs once
    pub modes: Vec<f64>,
    pub population_variance: f64,
    pub population_std_dev: f64,
    /// Requires at least two values
    pub sample_variance: Option<f64>,
    pub sample_std_dev: Option<f64>,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a free-form list such as `"1, 2.5 3\n4"`.
pub fn parse_values(text: &str) -> CalcResult<Vec<f64>> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| CalcError::invalid("values", format!("'{t}' is not a number")))
        })
        .collect()
}

/// Linear-interpolated percentile of a sorted slice.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

fn modes_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        match runs.last_mut() {
            Some((last, n)) if *last == v => *n += 1,
            _ => runs.push((v, 1)),
        }
    }
    let top = runs.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if top <= 1 {
        return Vec::new();
    }
    runs.into_iter()
        .filter(|(_, n)| *n == top)
        .map(|(v, _)| v)
        .collect()
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// Descriptive statistics of a list of numbers.
pub fn calculate_statistics(
    input: &StatisticsInput,
) -> CalcResult<ComputationOutput<StatisticsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.values.is_empty() {
        return Err(CalcError::InsufficientData(
            "At least one value is required".into(),
        ));
    }
    if input.values.iter().any(|v| !v.is_finite()) {
        return Err(CalcError::invalid("values", "Values must be finite numbers"));
    }

    let mut sorted = input.values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let sum: f64 = sorted.iter().sum();
    let mean = sorted.iter().mean();
    let median = Data::new(sorted.clone()).median();
    let population_variance = sorted.iter().population_variance();

    let (sample_variance, sample_std_dev) = if count >= 2 {
        (Some(sorted.iter().variance()), Some(sorted.iter().std_dev()))
    } else {
        warnings.push("Sample variance needs at least two values".into());
        (None, None)
    };

    let q1 = percentile_sorted(&sorted, 25.0);
    let q3 = percentile_sorted(&sorted, 75.0);

    let output = StatisticsOutput {
        count,
        sum,
        min,
        max,
        range: max - min,
        mean,
        median,
        modes: modes_sorted(&sorted),
        population_variance,
        population_std_dev: population_variance.sqrt(),
        sample_variance,
        sample_std_dev,
        q1,
        q3,
        iqr: q3 - q1,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Descriptive statistics (quartiles by linear interpolation)",
        &serde_json::json!({ "count": count }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn stats(values: &[f64]) -> StatisticsOutput {
        calculate_statistics(&StatisticsInput {
            values: values.to_vec(),
        })
        .unwrap()
        .result
    }

    #[test]
    fn test_textbook_sample() {
        let out = stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(out.count, 8);
        assert!(close(out.sum, 40.0));
        assert!(close(out.mean, 5.0));
        assert!(close(out.median, 4.5));
        assert_eq!(out.modes, vec![4.0]);
        assert!(close(out.population_variance, 4.0));
        assert!(close(out.population_std_dev, 2.0));
        assert!(close(out.sample_variance.unwrap(), 32.0 / 7.0));
        assert!(close(out.range, 7.0));
    }

    #[test]
    fn test_quartiles() {
        let out = stats(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(close(out.q1, 2.0));
        assert!(close(out.q3, 4.0));
        assert!(close(out.iqr, 2.0));
        assert!(close(out.median, 3.0));
    }

    #[test]
    fn test_unique_values_have_no_mode() {
        let out = stats(&[3.0, 1.0, 2.0]);
        assert!(out.modes.is_empty());
        assert!(close(out.min, 1.0));
        assert!(close(out.max, 3.0));
    }

    #[test]
    fn test_multimodal() {
        let out = stats(&[1.0, 1.0, 2.0, 3.0, 3.0]);
        assert_eq!(out.modes, vec![1.0, 3.0]);
    }

    #[test]
    fn test_single_value() {
        let out = calculate_statistics(&StatisticsInput { values: vec![7.0] }).unwrap();
        assert!(out.result.sample_variance.is_none());
        assert!(close(out.result.population_variance, 0.0));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(calculate_statistics(&StatisticsInput { values: vec![] }).is_err());
        assert!(calculate_statistics(&StatisticsInput {
            values: vec![1.0, f64::NAN]
        })
        .is_err());
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("1, 2.5 3\n4").unwrap(), vec![1.0, 2.5, 3.0, 4.0]);
        assert!(parse_values("1, two").is_err());
    }
}

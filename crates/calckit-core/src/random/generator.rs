use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata_f64, ComputationOutput};
use crate::CalcResult;

/// Largest batch a single request may draw.
pub const MAX_COUNT: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomInput {
    /// Inclusive lower bound
    pub min: i64,
    /// Inclusive upper bound
    pub max: i64,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_allow_duplicates")]
    pub allow_duplicates: bool,
    #[serde(default)]
    pub sorted: bool,
    /// Optional seed for reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_count() -> u32 {
    1
}

fn default_allow_duplicates() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomOutput {
    pub numbers: Vec<i64>,
    /// Number of integers in `[min, max]`
    pub range_size: u64,
}

/// Uniform random integers in an inclusive range.
pub fn generate_random(input: &RandomInput) -> CalcResult<ComputationOutput<RandomOutput>> {
    let start = Instant::now();

    if input.min > input.max {
        return Err(CalcError::invalid("min", "Must not exceed max"));
    }
    if input.count == 0 || input.count > MAX_COUNT {
        return Err(CalcError::invalid(
            "count",
            format!("Must be between 1 and {MAX_COUNT}"),
        ));
    }

    // i128 so the full i64 span cannot overflow
    let span = (i128::from(input.max) - i128::from(input.min) + 1) as u128;
    let range_size = u64::try_from(span).unwrap_or(u64::MAX);

    let mut rng = match input.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let mut numbers: Vec<i64> = if input.allow_duplicates {
        (0..input.count)
            .map(|_| rng.gen_range(input.min..=input.max))
            .collect()
    } else {
        if span < u128::from(input.count) {
            return Err(CalcError::invalid(
                "count",
                format!(
                    "Cannot draw {} unique numbers from a range of {}",
                    input.count, span
                ),
            ));
        }
        match usize::try_from(span) {
            Ok(length) if length <= MAX_COUNT as usize * 100 => {
                index::sample(&mut rng, length, input.count as usize)
                    .into_iter()
                    .map(|i| input.min + i as i64)
                    .collect()
            }
            // Sparse draw from a huge range; rejection is cheap here
            _ => {
                let mut seen = std::collections::HashSet::new();
                let mut out = Vec::with_capacity(input.count as usize);
                while out.len() < input.count as usize {
                    let n = rng.gen_range(input.min..=input.max);
                    if seen.insert(n) {
                        out.push(n);
                    }
                }
                out
            }
        }
    };

    if input.sorted {
        numbers.sort_unstable();
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata_f64(
        "Uniform integer sampling (StdRng)",
        input,
        Vec::new(),
        elapsed,
        RandomOutput {
            numbers,
            range_size,
        },
    ))
}

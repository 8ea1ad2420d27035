//! Heuristic detector for hidden content.
//!
//! Two signals vote and both must agree:
//! - LSB balance over up to 5000 eligible AC coefficients in buffer order
//! - Shannon entropy of the full coefficient histogram
//!
//! This is a heuristic, not steganalysis.

use std::collections::HashMap;

use crate::coefficients::{is_eligible, lsb};

/// Upper bound on coefficients sampled for the LSB signal.
pub const LSB_SAMPLE_LIMIT: usize = 5000;
/// The LSB signal only votes when more than this many coefficients were sampled.
pub const LSB_MIN_SAMPLES: usize = 100;
/// Allowed deviation of the zero-LSB fraction from one half.
pub const LSB_BALANCE_TOLERANCE: f64 = 0.1;
/// Entropy (bits) above which the histogram signal votes.
pub const ENTROPY_THRESHOLD: f64 = 0.7;

/// Outcome of running both signals.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    /// Eligible coefficients sampled for the LSB signal.
    pub sampled: usize,
    /// Fraction of sampled coefficients with LSB 0, if anything was sampled.
    pub lsb_zero_ratio: Option<f64>,
    /// Shannon entropy of the coefficient value histogram.
    pub entropy: f64,
    pub lsb_vote: bool,
    pub entropy_vote: bool,
}

impl DetectionReport {
    /// Positive only when both signals vote.
    pub fn is_suspicious(&self) -> bool {
        self.lsb_vote && self.entropy_vote
    }
}

/// Run both signals over a buffer.
pub fn analyze(coefficients: &[i16]) -> DetectionReport {
    let (sampled, zeros) = coefficients
        .iter()
        .enumerate()
        .filter(|(i, &c)| is_eligible(c, *i))
        .take(LSB_SAMPLE_LIMIT)
        .fold((0usize, 0usize), |(n, z), (_, &c)| {
            (n + 1, z + usize::from(!lsb(c)))
        });

    let lsb_zero_ratio = (sampled > 0).then(|| zeros as f64 / sampled as f64);
    let lsb_vote = sampled > LSB_MIN_SAMPLES
        && lsb_zero_ratio.is_some_and(|r| (r - 0.5).abs() > LSB_BALANCE_TOLERANCE);

    let entropy = histogram_entropy(coefficients);

    DetectionReport {
        sampled,
        lsb_zero_ratio,
        entropy,
        lsb_vote,
        entropy_vote: entropy > ENTROPY_THRESHOLD,
    }
}

/// Shorthand for `analyze(coefficients).is_suspicious()`.
pub fn has_hidden_data(coefficients: &[i16]) -> bool {
    analyze(coefficients).is_suspicious()
}

/// `H = -sum(p * log2 p)` over distinct coefficient values.
pub fn histogram_entropy(coefficients: &[i16]) -> f64 {
    if coefficients.is_empty() {
        return 0.0;
    }

    let mut histogram: HashMap<i16, usize> = HashMap::new();
    for &c in coefficients {
        *histogram.entry(c).or_default() += 1;
    }

    let total = coefficients.len() as f64;
    histogram
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

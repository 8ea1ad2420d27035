//! Embedding sequence: the order in which AC coefficients are visited.
//!
//! The sequence is a seeded Fisher-Yates shuffle of every non-DC index. It
//! depends only on the buffer length and the seed, never on coefficient
//! values, so embedding and extraction rebuild the same order independently.
//!
//! # Note
//!
//! The seed is a fixed constant, not derived from the password. Placement of
//! the payload is therefore the same for every caller; only the keyed stream
//! in [`crate::cipher`] protects the content.

use fastrand::Rng;

use crate::coefficients::{is_dc_coefficient, is_eligible, BLOCK_SIZE};
use crate::error::{OutguessError, Result};
use crate::hash::fnv1a;

/// Seed shared by every embed and extract call.
pub const DEFAULT_SEED: &[u8] = b"outguess_seed_v2";

/// Pseudo-random visiting order over the AC indices of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingSequence {
    indices: Vec<usize>,
}

impl EmbeddingSequence {
    /// Build the sequence used by both engines for a buffer of `total_coefficients`.
    pub fn for_buffer(total_coefficients: usize) -> Self {
        Self::from_seed(DEFAULT_SEED, total_coefficients)
    }

    /// Create a sequence from seed bytes.
    ///
    /// # Arguments
    /// * `seed` - Seed bytes for deterministic shuffling
    /// * `total_coefficients` - Buffer length; every index below it that is not a multiple of 64 is included
    pub fn from_seed(seed: &[u8], total_coefficients: usize) -> Self {
        let mut rng = Rng::with_seed(fnv1a(seed));

        let dc_count = total_coefficients.div_ceil(BLOCK_SIZE);
        let mut indices = Vec::with_capacity(total_coefficients - dc_count);
        indices.extend((0..total_coefficients).filter(|&i| !is_dc_coefficient(i)));

        // Fisher-Yates shuffle
        for i in (1..indices.len()).rev() {
            let j = rng.usize(0..=i);
            indices.swap(i, j);
        }

        EmbeddingSequence { indices }
    }

    /// Number of AC indices in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The visiting order as a slice of buffer indices.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, usize>> {
        self.indices.iter().copied()
    }

    /// Fail unless this sequence was built for a buffer of `coefficients.len()`.
    pub fn check_buffer(&self, coefficients: &[i16]) -> Result<()> {
        let total = coefficients.len();
        let expected = total - total.div_ceil(BLOCK_SIZE);
        if self.len() != expected {
            return Err(OutguessError::invalid_input(format!(
                "sequence of {} indices does not match a buffer of {total} coefficients",
                self.len()
            )));
        }
        Ok(())
    }

    /// Walk the sequence, yielding only indices that are eligible in `coefficients`.
    ///
    /// Indices past the end of `coefficients` are skipped.
    pub fn eligible<'a>(&'a self, coefficients: &'a [i16]) -> EligibleCoefficients<'a> {
        EligibleCoefficients {
            coefficients,
            sequence: self,
            current: 0,
        }
    }
}

impl<'a> IntoIterator for &'a EmbeddingSequence {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over eligible coefficient indices in sequence order.
pub struct EligibleCoefficients<'a> {
    coefficients: &'a [i16],
    sequence: &'a EmbeddingSequence,
    current: usize,
}

impl Iterator for EligibleCoefficients<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current < self.sequence.len() {
            let idx = self.sequence.indices[self.current];
            self.current += 1;

            match self.coefficients.get(idx) {
                Some(&coeff) if is_eligible(coeff, idx) => return Some(idx),
                _ => {}
            }
        }
        None
    }
}

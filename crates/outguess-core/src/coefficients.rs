//! Coefficient buffer layout and the eligibility predicate.
//!
//! A buffer is a flat run of 8x8 blocks, 64 quantized DCT coefficients each.
//! Index 0 of every block is the DC term and is never touched.

/// Number of coefficients per transform block.
pub const BLOCK_SIZE: usize = 64;

/// Smallest magnitude a coefficient needs to carry a bit.
pub const MIN_MAGNITUDE: u16 = 2;

/// Check if an index is a DC coefficient (first of each 8x8 block).
#[inline]
pub fn is_dc_coefficient(index: usize) -> bool {
    index % BLOCK_SIZE == 0
}

/// Check if a coefficient can carry a payload bit.
///
/// This is evaluated against the current value, so a write that changes a
/// coefficient's magnitude also changes its eligibility.
#[inline]
pub fn is_eligible(coeff: i16, index: usize) -> bool {
    !is_dc_coefficient(index) && coeff.unsigned_abs() >= MIN_MAGNITUDE
}

/// Count eligible coefficients in a buffer.
pub fn count_eligible(coefficients: &[i16]) -> usize {
    coefficients
        .iter()
        .enumerate()
        .filter(|(i, &c)| is_eligible(c, *i))
        .count()
}

/// Least significant bit of a coefficient, two's complement.
#[inline]
pub fn lsb(coeff: i16) -> bool {
    coeff & 1 == 1
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Plausible quantized coefficients: large DC terms, AC terms mostly small with many zeros.
    pub fn generate_test_coefficients(block_count: usize) -> Vec<i16> {
        let mut rng = fastrand::Rng::with_seed(12345);
        let mut coeffs = Vec::with_capacity(block_count * super::BLOCK_SIZE);

        for _ in 0..block_count {
            coeffs.push(rng.i16(-500..500));

            for _ in 1..super::BLOCK_SIZE {
                let val = match rng.usize(0..10) {
                    0..=5 => 0,
                    6..=7 => rng.i16(-2..=2),
                    8 => rng.i16(-10..=10),
                    _ => rng.i16(-50..=50),
                };
                coeffs.push(val);
            }
        }
        coeffs
    }
}

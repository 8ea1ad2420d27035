//! CRC-32 (IEEE, reflected polynomial 0xEDB88320) over payload bytes.
//!
//! The lookup table is built at compile time and lives in read-only memory,
//! so concurrent callers share it without synchronization.
//! The table must be available without runtime initialization, which is why
//! this is a `const fn` table and not `crc32fast`; `tests/roundtrip.rs`
//! checks it against `crc32fast`.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Byte-indexed lookup table for the reflected CRC-32 polynomial.
pub static TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC-32 of `data` (initial value and final XOR 0xFFFFFFFF).
pub fn checksum(data: &[u8]) -> u32 {
    let crc = data.iter().fold(0xFFFF_FFFFu32, |crc, &byte| {
        TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8)
    });
    crc ^ 0xFFFF_FFFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_head() {
        assert_eq!(TABLE[0], 0x0000_0000);
        assert_eq!(TABLE[1], 0x7707_3096);
        assert_eq!(TABLE[2], 0xEE0E_612C);
        assert_eq!(TABLE[255], 0x2D02_EF8D);
    }

    #[test]
    fn test_check_value() {
        // standard CRC-32 check input
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn test_single_bit_change_changes_checksum() {
        let a = checksum(b"HELLO");
        let b = checksum(b"HELLN");
        assert_ne!(a, b);
    }
}

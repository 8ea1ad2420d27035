//! FNV-1a hashing for turning seed strings and passwords into integers.

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Hash bytes to u64 for RNG seeding.
pub(crate) fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ (byte as u64)).wrapping_mul(FNV_PRIME)
    })
}

/// Fold the 64-bit hash down to 32 bits so every input byte still reaches every key byte.
pub(crate) fn fnv1a_32(bytes: &[u8]) -> u32 {
    let hash = fnv1a(bytes);
    ((hash >> 32) ^ hash) as u32
}

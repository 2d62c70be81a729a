//! Random alphanumeric tokens for audit-log part boundaries.
//!
//! Each thread draws from its own `rand::thread_rng()`, so concurrent
//! transactions never contend on a shared generator lock.

use rand::RngCore;

const LETTERS: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Bits needed to index `LETTERS`.
const INDEX_BITS: u32 = 6;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;
/// Indices extracted from one 63-bit draw.
const INDICES_PER_DRAW: u32 = 63 / INDEX_BITS;

/// Length of the boundary used to separate audit-log parts.
pub const AUDIT_BOUNDARY_LEN: usize = 16;

/// Generate a string of `n` characters drawn uniformly from `[A-Za-z0-9]`.
pub fn random_string(n: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(n);

    let mut cache = rng.next_u64() >> 1;
    let mut remain = INDICES_PER_DRAW;
    while out.len() < n {
        if remain == 0 {
            cache = rng.next_u64() >> 1;
            remain = INDICES_PER_DRAW;
        }
        // 62 and 63 are rejected to keep the distribution uniform.
        let idx = (cache & INDEX_MASK) as usize;
        if let Some(&letter) = LETTERS.get(idx) {
            out.push(char::from(letter));
        }
        cache >>= INDEX_BITS;
        remain -= 1;
    }

    out
}

/// Boundary token for a new audit-log entry.
pub fn audit_boundary() -> String {
    random_string(AUDIT_BOUNDARY_LEN)
}

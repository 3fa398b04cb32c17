//! Stable digests of parsed databases.
//!
//! Benchmark runs are compared by the database they leave behind. The digest is
//! computed over the canonical dump rendering of a [`Database`], so two dumps
//! that differ only in whitespace, `.` terminators or numeric spelling
//! (`+3` vs `3`) digest the same.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! Not a security primitive.

use crate::database::Database;

/// Prefix used in serialized digests.
pub const DATABASE_DIGEST_V1_PREFIX: &str = "fnv1a64:";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

/// FNV-1a 64-bit over arbitrary bytes.
pub fn fnv1a64_digest_bytes(bytes: &[u8]) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for b in bytes {
        hash ^= (*b) as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }

    format!("{DATABASE_DIGEST_V1_PREFIX}{hash:016x}")
}

pub fn database_digest_v1(db: &Database) -> String {
    fnv1a64_digest_bytes(db.to_string().as_bytes())
}

//! Canonical scalar derivation shared by both curves.
//!
//! Every byte string that becomes a scalar (key seeds, per-signer weights, transcript
//! challenges, cache keys) is hashed with SHA-256 and then passed through
//! [reduce_mod_order_by_rehash]. The loop reads 32 bytes as a big-endian integer and, while that
//! integer is not below the group order, replaces the bytes with their SHA-256 digest.
//!
//! # Compatibility
//!
//! The hash function and the retry loop are part of the derivation of every key, signature
//! weight, and challenge produced by this crate. Substituting either (for example, reducing
//! modulo the order instead of rehashing) silently changes previously derived values.

use sha2::{Digest, Sha256};

/// Length of a canonical scalar encoding (big-endian).
pub const SCALAR_LENGTH: usize = 32;

/// Length of a [hash] digest.
pub const DIGEST_LENGTH: usize = 32;

/// A scalar that can be parsed from a canonical big-endian encoding.
pub trait CanonicalScalar: Sized {
    /// Returns the scalar if `bytes` encodes an integer strictly below the group order.
    fn from_canonical(bytes: &[u8; SCALAR_LENGTH]) -> Option<Self>;
}

/// Hashes `data` with the fixed hash function (SHA-256).
pub fn hash(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    Sha256::digest(data).into()
}

/// Hashes the concatenation of `parts` with the fixed hash function (SHA-256).
pub fn hash_parts(parts: &[&[u8]]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Interprets `bytes` as a big-endian integer and rehashes until it is below the group order.
///
/// Inputs shorter than [SCALAR_LENGTH] are left-padded with zeros. Longer inputs cannot be
/// canonical and are hashed once before the first attempt.
pub fn reduce_mod_order_by_rehash<S: CanonicalScalar>(bytes: &[u8]) -> S {
    let mut candidate = [0u8; SCALAR_LENGTH];
    if bytes.len() <= SCALAR_LENGTH {
        candidate[SCALAR_LENGTH - bytes.len()..].copy_from_slice(bytes);
    } else {
        candidate = hash(bytes);
    }
    loop {
        if let Some(scalar) = S::from_canonical(&candidate) {
            return scalar;
        }
        candidate = hash(&candidate);
    }
}

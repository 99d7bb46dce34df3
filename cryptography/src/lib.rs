//! Sign messages as a weighted committee and prove committed values are in range.
//!
//! [bls] implements committee-weighted BLS multisignatures over BN254: every signature is
//! scaled by a weight derived from the signer's key and the full committee, so a combined
//! signature verifies only against the weighted aggregate of the signers' public keys.
//!
//! [bulletproofs] implements aggregated range proofs over BN254: a single proof of logarithmic
//! size shows that up to 32 Pedersen-committed values each lie in `[0, 2^64)`.
//!
//! # Status
//!
//! `privcore-cryptography` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

pub mod bls;
pub mod bulletproofs;
pub mod field;

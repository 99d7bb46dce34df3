//! Committee-weighted BLS multisignatures over BN254.
//!
//! Signatures are elements of G1 (32 bytes compressed) and public keys are elements of G2 (128
//! bytes uncompressed). Every member of an ordered committee signs with a weight derived from
//! its own key and the full committee, which prevents rogue-key attacks without requiring a
//! proof of possession for each key.
//!
//! # Example
//!
//! ```rust
//! use privcore_cryptography::bls::{
//!     cache::{AggregationCache, Config},
//!     keygen, ops::{combine, sign, verify},
//! };
//!
//! // Generate a committee
//! let (secrets, committee): (Vec<_>, Vec<_>) =
//!     (0u8..4).map(|i| keygen(&[i])).unzip();
//!
//! // Each member signs with its committee weight
//! let message = [0, 1, 2, 3, 4];
//! let shares: Vec<_> = secrets
//!     .iter()
//!     .enumerate()
//!     .map(|(i, sk)| sign(&message, &sk.to_bytes(), i, &committee).unwrap())
//!     .collect();
//!
//! // Combine the shares and verify them against the signer set
//! let signature = combine(&shares).unwrap();
//! let cache = AggregationCache::new(Config::default());
//! assert!(verify(&signature, &message, &[0, 1, 2, 3], &committee, Some(&cache), 2).unwrap());
//! ```

pub mod aggregate;
pub mod cache;
pub mod group;
pub mod keys;
pub mod ops;

pub use keys::{keygen, PublicKey, SecretKey, Signature};
use thiserror::Error;

/// Errors that can occur when signing or verifying.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid private key (length {0})")]
    InvalidPrivateKey(usize),
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid committee info: {0}")]
    InvalidCommitteeInfo(&'static str),
    #[error("unable to decompress signature: {0}")]
    DecompressFromByte(group::Error),
    #[error("aggregation cache closed")]
    CacheClosed,
}

impl Error {
    /// Returns the stable numeric code of the error.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPrivateKey(_) => 1001,
            Error::InvalidPublicKey => 1002,
            Error::InvalidCommitteeInfo(_) => 1003,
            Error::DecompressFromByte(_) => 1004,
            Error::CacheClosed => 1005,
        }
    }
}

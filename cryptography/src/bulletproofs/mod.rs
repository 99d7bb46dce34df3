//! Aggregated range proofs over BN254.
//!
//! An [range::AggregatedRangeProof] shows that each of up to [MAX_OUTPUT_COIN] Pedersen-committed
//! values lies in `[0, 2^MAX_EXP)`. The final step of the protocol is compressed with the
//! logarithmic-size inner-product argument in [ipa].
//!
//! # Example
//!
//! ```rust
//! use privcore_cryptography::bulletproofs::{
//!     curve::Scalar,
//!     range::{AggregatedRangeProof, AggregatedRangeWitness},
//! };
//! use ark_ff::UniformRand;
//! use rand::thread_rng;
//!
//! // Commit to two values and prove they are in range
//! let mut rng = thread_rng();
//! let witness = AggregatedRangeWitness::new(
//!     vec![7, u64::MAX],
//!     vec![Scalar::rand(&mut rng), Scalar::rand(&mut rng)],
//! )
//! .unwrap();
//! let proof = AggregatedRangeProof::prove(&witness, &mut rng).unwrap();
//!
//! // Send the proof over the wire and verify it
//! let bytes = proof.to_bytes();
//! let proof = AggregatedRangeProof::from_bytes(&bytes).unwrap();
//! proof.verify_faster().unwrap();
//! ```

pub mod curve;
pub mod generators;
pub mod ipa;
pub mod range;
pub mod transcript;
pub mod util;

use commonware_codec::Error as CodecError;
use thiserror::Error;

/// Bit length of every committed value.
pub const MAX_EXP: usize = 64;

/// Maximum number of values in a single aggregated proof.
pub const MAX_OUTPUT_COIN: usize = 32;

/// Errors that can occur when proving or verifying.
#[derive(Error, Debug)]
pub enum Error {
    #[error("proof size exceeded: {0} values (max {MAX_OUTPUT_COIN})")]
    ProofSizeExceeded(usize),
    #[error("vector length mismatch: expected {expected}, got {actual}")]
    VectorLengthMismatch { expected: usize, actual: usize },
    #[error("malformed proof bytes: {0}")]
    MalformedProofBytes(CodecError),
    #[error("point decompression failed: {0}")]
    Decompression(#[from] curve::Error),
    #[error("algebraic check failed: {0}")]
    AlgebraicCheckFailed(&'static str),
    #[error("degenerate challenge")]
    DegenerateChallenge,
    #[error("batch member {index}: {source}")]
    BatchMember { index: usize, source: Box<Error> },
}

impl Error {
    /// Returns the stable numeric code of the error.
    pub fn code(&self) -> u32 {
        match self {
            Error::ProofSizeExceeded(_) => 2001,
            Error::VectorLengthMismatch { .. } => 2002,
            Error::MalformedProofBytes(_) => 2003,
            Error::Decompression(_) => 2004,
            Error::AlgebraicCheckFailed(_) => 2005,
            Error::DegenerateChallenge => 2006,
            Error::BatchMember { .. } => 2007,
        }
    }

    /// Returns whether the error is a failed verification equation (as opposed to malformed
    /// input).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::AlgebraicCheckFailed(_))
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        // Surface point decoding failures as decompression errors
        match err {
            CodecError::Wrapped(context, inner) => match inner.downcast::<curve::Error>() {
                Ok(err) => Error::Decompression(*err),
                Err(inner) => Error::MalformedProofBytes(CodecError::Wrapped(context, inner)),
            },
            err => Error::MalformedProofBytes(err),
        }
    }
}

//! Running Fiat-Shamir state shared by the range and inner-product arguments.
//!
//! The state opens with a version tag and the compressed `cs` point. Every absorbed item is
//! framed as `kind || u32_be(len(label)) || label || payload`, where `kind` names the payload
//! encoding. A challenge is `reduce(SHA-256(state))` and its 32-byte encoding is appended to the
//! state before it is returned.

use super::curve::{compress, scalar_to_bytes, Point, Scalar};
use crate::field::{hash, reduce_mod_order_by_rehash};

/// Version tag that opens every transcript.
const DST_BULLETPROOFS: &[u8] = b"PRIVCORE_BULLETPROOFS_V1";

// Payload kinds
const DST_CHALLENGE: &[u8] = b"challenge";
const DST_POINT: &[u8] = b"point";
const DST_SCALAR: &[u8] = b"scalar";
const DST_BYTES: &[u8] = b"bytes";

/// Accumulated prover/verifier messages, in protocol order.
///
/// Prover and verifier must absorb identical items in identical order to derive the same
/// challenges.
#[derive(Clone)]
pub struct Transcript {
    state: Vec<u8>,
}

impl Transcript {
    /// Creates a new transcript seeded with the protocol point `cs`.
    pub fn new(cs: &Point) -> Self {
        let mut state = Vec::new();
        state.extend_from_slice(DST_BULLETPROOFS);
        state.extend_from_slice(compress(cs).as_bytes());
        Self { state }
    }

    fn append_label(&mut self, dst: &[u8], label: &[u8]) {
        self.state.extend_from_slice(dst);
        self.state.extend_from_slice(&(label.len() as u32).to_be_bytes());
        self.state.extend_from_slice(label);
    }

    /// Appends a point to the transcript.
    pub fn append_point(&mut self, label: &[u8], point: &Point) {
        self.append_label(DST_POINT, label);
        self.state.extend_from_slice(compress(point).as_bytes());
    }

    /// Appends a scalar to the transcript.
    pub fn append_scalar(&mut self, label: &[u8], scalar: &Scalar) {
        self.append_label(DST_SCALAR, label);
        self.state.extend_from_slice(&scalar_to_bytes(scalar));
    }

    /// Appends a u64 to the transcript.
    pub fn append_u64(&mut self, label: &[u8], value: u64) {
        self.append_label(DST_BYTES, label);
        self.state.extend_from_slice(&value.to_be_bytes());
    }

    /// Generates a challenge scalar from the current transcript state.
    ///
    /// The challenge is absorbed back into the transcript, so every later challenge depends on
    /// it.
    pub fn challenge_scalar(&mut self, label: &[u8]) -> Scalar {
        self.append_label(DST_CHALLENGE, label);
        let challenge: Scalar = reduce_mod_order_by_rehash(&hash(&self.state));
        self.state.extend_from_slice(&scalar_to_bytes(&challenge));
        challenge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::Group;

    #[test]
    fn test_transcript_determinism() {
        let mut t1 = Transcript::new(&Point::generator());
        let mut t2 = Transcript::new(&Point::generator());

        let point = Point::generator();
        t1.append_point(b"P", &point);
        t2.append_point(b"P", &point);

        let c1 = t1.challenge_scalar(b"c");
        let c2 = t2.challenge_scalar(b"c");
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_transcript_different_seeds() {
        let mut t1 = Transcript::new(&Point::generator());
        let mut t2 = Transcript::new(&Point::generator().double());

        let c1 = t1.challenge_scalar(b"c");
        let c2 = t2.challenge_scalar(b"c");
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_transcript_chained_challenges() {
        let mut t = Transcript::new(&Point::generator());
        let c1 = t.challenge_scalar(b"c");
        let c2 = t.challenge_scalar(b"c");
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_transcript_order_matters() {
        let a = Point::generator();
        let b = a.double();

        let mut t1 = Transcript::new(&a);
        t1.append_point(b"A", &a);
        t1.append_point(b"S", &b);

        let mut t2 = Transcript::new(&a);
        t2.append_point(b"S", &b);
        t2.append_point(b"A", &a);

        assert_ne!(t1.challenge_scalar(b"y"), t2.challenge_scalar(b"y"));
    }

    #[test]
    fn test_transcript_labels_matter() {
        let mut t1 = Transcript::new(&Point::generator());
        t1.append_u64(b"m", 1);
        t1.append_scalar(b"s", &Scalar::from(2u64));

        let mut t2 = Transcript::new(&Point::generator());
        t2.append_u64(b"n", 1);
        t2.append_scalar(b"s", &Scalar::from(2u64));

        assert_ne!(t1.challenge_scalar(b"c"), t2.challenge_scalar(b"c"));
    }
}

//! Group operations over BN254.
//!
//! Signatures live in G1 and public keys in G2. G1 elements travel in the same parity-bit
//! compressed form as range-proof points: the 32-byte big-endian x-coordinate with the
//! most-significant bit of the first byte set when y is odd. G2 elements travel uncompressed
//! (128 bytes): `x.c1 || x.c0 || y.c1 || y.c0`, each coordinate 32 bytes big-endian.
//!
//! # Warning
//!
//! Ensure that points are checked to belong to the correct subgroup (G1 or G2) to prevent small
//! subgroup attacks. This is already taken care of for you if you use [G1::decompress] and
//! [G2::deserialize].

use crate::{
    bulletproofs::curve::{self, hash_to_point, to_be_bytes},
    field::{reduce_mod_order_by_rehash, CanonicalScalar, SCALAR_LENGTH},
};
use ark_bn254::{Bn254, Fq, Fq2, Fr, G1Projective, G2Affine, G2Projective};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup, Group,
};
use ark_ff::{One, Zero};
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroize;

/// Length of a base field element (big-endian).
const FP_LENGTH: usize = 32;

/// Length of a parity-bit compressed G1 element.
pub const G1_COMPRESSED_LENGTH: usize = curve::POINT_LENGTH;

/// Length of an uncompressed G2 element.
pub const G2_UNCOMPRESSED_LENGTH: usize = 4 * FP_LENGTH;

/// Domain separation tag for hashing a message to G1.
pub const DST_G1: &[u8] = b"PRIVCORE_BLS_SIG_BN254G1_SHA-256_TAI_";

/// Errors that can occur when decoding a group element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("coordinate is not a canonical field element")]
    NonCanonical,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
    #[error("point is the identity")]
    Identity,
}

impl From<curve::Error> for Error {
    fn from(err: curve::Error) -> Self {
        match err {
            curve::Error::InvalidLength { expected, actual } => {
                Error::InvalidLength { expected, actual }
            }
            curve::Error::NonCanonical => Error::NonCanonical,
            curve::Error::NotOnCurve => Error::NotOnCurve,
            curve::Error::NotInSubgroup => Error::NotInSubgroup,
        }
    }
}

/// An element of the BN254 scalar field.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(transparent)]
pub struct Scalar(Fr);

impl Scalar {
    /// Returns the additive identity.
    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    /// Returns the multiplicative identity.
    pub fn one() -> Self {
        Self(Fr::one())
    }

    /// Samples a scalar by reducing 32 random bytes.
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SCALAR_LENGTH];
        rng.fill_bytes(&mut bytes);
        reduce_mod_order_by_rehash(&bytes)
    }

    /// Adds to self in-place.
    pub fn add(&mut self, rhs: &Self) {
        self.0 += rhs.0;
    }

    /// Multiplies self in-place.
    pub fn mul(&mut self, rhs: &Self) {
        self.0 *= rhs.0;
    }

    /// Canonically serializes the scalar (big-endian).
    pub fn to_bytes(&self) -> [u8; SCALAR_LENGTH] {
        to_be_bytes(&self.0)
    }
}

impl CanonicalScalar for Scalar {
    fn from_canonical(bytes: &[u8; SCALAR_LENGTH]) -> Option<Self> {
        Fr::from_canonical(bytes).map(Self)
    }
}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// An element of G1 (the signature group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct G1(G1Projective);

impl G1 {
    /// Returns the identity.
    pub fn zero() -> Self {
        Self(G1Projective::zero())
    }

    /// Returns the generator.
    pub fn one() -> Self {
        Self(G1Projective::generator())
    }

    /// Returns whether the element is the identity.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds to self in-place.
    pub fn add(&mut self, rhs: &Self) {
        self.0 += rhs.0;
    }

    /// Multiplies self in-place.
    pub fn mul(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }

    /// Maps `message` to G1 (try-and-increment over `DST_G1 || message`).
    pub fn hash(message: &[u8]) -> Self {
        let mut data = Vec::with_capacity(DST_G1.len() + message.len());
        data.extend_from_slice(DST_G1);
        data.extend_from_slice(message);
        Self(hash_to_point(&data))
    }

    /// Compresses the element into its x-coordinate and the parity of y.
    ///
    /// The identity compresses to all zeros.
    pub fn compress(&self) -> [u8; G1_COMPRESSED_LENGTH] {
        *curve::compress(&self.0).as_bytes()
    }

    /// Recovers an element from its compressed form.
    pub fn decompress(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(curve::decompress(bytes)?))
    }
}

/// An element of G2 (the public key group).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct G2(G2Projective);

fn write_fq2(out: &mut [u8], value: &Fq2) {
    out[..FP_LENGTH].copy_from_slice(&to_be_bytes(&value.c1));
    out[FP_LENGTH..].copy_from_slice(&to_be_bytes(&value.c0));
}

fn read_fq2(bytes: &[u8]) -> Result<Fq2, Error> {
    let read_fq = |chunk: &[u8]| -> Result<Fq, Error> {
        let mut raw = [0u8; FP_LENGTH];
        raw.copy_from_slice(chunk);
        Fq::from_canonical(&raw).ok_or(Error::NonCanonical)
    };
    let c1 = read_fq(&bytes[..FP_LENGTH])?;
    let c0 = read_fq(&bytes[FP_LENGTH..])?;
    Ok(Fq2::new(c0, c1))
}

impl G2 {
    /// Returns the identity.
    pub fn zero() -> Self {
        Self(G2Projective::zero())
    }

    /// Returns the generator.
    pub fn one() -> Self {
        Self(G2Projective::generator())
    }

    /// Returns whether the element is the identity.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds to self in-place.
    pub fn add(&mut self, rhs: &Self) {
        self.0 += rhs.0;
    }

    /// Multiplies self in-place.
    pub fn mul(&mut self, rhs: &Scalar) {
        self.0 *= rhs.0;
    }

    /// Serializes the element uncompressed. The identity serializes to all zeros.
    pub fn serialize(&self) -> [u8; G2_UNCOMPRESSED_LENGTH] {
        let mut bytes = [0u8; G2_UNCOMPRESSED_LENGTH];
        if let Some((x, y)) = self.0.into_affine().xy() {
            let (x_bytes, y_bytes) = bytes.split_at_mut(2 * FP_LENGTH);
            write_fq2(x_bytes, x);
            write_fq2(y_bytes, y);
        }
        bytes
    }

    /// Deserializes an uncompressed element, rejecting the identity and points outside G2.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != G2_UNCOMPRESSED_LENGTH {
            return Err(Error::InvalidLength {
                expected: G2_UNCOMPRESSED_LENGTH,
                actual: bytes.len(),
            });
        }
        if bytes.iter().all(|b| *b == 0) {
            return Err(Error::Identity);
        }
        let x = read_fq2(&bytes[..2 * FP_LENGTH])?;
        let y = read_fq2(&bytes[2 * FP_LENGTH..])?;

        let affine = G2Affine::new_unchecked(x, y);
        if !affine.is_on_curve() {
            return Err(Error::NotOnCurve);
        }

        // G2 has a large cofactor, so membership must be checked explicitly
        if !affine.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::NotInSubgroup);
        }
        Ok(Self(affine.into_group()))
    }
}

/// An element of the target group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GT(PairingOutput<Bn254>);

/// Computes `e(p, q)`.
pub fn pairing(p: &G1, q: &G2) -> GT {
    GT(Bn254::pairing(p.0, q.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, thread_rng, Rng, SeedableRng};

    /// Bit of the first byte that carries the parity of y.
    const PARITY_BIT: u8 = 0x80;

    fn random_g1<R: Rng>(rng: &mut R) -> G1 {
        let mut p = G1::one();
        p.mul(&Scalar::random(rng));
        p
    }

    #[test]
    fn basic_group() {
        let s = Scalar::random(&mut thread_rng());
        let mut s2 = s;
        s2.add(&s);

        // p1 = s2 * G = (s+s)G
        let mut p1 = G1::one();
        p1.mul(&s2);

        // p2 = sG + sG = s2 * G
        let mut p2 = G1::one();
        p2.mul(&s);
        p2.add(&p2.clone());
        assert_eq!(p1, p2);
    }

    #[test]
    fn test_scalar_canonical_round_trip() {
        let s = Scalar::random(&mut thread_rng());
        assert_eq!(Scalar::from_canonical(&s.to_bytes()), Some(s));
        assert_eq!(Scalar::from_canonical(&[0xff; SCALAR_LENGTH]), None);
        assert_eq!(
            reduce_mod_order_by_rehash::<Scalar>(&[1]).to_bytes()[SCALAR_LENGTH - 1],
            1
        );
    }

    #[test]
    fn test_encoding_lengths() {
        assert_eq!(G1_COMPRESSED_LENGTH, 32);
        assert_eq!(G2_UNCOMPRESSED_LENGTH, 128);
    }

    #[test]
    fn test_compression_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let (mut odd, mut even) = (0, 0);
        for _ in 0..2_000 {
            let p = random_g1(&mut rng);
            let compressed = p.compress();
            if compressed[0] & PARITY_BIT != 0 {
                odd += 1;
            } else {
                even += 1;
            }
            assert_eq!(G1::decompress(&compressed).unwrap(), p);
        }
        assert!(odd > 0 && even > 0);
    }

    #[test]
    fn test_compression_negation_flips_parity() {
        let p = random_g1(&mut thread_rng());
        let compressed = p.compress();
        let mut flipped = compressed;
        flipped[0] ^= PARITY_BIT;
        let q = G1::decompress(&flipped).unwrap();
        assert_ne!(p, q);

        let mut sum = p;
        sum.add(&q);
        assert!(sum.is_zero());
    }

    #[test]
    fn test_compression_identity() {
        let compressed = G1::zero().compress();
        assert_eq!(compressed, [0u8; G1_COMPRESSED_LENGTH]);
        assert!(G1::decompress(&compressed).unwrap().is_zero());
    }

    #[test]
    fn test_decompress_rejects_malformed() {
        assert_eq!(
            G1::decompress(&[1u8; 31]),
            Err(Error::InvalidLength {
                expected: 32,
                actual: 31
            })
        );

        // x = 2^255 - 1 exceeds the field modulus
        let mut too_large = [0xffu8; G1_COMPRESSED_LENGTH];
        too_large[0] = 0x7f;
        assert_eq!(G1::decompress(&too_large), Err(Error::NonCanonical));

        // x = 0 gives y^2 = 3, which has no root
        let mut zero_x = [0u8; G1_COMPRESSED_LENGTH];
        zero_x[0] = PARITY_BIT;
        assert_eq!(G1::decompress(&zero_x), Err(Error::NotOnCurve));
    }

    #[test]
    fn test_hash_to_g1() {
        let p = G1::hash(b"message");
        assert_eq!(p, G1::hash(b"message"));
        assert_ne!(p, G1::hash(b"other message"));
        assert!(!p.is_zero());

        // The tag separates BLS hashing from plain hash-to-point
        assert_ne!(p.0, hash_to_point(b"message"));
    }

    #[test]
    fn test_g2_serialize_round_trip() {
        let mut p = G2::one();
        p.mul(&Scalar::random(&mut thread_rng()));
        let bytes = p.serialize();
        assert_eq!(bytes.len(), 128);
        assert_eq!(G2::deserialize(&bytes).unwrap(), p);

        assert_eq!(
            G2::deserialize(&G2::zero().serialize()),
            Err(Error::Identity)
        );
        assert!(G2::deserialize(&bytes[1..]).is_err());
    }

    #[test]
    fn test_g2_deserialize_rejects_malformed() {
        let bytes = G2::one().serialize();

        // Coordinate above the field modulus
        let mut non_canonical = bytes;
        non_canonical[..FP_LENGTH].copy_from_slice(&[0xff; FP_LENGTH]);
        assert_eq!(G2::deserialize(&non_canonical), Err(Error::NonCanonical));

        // Perturbed y
        let mut off_curve = bytes;
        off_curve[G2_UNCOMPRESSED_LENGTH - 1] ^= 1;
        assert_eq!(G2::deserialize(&off_curve), Err(Error::NotOnCurve));
    }

    #[test]
    fn test_pairing_bilinearity() {
        let mut rng = thread_rng();
        let (a, b) = (Scalar::random(&mut rng), Scalar::random(&mut rng));

        let mut p = G1::one();
        p.mul(&a);
        let mut q = G2::one();
        q.mul(&b);

        let mut ab = a;
        ab.mul(&b);
        let mut pq = G1::one();
        pq.mul(&ab);

        assert_eq!(pairing(&p, &q), pairing(&pq, &G2::one()));
        assert_ne!(pairing(&p, &q), pairing(&G1::one(), &G2::one()));
    }
}

//! Scalars and points of BN254 G1 with parity-bit compression.
//!
//! A compressed point is the 32-byte big-endian x-coordinate with the most-significant bit of the
//! first byte set when y is odd. The identity compresses to all zeros (`x = 0` is never on the
//! curve because 3 is not a square modulo p).

use crate::field::{hash_parts, reduce_mod_order_by_rehash, CanonicalScalar, SCALAR_LENGTH};
use ark_bn254::{Fq, Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, BigInteger, Field, PrimeField, UniformRand, Zero};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use commonware_utils::hex;
use rand::{CryptoRng, RngCore};
use std::fmt::{Debug, Formatter};
use thiserror::Error;

/// An element of the BN254 scalar field.
pub type Scalar = Fr;

/// An element of BN254 G1.
pub type Point = G1Projective;

/// Length of a compressed point.
pub const POINT_LENGTH: usize = 32;

/// Bit of the first byte that carries the parity of y.
const PARITY_BIT: u8 = 0x80;

/// Errors that can occur when decompressing a point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("x-coordinate is not a canonical field element")]
    NonCanonical,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
}

fn bigint_from_be(bytes: &[u8; SCALAR_LENGTH]) -> BigInt<4> {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(limb);
    }
    BigInt::new(limbs)
}

/// Returns the canonical big-endian encoding of a field element.
pub(crate) fn to_be_bytes<F: PrimeField>(value: &F) -> [u8; SCALAR_LENGTH] {
    let mut out = [0u8; SCALAR_LENGTH];
    let bytes = value.into_bigint().to_bytes_be();
    out[SCALAR_LENGTH - bytes.len()..].copy_from_slice(&bytes);
    out
}

impl CanonicalScalar for Fr {
    fn from_canonical(bytes: &[u8; SCALAR_LENGTH]) -> Option<Self> {
        Fr::from_bigint(bigint_from_be(bytes))
    }
}

impl CanonicalScalar for Fq {
    fn from_canonical(bytes: &[u8; SCALAR_LENGTH]) -> Option<Self> {
        Fq::from_bigint(bigint_from_be(bytes))
    }
}

/// Returns the canonical big-endian encoding of `scalar`.
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LENGTH] {
    to_be_bytes(scalar)
}

/// Parses a canonical big-endian scalar.
pub fn scalar_from_bytes(bytes: &[u8; SCALAR_LENGTH]) -> Option<Scalar> {
    Scalar::from_canonical(bytes)
}

/// Samples a uniformly random non-zero scalar.
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Scalar::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

/// Returns `x^3 + 3`.
fn curve_rhs(x: &Fq) -> Fq {
    x.square() * x + Fq::from(3u64)
}

/// Returns a square root of `value` computed as `value^((p+1)/4)` (valid because `p = 3 mod 4`).
fn sqrt(value: &Fq) -> Option<Fq> {
    let mut exponent = Fq::MODULUS;
    exponent.add_with_carry(&BigInt::from(1u64));
    exponent.div2();
    exponent.div2();

    let root = value.pow(exponent);
    (root.square() == *value).then_some(root)
}

fn is_odd(value: &Fq) -> bool {
    value.into_bigint().is_odd()
}

/// A compressed point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPoint([u8; POINT_LENGTH]);

impl CompressedPoint {
    /// Wraps 32 bytes, checking only the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: [u8; POINT_LENGTH] = bytes.try_into().map_err(|_| Error::InvalidLength {
            expected: POINT_LENGTH,
            actual: bytes.len(),
        })?;
        Ok(Self(raw))
    }

    /// Returns the compressed encoding.
    pub fn as_bytes(&self) -> &[u8; POINT_LENGTH] {
        &self.0
    }

    /// Recovers the point, rejecting non-canonical x-coordinates and points off the curve.
    pub fn decompress(&self) -> Result<Point, Error> {
        if self.0.iter().all(|b| *b == 0) {
            return Ok(Point::zero());
        }

        // Split the parity bit from the x-coordinate
        let mut raw = self.0;
        let odd = raw[0] & PARITY_BIT != 0;
        raw[0] &= !PARITY_BIT;
        let x = Fq::from_canonical(&raw).ok_or(Error::NonCanonical)?;

        // Recover y and fix its parity
        let mut y = sqrt(&curve_rhs(&x)).ok_or(Error::NotOnCurve)?;
        if is_odd(&y) != odd {
            y = -y;
        }

        let affine = G1Affine::new_unchecked(x, y);
        if !affine.is_on_curve() {
            return Err(Error::NotOnCurve);
        }
        if !affine.is_in_correct_subgroup_assuming_on_curve() {
            return Err(Error::NotInSubgroup);
        }
        Ok(affine.into_group())
    }
}

impl From<&Point> for CompressedPoint {
    fn from(point: &Point) -> Self {
        let mut out = [0u8; POINT_LENGTH];
        let affine = point.into_affine();
        if let Some((x, y)) = affine.xy() {
            out = to_be_bytes(x);
            if is_odd(y) {
                out[0] |= PARITY_BIT;
            }
        }
        Self(out)
    }
}

impl Debug for CompressedPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

impl Write for CompressedPoint {
    fn write(&self, buf: &mut impl BufMut) {
        self.0.write(buf);
    }
}

impl Read for CompressedPoint {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        Ok(Self(<[u8; Self::SIZE]>::read(buf)?))
    }
}

impl FixedSize for CompressedPoint {
    const SIZE: usize = POINT_LENGTH;
}

/// Compresses `point`.
pub fn compress(point: &Point) -> CompressedPoint {
    CompressedPoint::from(point)
}

/// Decompresses a 32-byte encoding.
pub fn decompress(bytes: &[u8]) -> Result<Point, Error> {
    CompressedPoint::from_bytes(bytes)?.decompress()
}

/// Writes the compressed form of `point`.
pub(crate) fn write_point(point: &Point, buf: &mut impl BufMut) {
    compress(point).write(buf);
}

/// Reads and decompresses a point.
pub(crate) fn read_point(buf: &mut impl Buf) -> Result<Point, CodecError> {
    CompressedPoint::read(buf)?
        .decompress()
        .map_err(|err| CodecError::Wrapped("Point", err.into()))
}

/// Writes the canonical encoding of `scalar`.
pub(crate) fn write_scalar(scalar: &Scalar, buf: &mut impl BufMut) {
    scalar_to_bytes(scalar).write(buf);
}

/// Reads a canonical scalar.
pub(crate) fn read_scalar(buf: &mut impl Buf) -> Result<Scalar, CodecError> {
    let raw = <[u8; SCALAR_LENGTH]>::read(buf)?;
    scalar_from_bytes(&raw).ok_or(CodecError::Invalid("Scalar", "not canonical"))
}

/// Deterministically maps `data` to a point with unknown discrete logarithm.
///
/// Try-and-increment: `x = reduce(SHA-256(data || u32_be(counter)))` for counter `0, 1, ...`
/// until `x^3 + 3` is a square, then takes the even root.
pub fn hash_to_point(data: &[u8]) -> Point {
    let mut counter = 0u32;
    loop {
        let digest = hash_parts(&[data, &counter.to_be_bytes()]);
        let x: Fq = reduce_mod_order_by_rehash(&digest);
        if let Some(mut y) = sqrt(&curve_rhs(&x)) {
            if is_odd(&y) {
                y = -y;
            }
            return G1Affine::new_unchecked(x, y).into_group();
        }
        counter = counter.wrapping_add(1);
    }
}

/// Derives the `index`-th point of the family identified by `domain`.
pub fn hash_to_point_from_index(domain: &[u8], index: u64) -> Point {
    let mut data = Vec::with_capacity(domain.len() + 8);
    data.extend_from_slice(domain);
    data.extend_from_slice(&index.to_be_bytes());
    hash_to_point(&data)
}

/// Deterministically maps `data` to a scalar.
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    reduce_mod_order_by_rehash(&crate::field::hash(data))
}

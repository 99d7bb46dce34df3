//! Validated key and signature encodings.
//!
//! Raw byte strings only enter the scheme through the fallible constructors below, so a
//! [SecretKey] is always a canonical scalar and a [PublicKey] is always a non-identity element of
//! G2.

use super::{
    group::{self, Scalar, G1, G1_COMPRESSED_LENGTH, G2, G2_UNCOMPRESSED_LENGTH},
    Error,
};
use crate::field::{hash, reduce_mod_order_by_rehash, CanonicalScalar, SCALAR_LENGTH};
use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, FixedSize, Read, ReadExt, Write};
use commonware_utils::hex;
use std::fmt::{Debug, Display, Formatter};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of an encoded [SecretKey].
pub const SECRET_KEY_LENGTH: usize = SCALAR_LENGTH;

/// Length of an encoded [PublicKey].
pub const PUBLIC_KEY_LENGTH: usize = G2_UNCOMPRESSED_LENGTH;

/// Length of an encoded [Signature].
pub const SIGNATURE_LENGTH: usize = G1_COMPRESSED_LENGTH;

/// A BLS secret key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Parses a 32-byte big-endian secret key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: &[u8; SECRET_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::InvalidPrivateKey(bytes.len()))?;
        Scalar::from_canonical(raw)
            .map(Self)
            .ok_or(Error::InvalidPrivateKey(bytes.len()))
    }

    /// Returns the canonical encoding of the key.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Returns the public key `sk * G2`.
    pub fn public_key(&self) -> PublicKey {
        let mut point = G2::one();
        point.mul(&self.0);
        PublicKey::from_point(point)
    }

    pub(super) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// Derives a key pair from `seed`.
///
/// The seed is hashed once and the digest is then reduced with
/// [reduce_mod_order_by_rehash].
pub fn keygen(seed: &[u8]) -> (SecretKey, PublicKey) {
    let secret = SecretKey(reduce_mod_order_by_rehash(&hash(seed)));
    let public = secret.public_key();
    (secret, public)
}

/// A BLS public key (an element of G2) and its encoding.
#[derive(Clone)]
pub struct PublicKey {
    point: G2,
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    fn from_point(point: G2) -> Self {
        let bytes = point.serialize();
        Self { point, bytes }
    }

    /// Parses an uncompressed G2 element, rejecting the identity and points outside G2.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let point = G2::deserialize(bytes).map_err(|_| Error::InvalidPublicKey)?;
        Ok(Self::from_point(point))
    }

    /// Returns the encoding of the key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    pub(super) fn point(&self) -> &G2 {
        &self.point
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PublicKey {}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.bytes))
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.bytes))
    }
}

impl Write for PublicKey {
    fn write(&self, buf: &mut impl BufMut) {
        self.bytes.write(buf);
    }
}

impl Read for PublicKey {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let raw = <[u8; Self::SIZE]>::read(buf)?;
        let point = G2::deserialize(&raw).map_err(|e| CodecError::Wrapped("PublicKey", e.into()))?;
        Ok(Self { point, bytes: raw })
    }
}

impl FixedSize for PublicKey {
    const SIZE: usize = PUBLIC_KEY_LENGTH;
}

/// A compressed BLS signature (an element of G1).
///
/// Construction only checks the length. The point itself is validated when the signature is
/// verified or combined.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Wraps a compressed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            Error::DecompressFromByte(group::Error::InvalidLength {
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })
        })?;
        Ok(Self(raw))
    }

    /// Returns the compressed encoding.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub(super) fn from_point(point: &G1) -> Self {
        Self(point.compress())
    }

    pub(super) fn decompress(&self) -> Result<G1, Error> {
        G1::decompress(&self.0).map_err(Error::DecompressFromByte)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex(&self.0))
    }
}

impl Write for Signature {
    fn write(&self, buf: &mut impl BufMut) {
        self.0.write(buf);
    }
}

impl Read for Signature {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        Ok(Self(<[u8; Self::SIZE]>::read(buf)?))
    }
}

impl FixedSize for Signature {
    const SIZE: usize = SIGNATURE_LENGTH;
}

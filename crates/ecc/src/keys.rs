//! Structured private keys and key generation.

use core::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{codec, curve::EllipticCurve, error::Error};

/// Trailing byte marking a serialized private key as "compressed".
pub(crate) const COMPRESS_FLAG: u8 = 0x01;

/// A validated private key: the scalar plus the public-key compression
/// preference that rides alongside it in the wire convention.
///
/// The flag is metadata only; it is never part of the scalar's value.
pub struct PrivateKey {
    scalar: Zeroizing<Vec<u8>>,
    /// Whether the corresponding public key serializes in compressed form.
    pub compressed: bool,
}

impl PrivateKey {
    /// Parse the wire convention: exactly `scalar_length` scalar bytes,
    /// optionally followed by a single `0x01` compression flag. Any other
    /// length or trailing byte is invalid.
    pub fn from_bytes(bytes: &[u8], scalar_length: usize) -> Result<Self, Error> {
        if bytes.len() == scalar_length {
            Ok(Self {
                scalar: Zeroizing::new(bytes.to_vec()),
                compressed: false,
            })
        } else if bytes.len() == scalar_length + 1 && bytes[scalar_length] == COMPRESS_FLAG {
            Ok(Self {
                scalar: Zeroizing::new(bytes[..scalar_length].to_vec()),
                compressed: true,
            })
        } else {
            Err(Error::InvalidKey("private key length"))
        }
    }

    /// The bare scalar, big-endian.
    pub fn scalar(&self) -> &[u8] {
        &self.scalar
    }

    /// Serialize back to the wire convention.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.scalar.len() + usize::from(self.compressed));
        out.extend_from_slice(&self.scalar);
        if self.compressed {
            out.push(COMPRESS_FLAG);
        }
        out
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.scalar.ct_eq(&other.scalar)) && self.compressed == other.compressed
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("scalar", &"***")
            .field("compressed", &self.compressed)
            .finish()
    }
}

impl EllipticCurve {
    /// Generate a fresh private key in wire form.
    pub fn new_private_key(&self, compressed: bool) -> Vec<u8> {
        let mut key = self.backend().new_private_key();
        if compressed {
            key.push(COMPRESS_FLAG);
        }
        key
    }

    /// Compact public key of `private_key`, honoring its compression flag.
    pub fn private_to_public(&self, private_key: &[u8]) -> Result<Vec<u8>, Error> {
        let key = self.parse_private_key(private_key)?;
        let (x, y) = self.backend().private_to_public(key.scalar())?;
        Ok(codec::encode_point(&x, &y, key.compressed))
    }

    pub(crate) fn parse_private_key(&self, bytes: &[u8]) -> Result<PrivateKey, Error> {
        PrivateKey::from_bytes(bytes, self.scalar_length())
    }
}

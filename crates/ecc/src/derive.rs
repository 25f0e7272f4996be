//! ECDH shared secrets and BIP32-style child key derivation.

use crate::{curve::EllipticCurve, error::Error};

/// Exclusive upper bound of the non-hardened child-index range.
const CHILD_INDEX_LIMIT: u32 = 1 << 31;

impl EllipticCurve {
    /// ECDH shared secret between `private_key` and a wire-encoded peer
    /// public key.
    pub fn derive(&self, private_key: &[u8], public_key: &[u8]) -> Result<Vec<u8>, Error> {
        let key = self.parse_private_key(private_key)?;
        let (x, y) = self.decode_public_key(public_key)?;
        Ok(self.backend().ecdh(key.scalar(), (&x, &y))?)
    }

    /// Derive the non-hardened child key `index` from `seed`.
    ///
    /// Hardened derivation is out of scope; indices at or above `2^31`
    /// fail with [`Error::InvalidChildIndex`].
    pub fn derive_child(&self, seed: &[u8], index: u32) -> Result<Vec<u8>, Error> {
        if index >= CHILD_INDEX_LIMIT {
            return Err(Error::InvalidChildIndex(index));
        }
        Ok(self.backend().derive_child(seed, index)?)
    }
}

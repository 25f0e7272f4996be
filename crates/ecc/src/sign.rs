//! Deterministic ECDSA signing, verification and public-key recovery.

use tracing::trace;
use zeroize::Zeroizing;

use crate::{
    codec,
    curve::EllipticCurve,
    digest::{hmac_sha256, Digest},
    error::Error,
};

/// Recovery header values at or above this signal a compressed public key.
const COMPRESSED_HEADER_FLOOR: u8 = 31;

impl EllipticCurve {
    /// Sign `data` with `private_key`, digesting it with `hash` first.
    ///
    /// When `entropy` is absent it is derived deterministically from the
    /// private key and the digest, so repeated signing of identical inputs
    /// yields identical signatures (and never reuses a nonce across
    /// distinct messages). A recoverable signature carries one leading
    /// header byte; see [`recover`](Self::recover).
    pub fn sign(
        &self,
        data: &[u8],
        private_key: &[u8],
        hash: &Digest,
        recoverable: bool,
        entropy: Option<&[u8]>,
    ) -> Result<Vec<u8>, Error> {
        let key = self.parse_private_key(private_key)?;
        let digest = hash.apply(data);

        let signature = match entropy {
            Some(entropy) => {
                self.backend()
                    .sign(&digest, key.scalar(), recoverable, key.compressed, entropy)?
            }
            None => {
                let entropy = Zeroizing::new(deterministic_entropy(key.scalar(), &digest));
                self.backend().sign(
                    &digest,
                    key.scalar(),
                    recoverable,
                    key.compressed,
                    entropy.as_slice(),
                )?
            }
        };
        trace!(curve = self.name(), recoverable, "signed digest");
        Ok(signature)
    }

    /// Verify a bare (`2L`) or recoverable (`1 + 2L`) signature over
    /// `data`. A well-formed signature that does not match returns
    /// `Ok(false)` rather than an error.
    pub fn verify(
        &self,
        signature: &[u8],
        data: &[u8],
        public_key: &[u8],
        hash: &Digest,
    ) -> Result<bool, Error> {
        let length = self.scalar_length();
        let signature = if signature.len() == 1 + 2 * length {
            &signature[1..]
        } else {
            signature
        };
        if signature.len() != 2 * length {
            return Err(Error::InvalidSignatureFormat);
        }

        let (x, y) = self.decode_public_key(public_key)?;
        let digest = hash.apply(data);
        Ok(self.backend().verify(signature, &digest, (&x, &y))?)
    }

    /// Reconstruct the signer's public key from a recoverable signature.
    ///
    /// The result is compact-encoded, compressed when the header byte is
    /// ≥ 31.
    pub fn recover(&self, signature: &[u8], data: &[u8], hash: &Digest) -> Result<Vec<u8>, Error> {
        if signature.len() != 1 + 2 * self.scalar_length() {
            return Err(Error::NotRecoverable);
        }
        let digest = hash.apply(data);
        let (x, y) = self.backend().recover(signature, &digest)?;
        let compressed = signature[0] >= COMPRESSED_HEADER_FLOOR;
        Ok(codec::encode_point(&x, &y, compressed))
    }
}

/// Deterministic entropy for the signing nonce: a two-round HMAC-SHA256
/// pass over the private key and digest.
///
/// A single-candidate pass, not the full RFC 6979 candidate search;
/// changing the procedure would change every signature produced for
/// identical inputs.
fn deterministic_entropy(private_key: &[u8], digest: &[u8]) -> [u8; 32] {
    let v = vec![0x01u8; digest.len()];
    let k = vec![0x00u8; digest.len()];

    let k = hmac_sha256(&k, &[&v, &[0x00], private_key, digest]);
    let v = hmac_sha256(&k, &[&v]);
    let k = hmac_sha256(&k, &[&v, &[0x01], private_key, digest]);
    let v = hmac_sha256(&k, &[&v]);
    hmac_sha256(&k, &[&v])
}

//! Capability interface over one bound elliptic curve.

/// Arithmetic capabilities the orchestration layer composes into
/// protocols. One instance per bound curve.
///
/// Every method is a pure function of its inputs; implementations must be
/// reentrant since callers share instances across threads. Scalars and
/// affine coordinates are fixed-width big-endian byte strings of
/// [`scalar_length`](CurveBackend::scalar_length) bytes.
pub trait CurveBackend: Send + Sync {
    /// Byte length `L` of a scalar and of each affine coordinate.
    fn scalar_length(&self) -> usize;

    /// Generate a fresh uniformly random non-zero scalar.
    fn new_private_key(&self) -> Vec<u8>;

    /// Multiply the generator by `scalar`, returning affine `(x, y)`.
    fn private_to_public(&self, scalar: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError>;

    /// ECDH shared secret: the x coordinate of `scalar * point`.
    fn ecdh(&self, scalar: &[u8], point: (&[u8], &[u8])) -> Result<Vec<u8>, BackendError>;

    /// Recover the full point from a SEC1 compressed encoding
    /// (`0x02`/`0x03` prefix followed by the x coordinate).
    fn decompress_point(&self, data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError>;

    /// ECDSA-sign `digest` with `scalar`. The nonce is derived from the
    /// caller-supplied `entropy`, so signing is deterministic for fixed
    /// inputs. A recoverable signature is prefixed with a header byte
    /// `27 + recovery_id + 4` when `compressed` is set, `27 + recovery_id`
    /// otherwise; a bare signature is `r || s`.
    fn sign(
        &self,
        digest: &[u8],
        scalar: &[u8],
        recoverable: bool,
        compressed: bool,
        entropy: &[u8],
    ) -> Result<Vec<u8>, BackendError>;

    /// Verify a bare `r || s` signature over `digest` against `point`.
    /// Returns `Ok(false)` on a well-formed but mismatching signature.
    fn verify(
        &self,
        signature: &[u8],
        digest: &[u8],
        point: (&[u8], &[u8]),
    ) -> Result<bool, BackendError>;

    /// Reconstruct the signer's public point from a recoverable signature
    /// (`header || r || s`) and the signed digest.
    fn recover(&self, signature: &[u8], digest: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError>;

    /// Derive the non-hardened child key `index` from `seed`, returning an
    /// `L`-byte scalar. The index range check belongs to the caller.
    fn derive_child(&self, seed: &[u8], index: u32) -> Result<Vec<u8>, BackendError>;

    /// Technology name of this backend implementation.
    fn name(&self) -> &'static str;
}

/// Errors reported by a [`CurveBackend`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("backend: invalid private key scalar")]
    InvalidScalar,

    #[error("backend: point is not on the curve")]
    InvalidPoint,

    #[error("backend: invalid signature scalars")]
    InvalidSignature,

    #[error("backend: digest is too short for this curve")]
    InvalidDigest,

    #[error("backend: entropy does not reduce to a usable nonce")]
    InvalidEntropy,

    #[error("backend: signing failed")]
    SigningFailed,

    #[error("backend: public key recovery failed")]
    RecoveryFailed,

    #[error("backend: malformed recovery header {0:#04x}")]
    InvalidRecoveryHeader(u8),

    #[error("backend: child key derivation produced an invalid scalar")]
    DerivationFailed,
}

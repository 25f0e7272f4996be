//! Error kinds surfaced by curve operations.

use ecckit_backend::{BackendError, CipherError};

/// Errors reported by [`EllipticCurve`](crate::EllipticCurve) operations.
///
/// All failures are local and synchronous; nothing is retried or swallowed
/// internally. Collaborator failures propagate unchanged through the
/// [`Backend`](Error::Backend) and [`Cipher`](Error::Cipher) kinds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown curve `{0}`")]
    UnknownCurve(String),

    #[error("curve `{0}` has no backend implementation")]
    UnsupportedCurve(String),

    #[error("invalid key: {0}")]
    InvalidKey(&'static str),

    #[error("embedded curve id {found} does not match expected id {expected}")]
    CurveMismatch { expected: u16, found: u16 },

    #[error("input truncated: need at least {need} bytes, got {got}")]
    Truncated { need: usize, got: usize },

    #[error("{0} trailing bytes left after decoding")]
    TrailingData(usize),

    #[error("derived key material too short: cipher needs {need} bytes, got {got}")]
    InsufficientKeyMaterial { need: usize, got: usize },

    #[error("MAC tag verification failed")]
    AuthenticationFailed,

    #[error("signature length is inconsistent with this curve")]
    InvalidSignatureFormat,

    #[error("signature does not carry a recovery byte")]
    NotRecoverable,

    #[error("child index {0} is outside the non-hardened range")]
    InvalidChildIndex(u32),

    #[error("wrong network: version byte {0:#04x}, expected 0x80")]
    WrongNetwork(u8),

    #[error("base58 check decoding failed")]
    BadChecksum,

    #[error("unsupported algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Cipher(#[from] CipherError),
}

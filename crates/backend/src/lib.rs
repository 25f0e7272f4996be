//! Collaborator implementations for the ecckit orchestration layer.
//!
//! Two capability interfaces live here, each with one concrete
//! implementation:
//!
//! - [`CurveBackend`] — per-curve arithmetic (key generation, scalar
//!   multiplication, ECDH, point decompression, raw ECDSA with
//!   caller-supplied entropy, child key derivation), implemented by
//!   [`RustCryptoBackend`] over the RustCrypto `elliptic-curve`/`ecdsa`
//!   trait stack.
//! - [`SymmetricCipher`] — key-length negotiation and block encryption,
//!   implemented by [`AesCipher`] (AES-CBC with PKCS#7 padding).
//!
//! Implementations are stateless and reentrant; a single instance may be
//! shared across threads.

pub mod backend;
pub mod cipher;
pub mod rustcrypto;

pub use backend::{BackendError, CurveBackend};
pub use cipher::{AesCipher, CipherAlgo, CipherError, SymmetricCipher, IV_LENGTH};
pub use rustcrypto::{NistP256Backend, RustCryptoBackend, Secp256k1Backend};

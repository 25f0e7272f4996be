//! Protocol orchestration over pluggable elliptic-curve backends.
//!
//! This crate composes a backend's primitive curve operations into
//! interoperable protocols:
//!
//! - public-key wire encoding and decoding (compact SEC1-style, plus a
//!   self-describing tagged format used inside ciphertexts),
//! - ECIES-style hybrid encryption (ephemeral ECDH, key derivation,
//!   AES-CBC, encrypt-then-MAC),
//! - deterministic ECDSA with recoverable signatures,
//! - BIP32-style non-hardened child key derivation,
//! - WIF and Base58Check address text encodings.
//!
//! No field or point arithmetic lives here; an [`EllipticCurve`] is an
//! immutable binding of named curve parameters to a [`CurveBackend`] and a
//! [`SymmetricCipher`], and every operation is a pure function of its
//! inputs. Instances are freely shareable across threads.
//!
//! ```no_run
//! use ecckit::{CipherAlgo, Digest, EllipticCurve, Mac};
//!
//! # fn main() -> Result<(), ecckit::Error> {
//! let curve = EllipticCurve::new("secp256k1")?;
//! let private_key = curve.new_private_key(true);
//! let public_key = curve.private_to_public(&private_key)?;
//!
//! let envelope = curve.encrypt(
//!     b"attack at dawn",
//!     &public_key,
//!     CipherAlgo::Aes256Cbc,
//!     &Digest::Sha256,
//!     &Mac::HmacSha256,
//! )?;
//! let plaintext = curve.decrypt(
//!     &envelope,
//!     &private_key,
//!     CipherAlgo::Aes256Cbc,
//!     &Digest::Sha256,
//!     &Mac::HmacSha256,
//! )?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok(())
//! # }
//! ```

mod address;
mod codec;
mod curve;
mod derive;
mod digest;
mod ecies;
mod error;
mod keys;
pub mod registry;
mod sign;

pub use curve::EllipticCurve;
pub use digest::{cipher_from_name, Digest, Mac};
pub use error::Error;
pub use keys::PrivateKey;
pub use registry::CurveParams;

// Collaborator surface, re-exported so most callers need a single crate.
pub use ecckit_backend::{
    AesCipher, BackendError, CipherAlgo, CipherError, CurveBackend, SymmetricCipher,
};

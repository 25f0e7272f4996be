//! Named-or-custom digest and MAC selection.
//!
//! Wire peers negotiate hashes and MACs by name; callers may also plug in
//! their own function. Both shapes resolve once per call through these
//! tagged variants.

use hmac::{Hmac, Mac as _};
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};

use ecckit_backend::CipherAlgo;

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Digest applied to data before signing or key derivation.
#[derive(Clone, Copy, Debug)]
pub enum Digest {
    /// Pass the input through unhashed.
    Identity,
    Sha1,
    Sha256,
    Sha512,
    /// Caller-supplied digest function.
    Custom(fn(&[u8]) -> Vec<u8>),
}

impl Digest {
    /// Resolve one of the negotiable names (`sha1`, `sha256`, `sha512`).
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "sha1" => Ok(Digest::Sha1),
            "sha256" => Ok(Digest::Sha256),
            "sha512" => Ok(Digest::Sha512),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }

    pub(crate) fn apply(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Digest::Identity => data.to_vec(),
            Digest::Sha1 => Sha1::digest(data).to_vec(),
            Digest::Sha256 => Sha256::digest(data).to_vec(),
            Digest::Sha512 => Sha512::digest(data).to_vec(),
            Digest::Custom(function) => function(data),
        }
    }
}

/// MAC sealing an ECIES envelope.
#[derive(Clone, Copy, Debug)]
pub enum Mac {
    /// No authentication tag.
    None,
    HmacSha256,
    HmacSha512,
    /// Caller-supplied MAC function and its tag length.
    Custom {
        length: usize,
        function: fn(key: &[u8], message: &[u8]) -> Vec<u8>,
    },
}

impl Mac {
    /// Resolve one of the negotiable names (`hmac-sha256`, `hmac-sha512`).
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "hmac-sha256" => Ok(Mac::HmacSha256),
            "hmac-sha512" => Ok(Mac::HmacSha512),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Tag length in bytes.
    pub(crate) fn tag_length(&self) -> usize {
        match self {
            Mac::None => 0,
            Mac::HmacSha256 => 32,
            Mac::HmacSha512 => 64,
            Mac::Custom { length, .. } => *length,
        }
    }

    pub(crate) fn compute(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            Mac::None => Vec::new(),
            Mac::HmacSha256 => hmac_sha256(key, &[message]).to_vec(),
            Mac::HmacSha512 => {
                let mut mac =
                    HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            Mac::Custom { function, .. } => function(key, message),
        }
    }
}

/// Resolve a negotiable cipher name (`aes-128-cbc`, `aes-192-cbc`,
/// `aes-256-cbc`).
pub fn cipher_from_name(name: &str) -> Result<CipherAlgo, Error> {
    match name {
        "aes-128-cbc" => Ok(CipherAlgo::Aes128Cbc),
        "aes-192-cbc" => Ok(CipherAlgo::Aes192Cbc),
        "aes-256-cbc" => Ok(CipherAlgo::Aes256Cbc),
        other => Err(Error::UnsupportedAlgorithm(other.to_string())),
    }
}

/// HMAC-SHA256 over `parts` concatenated, keyed with `key`.
pub(crate) fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

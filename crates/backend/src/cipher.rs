//! Symmetric cipher engine: AES-CBC with PKCS#7 padding.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};

/// IV length of every supported mode.
pub const IV_LENGTH: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Supported symmetric algorithms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CipherAlgo {
    Aes128Cbc,
    Aes192Cbc,
    Aes256Cbc,
}

impl CipherAlgo {
    /// Required key length in bytes.
    pub fn key_length(&self) -> usize {
        match self {
            CipherAlgo::Aes128Cbc => 16,
            CipherAlgo::Aes192Cbc => 24,
            CipherAlgo::Aes256Cbc => 32,
        }
    }

    /// Canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            CipherAlgo::Aes128Cbc => "aes-128-cbc",
            CipherAlgo::Aes192Cbc => "aes-192-cbc",
            CipherAlgo::Aes256Cbc => "aes-256-cbc",
        }
    }
}

/// Block encryption capabilities consumed by the orchestration layer.
///
/// `encrypt` picks a fresh random IV per call and returns it alongside the
/// ciphertext; `decrypt` is the exact inverse under the same key and IV.
pub trait SymmetricCipher: Send + Sync {
    /// Required key length for `algo` in bytes.
    fn key_length(&self, algo: CipherAlgo) -> usize;

    /// Encrypt `plaintext` under `key`, returning `(ciphertext, iv)`.
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &[u8],
        algo: CipherAlgo,
    ) -> Result<(Vec<u8>, [u8; IV_LENGTH]), CipherError>;

    /// Decrypt `ciphertext` under `key` and `iv`.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        iv: &[u8],
        key: &[u8],
        algo: CipherAlgo,
    ) -> Result<Vec<u8>, CipherError>;
}

/// Errors reported by a [`SymmetricCipher`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CipherError {
    #[error("cipher: key must be {need} bytes for {algo}, got {got}")]
    InvalidKeyLength {
        algo: &'static str,
        need: usize,
        got: usize,
    },

    #[error("cipher: IV must be {IV_LENGTH} bytes")]
    InvalidIv,

    #[error("cipher: ciphertext is not a whole number of blocks or its padding is corrupt")]
    InvalidCiphertext,
}

/// AES-CBC engine over the `aes` block cipher.
pub struct AesCipher;

impl AesCipher {
    fn check_key(key: &[u8], algo: CipherAlgo) -> Result<(), CipherError> {
        if key.len() != algo.key_length() {
            return Err(CipherError::InvalidKeyLength {
                algo: algo.name(),
                need: algo.key_length(),
                got: key.len(),
            });
        }
        Ok(())
    }
}

impl SymmetricCipher for AesCipher {
    fn key_length(&self, algo: CipherAlgo) -> usize {
        algo.key_length()
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &[u8],
        algo: CipherAlgo,
    ) -> Result<(Vec<u8>, [u8; IV_LENGTH]), CipherError> {
        Self::check_key(key, algo)?;

        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = match algo {
            CipherAlgo::Aes128Cbc => Aes128CbcEnc::new_from_slices(key, &iv)
                .map_err(|_| CipherError::InvalidIv)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherAlgo::Aes192Cbc => Aes192CbcEnc::new_from_slices(key, &iv)
                .map_err(|_| CipherError::InvalidIv)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            CipherAlgo::Aes256Cbc => Aes256CbcEnc::new_from_slices(key, &iv)
                .map_err(|_| CipherError::InvalidIv)?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        };

        Ok((ciphertext, iv))
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        iv: &[u8],
        key: &[u8],
        algo: CipherAlgo,
    ) -> Result<Vec<u8>, CipherError> {
        Self::check_key(key, algo)?;
        if iv.len() != IV_LENGTH {
            return Err(CipherError::InvalidIv);
        }

        let plaintext = match algo {
            CipherAlgo::Aes128Cbc => Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidIv)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            CipherAlgo::Aes192Cbc => Aes192CbcDec::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidIv)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            CipherAlgo::Aes256Cbc => Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| CipherError::InvalidIv)?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        };

        plaintext.map_err(|_| CipherError::InvalidCiphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        for algo in [
            CipherAlgo::Aes128Cbc,
            CipherAlgo::Aes192Cbc,
            CipherAlgo::Aes256Cbc,
        ] {
            let key = vec![0x42u8; algo.key_length()];
            let plaintext = b"the quick brown fox jumps over the lazy dog";

            let (ciphertext, iv) = AesCipher.encrypt(plaintext, &key, algo).unwrap();
            assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
            assert_eq!(ciphertext.len() % 16, 0);

            let decrypted = AesCipher.decrypt(&ciphertext, &iv, &key, algo).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn fresh_iv_per_call() {
        let key = [0x13u8; 32];
        let (_, iv1) = AesCipher
            .encrypt(b"same input", &key, CipherAlgo::Aes256Cbc)
            .unwrap();
        let (_, iv2) = AesCipher
            .encrypt(b"same input", &key, CipherAlgo::Aes256Cbc)
            .unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn wrong_key_length_rejected() {
        let err = AesCipher
            .encrypt(b"data", &[0u8; 16], CipherAlgo::Aes256Cbc)
            .unwrap_err();
        assert!(matches!(
            err,
            CipherError::InvalidKeyLength { need: 32, got: 16, .. }
        ));
    }

    #[test]
    fn corrupt_padding_rejected() {
        let key = [0x07u8; 32];
        let (mut ciphertext, iv) = AesCipher
            .encrypt(b"payload", &key, CipherAlgo::Aes256Cbc)
            .unwrap();
        // Truncate to a non-block boundary.
        ciphertext.pop();
        assert!(AesCipher
            .decrypt(&ciphertext, &iv, &key, CipherAlgo::Aes256Cbc)
            .is_err());
    }
}

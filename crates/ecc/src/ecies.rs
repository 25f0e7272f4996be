//! ECIES-style hybrid encryption.
//!
//! Envelope layout: `iv[16] || tagged_ephemeral_key || ciphertext || tag`.
//! The encryption and MAC keys are both split from the hashed ECDH shared
//! secret, encrypt-then-MAC; on decryption the tag is verified in constant
//! time strictly before the encryption key is used.

use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use ecckit_backend::{CipherAlgo, IV_LENGTH};

use crate::{
    curve::EllipticCurve,
    digest::{Digest, Mac},
    error::Error,
};

impl EllipticCurve {
    /// Hybrid-encrypt `data` to a wire-encoded recipient public key.
    ///
    /// A fresh ephemeral key pair is generated per call; its public half is
    /// embedded in the envelope in the tagged format.
    pub fn encrypt(
        &self,
        data: &[u8],
        public_key: &[u8],
        algo: CipherAlgo,
        derivation: &Digest,
        mac: &Mac,
    ) -> Result<Vec<u8>, Error> {
        self.encrypt_with_key(data, public_key, algo, derivation, mac)
            .map(|(envelope, _)| envelope)
    }

    /// Like [`encrypt`](Self::encrypt), additionally returning the
    /// symmetric encryption key for auditing paths.
    pub fn encrypt_with_key(
        &self,
        data: &[u8],
        public_key: &[u8],
        algo: CipherAlgo,
        derivation: &Digest,
        mac: &Mac,
    ) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
        let ephemeral = Zeroizing::new(self.backend().new_private_key());
        let (peer_x, peer_y) = self.decode_public_key(public_key)?;

        let shared = Zeroizing::new(self.backend().ecdh(&ephemeral, (&peer_x, &peer_y))?);
        let derived = Zeroizing::new(derivation.apply(&shared));
        let (encryption_key, mac_key) = split_key(&derived, self.cipher().key_length(algo))?;

        let (ciphertext, iv) = self.cipher().encrypt(data, encryption_key, algo)?;
        let (ephemeral_x, ephemeral_y) = self.backend().private_to_public(&ephemeral)?;
        let tagged_key = self.encode_public_key_tagged(&ephemeral_x, &ephemeral_y);

        let mut envelope =
            Vec::with_capacity(iv.len() + tagged_key.len() + ciphertext.len() + mac.tag_length());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(&tagged_key);
        envelope.extend_from_slice(&ciphertext);

        let tag = mac.compute(mac_key, &envelope);
        envelope.extend_from_slice(&tag);

        debug!(
            curve = self.name(),
            plaintext = data.len(),
            envelope = envelope.len(),
            "sealed ecies envelope"
        );
        Ok((envelope, Zeroizing::new(encryption_key.to_vec())))
    }

    /// Exact inverse of [`encrypt`](Self::encrypt).
    ///
    /// The tag is recomputed over the received body and compared in
    /// constant time; decryption does not proceed on mismatch.
    pub fn decrypt(
        &self,
        envelope: &[u8],
        private_key: &[u8],
        algo: CipherAlgo,
        derivation: &Digest,
        mac: &Mac,
    ) -> Result<Vec<u8>, Error> {
        let key = self.parse_private_key(private_key)?;

        let tag_length = mac.tag_length();
        if envelope.len() < tag_length {
            return Err(Error::Truncated {
                need: tag_length,
                got: envelope.len(),
            });
        }
        let (body, tag) = envelope.split_at(envelope.len() - tag_length);

        if body.len() < IV_LENGTH {
            return Err(Error::Truncated {
                need: IV_LENGTH,
                got: body.len(),
            });
        }
        let (iv, rest) = body.split_at(IV_LENGTH);
        let ((ephemeral_x, ephemeral_y), consumed) = self.decode_public_key_tagged_partial(rest)?;
        let ciphertext = &rest[consumed..];

        let shared = Zeroizing::new(
            self.backend()
                .ecdh(key.scalar(), (&ephemeral_x, &ephemeral_y))?,
        );
        let derived = Zeroizing::new(derivation.apply(&shared));
        let (encryption_key, mac_key) = split_key(&derived, self.cipher().key_length(algo))?;

        let expected_tag = mac.compute(mac_key, body);
        if !bool::from(expected_tag.ct_eq(tag)) {
            return Err(Error::AuthenticationFailed);
        }

        let plaintext = self.cipher().decrypt(ciphertext, iv, encryption_key, algo)?;
        debug!(
            curve = self.name(),
            envelope = envelope.len(),
            "opened ecies envelope"
        );
        Ok(plaintext)
    }
}

/// Split the derived key material into the cipher key and the MAC key.
fn split_key(derived: &[u8], key_length: usize) -> Result<(&[u8], &[u8]), Error> {
    if derived.len() < key_length {
        return Err(Error::InsufficientKeyMaterial {
            need: key_length,
            got: derived.len(),
        });
    }
    Ok(derived.split_at(key_length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> EllipticCurve {
        EllipticCurve::new("secp256k1").unwrap()
    }

    fn keypair(curve: &EllipticCurve) -> (Vec<u8>, Vec<u8>) {
        let private = curve.new_private_key(false);
        let public = curve.private_to_public(&private).unwrap();
        (private, public)
    }

    #[test]
    fn roundtrip_with_defaults() {
        let curve = curve();
        let (private, public) = keypair(&curve);
        let plaintext = b"per-call envelope, no retained state";

        let envelope = curve
            .encrypt(
                plaintext,
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        let decrypted = curve
            .decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn roundtrip_on_p256_with_sha512_split() {
        let curve = EllipticCurve::new("prime256v1").unwrap();
        let (private, public) = keypair(&curve);

        // SHA-512 leaves 32 bytes of MAC key after the AES-256 split.
        let envelope = curve
            .encrypt(
                b"wider derivation",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha512,
                &Mac::HmacSha512,
            )
            .unwrap();
        let decrypted = curve
            .decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha512,
                &Mac::HmacSha512,
            )
            .unwrap();
        assert_eq!(decrypted, b"wider derivation");
    }

    #[test]
    fn compressed_recipient_keys_work() {
        let curve = curve();
        let private = curve.new_private_key(true);
        let public = curve.private_to_public(&private).unwrap();
        assert_eq!(public.len(), 33);

        let envelope = curve
            .encrypt(
                b"compact recipient",
                &public,
                CipherAlgo::Aes128Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        let decrypted = curve
            .decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes128Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        assert_eq!(decrypted, b"compact recipient");
    }

    #[test]
    fn tampered_tag_fails_authentication() {
        let curve = curve();
        let (private, public) = keypair(&curve);
        let mut envelope = curve
            .encrypt(
                b"integrity matters",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();

        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert!(matches!(
            curve.decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            ),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let curve = curve();
        let (private, public) = keypair(&curve);
        let mut envelope = curve
            .encrypt(
                b"integrity matters",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();

        // Flip a bit inside the symmetric ciphertext section.
        let index = envelope.len() - 33;
        envelope[index] ^= 0x80;
        assert!(matches!(
            curve.decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            ),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn wrong_private_key_fails_authentication() {
        let curve = curve();
        let (_, public) = keypair(&curve);
        let (other_private, _) = keypair(&curve);

        let envelope = curve
            .encrypt(
                b"not for you",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        assert!(matches!(
            curve.decrypt(
                &envelope,
                &other_private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            ),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn short_derivation_is_rejected() {
        let curve = curve();
        let (_, public) = keypair(&curve);
        // SHA-1 yields 20 bytes; AES-256 needs 32.
        assert!(matches!(
            curve.encrypt(
                b"data",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha1,
                &Mac::HmacSha256,
            ),
            Err(Error::InsufficientKeyMaterial { need: 32, got: 20 })
        ));
    }

    #[test]
    fn truncated_envelopes_are_rejected() {
        let curve = curve();
        let (private, _) = keypair(&curve);

        // Shorter than the tag.
        assert!(matches!(
            curve.decrypt(
                &[0u8; 16],
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            ),
            Err(Error::Truncated { need: 32, got: 16 })
        ));

        // Tag fits but no room for the IV.
        assert!(matches!(
            curve.decrypt(
                &[0u8; 40],
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            ),
            Err(Error::Truncated { need: 16, got: 8 })
        ));
    }

    #[test]
    fn mac_none_skips_authentication() {
        let curve = curve();
        let (private, public) = keypair(&curve);
        let envelope = curve
            .encrypt(
                b"unauthenticated mode",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::None,
            )
            .unwrap();
        let decrypted = curve
            .decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::None,
            )
            .unwrap();
        assert_eq!(decrypted, b"unauthenticated mode");
    }

    #[test]
    fn custom_mac_is_honored() {
        fn xor_mac(key: &[u8], message: &[u8]) -> Vec<u8> {
            let mut tag = vec![0u8; 8];
            for (index, byte) in key.iter().chain(message).enumerate() {
                tag[index % 8] ^= byte;
            }
            tag
        }
        let mac = Mac::Custom {
            length: 8,
            function: xor_mac,
        };

        let curve = curve();
        let (private, public) = keypair(&curve);
        let mut envelope = curve
            .encrypt(
                b"custom tag",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &mac,
            )
            .unwrap();
        let decrypted = curve
            .decrypt(&envelope, &private, CipherAlgo::Aes256Cbc, &Digest::Sha256, &mac)
            .unwrap();
        assert_eq!(decrypted, b"custom tag");

        let last = envelope.len() - 1;
        envelope[last] ^= 0xff;
        assert!(matches!(
            curve.decrypt(&envelope, &private, CipherAlgo::Aes256Cbc, &Digest::Sha256, &mac),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn encrypt_with_key_exposes_the_cipher_key() {
        let curve = curve();
        let (private, public) = keypair(&curve);
        let (envelope, key) = curve
            .encrypt_with_key(
                b"audited",
                &public,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .unwrap();
        assert_eq!(key.len(), 32);
        assert!(curve
            .decrypt(
                &envelope,
                &private,
                CipherAlgo::Aes256Cbc,
                &Digest::Sha256,
                &Mac::HmacSha256,
            )
            .is_ok());
    }
}

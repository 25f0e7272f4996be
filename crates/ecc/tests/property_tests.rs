//! Property-based tests for ecckit
//!
//! These tests use proptest to verify:
//! - Wire codec roundtrips for arbitrary keys
//! - Sign-then-verify and encrypt-then-decrypt invariants
//! - Decoder robustness against arbitrary inputs

use ecckit::{CipherAlgo, Digest, EllipticCurve, Mac};
use proptest::prelude::*;

fn secp256k1() -> EllipticCurve {
    EllipticCurve::new("secp256k1").unwrap()
}

proptest! {
    // =========================================================================
    // Wire Codec Roundtrips
    // =========================================================================

    /// Compact encoding roundtrips for both compression forms
    #[test]
    fn test_codec_roundtrip(compressed in any::<bool>()) {
        let curve = secp256k1();
        let private = curve.new_private_key(compressed);
        let public = curve.private_to_public(&private).unwrap();

        let (x, y) = curve.decode_public_key(&public).unwrap();
        let reencoded = curve.encode_public_key(&x, &y, compressed);
        prop_assert_eq!(reencoded, public);
    }

    /// The tagged format embeds and recovers the same point
    #[test]
    fn test_tagged_roundtrip(trailer in proptest::collection::vec(any::<u8>(), 0..64)) {
        let curve = secp256k1();
        let private = curve.new_private_key(false);
        let public = curve.private_to_public(&private).unwrap();
        let (x, y) = curve.decode_public_key(&public).unwrap();

        let mut buffer = curve.encode_public_key_tagged(&x, &y);
        let tagged_length = buffer.len();
        buffer.extend_from_slice(&trailer);

        let ((dx, dy), used) = curve.decode_public_key_tagged_partial(&buffer).unwrap();
        prop_assert_eq!(dx, x);
        prop_assert_eq!(dy, y);
        prop_assert_eq!(used, tagged_length);
    }

    /// WIF roundtrips for arbitrary 32-byte scalars
    #[test]
    fn test_wif_roundtrip(scalar in any::<[u8; 32]>()) {
        let curve = secp256k1();
        let wif = curve.private_to_wif(&scalar).unwrap();
        let decoded = curve.wif_to_private(&wif).unwrap();
        prop_assert_eq!(decoded, scalar.to_vec());
    }

    // =========================================================================
    // Decoder Robustness
    // =========================================================================

    /// The compact decoder fails cleanly on arbitrary input
    #[test]
    fn test_compact_decoder_never_panics(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = secp256k1().decode_public_key(&data);
    }

    /// The tagged decoder fails cleanly on arbitrary input
    #[test]
    fn test_tagged_decoder_never_panics(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let _ = secp256k1().decode_public_key_tagged(&data);
    }

    /// Decryption of arbitrary envelopes fails cleanly
    #[test]
    fn test_decrypt_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let curve = secp256k1();
        let private = curve.new_private_key(false);
        prop_assert!(curve
            .decrypt(&data, &private, CipherAlgo::Aes256Cbc, &Digest::Sha256, &Mac::HmacSha256)
            .is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // =========================================================================
    // Signing and Encryption Invariants
    // =========================================================================

    /// Sign then verify holds for arbitrary messages
    #[test]
    fn test_sign_verify(message in proptest::collection::vec(any::<u8>(), 0..256)) {
        let curve = secp256k1();
        let private = curve.new_private_key(false);
        let public = curve.private_to_public(&private).unwrap();

        let signature = curve.sign(&message, &private, &Digest::Sha256, false, None).unwrap();
        prop_assert!(curve.verify(&signature, &message, &public, &Digest::Sha256).unwrap());
    }

    /// Recovered public keys match the signer for arbitrary messages
    #[test]
    fn test_sign_recover(message in proptest::collection::vec(any::<u8>(), 0..256), compressed in any::<bool>()) {
        let curve = secp256k1();
        let private = curve.new_private_key(compressed);
        let public = curve.private_to_public(&private).unwrap();

        let signature = curve.sign(&message, &private, &Digest::Sha256, true, None).unwrap();
        let recovered = curve.recover(&signature, &message, &Digest::Sha256).unwrap();
        prop_assert_eq!(recovered, public);
    }

    /// Encrypt then decrypt is the identity for arbitrary plaintexts
    #[test]
    fn test_ecies_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
        let curve = secp256k1();
        let private = curve.new_private_key(false);
        let public = curve.private_to_public(&private).unwrap();

        let envelope = curve
            .encrypt(&plaintext, &public, CipherAlgo::Aes256Cbc, &Digest::Sha256, &Mac::HmacSha256)
            .unwrap();
        let decrypted = curve
            .decrypt(&envelope, &private, CipherAlgo::Aes256Cbc, &Digest::Sha256, &Mac::HmacSha256)
            .unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    /// Flipping any single envelope byte breaks authentication or decoding
    #[test]
    fn test_ecies_tamper_detection(index_seed in any::<u16>()) {
        let curve = secp256k1();
        let private = curve.new_private_key(false);
        let public = curve.private_to_public(&private).unwrap();

        let mut envelope = curve
            .encrypt(b"tamper target", &public, CipherAlgo::Aes256Cbc, &Digest::Sha256, &Mac::HmacSha256)
            .unwrap();
        let index = usize::from(index_seed) % envelope.len();
        envelope[index] ^= 0x01;

        prop_assert!(curve
            .decrypt(&envelope, &private, CipherAlgo::Aes256Cbc, &Digest::Sha256, &Mac::HmacSha256)
            .is_err());
    }
}

//! WIF and address text encodings over Base58Check.

use ripemd::Ripemd160;
use sha2::{Digest as _, Sha256};

use crate::{curve::EllipticCurve, error::Error};

/// Mainnet WIF version byte.
const WIF_VERSION: u8 = 0x80;
/// Pay-to-pubkey-hash address version byte.
const ADDRESS_VERSION: u8 = 0x00;
/// Base58Check checksum width.
const CHECKSUM_LENGTH: usize = 4;

impl EllipticCurve {
    /// Encode `private_key` as a mainnet WIF string.
    ///
    /// The compression flag is validated but intentionally not persisted:
    /// the WIF carries the bare scalar only.
    pub fn private_to_wif(&self, private_key: &[u8]) -> Result<String, Error> {
        let key = self.parse_private_key(private_key)?;
        let mut payload = Vec::with_capacity(1 + key.scalar().len());
        payload.push(WIF_VERSION);
        payload.extend_from_slice(key.scalar());
        Ok(check_encode(&payload))
    }

    /// Decode a mainnet WIF string back to the bare scalar.
    pub fn wif_to_private(&self, wif: &str) -> Result<Vec<u8>, Error> {
        let payload = check_decode(wif)?;
        let (&version, scalar) = payload
            .split_first()
            .ok_or(Error::InvalidKey("empty WIF payload"))?;
        if version != WIF_VERSION {
            return Err(Error::WrongNetwork(version));
        }
        if scalar.len() != self.scalar_length() {
            return Err(Error::InvalidKey("WIF scalar length"));
        }
        Ok(scalar.to_vec())
    }

    /// Base58Check address of a wire-encoded public key:
    /// `0x00 || RIPEMD160(SHA256(public_key))`.
    pub fn public_to_address(&self, public_key: &[u8]) -> String {
        let sha = Sha256::digest(public_key);
        let hash = Ripemd160::digest(sha);
        let mut payload = Vec::with_capacity(1 + hash.len());
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&hash);
        check_encode(&payload)
    }
}

/// Base58Check encoding: payload plus the first four bytes of its double
/// SHA-256.
pub(crate) fn check_encode(payload: &[u8]) -> String {
    let mut buffer = payload.to_vec();
    let checksum = sha256d(payload);
    buffer.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);
    bs58::encode(buffer).into_string()
}

/// Base58Check decoding with checksum validation.
pub(crate) fn check_decode(encoded: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| Error::BadChecksum)?;
    if bytes.len() < CHECKSUM_LENGTH {
        return Err(Error::BadChecksum);
    }
    let (payload, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LENGTH);
    if sha256d(payload)[..CHECKSUM_LENGTH] != *checksum {
        return Err(Error::BadChecksum);
    }
    bytes.truncate(bytes.len() - CHECKSUM_LENGTH);
    Ok(bytes)
}

fn sha256d(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn curve() -> EllipticCurve {
        EllipticCurve::new("secp256k1").unwrap()
    }

    #[test]
    fn wif_known_answer() {
        // Reference vector: uncompressed-era mainnet key.
        let private = hex!("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");
        let wif = curve().private_to_wif(&private).unwrap();
        assert_eq!(wif, "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ");
    }

    #[test]
    fn wif_roundtrip_strips_the_compression_flag() {
        let curve = curve();
        let private = curve.new_private_key(true);
        let wif = curve.private_to_wif(&private).unwrap();
        let decoded = curve.wif_to_private(&wif).unwrap();
        assert_eq!(decoded, &private[..32]);
    }

    #[test]
    fn wif_wrong_network_is_rejected() {
        let curve = curve();
        // Same scalar under the testnet version byte.
        let mut payload = vec![0xef];
        payload.extend_from_slice(&[0x11; 32]);
        let testnet = check_encode(&payload);
        assert!(matches!(
            curve.wif_to_private(&testnet),
            Err(Error::WrongNetwork(0xef))
        ));
    }

    #[test]
    fn wif_corruption_is_detected() {
        let curve = curve();
        let wif = curve.private_to_wif(&[0x11; 32]).unwrap();
        let mut corrupted = wif.into_bytes();
        corrupted[10] = if corrupted[10] == b'2' { b'3' } else { b'2' };
        let corrupted = String::from_utf8(corrupted).unwrap();
        assert!(matches!(
            curve.wif_to_private(&corrupted),
            Err(Error::BadChecksum)
        ));
    }

    #[test]
    fn address_known_answer() {
        // Reference vector: private scalar -> uncompressed key -> address.
        let curve = curve();
        let private = hex!("18e14a7b6a307f426a94f8114701e7c8e774e7f9a47e2c2035db29a206321725");
        let public = curve.private_to_public(&private).unwrap();
        assert_eq!(
            hex::encode(&public),
            "0450863ad64a87ae8a2fe83c1af1a8403cb53f53e486d8511dad8a04887e5b2352\
             2cd470243453a299fa9e77237716103abc11a1df38855ed6f2ee187e9c582ba6"
        );
        assert_eq!(
            curve.public_to_address(&public),
            "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM"
        );
    }

    #[test]
    fn compressed_and_uncompressed_keys_give_different_addresses() {
        let curve = curve();
        let private = curve.new_private_key(false);
        let mut flagged = private.clone();
        flagged.push(0x01);

        let uncompressed = curve.private_to_public(&private).unwrap();
        let compressed = curve.private_to_public(&flagged).unwrap();
        assert_ne!(
            curve.public_to_address(&uncompressed),
            curve.public_to_address(&compressed)
        );
    }

    #[test]
    fn check_encoding_roundtrip() {
        let payload = b"\x00arbitrary payload bytes";
        let encoded = check_encode(payload);
        assert_eq!(check_decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn garbage_base58_is_rejected() {
        assert!(matches!(check_decode("0OIl"), Err(Error::BadChecksum)));
        assert!(matches!(check_decode(""), Err(Error::BadChecksum)));
        assert!(matches!(check_decode("2g"), Err(Error::BadChecksum)));
    }
}

//! Generic [`CurveBackend`] over the RustCrypto `elliptic-curve` stack.
//!
//! One implementation serves every curve crate that exposes the required
//! arithmetic traits; [`Secp256k1Backend`] and [`NistP256Backend`] are the
//! instantiations wired up by default.

use core::marker::PhantomData;

use ecdsa::{
    hazmat::{bits2field, SignPrimitive, VerifyPrimitive},
    RecoveryId, Signature, SignatureSize, VerifyingKey,
};
use elliptic_curve::{
    ecdh::diffie_hellman,
    generic_array::{typenum::Unsigned, ArrayLength},
    ops::{Invert, Reduce},
    point::DecompressPoint,
    sec1::{EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    subtle::CtOption,
    AffinePoint, CurveArithmetic, Field, FieldBytes, FieldBytesSize, PrimeCurve, PrimeField,
    Scalar, SecretKey,
};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::backend::{BackendError, CurveBackend};

type HmacSha512 = Hmac<Sha512>;

/// Recovery header base of an uncompressed-key signature.
const RECOVERY_BASE: u8 = 27;
/// Added to the header when the signer's public key is compressed.
const RECOVERY_COMPRESSED_FLAG: u8 = 4;

/// HMAC key of the master-key round of child derivation.
const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// [`CurveBackend`] over a RustCrypto curve crate.
pub struct RustCryptoBackend<C> {
    _curve: PhantomData<C>,
}

/// secp256k1 backend.
pub type Secp256k1Backend = RustCryptoBackend<k256::Secp256k1>;
/// prime256v1 (a.k.a. secp256r1 / NIST P-256) backend.
pub type NistP256Backend = RustCryptoBackend<p256::NistP256>;

impl<C> Default for RustCryptoBackend<C> {
    fn default() -> Self {
        Self {
            _curve: PhantomData,
        }
    }
}

impl<C> RustCryptoBackend<C>
where
    C: PrimeCurve + CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    fn coordinate_length() -> usize {
        FieldBytesSize::<C>::USIZE
    }

    fn parse_secret(scalar: &[u8]) -> Result<SecretKey<C>, BackendError> {
        if scalar.len() != Self::coordinate_length() {
            return Err(BackendError::InvalidScalar);
        }
        SecretKey::from_slice(scalar).map_err(|_| BackendError::InvalidScalar)
    }

    fn point_from_xy(x: &[u8], y: &[u8]) -> Result<AffinePoint<C>, BackendError> {
        let length = Self::coordinate_length();
        if x.len() != length || y.len() != length {
            return Err(BackendError::InvalidPoint);
        }
        let encoded = EncodedPoint::<C>::from_affine_coordinates(
            FieldBytes::<C>::from_slice(x),
            FieldBytes::<C>::from_slice(y),
            false,
        );
        Option::<AffinePoint<C>>::from(AffinePoint::<C>::from_encoded_point(&encoded))
            .ok_or(BackendError::InvalidPoint)
    }

    fn point_to_xy(point: &AffinePoint<C>) -> Result<(Vec<u8>, Vec<u8>), BackendError> {
        let encoded = point.to_encoded_point(false);
        let x = encoded.x().ok_or(BackendError::InvalidPoint)?;
        let y = encoded.y().ok_or(BackendError::InvalidPoint)?;
        Ok((x.as_slice().to_vec(), y.as_slice().to_vec()))
    }
}

impl<C> CurveBackend for RustCryptoBackend<C>
where
    C: PrimeCurve + CurveArithmetic,
    Scalar<C>: SignPrimitive<C>
        + Invert<Output = CtOption<Scalar<C>>>
        + Reduce<C::Uint, Bytes = FieldBytes<C>>,
    SignatureSize<C>: ArrayLength<u8>,
    AffinePoint<C>:
        DecompressPoint<C> + FromEncodedPoint<C> + ToEncodedPoint<C> + VerifyPrimitive<C>,
    FieldBytesSize<C>: ModulusSize,
{
    fn scalar_length(&self) -> usize {
        Self::coordinate_length()
    }

    fn new_private_key(&self) -> Vec<u8> {
        SecretKey::<C>::random(&mut OsRng).to_bytes().as_slice().to_vec()
    }

    fn private_to_public(&self, scalar: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError> {
        let secret = Self::parse_secret(scalar)?;
        let public = secret.public_key();
        Self::point_to_xy(public.as_affine())
    }

    fn ecdh(&self, scalar: &[u8], point: (&[u8], &[u8])) -> Result<Vec<u8>, BackendError> {
        let secret = Self::parse_secret(scalar)?;
        let point = Self::point_from_xy(point.0, point.1)?;
        let shared = diffie_hellman(secret.to_nonzero_scalar(), &point);
        Ok(shared.raw_secret_bytes().as_slice().to_vec())
    }

    fn decompress_point(&self, data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError> {
        if data.len() != 1 + Self::coordinate_length() || !matches!(data[0], 0x02 | 0x03) {
            return Err(BackendError::InvalidPoint);
        }
        let encoded = EncodedPoint::<C>::from_bytes(data).map_err(|_| BackendError::InvalidPoint)?;
        let point = Option::<AffinePoint<C>>::from(AffinePoint::<C>::from_encoded_point(&encoded))
            .ok_or(BackendError::InvalidPoint)?;
        Self::point_to_xy(&point)
    }

    fn sign(
        &self,
        digest: &[u8],
        scalar: &[u8],
        recoverable: bool,
        compressed: bool,
        entropy: &[u8],
    ) -> Result<Vec<u8>, BackendError> {
        let secret = Self::parse_secret(scalar)?;
        let z = bits2field::<C>(digest).map_err(|_| BackendError::InvalidDigest)?;

        let k = reduce_to_scalar::<C>(entropy)?;
        if bool::from(k.is_zero()) {
            return Err(BackendError::InvalidEntropy);
        }

        let signing_scalar = secret.to_nonzero_scalar();
        let scalar_ref: &Scalar<C> = signing_scalar.as_ref();
        let (signature, recovery_id) = scalar_ref
            .try_sign_prehashed(k, &z)
            .map_err(|_| BackendError::SigningFailed)?;

        // Low-S normalization flips the parity carried by the recovery id.
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(normalized) => (
                normalized,
                recovery_id.map(|id| RecoveryId::new(!id.is_y_odd(), id.is_x_reduced())),
            ),
            None => (signature, recovery_id),
        };

        let mut out = Vec::with_capacity(usize::from(recoverable) + 2 * Self::coordinate_length());
        if recoverable {
            let id = recovery_id.ok_or(BackendError::RecoveryFailed)?;
            let mut header = RECOVERY_BASE + id.to_byte();
            if compressed {
                header += RECOVERY_COMPRESSED_FLAG;
            }
            out.push(header);
        }
        out.extend_from_slice(signature.to_bytes().as_slice());
        Ok(out)
    }

    fn verify(
        &self,
        signature: &[u8],
        digest: &[u8],
        point: (&[u8], &[u8]),
    ) -> Result<bool, BackendError> {
        let point = Self::point_from_xy(point.0, point.1)?;
        let signature =
            Signature::<C>::from_slice(signature).map_err(|_| BackendError::InvalidSignature)?;
        let z = bits2field::<C>(digest).map_err(|_| BackendError::InvalidDigest)?;
        Ok(point.verify_prehashed(&z, &signature).is_ok())
    }

    fn recover(&self, signature: &[u8], digest: &[u8]) -> Result<(Vec<u8>, Vec<u8>), BackendError> {
        let (&header, components) = signature
            .split_first()
            .ok_or(BackendError::InvalidSignature)?;
        if components.len() != 2 * Self::coordinate_length() {
            return Err(BackendError::InvalidSignature);
        }
        if header < RECOVERY_BASE {
            return Err(BackendError::InvalidRecoveryHeader(header));
        }
        let id = RecoveryId::from_byte((header - RECOVERY_BASE) & 0x03)
            .ok_or(BackendError::InvalidRecoveryHeader(header))?;
        let signature =
            Signature::<C>::from_slice(components).map_err(|_| BackendError::InvalidSignature)?;
        let recovered = VerifyingKey::<C>::recover_from_prehash(digest, &signature, id)
            .map_err(|_| BackendError::RecoveryFailed)?;
        Self::point_to_xy(recovered.as_affine())
    }

    fn derive_child(&self, seed: &[u8], index: u32) -> Result<Vec<u8>, BackendError> {
        // Master key and chain code from the seed.
        let round1 = hmac_sha512(MASTER_SEED_KEY, &[seed]);
        let master = reduce_to_scalar::<C>(&round1[..32])?;
        if bool::from(master.is_zero()) {
            return Err(BackendError::DerivationFailed);
        }
        let chain_code = &round1[32..];

        // Compressed public key of the master key.
        let master_bytes = Zeroizing::new(master.to_repr().as_slice().to_vec());
        let (x, y) = self.private_to_public(&master_bytes)?;
        let mut master_public = Vec::with_capacity(1 + x.len());
        master_public.push(0x02 + (y.last().copied().unwrap_or_default() & 1));
        master_public.extend_from_slice(&x);

        // One non-hardened child step.
        let round2 = hmac_sha512(chain_code, &[&master_public, &index.to_be_bytes()]);
        let tweak = reduce_to_scalar::<C>(&round2[..32])?;
        let child = master + tweak;
        if bool::from(child.is_zero()) {
            return Err(BackendError::DerivationFailed);
        }
        Ok(child.to_repr().as_slice().to_vec())
    }

    fn name(&self) -> &'static str {
        "rust-crypto"
    }
}

/// Reduce arbitrary bytes to a curve scalar (left-truncating or zero-padding
/// to the field width first).
fn reduce_to_scalar<C>(bytes: &[u8]) -> Result<Scalar<C>, BackendError>
where
    C: PrimeCurve + CurveArithmetic,
    Scalar<C>: Reduce<C::Uint, Bytes = FieldBytes<C>>,
{
    let field = bits2field::<C>(bytes).map_err(|_| BackendError::InvalidEntropy)?;
    Ok(<Scalar<C> as Reduce<C::Uint>>::reduce_bytes(&field))
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        mac.update(part);
    }
    Zeroizing::new(mac.finalize().into_bytes().into())
}

//! Curve factory: resolve a name to parameters and bind collaborators.

use ecckit_backend::{AesCipher, CurveBackend, NistP256Backend, Secp256k1Backend, SymmetricCipher};

use crate::{
    error::Error,
    registry::{self, CurveParams},
};

/// A named curve bound to an arithmetic backend and a symmetric cipher
/// engine.
///
/// The binding is immutable and no cross-call state is retained, so a
/// single instance may be shared across threads; all higher-level
/// operations (codecs, ECIES, signing, derivation, text encodings) hang
/// off this type.
pub struct EllipticCurve {
    params: &'static CurveParams,
    backend: Box<dyn CurveBackend>,
    cipher: Box<dyn SymmetricCipher>,
}

impl EllipticCurve {
    /// Bind `name` to the default backend and cipher engine.
    ///
    /// Fails with [`Error::UnknownCurve`] when the registry has no such
    /// curve, and with [`Error::UnsupportedCurve`] when the curve is known
    /// but no backend implementation is wired up for it.
    pub fn new(name: &str) -> Result<Self, Error> {
        let params =
            registry::find(name).ok_or_else(|| Error::UnknownCurve(name.to_string()))?;
        let backend: Box<dyn CurveBackend> = match params.name {
            "secp256k1" => Box::new(Secp256k1Backend::default()),
            "prime256v1" => Box::new(NistP256Backend::default()),
            _ => return Err(Error::UnsupportedCurve(name.to_string())),
        };
        Ok(Self {
            params,
            backend,
            cipher: Box::new(AesCipher),
        })
    }

    /// Bind `name` to caller-supplied collaborators.
    pub fn with_backend(
        name: &str,
        backend: Box<dyn CurveBackend>,
        cipher: Box<dyn SymmetricCipher>,
    ) -> Result<Self, Error> {
        let params =
            registry::find(name).ok_or_else(|| Error::UnknownCurve(name.to_string()))?;
        Ok(Self {
            params,
            backend,
            cipher,
        })
    }

    /// Registry parameters of the bound curve.
    pub fn params(&self) -> &'static CurveParams {
        self.params
    }

    /// Canonical curve name.
    pub fn name(&self) -> &'static str {
        self.params.name
    }

    /// Numeric curve identifier.
    pub fn id(&self) -> u16 {
        self.params.id
    }

    /// Technology name of the bound arithmetic backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Byte length `L` of scalars and affine coordinates.
    pub fn scalar_length(&self) -> usize {
        self.backend.scalar_length()
    }

    pub(crate) fn backend(&self) -> &dyn CurveBackend {
        self.backend.as_ref()
    }

    pub(crate) fn cipher(&self) -> &dyn SymmetricCipher {
        self.cipher.as_ref()
    }
}

impl core::fmt::Debug for EllipticCurve {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EllipticCurve")
            .field("name", &self.params.name)
            .field("id", &self.params.id)
            .field("backend", &self.backend.name())
            .finish()
    }
}

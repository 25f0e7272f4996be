//! Public-key wire formats.
//!
//! Two encodings: the compact SEC1-style form (`0x02`/`0x03` prefix plus x,
//! or `0x04` plus both coordinates), and a self-describing tagged form
//! (`id:u16be || xlen:u16be || x || ylen:u16be || y`) used to embed an
//! ephemeral key inside an ECIES envelope so the decoder can validate the
//! curve and locate the field boundary without external context.

use crate::{curve::EllipticCurve, error::Error};

const PREFIX_UNCOMPRESSED: u8 = 0x04;

/// Encode affine coordinates in the compact form.
pub(crate) fn encode_point(x: &[u8], y: &[u8], compressed: bool) -> Vec<u8> {
    if compressed {
        let parity = y.last().copied().unwrap_or_default() & 1;
        let mut out = Vec::with_capacity(1 + x.len());
        out.push(0x02 + parity);
        out.extend_from_slice(x);
        out
    } else {
        let mut out = Vec::with_capacity(1 + x.len() + y.len());
        out.push(PREFIX_UNCOMPRESSED);
        out.extend_from_slice(x);
        out.extend_from_slice(y);
        out
    }
}

fn read_u16(data: &[u8], at: usize) -> Result<u16, Error> {
    data.get(at..at + 2)
        .map(|bytes| u16::from_be_bytes([bytes[0], bytes[1]]))
        .ok_or(Error::Truncated {
            need: at + 2,
            got: data.len(),
        })
}

impl EllipticCurve {
    /// Compact (SEC1-style) encoding of affine coordinates.
    pub fn encode_public_key(&self, x: &[u8], y: &[u8], compressed: bool) -> Vec<u8> {
        encode_point(x, y, compressed)
    }

    /// Tagged (self-describing) encoding of affine coordinates.
    pub fn encode_public_key_tagged(&self, x: &[u8], y: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 + x.len() + y.len());
        out.extend_from_slice(&self.id().to_be_bytes());
        out.extend_from_slice(&(x.len() as u16).to_be_bytes());
        out.extend_from_slice(x);
        out.extend_from_slice(&(y.len() as u16).to_be_bytes());
        out.extend_from_slice(y);
        out
    }

    /// Decode a compact public key, requiring the buffer to be consumed
    /// exactly.
    pub fn decode_public_key(&self, data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), Error> {
        self.decode_compact(data, false).map(|(point, _)| point)
    }

    /// Decode a compact public key from the front of `data`, returning the
    /// point and the number of bytes consumed.
    pub fn decode_public_key_partial(
        &self,
        data: &[u8],
    ) -> Result<((Vec<u8>, Vec<u8>), usize), Error> {
        self.decode_compact(data, true)
    }

    /// Decode the tagged format, requiring the buffer to be consumed
    /// exactly.
    pub fn decode_public_key_tagged(&self, data: &[u8]) -> Result<(Vec<u8>, Vec<u8>), Error> {
        self.decode_tagged(data, false).map(|(point, _)| point)
    }

    /// Decode the tagged format from the front of `data`, returning the
    /// point and the number of bytes consumed.
    pub fn decode_public_key_tagged_partial(
        &self,
        data: &[u8],
    ) -> Result<((Vec<u8>, Vec<u8>), usize), Error> {
        self.decode_tagged(data, true)
    }

    fn decode_compact(
        &self,
        data: &[u8],
        partial: bool,
    ) -> Result<((Vec<u8>, Vec<u8>), usize), Error> {
        let length = self.scalar_length();
        let prefix = *data.first().ok_or(Error::Truncated { need: 1, got: 0 })?;
        match prefix {
            PREFIX_UNCOMPRESSED => {
                let expected = 1 + 2 * length;
                self.check_compact_length(data, expected, partial, "uncompressed public key")?;
                let x = data[1..1 + length].to_vec();
                let y = data[1 + length..expected].to_vec();
                Ok(((x, y), expected))
            }
            0x02 | 0x03 => {
                let expected = 1 + length;
                self.check_compact_length(data, expected, partial, "compressed public key")?;
                let (x, y) = self.backend().decompress_point(&data[..expected])?;
                // Guard against a faulty decompression backend.
                if x != data[1..expected] {
                    return Err(Error::InvalidKey("decompressed x coordinate mismatch"));
                }
                Ok(((x, y), expected))
            }
            _ => Err(Error::InvalidKey("public key prefix")),
        }
    }

    fn check_compact_length(
        &self,
        data: &[u8],
        expected: usize,
        partial: bool,
        what: &'static str,
    ) -> Result<(), Error> {
        if partial {
            if data.len() < expected {
                return Err(Error::Truncated {
                    need: expected,
                    got: data.len(),
                });
            }
        } else if data.len() != expected {
            return Err(Error::InvalidKey(what));
        }
        Ok(())
    }

    fn decode_tagged(
        &self,
        data: &[u8],
        partial: bool,
    ) -> Result<((Vec<u8>, Vec<u8>), usize), Error> {
        let id = read_u16(data, 0)?;
        if id != self.id() {
            return Err(Error::CurveMismatch {
                expected: self.id(),
                found: id,
            });
        }

        let x_length = read_u16(data, 2)? as usize;
        let mut position = 4;
        let x = data
            .get(position..position + x_length)
            .ok_or(Error::Truncated {
                need: position + x_length,
                got: data.len(),
            })?
            .to_vec();
        position += x_length;

        let y_length = read_u16(data, position)? as usize;
        position += 2;
        let y = data
            .get(position..position + y_length)
            .ok_or(Error::Truncated {
                need: position + y_length,
                got: data.len(),
            })?
            .to_vec();
        position += y_length;

        if !partial && position < data.len() {
            return Err(Error::TrailingData(data.len() - position));
        }
        Ok(((x, y), position))
    }
}

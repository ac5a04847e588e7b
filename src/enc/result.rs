//! # Owned NAL Unit Packaging
//!
//! The encoder hands back an array of transient NAL descriptors whose bytes
//! live in engine memory and are only valid until the next engine call. This
//! module copies such a batch into independently-owned [`NALUnit`] values:
//! one exact-size buffer per unit holding the 4-byte little-endian length
//! header immediately followed by the payload copy, with the type tag and
//! the caller's correlation value carried alongside.
//!
//! Construction is all-or-nothing. Buffers are reserved with
//! [`Vec::try_reserve_exact`], so an allocation failure at any point surfaces
//! as [`XvcError::Alloc`] and everything built so far is released on the way
//! out; the caller never sees a partially-copied batch.
//!
//! ## Example
//!
//! ```rust
//! use xvcio::enc::{copy_nal_units, NalDescriptor};
//! use xvcio::types::NALUnitType;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let descriptors = [
//!     NalDescriptor {
//!         payload: b"AB",
//!         nal_type: NALUnitType::IntraAccessPicture,
//!         user_data: 100,
//!     },
//!     NalDescriptor {
//!         payload: b"",
//!         nal_type: NALUnitType::PredictedPicture,
//!         user_data: 101,
//!     },
//! ];
//!
//! let units = copy_nal_units(&descriptors)?;
//! assert_eq!(units.len(), 2);
//! assert_eq!(units[0].as_bytes(), &[0x02, 0x00, 0x00, 0x00, b'A', b'B']);
//! assert_eq!(units[1].as_bytes(), &[0x00, 0x00, 0x00, 0x00]);
//! assert_eq!(units[1].user_data(), 101);
//! # Ok(())
//! # }
//! ```

use std::collections::TryReserveError;

use bytes::Bytes;

use crate::error::{Result, XvcError};
use crate::framing;
use crate::types::NALUnitType;

/// Borrowed view of one NAL unit as produced by the engine.
///
/// The payload slice points at engine-owned memory; the lifetime keeps it
/// from being retained past the call that produced it.
#[derive(Debug, Clone, Copy)]
pub struct NalDescriptor<'a> {
    /// Encoded payload bytes, valid only for the duration of the borrow.
    pub payload: &'a [u8],
    /// Category tag reported by the engine.
    pub nal_type: NALUnitType,
    /// Correlation value supplied when the originating frame was submitted.
    pub user_data: i64,
}

/// One owned, length-framed NAL unit.
///
/// The backing buffer holds the 4-byte little-endian length header followed
/// by the payload copy, so [`NALUnit::as_bytes`] is exactly what goes on the
/// wire and concatenated units form a stream that
/// [`FramedUnits`](crate::framing::FramedUnits) can split again. Fields are
/// fixed at construction; dropping the unit releases its buffer.
#[derive(Debug, Clone)]
pub struct NALUnit {
    data: Bytes,
    size: u32,
    nal_type: NALUnitType,
    user_data: i64,
}

impl NALUnit {
    /// Copies `payload` into a fresh framed unit.
    ///
    /// Fails with [`XvcError::Alloc`] if the buffer cannot be reserved, or
    /// [`XvcError::InvalidData`] if the payload cannot be described by a
    /// 32-bit length header.
    pub fn from_payload(payload: &[u8], nal_type: NALUnitType, user_data: i64) -> Result<Self> {
        let descriptor = NalDescriptor {
            payload,
            nal_type,
            user_data,
        };
        Self::copy_with(&descriptor, &mut exact_buffer)
    }

    fn copy_with<F>(descriptor: &NalDescriptor<'_>, alloc: &mut F) -> Result<Self>
    where
        F: FnMut(usize) -> std::result::Result<Vec<u8>, TryReserveError>,
    {
        let size = u32::try_from(descriptor.payload.len()).map_err(|_| {
            XvcError::InvalidData(format!(
                "NAL payload of {} bytes does not fit a 32-bit length header",
                descriptor.payload.len()
            ))
        })?;
        let mut data = alloc(framing::HEADER_LEN + descriptor.payload.len())?;
        data.extend_from_slice(&framing::length_header(size));
        data.extend_from_slice(descriptor.payload);
        Ok(Self {
            data: Bytes::from(data),
            size,
            nal_type: descriptor.nal_type,
            user_data: descriptor.user_data,
        })
    }

    /// Full framed layout: length header followed by the payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The payload bytes without the framing header.
    pub fn payload(&self) -> &[u8] {
        &self.data[framing::HEADER_LEN..]
    }

    /// The 4-byte little-endian length header.
    pub fn header(&self) -> [u8; framing::HEADER_LEN] {
        let mut header = [0u8; framing::HEADER_LEN];
        header.copy_from_slice(&self.data[..framing::HEADER_LEN]);
        header
    }

    /// Payload byte count; always equals the value the header declares.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Category tag reported by the engine.
    pub fn nal_type(&self) -> NALUnitType {
        self.nal_type
    }

    /// Correlation value round-tripped from the originating submit call.
    pub fn user_data(&self) -> i64 {
        self.user_data
    }

    /// Consumes the unit and hands back its framed buffer without copying.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Copies a batch of transient NAL descriptors into owned framed units.
///
/// Units come back in descriptor order, one per descriptor; an empty batch
/// yields an empty vector, which is the legal "no output" outcome. On any
/// allocation failure the partial batch is released before the error is
/// returned, so there is nothing for the caller to clean up.
pub fn copy_nal_units(descriptors: &[NalDescriptor<'_>]) -> Result<Vec<NALUnit>> {
    copy_nal_units_with(descriptors, exact_buffer)
}

fn copy_nal_units_with<F>(descriptors: &[NalDescriptor<'_>], mut alloc: F) -> Result<Vec<NALUnit>>
where
    F: FnMut(usize) -> std::result::Result<Vec<u8>, TryReserveError>,
{
    let mut units = Vec::new();
    units.try_reserve_exact(descriptors.len())?;
    for descriptor in descriptors {
        units.push(NALUnit::copy_with(descriptor, &mut alloc)?);
    }
    Ok(units)
}

/// Reserves an empty buffer of exactly `capacity` bytes, reporting failure
/// instead of aborting.
fn exact_buffer(capacity: usize) -> std::result::Result<Vec<u8>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    fn descriptors<'a>(payloads: &'a [&'a [u8]]) -> Vec<NalDescriptor<'a>> {
        payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| NalDescriptor {
                payload,
                nal_type: NALUnitType::from(i as u32),
                user_data: 1000 + i as i64,
            })
            .collect()
    }

    fn reserve_failure() -> TryReserveError {
        let mut probe: Vec<u8> = Vec::new();
        probe.try_reserve_exact(usize::MAX).unwrap_err()
    }

    #[test]
    fn test_copy_preserves_count_order_and_metadata() {
        let batch = descriptors(&[b"first", b"second unit", b"x"]);
        let units = copy_nal_units(&batch).unwrap();

        assert_eq!(units.len(), 3);
        for (unit, descriptor) in units.iter().zip(&batch) {
            assert_eq!(unit.payload(), descriptor.payload);
            assert_eq!(unit.size() as usize, descriptor.payload.len());
            assert_eq!(unit.nal_type(), descriptor.nal_type);
            assert_eq!(unit.user_data(), descriptor.user_data);
        }
    }

    #[test]
    fn test_empty_batch_yields_empty_vec() {
        let units = copy_nal_units(&[]).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_framed_layout_of_known_batch() {
        let batch = [
            NalDescriptor {
                payload: b"AB",
                nal_type: NALUnitType::IntraAccessPicture,
                user_data: 100,
            },
            NalDescriptor {
                payload: b"",
                nal_type: NALUnitType::PredictedPicture,
                user_data: 101,
            },
        ];
        let units = copy_nal_units(&batch).unwrap();

        assert_eq!(units[0].header(), [0x02, 0x00, 0x00, 0x00]);
        assert_eq!(units[0].as_bytes(), &[0x02, 0x00, 0x00, 0x00, b'A', b'B']);
        assert_eq!(units[0].user_data(), 100);
        assert_eq!(units[1].header(), [0x00, 0x00, 0x00, 0x00]);
        assert_eq!(units[1].as_bytes(), &[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(units[1].payload(), b"");
        assert_eq!(units[1].user_data(), 101);
    }

    #[test]
    fn test_header_matches_size_accessor() {
        for payload in [&b""[..], &b"a"[..], &b"four"[..], &[0u8; 300][..]] {
            let unit = NALUnit::from_payload(payload, NALUnitType::Sei, 0).unwrap();
            assert_eq!(
                crate::framing::header_value(unit.header()) as usize,
                payload.len()
            );
            assert_eq!(unit.size() as usize, payload.len());
            assert_eq!(unit.as_bytes().len(), payload.len() + 4);
        }
    }

    #[test]
    fn test_allocation_failure_mid_batch_returns_error() {
        let batch = descriptors(&[b"one", b"two", b"three", b"four"]);
        for fail_at in 0..batch.len() {
            let mut calls = 0;
            let outcome = copy_nal_units_with(&batch, |capacity| {
                if calls == fail_at {
                    return Err(reserve_failure());
                }
                calls += 1;
                exact_buffer(capacity)
            });
            assert!(matches!(outcome, Err(XvcError::Alloc(_))));
            // Construction stops at the failing unit; nothing past it is
            // attempted.
            assert_eq!(calls, fail_at);
        }
    }

    #[test]
    fn test_into_bytes_is_the_framed_buffer() {
        let unit = NALUnit::from_payload(b"xyz", NALUnitType::SegmentHeader, 5).unwrap();
        let framed = unit.clone().into_bytes();
        assert_eq!(&framed[..], unit.as_bytes());
    }

    #[test]
    fn test_units_split_back_through_framing() {
        let batch = descriptors(&[b"alpha", b"", b"gamma"]);
        let units = copy_nal_units(&batch).unwrap();

        let mut stream = Vec::new();
        for unit in &units {
            stream.extend_from_slice(unit.as_bytes());
        }
        let payloads: Result<Vec<&[u8]>> = crate::framing::FramedUnits::new(&stream).collect();
        let payloads = payloads.unwrap();
        assert_eq!(payloads, vec![&b"alpha"[..], &b""[..], &b"gamma"[..]]);
    }

    #[quickcheck]
    fn prop_copy_preserves_payload_bytes(payloads: Vec<Vec<u8>>) -> bool {
        let batch: Vec<NalDescriptor<'_>> = payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| NalDescriptor {
                payload,
                nal_type: NALUnitType::from((i % 20) as u32),
                user_data: i as i64,
            })
            .collect();
        match copy_nal_units(&batch) {
            Ok(units) => {
                units.len() == payloads.len()
                    && units
                        .iter()
                        .zip(&payloads)
                        .all(|(unit, payload)| unit.payload() == payload.as_slice())
            }
            Err(_) => false,
        }
    }
}

//! # Length-Prefixed NAL Framing
//!
//! Every NAL unit leaving this crate is framed as a 4-byte little-endian
//! unsigned payload length immediately followed by exactly that many payload
//! bytes. Concatenating framed units produces a self-delimiting stream; this
//! module owns the header encoding and the reverse operation of splitting a
//! concatenated stream back into payloads.
//!
//! ## Example
//!
//! ```rust
//! use xvcio::framing::{self, FramedUnits};
//!
//! let mut stream = Vec::new();
//! stream.extend_from_slice(&framing::length_header(2));
//! stream.extend_from_slice(b"AB");
//! stream.extend_from_slice(&framing::length_header(0));
//!
//! let payloads: Result<Vec<&[u8]>, _> = FramedUnits::new(&stream).collect();
//! assert_eq!(payloads.unwrap(), vec![&b"AB"[..], &b""[..]]);
//! ```

use crate::error::{Result, XvcError};

/// Size in bytes of the length header preceding every framed payload.
pub const HEADER_LEN: usize = 4;

/// Encodes a payload length as the 4-byte little-endian framing header.
pub fn length_header(payload_len: u32) -> [u8; HEADER_LEN] {
    payload_len.to_le_bytes()
}

/// Decodes a framing header back into the payload length it declares.
pub fn header_value(header: [u8; HEADER_LEN]) -> u32 {
    u32::from_le_bytes(header)
}

/// Iterator that splits a concatenated framed stream into payload slices.
///
/// Yields one `Ok(payload)` per framed unit in stream order. A stream that
/// ends mid-header or mid-payload yields a single `Err` and then fuses.
#[derive(Debug)]
pub struct FramedUnits<'a> {
    rest: &'a [u8],
    failed: bool,
}

impl<'a> FramedUnits<'a> {
    /// Creates an iterator over `stream`. An empty stream yields nothing.
    pub fn new(stream: &'a [u8]) -> Self {
        Self {
            rest: stream,
            failed: false,
        }
    }
}

impl<'a> Iterator for FramedUnits<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        if self.rest.len() < HEADER_LEN {
            self.failed = true;
            return Some(Err(XvcError::InvalidData(format!(
                "truncated framing header: {} bytes remaining",
                self.rest.len()
            ))));
        }
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&self.rest[..HEADER_LEN]);
        let len = header_value(header) as usize;
        if self.rest.len() - HEADER_LEN < len {
            self.failed = true;
            return Some(Err(XvcError::InvalidData(format!(
                "truncated payload: header declares {} bytes, {} remaining",
                len,
                self.rest.len() - HEADER_LEN
            ))));
        }
        let payload = &self.rest[HEADER_LEN..HEADER_LEN + len];
        self.rest = &self.rest[HEADER_LEN + len..];
        Some(Ok(payload))
    }
}

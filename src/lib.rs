#![doc(html_root_url = "https://docs.rs/xvcio/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # xvcio - Safe Rust bindings for the xvc video codec
//!
//! `xvcio` wraps the xvc encoder and decoder libraries behind a safe API.
//! Everything that crosses the engine boundary is copied into owned values:
//! encoded output comes back as independently-droppable [`NALUnit`]s, each
//! carrying a 4-byte little-endian length header ahead of its payload plus
//! the unit's type tag and the correlation value the caller attached to the
//! originating frame. Decoded pictures come back the same way, copied out of
//! engine memory with their stats.
//!
//! The engine ships as two shared libraries, `libxvcenc` and `libxvcdec`,
//! which are discovered and loaded at runtime when the first instance is
//! created; nothing links at build time. Set `XVC_LIBRARY_PATH` to point at
//! a non-standard install.
//!
//! ## Features
//!
//! - Owned, length-framed NAL unit output that outlives the encoder
//! - All-or-nothing packaging: allocation failure returns an error and
//!   releases everything built so far
//! - Correlation values round-tripped from submitted frame to emitted unit
//! - Full encoder and decoder lifecycle behind RAII types
//! - Engine status codes preserved verbatim in every error
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! xvcio = "0.1.0"
//! ```
//!
//! ### Encoding Example
//!
//! ```rust,no_run
//! use xvcio::enc::YuvFrame;
//! use xvcio::{Encoder, EncoderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut encoder = Encoder::new(EncoderConfig::new(640, 360))?;
//!
//!     let y = vec![0u8; 640 * 360];
//!     let u = vec![0u8; 320 * 180];
//!     let v = vec![0u8; 320 * 180];
//!     let frame = YuvFrame {
//!         planes: [&y, &u, &v],
//!         strides: [640, 320, 320],
//!     };
//!
//!     // The frame number makes a handy correlation value.
//!     for unit in encoder.encode(&frame, 0)? {
//!         println!("{}: {} bytes", unit.nal_type(), unit.size());
//!     }
//!
//!     loop {
//!         let drained = encoder.flush()?;
//!         for unit in &drained.units {
//!             println!("{}: {} bytes", unit.nal_type(), unit.size());
//!         }
//!         if drained.is_done() {
//!             break;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Decoding Example
//!
//! ```rust,no_run
//! use xvcio::framing::FramedUnits;
//! use xvcio::{Decoder, DecoderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = std::fs::read("movie.xvc")?;
//!     let mut decoder = Decoder::new(DecoderConfig::new())?;
//!
//!     for payload in FramedUnits::new(&stream) {
//!         decoder.decode_nal(payload?, 0)?;
//!         while let Some(picture) = decoder.decoded_picture()? {
//!             let stats = picture.stats();
//!             println!("{}x{} picture", stats.width, stats.height);
//!         }
//!     }
//!
//!     decoder.flush()?;
//!     while let Some(picture) = decoder.decoded_picture()? {
//!         println!("drained picture {}", picture.stats().poc);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - `enc`: Encoder gateway and NAL unit packaging
//!   - Encoder lifecycle and configuration
//!   - Owned, length-framed unit output
//!   - End-of-stream flush with explicit completion status
//!
//! - `dec`: Decoder gateway
//!   - Decoder lifecycle and configuration
//!   - Owned picture output with engine-reported stats
//!
//! - `framing`: The length-framed wire layout
//!   - Header encoding and decoding
//!   - Splitting a framed stream back into payloads
//!
//! - `types`: Engine status codes and media enums
//!
//! - `error`: Error types and utilities

/// Decoder gateway and owned picture output
pub mod dec;

/// Encoder gateway and owned, length-framed NAL unit output
pub mod enc;

/// Error types and utilities
pub mod error;

/// Length-framed wire layout helpers
pub mod framing;

/// Engine status codes and media enums
pub mod types;

pub(crate) mod sys;

pub use error::{Result, XvcError};

// Re-export the gateways and the unit type for convenience
pub use dec::{DecodedPicture, Decoder, DecoderConfig};
pub use enc::{Encoder, EncoderConfig, NALUnit};

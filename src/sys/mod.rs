//! # Raw Engine Surface
//!
//! `#[repr(C)]` layouts for the xvc engine's public structs and its two
//! function-pointer API tables, plus the loader that opens `libxvcenc` /
//! `libxvcdec` at runtime and resolves their `*_api_get` entry points.
//!
//! Nothing here interprets values: return codes and enum constants travel as
//! raw integers and are given names by [`crate::types`]. The safe gateways in
//! [`crate::enc`] and [`crate::dec`] are the only callers.

pub(crate) mod dec;
pub(crate) mod enc;
pub(crate) mod loader;

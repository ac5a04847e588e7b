use std::collections::TryReserveError;
use thiserror::Error;

use crate::types::{DecoderStatus, EncoderStatus};

/// Errors produced while driving the xvc engine or packaging its output.
#[derive(Error, Debug)]
pub enum XvcError {
    /// Buffer or container allocation failed while copying engine output.
    /// Everything allocated before the failure has already been released.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// The encoder reported a non-success status. The raw engine code is
    /// preserved inside.
    #[error("encoder error: {0}")]
    Encoder(EncoderStatus),

    /// The decoder reported a non-success status. The raw engine code is
    /// preserved inside.
    #[error("decoder error: {0}")]
    Decoder(DecoderStatus),

    /// The engine shared library could not be located, opened, or was missing
    /// a required entry point.
    #[error("library error: {0}")]
    Library(String),

    /// Input violated the call contract (plane slice too short, truncated
    /// framed stream, payload too large to frame).
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XvcError>;

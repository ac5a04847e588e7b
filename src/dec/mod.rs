//! # Decoding
//!
//! Safe wrapper around the engine's decoder API. [`Decoder`] owns one engine
//! instance; NAL unit payloads go in through [`Decoder::decode_nal`] and
//! decoded frames come back from [`Decoder::decoded_picture`] as owned
//! [`DecodedPicture`] values copied out of engine memory.
//!
//! Payloads are the bare NAL bytes without length framing; use
//! [`FramedUnits`](crate::framing::FramedUnits) to split a framed stream
//! first.
//!
//! ## Example
//!
//! ```no_run
//! use xvcio::dec::{Decoder, DecoderConfig};
//! use xvcio::framing::FramedUnits;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = std::fs::read("movie.xvc")?;
//! let mut decoder = Decoder::new(DecoderConfig::new())?;
//!
//! for payload in FramedUnits::new(&stream) {
//!     decoder.decode_nal(payload?, 0)?;
//!     if let Some(picture) = decoder.decoded_picture()? {
//!         let stats = picture.stats();
//!         println!("{}x{} picture", stats.width, stats.height);
//!     }
//! }
//!
//! decoder.flush()?;
//! while let Some(picture) = decoder.decoded_picture()? {
//!     println!("drained picture {}", picture.stats().poc);
//! }
//! # Ok(())
//! # }
//! ```

use std::os::raw::c_int;

use bytes::Bytes;
use log::{debug, info};

use crate::error::{Result, XvcError};
use crate::sys::dec as sys;
use crate::sys::loader::{missing_entry, DecoderApi};
use crate::types::{ChromaFormat, ColorMatrix, DecoderStatus, NALUnitType};

/// Decoder settings forwarded to the engine when the instance is created.
///
/// All settings describe the *output* side; the bitstream dictates the rest.
/// A zero output size keeps the coded picture size.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Output width in luma samples; 0 keeps the coded width.
    pub output_width: u32,
    /// Output height in luma samples; 0 keeps the coded height.
    pub output_height: u32,
    /// Chroma layout pictures are converted to on the way out.
    pub output_chroma_format: ChromaFormat,
    /// Color matrix pictures are converted to on the way out.
    pub output_color_matrix: ColorMatrix,
    /// Bit depth of the output samples.
    pub output_bitdepth: u32,
    /// Upper bound on the decoded picture rate; 0.0 applies no bound.
    pub max_framerate: f64,
    /// Worker thread count; -1 lets the engine decide.
    pub threads: i32,
}

impl DecoderConfig {
    /// Settings with the stack's usual defaults: coded picture size, 4:2:0
    /// output at 8 bits converted to BT.2020, unbounded picture rate,
    /// engine-chosen thread count.
    pub fn new() -> Self {
        Self {
            output_width: 0,
            output_height: 0,
            output_chroma_format: ChromaFormat::Yuv420,
            output_color_matrix: ColorMatrix::Bt2020,
            output_bitdepth: 8,
            max_framerate: 0.0,
            threads: -1,
        }
    }

    /// Sets a fixed output picture size.
    pub fn with_output_size(mut self, width: u32, height: u32) -> Self {
        self.output_width = width;
        self.output_height = height;
        self
    }

    /// Sets the chroma layout pictures are converted to on the way out.
    pub fn with_output_chroma_format(mut self, chroma_format: ChromaFormat) -> Self {
        self.output_chroma_format = chroma_format;
        self
    }

    /// Sets the color matrix pictures are converted to on the way out.
    pub fn with_output_color_matrix(mut self, color_matrix: ColorMatrix) -> Self {
        self.output_color_matrix = color_matrix;
        self
    }

    /// Sets the bit depth of the output samples.
    pub fn with_output_bitdepth(mut self, bitdepth: u32) -> Self {
        self.output_bitdepth = bitdepth;
        self
    }

    /// Caps the decoded picture rate; pictures above the bound are skipped.
    pub fn with_max_framerate(mut self, max_framerate: f64) -> Self {
        self.max_framerate = max_framerate;
        self
    }

    /// Sets the worker thread count; -1 lets the engine decide.
    pub fn with_threads(mut self, threads: i32) -> Self {
        self.threads = threads;
        self
    }

    /// Writes the settings this config owns into an engine parameter block.
    /// Fields the config does not cover keep their `set_default` values.
    fn apply_to(&self, params: &mut sys::xvc_decoder_parameters) {
        params.output_width = self.output_width as c_int;
        params.output_height = self.output_height as c_int;
        params.output_chroma_format =
            self.output_chroma_format.as_raw() as sys::xvc_dec_chroma_format;
        params.output_color_matrix = self.output_color_matrix.as_raw();
        params.output_bitdepth = self.output_bitdepth;
        params.max_framerate = self.max_framerate;
        params.threads = self.threads as c_int;
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine-reported properties of one decoded picture.
#[derive(Debug, Clone, Copy)]
pub struct PictureStats {
    /// Category of the NAL unit that completed this picture.
    pub nal_type: NALUnitType,
    /// Picture order count.
    pub poc: u32,
    /// Decoding order count.
    pub doc: u32,
    /// Segment order count.
    pub soc: u32,
    /// Temporal layer id.
    pub tid: u32,
    /// Output width in luma samples.
    pub width: u32,
    /// Output height in luma samples.
    pub height: u32,
    /// Chroma layout of the output samples.
    pub chroma_format: ChromaFormat,
    /// Color matrix of the output samples.
    pub color_matrix: ColorMatrix,
    /// Bit depth of the output samples.
    pub bitdepth: u32,
    /// Bit depth the bitstream is coded at.
    pub bitstream_bitdepth: u32,
    /// Framerate signalled in the segment header.
    pub framerate: f64,
}

impl PictureStats {
    fn from_raw(stats: &sys::xvc_dec_pic_stats) -> Self {
        Self {
            nal_type: NALUnitType::from(stats.nal_unit_type),
            poc: stats.poc,
            doc: stats.doc,
            soc: stats.soc,
            tid: stats.tid,
            width: stats.width.max(0) as u32,
            height: stats.height.max(0) as u32,
            chroma_format: ChromaFormat::from_raw(stats.chroma_format as u32),
            color_matrix: ColorMatrix::from_raw(stats.color_matrix),
            bitdepth: stats.bitdepth,
            bitstream_bitdepth: stats.bitstream_bitdepth,
            framerate: stats.framerate,
        }
    }
}

/// One decoded picture, copied out of engine memory.
///
/// The sample data is planar in the configured output layout; dropping the
/// picture releases it.
#[derive(Debug, Clone)]
pub struct DecodedPicture {
    data: Bytes,
    user_data: i64,
    stats: PictureStats,
}

impl DecodedPicture {
    /// Planar sample data in the configured output layout.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Correlation value from the `decode_nal` call that submitted the
    /// picture's final NAL unit.
    pub fn user_data(&self) -> i64 {
        self.user_data
    }

    /// Engine-reported properties of the picture.
    pub fn stats(&self) -> &PictureStats {
        &self.stats
    }

    /// Consumes the picture and hands back its sample buffer without copying.
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

/// Owned engine decoder instance.
///
/// Creation loads the engine library, builds a parameter block from the
/// [`DecoderConfig`], runs the engine's own parameter check and creates the
/// instance; the parameter block is released before `new` returns. Dropping
/// the decoder destroys the instance.
pub struct Decoder {
    api: DecoderApi,
    decoder: *mut sys::xvc_decoder,
}

// As for `Encoder`: `&mut self` serializes all engine calls, so the instance
// may move between threads but not be shared.
unsafe impl Send for Decoder {}

impl Decoder {
    /// Creates a decoder instance for `config`.
    ///
    /// Fails with [`XvcError::Library`] if the engine library cannot be
    /// loaded and [`XvcError::Decoder`] if the engine rejects the settings.
    pub fn new(config: DecoderConfig) -> Result<Self> {
        let api = DecoderApi::load()?;
        let decoder = {
            let table = api.table();
            let params = ParamsGuard::create(table)?;
            // Safety: the guard holds a live parameter block.
            config.apply_to(unsafe { &mut *params.raw });
            params.check()?;
            let create = table
                .decoder_create
                .ok_or_else(|| missing_entry("decoder_create"))?;
            // Safety: the parameter block stays alive across the call.
            let decoder = unsafe { create(params.raw) };
            if decoder.is_null() {
                return Err(XvcError::Library("decoder_create returned null".into()));
            }
            decoder
        };
        info!(
            "created xvc decoder: output {} at {} bits",
            config.output_chroma_format, config.output_bitdepth
        );
        Ok(Self { api, decoder })
    }

    /// Submits one NAL unit payload to the decoder.
    ///
    /// `nal` is the bare payload without length framing. `user_data` is an
    /// opaque correlation value handed back on the picture this unit
    /// completes, via [`DecodedPicture::user_data`].
    pub fn decode_nal(&mut self, nal: &[u8], user_data: i64) -> Result<()> {
        if nal.is_empty() {
            return Err(XvcError::InvalidData("empty NAL unit".into()));
        }
        let decode = self
            .api
            .table()
            .decoder_decode_nal
            .ok_or_else(|| missing_entry("decoder_decode_nal"))?;
        // Safety: the instance is live and the payload outlives the call.
        let status = DecoderStatus::from_raw(unsafe {
            decode(self.decoder, nal.as_ptr(), nal.len(), user_data)
        });
        match status {
            DecoderStatus::Ok => Ok(()),
            other => Err(XvcError::Decoder(other)),
        }
    }

    /// Fetches the next decoded picture, if one is ready.
    ///
    /// `Ok(None)` means the decoder needs more input (or, after
    /// [`Decoder::flush`], that the pipeline is drained); it is not an
    /// error. The picture is copied out of engine memory before the call
    /// returns, so it stays valid across later decoder calls.
    pub fn decoded_picture(&mut self) -> Result<Option<DecodedPicture>> {
        let table = self.api.table();
        let get_picture = table
            .decoder_get_picture
            .ok_or_else(|| missing_entry("decoder_get_picture"))?;
        let picture = PictureGuard::create(table, self.decoder)?;
        // Safety: instance and picture handle are both live.
        let status = DecoderStatus::from_raw(unsafe { get_picture(self.decoder, picture.raw) });
        match status {
            DecoderStatus::Ok => {
                // Safety: on Ok the engine filled the handle; its transient
                // buffers stay valid until the next call on this instance.
                let owned = unsafe { copy_picture(&*picture.raw) }?;
                debug!(
                    "decoded picture poc {} ({}x{})",
                    owned.stats.poc, owned.stats.width, owned.stats.height
                );
                Ok(Some(owned))
            }
            DecoderStatus::NoDecodedPic => Ok(None),
            other => Err(XvcError::Decoder(other)),
        }
    }

    /// Signals end of stream.
    ///
    /// Buffered pictures stay fetchable afterwards; keep calling
    /// [`Decoder::decoded_picture`] until it comes back `None`.
    pub fn flush(&mut self) -> Result<()> {
        let flush = self
            .api
            .table()
            .decoder_flush
            .ok_or_else(|| missing_entry("decoder_flush"))?;
        // Safety: the instance is live.
        let status = DecoderStatus::from_raw(unsafe { flush(self.decoder) });
        match status {
            DecoderStatus::Ok => Ok(()),
            other => Err(XvcError::Decoder(other)),
        }
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        if let Some(destroy) = self.api.table().decoder_destroy {
            // Safety: the pointer came from decoder_create and is destroyed
            // exactly once.
            unsafe { destroy(self.decoder) };
        }
    }
}

/// Copies the engine's transient picture into an owned one.
///
/// # Safety
///
/// `picture` must have been filled by a successful `decoder_get_picture`
/// call, with no intervening call on the same instance.
unsafe fn copy_picture(picture: &sys::xvc_decoded_picture) -> Result<DecodedPicture> {
    let data = if picture.bytes.is_null() || picture.size == 0 {
        Bytes::new()
    } else {
        let raw = std::slice::from_raw_parts(picture.bytes as *const u8, picture.size);
        let mut buf = Vec::new();
        buf.try_reserve_exact(raw.len())?;
        buf.extend_from_slice(raw);
        Bytes::from(buf)
    };
    Ok(DecodedPicture {
        data,
        user_data: picture.user_data,
        stats: PictureStats::from_raw(&picture.stats),
    })
}

/// Engine parameter block released on drop.
struct ParamsGuard<'a> {
    table: &'a sys::xvc_decoder_api,
    raw: *mut sys::xvc_decoder_parameters,
}

impl<'a> ParamsGuard<'a> {
    fn create(table: &'a sys::xvc_decoder_api) -> Result<Self> {
        let create = table
            .parameters_create
            .ok_or_else(|| missing_entry("parameters_create"))?;
        let set_default = table
            .parameters_set_default
            .ok_or_else(|| missing_entry("parameters_set_default"))?;
        // Safety: plain calls into the loaded engine.
        let raw = unsafe { create() };
        if raw.is_null() {
            return Err(XvcError::Library("parameters_create returned null".into()));
        }
        let guard = Self { table, raw };
        // Safety: the block is live; the guard releases it on any failure
        // from here on.
        let status = DecoderStatus::from_raw(unsafe { set_default(raw) });
        if status != DecoderStatus::Ok {
            return Err(XvcError::Decoder(status));
        }
        Ok(guard)
    }

    fn check(&self) -> Result<()> {
        let check = self
            .table
            .parameters_check
            .ok_or_else(|| missing_entry("parameters_check"))?;
        // Safety: the block is live for the guard's lifetime.
        let status = DecoderStatus::from_raw(unsafe { check(self.raw) });
        match status {
            DecoderStatus::Ok => Ok(()),
            other => Err(XvcError::Decoder(other)),
        }
    }
}

impl Drop for ParamsGuard<'_> {
    fn drop(&mut self) {
        if let Some(destroy) = self.table.parameters_destroy {
            // Safety: the pointer came from parameters_create and is
            // destroyed exactly once.
            unsafe { destroy(self.raw) };
        }
    }
}

/// Engine picture handle released on drop.
struct PictureGuard<'a> {
    table: &'a sys::xvc_decoder_api,
    raw: *mut sys::xvc_decoded_picture,
}

impl<'a> PictureGuard<'a> {
    fn create(table: &'a sys::xvc_decoder_api, decoder: *mut sys::xvc_decoder) -> Result<Self> {
        let create = table
            .picture_create
            .ok_or_else(|| missing_entry("picture_create"))?;
        // Safety: the instance is live.
        let raw = unsafe { create(decoder) };
        if raw.is_null() {
            return Err(XvcError::Library("picture_create returned null".into()));
        }
        Ok(Self { table, raw })
    }
}

impl Drop for PictureGuard<'_> {
    fn drop(&mut self) {
        if let Some(destroy) = self.table.picture_destroy {
            // Safety: the handle came from picture_create and is destroyed
            // exactly once.
            unsafe { destroy(self.raw) };
        }
    }
}

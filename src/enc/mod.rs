//! # Encoding
//!
//! Safe wrapper around the engine's encoder API. [`Encoder`] owns one engine
//! instance for its whole lifetime; [`Encoder::encode`] submits a planar
//! frame together with a caller-chosen correlation value and returns the
//! emitted NAL units as owned [`NALUnit`] values, already copied out of
//! engine memory. [`Encoder::flush`] drains the pipeline at end of stream.
//!
//! ## Example
//!
//! ```no_run
//! use xvcio::enc::{Encoder, EncoderConfig, YuvFrame};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EncoderConfig::new(640, 360).with_framerate(25.0);
//! let mut encoder = Encoder::new(config)?;
//!
//! // Tightly packed 4:2:0 planes.
//! let y = vec![0u8; 640 * 360];
//! let u = vec![0u8; 320 * 180];
//! let v = vec![0u8; 320 * 180];
//! let frame = YuvFrame {
//!     planes: [&y, &u, &v],
//!     strides: [640, 320, 320],
//! };
//!
//! for unit in encoder.encode(&frame, 0)? {
//!     println!("{} byte {} unit", unit.size(), unit.nal_type());
//! }
//!
//! let mut tail = encoder.flush()?;
//! while !tail.is_done() {
//!     tail = encoder.flush()?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod result;

pub use result::{copy_nal_units, NALUnit, NalDescriptor};

use std::os::raw::c_int;
use std::ptr;

use log::{debug, info};

use crate::error::{Result, XvcError};
use crate::sys::enc as sys;
use crate::sys::loader::{missing_entry, EncoderApi};
use crate::types::{ChromaFormat, ColorMatrix, EncoderStatus, NALUnitType};

/// Encoder settings forwarded to the engine when the instance is created.
///
/// Fields not covered here keep the engine's own defaults. Settings are
/// validated by the engine's parameter check before the instance exists, so
/// a bad combination fails [`Encoder::new`] rather than a later encode call.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Frame width in luma samples.
    pub width: u32,
    /// Frame height in luma samples.
    pub height: u32,
    /// Input framerate in frames per second.
    pub framerate: f64,
    /// Chroma subsampling of the input planes.
    pub chroma_format: ChromaFormat,
    /// Color matrix signalled in the bitstream.
    pub color_matrix: ColorMatrix,
    /// Base quantization parameter.
    pub qp: i32,
    /// Deblocking filter mode (0 disables it).
    pub deblock: i32,
    /// Low-delay coding structure (no picture reordering).
    pub low_delay: bool,
    /// Engine speed preset (0 placebo, 1 slow, 2 fast).
    pub speed_mode: i32,
    /// Engine tuning preset (0 visual quality, 1 PSNR).
    pub tune_mode: i32,
    /// Worker thread count; -1 lets the engine decide.
    pub threads: i32,
    /// Bit depth of the input samples.
    pub input_bitdepth: u32,
    /// Bit depth the engine codes at internally.
    pub internal_bitdepth: u32,
    /// Restricted coding mode for version compatibility.
    pub restricted_mode: i32,
}

impl EncoderConfig {
    /// Settings for a `width` by `height` encode with the stack's usual
    /// defaults: 4:2:0 input at 8 bits, 30 fps, QP 32, low delay, fast
    /// speed preset, engine-chosen thread count.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            framerate: 30.0,
            chroma_format: ChromaFormat::Yuv420,
            color_matrix: ColorMatrix::Undefined,
            qp: 32,
            deblock: 1,
            low_delay: true,
            speed_mode: 2,
            tune_mode: 0,
            threads: -1,
            input_bitdepth: 8,
            internal_bitdepth: 8,
            restricted_mode: 3,
        }
    }

    /// Sets the input framerate in frames per second.
    pub fn with_framerate(mut self, framerate: f64) -> Self {
        self.framerate = framerate;
        self
    }

    /// Sets the chroma subsampling of the input planes.
    pub fn with_chroma_format(mut self, chroma_format: ChromaFormat) -> Self {
        self.chroma_format = chroma_format;
        self
    }

    /// Sets the color matrix signalled in the bitstream.
    pub fn with_color_matrix(mut self, color_matrix: ColorMatrix) -> Self {
        self.color_matrix = color_matrix;
        self
    }

    /// Sets the base quantization parameter.
    pub fn with_qp(mut self, qp: i32) -> Self {
        self.qp = qp;
        self
    }

    /// Sets the engine speed preset.
    pub fn with_speed_mode(mut self, speed_mode: i32) -> Self {
        self.speed_mode = speed_mode;
        self
    }

    /// Sets the worker thread count; -1 lets the engine decide.
    pub fn with_threads(mut self, threads: i32) -> Self {
        self.threads = threads;
        self
    }

    /// Enables or disables the low-delay coding structure.
    pub fn with_low_delay(mut self, low_delay: bool) -> Self {
        self.low_delay = low_delay;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(XvcError::InvalidData(format!(
                "invalid frame dimensions {}x{}",
                self.width, self.height
            )));
        }
        if self.width > c_int::MAX as u32 || self.height > c_int::MAX as u32 {
            return Err(XvcError::InvalidData(format!(
                "frame dimensions {}x{} exceed the engine's range",
                self.width, self.height
            )));
        }
        match self.chroma_format {
            ChromaFormat::Monochrome
            | ChromaFormat::Yuv420
            | ChromaFormat::Yuv422
            | ChromaFormat::Yuv444 => Ok(()),
            ChromaFormat::Argb | ChromaFormat::Undefined => Err(XvcError::InvalidData(format!(
                "plane encoding requires a planar chroma format, got {}",
                self.chroma_format
            ))),
        }
    }

    /// Writes the settings this config owns into an engine parameter block.
    /// Fields the config does not cover keep their `set_default` values.
    fn apply_to(&self, params: &mut sys::xvc_encoder_parameters) {
        params.width = self.width as c_int;
        params.height = self.height as c_int;
        params.chroma_format = self.chroma_format.as_raw() as sys::xvc_enc_chroma_format;
        params.color_matrix = self.color_matrix.as_raw();
        params.input_bitdepth = self.input_bitdepth;
        params.internal_bitdepth = self.internal_bitdepth;
        params.framerate = self.framerate;
        params.low_delay = self.low_delay as c_int;
        params.restricted_mode = self.restricted_mode as c_int;
        params.deblock = self.deblock as c_int;
        params.qp = self.qp as c_int;
        params.speed_mode = self.speed_mode as c_int;
        params.tune_mode = self.tune_mode as c_int;
        params.threads = self.threads as c_int;
    }

    fn bytes_per_sample(&self) -> usize {
        if self.input_bitdepth > 8 {
            2
        } else {
            1
        }
    }

    /// Sample dimensions of the Y, U and V planes. Chroma planes are (0, 0)
    /// for monochrome input.
    fn plane_dimensions(&self) -> [(usize, usize); 3] {
        let w = self.width as usize;
        let h = self.height as usize;
        let chroma = match self.chroma_format {
            ChromaFormat::Yuv420 => ((w + 1) / 2, (h + 1) / 2),
            ChromaFormat::Yuv422 => ((w + 1) / 2, h),
            ChromaFormat::Yuv444 => (w, h),
            _ => (0, 0),
        };
        [(w, h), chroma, chroma]
    }

    fn validate_frame(&self, frame: &YuvFrame<'_>) -> Result<()> {
        let bps = self.bytes_per_sample();
        for (index, &(width, height)) in self.plane_dimensions().iter().enumerate() {
            if height == 0 {
                continue;
            }
            let row_bytes = width * bps;
            let stride = frame.strides[index];
            if stride < row_bytes {
                return Err(XvcError::InvalidData(format!(
                    "plane {} stride {} is shorter than its {} byte rows",
                    index, stride, row_bytes
                )));
            }
            if stride > c_int::MAX as usize {
                return Err(XvcError::InvalidData(format!(
                    "plane {} stride {} exceeds the engine's range",
                    index, stride
                )));
            }
            let required = stride * (height - 1) + row_bytes;
            if frame.planes[index].len() < required {
                return Err(XvcError::InvalidData(format!(
                    "plane {} holds {} bytes but {}x{} rows at stride {} need {}",
                    index,
                    frame.planes[index].len(),
                    width,
                    height,
                    stride,
                    required
                )));
            }
        }
        Ok(())
    }
}

/// One planar input frame, borrowed from the caller for the encode call.
///
/// Planes are in Y, U, V order with their strides in bytes. For monochrome
/// input the chroma planes may be empty slices.
#[derive(Debug, Clone, Copy)]
pub struct YuvFrame<'a> {
    /// Sample planes in Y, U, V order.
    pub planes: [&'a [u8]; 3],
    /// Distance in bytes between the starts of consecutive rows, per plane.
    pub strides: [usize; 3],
}

/// What a flush call produced.
///
/// Both outcomes the engine reports for a flush are packageable: `Ok` with
/// drained units, or `NoMoreOutput` with an empty batch once the pipeline is
/// exhausted. The status is carried alongside the units so the caller can
/// tell the two apart.
#[derive(Debug)]
pub struct FlushOutput {
    /// Units drained by this call; empty once the pipeline is exhausted.
    pub units: Vec<NALUnit>,
    /// The status the engine reported for this call.
    pub status: EncoderStatus,
}

impl FlushOutput {
    /// True once the engine has reported that nothing more will come.
    pub fn is_done(&self) -> bool {
        self.status == EncoderStatus::NoMoreOutput
    }
}

/// Owned engine encoder instance.
///
/// Creation loads the engine library, builds a parameter block from the
/// [`EncoderConfig`], runs the engine's own parameter check and creates the
/// instance; the parameter block is released before `new` returns. Dropping
/// the encoder destroys the instance.
pub struct Encoder {
    api: EncoderApi,
    encoder: *mut sys::xvc_encoder,
    config: EncoderConfig,
}

// The raw instance pointer confines the type to one caller at a time, which
// `&mut self` on every engine call already enforces. Moving the encoder to
// another thread is fine; sharing it is not, so no `Sync`.
unsafe impl Send for Encoder {}

impl Encoder {
    /// Creates an encoder instance for `config`.
    ///
    /// Fails with [`XvcError::Library`] if the engine library cannot be
    /// loaded and [`XvcError::Encoder`] if the engine rejects the settings.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        let api = EncoderApi::load()?;
        let encoder = {
            let table = api.table();
            let params = ParamsGuard::create(table)?;
            // Safety: the guard holds a live parameter block.
            config.apply_to(unsafe { &mut *params.raw });
            params.check()?;
            let create = table
                .encoder_create
                .ok_or_else(|| missing_entry("encoder_create"))?;
            // Safety: the parameter block stays alive across the call.
            let encoder = unsafe { create(params.raw) };
            if encoder.is_null() {
                return Err(XvcError::Library("encoder_create returned null".into()));
            }
            encoder
        };
        info!(
            "created xvc encoder: {}x{} {} at {} fps",
            config.width, config.height, config.chroma_format, config.framerate
        );
        Ok(Self {
            api,
            encoder,
            config,
        })
    }

    /// The settings this instance was created with.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes one frame.
    ///
    /// `user_data` is an opaque correlation value the engine attaches to
    /// every NAL unit this frame eventually produces; it comes back via
    /// [`NALUnit::user_data`]. Returns the units the engine emitted for this
    /// call, which may be empty while the pipeline fills. Any engine failure
    /// or allocation failure returns an error and no units.
    pub fn encode(&mut self, frame: &YuvFrame<'_>, user_data: i64) -> Result<Vec<NALUnit>> {
        self.config.validate_frame(frame)?;
        let encode2 = self
            .api
            .table()
            .encoder_encode2
            .ok_or_else(|| missing_entry("encoder_encode2"))?;

        let planes: [*const u8; 3] = [
            frame.planes[0].as_ptr(),
            frame.planes[1].as_ptr(),
            frame.planes[2].as_ptr(),
        ];
        let strides: [c_int; 3] = [
            frame.strides[0] as c_int,
            frame.strides[1] as c_int,
            frame.strides[2] as c_int,
        ];
        let mut nal_units: *mut sys::xvc_enc_nal_unit = ptr::null_mut();
        let mut num_nal_units: c_int = 0;
        // Safety: the instance is live, plane spans were validated against
        // the configured dimensions, and the out-pointers outlive the call.
        let status = EncoderStatus::from_raw(unsafe {
            encode2(
                self.encoder,
                planes.as_ptr(),
                strides.as_ptr(),
                &mut nal_units,
                &mut num_nal_units,
                ptr::null_mut(),
                user_data,
            )
        });
        if !status.is_ok() {
            return Err(XvcError::Encoder(status));
        }
        // Safety: on success the engine filled the out-pointers; the batch
        // stays valid until the next call on this instance.
        let units = unsafe { package_engine_units(nal_units, num_nal_units) }?;
        debug!(
            "encoded frame (user_data {}): {} nal units",
            user_data,
            units.len()
        );
        Ok(units)
    }

    /// Drains buffered output at end of stream.
    ///
    /// Call repeatedly until [`FlushOutput::is_done`]; the final call comes
    /// back with an empty batch and the `NoMoreOutput` status. Other engine
    /// statuses are failures.
    pub fn flush(&mut self) -> Result<FlushOutput> {
        let flush = self
            .api
            .table()
            .encoder_flush
            .ok_or_else(|| missing_entry("encoder_flush"))?;

        let mut nal_units: *mut sys::xvc_enc_nal_unit = ptr::null_mut();
        let mut num_nal_units: c_int = 0;
        // Safety: the instance is live and the out-pointers outlive the call.
        // The engine leaves them untouched once the pipeline is exhausted,
        // which the null/zero initialization turns into an empty batch.
        let status = EncoderStatus::from_raw(unsafe {
            flush(
                self.encoder,
                &mut nal_units,
                &mut num_nal_units,
                ptr::null_mut(),
            )
        });
        match status {
            EncoderStatus::Ok | EncoderStatus::NoMoreOutput => {
                // Safety: as for `encode`.
                let units = unsafe { package_engine_units(nal_units, num_nal_units) }?;
                debug!("flush ({}): {} nal units", status, units.len());
                Ok(FlushOutput { units, status })
            }
            other => Err(XvcError::Encoder(other)),
        }
    }
}

impl Drop for Encoder {
    fn drop(&mut self) {
        if let Some(destroy) = self.api.table().encoder_destroy {
            // Safety: the pointer came from encoder_create and is destroyed
            // exactly once.
            unsafe { destroy(self.encoder) };
        }
    }
}

/// Copies the engine's transient output batch into owned units.
///
/// # Safety
///
/// `nal_units` and `num_nal_units` must be the out-values of an engine call
/// on a still-live instance, with no intervening call on that instance.
unsafe fn package_engine_units(
    nal_units: *const sys::xvc_enc_nal_unit,
    num_nal_units: c_int,
) -> Result<Vec<NALUnit>> {
    if nal_units.is_null() || num_nal_units <= 0 {
        return Ok(Vec::new());
    }
    let raw = std::slice::from_raw_parts(nal_units, num_nal_units as usize);
    let mut descriptors = Vec::new();
    descriptors.try_reserve_exact(raw.len())?;
    for unit in raw {
        let payload = if unit.bytes.is_null() || unit.size == 0 {
            &[][..]
        } else {
            std::slice::from_raw_parts(unit.bytes, unit.size)
        };
        descriptors.push(NalDescriptor {
            payload,
            nal_type: NALUnitType::from(unit.stats.nal_unit_type),
            user_data: unit.user_data,
        });
    }
    copy_nal_units(&descriptors)
}

/// Engine parameter block released on drop.
struct ParamsGuard<'a> {
    table: &'a sys::xvc_encoder_api,
    raw: *mut sys::xvc_encoder_parameters,
}

impl<'a> ParamsGuard<'a> {
    fn create(table: &'a sys::xvc_encoder_api) -> Result<Self> {
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
        let status = EncoderStatus::from_raw(unsafe { set_default(raw) });
        if !status.is_ok() {
            return Err(XvcError::Encoder(status));
        }
        Ok(guard)
    }

    fn check(&self) -> Result<()> {
        let check = self
            .table
            .parameters_check
            .ok_or_else(|| missing_entry("parameters_check"))?;
        // Safety: the block is live for the guard's lifetime.
        let status = EncoderStatus::from_raw(unsafe { check(self.raw) });
        if status.is_ok() {
            Ok(())
        } else {
            Err(XvcError::Encoder(status))
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = EncoderConfig::new(1280, 720);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.framerate, 30.0);
        assert_eq!(config.chroma_format, ChromaFormat::Yuv420);
        assert_eq!(config.color_matrix, ColorMatrix::Undefined);
        assert_eq!(config.qp, 32);
        assert_eq!(config.deblock, 1);
        assert!(config.low_delay);
        assert_eq!(config.speed_mode, 2);
        assert_eq!(config.tune_mode, 0);
        assert_eq!(config.threads, -1);
        assert_eq!(config.input_bitdepth, 8);
        assert_eq!(config.internal_bitdepth, 8);
        assert_eq!(config.restricted_mode, 3);
    }

    #[test]
    fn test_config_builders() {
        let config = EncoderConfig::new(640, 360)
            .with_framerate(60.0)
            .with_chroma_format(ChromaFormat::Yuv444)
            .with_color_matrix(ColorMatrix::Bt709)
            .with_qp(27)
            .with_speed_mode(1)
            .with_threads(4)
            .with_low_delay(false);
        assert_eq!(config.framerate, 60.0);
        assert_eq!(config.chroma_format, ChromaFormat::Yuv444);
        assert_eq!(config.color_matrix, ColorMatrix::Bt709);
        assert_eq!(config.qp, 27);
        assert_eq!(config.speed_mode, 1);
        assert_eq!(config.threads, 4);
        assert!(!config.low_delay);
    }

    #[test]
    fn test_apply_writes_owned_fields_only() {
        let config = EncoderConfig::new(320, 240)
            .with_framerate(24.0)
            .with_qp(20)
            .with_low_delay(false);
        let mut params: sys::xvc_encoder_parameters = unsafe { std::mem::zeroed() };
        params.sub_gop_length = 16;
        params.num_ref_pics = 2;

        config.apply_to(&mut params);

        assert_eq!(params.width, 320);
        assert_eq!(params.height, 240);
        assert_eq!(params.framerate, 24.0);
        assert_eq!(params.chroma_format, 1);
        assert_eq!(params.color_matrix, 0);
        assert_eq!(params.qp, 20);
        assert_eq!(params.low_delay, 0);
        assert_eq!(params.threads, -1);
        // Settings the config does not own are left alone.
        assert_eq!(params.sub_gop_length, 16);
        assert_eq!(params.num_ref_pics, 2);
    }

    #[test]
    fn test_plane_dimensions_per_chroma_format() {
        let base = EncoderConfig::new(7, 5);
        let dims = |format| {
            base.clone()
                .with_chroma_format(format)
                .plane_dimensions()
        };
        assert_eq!(dims(ChromaFormat::Yuv420), [(7, 5), (4, 3), (4, 3)]);
        assert_eq!(dims(ChromaFormat::Yuv422), [(7, 5), (4, 5), (4, 5)]);
        assert_eq!(dims(ChromaFormat::Yuv444), [(7, 5), (7, 5), (7, 5)]);
        assert_eq!(dims(ChromaFormat::Monochrome), [(7, 5), (0, 0), (0, 0)]);
    }

    #[test]
    fn test_validate_rejects_non_planar_formats_and_empty_frames() {
        assert!(EncoderConfig::new(16, 16).validate().is_ok());
        assert!(EncoderConfig::new(0, 16).validate().is_err());
        assert!(EncoderConfig::new(16, 0).validate().is_err());
        assert!(EncoderConfig::new(16, 16)
            .with_chroma_format(ChromaFormat::Argb)
            .validate()
            .is_err());
        assert!(EncoderConfig::new(16, 16)
            .with_chroma_format(ChromaFormat::Undefined)
            .validate()
            .is_err());
    }

    #[test]
    fn test_frame_validation_accepts_tight_and_padded_planes() {
        let config = EncoderConfig::new(6, 4);
        let y = vec![0u8; 6 * 4];
        let u = vec![0u8; 3 * 2];
        let v = vec![0u8; 3 * 2];
        let tight = YuvFrame {
            planes: [&y, &u, &v],
            strides: [6, 3, 3],
        };
        assert!(config.validate_frame(&tight).is_ok());

        // Padded rows: the last row only needs its sample span.
        let y = vec![0u8; 8 * 3 + 6];
        let u = vec![0u8; 4 + 3];
        let v = vec![0u8; 4 + 3];
        let padded = YuvFrame {
            planes: [&y, &u, &v],
            strides: [8, 4, 4],
        };
        assert!(config.validate_frame(&padded).is_ok());
    }

    #[test]
    fn test_frame_validation_rejects_short_planes_and_strides() {
        let config = EncoderConfig::new(6, 4);
        let y = vec![0u8; 6 * 4];
        let u = vec![0u8; 3 * 2];
        let v = vec![0u8; 3 * 2];

        let short_stride = YuvFrame {
            planes: [&y, &u, &v],
            strides: [5, 3, 3],
        };
        assert!(matches!(
            config.validate_frame(&short_stride),
            Err(XvcError::InvalidData(_))
        ));

        let short_chroma = YuvFrame {
            planes: [&y, &u[..5], &v],
            strides: [6, 3, 3],
        };
        assert!(matches!(
            config.validate_frame(&short_chroma),
            Err(XvcError::InvalidData(_))
        ));
    }

    #[test]
    fn test_monochrome_frames_skip_chroma_planes() {
        let config = EncoderConfig::new(6, 4).with_chroma_format(ChromaFormat::Monochrome);
        let y = vec![0u8; 6 * 4];
        let frame = YuvFrame {
            planes: [&y, &[], &[]],
            strides: [6, 0, 0],
        };
        assert!(config.validate_frame(&frame).is_ok());
    }

    #[test]
    fn test_ten_bit_input_doubles_row_bytes() {
        let config = EncoderConfig::new(4, 2);
        let mut ten_bit = config.clone();
        ten_bit.input_bitdepth = 10;

        let y = vec![0u8; 4 * 2];
        let u = vec![0u8; 2];
        let v = vec![0u8; 2];
        let eight_bit_frame = YuvFrame {
            planes: [&y, &u, &v],
            strides: [4, 2, 2],
        };
        assert!(config.validate_frame(&eight_bit_frame).is_ok());
        // The same layout is too small once samples are two bytes wide.
        assert!(ten_bit.validate_frame(&eight_bit_frame).is_err());

        let y_wide = vec![0u8; 8 * 2];
        let u_wide = vec![0u8; 4];
        let v_wide = vec![0u8; 4];
        let ten_bit_frame = YuvFrame {
            planes: [&y_wide, &u_wide, &v_wide],
            strides: [8, 4, 4],
        };
        assert!(ten_bit.validate_frame(&ten_bit_frame).is_ok());
    }

    #[test]
    fn test_flush_output_done_tracks_status() {
        let draining = FlushOutput {
            units: Vec::new(),
            status: EncoderStatus::Ok,
        };
        assert!(!draining.is_done());
        let done = FlushOutput {
            units: Vec::new(),
            status: EncoderStatus::NoMoreOutput,
        };
        assert!(done.is_done());
    }
}

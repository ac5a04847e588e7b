// Type and field names match the engine's xvcenc.h exactly; renaming or
// reordering would break the FFI layout.
// Dead code allowed: the API table is complete, entries dispatch on demand.
#![allow(non_camel_case_types, dead_code)]

use std::os::raw::{c_char, c_int};

pub(crate) type xvc_enc_return_code = c_int;
pub(crate) type xvc_enc_chroma_format = c_int;

/// Opaque encoder instance. Only ever handled through a pointer.
#[repr(C)]
pub(crate) struct xvc_encoder {
    _private: [u8; 0],
}

#[repr(C)]
pub(crate) struct xvc_enc_nal_stats {
    pub nal_unit_type: u32,
    pub poc: u32,
    pub doc: u32,
    pub soc: u32,
    pub tid: u32,
    pub l0: [i32; 5],
    pub l1: [i32; 5],
}

/// Transient NAL descriptor. `bytes` points into engine-owned memory that is
/// valid only until the next call on the same encoder.
#[repr(C)]
pub(crate) struct xvc_enc_nal_unit {
    pub bytes: *const u8,
    pub size: usize,
    pub buffer_flag: c_int,
    pub stats: xvc_enc_nal_stats,
    pub user_data: i64,
}

#[repr(C)]
pub(crate) struct xvc_enc_pic_buffer {
    pub pic: *mut u8,
    pub size: usize,
}

#[repr(C)]
pub(crate) struct xvc_encoder_parameters {
    pub width: c_int,
    pub height: c_int,
    pub chroma_format: xvc_enc_chroma_format,
    pub color_matrix: u32,
    pub input_bitdepth: u32,
    pub internal_bitdepth: u32,
    pub framerate: f64,
    pub sub_gop_length: u32,
    pub max_keypic_distance: u32,
    pub closed_gop: c_int,
    pub low_delay: c_int,
    pub num_ref_pics: c_int,
    pub restricted_mode: c_int,
    pub chroma_qp_offset_table: c_int,
    pub chroma_qp_offset_u: c_int,
    pub chroma_qp_offset_v: c_int,
    pub deblock: c_int,
    pub beta_offset: c_int,
    pub tc_offset: c_int,
    pub qp: c_int,
    pub flat_lambda: c_int,
    pub speed_mode: c_int,
    pub tune_mode: c_int,
    pub threads: c_int,
    pub simd_mask: c_int,
    pub explicit_encoder_settings: *mut c_char,
}

/// Encoder API table returned by `xvc_encoder_api_get`.
#[repr(C)]
pub(crate) struct xvc_encoder_api {
    pub parameters_create: Option<unsafe extern "C" fn() -> *mut xvc_encoder_parameters>,
    pub parameters_destroy:
        Option<unsafe extern "C" fn(param: *mut xvc_encoder_parameters) -> xvc_enc_return_code>,
    pub parameters_set_default:
        Option<unsafe extern "C" fn(param: *mut xvc_encoder_parameters) -> xvc_enc_return_code>,
    pub parameters_check:
        Option<unsafe extern "C" fn(param: *const xvc_encoder_parameters) -> xvc_enc_return_code>,
    pub encoder_create:
        Option<unsafe extern "C" fn(param: *const xvc_encoder_parameters) -> *mut xvc_encoder>,
    pub encoder_destroy:
        Option<unsafe extern "C" fn(encoder: *mut xvc_encoder) -> xvc_enc_return_code>,
    pub encoder_encode: Option<
        unsafe extern "C" fn(
            encoder: *mut xvc_encoder,
            pic_bytes: *const u8,
            nal_units: *mut *mut xvc_enc_nal_unit,
            num_nal_units: *mut c_int,
            rec_pic: *mut xvc_enc_pic_buffer,
        ) -> xvc_enc_return_code,
    >,
    pub encoder_encode2: Option<
        unsafe extern "C" fn(
            encoder: *mut xvc_encoder,
            plane_bytes: *const *const u8,
            plane_stride: *const c_int,
            nal_units: *mut *mut xvc_enc_nal_unit,
            num_nal_units: *mut c_int,
            rec_pic: *mut xvc_enc_pic_buffer,
            user_data: i64,
        ) -> xvc_enc_return_code,
    >,
    pub encoder_flush: Option<
        unsafe extern "C" fn(
            encoder: *mut xvc_encoder,
            nal_units: *mut *mut xvc_enc_nal_unit,
            num_nal_units: *mut c_int,
            rec_pic: *mut xvc_enc_pic_buffer,
        ) -> xvc_enc_return_code,
    >,
}
